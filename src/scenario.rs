//! Built-in run configurations.

use thiserror::Error;

use crate::{Execution, Universe};

#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("time step must be positive and finite, got {0}")]
    TimeStep(f64),
    #[error("theta must be non-negative and finite, got {0}")]
    Theta(f64),
    #[error("frame frequency must be at least 1")]
    Frequency,
    #[error("number of threads must be at least 1")]
    Threads,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Scenario {
    /// Jupiter and its four Galilean moons, read from a data file.
    Jupiter,
    /// A single galaxy of 500 stars.
    Galaxy,
    /// Two galaxies pushed towards each other.
    Collision,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScenarioParameters {
    /// Side of the square domain. Ignored for scenarios loaded from a file.
    pub width: f64,
    pub num_generations: usize,
    pub time_step: f64,
    pub theta: f64,
    /// Every `frequency`-th generation is kept as a frame.
    pub frequency: usize,
}

impl ScenarioParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.time_step > 0. && self.time_step.is_finite()) {
            return Err(ParameterError::TimeStep(self.time_step));
        }
        if !(self.theta >= 0. && self.theta.is_finite()) {
            return Err(ParameterError::Theta(self.theta));
        }
        if self.frequency == 0 {
            return Err(ParameterError::Frequency);
        }
        Ok(())
    }
}

impl Scenario {
    #[must_use]
    pub fn parameters(self) -> ScenarioParameters {
        let time_step = match self {
            Scenario::Jupiter => 1e1,
            Scenario::Galaxy => 2e15,
            Scenario::Collision => 2e14,
        };

        ScenarioParameters {
            width: 1e23,
            num_generations: 100_000,
            time_step,
            theta: 0.5,
            frequency: 1000,
        }
    }
}

impl Execution {
    /// Checked constructor for [`Execution::Multithreaded`].
    pub fn threads(num_threads: usize) -> Result<Self, ParameterError> {
        if num_threads == 0 {
            return Err(ParameterError::Threads);
        }
        Ok(Execution::Multithreaded { num_threads })
    }
}

/// Whether `generation` is kept as a frame: `0, frequency, 2 * frequency, ...`.
///
/// Runs that only keep frames check every generation with this while they
/// step.
pub fn is_frame(generation: usize, frequency: usize) -> Result<bool, ParameterError> {
    if frequency == 0 {
        return Err(ParameterError::Frequency);
    }
    Ok(generation % frequency == 0)
}

/// Frames out of a run that kept every snapshot, see [`is_frame`].
pub fn sample_frames(
    snapshots: &[Universe],
    frequency: usize,
) -> Result<Vec<&Universe>, ParameterError> {
    if frequency == 0 {
        return Err(ParameterError::Frequency);
    }

    let mut frames = Vec::with_capacity(snapshots.len() / frequency + 1);
    for (generation, snapshot) in snapshots.iter().enumerate() {
        if is_frame(generation, frequency)? {
            frames.push(snapshot);
        }
    }
    Ok(frames)
}

#[cfg(feature = "randomization")]
pub use galaxies::*;

#[cfg(feature = "randomization")]
mod galaxies {
    use rand::Rng;

    use super::*;
    use crate::creator::{galaxy_push, initialize_galaxy, initialize_universe};

    pub const GALAXY_SIZE: usize = 500;
    /// Speed of each galaxy towards the other one in the collision scenario.
    pub const COLLISION_SPEED: f64 = 5e3;

    /// One galaxy of radius 1e22 centered at (5e22, 5e22).
    pub fn galaxy_universe(rng: &mut impl Rng, width: f64) -> Universe {
        let galaxy = initialize_galaxy(GALAXY_SIZE, 1e22, 5e22, 5e22, rng);
        initialize_universe(vec![galaxy], width)
    }

    /// Two small galaxies on a collision course.
    pub fn collision_universe(rng: &mut impl Rng, width: f64) -> Universe {
        let mut g0 = initialize_galaxy(GALAXY_SIZE, 4e21, 7e22, 2e22, rng);
        let mut g1 = initialize_galaxy(GALAXY_SIZE, 4e21, 3e22, 7e22, rng);

        galaxy_push(&mut g0, &mut g1, COLLISION_SPEED);

        initialize_universe(vec![g0, g1], width)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Body, Vector};

    fn snapshots(n: usize) -> Vec<Universe> {
        (0..n)
            .map(|i| {
                Universe::new(
                    10.,
                    vec![Body::new(1., Vector::new(i as f64, 0.), Vector::zeros())],
                )
            })
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        for scenario in [Scenario::Jupiter, Scenario::Galaxy, Scenario::Collision] {
            assert_eq!(scenario.parameters().validate(), Ok(()));
        }
    }

    #[test]
    fn invalid_parameters() {
        let valid = Scenario::Galaxy.parameters();

        let p = ScenarioParameters {
            time_step: 0.,
            ..valid
        };
        assert_eq!(p.validate(), Err(ParameterError::TimeStep(0.)));

        let p = ScenarioParameters {
            theta: -0.1,
            ..valid
        };
        assert_eq!(p.validate(), Err(ParameterError::Theta(-0.1)));

        let p = ScenarioParameters {
            theta: f64::INFINITY,
            ..valid
        };
        assert!(p.validate().is_err());

        let p = ScenarioParameters {
            frequency: 0,
            ..valid
        };
        assert_eq!(p.validate(), Err(ParameterError::Frequency));
    }

    #[test]
    fn zero_threads() {
        assert_eq!(Execution::threads(0), Err(ParameterError::Threads));
        assert_eq!(
            Execution::threads(3),
            Ok(Execution::Multithreaded { num_threads: 3 })
        );
    }

    #[test]
    fn frames_every_frequency() {
        let all = snapshots(11);
        let frames = sample_frames(&all, 5).unwrap();

        let xs: Vec<f64> = frames.iter().map(|u| u.bodies()[0].position.x).collect();
        assert_eq!(xs, vec![0., 5., 10.]);
    }

    #[test]
    fn frequency_one_keeps_everything() {
        let all = snapshots(4);
        assert_eq!(sample_frames(&all, 1).unwrap().len(), 4);
    }

    #[test]
    fn frames_match_stepping_check() {
        let all = snapshots(23);
        let frames = sample_frames(&all, 4).unwrap();

        let kept: Vec<&Universe> = all
            .iter()
            .enumerate()
            .filter(|&(generation, _)| is_frame(generation, 4).unwrap())
            .map(|(_, u)| u)
            .collect();
        assert_eq!(frames, kept);
        assert_eq!(frames.len(), 6);
        assert_eq!(is_frame(7, 0), Err(ParameterError::Frequency));
    }

    #[test]
    fn zero_frequency() {
        assert_eq!(sample_frames(&snapshots(3), 0), Err(ParameterError::Frequency));
        assert_eq!(sample_frames(&[], 0), Err(ParameterError::Frequency));
    }
}
