use crate::{universe::Body, vector::Vector, Universe};

/// A group of bodies set up together, e.g. one galaxy.
pub type Galaxy = Vec<Body>;

pub trait BodyCreator {
    fn create_body(&mut self) -> Body;

    fn create_bodies(&mut self, n: usize) -> Vec<Body> {
        (0..n).map(|_| self.create_body()).collect()
    }
}

/// Put all galaxies into one domain of the given width.
#[must_use]
pub fn initialize_universe(galaxies: Vec<Galaxy>, width: f64) -> Universe {
    Universe::new(width, galaxies.into_iter().flatten().collect())
}

/// Mean position of the bodies, not weighted by mass.
#[must_use]
pub fn galaxy_center(galaxy: &[Body]) -> Option<Vector> {
    if galaxy.is_empty() {
        return None;
    }

    let sum = galaxy
        .iter()
        .fold(Vector::zeros(), |acc, body| acc + body.position);
    Some(sum / galaxy.len() as f64)
}

/// Distance used instead of zero when two galaxy centers coincide.
pub const PUSH_EPSILON: f64 = 1e-3;

/// Add a velocity of magnitude `speed` to both galaxies, each directed
/// towards the center of the other one.
///
/// Coincident centers are pushed apart along the x-axis. Empty galaxies are
/// left alone.
pub fn galaxy_push(g0: &mut [Body], g1: &mut [Body], speed: f64) {
    let (Some(center0), Some(center1)) = (galaxy_center(g0), galaxy_center(g1)) else {
        return;
    };

    let mut delta = center1 - center0;
    let mut distance = delta.norm();
    if distance == 0. {
        delta = Vector::new(PUSH_EPSILON, 0.);
        distance = PUSH_EPSILON;
    }
    let direction = delta / distance;

    for body in g0.iter_mut() {
        body.velocity += direction * speed;
    }
    for body in g1.iter_mut() {
        body.velocity -= direction * speed;
    }
}

#[cfg(feature = "randomization")]
pub use random::*;

#[cfg(feature = "randomization")]
mod random {
    use std::f64::consts::PI;

    use rand::{rngs::ThreadRng, Rng};
    use rand_distr::{Distribution, Uniform};

    use super::*;
    use crate::{gravity::G, universe::Color};

    pub const SOLAR_MASS: f64 = 1.989e30;
    pub const SOLAR_RADIUS: f64 = 696_340_000.;
    /// Mass of the black hole at the center of every galaxy.
    pub const CENTRAL_MASS: f64 = 4e6 * SOLAR_MASS;

    /// Creates a disk galaxy around a central black hole.
    ///
    /// The first body is the black hole at `center`. Every further body is a
    /// star at a distance uniformly drawn from `[radius / 2, radius]` with
    /// the velocity of a circular orbit around the black hole.
    #[derive(Clone, Debug)]
    pub struct GalaxyCreator<R: Rng> {
        rng: R,
        center: Vector,
        central_mass: f64,
        star_mass: f64,
        gravitational_constant: f64,
        radial_distr: Uniform<f64>,
        angular_distr: Uniform<f64>,
        first_body: bool,
    }

    impl GalaxyCreator<ThreadRng> {
        pub fn new(center: Vector, radius: f64) -> Self {
            Self::rng(center, radius, rand::thread_rng())
        }
    }

    impl<R: Rng> GalaxyCreator<R> {
        pub fn rng(center: Vector, radius: f64, rng: R) -> Self {
            Self {
                rng,
                center,
                central_mass: CENTRAL_MASS,
                star_mass: SOLAR_MASS,
                gravitational_constant: G,
                radial_distr: Uniform::new_inclusive(radius / 2., radius),
                angular_distr: Uniform::new(0., 2. * PI),
                first_body: true,
            }
        }

        #[must_use]
        pub fn central_mass(mut self, central_mass: f64) -> Self {
            self.central_mass = central_mass;
            self
        }

        #[must_use]
        pub fn star_mass(mut self, star_mass: f64) -> Self {
            self.star_mass = star_mass;
            self
        }

        #[must_use]
        pub fn gravitational_constant(mut self, gravitational_constant: f64) -> Self {
            self.gravitational_constant = gravitational_constant;
            self
        }
    }

    impl<R: Rng> BodyCreator for GalaxyCreator<R> {
        fn create_body(&mut self) -> Body {
            if self.first_body {
                self.first_body = false;

                return Body::new(self.central_mass, self.center, Vector::zeros())
                    .with_radius(10. * SOLAR_RADIUS)
                    .with_color(Color::new(255, 80, 40));
            }

            let r = self.radial_distr.sample(&mut self.rng);
            let phi = self.angular_distr.sample(&mut self.rng);
            let position = self.center + Vector::new(phi.cos(), phi.sin()) * r;

            let speed = (self.gravitational_constant * self.central_mass / r).sqrt();
            let velocity = Vector::new(-phi.sin(), phi.cos()) * speed;

            Body::new(self.star_mass, position, velocity).with_radius(SOLAR_RADIUS)
        }
    }

    /// A black hole at `(x, y)` orbited by `num_stars` stars within `radius`.
    pub fn initialize_galaxy(
        num_stars: usize,
        radius: f64,
        x: f64,
        y: f64,
        rng: &mut impl Rng,
    ) -> Galaxy {
        GalaxyCreator::rng(Vector::new(x, y), radius, rng).create_bodies(num_stars + 1)
    }

}
