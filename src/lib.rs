pub mod creator;
pub mod direct_summation;
pub mod gravity;
pub mod integrator;
pub mod loader;
pub mod quadtree;
pub mod scenario;
pub mod universe;
pub mod vector;

use std::thread;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub use direct_summation::DirectSummation;
pub use quadtree::{BarnesHut, QuadTree};
pub use universe::{Body, Color, Universe};
pub use vector::Vector;

/// How the accelerations of one generation are distributed over threads.
///
/// Every mode computes the same accelerations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    SingleThreaded,
    /// Split the bodies into `num_threads` chunks, each handled by a scoped thread.
    Multithreaded { num_threads: usize },
    /// Let Rayon distribute the bodies.
    #[cfg(feature = "rayon")]
    RayonIter,
}

impl Execution {
    /// Set `out[i] = f(i)` for every index.
    pub(crate) fn fill<F>(self, out: &mut [Vector], f: F)
    where
        F: Fn(usize) -> Vector + Sync,
    {
        match self {
            Execution::SingleThreaded => {
                out.iter_mut().enumerate().for_each(|(i, a)| *a = f(i));
            }
            Execution::Multithreaded { num_threads } => {
                let chunk_size = out.len().div_ceil(num_threads.max(1)).max(1);

                thread::scope(|s| {
                    for (c, chunk) in out.chunks_mut(chunk_size).enumerate() {
                        let f = &f;
                        s.spawn(move || {
                            for (j, a) in chunk.iter_mut().enumerate() {
                                *a = f(c * chunk_size + j);
                            }
                        });
                    }
                });
            }
            #[cfg(feature = "rayon")]
            Execution::RayonIter => {
                out.par_iter_mut().enumerate().for_each(|(i, a)| *a = f(i));
            }
        }
    }
}

/// Computes the acceleration of every body of a snapshot.
pub trait Solver {
    /// Write the acceleration of `universe.bodies()[i]` to `accelerations[i]`.
    fn calculate_accelerations(
        &self,
        universe: &Universe,
        accelerations: &mut [Vector],
        gravitational_constant: f64,
        execution: Execution,
    );
}

/// Generation loop: build the solver's view of a snapshot, compute
/// accelerations, integrate, repeat.
#[derive(Clone, Debug)]
pub struct Simulation<S: Solver> {
    solver: S,
    gravitational_constant: f64,
    execution: Execution,
}

impl<S: Solver> Simulation<S> {
    #[must_use]
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            gravitational_constant: gravity::G,
            execution: Execution::SingleThreaded,
        }
    }

    #[must_use]
    pub fn gravitational_constant(mut self, gravitational_constant: f64) -> Self {
        self.gravitational_constant = gravitational_constant;
        self
    }

    #[must_use]
    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Calculate the forces with multiple threads sharing one tree.
    #[must_use]
    pub fn multithreaded(self, num_threads: usize) -> Self {
        self.execution(Execution::Multithreaded { num_threads })
    }

    /// Use Rayon to calculate the forces, splitting the bodies.
    #[cfg(feature = "rayon")]
    #[must_use]
    pub fn rayon_iter(self) -> Self {
        self.execution(Execution::RayonIter)
    }

    #[must_use]
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Compute the snapshot following `current`.
    ///
    /// `accelerations` is scratch space, resized to one entry per body.
    pub fn step(
        &self,
        current: &Universe,
        time_step: f64,
        accelerations: &mut Vec<Vector>,
    ) -> Universe {
        accelerations.resize(current.len(), Vector::zeros());
        self.solver.calculate_accelerations(
            current,
            accelerations,
            self.gravitational_constant,
            self.execution,
        );

        let mut next = current.clone();
        for (body, &acc) in next.bodies.iter_mut().zip(accelerations.iter()) {
            integrator::advance(body, acc, time_step);
        }
        next
    }

    /// Run `num_generations` steps.
    ///
    /// Returns `num_generations + 1` snapshots, the first one being a copy of
    /// `initial`.
    #[must_use]
    pub fn simulate(
        &self,
        initial: &Universe,
        num_generations: usize,
        time_step: f64,
    ) -> Vec<Universe> {
        let mut snapshots = Vec::with_capacity(num_generations + 1);
        snapshots.push(initial.clone());

        let mut accelerations = vec![Vector::zeros(); initial.len()];
        for _ in 0..num_generations {
            let next = self.step(&snapshots[snapshots.len() - 1], time_step, &mut accelerations);
            snapshots.push(next);
        }

        snapshots
    }
}

/// Simulate `num_generations` steps of size `time_step` with the Barnes-Hut
/// approximation and opening angle `theta`.
#[must_use]
pub fn barnes_hut(
    initial: &Universe,
    num_generations: usize,
    time_step: f64,
    theta: f64,
) -> Vec<Universe> {
    Simulation::new(BarnesHut::new(theta)).simulate(initial, num_generations, time_step)
}
