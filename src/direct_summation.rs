use crate::{gravity, vector::Vector, Execution, Solver, Universe};

/// Exact O(n²) pairwise summation.
///
/// Follows the same domain rule as [`BarnesHut`](crate::BarnesHut): bodies
/// outside the domain neither exert nor feel forces.
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectSummation;

impl Solver for DirectSummation {
    fn calculate_accelerations(
        &self,
        universe: &Universe,
        accelerations: &mut [Vector],
        gravitational_constant: f64,
        execution: Execution,
    ) {
        let bodies = universe.bodies();

        execution.fill(accelerations, |i| {
            let body = &bodies[i];
            if body.mass == 0. || !universe.contains(&body.position) {
                return Vector::zeros();
            }

            let mut force = Vector::zeros();
            for (j, other) in bodies.iter().enumerate() {
                if i == j || !universe.contains(&other.position) {
                    continue;
                }
                force += gravity::force(
                    gravitational_constant,
                    body.mass,
                    &body.position,
                    other.mass,
                    &other.position,
                );
            }
            force / body.mass
        });
    }
}
