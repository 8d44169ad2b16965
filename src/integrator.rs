//! Velocity Verlet time stepping.
//!
//! The new acceleration has to be computed from the state at the start of the
//! step. Velocity then uses the mean of old and new acceleration, position
//! uses the old velocity and old acceleration:
//!
//! ```text
//! v_(i+1) = v_i + (a_(i+1) + a_i) dt / 2
//! x_(i+1) = x_i + v_i dt + a_i dt^2 / 2
//! ```

use crate::{universe::Body, vector::Vector};

#[must_use]
pub fn update_velocity(
    old_velocity: &Vector,
    new_acceleration: &Vector,
    old_acceleration: &Vector,
    time_step: f64,
) -> Vector {
    old_velocity + (new_acceleration + old_acceleration) * (0.5 * time_step)
}

#[must_use]
pub fn update_position(
    old_position: &Vector,
    old_velocity: &Vector,
    old_acceleration: &Vector,
    time_step: f64,
) -> Vector {
    old_position + old_velocity * time_step + old_acceleration * (0.5 * time_step * time_step)
}

/// Advance `body` by one time step given the acceleration computed for its
/// current state.
pub fn advance(body: &mut Body, new_acceleration: Vector, time_step: f64) {
    let old_acceleration = body.acceleration;
    let old_velocity = body.velocity;

    body.acceleration = new_acceleration;
    body.velocity = update_velocity(
        &old_velocity,
        &new_acceleration,
        &old_acceleration,
        time_step,
    );
    body.position = update_position(
        &body.position,
        &old_velocity,
        &old_acceleration,
        time_step,
    );
}
