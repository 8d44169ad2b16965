use nalgebra::Vector2;

/// Positions, velocities, accelerations and forces all live in the plane.
pub type Vector = Vector2<f64>;

/// Difference `p1 - p2` split into its components together with its length.
#[must_use]
pub fn distance(p1: &Vector, p2: &Vector) -> (f64, f64, f64) {
    let delta = p1 - p2;
    (delta.x, delta.y, delta.norm())
}
