use crate::vector::{distance, Vector};

/// Gravitational constant in SI units.
pub const G: f64 = 6.67408e-11;

/// Newtonian force on a mass `mass1` at `position1` exerted by a mass `mass2`
/// at `position2`.
///
/// Coincident positions exert no force.
#[must_use]
pub fn force(g: f64, mass1: f64, position1: &Vector, mass2: f64, position2: &Vector) -> Vector {
    let (dx, dy, d) = distance(position2, position1);
    if d == 0. {
        return Vector::zeros();
    }

    let f = g * mass1 * mass2 / (d * d);
    Vector::new(f * dx / d, f * dy / d)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn attractive() {
        let f = force(G, 1., &Vector::new(1., 0.), 1., &Vector::new(-1., 0.));

        assert!(f.x < 0.);
        assert_abs_diff_eq!(f.y, 0.);
    }

    #[test]
    fn inverse_square() {
        let near = force(1., 2., &Vector::zeros(), 3., &Vector::new(0., 1.));
        let far = force(1., 2., &Vector::zeros(), 3., &Vector::new(0., 2.));

        assert_abs_diff_eq!(near, Vector::new(0., 6.));
        assert_abs_diff_eq!(near.norm() / far.norm(), 4., epsilon = 1e-12);
    }

    #[test]
    fn newton_third_law() {
        let p1 = Vector::new(3., -1.);
        let p2 = Vector::new(-2., 5.);

        let f12 = force(G, 7e10, &p1, 2e9, &p2);
        let f21 = force(G, 2e9, &p2, 7e10, &p1);
        assert_relative_eq!(f12, -f21, max_relative = 1e-12);
    }

    #[test]
    fn coincident_is_zero() {
        let p = Vector::new(4., 4.);
        assert_eq!(force(G, 1e30, &p, 1e30, &p), Vector::zeros());
    }
}
