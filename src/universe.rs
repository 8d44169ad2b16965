use crate::vector::Vector;

/// Display color of a body. The engine never looks at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A point mass.
///
/// `radius` and `color` only matter for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub position: Vector,
    pub velocity: Vector,
    pub acceleration: Vector,
    pub mass: f64,
    pub radius: f64,
    pub color: Color,
}

impl Body {
    #[must_use]
    pub fn new(mass: f64, position: Vector, velocity: Vector) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector::zeros(),
            mass,
            radius: 0.,
            color: Color::default(),
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// One snapshot of the simulation: a square domain `[0, width] x [0, width]`
/// and the bodies in it.
///
/// A body is identified by its index, which stays the same across the
/// snapshots of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    width: f64,
    pub(crate) bodies: Vec<Body>,
}

impl Universe {
    #[must_use]
    pub fn new(width: f64, bodies: Vec<Body>) -> Self {
        Self { width, bodies }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Whether `position` lies in the domain, borders included.
    #[must_use]
    pub fn contains(&self, position: &Vector) -> bool {
        position.x >= 0.
            && position.x <= self.width
            && position.y >= 0.
            && position.y <= self.width
    }

    /// Total mass and center of mass of the bodies inside the domain.
    ///
    /// Returns `None` if there is no mass inside the domain.
    #[must_use]
    pub fn center_of_mass(&self) -> Option<(f64, Vector)> {
        let (mass, weighted) = self
            .bodies
            .iter()
            .filter(|body| self.contains(&body.position))
            .fold((0., Vector::zeros()), |(m_acc, pos_acc), body| {
                (m_acc + body.mass, pos_acc + body.position * body.mass)
            });

        (mass > 0.).then(|| (mass, weighted / mass))
    }
}
