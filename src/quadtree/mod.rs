use crate::{universe::Body, vector::Vector, Universe};

mod barnes_hut;

pub use barnes_hut::BarnesHut;

/// Number of times a sector may be halved. Bodies that still share a leaf at
/// this depth are stored together in a [`Contents::Merged`] node.
pub const MAX_DEPTH: usize = 64;

/// One of the four children of a sector, in the order they are stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Direction {
    pub const ALL: [Self; 4] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthWest,
        Self::SouthEast,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// An axis-aligned square given by its lower-left corner and side length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrant {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl Quadrant {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self { x, y, width }
    }

    /// Split into four squares of half the width, ordered like [`Direction::ALL`].
    #[must_use]
    pub fn subdivide(&self) -> [Self; 4] {
        Direction::ALL.map(|direction| self.child(direction))
    }

    #[must_use]
    pub fn child(&self, direction: Direction) -> Self {
        let half = self.width / 2.;
        let (x, y) = match direction {
            Direction::NorthWest => (self.x, self.y + half),
            Direction::NorthEast => (self.x + half, self.y + half),
            Direction::SouthWest => (self.x, self.y),
            Direction::SouthEast => (self.x + half, self.y),
        };
        Self::new(x, y, half)
    }

    /// The child a position belongs to.
    ///
    /// Points on a mid line go to the upper or right child.
    #[must_use]
    pub fn find_quadrant(&self, position: &Vector) -> Direction {
        let mid_x = self.x + self.width / 2.;
        let mid_y = self.y + self.width / 2.;

        match (position.x < mid_x, position.y < mid_y) {
            (true, false) => Direction::NorthWest,
            (false, false) => Direction::NorthEast,
            (true, true) => Direction::SouthWest,
            (false, true) => Direction::SouthEast,
        }
    }

    /// Whether `position` lies in the square, borders included.
    #[must_use]
    pub fn contains(&self, position: &Vector) -> bool {
        position.x >= self.x
            && position.x <= self.x + self.width
            && position.y >= self.y
            && position.y <= self.y + self.width
    }
}

/// A mass concentrated in one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointMass {
    pub mass: f64,
    pub position: Vector,
}

impl PointMass {
    #[must_use]
    pub fn new(mass: f64, position: Vector) -> Self {
        Self { mass, position }
    }

    /// Total mass and center of mass.
    ///
    /// Without any mass the result has zero mass and sits at the origin.
    #[must_use]
    pub fn aggregate(point_masses: impl IntoIterator<Item = Self>) -> Self {
        let (mass, weighted) = point_masses
            .into_iter()
            .fold((0., Vector::zeros()), |(m_acc, pos_acc), pm| {
                (m_acc + pm.mass, pos_acc + pm.position * pm.mass)
            });

        if mass > 0. {
            Self::new(mass, weighted / mass)
        } else {
            Self::new(0., Vector::zeros())
        }
    }
}

impl From<&Body> for PointMass {
    fn from(body: &Body) -> Self {
        Self::new(body.mass, body.position)
    }
}

/// What a node holds. Bodies are referenced by their index in the snapshot.
#[derive(Clone, Debug)]
pub enum Contents {
    Empty,
    Leaf(usize),
    Internal {
        children: Box<[Node; 4]>,
        aggregate: PointMass,
    },
    /// Bodies that could not be separated before [`MAX_DEPTH`].
    Merged {
        bodies: Vec<usize>,
        aggregate: PointMass,
    },
}

#[derive(Clone, Debug)]
pub struct Node {
    sector: Quadrant,
    contents: Contents,
}

impl Node {
    #[must_use]
    pub fn sector(&self) -> &Quadrant {
        &self.sector
    }

    #[must_use]
    pub fn contents(&self) -> &Contents {
        &self.contents
    }

    #[must_use]
    pub fn children(&self) -> Option<&[Node; 4]> {
        match &self.contents {
            Contents::Internal { children, .. } => Some(children),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children().is_none()
    }

    /// The mass this node exerts on bodies outside of it.
    ///
    /// `None` for empty nodes.
    #[must_use]
    pub fn point_mass(&self, bodies: &[Body]) -> Option<PointMass> {
        match &self.contents {
            Contents::Empty => None,
            Contents::Leaf(index) => Some(PointMass::from(&bodies[*index])),
            Contents::Internal { aggregate, .. } | Contents::Merged { aggregate, .. } => {
                Some(*aggregate)
            }
        }
    }

    /// Number of bodies stored below this node.
    #[must_use]
    pub fn num_bodies(&self) -> usize {
        match &self.contents {
            Contents::Empty => 0,
            Contents::Leaf(_) => 1,
            Contents::Internal { children, .. } => children.iter().map(Node::num_bodies).sum(),
            Contents::Merged { bodies, .. } => bodies.len(),
        }
    }

    /// Indices of the stored bodies in depth-first order.
    pub fn depth_first_search(&self, indices: &mut Vec<usize>) {
        match &self.contents {
            Contents::Empty => {}
            Contents::Leaf(index) => indices.push(*index),
            Contents::Internal { children, .. } => {
                for child in children.iter() {
                    child.depth_first_search(indices);
                }
            }
            Contents::Merged { bodies, .. } => indices.extend_from_slice(bodies),
        }
    }
}

/// Node shape while bodies are still being inserted. Masses are only
/// attached once the shape is final, see [`Cell::into_node`].
#[derive(Debug, Default)]
enum Cell {
    #[default]
    Empty,
    Leaf(usize),
    Split(Box<[Cell; 4]>),
    Merged(Vec<usize>),
}

impl Cell {
    fn insert(&mut self, sector: &Quadrant, depth: usize, index: usize, bodies: &[Body]) {
        match self {
            Cell::Empty => *self = Cell::Leaf(index),
            Cell::Leaf(previous) => {
                let previous = *previous;
                if depth >= MAX_DEPTH {
                    *self = Cell::Merged(vec![previous, index]);
                    return;
                }

                *self = Cell::Split(Box::default());
                self.insert(sector, depth, previous, bodies);
                self.insert(sector, depth, index, bodies);
            }
            Cell::Split(children) => {
                let direction = sector.find_quadrant(&bodies[index].position);
                children[direction.index()].insert(
                    &sector.child(direction),
                    depth + 1,
                    index,
                    bodies,
                );
            }
            Cell::Merged(indices) => indices.push(index),
        }
    }

    fn into_node(self, sector: Quadrant, bodies: &[Body]) -> Node {
        let contents = match self {
            Cell::Empty => Contents::Empty,
            Cell::Leaf(index) => Contents::Leaf(index),
            Cell::Split(children) => {
                let [nw, ne, sw, se] = *children;
                let [s_nw, s_ne, s_sw, s_se] = sector.subdivide();
                let children = [
                    nw.into_node(s_nw, bodies),
                    ne.into_node(s_ne, bodies),
                    sw.into_node(s_sw, bodies),
                    se.into_node(s_se, bodies),
                ];
                let aggregate =
                    PointMass::aggregate(children.iter().filter_map(|c| c.point_mass(bodies)));

                Contents::Internal {
                    children: Box::new(children),
                    aggregate,
                }
            }
            Cell::Merged(indices) => {
                let aggregate =
                    PointMass::aggregate(indices.iter().map(|&i| PointMass::from(&bodies[i])));

                Contents::Merged {
                    bodies: indices,
                    aggregate,
                }
            }
        };

        Node { sector, contents }
    }
}

/// Quadtree over the bodies of one snapshot that lie inside its domain.
#[derive(Clone, Debug)]
pub struct QuadTree {
    root: Node,
}

impl QuadTree {
    #[must_use]
    pub fn new(universe: &Universe) -> Self {
        let sector = Quadrant::new(0., 0., universe.width());
        let bodies = universe.bodies();

        let mut root = Cell::Empty;
        for (i, body) in bodies.iter().enumerate() {
            if universe.contains(&body.position) {
                root.insert(&sector, 0, i, bodies);
            }
        }

        Self {
            root: root.into_node(sector, bodies),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }
}
