use super::{Contents, Node, PointMass, QuadTree};
use crate::{
    gravity,
    universe::Body,
    vector::{distance, Vector},
    Execution, Solver, Universe,
};

/// Barnes-Hut approximation with opening angle `theta`.
///
/// A node of width `s` at distance `d` is replaced by its aggregate mass if
/// `s / d < theta`. `theta = 0` opens every node and reproduces the direct sum.
#[derive(Clone, Copy, Debug)]
pub struct BarnesHut {
    theta: f64,
}

impl BarnesHut {
    #[must_use]
    pub fn new(theta: f64) -> Self {
        Self { theta }
    }

    #[must_use]
    pub fn theta(&self) -> f64 {
        self.theta
    }
}

impl Solver for BarnesHut {
    fn calculate_accelerations(
        &self,
        universe: &Universe,
        accelerations: &mut [Vector],
        gravitational_constant: f64,
        execution: Execution,
    ) {
        let tree = QuadTree::new(universe);
        let bodies = universe.bodies();

        execution.fill(accelerations, |i| {
            tree.acceleration(bodies, i, self.theta, gravitational_constant)
        });
    }
}

impl QuadTree {
    /// Net force on `bodies[target]`.
    ///
    /// Bodies outside of the domain are not part of the tree and feel nothing.
    #[must_use]
    pub fn net_force(&self, bodies: &[Body], target: usize, theta: f64, g: f64) -> Vector {
        if !self.root.sector.contains(&bodies[target].position) {
            return Vector::zeros();
        }
        self.root.net_force(bodies, target, theta, g)
    }

    #[must_use]
    pub fn acceleration(&self, bodies: &[Body], target: usize, theta: f64, g: f64) -> Vector {
        let mass = bodies[target].mass;
        if mass == 0. {
            return Vector::zeros();
        }
        self.net_force(bodies, target, theta, g) / mass
    }
}

impl Node {
    fn net_force(&self, bodies: &[Body], target: usize, theta: f64, g: f64) -> Vector {
        let body = &bodies[target];
        let mut force = Vector::zeros();

        match &self.contents {
            Contents::Empty => {}
            Contents::Leaf(index) => {
                if *index != target {
                    let source = &bodies[*index];
                    force += gravity::force(
                        g,
                        body.mass,
                        &body.position,
                        source.mass,
                        &source.position,
                    );
                }
            }
            Contents::Internal {
                children,
                aggregate,
            } => {
                if aggregate.mass == 0. {
                    return force;
                }

                if self.is_far(aggregate, &body.position, theta) {
                    force += gravity::force(
                        g,
                        body.mass,
                        &body.position,
                        aggregate.mass,
                        &aggregate.position,
                    );
                } else {
                    // near field, go deeper into tree
                    for child in children.iter() {
                        force += child.net_force(bodies, target, theta, g);
                    }
                }
            }
            Contents::Merged {
                bodies: members,
                aggregate,
            } => {
                if aggregate.mass == 0. {
                    return force;
                }

                if self.is_far(aggregate, &body.position, theta) {
                    force += gravity::force(
                        g,
                        body.mass,
                        &body.position,
                        aggregate.mass,
                        &aggregate.position,
                    );
                } else {
                    for &index in members.iter().filter(|&&index| index != target) {
                        let source = &bodies[index];
                        force += gravity::force(
                            g,
                            body.mass,
                            &body.position,
                            source.mass,
                            &source.position,
                        );
                    }
                }
            }
        }

        force
    }

    /// Opening criterion. A node containing the position is never far, so a
    /// body is never attracted by an aggregate that includes itself.
    fn is_far(&self, aggregate: &PointMass, position: &Vector, theta: f64) -> bool {
        if self.sector.contains(position) {
            return false;
        }

        let (_, _, d) = distance(&aggregate.position, position);
        d > 0. && self.sector.width / d < theta
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::{direct_summation::DirectSummation, gravity::G};

    fn body(mass: f64, x: f64, y: f64) -> Body {
        Body::new(mass, Vector::new(x, y), Vector::zeros())
    }

    fn accelerations(solver: &impl Solver, universe: &Universe) -> Vec<Vector> {
        let mut acc = vec![Vector::zeros(); universe.len()];
        solver.calculate_accelerations(universe, &mut acc, G, Execution::SingleThreaded);
        acc
    }

    #[test]
    fn symmetry() {
        let universe = Universe::new(4., vec![body(1e6, 1., 2.), body(1e6, 3., 2.)]);
        let acc = accelerations(&BarnesHut::new(0.5), &universe);

        assert!(acc[0].x > 0.);
        assert_abs_diff_eq!(acc[0], -acc[1]);
    }

    #[test]
    fn theta_zero_is_exact() {
        let universe = Universe::new(
            1e3,
            vec![
                body(5.97e24, 100., 200.),
                body(7.35e22, 850., 640.),
                body(1.99e30, 420., 910.),
            ],
        );
        let bodies = universe.bodies();
        let acc = accelerations(&BarnesHut::new(0.), &universe);

        for (i, a) in acc.iter().enumerate() {
            let mut expected = Vector::zeros();
            for (j, other) in bodies.iter().enumerate() {
                if i != j {
                    expected += gravity::force(
                        G,
                        bodies[i].mass,
                        &bodies[i].position,
                        other.mass,
                        &other.position,
                    );
                }
            }
            expected /= bodies[i].mass;

            assert_relative_eq!(*a, expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn brute_force() {
        let bodies = (0..50)
            .map(|i| {
                let i = i as f64;
                body(1e3 + 10. * i, (37. * i) % 100., (53. * i + 11.) % 100.)
            })
            .collect();
        let universe = Universe::new(100., bodies);

        let ds = accelerations(&DirectSummation, &universe);
        let bh = accelerations(&BarnesHut::new(0.), &universe);

        for (d, b) in ds.into_iter().zip(bh) {
            assert_relative_eq!(d, b, epsilon = 1e-18, max_relative = 1e-9);
        }
    }

    #[test]
    fn distant_cluster_is_aggregated() {
        // three bodies close together in the north east, one target far away
        let universe = Universe::new(
            1024.,
            vec![
                body(1., 1., 1.),
                body(10., 1000., 1000.),
                body(20., 1010., 1000.),
                body(30., 1000., 1010.),
            ],
        );
        let tree = QuadTree::new(&universe);
        let bodies = universe.bodies();

        let cluster = PointMass::aggregate(bodies[1..].iter().map(PointMass::from));
        let approximated = gravity::force(
            1.,
            bodies[0].mass,
            &bodies[0].position,
            cluster.mass,
            &cluster.position,
        );

        assert_relative_eq!(
            tree.net_force(bodies, 0, 0.5, 1.),
            approximated,
            max_relative = 1e-12
        );

        // an opening angle of zero sums the three bodies individually
        let exact = tree.net_force(bodies, 0, 0., 1.);
        assert!((exact - approximated).norm() > 0.);
        assert_relative_eq!(exact, approximated, max_relative = 1e-3);
    }

    #[test]
    fn own_node_is_always_opened() {
        // one body per quadrant, so only the nodes holding the target could
        // be aggregated
        let universe = Universe::new(
            10.,
            vec![body(1e9, 2., 2.), body(3e9, 7., 2.), body(2e9, 2., 7.)],
        );

        let exact = accelerations(&DirectSummation, &universe);
        for theta in [10., 1e3] {
            let bh = accelerations(&BarnesHut::new(theta), &universe);
            for (e, b) in exact.iter().zip(&bh) {
                assert_relative_eq!(*e, *b, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn outside_bodies_feel_nothing() {
        let universe = Universe::new(
            10.,
            vec![body(1e10, 5., 5.), body(1e10, 12., 5.), body(1e10, 2., 5.)],
        );
        let acc = accelerations(&BarnesHut::new(0.5), &universe);

        assert_eq!(acc[1], Vector::zeros());
        assert_abs_diff_eq!(acc[0], -acc[2]);
    }

    #[test]
    fn coincident_bodies() {
        let universe = Universe::new(
            10.,
            vec![body(1e10, 3., 3.), body(1e10, 3., 3.), body(1e10, 7., 3.)],
        );
        let acc = accelerations(&BarnesHut::new(0.5), &universe);

        // the pair only feels the third body
        let expected = G * 1e10 / 16.;
        assert_relative_eq!(acc[0], Vector::new(expected, 0.), max_relative = 1e-12);
        assert_relative_eq!(acc[1], Vector::new(expected, 0.), max_relative = 1e-12);
        assert_relative_eq!(acc[2], Vector::new(-2. * expected, 0.), max_relative = 1e-12);
    }

    #[test]
    fn single_body_is_at_rest() {
        let universe = Universe::new(10., vec![body(1., 5., 5.)]);
        assert_eq!(accelerations(&BarnesHut::new(0.5), &universe), vec![Vector::zeros()]);
    }

    #[test]
    fn execution_modes_agree() {
        let bodies = (0..64)
            .map(|i| {
                let i = i as f64;
                body(1e8 * (1. + i), (17. * i) % 64. + 0.5, (29. * i) % 64. + 0.5)
            })
            .collect();
        let universe = Universe::new(64., bodies);
        let bh = BarnesHut::new(0.7);

        let single = accelerations(&bh, &universe);

        let mut multi = vec![Vector::zeros(); universe.len()];
        bh.calculate_accelerations(
            &universe,
            &mut multi,
            G,
            Execution::Multithreaded { num_threads: 3 },
        );

        assert_eq!(single, multi);

        #[cfg(feature = "rayon")]
        {
            let mut rayon = vec![Vector::zeros(); universe.len()];
            bh.calculate_accelerations(&universe, &mut rayon, G, Execution::RayonIter);
            assert_eq!(single, rayon);
        }
    }
}
