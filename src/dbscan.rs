//! Density-based clustering of weighted points.
//!
//! A point's weight counts as that many co-located copies of it when counting neighbors, without the copies ever
//! being materialized. Points are visited in input order and clusters are expanded breadth-first with neighbors
//! taken in ascending input order, so the result only depends on the input. A border point reachable from several
//! clusters belongs to the one that reached it first.

use std::collections::VecDeque;

/// A point that can be clustered by [`Dbscan`].
pub trait WeightedPoint<const D: usize> {
    fn coordinates(&self) -> [f32; D];

    fn weight(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan<const D: usize> {
    radius: f32,
    min_neighbors: u32,
    multipliers: [f32; D],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Noise,
    Cluster(usize),
}

struct Neighborhood<'a, const D: usize> {
    points: &'a [[f32; D]],
    weights: Vec<u32>,
    // indices sorted along the first axis, used to prune the neighbor search
    sweep: Vec<usize>,
    radius: f32,
}

impl<const D: usize> Dbscan<D> {
    /// A point is a core point when more than `min_neighbors` points lie within `radius` of it, distances being
    /// measured after scaling each axis by its multiplier.
    pub fn new(radius: f32, min_neighbors: u32, multipliers: [f32; D]) -> Self {
        Self {
            radius,
            min_neighbors,
            multipliers,
        }
    }

    /// Returns the disjoint clusters found in `points` as ascending lists of indices into `points`, in the order the
    /// clusters were discovered. Noise points are not part of any cluster.
    pub fn clusters<P>(&self, points: &[P]) -> Vec<Vec<usize>>
    where
        P: WeightedPoint<D>,
    {
        let labels = self.labels(points);
        let count = labels
            .iter()
            .filter_map(|label| match label {
                Label::Cluster(id) => Some(id + 1),
                Label::Noise => None,
            })
            .max()
            .unwrap_or(0);

        let mut clusters = vec![Vec::new(); count];
        for (index, label) in labels.into_iter().enumerate() {
            if let Label::Cluster(id) = label {
                clusters[id].push(index);
            }
        }

        clusters
    }

    /// Labels every point either as noise or with the id of its cluster. Cluster ids are assigned consecutively
    /// from zero.
    pub fn labels<P>(&self, points: &[P]) -> Vec<Label>
    where
        P: WeightedPoint<D>,
    {
        let scaled = points
            .iter()
            .map(|point| {
                let mut coordinates = point.coordinates();
                for (coordinate, multiplier) in coordinates.iter_mut().zip(self.multipliers) {
                    *coordinate *= multiplier;
                }
                coordinates
            })
            .collect::<Vec<_>>();
        let neighborhood = Neighborhood::new(&scaled, points.iter().map(|point| point.weight()).collect(), self.radius);

        let mut labels = vec![Label::Noise; points.len()];
        let mut assigned = vec![false; points.len()];
        let mut next_cluster = 0;

        for seed in 0..points.len() {
            if assigned[seed] {
                continue;
            }

            let seed_neighbors = neighborhood.neighbors(seed);
            if !self.is_core(&neighborhood, seed, &seed_neighbors) {
                continue;
            }

            let cluster = next_cluster;
            next_cluster += 1;

            labels[seed] = Label::Cluster(cluster);
            assigned[seed] = true;

            let mut queue = VecDeque::new();
            queue.push_back(seed_neighbors);

            while let Some(neighbors) = queue.pop_front() {
                for neighbor in neighbors {
                    if assigned[neighbor] {
                        continue;
                    }

                    labels[neighbor] = Label::Cluster(cluster);
                    assigned[neighbor] = true;

                    // border points join the cluster but only core points extend it
                    let next = neighborhood.neighbors(neighbor);
                    if self.is_core(&neighborhood, neighbor, &next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        labels
    }

    fn is_core(&self, neighborhood: &Neighborhood<'_, D>, index: usize, neighbors: &[usize]) -> bool {
        let co_located = neighborhood.weights[index].saturating_sub(1) as u64;
        let around = neighbors
            .iter()
            .map(|&neighbor| neighborhood.weights[neighbor] as u64)
            .sum::<u64>();

        co_located + around > self.min_neighbors as u64
    }
}

impl<'a, const D: usize> Neighborhood<'a, D> {
    fn new(points: &'a [[f32; D]], weights: Vec<u32>, radius: f32) -> Self {
        let mut sweep = (0..points.len()).collect::<Vec<_>>();
        sweep.sort_by(|&lhs, &rhs| first_axis(&points[lhs]).total_cmp(&first_axis(&points[rhs])));

        Self {
            points,
            weights,
            sweep,
            radius,
        }
    }

    /// Indices of every other point within the radius, in ascending order.
    fn neighbors(&self, index: usize) -> Vec<usize> {
        let point = &self.points[index];
        let origin = first_axis(point);
        let radius_squared = self.radius * self.radius;

        let start = self
            .sweep
            .partition_point(|&other| first_axis(&self.points[other]) < origin - self.radius);

        let mut neighbors = self.sweep[start..]
            .iter()
            .copied()
            .take_while(|&other| first_axis(&self.points[other]) <= origin + self.radius)
            .filter(|&other| other != index && squared_distance(point, &self.points[other]) <= radius_squared)
            .collect::<Vec<_>>();

        neighbors.sort_unstable();
        neighbors
    }
}

fn first_axis<const D: usize>(point: &[f32; D]) -> f32 {
    point.first().copied().unwrap_or(0.0)
}

fn squared_distance<const D: usize>(lhs: &[f32; D], rhs: &[f32; D]) -> f32 {
    lhs.iter().zip(rhs).map(|(a, b)| (a - b) * (a - b)).sum()
}
