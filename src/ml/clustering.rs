//! Delivery route grouping via seeded k-means.
//!
//! Partitions 2D coordinates into a fixed number of clusters using Lloyd's
//! algorithm with a deterministic, seed-driven initialization, so identical
//! input always yields identical assignments.
//!
//! The `optimized_path` and `fuel_saved` outputs are documented placeholders:
//! the path is the input echoed in original order (no route ordering is
//! applied) and the fuel figure is `0.5 × (points − clusters)`. Both are
//! preserved exactly as the historical contract defines them.

use std::collections::BTreeMap;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::ml::forecasting::round2;

/// Fixed number of route groups.
pub const N_CLUSTERS: usize = 2;

/// Fixed seed so repeated calls with identical input agree.
const KMEANS_SEED: u64 = 42;

const MAX_ITER: usize = 300;
const TOLERANCE: f64 = 1e-4;

/// One delivery coordinate as it appears in the per-cluster listings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Result of the route-optimization routine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RouteOptimization {
    /// Points grouped by stringified cluster label.
    pub clusters: BTreeMap<String, Vec<GeoPoint>>,
    /// The input echoed back in original order, annotated only by cluster
    /// membership above. Not actually path-optimized.
    #[schema(value_type = Vec<Vec<f64>>)]
    pub optimized_path: Vec<[f64; 2]>,
    /// Placeholder heuristic: `0.5 × (point count − distinct cluster count)`.
    pub fuel_saved: f64,
}

/// Group delivery coordinates into [`N_CLUSTERS`] clusters.
///
/// # Errors
///
/// `ValidationError` if fewer coordinate pairs are supplied than the fixed
/// cluster count.
pub fn optimize_delivery(coords: &[[f64; 2]]) -> Result<RouteOptimization, ServiceError> {
    let labels = KMeans::new(N_CLUSTERS).with_seed(KMEANS_SEED).fit(coords)?;

    let mut clusters: BTreeMap<String, Vec<GeoPoint>> = BTreeMap::new();
    for (&[lat, lon], &label) in coords.iter().zip(labels.iter()) {
        clusters
            .entry(label.to_string())
            .or_default()
            .push(GeoPoint { lat, lon });
    }

    let distinct_labels = clusters.len();
    Ok(RouteOptimization {
        clusters,
        optimized_path: coords.to_vec(),
        fuel_saved: round2((coords.len() - distinct_labels) as f64 * 0.5),
    })
}

/// K-means with deterministic seeded initialization.
///
/// The first centroid is drawn from the seeded generator; the remaining ones
/// use farthest-point selection, and Lloyd iterations run until the centroid
/// movement drops below tolerance.
#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    max_iter: usize,
    tol: f64,
    seed: u64,
}

impl KMeans {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: MAX_ITER,
            tol: TOLERANCE,
            seed: 0,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Assign a cluster label to every point.
    ///
    /// # Errors
    ///
    /// `ValidationError` if there are fewer points than clusters.
    pub fn fit(&self, points: &[[f64; 2]]) -> Result<Vec<usize>, ServiceError> {
        if points.len() < self.n_clusters {
            return Err(ServiceError::ValidationError(format!(
                "clustering requires at least {} coordinate pairs, got {}",
                self.n_clusters,
                points.len()
            )));
        }

        let mut centroids = self.init_centroids(points);
        let mut labels = vec![0usize; points.len()];

        for _ in 0..self.max_iter {
            for (label, point) in labels.iter_mut().zip(points.iter()) {
                *label = nearest(point, &centroids);
            }

            let new_centroids = self.update_centroids(points, &labels, &centroids);
            let converged = centroids
                .iter()
                .zip(new_centroids.iter())
                .all(|(old, new)| dist_sq(old, new) <= self.tol * self.tol);
            centroids = new_centroids;
            if converged {
                break;
            }
        }

        for (label, point) in labels.iter_mut().zip(points.iter()) {
            *label = nearest(point, &centroids);
        }
        Ok(labels)
    }

    /// Seeded first centroid, then farthest-point selection for the rest.
    fn init_centroids(&self, points: &[[f64; 2]]) -> Vec<[f64; 2]> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = Vec::with_capacity(self.n_clusters);
        centroids.push(points[rng.gen_range(0..points.len())]);

        while centroids.len() < self.n_clusters {
            let mut best = points[0];
            let mut best_dist = -1.0;
            for point in points {
                let d = centroids
                    .iter()
                    .map(|c| dist_sq(point, c))
                    .fold(f64::INFINITY, f64::min);
                if d > best_dist {
                    best_dist = d;
                    best = *point;
                }
            }
            centroids.push(best);
        }
        centroids
    }

    fn update_centroids(
        &self,
        points: &[[f64; 2]],
        labels: &[usize],
        previous: &[[f64; 2]],
    ) -> Vec<[f64; 2]> {
        let mut sums = vec![[0.0f64; 2]; self.n_clusters];
        let mut counts = vec![0usize; self.n_clusters];
        for (point, &label) in points.iter().zip(labels.iter()) {
            sums[label][0] += point[0];
            sums[label][1] += point[1];
            counts[label] += 1;
        }

        sums.iter()
            .zip(counts.iter())
            .zip(previous.iter())
            .map(|((sum, &count), &old)| {
                if count > 0 {
                    [sum[0] / count as f64, sum[1] / count as f64]
                } else {
                    // Empty cluster keeps its previous centroid.
                    old
                }
            })
            .collect()
    }
}

fn dist_sq(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

fn nearest(point: &[f64; 2], centroids: &[[f64; 2]]) -> usize {
    let mut min_dist = f64::INFINITY;
    let mut min_cluster = 0;
    for (k, centroid) in centroids.iter().enumerate() {
        let d = dist_sq(point, centroid);
        if d < min_dist {
            min_dist = d;
            min_cluster = k;
        }
    }
    min_cluster
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_DEPOTS: [[f64; 2]; 4] = [[10.0, 20.0], [10.1, 20.1], [50.0, 60.0], [50.1, 60.1]];

    #[test]
    fn nearby_points_share_a_cluster() {
        let result = optimize_delivery(&TWO_DEPOTS).expect("clustering succeeds");
        assert_eq!(result.clusters.len(), 2);

        let labels = KMeans::new(N_CLUSTERS)
            .with_seed(42)
            .fit(&TWO_DEPOTS)
            .expect("fit succeeds");
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let first = optimize_delivery(&TWO_DEPOTS).expect("clustering succeeds");
        for _ in 0..5 {
            let again = optimize_delivery(&TWO_DEPOTS).expect("clustering succeeds");
            assert_eq!(
                serde_json::to_value(&again).unwrap(),
                serde_json::to_value(&first).unwrap()
            );
        }
    }

    #[test]
    fn path_echoes_input_in_original_order() {
        let result = optimize_delivery(&TWO_DEPOTS).expect("clustering succeeds");
        assert_eq!(result.optimized_path, TWO_DEPOTS.to_vec());
    }

    #[test]
    fn cluster_map_conserves_all_points() {
        let result = optimize_delivery(&TWO_DEPOTS).expect("clustering succeeds");
        let total: usize = result.clusters.values().map(Vec::len).sum();
        assert_eq!(total, TWO_DEPOTS.len());

        for point in TWO_DEPOTS {
            let found = result
                .clusters
                .values()
                .flatten()
                .any(|p| p.lat == point[0] && p.lon == point[1]);
            assert!(found, "point {:?} missing from cluster map", point);
        }
    }

    #[test]
    fn fuel_saved_follows_documented_formula() {
        let result = optimize_delivery(&TWO_DEPOTS).expect("clustering succeeds");
        assert_eq!(result.fuel_saved, 0.5 * (4.0 - 2.0));
    }

    #[test]
    fn too_few_points_is_a_validation_error() {
        let err = optimize_delivery(&[[10.0, 20.0]]).unwrap_err();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn coincident_points_land_in_the_same_cluster() {
        let coords = [[5.0, 5.0], [5.0, 5.0], [5.0, 5.0], [40.0, 40.0]];
        let labels = KMeans::new(N_CLUSTERS)
            .with_seed(42)
            .fit(&coords)
            .expect("fit succeeds");
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
    }

    #[test]
    fn exactly_two_points_form_two_singleton_clusters() {
        let coords = [[0.0, 0.0], [9.0, 9.0]];
        let result = optimize_delivery(&coords).expect("clustering succeeds");
        assert_eq!(result.clusters.len(), 2);
        assert!(result.clusters.values().all(|points| points.len() == 1));
        assert_eq!(result.fuel_saved, 0.0);
    }
}
