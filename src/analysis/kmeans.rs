//! K-means clustering.
//!
//! Lloyd's algorithm with k-means++ seeding, restarted `n_init` times from a
//! single seeded generator; the run with the lowest inertia wins. With the
//! same seed and input, labels are identical across runs.

use crate::error::PipelineError;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// K-means parameters.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    n_init: usize,
    max_iter: usize,
    tol: f64,
    seed: u64,
}

/// Result of the best k-means run.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster label per sample, in `[0, k)`.
    pub labels: Vec<usize>,
    /// Sum of squared distances from samples to their centroid.
    pub inertia: f64,
    /// Lloyd iterations of the winning run.
    pub iterations: usize,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            seed: 42,
        }
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Cluster the rows of `data`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InsufficientData`] when `k == 0` or there are fewer
    /// rows than clusters.
    #[instrument(level = "debug", skip_all, fields(k = self.k, samples = data.nrows()))]
    pub fn fit(&self, data: &Array2<f64>) -> Result<KMeansFit, PipelineError> {
        let n = data.nrows();
        if self.k == 0 || n < self.k {
            return Err(PipelineError::InsufficientData {
                samples: n,
                k: self.k,
            });
        }

        let tolerance = scaled_tolerance(data, self.tol);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;

        for run in 0..self.n_init {
            let init = init_plus_plus(data, self.k, &mut rng);
            let fit = lloyd(data, init, self.max_iter, tolerance);
            debug!(run, inertia = fit.inertia, iterations = fit.iterations, "k-means run");
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }

        // n_init >= 1, so at least one run happened.
        best.ok_or(PipelineError::InsufficientData {
            samples: n,
            k: self.k,
        })
    }
}

fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// `tol` relative to the mean per-feature variance of `data`.
fn scaled_tolerance(data: &Array2<f64>, tol: f64) -> f64 {
    if data.ncols() == 0 {
        return 0.0;
    }
    let variances = data.var_axis(Axis(0), 0.0);
    variances.mean().unwrap_or(0.0) * tol
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the closest chosen centroid.
fn init_plus_plus(data: &Array2<f64>, k: usize, rng: &mut StdRng) -> Array2<f64> {
    let n = data.nrows();
    let mut centroids = Array2::<f64>::zeros((k, data.ncols()));

    let first = rng.random_range(0..n);
    centroids.row_mut(0).assign(&data.row(first));
    let mut closest: Vec<f64> = (0..n)
        .map(|i| squared_distance(data.row(i), data.row(first)))
        .collect();

    for c in 1..k {
        let total: f64 = closest.iter().sum();
        let chosen = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut pick = n - 1;
            for (i, d) in closest.iter().enumerate() {
                if target < *d {
                    pick = i;
                    break;
                }
                target -= d;
            }
            pick
        } else {
            rng.random_range(0..n)
        };

        centroids.row_mut(c).assign(&data.row(chosen));
        for (i, best) in closest.iter_mut().enumerate() {
            let d = squared_distance(data.row(i), data.row(chosen));
            if d < *best {
                *best = d;
            }
        }
    }
    centroids
}

/// Nearest centroid for every sample; ties go to the lowest index.
fn assign(data: &Array2<f64>, centroids: &Array2<f64>) -> (Vec<usize>, Array1<f64>) {
    let n = data.nrows();
    let mut labels = vec![0usize; n];
    let mut distances = Array1::<f64>::zeros(n);
    for (i, sample) in data.rows().into_iter().enumerate() {
        let mut min_dist = f64::INFINITY;
        for (j, centroid) in centroids.rows().into_iter().enumerate() {
            let d = squared_distance(sample, centroid);
            if d < min_dist {
                min_dist = d;
                labels[i] = j;
            }
        }
        distances[i] = min_dist;
    }
    (labels, distances)
}

fn lloyd(data: &Array2<f64>, mut centroids: Array2<f64>, max_iter: usize, tolerance: f64) -> KMeansFit {
    let k = centroids.nrows();
    let mut iterations = 0;

    for _ in 0..max_iter {
        iterations += 1;
        let (labels, distances) = assign(data, &centroids);

        let mut sums = Array2::<f64>::zeros(centroids.raw_dim());
        let mut counts = vec![0usize; k];
        for (i, &label) in labels.iter().enumerate() {
            sums.row_mut(label).zip_mut_with(&data.row(i), |a, &b| *a += b);
            counts[label] += 1;
        }

        // Empty clusters take the samples farthest from their centroids.
        let mut far: Vec<usize> = (0..data.nrows()).collect();
        far.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]).then(a.cmp(&b)));
        let mut far = far.into_iter();
        for j in 0..k {
            if counts[j] == 0 {
                if let Some(i) = far.next() {
                    sums.row_mut(j).assign(&data.row(i));
                    counts[j] = 1;
                }
            }
        }

        let mut new_centroids = sums;
        for (j, mut row) in new_centroids.rows_mut().into_iter().enumerate() {
            let count = counts[j].max(1) as f64;
            row.mapv_inplace(|v| v / count);
        }

        let shift: f64 = centroids
            .rows()
            .into_iter()
            .zip(new_centroids.rows())
            .map(|(old, new)| squared_distance(old, new))
            .sum();
        centroids = new_centroids;
        if shift <= tolerance {
            break;
        }
    }

    let (labels, distances) = assign(data, &centroids);
    KMeansFit {
        labels,
        inertia: distances.sum(),
        iterations,
    }
}
