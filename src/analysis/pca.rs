//! Principal component projection.
//!
//! The corpus has far fewer documents than TF-IDF terms, so the projection
//! works on the `n × n` Gram matrix of the centered data instead of the
//! `d × d` covariance matrix. Its eigenvectors `u` give the scores directly:
//! `scores = u · sqrt(λ)`.
//!
//! Eigenpairs come from cyclic Jacobi rotations, which are exact for
//! symmetric matrices and involve no randomness, so the projection is
//! reproducible bit for bit.

use ndarray::{Array1, Array2, Axis};

const MAX_SWEEPS: usize = 100;
/// Eigenvalues below this (relative to the largest) are treated as zero.
const RANK_EPS: f64 = 1e-12;

/// Projection onto the leading principal components.
#[derive(Debug, Clone)]
pub struct Pca {
    n_components: usize,
}

impl Pca {
    pub fn new(n_components: usize) -> Self {
        Self { n_components }
    }

    /// Project the rows of `data` onto the leading components.
    ///
    /// Returns an `n × n_components` matrix. Components beyond the rank of
    /// the centered data are all zero. Each component's sign is chosen so
    /// that its largest-magnitude loading is positive.
    pub fn fit_transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let n = data.nrows();
        let mut scores = Array2::<f64>::zeros((n, self.n_components));
        if n == 0 || data.ncols() == 0 {
            return scores;
        }

        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(data.ncols()));
        let centered = data - &mean;
        let gram = centered.dot(&centered.t());
        let (eigenvalues, eigenvectors) = symmetric_eigen(&gram);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]).then(a.cmp(&b)));
        let largest = eigenvalues[order[0]].max(0.0);

        for (component, &idx) in order.iter().take(self.n_components).enumerate() {
            let lambda = eigenvalues[idx];
            if lambda <= RANK_EPS * largest.max(1.0) {
                continue;
            }
            let u = eigenvectors.column(idx);
            let loadings = centered.t().dot(&u);
            let flip = loadings
                .iter()
                .fold((0.0f64, 1.0f64), |(best, sign), &v| {
                    if v.abs() > best {
                        (v.abs(), v.signum())
                    } else {
                        (best, sign)
                    }
                })
                .1;
            let scale = lambda.sqrt() * flip;
            scores
                .column_mut(component)
                .assign(&u.mapv(|x| x * scale));
        }
        scores
    }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Returns eigenvalues (unsorted) and the matrix whose columns are the
/// matching unit eigenvectors.
pub fn symmetric_eigen(matrix: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = matrix.nrows();
    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);
    let scale = matrix.iter().map(|x| x * x).sum::<f64>().sqrt();

    for _ in 0..MAX_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[[i, j]] * a[[i, j]])
            .sum();
        if off.sqrt() <= 1e-14 * scale || off == 0.0 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}
