//! Standardised k-means over guest feature rows.
//!
//! Scaling and clustering are aprender's `StandardScaler` and `KMeans`;
//! this module only shapes the rows into a matrix and caps the cluster
//! count at the number of rows.

use aprender::cluster::KMeans;
use aprender::preprocessing::StandardScaler;
use aprender::primitives::Matrix;
use aprender::traits::{Transformer, UnsupervisedEstimator};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusteringError {
    #[error("Feature rows do not form a matrix: {0}")]
    Shape(String),

    #[error("Feature scaling failed: {0}")]
    Scale(String),

    #[error("K-means failed: {0}")]
    Fit(String),
}

/// Labels and diagnostics of one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterFit {
    /// Cluster label per input row
    pub labels: Vec<usize>,
    /// Clusters actually used, `min(k, rows)`
    pub n_clusters: usize,
    pub inertia: f32,
    pub n_iter: usize,
}

/// Seeded k-means on standardised features.
#[derive(Debug, Clone)]
pub struct StandardizedKMeans {
    n_clusters: usize,
    random_state: u64,
}

impl StandardizedKMeans {
    pub fn new(n_clusters: usize, random_state: u64) -> Self {
        Self {
            n_clusters,
            random_state,
        }
    }

    /// Standardise `rows` (population std, constant columns centred to 0)
    /// and cluster them.
    ///
    /// With fewer rows than requested clusters the effective cluster count
    /// drops to the number of rows, so labels stay in `[0, min(k, rows))`.
    pub fn fit(&self, rows: &[Vec<f64>]) -> Result<ClusterFit, ClusteringError> {
        let k = self.n_clusters.min(rows.len());
        if k == 0 {
            return Ok(ClusterFit {
                labels: vec![0; rows.len()],
                n_clusters: 0,
                inertia: 0.0,
                n_iter: 0,
            });
        }

        let features = to_matrix(rows)?;
        let mut scaler = StandardScaler::new();
        let scaled = scaler
            .fit_transform(&features)
            .map_err(|e| ClusteringError::Scale(e.to_string()))?;

        let mut kmeans = KMeans::new(k).with_random_state(self.random_state);
        kmeans
            .fit(&scaled)
            .map_err(|e| ClusteringError::Fit(e.to_string()))?;

        Ok(ClusterFit {
            labels: kmeans.predict(&scaled),
            n_clusters: k,
            inertia: kmeans.inertia(),
            n_iter: kmeans.n_iter(),
        })
    }
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<Matrix<f32>, ClusteringError> {
    let n_features = rows.first().map_or(0, Vec::len);
    let data: Vec<f32> = rows
        .iter()
        .flat_map(|row| row.iter().map(|&v| v as f32))
        .collect();
    Matrix::from_vec(rows.len(), n_features, data)
        .map_err(|e| ClusteringError::Shape(e.to_string()))
}
