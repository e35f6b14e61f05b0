//! Vector helpers shared by both recommenders.

use aprender::primitives::Vector;
use aprender::text::similarity::cosine_similarity;

/// Cosine similarity; zero, empty or mismatched vectors score 0.
pub fn cosine(a: &Vector<f64>, b: &Vector<f64>) -> f64 {
    cosine_similarity(a, b).unwrap_or(0.0)
}

/// Column-wise mean of a set of rows. Empty input gives an empty vector.
pub fn mean_vector(rows: &[Vector<f64>]) -> Vector<f64> {
    let Some(first) = rows.first() else {
        return Vector::from_vec(Vec::new());
    };
    let mut sum = vec![0.0; first.len()];
    for row in rows {
        for (acc, value) in sum.iter_mut().zip(row.as_slice()) {
            *acc += value;
        }
    }
    let n = rows.len() as f64;
    Vector::from_vec(sum.into_iter().map(|s| s / n).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(values: &[f64]) -> Vector<f64> {
        Vector::from_slice(values)
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        assert!((cosine(&v(&[1.0, 2.0]), &v(&[2.0, 4.0])) - 1.0).abs() < 1e-12);
        assert_eq!(cosine(&v(&[1.0, 0.0]), &v(&[0.0, 3.0])), 0.0);
    }

    #[test]
    fn test_cosine_zero_and_empty_vectors() {
        assert_eq!(cosine(&v(&[0.0, 0.0]), &v(&[0.0, 0.0])), 0.0);
        assert_eq!(cosine(&v(&[0.0, 0.0]), &v(&[1.0, 1.0])), 0.0);
        assert_eq!(cosine(&v(&[]), &v(&[])), 0.0);
    }

    #[test]
    fn test_mean_vector() {
        let mean = mean_vector(&[v(&[1.0, 0.0]), v(&[3.0, 2.0])]);
        assert_eq!(mean.as_slice(), &[2.0, 1.0]);
        assert!(mean_vector(&[]).is_empty());
    }
}
