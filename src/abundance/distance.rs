use super::collection::Collection;
use super::error::{AbundanceError, Result};

pub(crate) fn sum(a: &[f64]) -> f64 {
    a.iter().sum()
}

/// Column sums: one total per feature position across every vector.
pub(crate) fn feature_sums(vectors: &[Vec<f64>], features: usize) -> Vec<f64> {
    let mut sums = vec![0f64; features];
    for vector in vectors {
        for (total, value) in sums.iter_mut().zip(vector.iter()) {
            *total += value;
        }
    }
    sums
}

/// Weighted Euclidean distance between two relative vectors:
/// `sqrt(sum_f weight_f * (a_f - b_f)^2)`.
pub fn weighted_euclidean(weights: &[f64], a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(AbundanceError::Shape(format!(
            "cannot compare vectors of different length: {} and {}",
            a.len(),
            b.len()
        )));
    }
    if weights.len() != a.len() {
        return Err(AbundanceError::Shape(format!(
            "expected {} feature weights, got {}",
            a.len(),
            weights.len()
        )));
    }

    let difference_sum: f64 = weights
        .iter()
        .zip(a.iter().zip(b.iter()))
        .map(|(w, (x, y))| w * (x - y).powi(2))
        .sum();

    Ok(difference_sum.sqrt())
}

impl Collection {
    /// Distance between the vectors at positions `a` and `b`.
    pub fn distance(&self, a: usize, b: usize) -> Result<f64> {
        let relative_a = self.relative_vector(a)?;
        let relative_b = self.relative_vector(b)?;
        weighted_euclidean(self.feature_weights(), relative_a, relative_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_euclidean() {
        let weights = vec![0.5, 0.5];
        let d = weighted_euclidean(&weights, &[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!((d - 1.0).abs() < 1e-12);

        let d = weighted_euclidean(&weights, &[1.0, 0.0], &[0.5, 0.5]).unwrap();
        assert!((d - 0.5).abs() < 1e-12);

        let d = weighted_euclidean(&weights, &[0.3, 0.7], &[0.3, 0.7]).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_zero_weight_ignores_feature() {
        let weights = vec![1.0, 0.0];
        let d = weighted_euclidean(&weights, &[0.5, 0.5], &[0.5, 0.0]).unwrap();
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        let err = weighted_euclidean(&[1.0], &[1.0], &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, AbundanceError::Shape(_)));

        let err = weighted_euclidean(&[1.0], &[1.0, 0.0], &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, AbundanceError::Shape(_)));
    }

    #[test]
    fn test_feature_sums() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 2.0]];
        assert_eq!(feature_sums(&vectors, 2), vec![3.0, 3.0]);
        assert_eq!(sum(&vectors[2]), 4.0);
    }
}
