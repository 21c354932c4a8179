use crate::preprocessing::PreprocessingError;
use ndarray::{concatenate, Array2, Axis};

/// Numeric feature matrix with encoded class labels.
///
/// `x` has shape `(n_samples, n_features)`; `y[i]` is the class index of row `i`.
#[derive(Clone, Debug, PartialEq)]
pub struct InMemoryDataset {
    x: Array2<f64>,
    y: Vec<usize>,
}

impl InMemoryDataset {
    pub fn new(x: Array2<f64>, y: Vec<usize>) -> Result<Self, PreprocessingError> {
        if x.nrows() != y.len() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} labels", x.nrows()),
                got: format!("{} labels", y.len()),
            });
        }
        if x.nrows() == 0 {
            return Err(PreprocessingError::EmptyData("Dataset is empty".into()));
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &[usize] {
        &self.y
    }

    pub fn n_samples(&self) -> usize {
        self.y.len()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select(Axis(0), indices),
            y: indices.iter().map(|&i| self.y[i]).collect(),
        }
    }

    /// Rows of `self` followed by rows of `other`.
    pub fn concat(&self, other: &Self) -> Result<Self, PreprocessingError> {
        if self.n_features() != other.n_features() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features(),
                got_features: other.n_features(),
            });
        }
        let x = concatenate(Axis(0), &[self.x.view(), other.x.view()]).map_err(|e| {
            PreprocessingError::InvalidShape {
                expected: format!("{} columns", self.n_features()),
                got: e.to_string(),
            }
        })?;
        let mut y = self.y.clone();
        y.extend_from_slice(&other.y);
        Ok(Self { x, y })
    }

    /// Number of samples per class index, for classes `0..n_classes`.
    pub fn class_counts(&self, n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; n_classes];
        for &label in &self.y {
            if label < n_classes {
                counts[label] += 1;
            }
        }
        counts
    }

    /// Whether any feature value is NaN.
    pub fn has_missing(&self) -> bool {
        self.x.iter().any(|v| v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_validates_lengths() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(InMemoryDataset::new(x.clone(), vec![0]).is_err());
        assert!(InMemoryDataset::new(x, vec![0, 1]).is_ok());
    }

    #[test]
    fn test_new_rejects_empty() {
        let x = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            InMemoryDataset::new(x, vec![]),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_select_and_concat() {
        let ds = InMemoryDataset::new(array![[1.0], [2.0], [3.0]], vec![0, 1, 1]).unwrap();
        let picked = ds.select(&[2, 0]);
        assert_eq!(picked.y(), &[1, 0]);
        assert_eq!(picked.x()[[0, 0]], 3.0);

        let joined = picked.concat(&ds).unwrap();
        assert_eq!(joined.n_samples(), 5);
        assert_eq!(joined.class_counts(2), vec![2, 3]);
    }
}
