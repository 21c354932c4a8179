use crate::preprocessing::PreprocessingError;

/// Stratified K-fold cross-validation without shuffling.
///
/// Members of each class are dealt to folds in row order, round-robin; the
/// dealing position carries over from one class to the next so fold sizes
/// differ by at most one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StratifiedKFold {
    n_splits: usize,
}

impl Default for StratifiedKFold {
    fn default() -> Self {
        Self { n_splits: 5 }
    }
}

/// Train and validation row indices of one fold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub validation: Vec<usize>,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// # Errors
    /// `InvalidParameter` for fewer than 2 splits; `InsufficientSamples`
    /// when a present class has fewer members than splits.
    pub fn split(&self, y: &[usize]) -> Result<Vec<Fold>, PreprocessingError> {
        if self.n_splits < 2 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        let n_classes = y.iter().copied().max().map_or(0, |m| m + 1);
        let mut counts = vec![0usize; n_classes];
        for &label in y {
            counts[label] += 1;
        }
        for (class, &count) in counts.iter().enumerate() {
            if count > 0 && count < self.n_splits {
                return Err(PreprocessingError::InsufficientSamples {
                    class,
                    count,
                    required: self.n_splits,
                    operation: "stratified cross-validation",
                });
            }
        }

        let mut fold_of = vec![0usize; y.len()];
        let mut position = 0;
        for class in 0..n_classes {
            for (i, _) in y.iter().enumerate().filter(|&(_, &label)| label == class) {
                fold_of[i] = position % self.n_splits;
                position += 1;
            }
        }

        Ok((0..self.n_splits)
            .map(|k| {
                let (validation, train): (Vec<usize>, Vec<usize>) =
                    (0..y.len()).partition(|&i| fold_of[i] == k);
                Fold { train, validation }
            })
            .collect())
    }
}
