use serde::{Deserialize, Serialize};
use std::fmt;

/// Precision, recall, F1 and support of one class (or an average).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics with accuracy, macro and weighted averages.
///
/// Ratios with a zero denominator are reported as 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl ClassificationReport {
    /// `labels[i]` names class code `i`.
    pub fn new(y_true: &[usize], y_pred: &[usize], labels: &[String]) -> Self {
        let n = y_true.len();
        let classes: Vec<ClassMetrics> = labels
            .iter()
            .enumerate()
            .map(|(class, label)| {
                let tp = y_true
                    .iter()
                    .zip(y_pred)
                    .filter(|&(&t, &p)| t == class && p == class)
                    .count();
                let predicted = y_pred.iter().filter(|&&p| p == class).count();
                let support = y_true.iter().filter(|&&t| t == class).count();
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall == 0.0 {
                    0.0
                } else {
                    2.0 * precision * recall / (precision + recall)
                };
                ClassMetrics {
                    label: label.clone(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        let k = classes.len().max(1) as f64;
        let macro_avg = ClassMetrics {
            label: "macro avg".to_string(),
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
            support: n,
        };
        let total = n.max(1) as f64;
        let weighted = |f: fn(&ClassMetrics) -> f64| {
            classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total
        };
        let weighted_avg = ClassMetrics {
            label: "weighted avg".to_string(),
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: n,
        };

        Self {
            accuracy: super::accuracy(y_true, y_pred),
            classes,
            macro_avg,
            weighted_avg,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.chars().count())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(0);
        let row = |f: &mut fmt::Formatter<'_>, m: &ClassMetrics| {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label,
                m.precision,
                m.recall,
                m.f1,
                m.support,
                width = width
            )
        };

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "",
            "precision",
            "recall",
            "f1-score",
            "support",
            width = width
        )?;
        writeln!(f)?;
        for class in &self.classes {
            row(f, class)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.macro_avg.support,
            width = width
        )?;
        row(f, &self.macro_avg)?;
        row(f, &self.weighted_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        vec!["nem sempre".to_string(), "sempre".to_string()]
    }

    #[test]
    fn test_per_class_metrics() {
        let y_true = [0, 0, 0, 1, 1];
        let y_pred = [0, 0, 1, 1, 0];
        let report = ClassificationReport::new(&y_true, &y_pred, &labels());

        let c0 = &report.classes[0];
        assert!((c0.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((c0.recall - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(c0.support, 3);
        let c1 = &report.classes[1];
        assert!((c1.precision - 0.5).abs() < 1e-9);
        assert!((c1.recall - 0.5).abs() < 1e-9);
        assert!((report.accuracy - 0.6).abs() < 1e-9);
        assert!((report.macro_avg.f1 - (2.0 / 3.0 + 0.5) / 2.0).abs() < 1e-9);
        assert!((report.weighted_avg.recall - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_division_is_zero() {
        let report = ClassificationReport::new(&[0, 0], &[0, 0], &labels());
        assert_eq!(report.classes[1].precision, 0.0);
        assert_eq!(report.classes[1].recall, 0.0);
        assert_eq!(report.classes[1].f1, 0.0);
    }

    #[test]
    fn test_display_layout() {
        let report = ClassificationReport::new(&[0, 1], &[0, 1], &labels());
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].ends_with("precision    recall  f1-score   support"));
        assert_eq!(lines[2], "  nem sempre       1.00      1.00      1.00         1");
        assert!(lines[5].starts_with("    accuracy"));
        assert!(lines[7].starts_with("weighted avg"));
    }
}
