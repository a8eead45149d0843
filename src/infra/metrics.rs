// ============================================================
// Layer 6 — Classification Metrics
// ============================================================
// Per-class precision, recall, F1 and support, with overall
// accuracy and macro / weighted averages, laid out like the
// classic scikit-learn text report.
//
// Definitions for class c:
//   precision = TP / (TP + FP)
//   recall    = TP / (TP + FN)
//   f1        = 2 * P * R / (P + R)
//   support   = number of true samples of class c
//
// Any 0/0 is reported as 0.0 (zero_division = 0).
//
// The classes listed are the sorted union of true and
// predicted labels, so a class that is only ever predicted
// still gets a row (with support 0).

use std::{collections::BTreeSet, fmt};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassMetrics {
    pub label:     usize,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub support:   usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes:      Vec<ClassMetrics>,
    pub accuracy:     f64,
    pub macro_avg:    AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl ClassificationReport {
    /// Build the report from parallel label slices.
    pub fn compute(y_true: &[usize], y_pred: &[usize]) -> Self {
        debug_assert_eq!(y_true.len(), y_pred.len());

        let labels: BTreeSet<usize> = y_true.iter().chain(y_pred).copied().collect();

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .map(|&label| {
                let mut tp = 0usize;
                let mut predicted = 0usize;
                let mut support = 0usize;
                for (&t, &p) in y_true.iter().zip(y_pred) {
                    if p == label { predicted += 1; }
                    if t == label { support += 1; }
                    if t == label && p == label { tp += 1; }
                }
                let precision = ratio(tp, predicted);
                let recall    = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics { label, precision, recall, f1, support }
            })
            .collect();

        let total   = y_true.len();
        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();

        let n = classes.len().max(1) as f64;
        let macro_avg = AverageMetrics {
            precision: classes.iter().map(|c| c.precision).sum::<f64>() / n,
            recall:    classes.iter().map(|c| c.recall).sum::<f64>() / n,
            f1:        classes.iter().map(|c| c.f1).sum::<f64>() / n,
            support:   total,
        };

        let weighted = |f: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                return 0.0;
            }
            classes.iter().map(|c| f(c) * c.support as f64).sum::<f64>() / total as f64
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|c| c.precision),
            recall:    weighted(|c| c.recall),
            f1:        weighted(|c| c.f1),
            support:   total,
        };

        Self { classes, accuracy: ratio(correct, total), macro_avg, weighted_avg }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WIDTH: usize = 12;
        writeln!(
            f,
            "{:>WIDTH$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>WIDTH$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>WIDTH$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            writeln!(
                f,
                "{:>WIDTH$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}

/// Share of `preds` equal to `class`. None when there are no predictions.
pub fn fraction_of_class(preds: &[usize], class: usize) -> Option<f64> {
    if preds.is_empty() {
        return None;
    }
    let hits = preds.iter().filter(|&&p| p == class).count();
    Some(hits as f64 / preds.len() as f64)
}
