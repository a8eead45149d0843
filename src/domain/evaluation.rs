/// Everything one evaluation pass over a single evaluation set produces.
#[derive(Debug, Clone)]
pub struct EvaluationResults {
    pub y_trues: Vec<usize>,
    pub y_preds: Vec<usize>,
    /// Rendered classification report
    pub report: String,
    /// Share of predictions equal to the configured class A
    pub fraction_of_class_a: f64,
}

impl EvaluationResults {
    pub fn num_samples(&self) -> usize {
        self.y_preds.len()
    }

    pub fn accuracy(&self) -> f64 {
        if self.y_preds.is_empty() {
            return 0.0;
        }
        let correct = self
            .y_trues
            .iter()
            .zip(&self.y_preds)
            .filter(|(t, p)| t == p)
            .count();
        correct as f64 / self.y_preds.len() as f64
    }
}
