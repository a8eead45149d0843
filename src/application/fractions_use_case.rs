use anyhow::Result;

use crate::infra::{
    checkpoint::CheckpointManager,
    fraction_store::{FractionHistory, FractionStore},
    layout::ExperimentLayout,
};

/// The fraction history of a run with the names of its evaluation sets.
pub struct FractionReport {
    pub class_a_index: usize,
    pub set_names:     Vec<String>,
    pub history:       FractionHistory,
}

pub struct FractionsUseCase {
    layout: ExperimentLayout,
}

impl FractionsUseCase {
    pub fn new(layout: ExperimentLayout) -> Self {
        Self { layout }
    }

    pub fn execute(&self) -> Result<FractionReport> {
        let cfg     = CheckpointManager::new(&self.layout).load_config()?;
        let history = FractionStore::new(self.layout.fractions_file()).load()?;
        history.check_width(cfg.eval_sets.len())?;

        Ok(FractionReport {
            class_a_index: cfg.class_a_index,
            set_names:     cfg.eval_sets.iter().map(|s| s.name.clone()).collect(),
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;

    #[test]
    fn test_reads_history_with_set_names() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            root: tmp.path().display().to_string(),
            experiment_title: "run".to_string(),
            ..TrainConfig::default()
        };
        let layout = cfg.layout();
        layout.create_dirs().unwrap();
        CheckpointManager::new(&layout).save_config(&cfg).unwrap();
        FractionStore::new(layout.fractions_file())
            .save(&FractionHistory::from(vec![vec![0.4, 0.1], vec![0.5, 0.2]]))
            .unwrap();

        let report = FractionsUseCase::new(layout).execute().unwrap();
        assert_eq!(report.set_names, vec!["catdog", "other8"]);
        assert_eq!(report.history.epochs(), 2);
        assert_eq!(report.class_a_index, 5);
    }

    #[test]
    fn test_missing_run_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = ExperimentLayout::new(tmp.path(), "ghost");
        assert!(FractionsUseCase::new(layout).execute().is_err());
    }
}
