// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and dispatches to Layer 2.
// This is the only layer that prints to stdout.
//
//   1. `train`     — train and checkpoint every epoch
//   2. `evaluate`  — reload a checkpoint and report
//   3. `fractions` — print the fraction history table
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EvaluateArgs, ExperimentArgs, TrainArgs};

use crate::application::fractions_use_case::FractionReport;

#[derive(Parser, Debug)]
#[command(
    name = "class-drift",
    version,
    about = "Train an image classifier and track the fraction of one class across held-out sets per epoch."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)     => run_train(args),
            Commands::Evaluate(args)  => run_evaluate(args),
            Commands::Fractions(args) => run_fractions(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    let resume = args.resume;
    let config = args.into();
    let use_case = TrainUseCase::new(config, resume);
    use_case.execute()?;

    println!("Training complete. Checkpoint saved.");
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    let summary = EvaluateUseCase::new(args.experiment.layout(), args.data_dir).execute()?;

    println!("Checkpoint epoch: {}", summary.epoch);
    for set in &summary.sets {
        println!(
            "{:<12} samples={:<6} accuracy={:.4} fraction_of_class_{}={:.4}",
            set.name,
            set.results.num_samples(),
            set.results.accuracy(),
            summary.class_a_index,
            set.results.fraction_of_class_a,
        );
        if args.report {
            println!("\n{}", set.results.report);
        }
    }
    Ok(())
}

fn run_fractions(args: ExperimentArgs) -> Result<()> {
    use crate::application::fractions_use_case::FractionsUseCase;

    let report = FractionsUseCase::new(args.layout()).execute()?;
    print!("{}", render_fraction_table(&report));
    Ok(())
}

/// One row per epoch, one column per evaluation set.
fn render_fraction_table(report: &FractionReport) -> String {
    let mut out = format!("fraction of class {} per epoch\n", report.class_a_index);
    out.push_str(&format!("{:>6}", "epoch"));
    for name in &report.set_names {
        out.push_str(&format!(" {:>12}", name));
    }
    out.push('\n');

    for (i, row) in report.history.rows().iter().enumerate() {
        out.push_str(&format!("{:>6}", i + 1));
        for value in row {
            out.push_str(&format!(" {:>12.4}", value));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::fraction_store::FractionHistory;

    #[test]
    fn test_train_defaults_parse() {
        let cli = Cli::try_parse_from(["class-drift", "train"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        assert_eq!(args.eval_sets.len(), 2);
        assert_eq!(args.eval_sets[0].classes, vec![3, 5]);
        assert_eq!(args.class_a_index, 5);
        assert!(!args.resume);
    }

    #[test]
    fn test_repeated_eval_sets_replace_defaults() {
        let cli = Cli::try_parse_from([
            "class-drift", "train",
            "--experiment-title", "run1",
            "--eval-set", "a=0",
            "--eval-set", "b=1,2",
            "--backend", "ndarray",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: crate::application::train_use_case::TrainConfig = args.into();
        assert_eq!(cfg.experiment_title, "run1");
        assert_eq!(cfg.eval_sets.len(), 2);
        assert_eq!(cfg.eval_sets[1].classes, vec![1, 2]);
        assert_eq!(cfg.backend, crate::application::BackendKind::NdArray);
    }

    #[test]
    fn test_bad_eval_set_is_rejected() {
        assert!(Cli::try_parse_from(["class-drift", "train", "--eval-set", "nope"]).is_err());
    }

    #[test]
    fn test_fraction_table_layout() {
        let report = FractionReport {
            class_a_index: 5,
            set_names:     vec!["catdog".to_string(), "other8".to_string()],
            history:       FractionHistory::from(vec![vec![0.5, 0.125]]),
        };
        let table = render_fraction_table(&report);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "fraction of class 5 per epoch");
        assert!(lines[1].contains("catdog") && lines[1].contains("other8"));
        assert_eq!(lines[2], "     1       0.5000       0.1250");
    }
}
