// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands `train`, `evaluate` and `fractions`
// and all their configurable flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{train_use_case::TrainConfig, BackendKind};
use crate::domain::eval_set::EvalSetSpec;
use crate::infra::layout::ExperimentLayout;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a classifier and track the fraction of class A per epoch
    Train(TrainArgs),

    /// Evaluate the latest checkpoint of an experiment on its evaluation sets
    Evaluate(EvaluateArgs),

    /// Print the fraction-of-class-A history of an experiment
    Fractions(ExperimentArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    /// GPU via wgpu
    Wgpu,
    /// CPU via ndarray
    Ndarray,
}

impl From<BackendArg> for BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Wgpu    => BackendKind::Wgpu,
            BackendArg::Ndarray => BackendKind::NdArray,
        }
    }
}

/// Locates an experiment's results.
#[derive(Args, Debug)]
pub struct ExperimentArgs {
    /// Project root; results go to <root>/results
    #[arg(long, default_value = ".")]
    pub root: String,

    /// Name that keys the log, checkpoint and fraction files
    #[arg(long, default_value = "baseline")]
    pub experiment_title: String,
}

impl ExperimentArgs {
    pub fn layout(&self) -> ExperimentLayout {
        ExperimentLayout::new(&self.root, &self.experiment_title)
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Use this data directory instead of the one saved with the run
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Also print the full classification report of every set
    #[arg(long)]
    pub report: bool,
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub experiment: ExperimentArgs,

    /// Directory with the CIFAR-10 binary batches
    #[arg(long, default_value = "data/cifar-10-batches-bin")]
    pub data_dir: String,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// DataLoader worker threads
    #[arg(long, default_value_t = 4)]
    pub num_workers: usize,

    /// Seeds the backend, the shuffle and the training subsample
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Log the running average loss every N steps
    #[arg(long, default_value_t = 100)]
    pub log_interval: usize,

    /// The class whose share of predictions is tracked
    #[arg(long, default_value_t = 5)]
    pub class_a_index: usize,

    #[arg(long, default_value_t = 10)]
    pub num_classes: usize,

    /// Evaluation set as NAME=C1,C2,...; repeat for several sets
    #[arg(
        long = "eval-set",
        value_name = "NAME=CLASSES",
        default_values = ["catdog=3,5", "other8=0,1,2,4,6,7,8,9"]
    )]
    pub eval_sets: Vec<EvalSetSpec>,

    /// Width of the hidden fully-connected layer
    #[arg(long, default_value_t = 512)]
    pub hidden_size: usize,

    #[arg(long, default_value_t = 0.5)]
    pub dropout: f64,

    /// Train on at most this many randomly chosen images
    #[arg(long)]
    pub max_train_samples: Option<usize>,

    #[arg(long, value_enum, default_value_t = BackendArg::Wgpu)]
    pub backend: BackendArg,

    /// Continue from the experiment's checkpoint if one exists
    #[arg(long)]
    pub resume: bool,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            root:              a.experiment.root,
            experiment_title:  a.experiment.experiment_title,
            data_dir:          a.data_dir,
            epochs:            a.epochs,
            batch_size:        a.batch_size,
            lr:                a.lr,
            num_workers:       a.num_workers,
            seed:              a.seed,
            log_interval:      a.log_interval,
            class_a_index:     a.class_a_index,
            num_classes:       a.num_classes,
            eval_sets:         a.eval_sets,
            hidden_size:       a.hidden_size,
            dropout:           a.dropout,
            max_train_samples: a.max_train_samples,
            backend:           a.backend.into(),
        }
    }
}
