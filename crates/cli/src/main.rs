use clap::{Parser, Subcommand};
use predictor_core::constants::{
    DEFAULT_DATASET_PATH, DEFAULT_MODEL_PATH, DEFAULT_SPLIT_SEED, DEFAULT_TEST_RATIO,
    DEFAULT_TREE_COUNT,
};
use predictor_core::model::ForestConfig;
use predictor_core::trainer::{train, TrainConfig};
use predictor_core::{Dataset, ModelArtifact, PredictionService};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "predictor")]
#[command(about = "Diabetes predictor model tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model from a labelled CSV and save it
    Train {
        /// Labelled dataset CSV
        #[arg(long, default_value = DEFAULT_DATASET_PATH)]
        dataset: PathBuf,
        /// Output model file
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        /// Number of trees
        #[arg(long, default_value_t = DEFAULT_TREE_COUNT)]
        trees: usize,
        /// Max tree depth
        #[arg(long, default_value_t = ForestConfig::default().max_depth)]
        max_depth: usize,
        /// Fraction of rows held out for evaluation
        #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
        test_ratio: f64,
        /// Seed for the train/test shuffle
        #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
        seed: u64,
    },
    /// Score one record, given as Field=value pairs
    Predict {
        /// Model file
        #[arg(long, default_value = DEFAULT_MODEL_PATH)]
        model: PathBuf,
        /// Measurements, e.g. Glucose=148 BMI=33.6 Age=50
        fields: Vec<String>,
    },
    /// Summarise a dataset
    Inspect {
        /// Dataset CSV
        #[arg(long, default_value = DEFAULT_DATASET_PATH)]
        dataset: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("predictor_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            dataset,
            model,
            trees,
            max_depth,
            test_ratio,
            seed,
        } => {
            let mut config = TrainConfig::new(dataset, model);
            config.test_ratio = test_ratio;
            config.split_seed = seed;
            config.forest.n_trees = trees;
            config.forest.max_depth = max_depth;

            let report = train(&config)?;
            println!("Model saved as {}", report.model_path.display());
            println!(
                "Trained on {} rows, evaluated on {}",
                report.train_samples, report.test_samples
            );
            match report.accuracy {
                Some(accuracy) => println!("Model Accuracy: {:.2}%", accuracy * 100.0),
                None => println!("Model Accuracy: n/a (no test rows)"),
            }
        }
        Commands::Predict { model, fields } => {
            let artifact = ModelArtifact::load(&model)?;
            let service = PredictionService::new(Arc::new(artifact));
            let fields = parse_pairs(&fields)?;

            match service.diagnose_form(&fields) {
                Ok(prediction) => {
                    let risk = prediction.risk();
                    println!("{}", prediction.diagnosis.summary());
                    println!(
                        "Future risk: {} ({:.2})",
                        risk.future_risk_level, risk.future_risk_score
                    );
                }
                Err(e) => {
                    println!("{}", e.diabetes_type());
                    eprintln!("{}", e);
                }
            }
        }
        Commands::Inspect { dataset } => {
            let data = Dataset::load_csv(&dataset)?;
            let positives = data.positive_count();
            println!("Rows: {}", data.n_samples());
            println!(
                "Outcome: {} diabetic, {} non-diabetic ({:.1}% positive)",
                positives,
                data.n_samples() - positives,
                positives as f64 * 100.0 / data.n_samples() as f64
            );
        }
    }

    Ok(())
}

/// Split `Field=value` arguments into a form-field map.
fn parse_pairs(pairs: &[String]) -> anyhow::Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| anyhow::anyhow!("expected Field=value, got {:?}", pair))
        })
        .collect()
}
