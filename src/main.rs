use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use dementia_risk::config::{flag_code, Gender, RecordLayers, Smoking};
use dementia_risk::scoring::{rank_contributions, Feature, ModelConfig, Scorer};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug, Default)]
struct ScoreArgs {
    /// Read inputs from a JSON or YAML file
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Start from an empty record instead of the model defaults.
    /// Inputs left unset then count as raw 0, not as the cohort mean.
    #[arg(long)]
    no_defaults: bool,

    /// Age in years
    #[arg(long)]
    age: Option<f64>,

    #[arg(long, value_enum)]
    gender: Option<Gender>,

    /// Years of education
    #[arg(long)]
    education_years: Option<f64>,

    /// Global cognition score (standardised, negative = below average)
    #[arg(long, allow_negative_numbers = true)]
    global: Option<f64>,

    #[arg(long, value_enum)]
    smoking: Option<Smoking>,

    /// Fazekas white matter hyperintensity score (0-3)
    #[arg(long)]
    fazekas: Option<f64>,

    /// Lacune count bucket (0-3)
    #[arg(long)]
    lacunes: Option<f64>,

    /// Diabetes (bare flag = true; `--diabetes false` clears a value from --input)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    diabetes: Option<bool>,

    /// Hypertension (bare flag = true)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    hypertension: Option<bool>,

    /// Hypercholesterolaemia (bare flag = true)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    hypercholesterolemia: Option<bool>,

    /// Cerebral microbleeds present (bare flag = true)
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    microbleeds: Option<bool>,

    /// Set any model feature by key, e.g. --set study1_rundmc=1
    #[arg(long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// Print a JSON report
    #[arg(long, conflicts_with = "tsv")]
    json: bool,

    /// Print feature/contribution pairs as tab-separated values
    #[arg(long)]
    tsv: bool,

    /// Show only the N largest contributions
    #[arg(long, value_name = "N")]
    top: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a patient record (default if no subcommand)
    Score(ScoreArgs),
    /// List the recognized input features
    Features,
    /// Print the active model as YAML
    Model,
    /// Write the built-in model to the model path for editing
    Init {
        /// Overwrite an existing model file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "dementia-risk")]
#[command(about = "Dementia risk calculator with per-feature explanations", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to model file (defaults to ~/.config/dementia-risk/model.yaml,
    /// falling back to the built-in model)
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Load and validate the model, exiting with the config code on failure.
fn load_scorer(path: Option<PathBuf>) -> (ModelConfig, Scorer) {
    let config = match dementia_risk::config::load_model(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    match Scorer::from_config(&config) {
        Ok(scorer) => (config, scorer),
        Err(e) => {
            eprintln!("Model error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

/// Collect the record sources from the command line, in override order.
fn record_layers(args: &ScoreArgs) -> Result<RecordLayers> {
    let file = match args.input {
        Some(ref path) => Some(dementia_risk::config::load_record(path)?),
        None => None,
    };

    let values = [
        (Feature::Age, args.age),
        (Feature::Gender, args.gender.map(Gender::code)),
        (Feature::EducationYears, args.education_years),
        (Feature::GlobalCognition, args.global),
        (Feature::Smoking, args.smoking.map(Smoking::code)),
        (Feature::Fazekas, args.fazekas),
        (Feature::LacuneCount, args.lacunes),
        (Feature::Diabetes, args.diabetes.map(flag_code)),
        (Feature::Hypertension, args.hypertension.map(flag_code)),
        (Feature::Hypercholesterolemia, args.hypercholesterolemia.map(flag_code)),
        (Feature::Microbleeds, args.microbleeds.map(flag_code)),
    ];

    Ok(RecordLayers {
        use_defaults: !args.no_defaults,
        file,
        values: values
            .into_iter()
            .filter_map(|(feature, value)| value.map(|v| (feature, v)))
            .collect(),
        assignments: args.assignments.clone(),
    })
}

fn run_score(config: &ModelConfig, scorer: &Scorer, args: &ScoreArgs) -> Result<()> {
    let layers = record_layers(args)?;
    let record = dementia_risk::config::build_record(config, scorer, &layers)?;
    log::debug!("Scoring record with {} inputs", record.len());

    let result = scorer.score(&record);
    let ranked = rank_contributions(&result);

    if args.json {
        println!(
            "{}",
            dementia_risk::output::format_json(&record, &result, &ranked)?
        );
    } else if args.tsv {
        println!("{}", dementia_risk::output::format_tsv(&ranked));
    } else {
        let use_colors = dementia_risk::output::should_use_colors();
        println!("{}", dementia_risk::output::format_summary(&result, use_colors));
        println!();
        println!("Feature contributions (log-odds):");
        println!(
            "{}",
            dementia_risk::output::format_breakdown(&ranked, use_colors, args.top)
        );
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Score(ScoreArgs::default()));

    match command {
        Commands::Score(args) => {
            let (config, scorer) = load_scorer(cli.model);
            if let Err(e) = run_score(&config, &scorer, &args) {
                eprintln!("Error: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        Commands::Features => {
            let use_colors = dementia_risk::output::should_use_colors();
            println!(
                "{}",
                dementia_risk::output::format_feature_catalogue(use_colors)
            );
        }
        Commands::Model => {
            let (config, _) = load_scorer(cli.model);
            match serde_saphyr::to_string(&config) {
                Ok(yaml) => print!("{}", yaml),
                Err(e) => {
                    eprintln!("Failed to serialize model: {}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            }
        }
        Commands::Init { force } => {
            let path = match cli.model {
                Some(p) => Ok(p),
                None => dementia_risk::config::get_model_path(),
            };
            let path = match path {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Config error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            if let Err(e) = dementia_risk::config::write_default_model(&path, force) {
                eprintln!("Error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            println!("Model written to {}", path.display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
