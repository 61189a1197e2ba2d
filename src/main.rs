use anyhow::Context;
use clap::{Parser, Subcommand};
use linkspec::{
    relax, BuiltinSimilarity, ExecutionEngine, FeatureSchema, Link, Mapping, MeasuresUsed,
    NestedLoopEngine, PreviouslyPresented, PropertyMapping, Record, RecordCache, RuleTree,
};
use linkspec_learning::rank::{measures_from_rule, rank_candidates, score_candidates};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Active learning of link specifications
#[derive(Parser, Debug)]
#[command(name = "linkspec")]
#[command(about = "Learn and calibrate link specifications", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the feature names derived from a property mapping
    Schema {
        /// JSON file with string_pairs / date_pairs / pointset_pairs
        #[arg(short, long)]
        mapping: PathBuf,
    },
    /// Relax the thresholds of a rule tree and print the result
    Relax {
        /// JSON file holding a rule tree
        #[arg(short, long)]
        rule: PathBuf,
    },
    /// Rank the next examples for the oracle
    Rank {
        /// JSON file with source, target, rule and presented links
        #[arg(short, long)]
        session: PathBuf,

        /// Number of examples to select
        #[arg(short, long, default_value_t = 10)]
        batch_size: usize,
    },
}

/// Input of the `rank` command
#[derive(Deserialize, Debug)]
struct RankInput {
    source: Vec<Record>,
    target: Vec<Record>,
    /// Learned rule, relaxed before execution
    rule: RuleTree,
    /// Defaults to the atoms of `rule`
    #[serde(default)]
    measures_used: Option<MeasuresUsed>,
    #[serde(default)]
    presented: Vec<Link>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Schema { mapping } => {
            let mapping: PropertyMapping = read_json(&mapping)?;
            let schema = FeatureSchema::build(&mapping)?;
            info!(features = schema.len(), "Built feature schema");
            for name in schema.attribute_names() {
                println!("{}", name);
            }
        }
        Command::Relax { rule } => {
            let rule: RuleTree = read_json(&rule)?;
            rule.validate()?;
            let relaxed = relax(&rule);
            info!(rule = %rule, relaxed = %relaxed, "Relaxed rule");
            println!("{}", serde_json::to_string_pretty(&relaxed)?);
        }
        Command::Rank {
            session,
            batch_size,
        } => {
            let input: RankInput = read_json(&session)?;
            input.rule.validate()?;

            let source = RecordCache::from_records(input.source);
            let target = RecordCache::from_records(input.target);
            let measures_used = input
                .measures_used
                .unwrap_or_else(|| measures_from_rule(&input.rule));
            let presented = PreviouslyPresented::from(&input.presented.into_iter().collect::<Mapping>());

            let relaxed = relax(&input.rule);
            let accepted = NestedLoopEngine::new(BuiltinSimilarity).execute(&relaxed, &source, &target);
            let candidates = score_candidates(&accepted, &source, &target, &measures_used, &BuiltinSimilarity);
            let batch = rank_candidates(candidates, &presented, batch_size);

            info!(
                accepted = accepted.len(),
                selected = batch.len(),
                "Ranked candidates"
            );
            println!("{}", serde_json::to_string_pretty(&batch)?);
        }
    }

    Ok(())
}
