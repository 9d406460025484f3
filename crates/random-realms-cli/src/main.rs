mod commands;
mod config;
mod failures;
mod registry;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use random_realms_generate::{GenerationError, Ridiculousness};
use random_realms_store::StoreError;
use thiserror::Error;

use config::{ConfigError, GenerateSettings};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "random-realms",
    version,
    about = "Generate random Realm files",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a random Realm file (the default).
    Generate(GenerateArgs),
    /// Rewrite sync labels of RealmFile records in an admin realm.
    MigrateLabels(MigrateLabelsArgs),
    /// Print a realm file as JSON.
    Dump(DumpArgs),
}

#[derive(Args, Debug, Clone, Default)]
struct GenerateArgs {
    /// Directory to put the realm file in.
    #[arg(value_name = "OUTPUT_DIR")]
    output_directory: Option<PathBuf>,
    /// Seed for the pseudo-random generator.
    #[arg(short, long, conflicts_with = "endlessly")]
    seed: Option<String>,
    /// Run the generator in a loop until interrupted.
    #[arg(short, long)]
    endlessly: bool,
    /// Print more information.
    #[arg(short, long)]
    verbose: bool,
    /// Compare dumps of the generated file across engine versions.
    #[arg(short = 'u', long)]
    check_upgrade: bool,
    /// How unusual names get: low, medium or high.
    #[arg(short = 'r', long, value_name = "LEVEL")]
    name_ridiculousness: Option<Ridiculousness>,
    #[arg(long, value_name = "N")]
    max_object_count: Option<u64>,
    #[arg(long, value_name = "BYTES")]
    max_data_size: Option<usize>,
    #[arg(long, value_name = "N")]
    max_list_elements: Option<usize>,
    #[arg(long, value_name = "N")]
    max_object_schemas: Option<usize>,
    #[arg(long, value_name = "N")]
    max_properties: Option<usize>,
    /// TOML config file (defaults to random-realms.toml if present).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl GenerateArgs {
    fn overrides(&self) -> GenerateSettings {
        GenerateSettings {
            name_ridiculousness: self.name_ridiculousness,
            max_object_count: self.max_object_count,
            max_data_size: self.max_data_size,
            max_list_elements: self.max_list_elements,
            max_object_schemas: self.max_object_schemas,
            max_properties: self.max_properties,
            ..GenerateSettings::default()
        }
    }
}

#[derive(Args, Debug)]
struct MigrateLabelsArgs {
    /// Admin realm file holding RealmFile records.
    #[arg(long, value_name = "PATH")]
    admin_realm: PathBuf,
    /// JSON file mapping realm paths to sync labels.
    #[arg(short, long, value_name = "FILE")]
    labels_path: PathBuf,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Realm file to dump.
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Generate(args)) => commands::generate::run(args).await,
        Some(Command::MigrateLabels(args)) => commands::migrate::run(args),
        Some(Command::Dump(args)) => commands::dump::run(args),
        None => commands::generate::run(cli.generate).await,
    }
}
