use std::env;

use clap::{Parser, Subcommand};

use crate::configuration;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Resolve pathogen screening data and prepare chart-ready summaries",
    long_about = "Resolves a dataset of per-year, per-pathogen test counts from the hosted \
document store, the bundled data file, or a built-in table, and prints it as a summary \
report, a source health check, or a machine-readable export.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long = "data-file",
        env = "SEROVIEW_DATA_FILE",
        default_value = configuration::DEFAULT_DATA_FILE,
        value_name = "PATH",
        help = "Bundled research data file read when the remote store is unavailable"
    )]
    pub data_file: String,

    #[arg(
        long,
        env = "FIREBASE_COLLECTION",
        default_value = configuration::DEFAULT_COLLECTION,
        value_name = "NAME",
        help = "Remote store collection holding the research documents"
    )]
    pub collection: String,

    #[arg(
        long = "base-url",
        env = "SEROVIEW_STORE_URL",
        default_value = configuration::DEFAULT_BASE_URL,
        value_name = "URL",
        help = "Base URL of the remote document store REST API"
    )]
    pub base_url: String,

    #[arg(
        long = "http-timeout-secs",
        default_value_t = configuration::DEFAULT_HTTP_TIMEOUT_SECS,
        value_name = "SECS",
        help = "Timeout for remote store requests"
    )]
    pub http_timeout_secs: u64,

    #[arg(
        long = "log-file",
        env = "SEROVIEW_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "from-year",
        value_name = "YEAR",
        help = "Keep only records from YEAR onwards"
    )]
    pub from_year: Option<i32>,

    #[arg(
        long = "to-year",
        value_name = "YEAR",
        help = "Keep only records up to YEAR (inclusive)"
    )]
    pub to_year: Option<i32>,

    #[arg(
        long = "pathogen",
        value_name = "NAME",
        help = "Keep only the named pathogen (repeat for several)"
    )]
    pub pathogens: Vec<String>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Probe every data source and report its status",
        long_about = "Try the remote store, the local data file and the built-in table \
independently and print the record count or failure for each. Advisory only: the probe \
never changes which source a later resolution picks."
    )]
    Check,
    #[command(
        about = "Write the resolved dataset in the local data file format",
        long_about = "Resolve the dataset, apply any year and pathogen filters, and write \
it as a JSON array of records suitable for use as the local data file or for handoff to \
an external presentation layer."
    )]
    Export {
        #[arg(long, value_name = "PATH", help = "Write to PATH instead of stdout")]
        output: Option<String>,
    },
    #[command(
        about = "Convert a raw lab export into the local data file format",
        long_about = "Read the pivot-grid JSON export produced by the lab reporting tool \
and convert it into the flat record format the local data file uses."
    )]
    Import {
        #[arg(long, value_name = "PATH", help = "Raw pivot-grid JSON export to read")]
        input: String,
        #[arg(long, value_name = "PATH", help = "Write to PATH instead of stdout")]
        output: Option<String>,
    },
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
