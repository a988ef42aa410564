use clap::{Parser, Subcommand, ValueEnum};
use linklet_shortener::lifecycle::DEFAULT_VALIDITY_MINUTES;
use linklet_shortener::settings::{DEFAULT_BASE_URL, DEFAULT_REDIRECT_DELAY};
use linklet_storage::DEFAULT_STORAGE_KEY;
use linklet_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "LINKLET_DATA_DIR";
pub const STORAGE_KEY_ENV: &str = "LINKLET_STORAGE_KEY";
pub const BASE_URL_ENV: &str = "LINKLET_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "LINKLET_LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = ".linklet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "linklet", about = "Create, follow and expire short links")]
pub struct Cli {
    #[arg(long, global = true, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    #[arg(
        long,
        global = true,
        env = STORAGE_KEY_ENV,
        default_value = DEFAULT_STORAGE_KEY,
    )]
    pub storage_key: String,

    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shorten a URL.
    Shorten {
        url: String,
        /// Use this code instead of a generated one.
        #[arg(long)]
        code: Option<String>,
        /// Minutes until the link expires.
        #[arg(long, default_value_t = DEFAULT_VALIDITY_MINUTES, allow_negative_numbers = true)]
        validity: i64,
    },
    /// List every stored link.
    List,
    /// Show collection statistics.
    Stats,
    /// Follow a short code after the redirect delay, recording a click.
    Open {
        code: String,
        /// Referrer recorded with the click.
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value_t = DEFAULT_REDIRECT_DELAY.as_millis() as u64)]
        delay_ms: u64,
    },
    /// Delete a link by id.
    Delete { id: String },
    /// Remove all stored links.
    Reset,
}
