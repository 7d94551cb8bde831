use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

mod help_text;

/// Extract StrongHelp manuals into folders and keep them in sync
#[derive(Parser, Debug)]
#[command(name = "strongex", version, about, long_about = help_text::ROOT_LONG_ABOUT)]
pub struct Cli {
    /// StrongHelp manual to read
    #[arg(short, long, value_name = "FILE")]
    pub source: PathBuf,

    /// Folder to extract the manual into
    #[arg(short, long, value_name = "FOLDER")]
    pub out: PathBuf,

    /// Update the output folder to match the manual
    #[arg(short, long)]
    pub update: bool,

    /// Include unchanged objects in the report
    #[arg(short, long)]
    pub all: bool,

    /// Log more about what is happening (-v for progress, -vv for detail)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log level, overriding -v and RUST_LOG
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Only update if the changes match this fingerprint from an earlier report
    #[arg(long, value_name = "FINGERPRINT", requires = "update")]
    pub fingerprint: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
