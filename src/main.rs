mod cli;
mod disc;
mod extract;
mod filename;
mod files;
mod filetype;
mod objectdb;
mod printing;
mod region;
mod stronghelp;
mod util;

use cli::{Cli, LogLevel};
use extract::Extraction;
use files::LocalDisc;
use objectdb::ReportMode;
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr};
use std::process::ExitCode;
use tracing::{Event, Level, Subscriber, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

struct StrongexExitCode;

impl StrongexExitCode {
    /// Exit code used for any reported error, including damaged free space in
    /// an otherwise readable manual. Usage errors exit through clap with 2.
    fn any_error() -> ExitCode {
        ExitCode::from(1)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    match run(&cli) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err}");
            StrongexExitCode::any_error()
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut extraction = Extraction::open(&cli.source, &cli.out)?;

    let free_space_damaged = match extraction.free_space_error() {
        Some(err) => {
            error!("Free space in the manual is damaged: {err}");
            true
        }
        None => false,
    };

    let mode = if cli.all {
        ReportMode::All
    } else {
        ReportMode::Interesting
    };

    let report = extraction.report(mode)?;
    printing::print_report(&report);

    if cli.update {
        extraction.update(&mut LocalDisc, cli.fingerprint.as_deref())?;
    } else if !report.summary.is_identical() {
        println!();
        println!("Fingerprint: {}", report.fingerprint);

        info!(
            "Run 'strongex --source {} --out {} --update --fingerprint {}' to apply these changes.",
            cli.source.display(),
            cli.out.display(),
            report.fingerprint
        );
    }

    if free_space_damaged {
        return Ok(StrongexExitCode::any_error());
    }

    Ok(ExitCode::SUCCESS)
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    let filter = match log_level {
        Some(level) => EnvFilter::new(level.as_filter()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level(verbose))),
    };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::DEBUG => write!(writer, "ðŸ” ")?,
                Level::INFO => write!(writer, "â„¹ï¸ ")?,
                Level::WARN => write!(writer, "âš ï¸  ")?,
                Level::ERROR => write!(writer, "âŒï¸ ")?,
                _ => {}
            }
        } else {
            match *event.metadata().level() {
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => {}
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
