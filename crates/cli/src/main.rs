//! eicio CLI: inspect event stream files.
//!
//! - `eicio ls FILE`: headers only, payloads are skipped
//! - `eicio count FILE`: event and resync totals
//! - `eicio cat FILE [--event N]`: decoded collections
//!
//! Resyncs are reported on stderr and do not fail the command. A truncated
//! frame or I/O error exits with status 1.

mod commands;
mod format;

use std::path::Path;
use std::process;

use anyhow::Context;
use clap::ArgMatches;
use eicio_stream::{open_with_config, InputStream, EventReader, ReaderConfig, ResyncOccurred};

use commands::build_cli;
use format::{format_count, format_error, format_event, format_header, format_resync, OutputMode};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .init();

    let matches = build_cli().get_matches();

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let mut config = ReaderConfig::default();
    if let Some(max) = matches.get_one::<u64>("max-payload") {
        config = config.with_max_payload_len(*max);
    }

    let result = match matches.subcommand() {
        Some(("ls", sub)) => run_ls(file_path(sub), config, mode),
        Some(("count", sub)) => run_count(file_path(sub), config, mode),
        Some(("cat", sub)) => run_cat(
            file_path(sub),
            config,
            sub.get_one::<u64>("event").copied(),
            mode,
        ),
        _ => unreachable!("subcommand is required"),
    };

    if let Err(e) = result {
        eprintln!("{}", format_error(&format!("{:#}", e), mode));
        process::exit(1);
    }
}

fn file_path(matches: &ArgMatches) -> &Path {
    // `file` is a required argument on every subcommand.
    Path::new(
        matches
            .get_one::<String>("file")
            .map(|s| s.as_str())
            .unwrap_or_default(),
    )
}

fn open(path: &Path, config: ReaderConfig) -> anyhow::Result<EventReader<InputStream>> {
    open_with_config(path, config).with_context(|| format!("cannot open {}", path.display()))
}

fn report_resync(resync: Option<ResyncOccurred>, mode: OutputMode) {
    if let Some(resync) = resync {
        eprintln!("{}", format_resync(&resync, mode));
    }
}

fn run_ls(path: &Path, config: ReaderConfig, mode: OutputMode) -> anyhow::Result<()> {
    let mut reader = open(path, config)?;
    let mut index = 0u64;
    loop {
        match reader.read_next_header() {
            Ok((header, resync)) => {
                report_resync(resync, mode);
                println!("{}", format_header(index, &header, mode));
                index += 1;
            }
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => return Err(e).with_context(|| format!("reading event {}", index)),
        }
    }
    reader.close()?;
    Ok(())
}

fn run_count(path: &Path, config: ReaderConfig, mode: OutputMode) -> anyhow::Result<()> {
    let mut reader = open(path, config)?;
    loop {
        match reader.read_next_header() {
            Ok((_, resync)) => report_resync(resync, mode),
            Err(e) if e.is_end_of_stream() => break,
            Err(e) => {
                return Err(e).with_context(|| format!("reading event {}", reader.events_read()))
            }
        }
    }
    println!(
        "{}",
        format_count(reader.events_read(), reader.resync_count(), mode)
    );
    reader.close()?;
    Ok(())
}

fn run_cat(
    path: &Path,
    config: ReaderConfig,
    only: Option<u64>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let mut reader = open(path, config)?;
    let mut index = 0u64;
    loop {
        // Events before the requested one are skipped without decoding.
        let wanted = only.map_or(true, |n| n == index);
        let result = if wanted {
            reader.read_next().map(|(event, resync)| (Some(event), resync))
        } else {
            reader.read_next_header().map(|(_, resync)| (None, resync))
        };

        match result {
            Ok((event, resync)) => {
                report_resync(resync, mode);
                if let Some(event) = event {
                    println!("{}", format_event(index, &event, mode));
                }
                if only == Some(index) {
                    break;
                }
                index += 1;
            }
            Err(e) if e.is_end_of_stream() => {
                if let Some(n) = only {
                    anyhow::bail!("event {} not found: stream has {} events", n, index);
                }
                break;
            }
            Err(e) => return Err(e).with_context(|| format!("reading event {}", index)),
        }
    }
    reader.close()?;
    Ok(())
}
