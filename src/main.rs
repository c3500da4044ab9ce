//! nexvi - screen sessions and scratch memory for a modal editor.
//!
//! The binary is a line-oriented `ex` shell over the core: every line read
//! from stdin is one screen command.
//!
//! # Usage
//!
//! ```bash
//! nexvi main.rs lib.rs
//! printf 'bg\ndi s\nq!\nq!\n' | nexvi a.txt b.txt c.txt
//! nexvi --columns 100 --save
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nexvi::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use nexvi::ex::{ExCommand, ExError, ExOutcome, execute};
use nexvi::message::Message;
use nexvi::perf;
use nexvi::process::ProcessState;
use nexvi::screen::{FileRecord, FileTable, HeadlessDisplay};

/// Screen session shell for the nexvi editor core
#[derive(Parser, Debug)]
#[command(name = "nexvi", version, about, long_about = None)]
struct Cli {
    /// Files to open; the first is shown, the rest start in the background
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Screen width in columns (defaults to the terminal width)
    #[arg(long, value_name = "N")]
    columns: Option<u16>,

    /// Screen height in rows (defaults to the terminal height)
    #[arg(long, value_name = "N")]
    rows: Option<u16>,

    /// Bytes to pre-allocate for the scratch arena
    #[arg(long, value_name = "BYTES")]
    scratch_capacity: Option<usize>,

    /// Report startup and command timings
    #[arg(long)]
    perf: bool,

    /// Write debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn print_messages(messages: Vec<Message>) {
    for message in messages {
        eprintln!("[{}] {}", message.level, message.text);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        columns: cli.columns,
        rows: cli.rows,
        scratch_capacity: cli.scratch_capacity,
        perf: cli.perf,
        debug_log: cli.debug_log.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_timing_enabled(effective.perf);
    let event_log_path = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("NEXVI_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_event_log_path(event_log_path.as_deref()) {
        tracing::warn!(%err, "failed to open the debug event log");
    }

    let Some((first, rest)) = cli.files.split_first() else {
        if cli.save || cli.clear {
            return Ok(());
        }
        anyhow::bail!("No file given");
    };

    let startup = perf::scope("startup");
    let terminal = crossterm::terminal::size().ok();
    let options = effective.process_options(terminal);
    let mut state = ProcessState::new(FileRecord::new(first.display().to_string()), options)
        .context("Failed to allocate the scratch arena")?;
    for path in rest {
        state
            .screens
            .open_background(FileRecord::new(path.display().to_string()));
    }
    let mut display = HeadlessDisplay::new(options.rows);
    let files = FileTable::new();
    drop(startup);

    run(&mut state, &mut display, &files)
}

fn run(state: &mut ProcessState, display: &mut HeadlessDisplay, files: &FileTable) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let _timing = perf::scope("command");
        let outcome = match ExCommand::parse(&line) {
            Ok(command) => execute(state, &command, display, files),
            Err(err) => Err(err),
        };
        if let Some(id) = state.screens.complete_switch(display) {
            writeln!(stdout, "switched to {id} ({})", state.screens.current().name())?;
        }
        print_messages(state.messages.drain());

        match outcome {
            Ok(ExOutcome::Output(text)) => stdout.write_all(text.as_bytes())?,
            Ok(ExOutcome::Exit) => break,
            Ok(ExOutcome::Done | ExOutcome::QuitBlocked(_)) => {}
            // Screen and memory errors were already queued as messages.
            Err(err @ (ExError::UnknownCommand(_) | ExError::InvalidArgument(_))) => {
                eprintln!("[error] {err}");
            }
            Err(_) => {}
        }
        stdout.flush()?;
    }
    Ok(())
}
