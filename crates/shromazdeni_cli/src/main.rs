//! Meeting shell entry point.
//!
//! # Responsibility
//! - Load the ownership dataset, replay or create the command log, and hand
//!   the recovered ledger to the interactive shell.

mod config;
mod shell;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::Parser;
use config::Cli;
use log::info;
use rustyline::DefaultEditor;
use shromazdeni_core::{
    init_logging, load_flats_from_path, open_existing, open_or_create, Ledger, LoggedLedger,
};
use shell::Shell;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level(), cli.log_dir()?)
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;

    let flats = load_flats_from_path(&cli.flats)
        .with_context(|| format!("failed to load flats from `{}`", cli.flats.display()))?;
    let mut ledger = Ledger::new(flats);

    let (log_path, explicit) = cli.command_log(Local::now().date_naive());
    let opened = if explicit {
        open_existing(&log_path, &mut ledger)
    } else {
        open_or_create(&log_path, &mut ledger)
    }
    .with_context(|| format!("failed to open command log `{}`", log_path.display()))?;

    info!(
        "event=session_start module=cli status=ok flats={} replayed={} created={}",
        ledger.flats().count(),
        opened.replayed,
        opened.created
    );
    println!(
        "Command log {} ({} commands replayed).",
        opened.path.display(),
        opened.replayed
    );

    let session = LoggedLedger::new(ledger, opened.log);
    let editor = DefaultEditor::new().context("failed to start line editor")?;
    Shell::new(session, editor, std::io::stdout()).run()
}
