use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use time::macros::format_description;
use tokio::sync::mpsc;

use dirlens::core::config::ExplorerConfig;
use dirlens::core::errors::Error;
use dirlens::core::telemetry::init_logging;
use dirlens::models::{PreviewKind, ReferenceMark};
use dirlens::pages::explorer::{ExplorerSession, PaneMode, TreeRow};
use dirlens::services::chat::ChatEvent;
use dirlens::services::fs::{path, LocalDirectory};
use dirlens::services::references;

/// Mirror a folder as a tree and show which nodes a chat answer references.
#[derive(Debug, Parser)]
#[command(name = "dirlens", version)]
struct Cli {
    /// Folder to load.
    folder: PathBuf,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text containing `![Source-N](path)` markers.
    #[arg(long, conflicts_with_all = ["message_file", "ask"])]
    message: Option<String>,

    /// File whose content contains source markers.
    #[arg(long, conflicts_with = "ask")]
    message_file: Option<PathBuf>,

    /// Ask the scripted assistant and use its reply as the message.
    #[arg(long)]
    ask: Option<String>,

    /// Tree path to reveal (expands it and its ancestors). Repeatable.
    #[arg(long)]
    expand: Vec<String>,

    /// Tree path to select.
    #[arg(long)]
    select: Option<String>,

    /// Directory pane width in pixels, clamped to the configured minimum.
    #[arg(long)]
    pane_width: Option<u32>,

    /// Print a JSON report instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    root: &'a str,
    mode: PaneMode,
    pane_width: u32,
    selected_path: &'a str,
    marks: &'a [ReferenceMark],
    rows: Vec<TreeRow>,
    selected_file: Option<SelectedFile>,
}

#[derive(Serialize)]
struct SelectedFile {
    name: String,
    size: u64,
    modified: Option<String>,
    preview: PreviewKind,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = ExplorerConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let mut session = ExplorerSession::new(config);

    let root = LocalDirectory::open(&cli.folder)
        .await
        .with_context(|| format!("cannot open folder {}", cli.folder.display()))?;
    session
        .load_folder(Box::new(root))
        .await
        .context("failed to read folder")?;

    if let Some(prompt) = cli.ask.as_deref() {
        ask(&mut session, prompt).await?;
    } else if let Some(text) = message_text(&cli)? {
        session.set_marks_from_text(&text);
    }

    let root_path = session
        .tree()
        .map(|t| t.root_path().to_string())
        .unwrap_or_default();
    for p in &cli.expand {
        session.reveal(&resolve(&root_path, p))?;
    }
    if let Some(p) = cli.select.as_deref() {
        match session.select(&resolve(&root_path, p)).await {
            Ok(_) => {}
            Err(e @ Error::FileAccess { .. }) => tracing::warn!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(width) = cli.pane_width {
        let start = session.pane().width();
        session.resize_pane(start, i64::from(width) - i64::from(start));
    }

    let report = build_report(&session, &root_path);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}

fn message_text(cli: &Cli) -> Result<Option<String>> {
    if let Some(text) = &cli.message {
        return Ok(Some(text.clone()));
    }
    match &cli.message_file {
        Some(file) => {
            let text = fs::read_to_string(file)
                .with_context(|| format!("cannot read message file {}", file.display()))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}

/// Plays the scripted chat and selects the reply.
async fn ask(session: &mut ExplorerSession, prompt: &str) -> Result<()> {
    if !session.send_message(prompt) {
        anyhow::bail!("prompt must not be empty");
    }
    let responder = session.responder().clone();
    let (tx, mut rx) = mpsc::channel(8);
    let script = tokio::spawn(async move { responder.respond(tx).await });

    while let Some(event) = rx.recv().await {
        if let ChatEvent::Step { heading, text } = &event {
            eprintln!("[{heading}] {text}");
        }
        session.apply_chat_event(event);
    }
    script.await?;

    let reply = session.chat().messages().len().saturating_sub(1);
    session.select_message(reply);
    if let Some(message) = session.chat().messages().get(reply) {
        eprintln!("{}", references::strip_markers(&message.content).trim());
    }
    Ok(())
}

/// Relative paths are taken from the tree root.
fn resolve(root_path: &str, p: &str) -> String {
    if p.starts_with(path::SEPARATOR) {
        p.to_string()
    } else {
        path::join(root_path, p.trim_end_matches(path::SEPARATOR))
    }
}

fn build_report<'a>(session: &'a ExplorerSession, root: &'a str) -> Report<'a> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let selected_file = session.selected_file().map(|file| SelectedFile {
        name: file.name.clone(),
        size: file.size,
        modified: file.modified.and_then(|m| m.format(&format).ok()),
        preview: file.preview_kind(&session.config().preview),
    });
    Report {
        root,
        mode: session.pane_mode(),
        pane_width: session.pane().effective_width(),
        selected_path: session
            .navigation()
            .map(|nav| nav.selected_path())
            .unwrap_or(root),
        marks: session.marks(),
        rows: session.rows(),
        selected_file,
    }
}

fn print_text(report: &Report<'_>) {
    for row in &report.rows {
        let marker = match (row.has_children, row.expanded) {
            (true, true) => "v ",
            (true, false) => "> ",
            _ => "  ",
        };
        let selected = if row.selected { "*" } else { " " };
        let digit = row.digit.map(|d| format!(" [{d}]")).unwrap_or_default();
        println!(
            "{selected}{:indent$}{marker}{} ({}){digit}",
            "",
            row.name,
            row.kind.label(),
            indent = row.depth * 2,
        );
    }
    if let Some(file) = &report.selected_file {
        println!();
        println!("{} ({} bytes, {})", file.name, file.size, file.preview.label());
        if let Some(modified) = &file.modified {
            println!("modified {modified}");
        }
    }
}
