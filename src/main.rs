use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use screenplay_paste::{
    init_logging, BlockStyles, Database, InMemoryStore, MemoryStore, PasteBatch, PasteController,
    PendingConfirmation, SettingsStore,
};

#[derive(Parser)]
#[command(
    name = "paste-classify",
    about = "Classify pasted screenplay text into typed blocks",
    version
)]
struct Cli {
    /// Text files to classify in order, one batch each (reads stdin if none provided)
    files: Vec<PathBuf>,

    /// Session whose context memory is read and updated
    #[arg(long, default_value = "default")]
    session: String,

    /// SQLite file for context memory (kept in process if omitted)
    #[arg(long)]
    db: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON map of label to style descriptor attached to each block
    #[arg(long)]
    styles: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchReport {
    #[serde(flatten)]
    batch: PasteBatch,
    pending: Vec<PendingConfirmation>,
}

fn read_styles(path: &Path) -> Result<BlockStyles> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read styles from {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid styles in {}", path.display()))
}

fn read_inputs(files: &[PathBuf]) -> Result<Vec<String>> {
    if files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(vec![input]);
    }
    files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => SettingsStore::new(path.clone())?,
        None => SettingsStore::ephemeral(),
    };

    let store: Arc<dyn MemoryStore> = match &cli.db {
        Some(path) => Arc::new(Database::new(path.clone())?),
        None => Arc::new(InMemoryStore::new()),
    };

    let mut controller = PasteController::new(store).with_settings(settings.classifier());
    if let Some(path) = &cli.styles {
        controller = controller.with_styles(read_styles(path)?);
    }

    for text in read_inputs(&cli.files)? {
        let batch = controller.classify_paste(&cli.session, &text).await;
        let pending = controller.pending(&batch.batch_id).await;
        let report = BatchReport { batch, pending };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
