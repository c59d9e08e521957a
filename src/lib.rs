//! Context-sensitive screenplay line classification for pasted Arabic prose.
//!
//! Raw text goes through [`classification`] line by line, session memory
//! lives behind [`memory::MemoryStore`], and low-confidence lines wait in
//! the [`confirm`] queue until a caller resolves their batch through
//! [`paste::PasteController`].

pub mod classification;
pub mod confirm;
pub mod db;
pub mod memory;
pub mod models;
pub mod paste;
pub mod settings;
pub mod utils;

pub use classification::{classify_text, ClassifierConfig};
pub use confirm::{AcceptSuggestions, ConfirmationResolver, PendingBatchNotifier};
pub use db::Database;
pub use memory::{InMemoryStore, MemoryStore};
pub use models::{
    BatchId, ContextMemory, PendingConfirmation, Resolution, ScreenplayBlock, ScreenplayLabel,
    Spacing,
};
pub use paste::{BlockStyles, PasteBatch, PasteController};
pub use settings::{ClassifierSettings, SettingsStore};

/// Initialise `env_logger` (reads `RUST_LOG`, defaults to `info`).
///
/// `try_init` only fails with `SetLoggerError`, when some logger is already
/// installed; that logger is kept and told about the repeat call.
pub fn init_logging() {
    let installed =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init();
    if let Err(err) = installed {
        log::debug!("Keeping the installed logger: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_keeps_first_logger() {
        init_logging();
        init_logging();
        log::info!("still logging after a second init");
    }
}
