use std::sync::Arc;

use chrono::Utc;

use crate::{
    classification::{classify_lines, split_lines, ClassifierConfig},
    confirm::{ConfirmationQueue, ConfirmationResolver, LogNotifier, PendingBatchNotifier},
    memory::MemoryStore,
    models::{BatchId, ContextMemory, CorrelationId, PendingConfirmation, Resolution},
    settings::ClassifierSettings,
};

use super::{BlockStyles, PasteBatch};

// Set to true to enable batch lifecycle logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Entry point for pasted text: brackets each batch with one memory load
/// and one memory save, and owns the confirmation queue.
///
/// No lock is held across a batch. Two concurrent batches for the same
/// session both read the old memory and the later save wins.
#[derive(Clone)]
pub struct PasteController<S: MemoryStore> {
    store: S,
    queue: ConfirmationQueue,
    notifier: Arc<dyn PendingBatchNotifier>,
    config: ClassifierConfig,
    settings: ClassifierSettings,
    styles: BlockStyles,
}

impl<S: MemoryStore> PasteController<S> {
    pub fn new(store: S) -> Self {
        let settings = ClassifierSettings::default();
        let mut config = ClassifierConfig::default();
        settings.apply_to(&mut config);

        Self {
            store,
            queue: ConfirmationQueue::new(),
            notifier: Arc::new(LogNotifier),
            config,
            settings,
            styles: BlockStyles::default(),
        }
    }

    /// Replaces the tuning config. Settings applied earlier still override
    /// the confidence threshold.
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self.settings.apply_to(&mut self.config);
        self
    }

    pub fn with_settings(mut self, settings: ClassifierSettings) -> Self {
        settings.apply_to(&mut self.config);
        self.settings = settings;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn PendingBatchNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_styles(mut self, styles: BlockStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn queue(&self) -> &ConfirmationQueue {
        &self.queue
    }

    /// Memory to classify with, or `None` to fall back to rules only.
    async fn load_memory(&self, session_id: &str) -> Option<ContextMemory> {
        if !self.settings.memory_enabled {
            return None;
        }
        match self.store.load(session_id).await {
            Ok(Some(memory)) => Some(memory),
            Ok(None) => Some(ContextMemory::new(session_id)),
            Err(err) => {
                log_warn!("Failed to load context memory for session {session_id}: {err:#}");
                None
            }
        }
    }

    /// Classifies one paste. Never fails: memory problems degrade to the
    /// rule-based labels and are logged.
    pub async fn classify_paste(&self, session_id: &str, text: &str) -> PasteBatch {
        let batch_id = BatchId::generate();
        let lines = split_lines(text);
        if lines.is_empty() {
            log_debug!("Ignoring empty paste for session {session_id}");
            return PasteBatch::empty(batch_id, session_id);
        }

        let memory = self.load_memory(session_id).await;
        let classification = classify_lines(&lines, memory.as_ref(), &self.config);

        let mut blocks = classification.blocks.clone();
        if !self.styles.is_empty() {
            self.styles.apply(&mut blocks);
        }

        let mut pending_count = 0;
        if !self.settings.auto_accept_suggestions {
            let created_at = Utc::now();
            for decision in classification.pending() {
                self.queue
                    .register(PendingConfirmation {
                        id: CorrelationId {
                            batch_id: batch_id.clone(),
                            line_index: decision.line_index,
                        },
                        line: decision.text.clone(),
                        suggested_label: decision.label,
                        confidence: decision.confidence,
                        created_at,
                    })
                    .await;
                pending_count += 1;
            }
        }

        if pending_count > 0 {
            self.notifier.pending_batch(&batch_id, pending_count);
        }

        if let Some(mut memory) = memory {
            memory.absorb(&classification.blocks, self.config.history_capacity, Utc::now());
            if let Err(err) = self.store.save(memory).await {
                log_warn!("Failed to save context memory for session {session_id}: {err:#}");
            }
        }

        log_info!(
            "Classified batch {} for session {}: {} blocks, {} pending",
            batch_id,
            session_id,
            blocks.len(),
            pending_count
        );

        PasteBatch {
            batch_id,
            session_id: session_id.to_string(),
            blocks,
            pending_count,
        }
    }

    /// Asks `resolver` about every pending line of a batch, in line order.
    ///
    /// Each line is taken off the queue before the resolver sees it, so
    /// overlapping calls never resolve the same line twice. A failing
    /// resolver puts the line back with its suggested label.
    pub async fn resolve<R>(&self, batch_id: &BatchId, resolver: &R) -> Vec<Resolution>
    where
        R: ConfirmationResolver + ?Sized,
    {
        let candidates = self.queue.pending_for(batch_id).await;
        let mut resolutions = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            // Another resolve already claimed it.
            let Some(confirmation) = self.queue.complete(&candidate.id).await else {
                continue;
            };

            match resolver.confirm(&confirmation).await {
                Ok(choice) => resolutions.push(Resolution {
                    line_index: confirmation.id.line_index,
                    suggested_label: confirmation.suggested_label,
                    final_label: choice.unwrap_or(confirmation.suggested_label),
                }),
                Err(err) => {
                    log_warn!(
                        "Confirmation failed for batch {} line {}: {err:#}",
                        batch_id,
                        confirmation.id.line_index
                    );
                    self.queue.register(confirmation).await;
                }
            }
        }

        log_debug!("Resolved {} lines of batch {}", resolutions.len(), batch_id);
        resolutions
    }

    /// [`resolve`](Self::resolve), then folds the answers into `batch`.
    pub async fn resolve_batch<R>(&self, batch: &mut PasteBatch, resolver: &R) -> Vec<Resolution>
    where
        R: ConfirmationResolver + ?Sized,
    {
        let resolutions = self.resolve(&batch.batch_id, resolver).await;
        if batch.apply_resolutions(&resolutions) > 0 && !self.styles.is_empty() {
            self.styles.apply(&mut batch.blocks);
        }
        resolutions
    }

    pub async fn pending(&self, batch_id: &BatchId) -> Vec<PendingConfirmation> {
        self.queue.pending_for(batch_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::models::ScreenplayLabel;

    #[tokio::test]
    async fn empty_paste_touches_nothing() {
        let store = InMemoryStore::new();
        let controller = PasteController::new(store.clone());
        let batch = controller.classify_paste("s", "  \n\n").await;
        assert!(batch.is_empty());
        assert_eq!(batch.pending_count, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn memory_disabled_skips_store() {
        let store = InMemoryStore::new();
        let controller = PasteController::new(store.clone()).with_settings(ClassifierSettings {
            memory_enabled: false,
            ..ClassifierSettings::default()
        });
        let batch = controller.classify_paste("s", "يدخل أحمد").await;
        assert_eq!(batch.labels(), vec![ScreenplayLabel::Action]);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn auto_accept_leaves_queue_empty() {
        let controller = PasteController::new(InMemoryStore::new()).with_settings(ClassifierSettings {
            auto_accept_suggestions: true,
            ..ClassifierSettings::default()
        });
        let batch = controller
            .classify_paste("s", "سامي\nانتظري قليلا أريد أن أقول لك شيئا مهما")
            .await;
        assert_eq!(batch.pending_count, 0);
        assert!(controller.queue().is_empty().await);
        assert_eq!(batch.labels()[0], ScreenplayLabel::Character);
    }
}
