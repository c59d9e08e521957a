//! Suspend-now, resolve-later confirmation of low-confidence lines.
//!
//! Pending lines sit in a queue keyed by [`CorrelationId`] (batch id plus
//! line index). A batch never waits on its queue; a later, separate
//! `resolve` call drains it.

use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::{BatchId, CorrelationId, PendingConfirmation, ScreenplayLabel};

// Set to true to log batch notifications from `LogNotifier`
const ENABLE_LOGS: bool = true;

use crate::log_info;

#[derive(Clone, Default)]
pub struct ConfirmationQueue {
    pending: Arc<Mutex<BTreeMap<CorrelationId, PendingConfirmation>>>,
}

fn batch_range(batch_id: &BatchId) -> std::ops::RangeInclusive<CorrelationId> {
    let start = CorrelationId {
        batch_id: batch_id.clone(),
        line_index: 0,
    };
    let end = CorrelationId {
        batch_id: batch_id.clone(),
        line_index: usize::MAX,
    };
    start..=end
}

impl ConfirmationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Re-registering the same correlation id replaces it.
    pub async fn register(&self, confirmation: PendingConfirmation) {
        self.pending
            .lock()
            .await
            .insert(confirmation.id.clone(), confirmation);
    }

    /// Snapshot of a batch's pending entries in line order.
    pub async fn pending_for(&self, batch_id: &BatchId) -> Vec<PendingConfirmation> {
        self.pending
            .lock()
            .await
            .range(batch_range(batch_id))
            .map(|(_, pending)| pending.clone())
            .collect()
    }

    /// Removes an entry once it has been resolved.
    pub async fn complete(&self, id: &CorrelationId) -> Option<PendingConfirmation> {
        self.pending.lock().await.remove(id)
    }

    /// Drops every entry of a batch without resolving it; the suggested
    /// labels stand.
    pub async fn discard_batch(&self, batch_id: &BatchId) -> usize {
        let mut guard = self.pending.lock().await;
        let ids: Vec<CorrelationId> = guard
            .range(batch_range(batch_id))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &ids {
            guard.remove(id);
        }
        ids.len()
    }

    pub async fn len(&self) -> usize {
        self.pending.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pending.lock().await.is_empty()
    }
}

/// The collaborator that makes the actual decision for a pending line.
///
/// `Ok(None)` accepts the suggestion. An error leaves the line pending.
#[async_trait]
pub trait ConfirmationResolver: Send + Sync {
    async fn confirm(&self, pending: &PendingConfirmation) -> Result<Option<ScreenplayLabel>>;
}

#[async_trait]
impl<F> ConfirmationResolver for F
where
    F: Fn(&PendingConfirmation) -> Result<Option<ScreenplayLabel>> + Send + Sync,
{
    async fn confirm(&self, pending: &PendingConfirmation) -> Result<Option<ScreenplayLabel>> {
        self(pending)
    }
}

/// Resolver that keeps every suggested label.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptSuggestions;

#[async_trait]
impl ConfirmationResolver for AcceptSuggestions {
    async fn confirm(&self, _pending: &PendingConfirmation) -> Result<Option<ScreenplayLabel>> {
        Ok(None)
    }
}

/// Told once per batch that has pending lines.
pub trait PendingBatchNotifier: Send + Sync {
    fn pending_batch(&self, batch_id: &BatchId, pending_count: usize);
}

impl<F> PendingBatchNotifier for F
where
    F: Fn(&BatchId, usize) + Send + Sync,
{
    fn pending_batch(&self, batch_id: &BatchId, pending_count: usize) {
        self(batch_id, pending_count)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl PendingBatchNotifier for LogNotifier {
    fn pending_batch(&self, batch_id: &BatchId, pending_count: usize) {
        log_info!("batch {batch_id} has {pending_count} lines awaiting confirmation");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pending(batch: &BatchId, line_index: usize) -> PendingConfirmation {
        PendingConfirmation {
            id: CorrelationId {
                batch_id: batch.clone(),
                line_index,
            },
            line: format!("line {line_index}"),
            suggested_label: ScreenplayLabel::Character,
            confidence: 0.45,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn batches_are_isolated_and_ordered() {
        let queue = ConfirmationQueue::new();
        let first = BatchId::generate();
        let second = BatchId::generate();

        queue.register(pending(&first, 7)).await;
        queue.register(pending(&first, 2)).await;
        queue.register(pending(&second, 0)).await;

        let lines: Vec<usize> = queue
            .pending_for(&first)
            .await
            .iter()
            .map(|p| p.id.line_index)
            .collect();
        assert_eq!(lines, vec![2, 7]);
        assert_eq!(queue.pending_for(&second).await.len(), 1);
        assert_eq!(queue.len().await, 3);
    }

    #[tokio::test]
    async fn complete_and_discard() {
        let queue = ConfirmationQueue::new();
        let batch = BatchId::generate();
        queue.register(pending(&batch, 0)).await;
        queue.register(pending(&batch, 1)).await;

        let id = CorrelationId {
            batch_id: batch.clone(),
            line_index: 0,
        };
        assert!(queue.complete(&id).await.is_some());
        assert!(queue.complete(&id).await.is_none());

        assert_eq!(queue.discard_batch(&batch).await, 1);
        assert!(queue.is_empty().await);
    }

    #[tokio::test]
    async fn closures_resolve() {
        let batch = BatchId::generate();
        let resolver = |p: &PendingConfirmation| -> Result<Option<ScreenplayLabel>> {
            Ok((p.id.line_index == 0).then_some(ScreenplayLabel::Action))
        };
        assert_eq!(
            resolver.confirm(&pending(&batch, 0)).await.unwrap(),
            Some(ScreenplayLabel::Action)
        );
        assert_eq!(resolver.confirm(&pending(&batch, 1)).await.unwrap(), None);
        assert_eq!(AcceptSuggestions.confirm(&pending(&batch, 1)).await.unwrap(), None);
    }
}
