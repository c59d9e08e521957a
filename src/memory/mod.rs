//! Session memory persistence.
//!
//! A store only loads and saves whole records. Two saves for the same
//! session overwrite each other in arrival order.

use std::{collections::HashMap, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::ContextMemory;

#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn load(&self, session_id: &str) -> Result<Option<ContextMemory>>;

    async fn save(&self, memory: ContextMemory) -> Result<()>;
}

/// Process-local store, used by tests and when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<HashMap<String, ContextMemory>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn load(&self, session_id: &str) -> Result<Option<ContextMemory>> {
        Ok(self.records.lock().await.get(session_id).cloned())
    }

    async fn save(&self, memory: ContextMemory) -> Result<()> {
        self.records
            .lock()
            .await
            .insert(memory.session_id.clone(), memory);
        Ok(())
    }
}

#[async_trait]
impl MemoryStore for Database {
    async fn load(&self, session_id: &str) -> Result<Option<ContextMemory>> {
        self.load_context_memory(session_id).await
    }

    async fn save(&self, memory: ContextMemory) -> Result<()> {
        self.save_context_memory(&memory).await
    }
}

#[async_trait]
impl<S: MemoryStore + ?Sized> MemoryStore for Arc<S> {
    async fn load(&self, session_id: &str) -> Result<Option<ContextMemory>> {
        (**self).load(session_id).await
    }

    async fn save(&self, memory: ContextMemory) -> Result<()> {
        (**self).save(memory).await
    }
}
