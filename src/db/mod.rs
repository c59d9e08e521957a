use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc},
    thread,
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

pub mod helpers;
mod migrations;
pub mod repositories;

use migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

fn open_connection(path: Option<&Path>) -> Result<Connection> {
    match path {
        Some(path) => Connection::open(path)
            .with_context(|| format!("failed to open SQLite database {}", path.display())),
        None => Connection::open_in_memory().context("failed to open in-memory SQLite database"),
    }
}

/// Context memory persistence: one SQLite connection owned by a worker
/// thread, fed closures over a channel.
///
/// Clones share the worker. It exits once the last clone is dropped and
/// the queued tasks have run.
#[derive(Clone)]
pub struct Database {
    tasks: mpsc::Sender<DbTask>,
    path: Option<Arc<PathBuf>>,
}

impl Database {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
        Self::spawn(Some(path))
    }

    /// A private database that disappears with the last clone.
    pub fn in_memory() -> Result<Self> {
        Self::spawn(None)
    }

    fn spawn(path: Option<PathBuf>) -> Result<Self> {
        let (task_tx, task_rx) = mpsc::channel::<DbTask>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let worker_path = path.clone();

        thread::Builder::new()
            .name("screenplay-paste-db".into())
            .spawn(move || {
                let opened = open_connection(worker_path.as_deref()).and_then(|mut conn| {
                    run_migrations(&mut conn).context("failed to run database migrations")?;
                    Ok(conn)
                });
                let mut conn = match opened {
                    Ok(conn) => {
                        if ready_tx.send(Ok(())).is_err() {
                            return;
                        }
                        conn
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };

                for task in task_rx {
                    task(&mut conn);
                }
                info!("Context memory database closed");
            })
            .context("failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        match &path {
            Some(path) => info!("Context memory database ready at {}", path.display()),
            None => info!("Context memory database ready in memory"),
        }

        Ok(Self {
            tasks: task_tx,
            path: path.map(Arc::new),
        })
    }

    /// File backing this database, `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref().map(PathBuf::as_path)
    }

    /// Runs `task` on the worker's connection and waits for its result.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tasks
            .send(Box::new(move |conn| {
                if reply_tx.send(task(conn)).is_err() {
                    error!("Database caller went away before its result arrived");
                }
            }))
            .map_err(|_| anyhow!("database worker is gone"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database worker dropped the task"))?
    }
}
