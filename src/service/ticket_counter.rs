use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("Failed to read ticket counter: {0}")]
    Read(String),

    #[error("Failed to write ticket counter: {0}")]
    Write(String),
}

/// Monotonic ticket numbering for quote requests.
#[async_trait]
pub trait TicketCounter: Send + Sync {
    async fn current(&self) -> Result<u64, CounterError>;
    /// Increments by exactly one and returns the new value.
    async fn next(&self) -> Result<u64, CounterError>;
}

/// A single integer persisted in a text file.
///
/// Increments are serialised inside one process only; two processes sharing
/// the file can hand out the same number.
pub struct FileTicketCounter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTicketCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn read_value(&self) -> Result<u64, CounterError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents.trim().parse().unwrap_or_else(|_| {
                warn!("Ticket counter file {:?} is not a number, starting from 0", self.path);
                0
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => {
                error!("Failed to read ticket counter {:?}: {}", self.path, e);
                Err(CounterError::Read(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl TicketCounter for FileTicketCounter {
    async fn current(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().await;
        self.read_value().await
    }

    #[instrument(skip(self))]
    async fn next(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock().await;
        let next = self.read_value().await? + 1;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CounterError::Write(e.to_string()))?;
        }
        // Rename over the old file so a crash never leaves a half-written counter
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, next.to_string())
            .await
            .map_err(|e| {
                error!("Failed to write ticket counter: {}", e);
                CounterError::Write(e.to_string())
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| {
                error!("Failed to replace ticket counter: {}", e);
                CounterError::Write(e.to_string())
            })?;

        debug!("Ticket counter {:?} advanced to {}", self.path, next);
        Ok(next)
    }
}

#[derive(Debug, Default)]
pub struct MemoryTicketCounter {
    value: AtomicU64,
}

impl MemoryTicketCounter {
    pub fn starting_at(value: u64) -> Self {
        Self { value: AtomicU64::new(value) }
    }
}

#[async_trait]
impl TicketCounter for MemoryTicketCounter {
    async fn current(&self) -> Result<u64, CounterError> {
        Ok(self.value.load(Ordering::SeqCst))
    }

    async fn next(&self) -> Result<u64, CounterError> {
        Ok(self.value.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
