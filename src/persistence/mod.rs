//! Best score persistence
//!
//! The session reads the best score once at start and writes it whenever a
//! new best is set. Storage is injected so the session never touches global
//! state:
//! - `MemoryStore` for tests and throwaway runs
//! - `JsonFileStore` writing a small versioned JSON envelope (tmp → rename)

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Key-value capability for the single persisted best score
pub trait ScoreStore: Send {
    /// Read the stored best score (0 when nothing has been stored)
    fn load_best(&self) -> io::Result<u64>;
    /// Replace the stored best score
    fn save_best(&mut self, best: u64) -> io::Result<()>;
}

/// In-memory store. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Arc<AtomicU64>,
    writes: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new(best: u64) -> Self {
        Self {
            best: Arc::new(AtomicU64::new(best)),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn best(&self) -> u64 {
        self.best.load(Ordering::Acquire)
    }

    /// Number of `save_best` calls so far
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Acquire)
    }
}

impl ScoreStore for MemoryStore {
    fn load_best(&self) -> io::Result<u64> {
        Ok(self.best())
    }

    fn save_best(&mut self, best: u64) -> io::Result<()> {
        self.best.store(best, Ordering::Release);
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

/// On-disk record
#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    version: u32,
    best_score: u64,
}

const RECORD_VERSION: u32 = 1;

/// Stores the best score as JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ScoreStore for JsonFileStore {
    fn load_best(&self) -> io::Result<u64> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No best score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(e) => return Err(e),
        };
        let record: BestScoreRecord = serde_json::from_str(&json)?;
        if record.version != RECORD_VERSION {
            log::warn!(
                "Best score file version {} (expected {}), reading anyway",
                record.version,
                RECORD_VERSION
            );
        }
        log::info!("Loaded best score {}", record.best_score);
        Ok(record.best_score)
    }

    fn save_best(&mut self, best: u64) -> io::Result<()> {
        let record = BestScoreRecord {
            version: RECORD_VERSION,
            best_score: best,
        };
        let json = serde_json::to_string(&record)?;
        // Readers only ever see a complete file
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Best score saved ({})", best);
        Ok(())
    }
}
