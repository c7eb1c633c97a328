use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{debug, error, warn};

use super::entities::WordRecord;

pub const ENTRIES_FILE: &str = "entries.json";

/// Interface for abstracting storage of records. The store is only ever read or written as a
/// whole.
pub trait RecordStore {
    /// Loads every stored record. Never fails: anything that can't be read is reported and
    /// skipped, so the worst case is an empty set.
    fn load(&self) -> impl Future<Output = Vec<WordRecord>>;

    /// Replaces the stored records with `records`.
    fn save(&self, records: &[WordRecord]) -> impl Future<Output = Result<()>>;

    /// Adds a record to the stored ones and returns the updated set.
    fn append(&self, record: WordRecord) -> impl Future<Output = Result<Vec<WordRecord>>> {
        async move {
            let mut records = self.load().await;
            records.push(record);
            self.save(&records).await?;
            Ok(records)
        }
    }
}

/// The main realization of [RecordStore]. Keeps records as a JSON array of
/// `{project, date, words}` objects.
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: PathBuf) -> Result<Self, std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Store placed at the default location inside an application directory.
    pub fn in_dir(dir: &Path) -> Result<Self, std::io::Error> {
        Self::new(dir.join(ENTRIES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Vec<WordRecord>> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No records at {:?} yet", self.path);
                return Ok(vec![]);
            }
            Err(e) => Err(e)?,
        };

        file.lock_shared()?;
        let mut file = file;
        let mut content = String::new();
        let read = file.read_to_string(&mut content).await;
        file.unlock_async().await?;
        read?;

        debug!("Read {} bytes from {:?}", content.len(), self.path);
        parse_entries(&content)
    }

    async fn write_entries(&self, records: &[WordRecord]) -> Result<()> {
        let buffer = serde_json::to_vec_pretty(records)?;

        let mut file = File::options()
            .write(true)
            .create(true)
            .read(true)
            .truncate(false)
            .open(&self.path)
            .await?;

        // Semi-safe acquire-release for a file. Truncation happens under the lock so readers
        // never observe a half written array.
        file.lock_exclusive()?;
        let result = async {
            file.set_len(0).await?;
            file.rewind().await?;
            file.write_all(&buffer).await?;
            file.flush().await?;
            file.sync_data().await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        file.unlock_async().await?;
        result?;

        debug!("Saved {} records into {:?}", records.len(), self.path);
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    async fn load(&self) -> Vec<WordRecord> {
        match self.read_entries().await {
            Ok(records) => records,
            Err(e) => {
                error!(
                    "Failed to read records from {:?}, continuing with none: {e:?}",
                    self.path
                );
                vec![]
            }
        }
    }

    async fn save(&self, records: &[WordRecord]) -> Result<()> {
        self.write_entries(records).await
    }
}

/// Parses the stored array. Entries that don't form a valid record are ignored, a document that
/// isn't an array at all is an error.
fn parse_entries(content: &str) -> Result<Vec<WordRecord>> {
    if content.trim().is_empty() {
        return Ok(vec![]);
    }

    let entries = serde_json::from_str::<Vec<serde_json::Value>>(content)?;
    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, entry)| match serde_json::from_value::<WordRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping stored entry {index}: {e}");
                    None
                }
            },
        )
        .collect();
    Ok(records)
}
