//! Durable storage for the audit trail: one JSON-encoded [`AuditRecord`] per
//! line, appended and synced before the ledger state changes.
//!
//! A failed append is rolled back by truncating the file to its length
//! before the append. If even that fails the journal is poisoned and refuses
//! every later append, so the file never gains a record the ledger did not
//! apply or a torn line that would make it unreadable.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::audit::AuditRecord;

/// What a journal needs from the file underneath it.
pub trait JournalFile: Write {
    fn byte_len(&self) -> io::Result<u64>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl JournalFile for File {
    fn byte_len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_data()
    }
}

/// An append-only journal file.
#[derive(Debug)]
pub struct Journal<F = File> {
    path: PathBuf,
    file: F,
    poisoned: bool,
}

impl Journal {
    /// Open (creating if necessary) the journal at `path`, returning it along
    /// with every record already in it.
    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, Vec<AuditRecord>)> {
        let path = path.into();
        let records = if path.exists() {
            Self::load(&path)?
        } else {
            Vec::new()
        };
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok((Self::with_file(path, file), records))
    }

    /// Read every record from the journal at `path`. Blank lines are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<AuditRecord>> {
        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl<F: JournalFile> Journal<F> {
    pub(crate) fn with_file(path: PathBuf, file: F) -> Self {
        Self {
            path,
            file,
            poisoned: false,
        }
    }

    /// Append a record and sync it to disk. On failure the file is left as
    /// it was before the call.
    pub fn append(&mut self, record: &AuditRecord) -> Result<()> {
        if self.poisoned {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "journal {} is in an unknown state after a failed rollback",
                    self.path.display()
                ),
            )
            .into());
        }

        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        let offset = self.file.byte_len()?;
        if let Err(err) = self.write_line(&line) {
            self.roll_back(offset);
            return Err(err.into());
        }
        Ok(())
    }

    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.file.write_all(line)?;
        self.file.flush()?;
        self.file.sync()
    }

    fn roll_back(&mut self, offset: u64) {
        let result = self.file.truncate(offset).and_then(|()| self.file.sync());
        match result {
            Ok(()) => warn!(
                "Rolled back failed append to journal {}",
                self.path.display()
            ),
            Err(err) => {
                error!(
                    "Could not roll back journal {} to {offset} bytes, refusing further appends: {err}",
                    self.path.display()
                );
                self.poisoned = true;
            }
        }
    }
}
