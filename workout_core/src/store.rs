//! Local document store for programs and completion records.
//!
//! Programs are whole documents: every save replaces the previous one
//! atomically, so the last writer wins. Completion records are append-only
//! JSON lines guarded by file locks for safe concurrent access.

use crate::{Error, Result, WorkoutCompletionRecord, WorkoutProgram};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Source and destination of program documents, keyed by user
pub trait ProgramStore {
    fn load_program(&self, user_id: &str) -> Result<Option<WorkoutProgram>>;
    fn save_program(&mut self, program: &WorkoutProgram) -> Result<()>;

    /// Load the user's program, or start an empty one
    fn load_or_create(&mut self, user_id: &str) -> Result<WorkoutProgram> {
        match self.load_program(user_id)? {
            Some(program) => Ok(program),
            None => {
                let program = WorkoutProgram::new(user_id);
                self.save_program(&program)?;
                Ok(program)
            }
        }
    }
}

/// Append-only destination for completion records
pub trait RecordSink {
    fn append(&mut self, record: &WorkoutCompletionRecord) -> Result<()>;
}

// ============================================================================
// Program documents
// ============================================================================

/// One JSON document per user under a directory
pub struct JsonProgramStore {
    dir: PathBuf,
}

impl JsonProgramStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of a user's program document
    ///
    /// Bytes outside `[A-Za-z0-9-]` are written as `_XX` (hex), so distinct
    /// user ids always map to distinct file names.
    pub fn path_for(&self, user_id: &str) -> PathBuf {
        let mut name = String::with_capacity(user_id.len());
        for byte in user_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", name))
    }
}

impl ProgramStore for JsonProgramStore {
    /// Returns None if the document doesn't exist.
    /// If it is corrupted, logs a warning and returns None.
    fn load_program(&self, user_id: &str) -> Result<Option<WorkoutProgram>> {
        let path = self.path_for(user_id);
        if !path.exists() {
            tracing::info!("No program document for {}", user_id);
            return Ok(None);
        }

        let file = File::open(&path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let read = BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        match serde_json::from_str::<WorkoutProgram>(&contents) {
            Ok(program) => {
                tracing::debug!("Loaded program for {} from {:?}", user_id, path);
                Ok(Some(program))
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse program document {:?}: {}. Ignoring it.",
                    path,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Atomically replace the document by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn save_program(&mut self, program: &WorkoutProgram) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&program.user_id);

        // Create unique temp file in the same directory for atomic rename
        let temp = NamedTempFile::new_in(&self.dir)?;

        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(program)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved program for {} to {:?}", program.user_id, path);
        Ok(())
    }
}

// ============================================================================
// Completion records
// ============================================================================

/// JSON-lines completion log with file locking
pub struct JsonlRecordLog {
    path: PathBuf,
}

impl JsonlRecordLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for JsonlRecordLog {
    fn append(&mut self, record: &WorkoutCompletionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended record {} for {}", record.id, record.date);
        Ok(())
    }
}

/// Read every record in a log, skipping lines that don't parse
pub fn read_records(path: &Path) -> Result<Vec<WorkoutCompletionRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutCompletionRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

/// Records belonging to `user_id`, newest date first
pub fn records_for_user(path: &Path, user_id: &str) -> Result<Vec<WorkoutCompletionRecord>> {
    let mut records: Vec<_> = read_records(path)?
        .into_iter()
        .filter(|r| r.user_id.as_deref() == Some(user_id))
        .collect();

    records.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(records)
}
