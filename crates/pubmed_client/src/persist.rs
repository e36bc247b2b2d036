//! Saving downloaded exports to disk.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::executor::Blob;
use crate::jobs::ExportFormat;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    #[error("cannot create output directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Creates `dir` (and parents) unless it already exists as a directory.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(PersistError::NotADirectory {
            path: dir.to_path_buf(),
        }),
        Err(_) => fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Which export a file holds; decides its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Metadata(ExportFormat),
    PdfArchive,
}

/// `job_{id}_results.csv`, `job_{id}_results.json`, or `job_{id}_pdfs.zip`.
/// Characters outside `[A-Za-z0-9_-]` in the job id become `_`.
pub fn export_file_name(job_id: &str, kind: ExportKind) -> String {
    let stem: String = job_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    match kind {
        ExportKind::Metadata(format) => format!("job_{stem}_results.{format}"),
        ExportKind::PdfArchive => format!("job_{stem}_pdfs.zip"),
    }
}

/// Writes into one output directory through a sibling temp file and a
/// rename, so a reader never observes a half-written export.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Replaces `{dir}/{filename}` with `content` and returns its path.
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        let target = self.dir.join(filename);
        let write_err = |source| PersistError::Write {
            path: target.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(content).map_err(write_err)?;
        tmp.as_file_mut().sync_all().map_err(write_err)?;
        tmp.persist(&target).map_err(|err| write_err(err.error))?;
        Ok(target)
    }

    /// Saves an export of `job_id` under its conventional file name.
    pub fn save_export(
        &self,
        job_id: &str,
        kind: ExportKind,
        blob: &Blob,
    ) -> Result<PathBuf, PersistError> {
        self.write(&export_file_name(job_id, kind), &blob.bytes)
    }
}
