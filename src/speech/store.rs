//! Numbered WAV files on disk, plus the recent-history listing.
//!
//! Ids come from scanning for the largest numeric stem, but a file is only
//! claimed through `create_new`, so two writers can never get the same id.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::Mutex;

use super::wav;
use crate::error::Result;

const AUDIO_EXTENSION: &str = "wav";
const URL_PREFIX: &str = "/audio";

/// One entry of the `/history` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioRecord {
    pub filename: String,
    pub url: String,
    pub date: String,
}

/// A freshly written audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAudio {
    pub id: u64,
    pub filename: String,
    pub path: PathBuf,
    pub url: String,
}

pub struct AudioStore {
    dir: PathBuf,
    // Serializes reservations inside this process; create_new covers the rest.
    reserve_lock: Mutex<()>,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reserve_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn url_for(filename: &str) -> String {
        format!("{URL_PREFIX}/{filename}")
    }

    /// Encode `pcm` as WAV under the next free id.
    pub async fn save_pcm(&self, pcm: Vec<u8>) -> Result<SavedAudio> {
        let _guard = self.reserve_lock.lock().await;
        let dir = self.dir.clone();

        let saved = tokio::task::spawn_blocking(move || -> Result<SavedAudio> {
            let (id, path, file) = reserve_next(&dir)?;
            let written = wav::write_pcm(BufWriter::new(file), &pcm);
            if let Err(e) = written {
                // Don't leave a truncated file holding the id.
                let _ = std::fs::remove_file(&path);
                return Err(e);
            }
            let filename = file_name_for(id);
            Ok(SavedAudio {
                id,
                url: Self::url_for(&filename),
                filename,
                path,
            })
        })
        .await
        .map_err(|e| std::io::Error::other(format!("audio writer task failed: {e}")))??;

        tracing::info!("Saved audio {} ({})", saved.filename, saved.path.display());
        Ok(saved)
    }

    /// Up to `limit` audio files, newest modification time first.
    ///
    /// A missing or unreadable directory yields an empty list.
    pub fn recent(&self, limit: usize) -> Vec<AudioRecord> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!("Cannot read audio directory {}: {}", self.dir.display(), e);
                }
                return Vec::new();
            }
        };

        let mut files: Vec<(SystemTime, String)> = entries
            .flatten()
            .filter(|e| has_audio_extension(&e.path()))
            .filter_map(|e| {
                let meta = e.metadata().ok()?;
                if !meta.is_file() {
                    return None;
                }
                let name = e.file_name().into_string().ok()?;
                Some((meta.modified().ok()?, name))
            })
            .collect();

        files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

        files
            .into_iter()
            .take(limit)
            .map(|(modified, filename)| AudioRecord {
                url: Self::url_for(&filename),
                date: format_date(modified),
                filename,
            })
            .collect()
    }
}

fn file_name_for(id: u64) -> String {
    format!("{id}.{AUDIO_EXTENSION}")
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(AUDIO_EXTENSION)
}

fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Largest numeric stem among `*.wav` files, 0 when there are none.
fn max_existing_id(dir: &Path) -> u64 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| has_audio_extension(p))
        .filter_map(|p| p.file_stem()?.to_str()?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
}

fn next_id(id: u64) -> Result<u64> {
    id.checked_add(1)
        .ok_or_else(|| std::io::Error::other("audio id space exhausted").into())
}

/// Atomically claim the next unused id and return its open file.
fn reserve_next(dir: &Path) -> Result<(u64, PathBuf, File)> {
    std::fs::create_dir_all(dir)?;

    let mut id = next_id(max_existing_id(dir))?;
    loop {
        let path = dir.join(file_name_for(id));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((id, path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let next = next_id(id)?;
                tracing::debug!("Audio id {} taken, trying {}", id, next);
                id = next;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
