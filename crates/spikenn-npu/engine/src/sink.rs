// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named append-only text streams for activity, weight and potential logs
//!
//! The engine decides what to write and when; a [`LogSink`] decides where.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::info;

pub trait LogSink: Send {
    /// Append `text` to the stream named `stream`, creating it on first use.
    fn append(&mut self, stream: &str, text: &str) -> io::Result<()>;
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn append(&mut self, _stream: &str, _text: &str) -> io::Result<()> {
        Ok(())
    }
}

/// One file per stream under a directory, opened lazily and flushed after
/// every write.
#[derive(Debug)]
pub struct FileLogSink {
    dir: PathBuf,
    files: AHashMap<String, File>,
}

impl FileLogSink {
    /// Creates `dir` if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            files: AHashMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `stream`
    pub fn stream_path(&self, stream: &str) -> PathBuf {
        self.dir.join(stream)
    }
}

impl LogSink for FileLogSink {
    fn append(&mut self, stream: &str, text: &str) -> io::Result<()> {
        if !self.files.contains_key(stream) {
            let path = self.stream_path(stream);
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            info!("[SINK] Opened log stream {}", path.display());
            self.files.insert(stream.to_string(), file);
        }
        if let Some(file) = self.files.get_mut(stream) {
            file.write_all(text.as_bytes())?;
            file.flush()?;
        }
        Ok(())
    }
}

/// In-memory sink; clones share the same streams.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogSink {
    streams: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream(&self, name: &str) -> Option<String> {
        self.streams.lock().get(name).cloned()
    }

    pub fn stream_names(&self) -> Vec<String> {
        self.streams.lock().keys().cloned().collect()
    }

    /// Lines of `name`, empty when the stream was never written
    pub fn lines(&self, name: &str) -> Vec<String> {
        self.stream(name)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

impl LogSink for MemoryLogSink {
    fn append(&mut self, stream: &str, text: &str) -> io::Result<()> {
        self.streams
            .lock()
            .entry(stream.to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_sink_appends_per_stream() {
        let sink = MemoryLogSink::new();
        let mut writer = sink.clone();
        writer.append("a", "1 2\n").unwrap();
        writer.append("a", "3 4\n").unwrap();
        writer.append("b", "x\n").unwrap();
        assert_eq!(sink.lines("a"), vec!["1 2", "3 4"]);
        assert_eq!(sink.stream_names(), vec!["a", "b"]);
        assert!(sink.lines("missing").is_empty());
    }

    #[test]
    fn test_file_sink_writes_through() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileLogSink::new(dir.path().join("activity")).unwrap();
        sink.append("Layer0Min1", "5 0\n").unwrap();
        sink.append("Layer0Min1", "6 1\n").unwrap();

        let written = fs::read_to_string(sink.stream_path("Layer0Min1")).unwrap();
        assert_eq!(written, "5 0\n6 1\n");
    }
}
