// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output always; when a log directory is given, a timestamped run
//! folder receives a daily-rolling `spikenn.log` as well.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

/// Keeps the non-blocking file writer alive; logs are flushed on drop.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
    run_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn run_dir(&self) -> Option<&Path> {
        self.run_dir.as_deref()
    }
}

/// Initialize the global subscriber
///
/// # Arguments
/// * `debug_flags` - Per-crate debug flags
/// * `default_level` - Level for everything not raised by a flag
/// * `log_dir` - Base directory for file logs; `None` logs to the console only
///
/// `RUST_LOG`, when set, replaces the filter built from the flags.
pub fn init_logging(
    debug_flags: &CrateDebugFlags,
    default_level: &str,
    log_dir: Option<&Path>,
) -> Result<LoggingGuard> {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| debug_flags.to_filter_string(default_level));
    let make_filter =
        || EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(make_filter()?)
        .boxed();

    let (file_layer, file_guard, run_dir) = match log_dir {
        Some(base) => {
            let run_dir = base.join(format!("run_{}", Utc::now().format("%Y%m%d_%H%M%S")));
            std::fs::create_dir_all(&run_dir).with_context(|| {
                format!("Failed to create log directory: {}", run_dir.display())
            })?;

            let appender = rolling::daily(&run_dir, "spikenn.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(make_filter()?)
                .boxed();
            (Some(layer), Some(guard), Some(run_dir))
        }
        None => (None, None, None),
    };

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
        run_dir,
    })
}
