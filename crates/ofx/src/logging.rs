//! File-backed logging for plugin binaries.
//!
//! A plugin cdylib has no application around it to install a logger, so the
//! export machinery installs this one on first load. The sink is the file
//! named by `OFX_PLUGIN_LOGFILE` (default `ofxTestLog.txt`). Release builds
//! compile logging down to no-ops unless the consumer re-enables it.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

struct FileLogger {
    sink: Mutex<Option<File>>,
}

impl FileLogger {
    fn open_sink() -> Option<File> {
        let path = std::env::var("OFX_PLUGIN_LOGFILE")
            .unwrap_or_else(|_| "ofxTestLog.txt".to_string());
        OpenOptions::new().create(true).append(true).open(path).ok()
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut sink = match self.sink.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if sink.is_none() {
            *sink = Self::open_sink();
        }
        if let Some(file) = sink.as_mut() {
            let _ = writeln!(file, "{:5} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            if let Some(file) = sink.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

static LOGGER: FileLogger = FileLogger { sink: Mutex::new(None) };

/// Installs the file logger. Harmless to call more than once, and a no-op
/// when the consumer already installed its own logger.
pub fn init() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
