// Logging utilities
// Author: Gabriel Demetrios Lafis

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// Initialize logging to stderr with the given level
pub fn init_logging(level: LevelFilter) -> Result<(), SetLoggerError> {
    install(SimpleLogger { level, file: None }, level)
}

/// Initialize logging to stderr and append plain lines to `path`.
/// Falls back to stderr only when the file cannot be opened.
pub fn init_logging_with_file<P: AsRef<Path>>(level: LevelFilter, path: P) -> Result<(), SetLoggerError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())
        .map_err(|err| eprintln!("Cannot open log file {}: {}", path.as_ref().display(), err))
        .ok()
        .map(Mutex::new);

    install(SimpleLogger { level, file }, level)
}

fn install(logger: SimpleLogger, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(logger)).map(|()| log::set_max_level(level))
}

/// Simple logger implementation
struct SimpleLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_str = match record.level() {
            Level::Error => "\x1B[31mERROR\x1B[0m",
            Level::Warn => "\x1B[33mWARN\x1B[0m",
            Level::Info => "\x1B[32mINFO\x1B[0m",
            Level::Debug => "\x1B[34mDEBUG\x1B[0m",
            Level::Trace => "\x1B[90mTRACE\x1B[0m",
        };
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        eprintln!("[{}] {}: {}", timestamp, level_str, record.args());

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "[{}] {}: {}", timestamp, record.level(), record.args());
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}
