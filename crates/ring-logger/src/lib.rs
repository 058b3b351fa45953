//! Ring Logger
//!
//! `tracing` layer that keeps the newest log lines in a circular buffer and
//! echoes them to the browser console (stderr off the web). The buffer is
//! readable at runtime so the app can show its own log.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Bounded line store; the oldest line is dropped when full
#[derive(Debug)]
pub struct RingBuffer {
    lines: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn push(&self, line: String) {
        let Ok(mut lines) = self.lines.lock() else {
            return;
        };
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.iter().cloned().collect()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Collects the message and the structured fields of an event
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

pub struct RingLayer {
    buffer: Arc<RingBuffer>,
    app_name: String,
    echo: bool,
}

impl RingLayer {
    pub fn new(buffer: Arc<RingBuffer>, app_name: &str) -> Self {
        Self {
            buffer,
            app_name: app_name.to_string(),
            echo: true,
        }
    }

    /// Keep lines in the buffer only
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }
}

impl<S: Subscriber> Layer<S> for RingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = format!(
            "[{}] {} {} {}: {}{}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.app_name,
            meta.level(),
            meta.target(),
            visitor.message,
            visitor.fields
        );
        if self.echo {
            emit(*meta.level(), &line);
        }
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = line.into();
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

static BUFFER: OnceLock<Arc<RingBuffer>> = OnceLock::new();

/// Install the global subscriber. Debug builds log at DEBUG, release at INFO.
/// Records from the `log` facade land in the same buffer.
pub fn init_logger(capacity: usize, app_name: &str) -> Result<(), LoggerError> {
    let buffer = Arc::new(RingBuffer::new(capacity));
    BUFFER.set(buffer.clone()).map_err(|_| LoggerError::AlreadyInitialized)?;

    let level = if cfg!(debug_assertions) { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::registry()
        .with(RingLayer::new(buffer, app_name).with_filter(level))
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    tracing::info!(capacity, "logger ready");
    Ok(())
}

/// Buffered lines, oldest first. Empty before [`init_logger`].
pub fn recent_lines() -> Vec<String> {
    BUFFER.get().map(|b| b.lines()).unwrap_or_default()
}

pub fn clear() {
    if let Some(buffer) = BUFFER.get() {
        buffer.clear();
    }
}
