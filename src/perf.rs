//! Timing scopes and the optional debug event log.
//!
//! Both are off unless switched on from the command line, so library code
//! can call [`log_event`] freely.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Instant;

static TIMING: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: LazyLock<Mutex<EventLog>> = LazyLock::new(|| Mutex::new(EventLog::new()));

/// Times the enclosing block; reports when dropped.
#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
    enabled: bool,
}

impl Scope {
    fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        writeln!(out, "[perf] {}: {elapsed_ms:.2} ms", self.name)?;
        tracing::debug!(scope = self.name, elapsed_ms, "timing");
        log_event("perf", format!("{} took {elapsed_ms:.2} ms", self.name));
        Ok(())
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let _ = self.report(&mut io::stderr().lock());
    }
}

#[derive(Debug)]
struct EventLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl EventLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
}

fn event_log() -> MutexGuard<'static, EventLog> {
    EVENT_LOG.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

pub fn set_timing_enabled(enabled: bool) {
    TIMING.store(enabled, Ordering::Relaxed);
}

pub fn is_timing_enabled() -> bool {
    TIMING.load(Ordering::Relaxed)
}

/// Start timing `name`. Whether it reports is fixed when the scope opens.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
        enabled: is_timing_enabled(),
    }
}

/// Start writing events to `path`, or stop with `None`.
pub fn set_event_log_path(path: Option<&Path>) -> io::Result<()> {
    let mut log = event_log();
    let Some(path) = path else {
        log.writer = None;
        return Ok(());
    };
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "nexvi event log start")?;
    writer.flush()?;
    log.start = Instant::now();
    log.writer = Some(writer);
    Ok(())
}

pub fn is_event_log_enabled() -> bool {
    event_log().writer.is_some()
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut log = event_log();
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = log.writer.as_mut() {
        let _ = writeln!(writer, "[{elapsed_ms:>10.3} ms] {name}: {}", detail.as_ref());
        let _ = writer.flush();
    }
}
