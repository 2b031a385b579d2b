//! Diagnostics capture of recent log activity and the latest error stack.
//!
//! DESIGN
//! ======
//! A `DiagnosticsService` owns a bounded ring of console entries and a
//! "last error" slot. Capture is opt-in: nothing is recorded until
//! `ensure_installed` runs. Installation is idempotent.
//!
//! Two feeds write into a service:
//! - `CaptureLayer`, a `tracing_subscriber::Layer` the host adds next to its
//!   own layers. Events still reach every other layer unchanged.
//! - A chained panic hook (services built `with_panic_capture`, including the
//!   global one). It records the panic, then calls the previously installed hook.
//!
//! TRADE-OFFS
//! ==========
//! Stale traces are dropped when a snapshot is read, not when time passes;
//! there is no background timer. Events emitted by this crate itself are not
//! captured so a submission never records its own lifecycle logs.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

pub const MAX_CONSOLE_ENTRIES: usize = 50;
pub const MAX_MESSAGE_LENGTH: usize = 500;
pub const MAX_ERROR_AGE_MS: u64 = 5 * 60 * 1000;

// =============================================================================
// CLOCK
// =============================================================================

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Hand-driven clock for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(start_ms)))
    }

    pub fn advance(&self, ms: u64) {
        self.0.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// SNAPSHOT TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
}

impl From<&Level> for ConsoleLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO => Self::Info,
            _ => Self::Log,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    pub message: String,
    /// Epoch milliseconds.
    pub timestamp: u64,
}

/// Recent activity attached to a submission under `metadata.stack`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StackSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console: Option<Vec<ConsoleEntry>>,
}

// =============================================================================
// CONSOLE ARGUMENTS
// =============================================================================

/// One logged argument, formatted the way it appears in a console entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleArg {
    Text(String),
    /// An error, with its source chain as the stack when one exists.
    Error { message: String, stack: Option<String> },
    /// A pre-rendered structured value.
    Value(String),
}

impl ConsoleArg {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn error(error: &(dyn std::error::Error + 'static)) -> Self {
        Self::Error { message: error.to_string(), stack: error_chain(error) }
    }

    /// JSON rendering of `value`, falling back to its `Debug` form when
    /// serialization fails.
    pub fn value<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::Value(serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}")))
    }

    fn render(&self) -> &str {
        match self {
            Self::Text(text) | Self::Value(text) => text,
            Self::Error { message, stack } => stack.as_deref().unwrap_or(message),
        }
    }

    fn error_stack(&self) -> Option<&str> {
        match self {
            Self::Error { .. } => Some(self.render()),
            _ => None,
        }
    }
}

/// `message\n  caused by: source...` when the error has sources.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> Option<String> {
    let mut source = error.source()?;
    let mut chain = error.to_string();
    loop {
        let _ = write!(chain, "\n  caused by: {source}");
        match source.source() {
            Some(next) => source = next,
            None => return Some(chain),
        }
    }
}

fn truncate(message: &str) -> String {
    message.chars().take(MAX_MESSAGE_LENGTH).collect()
}

// =============================================================================
// SERVICE
// =============================================================================

#[derive(Default)]
struct CaptureState {
    console: VecDeque<ConsoleEntry>,
    last_error: Option<(String, u64)>,
}

/// Bounded capture of recent console activity and the latest error.
pub struct DiagnosticsService {
    clock: Arc<dyn Clock>,
    capture_panics: bool,
    installed: AtomicBool,
    state: Mutex<CaptureState>,
    this: Weak<DiagnosticsService>,
}

impl fmt::Debug for DiagnosticsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsService")
            .field("capture_panics", &self.capture_panics)
            .field("installed", &self.is_installed())
            .finish_non_exhaustive()
    }
}

impl DiagnosticsService {
    /// A service fed only by [`CaptureLayer`] and the `record_*` methods.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Arc<Self> {
        Self::build(clock, false)
    }

    /// A service that also records panics once installed.
    #[must_use]
    pub fn with_panic_capture(clock: Arc<dyn Clock>) -> Arc<Self> {
        Self::build(clock, true)
    }

    fn build(clock: Arc<dyn Clock>, capture_panics: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            clock,
            capture_panics,
            installed: AtomicBool::new(false),
            state: Mutex::new(CaptureState::default()),
            this: this.clone(),
        })
    }

    /// Process-wide default service on the system clock, with panic capture.
    #[must_use]
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<DiagnosticsService>> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::with_panic_capture(Arc::new(SystemClock))).clone()
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Start capturing. Safe to call from any number of sites; only the
    /// first call has an effect.
    pub fn ensure_installed(&self) {
        if self.installed.swap(true, Ordering::SeqCst) {
            return;
        }
        if self.capture_panics {
            let service = self.this.clone();
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                if let Some(service) = service.upgrade() {
                    service.record_panic(info);
                }
                previous(info);
            }));
        }
        tracing::debug!(capture_panics = self.capture_panics, "diagnostics capture installed");
    }

    /// A tracing layer feeding this service.
    #[must_use]
    pub fn layer(self: &Arc<Self>) -> CaptureLayer {
        CaptureLayer { service: Arc::clone(self) }
    }

    /// Append a console entry built from `args`. Ignored until installed.
    /// An `Error` argument at error level also becomes the last error stack.
    pub fn record_console(&self, level: ConsoleLevel, args: &[ConsoleArg]) {
        if !self.is_installed() {
            return;
        }
        let message = args.iter().map(ConsoleArg::render).collect::<Vec<_>>().join(" ");
        self.push_entry(level, &message);
        if level == ConsoleLevel::Error {
            if let Some(stack) = args.iter().find_map(ConsoleArg::error_stack) {
                self.record_error_stack(stack.to_string());
            }
        }
    }

    /// Remember `error` (with its source chain) as the most recent failure.
    pub fn record_error(&self, error: &(dyn std::error::Error + 'static)) {
        let stack = error_chain(error).unwrap_or_else(|| error.to_string());
        self.record_error_stack(stack);
    }

    /// Remember a pre-formatted stack as the most recent failure.
    pub fn record_error_stack(&self, stack: String) {
        if !self.is_installed() || stack.is_empty() {
            return;
        }
        let now = self.clock.now_ms();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.last_error = Some((stack, now));
    }

    fn push_entry(&self, level: ConsoleLevel, message: &str) {
        let entry = ConsoleEntry { level, message: truncate(message), timestamp: self.clock.now_ms() };
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.console.push_back(entry);
        while state.console.len() > MAX_CONSOLE_ENTRIES {
            state.console.pop_front();
        }
    }

    fn record_panic(&self, info: &std::panic::PanicHookInfo<'_>) {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string());
        let mut stack = match info.location() {
            Some(location) => format!("{payload}\n  at {location}"),
            None => payload,
        };
        let backtrace = std::backtrace::Backtrace::capture();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = write!(stack, "\n{backtrace}");
        }
        // The panicking thread may already hold the lock.
        if let Ok(mut state) = self.state.try_lock() {
            state.last_error = Some((stack, self.clock.now_ms()));
        }
    }

    /// Recent activity, or `None` when there is neither a fresh trace nor any
    /// buffered console entry. Traces older than [`MAX_ERROR_AGE_MS`] are omitted.
    #[must_use]
    pub fn snapshot(&self) -> Option<StackSnapshot> {
        let now = self.clock.now_ms();
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let trace = state
            .last_error
            .as_ref()
            .filter(|(_, at)| now.saturating_sub(*at) < MAX_ERROR_AGE_MS)
            .map(|(stack, _)| stack.clone());
        let console = (!state.console.is_empty()).then(|| state.console.iter().cloned().collect::<Vec<_>>());

        if trace.is_none() && console.is_none() {
            return None;
        }
        Some(StackSnapshot { trace, console })
    }
}

// =============================================================================
// TRACING LAYER
// =============================================================================

/// Records `tracing` events into a [`DiagnosticsService`].
///
/// ```ignore
/// tracing_subscriber::registry()
///     .with(tracing_subscriber::fmt::layer())
///     .with(DiagnosticsService::global().layer())
///     .init();
/// ```
#[derive(Debug, Clone)]
pub struct CaptureLayer {
    service: Arc<DiagnosticsService>,
}

fn is_own_target(target: &str) -> bool {
    let crate_name = env!("CARGO_CRATE_NAME");
    target == crate_name || target.strip_prefix(crate_name).is_some_and(|rest| rest.starts_with("::"))
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<String>,
    error: Option<String>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }

    fn into_message(self) -> String {
        self.message.into_iter().chain(self.fields).collect::<Vec<_>>().join(" ")
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        let rendered = error_chain(value).unwrap_or_else(|| value.to_string());
        self.error = Some(rendered.clone());
        self.push(field, rendered);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !self.service.is_installed() {
            return;
        }
        let metadata = event.metadata();
        if is_own_target(metadata.target()) {
            return;
        }
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = ConsoleLevel::from(metadata.level());
        let error = visitor.error.take();
        self.service.push_entry(level, &visitor.into_message());
        if level == ConsoleLevel::Error {
            if let Some(stack) = error {
                self.service.record_error_stack(stack);
            }
        }
    }
}

#[cfg(test)]
#[path = "diagnostics_test.rs"]
mod tests;
