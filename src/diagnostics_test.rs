use tracing_subscriber::layer::SubscriberExt;

use super::*;

fn service() -> (Arc<DiagnosticsService>, ManualClock) {
    let clock = ManualClock::new(1_000_000);
    let service = DiagnosticsService::new(Arc::new(clock.clone()));
    (service, clock)
}

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

#[derive(Debug, thiserror::Error)]
#[error("save failed")]
struct SaveFailed(#[source] DiskFull);

// =============================================================
// snapshot
// =============================================================

#[test]
fn snapshot_is_none_without_activity() {
    let (service, _) = service();
    service.ensure_installed();
    assert!(service.snapshot().is_none());
}

#[test]
fn nothing_is_recorded_before_install() {
    let (service, _) = service();
    service.record_console(ConsoleLevel::Log, &[ConsoleArg::text("early")]);
    service.record_error(&DiskFull);
    assert!(service.snapshot().is_none());
    assert!(!service.is_installed());
}

#[test]
fn snapshot_includes_trace_and_console() {
    let (service, _) = service();
    service.ensure_installed();
    service.record_error(&SaveFailed(DiskFull));
    service.record_console(ConsoleLevel::Info, &[ConsoleArg::text("loaded"), ConsoleArg::value(&42)]);

    let snapshot = service.snapshot().unwrap();
    assert_eq!(snapshot.trace.as_deref(), Some("save failed\n  caused by: disk full"));
    let console = snapshot.console.unwrap();
    assert_eq!(console.len(), 1);
    assert_eq!(console[0].level, ConsoleLevel::Info);
    assert_eq!(console[0].message, "loaded 42");
    assert_eq!(console[0].timestamp, 1_000_000);
}

#[test]
fn stale_trace_is_dropped_at_read_time() {
    let (service, clock) = service();
    service.ensure_installed();
    service.record_error(&DiskFull);
    service.record_console(ConsoleLevel::Warn, &[ConsoleArg::text("low space")]);

    clock.advance(MAX_ERROR_AGE_MS - 1);
    assert!(service.snapshot().unwrap().trace.is_some());

    clock.advance(1);
    let snapshot = service.snapshot().unwrap();
    assert!(snapshot.trace.is_none());
    assert_eq!(snapshot.console.map(|c| c.len()), Some(1));
}

#[test]
fn stale_trace_alone_yields_no_snapshot() {
    let (service, clock) = service();
    service.ensure_installed();
    service.record_error(&DiskFull);
    clock.advance(MAX_ERROR_AGE_MS);
    assert!(service.snapshot().is_none());
}

#[test]
fn ring_buffer_evicts_oldest_entries() {
    let (service, _) = service();
    service.ensure_installed();
    for i in 0..(MAX_CONSOLE_ENTRIES + 5) {
        service.record_console(ConsoleLevel::Log, &[ConsoleArg::text(format!("entry {i}"))]);
    }

    let console = service.snapshot().unwrap().console.unwrap();
    assert_eq!(console.len(), MAX_CONSOLE_ENTRIES);
    assert_eq!(console[0].message, "entry 5");
    assert_eq!(console[MAX_CONSOLE_ENTRIES - 1].message, format!("entry {}", MAX_CONSOLE_ENTRIES + 4));
}

#[test]
fn messages_are_truncated() {
    let (service, _) = service();
    service.ensure_installed();
    service.record_console(ConsoleLevel::Log, &[ConsoleArg::text("é".repeat(MAX_MESSAGE_LENGTH + 20))]);

    let console = service.snapshot().unwrap().console.unwrap();
    assert_eq!(console[0].message.chars().count(), MAX_MESSAGE_LENGTH);
}

#[test]
fn error_argument_at_error_level_sets_trace() {
    let (service, _) = service();
    service.ensure_installed();
    service.record_console(ConsoleLevel::Error, &[ConsoleArg::text("boom:"), ConsoleArg::error(&SaveFailed(DiskFull))]);

    let snapshot = service.snapshot().unwrap();
    assert_eq!(snapshot.trace.as_deref(), Some("save failed\n  caused by: disk full"));
    assert_eq!(snapshot.console.unwrap()[0].message, "boom: save failed\n  caused by: disk full");
}

#[test]
fn error_argument_at_warn_level_does_not_set_trace() {
    let (service, _) = service();
    service.ensure_installed();
    service.record_console(ConsoleLevel::Warn, &[ConsoleArg::error(&DiskFull)]);

    let snapshot = service.snapshot().unwrap();
    assert!(snapshot.trace.is_none());
    assert_eq!(snapshot.console.unwrap()[0].message, "disk full");
}

// =============================================================
// ConsoleArg formatting
// =============================================================

#[test]
fn value_args_render_as_json() {
    let arg = ConsoleArg::value(&serde_json::json!({ "a": [1, 2] }));
    assert_eq!(arg, ConsoleArg::Value(r#"{"a":[1,2]}"#.to_string()));
}

#[test]
fn value_args_fall_back_to_debug_on_serialize_failure() {
    use std::collections::HashMap;

    // Non-string map keys cannot be serialized to JSON.
    let map: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
    let ConsoleArg::Value(rendered) = ConsoleArg::value(&map) else {
        panic!("expected value arg");
    };
    assert_eq!(rendered, "{(1, 2): 3}");
}

#[test]
fn error_without_source_renders_message() {
    assert_eq!(ConsoleArg::error(&DiskFull), ConsoleArg::Error { message: "disk full".into(), stack: None });
}

// =============================================================
// install / layer / panic hook
// =============================================================

#[test]
fn ensure_installed_is_idempotent() {
    let (service, _) = service();
    service.ensure_installed();
    service.record_console(ConsoleLevel::Log, &[ConsoleArg::text("kept")]);
    service.ensure_installed();
    assert_eq!(service.snapshot().unwrap().console.unwrap().len(), 1);
}

#[test]
fn capture_layer_records_host_events() {
    let (service, _) = service();
    service.ensure_installed();
    let subscriber = tracing_subscriber::registry().with(service.layer());

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "host::app", user = 7, "page loaded");
        tracing::debug!(target: "host::app", "verbose");
        tracing::error!(target: "host::app", error = &SaveFailed(DiskFull) as &(dyn std::error::Error + 'static), "save");
        tracing::warn!(target: "boop::submit", "own event");
    });

    let snapshot = service.snapshot().unwrap();
    let console = snapshot.console.unwrap();
    assert_eq!(console.len(), 3);
    assert_eq!(console[0].level, ConsoleLevel::Info);
    assert_eq!(console[0].message, "page loaded user=7");
    assert_eq!(console[1].level, ConsoleLevel::Log);
    assert_eq!(console[2].level, ConsoleLevel::Error);
    assert_eq!(snapshot.trace.as_deref(), Some("save failed\n  caused by: disk full"));
}

#[test]
fn capture_layer_ignores_events_before_install() {
    let (service, _) = service();
    let subscriber = tracing_subscriber::registry().with(service.layer());
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(target: "host::app", "too early");
    });
    assert!(service.snapshot().is_none());
}

#[test]
fn panic_capture_records_panic_message() {
    let clock = ManualClock::new(5);
    let service = DiagnosticsService::with_panic_capture(Arc::new(clock));
    service.ensure_installed();

    let result = std::panic::catch_unwind(|| panic!("widget exploded"));
    assert!(result.is_err());

    let trace = service.snapshot().and_then(|s| s.trace).unwrap();
    assert!(trace.starts_with("widget exploded"), "unexpected trace: {trace}");
    assert!(trace.contains("diagnostics_test.rs"));
}

#[test]
fn snapshot_serializes_wire_shape() {
    let snapshot = StackSnapshot {
        trace: None,
        console: Some(vec![ConsoleEntry { level: ConsoleLevel::Warn, message: "m".into(), timestamp: 9 }]),
    };
    assert_eq!(
        serde_json::to_value(&snapshot).unwrap(),
        serde_json::json!({ "console": [{ "level": "warn", "message": "m", "timestamp": 9 }] })
    );
}
