#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Spans and events enabled:
//!   cargo test -p tinct-popover --features tracing --test tracing_tests
//!
//! Without the feature the macros compile to nothing:
//!   cargo test -p tinct-popover --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tinct_harness::Scene;
use tinct_popover::{PopoverConfig, PopoverEvent};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedEvent {
    message: String,
    fields: HashMap<String, String>,
    span: Option<String>,
}

#[derive(Default)]
struct Captured {
    spans: Vec<CapturedSpan>,
    events: Vec<CapturedEvent>,
}

struct Capture {
    inner: Arc<Mutex<Captured>>,
}

#[allow(dead_code)]
struct CaptureHandle {
    inner: Arc<Mutex<Captured>>,
}

impl Capture {
    fn new() -> (Self, CaptureHandle) {
        let inner = Arc::new(Mutex::new(Captured::default()));
        let handle = CaptureHandle {
            inner: inner.clone(),
        };
        (Self { inner }, handle)
    }
}

#[allow(dead_code)]
impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.inner.lock().unwrap().spans.clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.inner.lock().unwrap().events.clone()
    }

    fn event(&self, message: &str) -> Option<CapturedEvent> {
        self.events().into_iter().find(|e| e.message == message)
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.inner.lock().unwrap().spans.push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        let span = ctx
            .event_span(event)
            .map(|span_ref| span_ref.name().to_string());
        self.inner.lock().unwrap().events.push(CapturedEvent {
            message,
            fields,
            span,
        });
    }
}

fn with_capture(f: impl FnOnce()) -> CaptureHandle {
    let (layer, handle) = Capture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    handle
}

// ============================================================================
// Spans and events (requires --features tracing)
// ============================================================================

#[cfg(feature = "tracing")]
#[test]
fn attach_logs_scroll_targets() {
    let handle = with_capture(|| {
        let scene = Scene::new(1000.0, 800.0);
        let mut popover = scene.popover(&PopoverConfig::default());
        popover.attach();
    });

    let attached = handle.event("popover attached").expect("attach event");
    assert_eq!(attached.fields.get("scroll_targets").map(String::as_str), Some("1"));
    assert_eq!(attached.fields.get("observing").map(String::as_str), Some("false"));
    assert!(handle.event("popover detached").is_some());
}

#[cfg(feature = "tracing")]
#[test]
fn viewport_changes_open_an_update_span() {
    let handle = with_capture(|| {
        let scene = Scene::new(1000.0, 800.0);
        scene.controller.set_open(true);
        let mut popover = scene.popover(&PopoverConfig::default().close_on_scroll(true));
        popover.attach();
        popover.handle_event(PopoverEvent::Scroll);
    });

    let span = handle
        .spans()
        .into_iter()
        .find(|s| s.name == "popover_update")
        .expect("popover_update span");
    assert_eq!(span.fields.get("change").map(String::as_str), Some("Scroll"));

    let closing = handle.event("closing on scroll").expect("close event");
    assert_eq!(closing.span.as_deref(), Some("popover_update"));
}

#[cfg(feature = "tracing")]
#[test]
fn hidden_anchor_close_is_logged() {
    let handle = with_capture(|| {
        let scene = Scene::new(1000.0, 800.0);
        scene.controller.set_open(true);
        let mut popover = scene.popover(&PopoverConfig::default());
        popover.attach();
        scene
            .dom
            .set_rect(scene.anchor, tinct_popover::Rect::new(10.0, -100.0, 20.0, 20.0));
        popover.handle_event(PopoverEvent::Resize);
    });

    let change = handle
        .event("anchor visibility changed")
        .expect("visibility event");
    assert_eq!(change.fields.get("visible").map(String::as_str), Some("false"));
    assert!(handle.event("anchor left viewport, closing").is_some());
}

// ============================================================================
// Zero overhead (no feature)
// ============================================================================

#[cfg(not(feature = "tracing"))]
#[test]
fn zero_overhead_emits_nothing() {
    let handle = with_capture(|| {
        let scene = Scene::new(1000.0, 800.0);
        scene.controller.set_open(true);
        let mut popover = scene.popover(&PopoverConfig::default());
        popover.attach();
        popover.handle_event(PopoverEvent::Scroll);
        popover.handle_event(PopoverEvent::Resize);
    });

    assert!(handle.spans().is_empty());
    assert!(handle.events().is_empty());
}
