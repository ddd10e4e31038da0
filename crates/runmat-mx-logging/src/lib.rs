use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Environment variable holding an `EnvFilter` directive for the view layer.
pub const LOG_ENV: &str = "RUNMAT_MX_LOG";

#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub ts: String,
    pub level: String,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub name: String,
    pub cat: String,
    pub ph: String,
    pub ts: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<JsonValue>,
}

type LogHook = Arc<dyn Fn(&LogRecord) + Send + Sync>;
type TraceHook = Arc<dyn Fn(&[TraceEvent]) + Send + Sync>;

static LOG_HOOK: OnceCell<LogHook> = OnceCell::new();
static TRACE_HOOK: OnceCell<TraceHook> = OnceCell::new();

pub struct LoggingGuard {
    _guard: Option<DefaultGuard>,
}

#[derive(Clone)]
pub struct LoggingOptions {
    /// Directive used when neither `RUNMAT_MX_LOG` nor `RUST_LOG` is set.
    pub filter: String,
    pub enable_traces: bool,
    pub pid: i64,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            enable_traces: false,
            pid: std::process::id() as i64,
        }
    }
}

/// Route every log record to `hook`, e.g. the host's console. Only the first hook sticks.
pub fn set_log_hook<F>(hook: F)
where
    F: Fn(&LogRecord) + Send + Sync + 'static,
{
    let _ = LOG_HOOK.set(Arc::new(hook));
}

pub fn set_trace_hook<F>(hook: F)
where
    F: Fn(&[TraceEvent]) + Send + Sync + 'static,
{
    let _ = TRACE_HOOK.set(Arc::new(hook));
}

pub fn init_logging(opts: LoggingOptions) -> LoggingGuard {
    // log:: macros flow into tracing
    let _ = LogTracer::init();

    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(&opts.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let build_subscriber = || {
        let trace_layer = if opts.enable_traces {
            Some(TraceBridgeLayer { pid: opts.pid })
        } else {
            None
        };
        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(LogBridgeLayer)
            .with(trace_layer)
    };

    let guard = match tracing::subscriber::set_global_default(build_subscriber()) {
        Ok(()) => None,
        Err(_) => Some(tracing::subscriber::set_default(build_subscriber())),
    };

    LoggingGuard { _guard: guard }
}

/// Run `f` inside an `mx_entry` span carrying the entry-point name.
pub fn with_entry_span<T>(entry: &str, f: impl FnOnce() -> T) -> T {
    let span = tracing::info_span!("mx_entry", entry = entry);
    let _enter = span.enter();
    f()
}

struct LogBridgeLayer;

#[derive(Clone)]
struct TraceBridgeLayer {
    pid: i64,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn now_timestamp_micros() -> i64 {
    chrono::Utc::now().timestamp_micros()
}

fn current_span_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string())
}

impl<S> Layer<S> for LogBridgeLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = JsonVisitor::default();
        attrs.record(&mut visitor);
        let entry = visitor
            .fields
            .as_ref()
            .and_then(|v| v.get("entry"))
            .and_then(|v| v.as_str())
            .map(|s| EntryName(s.to_string()));
        if let (Some(entry), Some(span)) = (entry, ctx.span(id)) {
            span.extensions_mut().insert(entry);
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let hook = match LOG_HOOK.get() {
            Some(h) => h,
            None => return,
        };

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let entry = ctx.event_scope(event).and_then(|scope| {
            scope
                .from_root()
                .filter_map(|span| span.extensions().get::<EntryName>().map(|e| e.0.clone()))
                .last()
        });

        let record = LogRecord {
            ts: now_rfc3339(),
            level: event.metadata().level().to_string(),
            target: event.metadata().target().to_string(),
            message: visitor
                .message
                .unwrap_or_else(|| event.metadata().name().to_string()),
            span_id: current_span_id(),
            entry,
            fields: visitor
                .fields
                .filter(|obj| obj.as_object().map(|m| !m.is_empty()).unwrap_or(false)),
        };

        hook(&record);
    }
}

/// Entry-point name stored on `mx_entry` spans.
struct EntryName(String);

impl<S> Layer<S> for TraceBridgeLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_enter(&self, id: &tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            emit_span_event(span, "B", self.pid);
        }
    }

    fn on_exit(&self, id: &tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            emit_span_event(span, "E", self.pid);
        }
    }
}

fn emit_span_event<S>(span: tracing_subscriber::registry::SpanRef<'_, S>, phase: &str, pid: i64)
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let hook = match TRACE_HOOK.get() {
        Some(h) => h,
        None => return,
    };
    let meta = span.metadata();
    let args = span
        .extensions()
        .get::<EntryName>()
        .map(|e| serde_json::json!({ "entry": e.0 }));
    let ev = TraceEvent {
        name: meta.name().to_string(),
        cat: meta.target().to_string(),
        ph: phase.to_string(),
        ts: now_timestamp_micros(),
        pid: Some(pid),
        span_id: Some(span.id().into_u64().to_string()),
        args,
    };
    hook(&[ev]);
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Option<JsonValue>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &tracing::field::Field, entry: JsonValue) {
        if field.name() == "message" {
            self.message = Some(match entry {
                JsonValue::String(s) => s,
                other => other.to_string(),
            });
            return;
        }
        let obj = self
            .fields
            .get_or_insert_with(|| JsonValue::Object(Default::default()));
        if let JsonValue::Object(map) = obj {
            map.insert(field.name().to_string(), entry);
        }
    }
}

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.insert(field, JsonValue::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.insert(field, JsonValue::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.insert(field, JsonValue::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.insert(field, JsonValue::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.insert(field, JsonValue::Bool(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing::info;

    #[test]
    fn visitor_keeps_message_apart_from_fields() {
        let captured: Arc<Mutex<Vec<LogRecord>>> = Arc::new(Mutex::new(Vec::new()));
        let hook = {
            let c = captured.clone();
            move |rec: &LogRecord| {
                c.lock().unwrap().push(rec.clone());
            }
        };
        set_log_hook(hook);
        let _guard = init_logging(LoggingOptions {
            filter: "info".to_string(),
            enable_traces: true,
            pid: 1,
        });

        with_entry_span("mexdemo", || {
            info!(count = 3u64, "extracted inputs");
        });

        let items = captured.lock().unwrap();
        let rec = items
            .iter()
            .find(|r| r.message == "extracted inputs")
            .expect("record for the event");
        assert_eq!(rec.entry.as_deref(), Some("mexdemo"));
        assert_eq!(
            rec.fields.as_ref().and_then(|f| f.get("count")),
            Some(&JsonValue::from(3u64))
        );
    }
}
