//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and a [`LogContext`].
//!
//! [`DispatchLayer`] is a tracing-subscriber layer that turns each tracing
//! event into one log call, so code instrumented with the standard tracing
//! macros (trace!, debug!, info!, warn!, error!) ends up on the same console
//! and system log as the call-site macros, subject to the same level and
//! rate gates.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{LogContext, init_tracing};
//!
//! let ctx = LogContext::builder().build();
//! ctx.initialize();
//! init_tracing(ctx.clone())?;
//!
//! tracing::warn!(target: "bdev::nvme", "controller reset");
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::dispatch::{Location, LogContext};
use crate::level::Level;

/// A tracing layer that forwards events into a [`LogContext`].
///
/// Levels map ERROR→Error, WARN→Warn, INFO→Info, and both DEBUG and TRACE
/// to Debug. The event's file and line become the location; the module path
/// (or the target when the module is unknown) fills the function slot.
#[derive(Debug, Clone)]
pub struct DispatchLayer {
    ctx: Arc<LogContext>,
}

impl DispatchLayer {
    /// Creates a layer writing to `ctx`.
    #[must_use]
    pub const fn new(ctx: Arc<LogContext>) -> Self {
        Self { ctx }
    }

    /// The context events are forwarded to.
    pub fn context(&self) -> &Arc<LogContext> {
        &self.ctx
    }

    const fn map_level(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        }
    }

    fn location(metadata: &'static tracing::Metadata<'static>) -> Option<Location> {
        let file = metadata.file()?;
        let line = metadata.line().unwrap_or(0);
        let func = metadata.module_path().unwrap_or_else(|| metadata.target());
        Some(Location::new(file, line, func))
    }
}

impl<S> Layer<S> for DispatchLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::map_level(metadata.level());

        // Cheap pre-check so filtered events never format their fields.
        if !self.ctx.has_hook() && !self.ctx.policy().admits(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.ctx.log(
            level,
            Self::location(metadata),
            format_args!("{}", visitor.finish()),
        );
    }
}

/// Collects the `message` field followed by any other fields as `name=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        let Self {
            mut message,
            fields,
        } = self;
        if message.is_empty() {
            return fields;
        }
        if !fields.is_empty() {
            message.push(' ');
            message.push_str(&fields);
        }
        message
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", field.name(), value);
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.push_field(field, format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field, format_args!("{value}"));
        }
    }
}

/// Installs a [`DispatchLayer`] for `ctx` as the global tracing subscriber.
///
/// Fails when a global subscriber is already set.
pub fn init_tracing(ctx: Arc<LogContext>) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(DispatchLayer::new(ctx))
        .try_init()
}

/// Like [`init_tracing`], with `filter` applied ahead of the dispatch layer.
///
/// ```rust,ignore
/// use logging::{LogContext, init_tracing_with_filter};
/// use tracing_subscriber::EnvFilter;
///
/// let ctx = LogContext::builder().build();
/// init_tracing_with_filter(ctx, EnvFilter::from_default_env())?;
/// ```
pub fn init_tracing_with_filter<F>(ctx: Arc<LogContext>, filter: F) -> Result<(), TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(DispatchLayer::new(ctx))
        .try_init()
}
