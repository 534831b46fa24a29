use std::sync::OnceLock;

use regex::Regex;
use tracing::{field::Visit, Metadata, Subscriber};
use tracing_subscriber::layer::Context;

static IGNORE: OnceLock<IgnoreList> = OnceLock::new();

/// Compiled `log.ignore` patterns.
#[derive(Debug, Default)]
pub struct IgnoreList {
    patterns: Vec<Regex>,
}

impl IgnoreList {
    pub fn compile(patterns: &[String]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Patterns are matched against `"<target>: <message>"`.
    pub fn matches(&self, target: &str, message: &str) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let candidate = format!("{target}: {message}");
        self.patterns.iter().any(|p| p.is_match(&candidate))
    }
}

/// Install the log-ignore patterns from config. The first call wins.
///
/// Call after the subscriber is up and before extraction starts; PDF
/// parsing is where the noise comes from.
pub fn set_ignore_patterns(patterns: &[String]) -> Result<(), regex::Error> {
    let list = IgnoreList::compile(patterns)?;
    let _ = IGNORE.set(list);
    Ok(())
}

/// Per-layer filter dropping events matched by [`set_ignore_patterns`].
///
/// ```ignore
/// tracing_subscriber::fmt::layer().with_filter(LogIgnoreFilter)
/// ```
pub struct LogIgnoreFilter;

impl<S: Subscriber> tracing_subscriber::layer::Filter<S> for LogIgnoreFilter {
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        true
    }

    fn event_enabled(&self, event: &tracing::Event<'_>, _cx: &Context<'_, S>) -> bool {
        let Some(list) = IGNORE.get() else {
            return true;
        };
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        // Events bridged from the `log` crate carry target "log"; the real
        // crate name is in the `log.target` field.
        let target = visitor
            .log_target
            .as_deref()
            .unwrap_or_else(|| event.metadata().target());
        !list.matches(target, &visitor.message)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    log_target: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "log.target" => self.log_target = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "log.target" => self.log_target = Some(format!("{value:?}")),
            _ => {}
        }
    }
}
