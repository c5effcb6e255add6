//! Tracing setup shared by the tutor backend binary.
//!
//! The layer renders events from the workspace crates only, so noisy
//! transport crates (hyper, h2, tonic) stay quiet unless `RUST_LOG` asks
//! for them through the global filter.

use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefixes of the crates whose events the layer renders.
pub const WORKSPACE_TARGETS: &[&str] = &[
    "paa_tutor_backend",
    "api",
    "arbiter",
    "rag_store",
    "services",
    "ai_llm_service",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

fn is_workspace_target(target: &str) -> bool {
    WORKSPACE_TARGETS
        .iter()
        .any(|p| target == *p || target.starts_with(&format!("{p}::")))
}

/// Compact single-line format: RFC3339 time, level, target, `file:line`.
fn event_format() -> fmt::format::Format<fmt::format::Compact, ChronoRfc3339Utc> {
    fmt::format()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_source_location(true)
        .compact()
}

/// Formatting layer for workspace-originated events.
///
/// - RFC3339 UTC timestamps
/// - compact single-line format with target and `file:line`
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    fmt::layer()
        .with_ansi(use_ansi)
        .event_format(event_format())
        .with_filter(only_workspace)
}

/// Level directive for a single crate target, e.g. `arbiter=debug`.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    let s = format!("{target}={}", level.as_str().to_lowercase());
    Directive::from_str(&s).ok()
}

/// `EnvFilter` from `RUST_LOG`, or `default` with every workspace crate
/// raised to `level`.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    if let Ok(f) = EnvFilter::try_from_default_env() {
        return f;
    }
    WORKSPACE_TARGETS
        .iter()
        .filter_map(|t| level_directive(t, level))
        .fold(EnvFilter::new(default), EnvFilter::add_directive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn events_start_with_rfc3339_utc_time() {
        let out = Captured::default();
        let sink = out.clone();
        let subscriber = fmt::fmt()
            .with_ansi(false)
            .event_format(event_format())
            .with_writer(move || sink.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "arbiter::pipeline", "exact match found");
        });

        let line = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let stamp = line.split_whitespace().next().unwrap();
        assert!(stamp.ends_with('Z'), "{line}");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{line}");
        assert!(line.contains("arbiter::pipeline"));
        assert!(line.contains("exact match found"));
    }

    #[test]
    fn matches_crate_and_submodules_only() {
        assert!(is_workspace_target("arbiter"));
        assert!(is_workspace_target("arbiter::pipeline"));
        assert!(is_workspace_target("ai_llm_service::services::open_ai_service"));
        assert!(!is_workspace_target("apiary"));
        assert!(!is_workspace_target("hyper::proto"));
    }

    #[test]
    fn builds_directive() {
        let d = level_directive("rag_store", Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "rag_store=debug");
    }
}
