//! Logging setup.
//!
//! Initializes a console layer plus an optional daily-rotating file sink,
//! both formatted as `timestamp - target - level - message`, one line per
//! event. The file sink is non-blocking; its [`WorkerGuard`] must be held
//! alive for the lifetime of the process, or buffered lines are dropped on
//! exit instead of flushed.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::FormatFields;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

pub use tracing_appender::non_blocking::WorkerGuard;

/// `timestamp - target - level - message`, matching the layout of the
/// file-based logging this crate's data-generation pipeline replaces.
struct PlainFormatter;

impl<S, N> FormatEvent<S, N> for PlainFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        SystemTime.format_time(&mut writer)?;
        write!(writer, " - {} - {} - ", meta.target(), meta.level())?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initializes the global tracing subscriber.
///
/// `log_level` is an `EnvFilter` directive (e.g. `"info"`,
/// `"edf_hyperedge_gen=debug,warn"`). When `log_dir` is set, a second,
/// non-blocking layer writes daily-rotating files under it in addition to
/// stderr; the returned guard must be kept alive by the caller (typically
/// bound in `main`'s local scope) for those writes to be flushed.
pub fn init(log_level: &str, log_dir: Option<&Path>) -> std::io::Result<Option<WorkerGuard>> {
    let console_filter = EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(PlainFormatter)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry()
        .with(console_filter)
        .with(console_layer);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "edf-hyperedge-gen.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
            let file_layer = tracing_subscriber::fmt::layer()
                .event_format(PlainFormatter)
                .with_ansi(false)
                .with_writer(non_blocking);

            registry.with(file_filter).with(file_layer).init();
            Ok(Some(guard))
        }
        None => {
            registry.init();
            Ok(None)
        }
    }
}
