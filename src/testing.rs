use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::{Once, OnceLock};
use tracing::field::Field;
use tracing_subscriber::fmt::{self, format::Writer, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

/// Writes each event indented by span depth, prefixed with the innermost span.
struct IndentedEvents;

fn ansi_escape() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap())
}

impl<S, N> FormatEvent<S, N> for IndentedEvents
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut fields = BTreeMap::new();
        event.record(&mut |field: &Field, value: &dyn Debug| {
            fields.insert(field.name().to_string(), format!("{value:?}"));
        });
        let message = fields.remove("message").unwrap_or_default();

        let (depth, scope) = match ctx.event_scope() {
            Some(scope) => {
                let spans: Vec<_> = scope.from_root().collect();
                let name = spans
                    .last()
                    .map(|span| span.name().to_string())
                    .unwrap_or_default();
                (spans.len(), name)
            }
            None => (0, String::new()),
        };

        let rest = fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        let rest = ansi_escape().replace_all(&rest, "");
        let indent = "  ".repeat(depth);
        writeln!(
            writer,
            "{indent}[{level}] {scope}: {message} {rest}",
            level = event.metadata().level()
        )
    }
}

static INIT: Once = Once::new();

/// Routes library tracing output to the test harness, once per process.
pub fn init_testing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .event_format(IndentedEvents)
            .finish()
            .init();
    });
}
