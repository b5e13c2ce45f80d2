// Event log - level-tagged lines mirrored to a file and the console, with
// error reports forwarded to the bot owner.
//
// The file and the owner's inbox are ports; the service only decides what
// gets written where.

use super::logging_models::{
    format_log_line, prefix_detail_line, prefix_error_line, CommandOrigin, ErrorReport, LogLevel,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

/// Append-only destination for log lines.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, line: &str) -> Result<()>;
}

/// Delivers error reports to the bot owner.
#[async_trait]
pub trait OwnerNotifier: Send + Sync {
    async fn notify(&self, report: &ErrorReport) -> Result<()>;
}

pub struct EventLog<S: LogSink, N: OwnerNotifier> {
    sink: S,
    notifier: N,
}

impl<S: LogSink, N: OwnerNotifier> EventLog<S, N> {
    pub fn new(sink: S, notifier: N) -> Self {
        Self { sink, notifier }
    }

    pub async fn info(&self, message: impl AsRef<str>, origin: &CommandOrigin) {
        self.log(LogLevel::Info, message.as_ref(), origin).await;
    }

    pub async fn warn(&self, message: impl AsRef<str>, origin: &CommandOrigin) {
        self.log(LogLevel::Warn, message.as_ref(), origin).await;
    }

    pub async fn error(&self, message: impl AsRef<str>, origin: &CommandOrigin) {
        self.log(LogLevel::Error, message.as_ref(), origin).await;
    }

    pub async fn debug(&self, message: impl AsRef<str>, origin: &CommandOrigin) {
        self.log(LogLevel::Debug, message.as_ref(), origin).await;
    }

    /// Write one event. Never fails: sink and delivery problems end up on the console.
    pub async fn log(&self, level: LogLevel, message: &str, origin: &CommandOrigin) {
        let line = format_log_line(level, Utc::now(), message);
        echo(level, &line);
        self.write(&line).await;

        match origin {
            CommandOrigin::Prefix(invocation) => match level {
                LogLevel::Info | LogLevel::Warn => {
                    let detail = prefix_detail_line(invocation);
                    tracing::info!("{}", detail.trim_end());
                    self.write(&detail).await;
                }
                LogLevel::Error => {
                    let detail = prefix_error_line(invocation, message);
                    tracing::error!("{}", detail.trim_end());
                    self.write(&detail).await;
                    self.report(ErrorReport::for_prefix(invocation, message))
                        .await;
                }
                LogLevel::Debug => {}
            },
            CommandOrigin::Slash(invocation) if level == LogLevel::Error => {
                self.report(ErrorReport::for_slash(invocation, message))
                    .await;
            }
            _ => {}
        }
    }

    async fn write(&self, line: &str) {
        if let Err(e) = self.sink.append(line).await {
            tracing::error!("Failed to write log file: {}", e);
        }
    }

    async fn report(&self, report: ErrorReport) {
        if let Err(e) = self.notifier.notify(&report).await {
            tracing::error!("Failed to send DM to owner: {}", e);
        }
    }
}

fn echo(level: LogLevel, line: &str) {
    let line = line.trim_end();
    match level {
        LogLevel::Info => tracing::info!("{}", line),
        LogLevel::Warn => tracing::warn!("{}", line),
        LogLevel::Error => tracing::error!("{}", line),
        LogLevel::Debug => tracing::debug!("{}", line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logging::logging_models::{PrefixInvocation, SlashInvocation};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MemorySink {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LogSink for Arc<MemorySink> {
        async fn append(&self, line: &str) -> Result<()> {
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockNotifier {
        reports: Mutex<Vec<ErrorReport>>,
        fail: bool,
    }

    #[async_trait]
    impl OwnerNotifier for Arc<MockNotifier> {
        async fn notify(&self, report: &ErrorReport) -> Result<()> {
            if self.fail {
                anyhow::bail!("DMs closed");
            }
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    fn event_log(
        fail_notify: bool,
    ) -> (
        EventLog<Arc<MemorySink>, Arc<MockNotifier>>,
        Arc<MemorySink>,
        Arc<MockNotifier>,
    ) {
        let sink = Arc::new(MemorySink::default());
        let notifier = Arc::new(MockNotifier {
            fail: fail_notify,
            ..Default::default()
        });
        (
            EventLog::new(Arc::clone(&sink), Arc::clone(&notifier)),
            sink,
            notifier,
        )
    }

    fn prefix_origin() -> CommandOrigin {
        CommandOrigin::Prefix(PrefixInvocation {
            command_name: "bc".into(),
            args: vec!["self".into()],
            author_id: 10,
            author_name: "mod".into(),
            channel_id: 20,
        })
    }

    fn slash_origin() -> CommandOrigin {
        CommandOrigin::Slash(SlashInvocation {
            command_name: "role".into(),
            user_id: 10,
            user_name: "mod".into(),
            channel_id: 20,
            guild: None,
        })
    }

    #[tokio::test]
    async fn test_plain_event_is_one_line() {
        let (log, sink, notifier) = event_log(false);
        log.info("Managed data saved successfully.", &CommandOrigin::Unknown)
            .await;

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] [INFO] Managed data saved successfully.\n"));
        assert!(notifier.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prefix_info_adds_detail_line() {
        let (log, sink, notifier) = event_log(false);
        log.warn("careful", &prefix_origin()).await;

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "Prefix Command: bc, Args: self, User: 10, Channel: 20\n"
        );
        assert!(notifier.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prefix_debug_has_no_extras() {
        let (log, sink, _) = event_log(false);
        log.debug("Fetched 3 messages", &prefix_origin()).await;
        assert_eq!(sink.lines.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prefix_error_is_reported() {
        let (log, sink, notifier) = event_log(false);
        log.error("boom", &prefix_origin()).await;

        let lines = sink.lines.lock().unwrap();
        assert_eq!(
            lines[1],
            "Error in prefix command: bc, User: 10, Channel: 20, Error: boom\n"
        );

        let reports = notifier.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].title, "Error in prefix command: bc");
        let names: Vec<&str> = reports[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Channel", "Error"]);
    }

    #[tokio::test]
    async fn test_slash_error_report_uses_na_for_missing_guild() {
        let (log, sink, notifier) = event_log(false);
        log.error("boom", &slash_origin()).await;

        assert_eq!(sink.lines.lock().unwrap().len(), 1);
        let reports = notifier.reports.lock().unwrap();
        assert_eq!(reports[0].title, "Error in slash command: role");
        let server = reports[0]
            .fields
            .iter()
            .find(|f| f.name == "Server")
            .unwrap();
        assert_eq!(server.value, "N/A");
    }

    #[tokio::test]
    async fn test_slash_info_is_not_reported() {
        let (log, _, notifier) = event_log(false);
        log.info("fine", &slash_origin()).await;
        assert!(notifier.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delivery_is_swallowed() {
        let (log, sink, _) = event_log(true);
        log.error("boom", &slash_origin()).await;
        assert_eq!(sink.lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_line_format() {
        let ts = chrono::DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(
            format_log_line(LogLevel::Error, ts, "x"),
            "[1970-01-01T00:00:00.000Z] [ERROR] x\n"
        );
    }
}
