//! Background task replaying the session feed.
//!
//! Runs on its own thread and tokio runtime. Chat messages and tool calls
//! go to the UI thread over `ui_tx`; state snapshots go to the [`StateFeed`].

use std::path::Path;
use std::time::Duration;

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use supplynet_core::{ChatMessage, SessionEvent, ToolCall, ToolCallId};

use crate::config::FeedConfig;
use crate::error::AppError;
use crate::event::{BackendCommand, FeedStatus, UiEvent};
use crate::feed::StateFeed;

/// How often a followed file is checked for appended lines.
const FOLLOW_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What one session line turned into.
#[derive(Debug)]
pub enum Dispatch {
    /// Forward to the UI.
    Ui(UiEvent),
    /// A snapshot was published to the state feed.
    Published,
    /// Nothing to do (blank, malformed, unknown or foreign).
    Skipped,
}

/// Turns session lines into UI events and state snapshots.
pub struct SessionReader {
    agent_name: String,
    feed: StateFeed,
    next_local_id: usize,
}

impl SessionReader {
    pub fn new(agent_name: impl Into<String>, feed: StateFeed) -> Self {
        Self {
            agent_name: agent_name.into(),
            feed,
            next_local_id: 1,
        }
    }

    /// Parse and dispatch one line. Bad lines are logged and skipped.
    pub fn read_line(&mut self, line: &str) -> Dispatch {
        match SessionEvent::parse_line(line) {
            Ok(Some(event)) => self.apply(event),
            Ok(None) => Dispatch::Skipped,
            Err(e) => {
                warn!(error = %e, "Skipping malformed session line");
                Dispatch::Skipped
            }
        }
    }

    /// Dispatch one decoded event.
    pub fn apply(&mut self, event: SessionEvent) -> Dispatch {
        debug!(kind = event.kind(), "Session event");

        if event.is_for_agent(&self.agent_name) {
            if let Some(state) = event.snapshot() {
                debug!(
                    trace_len = state
                        .workflow_state
                        .as_ref()
                        .map_or(0, |wf| wf.execution_trace.len()),
                    "Publishing state snapshot"
                );
                self.feed.publish(state);
                return Dispatch::Published;
            }
        }

        match event {
            SessionEvent::UserMessage { content } => {
                Dispatch::Ui(UiEvent::Message(ChatMessage::user(content)))
            }
            SessionEvent::AssistantMessage { content } => {
                Dispatch::Ui(UiEvent::Message(ChatMessage::assistant(content)))
            }
            SessionEvent::ToolCall {
                id,
                name,
                args,
                result,
            } => {
                let id = id.unwrap_or_else(|| {
                    let id = ToolCallId::local(self.next_local_id);
                    self.next_local_id += 1;
                    id
                });
                let mut call = ToolCall::new(id, name, args);
                call.result = result.filter(|value| !value.is_null());
                Dispatch::Ui(UiEvent::ToolCall(call))
            }
            SessionEvent::ToolResult { id, result } => {
                Dispatch::Ui(UiEvent::ToolResult { id, result })
            }
            SessionEvent::StateSnapshot { agent, .. } => {
                debug!(
                    agent = ?agent,
                    expected = %self.agent_name,
                    "Ignoring snapshot for another agent"
                );
                Dispatch::Skipped
            }
            SessionEvent::Unknown(ref value) => {
                if let Some(kind) = event.malformed_kind() {
                    warn!(kind = %kind, event = %value, "Dropping malformed session event");
                } else {
                    let kind = value.get("type").and_then(|t| t.as_str()).unwrap_or("?");
                    warn!(kind = %kind, "Ignoring unknown session event");
                }
                Dispatch::Skipped
            }
        }
    }
}

/// Append a user message to the outbox as a `user_message` line.
pub async fn append_outbox(path: &Path, content: &str) -> Result<(), AppError> {
    let line = SessionEvent::user_message(content).to_line()?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format!("{}\n", line).as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

/// Result of one read from the session file.
enum ReadOutcome {
    /// A complete line.
    Line(String),
    /// At the end of a followed file; a fragment may be pending.
    Waiting,
    /// At the end of the file, nothing pending.
    Eof,
}

/// Session file reader that only yields newline-terminated lines while
/// following, so a line flushed in several writes is read whole.
struct LineSource {
    reader: BufReader<File>,
    pending: String,
}

impl LineSource {
    fn new(file: File) -> Self {
        Self {
            reader: BufReader::new(file),
            pending: String::new(),
        }
    }

    async fn next(&mut self, follow: bool) -> std::io::Result<ReadOutcome> {
        self.reader.read_line(&mut self.pending).await?;

        if self.pending.ends_with('\n') {
            return Ok(ReadOutcome::Line(std::mem::take(&mut self.pending)));
        }
        if follow {
            return Ok(ReadOutcome::Waiting);
        }
        // Last line of a file that does not end in a newline
        if self.pending.is_empty() {
            Ok(ReadOutcome::Eof)
        } else {
            Ok(ReadOutcome::Line(std::mem::take(&mut self.pending)))
        }
    }
}

async fn set_status(ui_tx: &mpsc::Sender<UiEvent>, current: &mut FeedStatus, next: FeedStatus) {
    if *current != next {
        *current = next;
        let _ = ui_tx.send(UiEvent::FeedStatus(next)).await;
    }
}

/// Run the backend loop until `Quit` or the UI goes away.
pub async fn run_backend(
    config: FeedConfig,
    feed: StateFeed,
    ui_tx: mpsc::Sender<UiEvent>,
    mut cmd_rx: mpsc::Receiver<BackendCommand>,
) {
    let mut reader = SessionReader::new(config.agent_name.clone(), feed);
    let mut status = FeedStatus::Idle;

    let mut lines = match &config.session_path {
        Some(path) => match File::open(path).await {
            Ok(file) => {
                info!(path = %path.display(), follow = config.follow, "Replaying session");
                Some(LineSource::new(file))
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to open session");
                let _ = ui_tx
                    .send(UiEvent::Error(format!("Cannot open {}: {}", path.display(), e)))
                    .await;
                None
            }
        },
        None => None,
    };

    if lines.is_some() {
        set_status(&ui_tx, &mut status, FeedStatus::Streaming).await;
    }

    let mut finished = lines.is_none();
    let mut paused = false;
    let mut next_due = Instant::now();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(BackendCommand::SendMessage(text)) => {
                    match &config.outbox_path {
                        Some(path) => match append_outbox(path, &text).await {
                            Ok(()) => debug!(path = %path.display(), "Message written to outbox"),
                            Err(e) => {
                                error!(error = %e, "Failed to write outbox");
                                let _ = ui_tx.send(UiEvent::Error(e.to_string())).await;
                            }
                        },
                        None => {
                            let _ = ui_tx
                                .send(UiEvent::Notice(
                                    "No outbox configured, message kept locally".to_string(),
                                ))
                                .await;
                        }
                    }
                }
                Some(BackendCommand::TogglePause) => {
                    if lines.is_none() {
                        let _ = ui_tx
                            .send(UiEvent::Notice("No session feed to pause".to_string()))
                            .await;
                        continue;
                    }
                    paused = !paused;
                    info!(paused, "Feed pause toggled");
                    let next = match (paused, finished) {
                        (true, _) => FeedStatus::Paused,
                        (false, true) => FeedStatus::Ended,
                        (false, false) => FeedStatus::Streaming,
                    };
                    set_status(&ui_tx, &mut status, next).await;
                }
                Some(BackendCommand::Quit) | None => {
                    info!("Received quit command, shutting down backend");
                    break;
                }
            },

            _ = tokio::time::sleep_until(next_due), if !paused && !finished => {
                let Some(source) = lines.as_mut() else {
                    finished = true;
                    continue;
                };

                match source.next(config.follow).await {
                    Ok(ReadOutcome::Line(line)) => {
                        set_status(&ui_tx, &mut status, FeedStatus::Streaming).await;
                        match reader.read_line(&line) {
                            Dispatch::Ui(event) => {
                                if ui_tx.send(event).await.is_err() {
                                    break;
                                }
                                next_due = Instant::now() + config.pace;
                            }
                            Dispatch::Published => next_due = Instant::now() + config.pace,
                            Dispatch::Skipped => {}
                        }
                    }
                    Ok(ReadOutcome::Waiting) => {
                        set_status(&ui_tx, &mut status, FeedStatus::Following).await;
                        next_due = Instant::now() + FOLLOW_POLL_INTERVAL;
                    }
                    Ok(ReadOutcome::Eof) => {
                        info!("Session replay finished");
                        finished = true;
                        set_status(&ui_tx, &mut status, FeedStatus::Ended).await;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to read session");
                        finished = true;
                        let _ = ui_tx
                            .send(UiEvent::Error(format!("Session read failed: {}", e)))
                            .await;
                        set_status(&ui_tx, &mut status, FeedStatus::Ended).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn reader() -> (SessionReader, StateFeed) {
        let feed = StateFeed::new();
        (
            SessionReader::new("cognitive_supply_network_agent", feed.clone()),
            feed,
        )
    }

    #[test]
    fn test_tool_calls_without_id_get_local_ids() {
        let (mut reader, _) = reader();
        let mut ids = Vec::new();
        for _ in 0..2 {
            match reader.read_line(r#"{"type":"tool_call","name":"list_all_products"}"#) {
                Dispatch::Ui(UiEvent::ToolCall(call)) => ids.push(call.id.into_inner()),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert_eq!(ids, vec!["local-1", "local-2"]);
    }

    #[test]
    fn test_tool_call_null_result_is_pending() {
        let (mut reader, _) = reader();
        let line = r#"{"type":"tool_call","id":"c1","name":"forecast_demand","result":null}"#;
        match reader.read_line(line) {
            Dispatch::Ui(UiEvent::ToolCall(call)) => {
                assert_eq!(call.id.as_str(), "c1");
                assert!(call.result.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_for_agent_is_published() {
        let (mut reader, feed) = reader();
        let dispatch = reader.read_line(concat!(
            r#"{"type":"state_snapshot","agent":"cognitive_supply_network_agent","#,
            r#""state":{"workflow_state":{}}}"#
        ));
        assert!(matches!(dispatch, Dispatch::Published));
        assert!(feed.current().is_started());
    }

    #[test]
    fn test_snapshot_without_agent_is_published() {
        let (mut reader, feed) = reader();
        let dispatch =
            reader.read_line(r#"{"type":"state_snapshot","state":{"workflow_state":{}}}"#);
        assert!(matches!(dispatch, Dispatch::Published));
        assert!(feed.current().is_started());
    }

    #[test]
    fn test_snapshot_for_other_agent_is_ignored() {
        let (mut reader, feed) = reader();
        let dispatch = reader.read_line(
            r#"{"type":"state_snapshot","agent":"someone_else","state":{"workflow_state":{}}}"#,
        );
        assert!(matches!(dispatch, Dispatch::Skipped));
        assert!(!feed.current().is_started());
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let (mut reader, _) = reader();
        assert!(matches!(reader.read_line(""), Dispatch::Skipped));
        assert!(matches!(reader.read_line("{not json"), Dispatch::Skipped));
        assert!(matches!(
            reader.read_line(r#"{"type":"heartbeat"}"#),
            Dispatch::Skipped
        ));
        assert!(matches!(
            reader.read_line(r#"{"type":"tool_call","id":"c1"}"#),
            Dispatch::Skipped
        ));
    }

    #[test]
    fn test_numeric_ids_match_results() {
        let (mut reader, _) = reader();
        match reader.read_line(r#"{"type":"tool_call","id":7,"name":"forecast_demand"}"#) {
            Dispatch::Ui(UiEvent::ToolCall(call)) => assert_eq!(call.id.as_str(), "7"),
            other => panic!("unexpected {:?}", other),
        }
        match reader.read_line(r#"{"type":"tool_result","id":7,"result":{"peak_demand":1}}"#) {
            Dispatch::Ui(UiEvent::ToolResult { id, .. }) => assert_eq!(id.as_str(), "7"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_replays_session_file() {
        let mut session = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            session,
            r#"{{"type":"user_message","content":"jackets are selling out"}}"#
        )
        .unwrap();
        writeln!(session).unwrap();
        writeln!(
            session,
            r#"{{"type":"tool_call","id":"c1","name":"forecast_demand","args":{{}}}}"#
        )
        .unwrap();
        writeln!(
            session,
            r#"{{"type":"tool_result","id":"c1","result":{{"peak_demand":144}}}}"#
        )
        .unwrap();
        writeln!(
            session,
            r#"{{"type":"state_snapshot","state":{{"workflow_state":{{"peak_demand":144}}}}}}"#
        )
        .unwrap();

        let config = FeedConfig {
            session_path: Some(session.path().to_path_buf()),
            pace: Duration::ZERO,
            ..FeedConfig::default()
        };
        let feed = StateFeed::new();
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_backend(config, feed.clone(), ui_tx, cmd_rx));

        let mut kinds = Vec::new();
        while let Some(event) = ui_rx.recv().await {
            match event {
                UiEvent::FeedStatus(FeedStatus::Ended) => break,
                UiEvent::FeedStatus(status) => kinds.push(status.label().to_string()),
                UiEvent::Message(_) => kinds.push("message".to_string()),
                UiEvent::ToolCall(_) => kinds.push("tool_call".to_string()),
                UiEvent::ToolResult { .. } => kinds.push("tool_result".to_string()),
                other => panic!("unexpected {:?}", other),
            }
        }

        assert_eq!(kinds, vec!["streaming", "message", "tool_call", "tool_result"]);
        assert!(feed.current().is_started());

        cmd_tx.send(BackendCommand::Quit).await.unwrap();
        handle.await.unwrap();
    }

    async fn next_message(ui_rx: &mut mpsc::Receiver<UiEvent>) -> ChatMessage {
        let wait = async {
            loop {
                match ui_rx.recv().await {
                    Some(UiEvent::Message(message)) => return message,
                    Some(_) => continue,
                    None => panic!("backend closed the channel"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_follow_joins_split_line() {
        let mut session = tempfile::NamedTempFile::new().unwrap();
        write!(session, r#"{{"type":"user_message","#).unwrap();
        session.flush().unwrap();

        let config = FeedConfig {
            session_path: Some(session.path().to_path_buf()),
            pace: Duration::ZERO,
            follow: true,
            ..FeedConfig::default()
        };
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_backend(config, StateFeed::new(), ui_tx, cmd_rx));

        let following = async {
            loop {
                match ui_rx.recv().await {
                    Some(UiEvent::FeedStatus(FeedStatus::Following)) => break,
                    Some(UiEvent::FeedStatus(_)) => continue,
                    other => panic!("unexpected {:?}", other),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), following)
            .await
            .unwrap();

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(session.path())
            .unwrap();
        writeln!(file, r#""content":"hello"}}"#).unwrap();
        file.flush().unwrap();

        let message = next_message(&mut ui_rx).await;
        assert_eq!(message.content, "hello");

        cmd_tx.send(BackendCommand::Quit).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_replayed() {
        let mut session = tempfile::NamedTempFile::new().unwrap();
        write!(session, r#"{{"type":"assistant_message","content":"done"}}"#).unwrap();
        session.flush().unwrap();

        let config = FeedConfig {
            session_path: Some(session.path().to_path_buf()),
            pace: Duration::ZERO,
            ..FeedConfig::default()
        };
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_backend(config, StateFeed::new(), ui_tx, cmd_rx));

        let message = next_message(&mut ui_rx).await;
        assert_eq!(message.content, "done");
        assert!(matches!(
            ui_rx.recv().await,
            Some(UiEvent::FeedStatus(FeedStatus::Ended))
        ));

        cmd_tx.send(BackendCommand::Quit).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_send_message_appends_to_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("outbox.ndjson");
        let config = FeedConfig {
            outbox_path: Some(outbox.clone()),
            ..FeedConfig::default()
        };

        let (ui_tx, _ui_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_backend(config, StateFeed::new(), ui_tx, cmd_rx));

        cmd_tx
            .send(BackendCommand::SendMessage("reorder jackets".to_string()))
            .await
            .unwrap();
        cmd_tx.send(BackendCommand::Quit).await.unwrap();
        handle.await.unwrap();

        let written = std::fs::read_to_string(&outbox).unwrap();
        assert_eq!(
            written,
            "{\"type\":\"user_message\",\"content\":\"reorder jackets\"}\n"
        );
    }

    #[tokio::test]
    async fn test_missing_session_reports_error() {
        let config = FeedConfig {
            session_path: Some("/nonexistent/session.ndjson".into()),
            ..FeedConfig::default()
        };
        let (ui_tx, mut ui_rx) = mpsc::channel(16);
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let handle = tokio::spawn(run_backend(config, StateFeed::new(), ui_tx, cmd_rx));

        assert!(matches!(ui_rx.recv().await, Some(UiEvent::Error(_))));
        cmd_tx.send(BackendCommand::Quit).await.unwrap();
        handle.await.unwrap();
    }
}
