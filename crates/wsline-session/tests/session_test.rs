//! End-to-end tests for the session coordinator.
//!
//! Every test ends with oracle checks on:
//! - The single returned condition
//! - What reached the terminal and the connection
//! - Teardown (one normal closure, editor released)

mod common;

use common::{
    BrokenScreen, OneShotConnector, RecordingSink, ScriptedEditor, Screen, channel_source, lines,
    scripted_source,
};
use wsline_session::{
    ConnectRequest, EditorError, FrameKind, InboundFrame, ReadMode, Session, SessionError,
    SessionOptions, TransportError, run_session,
};

fn plain(read_mode: ReadMode) -> SessionOptions {
    SessionOptions { read_mode, color: false }
}

#[tokio::test]
async fn inbound_text_is_rendered_in_order_with_marker() {
    let screen = Screen::default();
    let editor = ScriptedEditor::with_printer(Vec::new(), screen.clone());
    let sink = RecordingSink::default();
    let source = scripted_source(vec![
        Ok(InboundFrame::text("one")),
        Ok(InboundFrame::text("two")),
        Ok(InboundFrame::text("three")),
        Err(TransportError::Stream("connection reset".into())),
    ]);

    let condition =
        Session::new(sink.clone(), source, editor, plain(ReadMode::SingleLine)).run().await;

    assert!(
        matches!(&condition, SessionError::Transport(TransportError::Stream(msg)) if msg == "connection reset"),
        "unexpected condition: {condition:?}"
    );
    assert_eq!(screen.lines(), vec!["< one\n", "< two\n", "< three\n"]);
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn read_error_while_console_blocked_ends_session_once() {
    let editor = ScriptedEditor::new(Vec::new());
    let released = editor.released();
    let sink = RecordingSink::default();
    let (tx, source) = channel_source();

    let session = tokio::spawn(
        Session::new(sink.clone(), source, editor, SessionOptions::default()).run(),
    );

    tx.send(Err(TransportError::Stream("unexpected EOF".into()))).unwrap();
    let condition = session.await.unwrap();

    assert!(matches!(condition, SessionError::Transport(TransportError::Stream(_))));
    assert_eq!(sink.closes(), 1, "teardown sends exactly one normal closure");
    assert!(*released.lock().unwrap(), "blocked console loop is cancelled and the editor dropped");

    // The losing loop is gone; nothing is listening any more.
    assert!(tx.send(Ok(InboundFrame::text("late"))).is_err());
}

#[tokio::test]
async fn binary_frames_render_as_grouped_hex() {
    let screen = Screen::default();
    let editor = ScriptedEditor::with_printer(Vec::new(), screen.clone());
    let source = scripted_source(vec![
        Ok(InboundFrame::binary(vec![0x01, 0xff, 0x10])),
        Err(TransportError::Closed { code: 1000, reason: String::new() }),
    ]);

    let condition =
        Session::new(RecordingSink::default(), source, editor, plain(ReadMode::SingleLine))
            .run()
            .await;

    assert!(condition.is_clean_exit(), "normal close is clean: {condition:?}");
    assert_eq!(screen.lines(), vec!["< 01 ff 10 \n"]);
}

#[tokio::test]
async fn unknown_frame_kind_terminates_with_descriptive_error() {
    let screen = Screen::default();
    let editor = ScriptedEditor::with_printer(Vec::new(), screen.clone());
    let sink = RecordingSink::default();
    let source = scripted_source(vec![
        Ok(InboundFrame::text("before")),
        Ok(InboundFrame { kind: FrameKind::Other(9), payload: vec![1, 2] }),
        Ok(InboundFrame::text("after")),
    ]);

    let condition =
        Session::new(sink.clone(), source, editor, plain(ReadMode::SingleLine)).run().await;

    assert!(matches!(condition, SessionError::UnknownFrameKind(9)));
    assert!(condition.to_string().contains('9'));
    assert_eq!(screen.lines(), vec!["< before\n"]);
    assert_eq!(sink.closes(), 1);
}

#[tokio::test]
async fn single_line_mode_sends_every_line() {
    let mut script = lines(&["hello", "b", ""]);
    script.push(Err(EditorError::Eof));
    let editor = ScriptedEditor::new(script);
    let sink = RecordingSink::default();

    let condition = Session::new(
        sink.clone(),
        scripted_source(Vec::new()),
        editor,
        plain(ReadMode::SingleLine),
    )
    .run()
    .await;

    assert!(matches!(condition, SessionError::Input(EditorError::Eof)));
    assert!(condition.is_clean_exit());
    assert_eq!(sink.sent(), vec!["hello", "b", ""]);
    assert_eq!(sink.closes(), 1);
}

#[tokio::test]
async fn multi_line_mode_sends_blocks() {
    let mut script = lines(&["a", "b", "", "", "c", ""]);
    script.push(Err(EditorError::Eof));
    let editor = ScriptedEditor::new(script);
    let sink = RecordingSink::default();

    let condition =
        Session::new(sink.clone(), scripted_source(Vec::new()), editor, plain(ReadMode::MultiLine))
            .run()
            .await;

    assert!(matches!(condition, SessionError::Input(EditorError::Eof)));
    assert_eq!(sink.sent(), vec!["a\nb", "", "c"]);
}

#[tokio::test]
async fn interrupts_are_skipped_and_reading_continues() {
    let script = vec![
        Err(EditorError::Interrupted),
        Err(EditorError::Interrupted),
        Ok("x".to_string()),
        Err(EditorError::Interrupted),
        Ok("y".to_string()),
        Err(EditorError::Eof),
    ];
    let sink = RecordingSink::default();

    let condition = Session::new(
        sink.clone(),
        scripted_source(Vec::new()),
        ScriptedEditor::new(script),
        plain(ReadMode::SingleLine),
    )
    .run()
    .await;

    assert!(matches!(condition, SessionError::Input(EditorError::Eof)));
    assert_eq!(sink.sent(), vec!["x", "y"]);
}

#[tokio::test]
async fn terminal_read_failure_is_fatal() {
    let script = vec![Ok("x".to_string()), Err(EditorError::Io(std::io::Error::other("tty lost")))];
    let sink = RecordingSink::default();

    let condition = Session::new(
        sink.clone(),
        scripted_source(Vec::new()),
        ScriptedEditor::new(script),
        plain(ReadMode::SingleLine),
    )
    .run()
    .await;

    assert!(matches!(condition, SessionError::Input(EditorError::Io(_))));
    assert!(!condition.is_clean_exit());
    assert_eq!(sink.sent(), vec!["x"]);
    assert_eq!(sink.closes(), 1);
}

#[tokio::test]
async fn send_failure_is_fatal() {
    let sink = RecordingSink::failing();

    let condition = Session::new(
        sink.clone(),
        scripted_source(Vec::new()),
        ScriptedEditor::new(lines(&["hi", "never sent"])),
        plain(ReadMode::SingleLine),
    )
    .run()
    .await;

    assert!(
        matches!(&condition, SessionError::Transport(TransportError::Stream(msg)) if msg == "broken pipe")
    );
    assert_eq!(sink.closes(), 1, "close is still attempted after a failed send");
}

#[tokio::test]
async fn terminal_write_failure_is_fatal() {
    let editor = ScriptedEditor::with_printer(Vec::new(), BrokenScreen);
    let source = scripted_source(vec![Ok(InboundFrame::text("x"))]);

    let condition =
        Session::new(RecordingSink::default(), source, editor, plain(ReadMode::SingleLine))
            .run()
            .await;

    assert!(matches!(condition, SessionError::Output(_)));
}

#[tokio::test]
async fn run_session_dials_with_origin_then_runs() {
    let sink = RecordingSink::default();
    let connector = OneShotConnector::new(
        sink.clone(),
        scripted_source(vec![Err(TransportError::Closed { code: 1001, reason: "bye".into() })]),
    );
    let request = ConnectRequest::new("ws://localhost:9000/echo").with_origin("http://localhost:9000");

    let condition = run_session(
        &connector,
        &request,
        || Ok(ScriptedEditor::new(Vec::new())),
        SessionOptions::default(),
    )
    .await;

    assert!(matches!(condition, SessionError::Transport(TransportError::Closed { code: 1001, .. })));
    assert!(!condition.is_clean_exit());

    let requests = connector.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "ws://localhost:9000/echo");
    assert_eq!(requests[0].origin(), Some("http://localhost:9000"));
    assert_eq!(sink.closes(), 1);
}

#[tokio::test]
async fn connect_failure_aborts_before_editor_opens() {
    let connector = OneShotConnector::failing(TransportError::Connection("refused".into()));
    let mut opened = false;

    let condition = run_session(
        &connector,
        &ConnectRequest::new("ws://127.0.0.1:1"),
        || {
            opened = true;
            Ok(ScriptedEditor::new(Vec::new()))
        },
        SessionOptions::default(),
    )
    .await;

    assert!(matches!(condition, SessionError::Connect(TransportError::Connection(_))));
    assert!(!opened, "editor must not be opened after a failed dial");
}

#[tokio::test]
async fn editor_failure_closes_connection() {
    let sink = RecordingSink::default();
    let connector = OneShotConnector::new(sink.clone(), scripted_source(Vec::new()));

    let condition = run_session(
        &connector,
        &ConnectRequest::new("ws://localhost/"),
        || -> Result<ScriptedEditor, EditorError> {
            Err(EditorError::Io(std::io::Error::other("not a tty")))
        },
        SessionOptions::default(),
    )
    .await;

    assert!(matches!(condition, SessionError::Terminal(EditorError::Io(_))));
    assert!(sink.sent().is_empty());
    assert_eq!(sink.closes(), 1);
}
