mod common;

use std::time::Duration;

use msr605::{Command, Engine, EngineState, Error, Request};
use pretty_assertions::assert_eq;

use common::ScriptedTransport;

async fn open(transport: ScriptedTransport) -> Engine {
    let mut engine = Engine::new(Box::new(transport));
    engine.open().await.unwrap();
    engine
}

#[tokio::test(start_paused = true)]
async fn test_fire_and_forget_reads_nothing() {
    let transport = ScriptedTransport::new().with_stale(b"left over");
    let sent = transport.sent();
    let mut engine = open(transport).await;

    engine.execute(&Request::new(Command::Reset)).await.unwrap();

    assert_eq!(sent.all(), vec![b"\x1ba".to_vec()]);
    assert_eq!(engine.state(), EngineState::Done);
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_after_write() {
    let mut engine = open(ScriptedTransport::new())
        .await
        .with_settle_delay(Duration::from_millis(250));

    let start = tokio::time::Instant::now();
    engine.execute(&Request::new(Command::Reset)).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn test_status_follows_last_escape() {
    // Data carries its own escape codes ahead of the status pair
    let mut engine = open(ScriptedTransport::new().reply(b"\x1bs\x1b\x01A\x1b0")).await;

    let response = engine
        .execute_wait(&Request::new(Command::ReadIso))
        .await
        .unwrap();

    assert_eq!(response.status, b'0');
    assert_eq!(&response.data[..], b"\x1bs\x1b\x01A");
    assert!(response.result.is_empty());
    assert_eq!(engine.state(), EngineState::Done);
}

#[tokio::test(start_paused = true)]
async fn test_accumulates_partial_reads() {
    let transport = ScriptedTransport::new()
        .reply(b"abcd\x1b0")
        .with_chunk_limit(2);
    let mut engine = open(transport).await;

    let response = engine
        .execute_wait(&Request::new(Command::ReadRaw))
        .await
        .unwrap();

    assert_eq!(&response.data[..], b"abcd");
    assert_eq!(response.status, b'0');
}

#[tokio::test(start_paused = true)]
async fn test_stale_bytes_are_drained() {
    let transport = ScriptedTransport::new()
        .with_stale(b"\x1b1")
        .reply(b"\x1b0");
    let mut engine = open(transport).await;

    let response = engine
        .execute_wait(&Request::with_payload(Command::Erase, vec![0x07]))
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_then_reusable() {
    let transport = ScriptedTransport::new().silent().reply(b"\x1b0");
    let sent = transport.sent();
    let mut engine = open(transport).await.with_timeout(Duration::from_secs(2));

    let start = tokio::time::Instant::now();
    let result = engine.execute_wait(&Request::new(Command::ReadIso)).await;

    match result {
        Err(e) => assert!(e.is_timeout(), "unexpected error: {e}"),
        Ok(r) => panic!("expected timeout, got {r}"),
    }
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert_eq!(engine.state(), EngineState::TimedOut);

    let response = engine
        .execute_wait(&Request::new(Command::SetHighCoercivity))
        .await
        .unwrap();
    assert!(response.is_success());
    assert_eq!(sent.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reply_without_escape() {
    let mut engine = open(ScriptedTransport::new().reply(b"garbage"))
        .await
        .with_timeout(Duration::from_secs(1));

    let result = engine.execute_wait(&Request::new(Command::ReadIso)).await;

    assert!(matches!(
        result,
        Err(Error::Core(msr605_core::Error::InvalidResponseFormat { len: 7 }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_reply_without_status_byte() {
    let mut engine = open(ScriptedTransport::new().reply(b"abc\x1b")).await;

    let result = engine.execute_wait(&Request::new(Command::ReadIso)).await;

    assert!(matches!(
        result,
        Err(Error::Core(msr605_core::Error::IncompleteResponse))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_send_on_closed_transport() {
    let mut engine = Engine::new(Box::new(ScriptedTransport::new()));

    let result = engine.execute(&Request::new(Command::Reset)).await;

    assert!(matches!(
        result,
        Err(Error::Transport(msr605_transport::Error::NotConnected))
    ));
    assert_eq!(engine.state(), EngineState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_read_error_while_collecting() {
    let transport = ScriptedTransport::new().read_error().reply(b"\x1b0");
    let sent = transport.sent();
    let mut engine = open(transport).await;

    let result = engine.execute_wait(&Request::new(Command::ReadIso)).await;

    assert!(matches!(
        result,
        Err(Error::Transport(msr605_transport::Error::Io(_)))
    ));
    assert_eq!(engine.state(), EngineState::Idle);

    let response = engine
        .execute_wait(&Request::new(Command::SetLowCoercivity))
        .await
        .unwrap();
    assert!(response.is_success());
    assert_eq!(engine.state(), EngineState::Done);
    assert_eq!(sent.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_drain_error_is_not_fatal() {
    let transport = ScriptedTransport::new().with_read_error().reply(b"\x1b0");
    let sent = transport.sent();
    let mut engine = open(transport).await;

    let response = engine
        .execute_wait(&Request::new(Command::SetHighCoercivity))
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(sent.all(), vec![b"\x1bx".to_vec()]);
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_follows_command_kind() {
    let transport = ScriptedTransport::new().reply(b"\x1b0");
    let sent = transport.sent();
    let mut engine = open(transport).await;

    let reset = engine.dispatch(&Request::new(Command::Reset)).await.unwrap();
    assert!(reset.is_none());

    let erase = engine
        .dispatch(&Request::with_payload(Command::Erase, vec![0x07]))
        .await
        .unwrap();
    assert!(erase.is_some_and(|r| r.is_success()));

    assert_eq!(sent.all(), vec![b"\x1ba".to_vec(), b"\x1bc\x07".to_vec()]);
}
