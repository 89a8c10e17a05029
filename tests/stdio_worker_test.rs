//! Tests for the JSON-lines worker, in memory and as a child process.

use brain_games::{
    ClientConfig, CommandChannel, Dispatcher, Fault, GameClient, GameError, LocalEngine, Outcome,
    Payload, Signal, Status, WorkerMessage,
};
use std::io::Cursor;

fn serve(input: &str) -> Vec<WorkerMessage> {
    let mut output = Vec::new();
    Dispatcher::new(LocalEngine::with_seed(1))
        .serve_lines(Cursor::new(input), &mut output)
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn response(message: &WorkerMessage) -> &brain_games::Response {
    match message {
        WorkerMessage::Response(response) => response,
        other => panic!("expected response, got {other:?}"),
    }
}

#[test]
fn test_ready_comes_first() {
    let messages = serve("");
    assert_eq!(messages, vec![WorkerMessage::Signal(Signal::Ready)]);
}

#[test]
fn test_serves_requests_in_order() {
    let input = concat!(
        r#"{"id":1,"action":"PLAY_X","payload":4}"#,
        "\n",
        r#"{"id":2,"action":"GET_BOARD"}"#,
        "\n",
        "\n",
        r#"{"id":3,"action":"PLAY_O","payload":4}"#,
        "\n",
    );
    let messages = serve(input);
    assert_eq!(messages.len(), 4);

    let first = response(&messages[1]);
    assert_eq!(first.id, 1);
    assert_eq!(first.status, Status::PlayXComplete);
    assert_eq!(first.payload, Ok(Payload::Outcome(Outcome::InProgress)));

    let second = response(&messages[2]);
    assert_eq!(second.id, 2);
    assert_eq!(second.payload, Ok(Payload::Board("----X----".to_string())));

    let third = response(&messages[3]);
    assert_eq!(third.status, Status::PlayOComplete);
    assert!(matches!(
        third.payload,
        Err(Fault::Game(GameError::IllegalMove { index: 4, .. }))
    ));
}

#[test]
fn test_unknown_action_is_rejected() {
    let input = concat!(
        r#"{"id":7,"action":"DANCE"}"#,
        "\n",
        r#"{"id":8,"action":"RESET_BOARD"}"#,
        "\n",
    );
    let messages = serve(input);
    assert_eq!(messages.len(), 3);

    let rejected = response(&messages[1]);
    assert_eq!(rejected.id, 7);
    assert_eq!(rejected.status, Status::Rejected);
    assert!(matches!(rejected.payload, Err(Fault::UnknownAction(_))));

    // Worker keeps serving afterwards
    let reset = response(&messages[2]);
    assert_eq!(reset.id, 8);
    assert_eq!(reset.payload, Ok(Payload::Empty));
}

#[test]
fn test_garbage_without_id_gets_no_reply() {
    let input = concat!("{{{ nope\n", r#"{"id":2,"action":"GET_BOARD"}"#, "\n");
    let messages = serve(input);
    assert_eq!(messages.len(), 2);
    assert_eq!(response(&messages[1]).id, 2);
}

#[test]
fn test_dispatcher_counts_requests() {
    let mut dispatcher = Dispatcher::new(LocalEngine::with_seed(2));
    let reply = dispatcher.dispatch(brain_games::Request::new(
        1,
        brain_games::Command::PlayBotX,
    ));
    assert_eq!(reply.status, Status::PlayBotXComplete);
    assert_eq!(dispatcher.handled(), 1);
}

#[tokio::test]
async fn test_child_process_worker() {
    let channel = CommandChannel::spawn_process(
        env!("CARGO_BIN_EXE_brain_games"),
        &["worker".to_string()],
    )
    .unwrap();
    let client = GameClient::connect(channel, ClientConfig::default())
        .await
        .unwrap();

    assert_eq!(client.play_x(4).await.unwrap(), Outcome::InProgress);
    assert_eq!(client.play_o(0).await.unwrap(), Outcome::InProgress);
    assert_eq!(client.get_board().await.unwrap().to_string(), "O---X----");

    let err = client.play_x(4).await.unwrap_err();
    assert!(matches!(
        err,
        brain_games::ClientError::Game(GameError::IllegalMove { index: 4, .. })
    ));

    client.reset_board().await.unwrap();
    assert_eq!(client.get_board().await.unwrap().to_string(), "---------");
}

#[tokio::test]
async fn test_missing_worker_program() {
    let err = CommandChannel::spawn_process("/nonexistent/brain_games_worker", &[]).unwrap_err();
    assert!(matches!(err, brain_games::ChannelError::Spawn(_)));
}

#[tokio::test]
async fn test_call_after_worker_exit_fails() {
    let script = r#"echo '{"status":"READY"}'; exit 0"#;
    let channel =
        CommandChannel::spawn_process("sh", &["-c".to_string(), script.to_string()]).unwrap();
    let client = GameClient::connect(channel, ClientConfig::default())
        .await
        .unwrap();

    // Let the router see the closed stdout
    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    for _ in 0..2 {
        let result = tokio::time::timeout(std::time::Duration::from_secs(3), client.get_board())
            .await
            .expect("call must not hang after the worker exits");
        assert_eq!(
            result.unwrap_err(),
            brain_games::ClientError::Channel(brain_games::ChannelError::Closed)
        );
    }
    assert_eq!(client.in_flight(), 0);
}
