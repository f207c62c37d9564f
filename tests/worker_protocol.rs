use std::thread;
use std::time::Duration;

use gomoku_ai::board::{Board, Pos, Stone};
use gomoku_ai::worker::{spawn_search, Command, SearchRequest, WorkerMessage};
use serde_json::{json, Value};

fn request_line(board: &Board, player: u8, options: Value) -> String {
    json!({"board": board.to_rows(), "player": player, "options": options}).to_string()
}

fn parse_request(line: &str) -> SearchRequest {
    match Command::parse(line).expect("valid json") {
        Command::Search(request) => request,
        Command::Cancel => panic!("expected a search request"),
    }
}

#[test]
fn json_request_produces_json_result() {
    let mut board = Board::new();
    board.apply(Pos::new(7, 7), Stone::Black);
    let line = request_line(&board, 2, json!({"maxDepth": 2, "timeBudgetMs": 2000}));

    let mut handle = spawn_search(parse_request(&line));
    let mut out = Vec::new();
    while let Some(msg) = handle.recv() {
        out.push(serde_json::to_value(&msg).expect("serializable"));
    }

    let last = out.last().expect("a terminal message");
    assert_eq!(last["type"], "result");
    let x = last["move"]["x"].as_u64().expect("x");
    let y = last["move"]["y"].as_u64().expect("y");
    assert!(x < 15 && y < 15);
    assert!(!(x == 7 && y == 7));

    for progress in &out[..out.len() - 1] {
        assert_eq!(progress["type"], "progress");
        assert!(progress["currentBestMove"].is_object());
        assert!(progress["currentBestScore"].is_i64());
    }
}

#[test]
fn cancel_line_stops_search() {
    let mut board = Board::new();
    board.apply(Pos::new(7, 7), Stone::Black);
    board.apply(Pos::new(8, 8), Stone::White);
    let line = request_line(&board, 1, json!({"maxDepth": 12, "timeBudgetMs": 30000}));

    let handle = spawn_search(parse_request(&line));
    thread::sleep(Duration::from_millis(20));
    assert_eq!(Command::parse(r#"{"type": "cancel"}"#).unwrap(), Command::Cancel);
    handle.cancel();

    let terminal = serde_json::to_value(handle.wait()).unwrap();
    assert_eq!(terminal, json!({"type": "cancelled", "cancelled": true}));
}

#[test]
fn malformed_board_is_an_error_message() {
    let line = json!({"board": [[0, 1], [2, 0]], "player": 1}).to_string();
    let terminal = spawn_search(parse_request(&line)).wait();
    let value = serde_json::to_value(&terminal).unwrap();
    assert_eq!(value["type"], "error");
    assert!(value["error"].as_str().unwrap().contains("invalid board"));
}

#[test]
fn messages_parse_back() {
    let draw: WorkerMessage = serde_json::from_str(r#"{"type":"result","move":null,"score":0}"#).unwrap();
    assert_eq!(
        draw,
        WorkerMessage::Result {
            best_move: None,
            score: 0
        }
    );
    let progress: WorkerMessage = serde_json::from_str(
        r#"{"type":"progress","depth":1,"currentBestMove":{"x":3,"y":4},"currentBestScore":12}"#,
    )
    .unwrap();
    assert!(!progress.is_terminal());
}
