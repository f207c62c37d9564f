//! Off-thread search execution and its message protocol
//!
//! A search runs on its own thread with a private copy of the board. The
//! caller keeps a [`SearchHandle`] and polls it for messages: zero or more
//! `progress` messages, then exactly one terminal message (`result`,
//! `cancelled` or `error`). Only the cancel flag and the channel cross
//! threads.
//!
//! Messages serialize to JSON objects tagged by `type`:
//!
//! ```text
//! {"type":"progress","depth":3,"currentBestMove":{"x":7,"y":7},"currentBestScore":420}
//! {"type":"result","move":{"x":7,"y":7},"score":420}
//! {"type":"cancelled","cancelled":true}
//! {"type":"error","error":"invalid player 3: expected 1 or 2"}
//! ```

use std::any::Any;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone};
use crate::error::GameError;
use crate::search::{CancelToken, SearchOptions, SearchOutcome, Searcher};

/// Accepted range for a requested opponent weight.
pub const OPPONENT_WEIGHT_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.0;

/// Per-request search knobs. Missing fields fall back to [`SearchOptions::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbor_distance: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_cap: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_weight: Option<f64>,
}

impl RequestOptions {
    pub fn to_search_options(&self) -> SearchOptions {
        let mut opts = SearchOptions::default();
        if let Some(ms) = self.time_budget_ms {
            opts.time_budget = Duration::from_millis(ms);
        }
        if let Some(depth) = self.max_depth {
            opts.max_depth = depth;
        }
        if let Some(distance) = self.neighbor_distance {
            opts.neighbor_distance = distance;
        }
        if let Some(cap) = self.move_cap {
            opts.move_cap = cap;
        }
        if let Some(weight) = self.opponent_weight {
            opts.opponent_weight = weight;
        }
        opts
    }
}

impl From<&SearchOptions> for RequestOptions {
    #[allow(clippy::cast_possible_truncation)]
    fn from(opts: &SearchOptions) -> Self {
        Self {
            time_budget_ms: Some(opts.time_budget.as_millis() as u64),
            max_depth: Some(opts.max_depth),
            neighbor_distance: Some(opts.neighbor_distance),
            move_cap: Some(opts.move_cap),
            opponent_weight: Some(opts.opponent_weight),
        }
    }
}

/// A request to search `board` for `player` (1 = black, 2 = white).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Row-major cells, `board[y][x]`, 0 empty, 1 black, 2 white.
    pub board: Vec<Vec<u8>>,
    pub player: u8,
    #[serde(default)]
    pub options: RequestOptions,
}

impl SearchRequest {
    pub fn new(board: &Board, player: Stone, options: &SearchOptions) -> Self {
        Self {
            board: board.to_rows(),
            player: player.player(),
            options: RequestOptions::from(options),
        }
    }

    /// Decode the request into engine types.
    pub fn validate(&self) -> Result<(Board, Stone, SearchOptions), GameError> {
        let player = match Stone::from_player(self.player) {
            Some(stone) if stone != Stone::Empty => stone,
            _ => return Err(GameError::InvalidPlayer(self.player)),
        };
        if let Some(weight) = self.options.opponent_weight {
            if !OPPONENT_WEIGHT_RANGE.contains(&weight) {
                return Err(GameError::InvalidOption {
                    name: "opponentWeight",
                    value: weight.to_string(),
                });
            }
        }
        let board = Board::from_rows(&self.board)?;
        Ok((board, player, self.options.to_search_options()))
    }
}

/// Message sent from a search thread to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerMessage {
    /// A depth completed.
    #[serde(rename_all = "camelCase")]
    Progress {
        depth: u8,
        current_best_move: Pos,
        current_best_score: i32,
    },
    /// The search finished. `move` is null when the board was full.
    Result {
        #[serde(rename = "move")]
        best_move: Option<Pos>,
        score: i32,
    },
    /// The search was cancelled and reports no move.
    Cancelled { cancelled: bool },
    /// The request was rejected or the search thread died.
    Error { error: String },
}

impl WorkerMessage {
    pub fn cancelled() -> Self {
        WorkerMessage::Cancelled { cancelled: true }
    }

    pub fn error(error: impl Into<String>) -> Self {
        WorkerMessage::Error {
            error: error.into(),
        }
    }

    /// True for the single message that ends a search.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerMessage::Progress { .. })
    }

    fn from_outcome(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(result) => WorkerMessage::Result {
                best_move: Some(result.best_move),
                score: result.score,
            },
            SearchOutcome::NoLegalMove => WorkerMessage::Result {
                best_move: None,
                score: 0,
            },
            SearchOutcome::Cancelled => WorkerMessage::cancelled(),
        }
    }
}

/// Inbound line of the JSON-lines protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(SearchRequest),
    Cancel,
}

impl Command {
    /// Parse one inbound message: `{"type":"cancel"}` or a search request.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(line)?;
        if value.get("type").and_then(serde_json::Value::as_str) == Some("cancel") {
            return Ok(Command::Cancel);
        }
        serde_json::from_value(value).map(Command::Search)
    }
}

/// Owner side of one running search.
///
/// Dropping an unfinished handle cancels its search.
pub struct SearchHandle {
    receiver: Receiver<WorkerMessage>,
    token: CancelToken,
    thread: Option<JoinHandle<()>>,
    finished: bool,
}

impl SearchHandle {
    /// Ask the search to stop. It answers with `cancelled` at its next node.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the terminal message has been handed out.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Non-blocking poll for the next message.
    pub fn try_recv(&mut self) -> Option<WorkerMessage> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(msg) => Some(self.observe(msg)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.disconnected()),
        }
    }

    /// Blocking wait for the next message. `None` after the terminal one.
    pub fn recv(&mut self) -> Option<WorkerMessage> {
        if self.finished {
            return None;
        }
        match self.receiver.recv() {
            Ok(msg) => Some(self.observe(msg)),
            Err(_) => Some(self.disconnected()),
        }
    }

    /// Block until the terminal message, discarding progress.
    pub fn wait(mut self) -> WorkerMessage {
        loop {
            match self.recv() {
                Some(msg) if msg.is_terminal() => return msg,
                Some(_) => continue,
                None => return WorkerMessage::error("search already finished"),
            }
        }
    }

    fn observe(&mut self, msg: WorkerMessage) -> WorkerMessage {
        if msg.is_terminal() {
            self.finish();
        }
        msg
    }

    /// The sender went away without a terminal message: the thread panicked.
    fn disconnected(&mut self) -> WorkerMessage {
        let reason = self
            .finish()
            .unwrap_or_else(|| "search thread exited without a result".to_string());
        warn!("search thread failed: {}", reason);
        WorkerMessage::error(reason)
    }

    /// Mark finished and reap the thread, returning its panic message if any.
    fn finish(&mut self) -> Option<String> {
        self.finished = true;
        self.thread
            .take()
            .and_then(|t| t.join().err())
            .map(|payload| panic_message(payload.as_ref()))
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if !self.finished {
            self.token.cancel();
        }
    }
}

/// Start a search on a new thread.
pub fn spawn_search(request: SearchRequest) -> SearchHandle {
    let (tx, rx) = mpsc::channel();
    let token = CancelToken::new();
    let thread_token = token.clone();

    let thread = thread::spawn(move || run_search(&request, thread_token, tx));

    SearchHandle {
        receiver: rx,
        token,
        thread: Some(thread),
        finished: false,
    }
}

fn run_search(request: &SearchRequest, token: CancelToken, tx: Sender<WorkerMessage>) {
    let (board, player, options) = match request.validate() {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("rejecting request: {}", e);
            let _ = tx.send(WorkerMessage::error(e.to_string()));
            return;
        }
    };

    let progress_tx = tx.clone();
    let mut searcher = Searcher::new(options)
        .with_cancel(token.clone())
        .on_progress(move |p| {
            let _ = progress_tx.send(WorkerMessage::Progress {
                depth: p.depth,
                current_best_move: p.best_move,
                current_best_score: p.score,
            });
        });
    let outcome = searcher.search(&board, player);

    // A cancel that lands after the last node still means "no result"
    let message = if token.is_cancelled() {
        WorkerMessage::cancelled()
    } else {
        WorkerMessage::from_outcome(outcome)
    };
    // The owner may have gone away; nothing to report to
    let _ = tx.send(message);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("search panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("search panicked: {}", s)
    } else {
        "search panicked".to_string()
    }
}

/// Runs one search at a time. A new submission preempts the one in flight.
#[derive(Default)]
pub struct SearchWorker {
    current: Option<SearchHandle>,
}

impl SearchWorker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `request`, cancelling any search in flight.
    ///
    /// Returns the preempted handle so its `cancelled` message can still be
    /// collected.
    pub fn submit(&mut self, request: SearchRequest) -> Option<SearchHandle> {
        let previous = self.current.take().filter(|h| !h.is_finished());
        if let Some(old) = &previous {
            debug!("preempting search in flight");
            old.cancel();
        }
        self.current = Some(spawn_search(request));
        previous
    }

    /// Cancel the search in flight, if any.
    pub fn cancel(&self) {
        if let Some(handle) = &self.current {
            handle.cancel();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Non-blocking poll of the current search.
    pub fn poll(&mut self) -> Option<WorkerMessage> {
        let msg = self.current.as_mut()?.try_recv()?;
        if msg.is_terminal() {
            self.current = None;
        }
        Some(msg)
    }

    /// Block until the current search ends.
    pub fn wait(&mut self) -> Option<WorkerMessage> {
        self.current.take().map(SearchHandle::wait)
    }
}
