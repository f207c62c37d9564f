//! Gomoku AI command line front end
//!
//! - `play`: a human against the engine in the terminal
//! - `selfplay`: the engine against itself
//! - `serve`: JSON-lines search protocol over stdin/stdout

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};

use gomoku_ai::eval::DEFAULT_OPPONENT_WEIGHT;
use gomoku_ai::worker::Command;
use gomoku_ai::{
    search_best_move, spawn_search, Game, GameStatus, Pos, SearchOptions, SearchWorker, Stone,
    WorkerMessage,
};

/// Poll interval while waiting on a search thread.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Parser, Debug)]
#[command(author, version, about = "Free-style Gomoku engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play against the engine
    Play {
        /// Your color: 'b' for black (moves first), 'w' for white
        #[arg(long, default_value = "b")]
        color: String,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Let the engine play both sides
    Selfplay {
        /// Stop after this many moves even without a result
        #[arg(long, default_value_t = 225)]
        max_moves: usize,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Answer search requests given as JSON lines on stdin
    Serve,
}

#[derive(clap::Args, Debug, Clone)]
struct EngineArgs {
    /// Time budget per move in milliseconds
    #[arg(long, default_value_t = 1000)]
    time_ms: u64,

    /// Maximum search depth
    #[arg(long, default_value_t = 4)]
    depth: u8,

    /// Candidate radius around existing stones
    #[arg(long, default_value_t = 2)]
    neighbor_distance: u8,

    /// Candidates searched per node
    #[arg(long, default_value_t = 20)]
    move_cap: usize,

    /// Weight of the opponent's patterns in the evaluation
    #[arg(long, default_value_t = DEFAULT_OPPONENT_WEIGHT)]
    opponent_weight: f64,

    /// Print per-depth progress
    #[arg(long)]
    verbose: bool,
}

impl EngineArgs {
    fn to_options(&self) -> SearchOptions {
        SearchOptions::with_config(self.depth, self.time_ms)
            .with_neighbor_distance(self.neighbor_distance)
            .with_move_cap(self.move_cap)
            .with_opponent_weight(self.opponent_weight)
    }
}

fn parse_color(color_str: &str) -> Result<Stone> {
    match color_str.to_lowercase().as_str() {
        "b" | "black" => Ok(Stone::Black),
        "w" | "white" => Ok(Stone::White),
        _ => bail!("Invalid color: use 'b' or 'w'"),
    }
}

/// Parse "x y" or "x,y".
fn parse_move(input: &str) -> Option<(i32, i32)> {
    let mut parts = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y))
}

/// What the human did at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HumanTurn {
    Played,
    Undone,
    Quit,
}

/// Engine suggestion for the side to move, without playing it.
fn hint(game: &Game, options: &SearchOptions) -> Option<Pos> {
    search_best_move(game.board(), game.current(), options).best_move()
}

fn get_human_move(game: &mut Game, engine: &EngineArgs) -> Result<HumanTurn> {
    loop {
        print!("Your move (x y), 'h' for a hint, 'u' to undo, 'q' to quit: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(HumanTurn::Quit);
        }
        let input = input.trim();
        match input {
            "q" | "quit" => return Ok(HumanTurn::Quit),
            "u" | "undo" => match game.undo_pair() {
                Ok(_) => return Ok(HumanTurn::Undone),
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
            "h" | "hint" => {
                match hint(game, &engine.to_options()) {
                    Some(pos) => println!("Hint: {}", pos),
                    None => println!("No legal move left"),
                }
                continue;
            }
            _ => {}
        }

        let Some((x, y)) = parse_move(input) else {
            println!("Invalid move format! Use format like '7 7'");
            continue;
        };
        match game.play(x, y) {
            Ok(_) => return Ok(HumanTurn::Played),
            Err(e) => println!("{}", e),
        }
    }
}

/// Run one engine move on a worker thread and apply it to `game`.
fn engine_move(game: &mut Game, engine: &EngineArgs) -> Result<()> {
    let request = game.search_request(&engine.to_options());
    let mut handle = spawn_search(request);
    let start = Instant::now();

    let terminal = loop {
        match handle.try_recv() {
            Some(WorkerMessage::Progress {
                depth,
                current_best_move,
                current_best_score,
            }) => {
                if engine.verbose {
                    println!(
                        "  depth {:>2}  best {}  score {}",
                        depth, current_best_move, current_best_score
                    );
                }
            }
            Some(msg) => break msg,
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    match &terminal {
        WorkerMessage::Result {
            best_move: Some(pos),
            score,
        } => println!(
            "{} plays {} (score {}, {:?})",
            game.current().glyph(),
            pos,
            score,
            start.elapsed()
        ),
        WorkerMessage::Result { best_move: None, .. } => println!("No legal move left"),
        WorkerMessage::Error { error } => bail!("search failed: {}", error),
        other => bail!("unexpected search outcome: {:?}", other),
    }
    game
        .apply_message(&terminal)
        .context("engine produced an illegal move")?;
    Ok(())
}

fn print_result(game: &Game) {
    match game.status() {
        GameStatus::Won(win) => println!(
            "\n{} wins! Line {} .. {}",
            win.winner.glyph(),
            win.line[0],
            win.line[4]
        ),
        GameStatus::Draw => println!("\nDraw: the board is full."),
        GameStatus::InProgress => println!("\nGame stopped."),
    }
}

fn run_play(color: &str, engine: &EngineArgs) -> Result<()> {
    let human = parse_color(color)?;
    let mut game = Game::new();
    info!("human plays {:?}", human);

    while !game.is_over() {
        println!("\n{}", game.board());
        // After an undo the side to move is re-read before prompting again
        if game.current() == human {
            if get_human_move(&mut game, engine)? == HumanTurn::Quit {
                break;
            }
        } else {
            engine_move(&mut game, engine)?;
        }
    }

    println!("\n{}", game.board());
    print_result(&game);
    Ok(())
}

fn run_selfplay(max_moves: usize, engine: &EngineArgs) -> Result<()> {
    let mut game = Game::new();
    let start = Instant::now();

    while !game.is_over() && game.history().len() < max_moves {
        engine_move(&mut game, engine)?;
        if engine.verbose {
            println!("{}", game.board());
        }
    }

    println!("\n{}", game.board());
    print_result(&game);
    println!("{} moves in {:?}", game.history().len(), start.elapsed());
    Ok(())
}

/// Forward stdin lines to a channel so the main loop can poll both sides.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn emit(out: &mut impl Write, msg: &WorkerMessage) -> Result<()> {
    serde_json::to_writer(&mut *out, msg)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn run_serve() -> Result<()> {
    let lines = spawn_stdin_reader();
    let mut worker = SearchWorker::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut input_open = true;

    loop {
        let mut idle = true;

        if input_open {
            match lines.try_recv() {
                Ok(line) => {
                    idle = false;
                    let line = line.trim();
                    if !line.is_empty() {
                        match Command::parse(line) {
                            Ok(Command::Search(request)) => {
                                if let Some(previous) = worker.submit(request) {
                                    emit(&mut out, &previous.wait())?;
                                }
                            }
                            Ok(Command::Cancel) => worker.cancel(),
                            Err(e) => {
                                warn!("bad request: {}", e);
                                emit(&mut out, &WorkerMessage::error(format!("bad request: {}", e)))?;
                            }
                        }
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    debug!("stdin closed");
                    input_open = false;
                }
            }
        }

        while let Some(msg) = worker.poll() {
            idle = false;
            emit(&mut out, &msg)?;
        }

        if !input_open && !worker.is_busy() {
            return Ok(());
        }
        if idle {
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Mode::Play { color, engine } => run_play(&color, &engine),
        Mode::Selfplay { max_moves, engine } => run_selfplay(max_moves, &engine),
        Mode::Serve => run_serve(),
    }
}
