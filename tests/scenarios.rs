use gomoku_ai::board::{Board, Pos, Stone, BOARD_SIZE};
use gomoku_ai::search::{search_best_move, SearchOptions, SearchOutcome, WIN_SCORE};
use gomoku_ai::Game;

/// Row-major grid with the given cells filled.
fn grid(cells: &[(usize, usize, u8)]) -> Board {
    let mut rows = vec![vec![0u8; BOARD_SIZE]; BOARD_SIZE];
    for &(x, y, player) in cells {
        rows[y][x] = player;
    }
    Board::from_rows(&rows).expect("valid grid")
}

fn found(outcome: SearchOutcome) -> (Pos, i32) {
    match outcome {
        SearchOutcome::Found(r) => (r.best_move, r.score),
        other => panic!("expected a move, got {:?}", other),
    }
}

#[test]
fn open_four_is_completed() {
    let board = grid(&[(3, 7, 1), (4, 7, 1), (5, 7, 1), (6, 7, 1)]);
    let (mv, score) = found(search_best_move(&board, Stone::Black, &SearchOptions::default()));
    assert!(mv == Pos::new(2, 7) || mv == Pos::new(7, 7), "played {}", mv);
    assert_eq!(score, WIN_SCORE);
}

#[test]
fn blocked_four_must_be_blocked() {
    let board = grid(&[(2, 7, 1), (3, 7, 2), (4, 7, 2), (5, 7, 2), (6, 7, 2)]);
    let (mv, _) = found(search_best_move(&board, Stone::Black, &SearchOptions::default()));
    assert_eq!(mv, Pos::new(7, 7));
}

#[test]
fn open_three_becomes_forced_win() {
    let board = grid(&[(5, 7, 1), (6, 7, 1), (7, 7, 1), (0, 14, 2), (14, 0, 2)]);
    let opts = SearchOptions::with_config(3, 10_000);
    let (mv, score) = found(search_best_move(&board, Stone::Black, &opts));
    assert!(mv == Pos::new(4, 7) || mv == Pos::new(8, 7), "played {}", mv);
    // Open four, forced reply, five: three plies
    assert_eq!(score, WIN_SCORE - 3);
}

#[test]
fn empty_board_opens_in_center() {
    let (mv, _) = found(search_best_move(&Board::new(), Stone::Black, &SearchOptions::default()));
    assert_eq!(mv, Pos::new(7, 7));
}

#[test]
fn caller_board_is_never_mutated() {
    let board = grid(&[(7, 7, 1), (8, 8, 2), (6, 7, 1), (8, 7, 2)]);
    let before = board.clone();
    let _ = search_best_move(&board, Stone::Black, &SearchOptions::with_config(3, 200));
    assert_eq!(board, before);
}

#[test]
fn tight_budget_still_returns_legal_moves() {
    // Deterministic pseudo-random positions
    let mut seed: u32 = 0x2545_f491;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed
    };

    for _ in 0..10 {
        let mut board = Board::new();
        let mut color = Stone::Black;
        for _ in 0..20 {
            let pos = Pos::from_index(next() as usize % (BOARD_SIZE * BOARD_SIZE));
            if board.is_empty(pos) {
                board.apply(pos, color);
                color = color.opponent();
            }
        }
        let opts = SearchOptions::with_config(8, 10);
        let (mv, _) = found(search_best_move(&board, color, &opts));
        assert!(board.is_empty(mv), "{} is occupied", mv);
    }
}

#[test]
fn engine_game_ends_cleanly() {
    let mut game = Game::new();
    let opts = SearchOptions::with_config(2, 100).with_move_cap(10);

    while !game.is_over() && game.history().len() < 60 {
        let outcome = search_best_move(game.board(), game.current(), &opts);
        let played = game.apply_outcome(&outcome).expect("engine move is legal");
        assert!(played.is_some());
    }

    assert_eq!(game.board().stone_count() as usize, game.history().len());
}
