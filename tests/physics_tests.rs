//! Physics tests - gravity, locking, auto-shift and game over, driven the way
//! the front-end drives the board: one `physics` step then one `update`.

use blockfall::core::{Board, Position};
use blockfall::types::{InputState, PieceKind, Signal, BOARD_WIDTH, EMPTY, PHYSICS_STEP};

/// First seed whose opening piece is `kind`
fn board_starting_with(kind: PieceKind) -> Board {
    (1..10_000)
        .map(Board::with_seed)
        .find(|b| b.current().kind() == kind)
        .expect("some seed opens with every kind")
}

struct Driver {
    board: Board,
    frame: u32,
}

impl Driver {
    fn new(board: Board) -> Self {
        Self { board, frame: 0 }
    }

    fn step(&mut self, input: &InputState) {
        self.frame += 1;
        let t = self.frame as f64 * PHYSICS_STEP;
        self.board.physics(input, t, PHYSICS_STEP);
        self.board.update();
    }

    /// Step until the active piece locks; stops right after the locking physics step
    fn until_lock(&mut self, input: &InputState) {
        let id = self.board.piece_id();
        self.board.update();
        while self.board.piece_id() == id {
            assert!(self.frame < 100_000, "piece never locked");
            self.frame += 1;
            let t = self.frame as f64 * PHYSICS_STEP;
            self.board.physics(input, t, PHYSICS_STEP);
            if self.board.piece_id() == id {
                self.board.update();
            }
        }
    }

    fn occupied(&self) -> Vec<(i8, i8)> {
        let mut out = Vec::new();
        for x in 0..BOARD_WIDTH as i8 {
            for y in 0..20 {
                if self.board.is_occupied(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

#[test]
fn test_o_piece_drop_on_empty_board() {
    let mut d = Driver::new(board_starting_with(PieceKind::O));
    d.until_lock(&InputState::new());

    assert_eq!(d.occupied(), vec![(5, 18), (5, 19), (6, 18), (6, 19)]);
    assert_eq!(d.board.score(), 0);
    assert!(!d.board.is_game_over());
}

#[test]
fn test_vertical_i_fills_gap_and_clears() {
    let mut board = board_starting_with(PieceKind::I);
    for x in 0..BOARD_WIDTH as i8 {
        if x != 5 {
            board.set_state(x, 19, PieceKind::S.cell_value());
        }
    }

    let mut d = Driver::new(board);
    d.until_lock(&InputState::new());
    d.board.update();

    assert_eq!(d.board.score(), 40);
    assert_eq!(d.board.lines_cleared(), 1);
    for y in 17..20 {
        assert_eq!(d.board.get_state(5, y), PieceKind::I.cell_value());
    }
}

#[test]
fn test_soft_drop_scores_rows() {
    let mut d = Driver::new(board_starting_with(PieceKind::T));
    let input = InputState::with(&[Signal::SoftDrop]);
    for _ in 0..20 {
        d.step(&input);
    }
    assert_eq!(d.board.position().y, 10);
    assert_eq!(d.board.score(), 10);
}

#[test]
fn test_soft_drop_all_the_way_scores_each_row() {
    let mut d = Driver::new(board_starting_with(PieceKind::O));
    d.until_lock(&InputState::with(&[Signal::SoftDrop]));
    // 18 rows descended; the locking step scores nothing.
    assert_eq!(d.board.score(), 18);
}

#[test]
fn test_holding_left_reaches_wall() {
    let mut d = Driver::new(board_starting_with(PieceKind::O));
    let left = InputState::with(&[Signal::MoveLeft]);
    for _ in 0..50 {
        d.step(&left);
    }
    assert_eq!(d.board.position().x, 0);
    assert!(!d.board.can_move_side(-1));
}

#[test]
fn test_holding_right_reaches_wall() {
    let mut d = Driver::new(board_starting_with(PieceKind::I));
    let right = InputState::with(&[Signal::MoveRight]);
    for _ in 0..50 {
        d.step(&right);
    }
    // Vertical I is one cell wide.
    assert_eq!(d.board.position().x, 9);
}

#[test]
fn test_held_direction_repeats_every_six_frames() {
    let mut board = Board::with_seed(7);
    board.update();
    let left = InputState::with(&[Signal::MoveLeft]);
    let start = 1.0;

    let mut moves = Vec::new();
    let mut x = board.position().x;
    for frame in 0..20u32 {
        let t = start + frame as f64 * PHYSICS_STEP;
        board.physics(&left, t, PHYSICS_STEP);
        board.update();
        if board.position().x != x {
            x = board.position().x;
            moves.push(frame);
        }
    }
    // Spawn column 5 leaves room for four steps left for every kind.
    assert_eq!(moves, vec![0, 6, 12, 18]);
}

#[test]
fn test_rotation_is_visible_after_update() {
    let mut d = Driver::new(board_starting_with(PieceKind::I));
    d.step(&InputState::with(&[Signal::Rotate]));
    assert_eq!(d.board.current().orientation(), 1);
    assert_eq!(d.occupied(), vec![(5, 0), (6, 0), (7, 0), (8, 0)]);
}

#[test]
fn test_extra_updates_do_not_change_state() {
    let mut d = Driver::new(board_starting_with(PieceKind::L));
    let input = InputState::with(&[Signal::MoveRight, Signal::SoftDrop]);
    for _ in 0..10 {
        d.step(&input);
    }
    let cells = d.board.cells().to_vec();
    let position = d.board.position();
    for _ in 0..5 {
        d.board.update();
    }
    assert_eq!(d.board.cells(), &cells[..]);
    assert_eq!(d.board.position(), position);
}

#[test]
fn test_stacking_in_the_middle_ends_the_game() {
    let mut d = Driver::new(Board::with_seed(2024));
    let input = InputState::with(&[Signal::SoftDrop]);
    while !d.board.is_game_over() {
        assert!(d.frame < 100_000, "game never ended");
        d.step(&input);
    }

    // Nothing reaches the columns left of the spawn window, so no row fills.
    assert_eq!(d.board.lines_cleared(), 0);
    assert!(d.board.piece_id() > 1);

    let cells = d.board.cells().to_vec();
    let score = d.board.score();
    let every = InputState::with(&Signal::ALL);
    for _ in 0..200 {
        d.step(&every);
    }
    assert!(d.board.is_game_over());
    assert_eq!(d.board.cells(), &cells[..]);
    assert_eq!(d.board.score(), score);

    d.board.reset();
    assert!(!d.board.is_game_over());
    assert!(d.board.cells().iter().all(|&c| c == EMPTY));
    assert_eq!(d.board.position(), Position::SPAWN);
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        InputState::with(&[Signal::MoveLeft]),
        InputState::with(&[Signal::Rotate, Signal::SoftDrop]),
        InputState::with(&[Signal::MoveRight, Signal::SoftDrop]),
        InputState::new(),
    ];

    let mut a = Driver::new(Board::with_seed(99));
    let mut b = Driver::new(Board::with_seed(99));
    for i in 0..3000 {
        let input = &script[(i / 37) % script.len()];
        a.step(input);
        b.step(input);
    }
    assert_eq!(a.board.cells(), b.board.cells());
    assert_eq!(a.board.score(), b.board.score());
    assert_eq!(a.board.piece_id(), b.board.piece_id());
}
