//! Plain-data copy of everything a renderer needs from a game

use crate::board::{Board, Position};
use crate::piece::Piece;
use crate::shapes::Mask;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

/// Grid rows, top to bottom
pub type Grid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub orientation: usize,
    pub mask: Mask,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    fn new(piece: &Piece, position: Position) -> Self {
        Self {
            kind: piece.kind(),
            orientation: piece.orientation(),
            mask: piece.current_mask(),
            x: position.x,
            y: position.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: Grid,
    /// `None` once the game is over
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub paused: bool,
    pub game_over: bool,
    pub piece_id: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost_y = None;
        self.next = PieceKind::I;
        self.paused = false;
        self.game_over = false;
        self.piece_id = 0;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
    }

    /// Overwrite `self` from `board`, reusing the allocation
    pub fn capture(&mut self, board: &Board, paused: bool) {
        for (y, row) in self.board.iter_mut().enumerate() {
            if let Some(cells) = board.row(y as u8) {
                row.copy_from_slice(cells);
            }
        }

        let game_over = board.is_game_over();
        if game_over {
            self.active = None;
            self.ghost_y = None;
        } else {
            self.active = Some(ActiveSnapshot::new(board.current(), board.position()));
            self.ghost_y = Some(board.drop_preview().y);
        }

        self.next = board.next_kind();
        self.paused = paused;
        self.game_over = game_over;
        self.piece_id = board.piece_id();
        self.score = board.score();
        self.level = board.level();
        self.lines = board.lines_cleared();
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            board: [[EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            paused: false,
            game_over: false,
            piece_id: 0,
            score: 0,
            level: 0,
            lines: 0,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_copies_board_state() {
        let mut board = Board::with_seed(21);
        board.set_state(0, 19, 3);
        board.set_state(9, 0, 7);

        let mut snap = GameSnapshot::default();
        snap.capture(&board, false);

        assert_eq!(snap.board[19][0], 3);
        assert_eq!(snap.board[0][9], 7);
        assert_eq!(snap.next, board.next_kind());
        assert_eq!(snap.piece_id, 1);
        assert!(snap.playable());

        let active = snap.active.unwrap();
        assert_eq!(active.kind, board.current().kind());
        assert_eq!((active.x, active.y), (5, 0));
        assert_eq!(snap.ghost_y, Some(board.drop_preview().y));
    }

    #[test]
    fn game_over_has_no_active_piece() {
        let mut board = Board::with_seed(21);
        for x in 4..9 {
            for y in 0..4 {
                board.set_state(x, y, 1);
            }
        }
        board.new_tetromino();

        let mut snap = GameSnapshot::default();
        snap.capture(&board, true);
        assert!(snap.game_over);
        assert!(snap.active.is_none());
        assert!(snap.ghost_y.is_none());
        assert!(!snap.playable());
    }

    #[test]
    fn clear_resets_everything() {
        let board = Board::with_seed(21);
        let mut snap = GameSnapshot::default();
        snap.capture(&board, true);
        snap.clear();
        assert_eq!(snap, GameSnapshot::default());
    }
}
