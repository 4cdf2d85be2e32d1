//! Piece module - a tetromino instance with orientation state
//!
//! A `Piece` knows its kind and which orientation of the catalog it is in.
//! Position lives on the board; legality of a rotation is the board's call.

use crate::shapes::{mask_cells, mask_contains, shape, Mask, ShapeDef, MASK_SIZE};
use crate::types::PieceKind;

/// Active or preview tetromino
///
/// `Copy` so preview copies never share state with the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    orientation: usize,
    previous: Option<usize>,
    width: u8,
    height: u8,
}

impl Piece {
    /// Create a piece in its first orientation
    pub fn new(kind: PieceKind) -> Self {
        let mut piece = Self {
            kind,
            orientation: 0,
            previous: None,
            width: 0,
            height: 0,
        };
        piece.reset();
        piece
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn shape(&self) -> &'static ShapeDef {
        shape(self.kind)
    }

    /// Current orientation index
    pub fn orientation(&self) -> usize {
        self.orientation
    }

    /// Orientation before the last rotation, if the piece has rotated since reset
    pub fn previous_orientation(&self) -> Option<usize> {
        self.previous
    }

    pub fn current_mask(&self) -> Mask {
        self.shape().mask(self.orientation)
    }

    /// Mask before the last rotation, 0 after a reset
    pub fn previous_mask(&self) -> Mask {
        self.previous.map_or(0, |i| self.shape().mask(i))
    }

    /// Mask the next `rotate` would produce
    pub fn next_mask(&self) -> Mask {
        self.shape().mask(self.orientation + 1)
    }

    /// Back to the first orientation with no rotation history
    pub fn reset(&mut self) {
        self.orientation = 0;
        self.previous = None;
        self.recalculate_bounds();
    }

    /// Advance to the next orientation, wrapping around
    pub fn rotate(&mut self) {
        let count = self.shape().orientations();
        self.previous = Some(self.orientation);
        self.orientation = (self.orientation + 1) % count;
        self.recalculate_bounds();
    }

    /// Extent along x of the current orientation (1 + last occupied row)
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Extent along y of the current orientation (1 + last occupied column)
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Occupied `(row, column)` offsets of the current orientation
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> {
        mask_cells(self.current_mask())
    }

    pub fn contains(&self, row: u8, column: u8) -> bool {
        mask_contains(self.current_mask(), row, column)
    }

    /// First occupied row in `column`
    pub fn row_start(&self, column: u8) -> Option<u8> {
        (0..MASK_SIZE).find(|&row| self.contains(row, column))
    }

    /// Last occupied row in `column`
    pub fn row_end(&self, column: u8) -> Option<u8> {
        (0..MASK_SIZE).rev().find(|&row| self.contains(row, column))
    }

    /// Last occupied column in `row`
    ///
    /// Columns run down the board, so this is the lowest cell of the piece
    /// in that strip: the one gravity probes below.
    pub fn column_height(&self, row: u8) -> Option<u8> {
        (0..MASK_SIZE).rev().find(|&column| self.contains(row, column))
    }

    fn recalculate_bounds(&mut self) {
        let mask = self.current_mask();
        self.width = mask_cells(mask).map(|(row, _)| row + 1).max().unwrap_or(0);
        self.height = mask_cells(mask)
            .map(|(_, column)| column + 1)
            .max()
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_piece_is_reset() {
        let piece = Piece::new(PieceKind::T);
        assert_eq!(piece.kind(), PieceKind::T);
        assert_eq!(piece.orientation(), 0);
        assert_eq!(piece.previous_orientation(), None);
        assert_eq!(piece.previous_mask(), 0);
        assert_eq!(piece.current_mask(), piece.shape().masks[0]);
    }

    #[test]
    fn test_rotate_records_previous() {
        let mut piece = Piece::new(PieceKind::L);
        let first = piece.current_mask();
        piece.rotate();
        assert_eq!(piece.orientation(), 1);
        assert_eq!(piece.previous_orientation(), Some(0));
        assert_eq!(piece.previous_mask(), first);
    }

    #[test]
    fn test_four_rotations_return_to_start() {
        for kind in [PieceKind::T, PieceKind::J, PieceKind::L] {
            let mut piece = Piece::new(kind);
            let start = piece.current_mask();
            for _ in 0..4 {
                piece.rotate();
            }
            assert_eq!(piece.current_mask(), start, "{:?}", kind);
            assert_eq!(piece.orientation(), 0);
        }
    }

    #[test]
    fn test_two_orientation_kinds_cycle_in_two() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            let mut piece = Piece::new(kind);
            let start = piece.current_mask();
            piece.rotate();
            assert_ne!(piece.current_mask(), start);
            piece.rotate();
            assert_eq!(piece.current_mask(), start);
        }
    }

    #[test]
    fn test_o_rotation_is_idempotent() {
        let mut piece = Piece::new(PieceKind::O);
        let start = piece.current_mask();
        piece.rotate();
        assert_eq!(piece.current_mask(), start);
        assert_eq!(piece.orientation(), 0);
        assert_eq!(piece.next_mask(), start);
    }

    #[test]
    fn test_next_mask_matches_rotation() {
        let mut piece = Piece::new(PieceKind::T);
        let next = piece.next_mask();
        piece.rotate();
        assert_eq!(piece.current_mask(), next);
    }

    #[test]
    fn test_reset_clears_rotation() {
        let mut piece = Piece::new(PieceKind::J);
        piece.rotate();
        piece.rotate();
        piece.reset();
        assert_eq!(piece.orientation(), 0);
        assert_eq!(piece.previous_mask(), 0);
        assert_eq!(piece, Piece::new(PieceKind::J));
    }

    #[test]
    fn test_bounds_follow_current_orientation_only() {
        let mut i = Piece::new(PieceKind::I);
        // Vertical bar: one wide, four tall.
        assert_eq!((i.width(), i.height()), (1, 4));
        i.rotate();
        assert_eq!((i.width(), i.height()), (4, 1));

        let o = Piece::new(PieceKind::O);
        assert_eq!((o.width(), o.height()), (2, 2));

        let t = Piece::new(PieceKind::T);
        assert_eq!((t.width(), t.height()), (3, 2));
    }

    #[test]
    fn test_row_start_and_end() {
        // T orientation 0: cells (0,0) (1,0) (1,1) (2,0)
        let t = Piece::new(PieceKind::T);
        assert_eq!(t.row_start(0), Some(0));
        assert_eq!(t.row_end(0), Some(2));
        assert_eq!(t.row_start(1), Some(1));
        assert_eq!(t.row_end(1), Some(1));
        assert_eq!(t.row_start(2), None);
        assert_eq!(t.row_end(3), None);
    }

    #[test]
    fn test_column_height() {
        // J orientation 0: cells (0,2) (1,0) (1,1) (1,2)
        let j = Piece::new(PieceKind::J);
        assert_eq!(j.column_height(0), Some(2));
        assert_eq!(j.column_height(1), Some(2));
        assert_eq!(j.column_height(2), None);

        // S orientation 0: cells (0,1) (1,0) (1,1) (2,0)
        let s = Piece::new(PieceKind::S);
        assert_eq!(s.column_height(0), Some(1));
        assert_eq!(s.column_height(1), Some(1));
        assert_eq!(s.column_height(2), Some(0));
    }

    #[test]
    fn test_copies_are_independent() {
        let active = Piece::new(PieceKind::T);
        let mut preview = active;
        preview.rotate();
        assert_eq!(active.orientation(), 0);
        assert_eq!(preview.orientation(), 1);
    }
}
