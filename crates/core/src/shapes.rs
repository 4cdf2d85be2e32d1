//! Shape catalog - immutable tetromino definitions
//!
//! Each kind is a list of 1 to 4 orientation masks. A mask is 16 bits over a
//! 4x4 window with bit index `row * 4 + column`.
//!
//! The mask `row` runs along the board's x axis and the mask `column` along
//! its y axis, so a set bit at `(row, column)` covers board cell
//! `(x + row, y + column)` for a piece whose window sits at `(x, y)`.

use crate::types::{PieceKind, NUM_KINDS};

/// 16-bit occupancy pattern over a 4x4 window
pub type Mask = u16;

/// Side length of the mask window
pub const MASK_SIZE: u8 = 4;

/// Build a mask from `(row, column)` cells
const fn mask(cells: [(u8, u8); 4]) -> Mask {
    let mut m: Mask = 0;
    let mut i = 0;
    while i < cells.len() {
        m |= 1 << (cells[i].0 * MASK_SIZE + cells[i].1);
        i += 1;
    }
    m
}

/// Immutable definition of one piece kind
#[derive(Debug, PartialEq, Eq)]
pub struct ShapeDef {
    pub kind: PieceKind,
    /// Orientations in rotation order
    pub masks: &'static [Mask],
    /// ARGB display color
    pub color: u32,
}

impl ShapeDef {
    pub fn orientations(&self) -> usize {
        self.masks.len()
    }

    /// Mask for an orientation index, wrapping past the end
    pub fn mask(&self, orientation: usize) -> Mask {
        self.masks[orientation % self.masks.len()]
    }
}

// Vertical bar, then horizontal bar.
const I_MASKS: [Mask; 2] = [
    mask([(0, 0), (0, 1), (0, 2), (0, 3)]),
    mask([(0, 0), (1, 0), (2, 0), (3, 0)]),
];

const O_MASKS: [Mask; 1] = [mask([(0, 0), (0, 1), (1, 0), (1, 1)])];

const T_MASKS: [Mask; 4] = [
    mask([(0, 0), (1, 0), (1, 1), (2, 0)]),
    mask([(0, 1), (1, 1), (1, 0), (2, 1)]),
    mask([(0, 0), (0, 1), (0, 2), (1, 1)]),
    mask([(1, 0), (0, 1), (1, 1), (1, 2)]),
];

const J_MASKS: [Mask; 4] = [
    mask([(1, 0), (1, 1), (1, 2), (0, 2)]),
    mask([(0, 0), (1, 0), (2, 0), (2, 1)]),
    mask([(0, 0), (0, 1), (0, 2), (1, 0)]),
    mask([(0, 1), (1, 1), (2, 1), (0, 0)]),
];

const L_MASKS: [Mask; 4] = [
    mask([(1, 0), (1, 1), (1, 2), (0, 0)]),
    mask([(0, 1), (1, 1), (2, 1), (2, 0)]),
    mask([(0, 0), (0, 1), (0, 2), (1, 2)]),
    mask([(0, 1), (1, 0), (2, 0), (0, 0)]),
];

const S_MASKS: [Mask; 2] = [
    mask([(0, 1), (1, 0), (1, 1), (2, 0)]),
    mask([(0, 0), (0, 1), (1, 1), (1, 2)]),
];

const Z_MASKS: [Mask; 2] = [
    mask([(0, 0), (1, 0), (1, 1), (2, 1)]),
    mask([(0, 1), (0, 2), (1, 0), (1, 1)]),
];

/// The catalog, indexed by [`PieceKind::index`]
pub static SHAPES: [ShapeDef; NUM_KINDS] = [
    ShapeDef {
        kind: PieceKind::I,
        masks: &I_MASKS,
        color: 0xFF00_FFFF,
    },
    ShapeDef {
        kind: PieceKind::O,
        masks: &O_MASKS,
        color: 0xFFFF_FF00,
    },
    ShapeDef {
        kind: PieceKind::T,
        masks: &T_MASKS,
        color: 0xFFFF_00FF,
    },
    ShapeDef {
        kind: PieceKind::J,
        masks: &J_MASKS,
        color: 0xFF00_00FF,
    },
    ShapeDef {
        kind: PieceKind::L,
        masks: &L_MASKS,
        color: 0xFFFF_8100,
    },
    ShapeDef {
        kind: PieceKind::S,
        masks: &S_MASKS,
        color: 0xFF00_FF00,
    },
    ShapeDef {
        kind: PieceKind::Z,
        masks: &Z_MASKS,
        color: 0xFFFF_0000,
    },
];

/// Look up the definition for a kind
pub fn shape(kind: PieceKind) -> &'static ShapeDef {
    &SHAPES[kind.index()]
}

/// ARGB color for a kind
pub fn color(kind: PieceKind) -> u32 {
    shape(kind).color
}

/// Is the cell at `(row, column)` set in `mask`?
#[inline(always)]
pub fn mask_contains(mask: Mask, row: u8, column: u8) -> bool {
    row < MASK_SIZE && column < MASK_SIZE && mask & (1 << (row * MASK_SIZE + column)) != 0
}

/// Iterate the `(row, column)` cells set in `mask`, row-major
pub fn mask_cells(mask: Mask) -> impl Iterator<Item = (u8, u8)> {
    (0..MASK_SIZE * MASK_SIZE)
        .filter(move |&bit| mask & (1 << bit) != 0)
        .map(|bit| (bit / MASK_SIZE, bit % MASK_SIZE))
}
