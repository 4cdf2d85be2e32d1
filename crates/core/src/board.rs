//! Board module - the grid, the falling piece and the rules that move it
//!
//! The board is a 10x20 grid stored as a flat array (row-major, `y * WIDTH + x`).
//! Coordinates: x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Pieces spawn with their 4x4 window at (5, 0).
//!
//! Work is split in two phases:
//!
//! - [`Board::physics`] runs at a fixed rate. It reads held inputs, rotates,
//!   shifts and drops the active piece, and locks it when it cannot fall.
//! - [`Board::update`] runs once per rendered frame. It erases the footprint
//!   stamped by the previous frame, clears completed lines, then stamps the
//!   active piece at its current position so the grid can be drawn as-is.
//!
//! Between an `update` and the next `physics` the active piece is present in
//! the grid. Collision probes treat that stamped footprint as free space, so
//! the piece never collides with itself.

use arrayvec::ArrayVec;
use log::{debug, trace};

use crate::piece::Piece;
use crate::rng::{clock_seed, SimpleRng};
use crate::scoring::{calculate_drop_score, calculate_level, calculate_line_score, dwell_time};
use crate::shapes::{mask_cells, mask_contains, Mask, MASK_SIZE};
use crate::types::{
    Cell, CellMetrics, InputSource, PieceKind, Signal, Timing, BOARD_HEIGHT, BOARD_WIDTH, EMPTY,
};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Number of rows, as a capacity for per-row buffers
const ROWS: usize = BOARD_HEIGHT as usize;

/// Slack for comparing accumulated floating-point sim time against thresholds
const TIME_EPSILON: f64 = 1e-9;

/// Top-left corner of a piece's 4x4 window on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    /// Mid-width, top of the board
    pub const SPAWN: Position = Position {
        x: (BOARD_WIDTH / 2) as i8,
        y: 0,
    };

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Board cell covered by mask cell `(row, column)`
    ///
    /// Saturates at the `i8` range, which lies far outside the board.
    #[inline(always)]
    fn offset(self, row: u8, column: u8) -> (i8, i8) {
        (
            self.x.saturating_add(row as i8),
            self.y.saturating_add(column as i8),
        )
    }
}

/// Cells the active piece was last drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Footprint {
    position: Position,
    mask: Mask,
}

impl Footprint {
    fn covers(&self, x: i8, y: i8) -> bool {
        let row = x as i16 - self.position.x as i16;
        let column = y as i16 - self.position.y as i16;
        (0..MASK_SIZE as i16).contains(&row)
            && (0..MASK_SIZE as i16).contains(&column)
            && mask_contains(self.mask, row as u8, column as u8)
    }
}

/// The game board - grid, active piece, physics timers and score
#[derive(Debug, Clone)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
    timing: Timing,
    rng: SimpleRng,
    current: Piece,
    next_kind: PieceKind,
    position: Position,
    previous_position: Position,
    stamped: Option<Footprint>,
    /// True from a full release until the next move attempt
    first_move: bool,
    last_move_time: Option<f64>,
    last_rotate_time: Option<f64>,
    time_on_line: f64,
    piece_id: u32,
    game_over: bool,
    level: u32,
    lines_cleared: u32,
    score: u32,
}

impl Board {
    /// Create a board seeded from the wall clock
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    /// Create a board whose piece sequence is fully determined by `seed`
    pub fn with_seed(seed: u32) -> Self {
        let mut board = Self {
            cells: [EMPTY; BOARD_SIZE],
            timing: Timing::default(),
            rng: SimpleRng::new(seed),
            current: Piece::new(PieceKind::I),
            next_kind: PieceKind::I,
            position: Position::SPAWN,
            previous_position: Position::SPAWN,
            stamped: None,
            first_move: true,
            last_move_time: None,
            last_rotate_time: None,
            time_on_line: 0.0,
            piece_id: 0,
            game_over: false,
            level: 0,
            lines_cleared: 0,
            score: 0,
        };
        board.initialize();
        board
    }

    /// Replace the rule timers
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    /// Get width of the board in cells
    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    /// Get height of the board in cells
    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Drawn width in pixels for the given cell metrics
    pub fn pixel_width(&self, metrics: &CellMetrics) -> f32 {
        metrics.extent(BOARD_WIDTH)
    }

    /// Drawn height in pixels for the given cell metrics
    pub fn pixel_height(&self, metrics: &CellMetrics) -> f32 {
        metrics.extent(BOARD_HEIGHT)
    }

    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_some()
    }

    /// Cell value at (x, y); empty when out of bounds
    pub fn get_state(&self, x: i8, y: i8) -> Cell {
        Self::index(x, y).map_or(EMPTY, |idx| self.cells[idx])
    }

    /// Write a cell value; out-of-bounds writes are ignored
    pub fn set_state(&mut self, x: i8, y: i8, cell: Cell) {
        if let Some(idx) = Self::index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        self.get_state(x, y) != EMPTY
    }

    /// Occupied by something other than the active piece's own stamp
    fn is_blocked(&self, x: i8, y: i8) -> bool {
        self.is_occupied(x, y) && !self.stamped.is_some_and(|fp| fp.covers(x, y))
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells, left to right
    pub fn row(&self, y: u8) -> Option<&[Cell]> {
        if y >= BOARD_HEIGHT {
            return None;
        }
        let start = y as usize * BOARD_WIDTH as usize;
        Some(&self.cells[start..start + BOARD_WIDTH as usize])
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next_kind(&self) -> PieceKind {
        self.next_kind
    }

    /// A fresh copy of the next piece, for preview
    pub fn next_preview(&self) -> Piece {
        Piece::new(self.next_kind)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Position at the start of the last physics tick
    pub fn previous_position(&self) -> Position {
        self.previous_position
    }

    /// Where the active piece would come to rest if dropped straight down
    pub fn drop_preview(&self) -> Position {
        let mut position = self.position;
        while self.can_move_down(&self.current, position) {
            position.y += 1;
        }
        position
    }

    /// Board cells covered by the active piece at its current position
    pub fn active_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let position = self.position;
        self.current
            .cells()
            .map(move |(row, column)| position.offset(row, column))
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Number of pieces spawned since construction or the last reset
    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    /// Current row dwell time, ignoring soft drop
    pub fn dwell_time(&self) -> f64 {
        dwell_time(self.level, &self.timing)
    }

    /// Empty the grid and start a new game
    pub fn reset(&mut self) {
        self.cells.fill(EMPTY);
        self.initialize();
        debug!("board reset, first piece {:?}", self.current.kind());
    }

    fn initialize(&mut self) {
        self.game_over = false;
        self.level = 0;
        self.lines_cleared = 0;
        self.score = 0;

        self.first_move = true;
        self.last_move_time = None;
        self.last_rotate_time = None;
        self.time_on_line = 0.0;

        self.stamped = None;
        self.piece_id = 0;
        self.next_kind = self.rng.next_kind();
        self.new_tetromino();
    }

    /// Promote the next kind to the active piece and draw a new next kind
    pub(crate) fn new_tetromino(&mut self) {
        let kind = self.next_kind;
        self.next_kind = self.rng.next_kind();
        self.current = Piece::new(kind);
        self.position = Position::SPAWN;
        self.previous_position = Position::SPAWN;
        self.time_on_line = 0.0;
        self.piece_id = self.piece_id.wrapping_add(1);

        if self.can_spawn() {
            trace!("spawned {:?}, next {:?}", kind, self.next_kind);
        } else {
            self.game_over = true;
            debug!(
                "game over: {:?} blocked at spawn (score {}, lines {})",
                kind, self.score, self.lines_cleared
            );
        }
    }

    /// Can the active piece sit at its current position?
    pub fn can_spawn(&self) -> bool {
        self.active_cells().all(|(x, y)| !self.is_blocked(x, y))
    }

    /// Can `piece` at `position` fall one row?
    ///
    /// Only the lowest cell of each strip is probed; the cell below any other
    /// cell of the strip is the piece itself.
    pub fn can_move_down(&self, piece: &Piece, position: Position) -> bool {
        let below = Position::new(position.x, position.y.saturating_add(1));
        if below.y >= BOARD_HEIGHT as i8 {
            return false;
        }

        for row in 0..MASK_SIZE {
            let Some(column) = piece.column_height(row) else {
                continue;
            };
            let (x, y) = below.offset(row, column);
            if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
                return false;
            }
            if self.is_blocked(x, y) {
                return false;
            }
        }

        true
    }

    /// Can the active piece shift one cell left (`-1`) or right (`1`)?
    pub fn can_move_side(&self, direction: i8) -> bool {
        let target = Position::new(self.position.x.saturating_add(direction), self.position.y);

        for column in 0..MASK_SIZE {
            let edge = if direction > 0 {
                self.current.row_end(column)
            } else {
                self.current.row_start(column)
            };
            let Some(row) = edge else {
                continue;
            };
            let (x, y) = target.offset(row, column);
            if x < 0 || x >= BOARD_WIDTH as i8 || self.is_blocked(x, y) {
                return false;
            }
        }

        true
    }

    /// Can the active piece rotate in place?
    ///
    /// Only cells the next orientation newly covers are checked. There are
    /// no wall kicks: a rotation that does not fit in place is refused.
    pub fn can_rotate(&self) -> bool {
        let current = self.current.current_mask();
        let next = self.current.next_mask();

        mask_cells(next)
            .filter(|&(row, column)| !mask_contains(current, row, column))
            .all(|(row, column)| {
                let (x, y) = self.position.offset(row, column);
                self.in_bounds(x, y) && !self.is_blocked(x, y)
            })
    }

    /// Erase the active footprint and advance the orientation
    ///
    /// The new orientation is drawn by the next `update`.
    pub(crate) fn rotate_tetromino(&mut self) {
        self.erase_footprint();
        self.current.rotate();
        trace!(
            "rotated {:?} to orientation {}",
            self.current.kind(),
            self.current.orientation()
        );
    }

    /// Remove the last stamped footprint from the grid
    fn erase_footprint(&mut self) {
        if let Some(footprint) = self.stamped.take() {
            for (row, column) in mask_cells(footprint.mask) {
                let (x, y) = footprint.position.offset(row, column);
                self.set_state(x, y, EMPTY);
            }
        }
    }

    /// Draw the active piece into the grid at its current position
    fn stamp_footprint(&mut self) {
        let value = self.current.kind().cell_value();
        let position = self.position;
        for (row, column) in self.current.cells() {
            let (x, y) = position.offset(row, column);
            self.set_state(x, y, value);
        }
        self.stamped = Some(Footprint {
            position,
            mask: self.current.current_mask(),
        });
    }

    /// Commit the active piece to the grid and spawn the next one
    fn lock_tetromino(&mut self) {
        self.erase_footprint();
        self.stamp_footprint();
        // The cells now belong to the world, not the active piece.
        self.stamped = None;
        debug!(
            "locked {:?} at ({}, {})",
            self.current.kind(),
            self.position.x,
            self.position.y
        );
        self.new_tetromino();
    }

    fn is_line_complete(&self, y: u8) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|&cell| cell != EMPTY))
    }

    /// Number of fully occupied rows
    pub fn num_lines_completed(&self) -> usize {
        (0..BOARD_HEIGHT).filter(|&y| self.is_line_complete(y)).count()
    }

    /// Remove row `line` and shift every row above it down by one
    fn remove_line(&mut self, line: u8) {
        let width = BOARD_WIDTH as usize;
        let end = line as usize * width;
        // copy_within handles the overlapping ranges
        self.cells.copy_within(0..end, width);
        self.cells[..width].fill(EMPTY);
    }

    /// Clear every complete row, scoring them as one clear
    ///
    /// Returns the indices of the rows that were complete, bottom to top.
    pub fn clear_completed_lines(&mut self) -> ArrayVec<u8, ROWS> {
        let completed: ArrayVec<u8, ROWS> = (0..BOARD_HEIGHT)
            .rev()
            .filter(|&y| self.is_line_complete(y))
            .collect();
        if completed.is_empty() {
            return completed;
        }

        self.update_score(completed.len());

        while let Some(line) = (0..BOARD_HEIGHT).rev().find(|&y| self.is_line_complete(y)) {
            self.remove_line(line);
        }

        completed
    }

    fn update_score(&mut self, lines: usize) {
        let points = calculate_line_score(lines, self.level);
        self.score = self.score.saturating_add(points);
        self.lines_cleared = self.lines_cleared.saturating_add(lines as u32);
        self.level = calculate_level(self.lines_cleared);
        debug!(
            "cleared {} line(s) for {} points (score {}, lines {}, level {})",
            lines, points, self.score, self.lines_cleared, self.level
        );
    }

    /// One fixed physics step at sim time `t`, `dt` seconds after the last
    pub fn physics<I: InputSource + ?Sized>(&mut self, input: &I, t: f64, dt: f64) {
        if self.game_over {
            return;
        }

        self.physics_start();
        self.physics_rotate(input, t);
        self.physics_move(input, t);
        self.physics_gravity(input, dt);
    }

    fn physics_start(&mut self) {
        self.previous_position = self.position;
    }

    /// Rotate while the input is held, at most once per `rotate_repeat`
    fn physics_rotate<I: InputSource + ?Sized>(&mut self, input: &I, t: f64) -> bool {
        if !input.is_down(Signal::Rotate) {
            return false;
        }

        if let Some(last) = self.last_rotate_time {
            if t + TIME_EPSILON < last + self.timing.rotate_repeat {
                return false;
            }
        }

        if !self.can_rotate() {
            return false;
        }

        self.rotate_tetromino();
        self.last_rotate_time = Some(t);
        true
    }

    /// Delayed auto-shift. The first move after a release is gated by
    /// `move_initial_delay` measured from the released timer, so it happens at
    /// once; every later move waits `move_repeat_delay`.
    fn physics_move<I: InputSource + ?Sized>(&mut self, input: &I, t: f64) -> bool {
        let left = input.is_down(Signal::MoveLeft);
        let right = input.is_down(Signal::MoveRight);

        if !(left || right) {
            self.last_move_time = None;
            self.first_move = true;
            return false;
        }

        let delay = if self.first_move {
            self.timing.move_initial_delay
        } else {
            self.timing.move_repeat_delay
        };
        if let Some(last) = self.last_move_time {
            if t + TIME_EPSILON < last + delay {
                return false;
            }
        }

        let moved = if left && self.can_move_side(-1) {
            self.position.x -= 1;
            true
        } else if right && self.can_move_side(1) {
            self.position.x += 1;
            true
        } else {
            false
        };

        if moved {
            trace!("moved {:?} to x={}", self.current.kind(), self.position.x);
        }
        // Until every direction is released, further moves are repeats.
        self.first_move = false;
        self.last_move_time = Some(t);
        moved
    }

    /// Returns false when the piece locked this step
    fn physics_gravity<I: InputSource + ?Sized>(&mut self, input: &I, dt: f64) -> bool {
        let soft_drop = input.is_down(Signal::SoftDrop);
        let dwell = if soft_drop {
            self.timing.soft_drop_dwell
        } else {
            self.dwell_time()
        };

        self.time_on_line += dt;
        if self.time_on_line + TIME_EPSILON < dwell {
            return true;
        }
        self.time_on_line = 0.0;

        if !self.can_move_down(&self.current, self.position) {
            self.lock_tetromino();
            return false;
        }

        self.position.y = (self.position.y + 1).min(BOARD_HEIGHT as i8);
        if soft_drop {
            self.score = self.score.saturating_add(calculate_drop_score(1));
        }
        true
    }

    /// Per-frame step: erase the last stamp, clear lines, stamp the active piece
    pub fn update(&mut self) {
        if self.game_over {
            return;
        }

        self.erase_footprint();
        self.clear_completed_lines();
        self.stamp_footprint();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
