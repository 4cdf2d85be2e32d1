//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, making them usable
//! from the rules engine, the input layer and the terminal renderer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 cells (x indexed 0-9, left to right)
//! - **Height**: 20 cells (y indexed 0-19, top to bottom)
//! - **Spawn position**: (5, 0), mid-width at the top
//!
//! # Timing
//!
//! Simulation time is measured in seconds (`f64`). Physics runs at a fixed
//! step of 1/60 s; every rule timer is expressed in sixtieths of a second:
//!
//! | Field | Default | Description |
//! |-------|---------|-------------|
//! | `rotate_repeat` | 6/60 | Minimum gap between accepted rotations |
//! | `move_initial_delay` | 16/60 | Gate on the first move after a release, from the cleared move timer |
//! | `move_repeat_delay` | 6/60 | Delay between moves while a direction is held |
//! | `base_dwell` | 1.0 | Time on a row at level 0 before gravity |
//! | `dwell_step` | 0.07 | Dwell reduction per level |
//! | `min_dwell` | 2/60 | Dwell floor at high levels |
//! | `soft_drop_dwell` | 2/60 | Dwell while soft drop is held |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{PieceKind, InputState, Signal, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! let kind = PieceKind::from_str("t").unwrap();
//! assert_eq!(kind, PieceKind::T);
//! assert_eq!(kind.cell_value(), 3);
//!
//! let mut input = InputState::default();
//! input.press(Signal::MoveLeft);
//! assert!(input.is_down(Signal::MoveLeft));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Number of distinct piece kinds
pub const NUM_KINDS: usize = 7;

/// Fixed physics step in seconds (60 Hz)
pub const PHYSICS_STEP: f64 = 1.0 / 60.0;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points awarded per row descended while soft dropping
pub const SOFT_DROP_POINTS: u32 = 1;

/// Line clear scoring table (classic A-type scoring)
///
/// Base points for clearing 1, 2, 3 or 4 lines at level 0. Points are
/// multiplied by `level + 1`.
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];

/// A cell on the game board.
///
/// `0` is empty, `kind.index() + 1` is a cell occupied by that piece kind.
pub type Cell = u8;

/// The value of an empty cell
pub const EMPTY: Cell = 0;

/// The seven tetromino piece kinds, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; NUM_KINDS] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Position of this kind in the catalog (0-6)
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::J => 3,
            PieceKind::L => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
        }
    }

    /// Kind at a catalog position, `None` past the end
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Value written into the board grid for this kind
    pub fn cell_value(self) -> Cell {
        self.index() as Cell + 1
    }

    /// Decode a grid cell value back into a kind
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_cell(0), None);
    /// assert_eq!(PieceKind::from_cell(1), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_cell(7), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_cell(8), None);
    /// ```
    pub fn from_cell(cell: Cell) -> Option<Self> {
        if cell == EMPTY {
            return None;
        }
        Self::from_index(cell as usize - 1)
    }

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Uppercase letter for display
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// Rule timers, in seconds of simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub rotate_repeat: f64,
    pub move_initial_delay: f64,
    pub move_repeat_delay: f64,
    pub base_dwell: f64,
    pub dwell_step: f64,
    pub min_dwell: f64,
    pub soft_drop_dwell: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            rotate_repeat: 6.0 / 60.0,
            move_initial_delay: 16.0 / 60.0,
            move_repeat_delay: 6.0 / 60.0,
            base_dwell: 1.0,
            dwell_step: 0.07,
            min_dwell: 2.0 / 60.0,
            soft_drop_dwell: 2.0 / 60.0,
        }
    }
}

/// Size of one drawn cell and the gap between cells, in pixels.
///
/// Rendering owns these numbers; the rules engine only needs them to report
/// the board's pixel extent as `(size + spacing) * cells + spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub size: f32,
    pub spacing: f32,
}

impl CellMetrics {
    /// Pixel extent of `cells` cells laid out with this metric
    pub fn extent(&self, cells: u8) -> f32 {
        (self.size + self.spacing) * cells as f32 + self.spacing
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            size: 32.0,
            spacing: 2.0,
        }
    }
}

/// Held input signals sampled once per physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Rotate to the next orientation
    Rotate,
    /// Speed up gravity
    SoftDrop,
    /// Shift one cell left
    MoveLeft,
    /// Shift one cell right
    MoveRight,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::Rotate,
        Signal::SoftDrop,
        Signal::MoveLeft,
        Signal::MoveRight,
    ];

    fn bit(self) -> u8 {
        match self {
            Signal::Rotate => 1 << 0,
            Signal::SoftDrop => 1 << 1,
            Signal::MoveLeft => 1 << 2,
            Signal::MoveRight => 1 << 3,
        }
    }
}

/// Anything the physics step can sample held signals from.
pub trait InputSource {
    fn is_down(&self, signal: Signal) -> bool;

    /// True when no signal is held
    fn all_released(&self) -> bool {
        Signal::ALL.iter().all(|&s| !self.is_down(s))
    }
}

/// A snapshot of held signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct InputState {
    held: u8,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state with the given signals held
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::{InputSource, InputState, Signal};
    ///
    /// let input = InputState::with(&[Signal::Rotate, Signal::SoftDrop]);
    /// assert!(input.is_down(Signal::Rotate));
    /// assert!(!input.is_down(Signal::MoveLeft));
    /// ```
    pub fn with(signals: &[Signal]) -> Self {
        let mut state = Self::default();
        for &signal in signals {
            state.press(signal);
        }
        state
    }

    pub fn press(&mut self, signal: Signal) {
        self.held |= signal.bit();
    }

    pub fn release(&mut self, signal: Signal) {
        self.held &= !signal.bit();
    }

    pub fn set(&mut self, signal: Signal, down: bool) {
        if down {
            self.press(signal);
        } else {
            self.release(signal);
        }
    }

    pub fn clear(&mut self) {
        self.held = 0;
    }

    pub fn is_down(&self, signal: Signal) -> bool {
        self.held & signal.bit() != 0
    }
}

impl InputSource for InputState {
    fn is_down(&self, signal: Signal) -> bool {
        InputState::is_down(self, signal)
    }
}

/// One-shot session commands (edge-triggered, unlike [`Signal`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle pause state
    TogglePause,
    /// Reset the board and start over
    Restart,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::TogglePause => "togglePause",
            Command::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_index_and_cell_value_line_up() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(kind.cell_value() as usize, i + 1);
            assert_eq!(PieceKind::from_cell(kind.cell_value()), Some(*kind));
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(*kind));
        }
        assert_eq!(PieceKind::from_index(NUM_KINDS), None);
    }

    #[test]
    fn default_timing_matches_sixtieths() {
        let t = Timing::default();
        assert_eq!(t.rotate_repeat, 6.0 / 60.0);
        assert_eq!(t.move_initial_delay, 16.0 / 60.0);
        assert_eq!(t.move_repeat_delay, 6.0 / 60.0);
        assert_eq!(t.soft_drop_dwell, 2.0 / 60.0);
        assert_eq!(t.base_dwell, 1.0);
        assert_eq!(t.dwell_step, 0.07);
    }

    #[test]
    fn cell_metrics_extent() {
        let m = CellMetrics::default();
        assert_eq!(m.extent(BOARD_WIDTH), 34.0 * 10.0 + 2.0);
        assert_eq!(m.extent(BOARD_HEIGHT), 34.0 * 20.0 + 2.0);
    }

    #[test]
    fn input_state_press_release() {
        let mut input = InputState::new();
        assert!(input.all_released());

        input.press(Signal::MoveLeft);
        input.press(Signal::SoftDrop);
        assert!(input.is_down(Signal::MoveLeft));
        assert!(input.is_down(Signal::SoftDrop));
        assert!(!input.is_down(Signal::MoveRight));
        assert!(!input.all_released());

        input.release(Signal::MoveLeft);
        assert!(!input.is_down(Signal::MoveLeft));

        input.set(Signal::Rotate, true);
        assert!(input.is_down(Signal::Rotate));
        input.clear();
        assert!(input.all_released());
    }
}
