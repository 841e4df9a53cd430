//! Quadrature decoder
//!
//! Table driven: each pin sample moves the decoder through a Gray-code
//! cycle and a direction is only reported when a full detent completes.
//! Bounce between neighbouring codes walks back and forth inside the table
//! without ever producing a step; illegal jumps fall back to the start
//! state.
//!
//! Pin sample index is `(clk << 1) | dt`.

const DIR_CW: u8 = 0x10;
const DIR_CCW: u8 = 0x20;
const STATE_MASK: u8 = 0x07;
const DIR_MASK: u8 = 0x30;

const R_START: u8 = 0x0;
const R_CW_1: u8 = 0x1;
const R_CW_2: u8 = 0x2;
const R_CW_3: u8 = 0x3;
const R_CCW_1: u8 = 0x4;
const R_CCW_2: u8 = 0x5;
const R_CCW_3: u8 = 0x6;

/// One detent per full 4-code cycle, rest position 11
#[rustfmt::skip]
const FULL_STEP: [[u8; 4]; 8] = [
    //  00        01                  10        11
    [R_START, R_CCW_1, R_CW_1,  R_START],           // START
    [R_CW_2,  R_START, R_CW_1,  R_START],           // CW_1
    [R_CW_2,  R_CW_3,  R_CW_1,  R_START],           // CW_2
    [R_CW_2,  R_CW_3,  R_START, R_START | DIR_CW],  // CW_3
    [R_CCW_2, R_CCW_1, R_START, R_START],           // CCW_1
    [R_CCW_2, R_CCW_1, R_CCW_3, R_START],           // CCW_2
    [R_CCW_2, R_START, R_CCW_3, R_START | DIR_CCW], // CCW_3
    [R_START, R_START, R_START, R_START],           // ILLEGAL
];

/// Detents at both 00 and 11
///
/// Direction flags follow the same pin order as [`FULL_STEP`], so
/// switching tables never flips the sense of rotation.
#[rustfmt::skip]
const HALF_STEP: [[u8; 4]; 6] = [
    [R_CW_3,           R_CW_2,  R_CW_1,  R_START],
    [R_CW_3 | DIR_CW,  R_START, R_CW_1,  R_START],
    [R_CW_3 | DIR_CCW, R_CW_2,  R_START, R_START],
    [R_CW_3,           R_CCW_2, R_CCW_1, R_START],
    [R_CW_3,           R_CW_2,  R_CCW_1, R_START | DIR_CCW],
    [R_CW_3,           R_CCW_2, R_CW_3,  R_START | DIR_CW],
];

/// Completed detent direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn delta(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// Quadrature state machine
#[derive(Debug, Clone)]
pub struct Decoder {
    state: u8,
    half_step: bool,
}

impl Decoder {
    pub const fn new(half_step: bool) -> Self {
        Self {
            state: R_START,
            half_step,
        }
    }

    /// Forget any partial cycle
    pub fn reset(&mut self) {
        self.state = R_START;
    }

    /// Feed one pin sample, returning a direction when a detent completes
    pub fn update(&mut self, clk: bool, dt: bool) -> Option<Direction> {
        let pins = ((clk as usize) << 1) | dt as usize;
        let row = (self.state & STATE_MASK) as usize;

        self.state = if self.half_step {
            // Rows 6 and 7 never occur in the half-step table
            HALF_STEP.get(row).map_or(R_START, |r| r[pins])
        } else {
            FULL_STEP[row][pins]
        };

        match self.state & DIR_MASK {
            DIR_CW => Some(Direction::Clockwise),
            DIR_CCW => Some(Direction::CounterClockwise),
            _ => None,
        }
    }
}
