//! Coordinate records received over the serial link
//!
//! One record per line, written as whitespace or comma separated `key:value`
//! pairs. All three keys are required:
//!
//! ```text
//! x:120.5 y:33 z:0
//! ```
//!
//! `x` and `y` are millimetres, `z` is the pen state (0 = down, anything
//! else = up).

/// Pen position requested by a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PenState {
    /// Pen touching the paper
    Down,
    /// Pen lifted for travel moves
    Up,
}

impl PenState {
    /// Interpret the integer `z` field (0 = down, non-zero = up)
    pub fn from_z(z: i32) -> Self {
        if z == 0 {
            PenState::Down
        } else {
            PenState::Up
        }
    }

    /// Integer wire value of this state
    pub fn as_z(self) -> i32 {
        match self {
            PenState::Down => 0,
            PenState::Up => 1,
        }
    }

    /// Returns true if the pen is lifted
    pub fn is_up(self) -> bool {
        self == PenState::Up
    }
}

/// A validated target position for the plotter head
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoordinateRecord {
    /// Target X in millimetres (not yet clamped to machine limits)
    pub x: f32,
    /// Target Y in millimetres (not yet clamped to machine limits)
    pub y: f32,
    /// Pen state for the move
    pub z: PenState,
}

impl CoordinateRecord {
    /// Create a record
    pub const fn new(x: f32, y: f32, z: PenState) -> Self {
        Self { x, y, z }
    }
}

/// Reasons a line could not be turned into a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// The `x:` field is missing
    MissingX,
    /// The `y:` field is missing
    MissingY,
    /// The `z:` field is missing
    MissingZ,
    /// A value could not be parsed or is not finite
    InvalidNumber,
}

/// Parse one line into a coordinate record
///
/// Unknown `key:value` pairs and bare words are ignored. A key that appears
/// twice keeps its last value.
pub fn parse_record(line: &str) -> Result<CoordinateRecord, RecordError> {
    let mut x = None;
    let mut y = None;
    let mut z = None;

    for token in line
        .split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let Some((key, value)) = token.split_once(':') else {
            continue;
        };

        match key {
            "x" | "X" => x = Some(parse_mm(value)?),
            "y" | "Y" => y = Some(parse_mm(value)?),
            "z" | "Z" => {
                let raw: i32 = value.parse().map_err(|_| RecordError::InvalidNumber)?;
                z = Some(PenState::from_z(raw));
            }
            _ => {}
        }
    }

    Ok(CoordinateRecord {
        x: x.ok_or(RecordError::MissingX)?,
        y: y.ok_or(RecordError::MissingY)?,
        z: z.ok_or(RecordError::MissingZ)?,
    })
}

fn parse_mm(value: &str) -> Result<f32, RecordError> {
    let mm: f32 = value.parse().map_err(|_| RecordError::InvalidNumber)?;
    if !mm.is_finite() {
        return Err(RecordError::InvalidNumber);
    }
    Ok(mm)
}
