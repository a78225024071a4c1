//! Fixed column layout of the inquiry spreadsheet and per-column conversion.
//!
//! The source file's header row is never trusted: columns are matched by
//! position against [`SCHEMA`] and converted according to their [`ColumnKind`].

use serde::Serialize;
use std::fmt;

use crate::time_of_day::{TimeOfDay, from_day_fraction, parse_time_text};

/// A cell as read from the source, before any column typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    /// Spreadsheet date/time serial: days since the workbook epoch.
    Serial(f64),
    Bool(bool),
    /// Error value stored in the sheet, such as `#DIV/0!`.
    Error(String),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Text(s) => f.write_str(s),
            RawCell::Int(i) => write!(f, "{i}"),
            RawCell::Float(v) | RawCell::Serial(v) => write!(f, "{v}"),
            RawCell::Bool(b) => write!(f, "{b}"),
            RawCell::Error(e) => f.write_str(e),
        }
    }
}

/// Customer satisfaction rating, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Score)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A converted cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Label(String),
    Time(TimeOfDay),
    Score(Option<Score>),
}

/// Why a cell failed its column's conversion rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellError {
    pub reason: String,
}

impl CellError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Semantic type of a column together with its conversion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Free text, kept as written.
    Label,
    /// A time of day; any date part of the cell is discarded.
    TimeOfDay,
    /// An integer rating within `min..=max`, blank cells are absent.
    Score { min: u8, max: u8 },
}

impl ColumnKind {
    pub fn convert(self, cell: &RawCell) -> Result<Value, CellError> {
        match self {
            ColumnKind::Label => convert_label(cell).map(Value::Label),
            ColumnKind::TimeOfDay => convert_time(cell).map(Value::Time),
            ColumnKind::Score { min, max } => convert_score(cell, min, max).map(Value::Score),
        }
    }
}

fn convert_label(cell: &RawCell) -> Result<String, CellError> {
    match cell {
        c if c.is_empty() => Err(CellError::new("empty cell")),
        RawCell::Text(s) => Ok(s.clone()),
        RawCell::Int(_) | RawCell::Float(_) => Ok(cell.to_string()),
        RawCell::Error(e) => Err(CellError::new(format!("sheet error {e}"))),
        _ => Err(CellError::new("expected text")),
    }
}

fn convert_time(cell: &RawCell) -> Result<TimeOfDay, CellError> {
    match cell {
        c if c.is_empty() => Err(CellError::new("empty cell")),
        RawCell::Text(s) => {
            parse_time_text(s).ok_or_else(|| CellError::new("not a time or date-time"))
        }
        RawCell::Serial(v) | RawCell::Float(v) => {
            from_day_fraction(*v).ok_or_else(|| CellError::new("date serial out of range"))
        }
        RawCell::Error(e) => Err(CellError::new(format!("sheet error {e}"))),
        _ => Err(CellError::new("expected a time")),
    }
}

fn convert_score(cell: &RawCell, min: u8, max: u8) -> Result<Option<Score>, CellError> {
    let value = match cell {
        c if c.is_empty() => return Ok(None),
        RawCell::Int(i) => *i,
        RawCell::Float(v) if v.fract() == 0.0 && v.abs() <= i64::MAX as f64 => *v as i64,
        RawCell::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => i,
                Err(_) => match s.parse::<f64>() {
                    Ok(v) if v.fract() == 0.0 && v.is_finite() => v as i64,
                    _ => return Err(CellError::new("not an integer")),
                },
            }
        }
        RawCell::Error(e) => return Err(CellError::new(format!("sheet error {e}"))),
        _ => return Err(CellError::new("not an integer")),
    };

    if value < i64::from(min) || value > i64::from(max) {
        return Err(CellError::new(format!("outside {min}..={max}")));
    }
    Score::new(value)
        .map(Some)
        .ok_or_else(|| CellError::new(format!("outside {}..={}", Score::MIN, Score::MAX)))
}

/// One positional column of the inquiry sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    /// A missing cell in a required column is a conversion failure.
    pub required: bool,
}

pub const WEEKDAY: usize = 0;
pub const CONTACT_TIME: usize = 1;
pub const DURATION: usize = 2;
pub const SATISFACTION_SCORE: usize = 3;

pub const SCHEMA: [ColumnSpec; 4] = [
    ColumnSpec {
        name: "weekday",
        kind: ColumnKind::Label,
        required: true,
    },
    ColumnSpec {
        name: "contact_time",
        kind: ColumnKind::TimeOfDay,
        required: true,
    },
    ColumnSpec {
        name: "duration",
        kind: ColumnKind::TimeOfDay,
        required: true,
    },
    ColumnSpec {
        name: "satisfaction_score",
        kind: ColumnKind::Score {
            min: Score::MIN,
            max: Score::MAX,
        },
        required: false,
    },
];
