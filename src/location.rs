//! Source spans stored in typed trees and value descriptions.
//!
//! Value dependency edges whose endpoints share a span are dropped, so two
//! spans are equal exactly when both endpoints and the ghost flag are.
//!
//! ```rust
//! use rescript_cmt::location::{Location, Position};
//!
//! let loc = Location::from_positions(
//!     Position::new("Foo.res", 3, 20, 24),
//!     Position::new("Foo.res", 3, 20, 31),
//! );
//! assert_eq!(loc.to_string(), "Foo.res:3:5-11");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

const NONE_FILE: &str = "_none_";

/// A lexer position: file, line, start-of-line offset and absolute offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// File the position belongs to.
    pub file_name: String,
    /// 1-based line.
    pub line: i32,
    /// Offset of the first character of `line`.
    pub bol: i32,
    /// 0-based character offset in the file.
    pub cnum: i32,
}

impl Position {
    /// Build a position.
    pub fn new(file_name: impl Into<String>, line: i32, bol: i32, cnum: i32) -> Self {
        Self {
            file_name: file_name.into(),
            line,
            bol,
            cnum,
        }
    }

    /// 0-based column; negative for placeholder positions.
    pub fn column(&self) -> i32 {
        self.cnum - self.bol
    }
}

/// A span between two positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// First position of the span.
    pub loc_start: Position,
    /// Position just past the span.
    pub loc_end: Position,
    /// Set on spans the compiler synthesized.
    pub loc_ghost: bool,
}

impl Default for Location {
    fn default() -> Self {
        Self::none()
    }
}

impl Location {
    /// Span between two positions.
    pub fn from_positions(loc_start: Position, loc_end: Position) -> Self {
        Self {
            loc_start,
            loc_end,
            loc_ghost: false,
        }
    }

    /// Span over `start..end` on the first line of `file_name`.
    pub fn new(file_name: &str, start: usize, end: usize) -> Self {
        let at = |offset: usize| Position::new(file_name, 1, 0, offset as i32);
        Self::from_positions(at(start), at(end))
    }

    /// Placeholder span for nodes with no source.
    pub fn none() -> Self {
        let pos = Position::new(NONE_FILE, 1, 0, -1);
        Self {
            loc_start: pos.clone(),
            loc_end: pos,
            loc_ghost: true,
        }
    }

    /// Whether this is the placeholder span.
    pub fn is_none(&self) -> bool {
        self.loc_start.file_name == NONE_FILE
    }

    /// File of the start position.
    pub fn file_name(&self) -> &str {
        &self.loc_start.file_name
    }

    /// Line of the start position.
    pub fn start_line(&self) -> i32 {
        self.loc_start.line
    }

    /// Line of the end position.
    pub fn end_line(&self) -> i32 {
        self.loc_end.line
    }
}

/// `file:line:col-col` or `file:line:col-line:col`, 1-based start column.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("(unknown)");
        }
        let (start, end) = (self.loc_start.column(), self.loc_end.column());
        if start < 0 || end < 0 {
            return f.write_str(self.file_name());
        }
        write!(f, "{}:{}:{}-", self.file_name(), self.start_line(), start + 1)?;
        if self.start_line() != self.end_line() {
            write!(f, "{}:", self.end_line())?;
        }
        write!(f, "{end}")
    }
}

/// A value paired with the span it was written at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Located<T> {
    /// The value.
    pub txt: T,
    /// Where it was written.
    pub loc: Location,
}

impl<T> Located<T> {
    /// Pair `txt` with `loc`.
    pub fn new(txt: T, loc: Location) -> Self {
        Self { txt, loc }
    }

    /// Pair `txt` with the placeholder span.
    pub fn mknoloc(txt: T) -> Self {
        Self::new(txt, Location::none())
    }
}
