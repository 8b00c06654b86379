//! Access paths to types, values and modules.
//!
//! ```rust
//! use rescript_cmt::ident::Ident;
//! use rescript_cmt::types::Path;
//!
//! let belt = Path::pident(Ident::create_persistent("Belt"));
//! assert_eq!(Path::pdot(belt, "Array").to_string(), "Belt.Array");
//! ```

use crate::ident::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An access path. The `i32` on [`Path::Pdot`] is a field position hint,
/// `-1` when unknown; it is not part of the path's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Path {
    /// `M`
    Pident(Ident),
    /// `M.x`
    Pdot(Box<Path>, String, i32),
    /// `F(X)`
    Papply(Box<Path>, Box<Path>),
}

impl Path {
    /// `id` on its own.
    #[inline]
    pub fn pident(id: Ident) -> Self {
        Path::Pident(id)
    }

    /// `prefix.name` with no position hint.
    #[inline]
    pub fn pdot(prefix: Path, name: impl Into<String>) -> Self {
        Path::Pdot(Box::new(prefix), name.into(), -1)
    }

    /// `functor(arg)`.
    #[inline]
    pub fn papply(functor: Path, arg: Path) -> Self {
        Path::Papply(Box::new(functor), Box::new(arg))
    }

    /// Structural equality up to identifier sameness and position hints.
    pub fn same(&self, other: &Path) -> bool {
        match (self, other) {
            (Path::Pident(a), Path::Pident(b)) => a.same(b),
            (Path::Pdot(p, a, _), Path::Pdot(q, b, _)) => a == b && p.same(q),
            (Path::Papply(f, x), Path::Papply(g, y)) => f.same(g) && x.same(y),
            _ => false,
        }
    }

    /// Dotted rendering, e.g. `Belt.Array.t`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Pident(id) => write!(f, "{id}"),
            Path::Pdot(prefix, name, _) => write!(f, "{prefix}.{name}"),
            Path::Papply(functor, arg) => write!(f, "{functor}({arg})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str) -> Path {
        Path::pident(Ident::create_persistent(name))
    }

    #[test]
    fn test_rendering() {
        let map = Path::pdot(Path::pdot(unit("Belt"), "Array"), "map");
        assert_eq!(map.name(), "Belt.Array.map");
        assert_eq!(Path::papply(unit("F"), unit("X")).to_string(), "F(X)");
    }

    #[test]
    fn test_same_ignores_position_hint() {
        let hinted = Path::Pdot(Box::new(unit("M")), "x".into(), 3);
        assert!(hinted.same(&Path::pdot(unit("M"), "x")));
        assert!(!hinted.same(&Path::pdot(unit("N"), "x")));
    }
}
