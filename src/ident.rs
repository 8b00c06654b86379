//! Stamped identifiers.
//!
//! Stamps survive a trip through an annotation file, so an identifier read
//! back from disk compares equal to the one that was written.
//!
//! ```rust
//! use rescript_cmt::ident::Ident;
//!
//! let a = Ident::create_local("x");
//! let b = Ident::create_local("x");
//! assert_eq!(a.name(), b.name());
//! assert_ne!(a, b);
//! assert_eq!(Ident::create_persistent("Js"), Ident::create_persistent("Js"));
//! ```

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI32, Ordering};

static NEXT_STAMP: AtomicI32 = AtomicI32::new(1);

/// An identifier: a name plus a stamp telling same-named bindings apart.
///
/// Stamp 0 marks a persistent identifier (a compilation unit), which is
/// identified by name alone.
#[derive(Clone, Serialize, Deserialize)]
pub struct Ident {
    name: SmolStr,
    stamp: i32,
    global: bool,
}

impl Ident {
    /// Identifier with an explicit stamp.
    pub fn new(name: impl Into<SmolStr>, stamp: i32) -> Self {
        Self {
            name: name.into(),
            stamp,
            global: false,
        }
    }

    /// Identifier for a compilation unit.
    pub fn create_persistent(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            stamp: 0,
            global: true,
        }
    }

    /// Identifier with a fresh stamp.
    pub fn create_local(name: impl Into<SmolStr>) -> Self {
        Self::new(name, NEXT_STAMP.fetch_add(1, Ordering::Relaxed))
    }

    /// The source name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 0 for persistent identifiers.
    #[inline]
    pub fn stamp(&self) -> i32 {
        self.stamp
    }

    /// Whether this names a compilation unit.
    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.stamp == 0
    }

    /// Whether both denote the same binding: equal stamps, or equal names
    /// for two persistent identifiers.
    pub fn same(&self, other: &Self) -> bool {
        match (self.stamp, other.stamp) {
            (0, 0) => self.name == other.name,
            (a, b) => a == b,
        }
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_persistent() {
            write!(f, "{}!", self.name)
        } else if self.global {
            write!(f, "{}/{}g", self.name, self.stamp)
        } else {
            write!(f, "{}/{}", self.name, self.stamp)
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Ident {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Ident {}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.stamp {
            0 => self.name.hash(state),
            n => n.hash(state),
        }
    }
}
