//! Flags, literals and names that typed tree nodes carry over from the
//! parse tree.

#![allow(missing_docs)]

use crate::location::Location;
use serde::{Deserialize, Serialize};

/// A literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i32),
    /// Unicode code point.
    Char(i32),
    /// Contents and the `{js|...|js}` delimiter, if any.
    String(String, Option<String>),
    /// Kept as written so no precision is lost.
    Float(String),
    /// Sign (`true` when negative) and digits.
    BigInt(bool, String),
}

/// `let` versus `let rec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RecFlag {
    #[default]
    Nonrecursive,
    Recursive,
}

/// `for i in a to b` versus `downto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionFlag {
    Upto,
    Downto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrivateFlag {
    Private,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutableFlag {
    Immutable,
    Mutable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VirtualFlag {
    Virtual,
    Concrete,
}

/// `open!` (`Override`) versus `open` (`Fresh`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverrideFlag {
    Override,
    Fresh,
}

/// Whether a record pattern, object or variant row admits more fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosedFlag {
    Closed,
    Open,
}

/// Label of a parameter or argument: none, `~x` or `~x=?`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArgLabel {
    #[default]
    Nolabel,
    Labelled(String),
    Optional(String),
}

/// A parsed attribute, kept as its name and printed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, e.g. `deprecated`.
    pub attr_name: String,
    /// Payload as written in the source.
    pub attr_payload: String,
    /// Location of the attribute.
    pub attr_loc: Location,
}

pub type Attributes = Vec<Attribute>;

/// `+'a`, `-'a` or plain `'a` on a type parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variance {
    Covariant,
    Contravariant,
    Invariant,
}

/// A long identifier as written in the source, e.g. `Foo.Bar.baz`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Longident {
    /// `foo`
    Lident(String),
    /// `Foo.bar`
    Ldot(Box<Longident>, String),
    /// `F(X)`
    Lapply(Box<Longident>, Box<Longident>),
}

impl Longident {
    /// Parse a dotted name such as `Foo.Bar.baz`.
    pub fn parse(s: &str) -> Self {
        let mut parts = s.split('.');
        let head = parts.next().unwrap_or_default();
        parts.fold(Longident::Lident(head.to_string()), |acc, part| {
            Longident::Ldot(Box::new(acc), part.to_string())
        })
    }

    /// Last component.
    pub fn last(&self) -> &str {
        match self {
            Longident::Lident(s) | Longident::Ldot(_, s) => s,
            Longident::Lapply(_, arg) => arg.last(),
        }
    }
}

impl std::fmt::Display for Longident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Longident::Lident(s) => write!(f, "{s}"),
            Longident::Ldot(prefix, s) => write!(f, "{prefix}.{s}"),
            Longident::Lapply(func, arg) => write!(f, "{func}({arg})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longident_parse() {
        let lid = Longident::parse("Belt.Array.map");
        assert_eq!(lid.last(), "map");
        assert_eq!(lid.to_string(), "Belt.Array.map");
        assert_eq!(Longident::parse("x"), Longident::Lident("x".into()));
    }
}
