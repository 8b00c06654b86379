//! Type expressions as stored in typed trees and signatures.
//!
//! The type checker works on an arena of mutable type nodes; by the time a
//! tree reaches persistence every link has been resolved, so the persisted
//! form is an owned tree. `id` keeps the checker's node identity so that
//! tooling can still tell two occurrences of the same variable apart.

use super::asttypes::ArgLabel;
use super::path::Path;
use serde::{Deserialize, Serialize};

/// Level of generalized type variables.
pub const GENERIC_LEVEL: i32 = 100_000_000;

/// A resolved type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeExpr {
    /// Shape of the type.
    pub desc: TypeDesc,
    /// Binding level.
    pub level: i32,
    /// Node identity from the type checker.
    pub id: i32,
}

/// Shape of a type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDesc {
    /// Type variable `'a`.
    Tvar(Option<String>),
    /// Function type.
    Tarrow {
        arg_label: ArgLabel,
        arg_type: Box<TypeExpr>,
        ret_type: Box<TypeExpr>,
        arity: Option<i32>,
    },
    /// Tuple type.
    Ttuple(Vec<TypeExpr>),
    /// Type constructor application.
    Tconstr { path: Path, args: Vec<TypeExpr> },
    /// Object type; the field list ends in `Tnil` or a row variable.
    Tobject(Box<TypeExpr>),
    /// Object field.
    Tfield(String, Box<TypeExpr>, Box<TypeExpr>),
    /// End of an object field list.
    Tnil,
    /// Polymorphic variant.
    Tvariant(RowDesc),
    /// Universal variable.
    Tunivar(Option<String>),
    /// Explicitly polymorphic type.
    Tpoly { body: Box<TypeExpr>, vars: Vec<TypeExpr> },
    /// First-class module type.
    Tpackage(Path, Vec<String>, Vec<TypeExpr>),
}

/// Row of a polymorphic variant type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDesc {
    /// Tags and their fields.
    pub row_fields: Vec<(String, RowField)>,
    /// Row variable.
    pub row_more: Box<TypeExpr>,
    /// Whether the row is closed.
    pub row_closed: bool,
}

/// A polymorphic variant tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowField {
    /// Tag is present, with an optional argument.
    Rpresent(Option<TypeExpr>),
    /// Tag may be present (conjunctive flag, argument types).
    Reither(bool, Vec<TypeExpr>),
    /// Tag is absent.
    Rabsent,
}

impl TypeExpr {
    /// Create a type expression at the generic level.
    pub fn generic(desc: TypeDesc, id: i32) -> Self {
        Self {
            desc,
            level: GENERIC_LEVEL,
            id,
        }
    }

    /// Apply a type constructor to no arguments.
    pub fn constr(path: Path, id: i32) -> Self {
        Self::generic(
            TypeDesc::Tconstr {
                path,
                args: Vec::new(),
            },
            id,
        )
    }

    /// Build an unlabelled arrow.
    pub fn arrow(arg: TypeExpr, ret: TypeExpr, id: i32) -> Self {
        Self::generic(
            TypeDesc::Tarrow {
                arg_label: ArgLabel::Nolabel,
                arg_type: Box::new(arg),
                ret_type: Box::new(ret),
                arity: Some(1),
            },
            id,
        )
    }

    /// Check if this is a type variable.
    pub fn is_var(&self) -> bool {
        matches!(self.desc, TypeDesc::Tvar(_))
    }
}
