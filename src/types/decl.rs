//! Declarations as the type checker records them.
//!
//! The same structures live in environments and form the exported
//! [`Signature`] stored in a compiled interface, so a descriptor read back
//! from disk compares equal to the one written. Field names follow the
//! compiler's own (`val_`, `type_`, `ld_`, ...).

#![allow(missing_docs)]

use super::asttypes::{Attributes, MutableFlag, PrivateFlag};
use super::path::Path;
use super::type_expr::TypeExpr;
use crate::ident::Ident;
use crate::location::Location;
use serde::{Deserialize, Serialize};

/// A value binding. Its `val_loc` identifies it in dependency edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDescription {
    pub val_type: TypeExpr,
    pub val_kind: ValueKind,
    pub val_loc: Location,
    pub val_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueKind {
    /// An ordinary `let`.
    ValReg,
    /// An `external`.
    ValPrim(PrimitiveDescription),
}

/// Target of an `external` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveDescription {
    pub prim_name: String,
    pub prim_arity: i32,
    /// Empty when equal to `prim_name`.
    pub prim_native_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub type_params: Vec<TypeExpr>,
    pub type_arity: i32,
    pub type_kind: TypeKind,
    pub type_private: PrivateFlag,
    /// Right-hand side of an abbreviation.
    pub type_manifest: Option<TypeExpr>,
    pub type_loc: Location,
    pub type_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    TypeAbstract,
    TypeRecord(Vec<LabelDeclaration>),
    TypeVariant(Vec<ConstructorDeclaration>),
    /// `type t = ..`
    TypeOpen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDeclaration {
    pub ld_id: Ident,
    pub ld_mutable: MutableFlag,
    /// `?field` in a record type.
    pub ld_optional: bool,
    pub ld_type: TypeExpr,
    pub ld_loc: Location,
    pub ld_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    pub cd_id: Ident,
    pub cd_args: ConstructorArguments,
    /// Explicit result type of a GADT constructor.
    pub cd_res: Option<TypeExpr>,
    pub cd_loc: Location,
    pub cd_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstructorArguments {
    CstrTuple(Vec<TypeExpr>),
    /// Inline record: `A({x: int})`.
    CstrRecord(Vec<LabelDeclaration>),
}

/// One constructor added to an open type with `+=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionConstructor {
    pub ext_type_path: Path,
    pub ext_type_params: Vec<TypeExpr>,
    pub ext_args: ConstructorArguments,
    pub ext_ret_type: Option<TypeExpr>,
    pub ext_private: PrivateFlag,
    pub ext_loc: Location,
    pub ext_attributes: Attributes,
}

/// A constructor as resolved where it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDescription {
    pub cstr_name: String,
    pub cstr_res: TypeExpr,
    pub cstr_args: Vec<TypeExpr>,
    pub cstr_arity: i32,
    pub cstr_loc: Location,
}

/// A record field as resolved where it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDescription {
    pub lbl_name: String,
    /// The record type.
    pub lbl_res: TypeExpr,
    /// The field type.
    pub lbl_arg: TypeExpr,
    pub lbl_mut: MutableFlag,
    /// Index of the field in the record block.
    pub lbl_pos: i32,
    pub lbl_loc: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleType {
    MtyIdent(Path),
    MtySignature(Signature),
    /// `param_type` is `None` for a generative functor.
    MtyFunctor {
        param: Ident,
        param_type: Option<Box<ModuleType>>,
        result: Box<ModuleType>,
    },
    MtyAlias(AliasPresence, Path),
}

/// Whether an aliased module still needs a runtime representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliasPresence {
    MtaPresent,
    MtaAbsent,
}

/// Items a module exports, in declaration order.
pub type Signature = Vec<SignatureItem>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignatureItem {
    SigValue(Ident, ValueDescription),
    SigType(Ident, TypeDeclaration, RecStatus),
    SigTypext(Ident, ExtensionConstructor, ExtStatus),
    SigModule(Ident, ModuleDeclaration, RecStatus),
    SigModtype(Ident, ModtypeDeclaration),
    /// Placeholders keeping the item layout of the OCaml format.
    SigClass,
    SigClassType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub md_type: ModuleType,
    pub md_attributes: Attributes,
    pub md_loc: Location,
}

/// `module type S` (abstract when `mtd_type` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModtypeDeclaration {
    pub mtd_type: Option<ModuleType>,
    pub mtd_attributes: Attributes,
    pub mtd_loc: Location,
}

/// Position of a declaration within its `and` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecStatus {
    TrecNot,
    TrecFirst,
    TrecNext,
}

/// Position of a constructor within its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtStatus {
    TextFirst,
    TextNext,
    TextException,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::type_expr::TypeDesc;

    #[test]
    fn test_signature_survives_bincode() {
        let sign: Signature = vec![
            SignatureItem::SigValue(
                Ident::create_persistent("x"),
                ValueDescription {
                    val_type: TypeExpr::generic(TypeDesc::Tvar(None), 1),
                    val_kind: ValueKind::ValPrim(PrimitiveDescription {
                        prim_name: "%identity".into(),
                        prim_arity: 1,
                        prim_native_name: String::new(),
                    }),
                    val_loc: Location::none(),
                    val_attributes: vec![],
                },
            ),
            SignatureItem::SigClass,
        ];
        let bytes = bincode::serialize(&sign).unwrap();
        let back: Signature = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, sign);
    }
}
