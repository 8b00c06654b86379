//! Type-level data model shared by interface descriptors and annotation files.
//!
//! - [`Path`] - Module paths for qualified names
//! - [`TypeExpr`] - Resolved type expressions
//! - [`Env`] - Typing environments, full or reduced to a summary
//! - [`typedtree`] - The typed tree produced by the type checker
//!
//! Everything here is produced by the type checker and only carried by this
//! crate, so the types are plain owned data with serde derives.

pub mod asttypes;
pub mod decl;
pub mod env;
pub mod path;
pub mod type_expr;
pub mod typedtree;

// Re-exports for convenience
pub use asttypes::{
    ArgLabel, Attribute, Attributes, ClosedFlag, Constant, DirectionFlag, Longident, MutableFlag,
    OverrideFlag, PrivateFlag, RecFlag, Variance, VirtualFlag,
};
pub use decl::{
    AliasPresence, ConstructorArguments, ConstructorDeclaration, ConstructorDescription, ExtStatus,
    ExtensionConstructor, LabelDeclaration, LabelDescription, ModtypeDeclaration,
    ModuleDeclaration, ModuleType, PrimitiveDescription, RecStatus, Signature, SignatureItem,
    TypeDeclaration, TypeKind, ValueDescription, ValueKind,
};
pub use env::{Env, EnvError, EnvResult, EnvSummary, Namespace};
pub use path::Path;
pub use type_expr::{GENERIC_LEVEL, RowDesc, RowField, TypeDesc, TypeExpr};
