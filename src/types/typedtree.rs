//! Typed Abstract Syntax Tree.
//!
//! The tree produced by the type checker and stored in annotation files.
//! Compared with the parse tree:
//! - every identifier has a resolved [`Path`]
//! - every expression and pattern carries its [`TypeExpr`]
//! - every node that scopes bindings carries the [`Env`] it was checked in
//!
//! Environments are owned values here. The persisted tree normally holds
//! them in summary form (see [`Env::keep_only_summary`]).

#![allow(missing_docs)]
#![allow(non_camel_case_types)]

use super::asttypes::{
    ArgLabel, Attribute, Attributes, ClosedFlag, Constant, DirectionFlag, Longident, MutableFlag,
    OverrideFlag, PrivateFlag, RecFlag, Variance, VirtualFlag,
};
use super::decl::{self as ty, ConstructorDescription, LabelDescription};
use super::env::Env;
use super::path::Path;
use super::type_expr::TypeExpr;
use crate::ident::Ident;
use crate::location::{Located, Location};
use serde::{Deserialize, Serialize};

/// Source text with its span.
pub type Loc<T> = Located<T>;

/// Exhaustiveness verdict on a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Partial {
    Partial,
    Total,
}

// ============================================================================
// Patterns
// ============================================================================

/// A pattern with its type and the environment it was checked in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub pat_desc: PatternDesc,
    pub pat_loc: Location,
    /// Constraints, opens and unpacks applied on top of the pattern.
    pub pat_extra: Vec<(PatExtra, Location, Attributes)>,
    pub pat_type: TypeExpr,
    pub pat_env: Env,
    pub pat_attributes: Attributes,
}

/// Extra information attached to a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatExtra {
    /// `(p : t)`
    Tpat_constraint(CoreType),
    /// `#tconst`
    Tpat_type(Path, Loc<Longident>),
    /// `M.(p)`, with the environment after the open.
    Tpat_open(Path, Loc<Longident>, Env),
    /// `(module M)`
    Tpat_unpack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternDesc {
    Tpat_any,
    Tpat_var(Ident, Loc<String>),
    Tpat_alias(Box<Pattern>, Ident, Loc<String>),
    Tpat_constant(Constant),
    Tpat_tuple(Vec<Pattern>),
    Tpat_construct(Loc<Longident>, ConstructorDescription, Vec<Pattern>),
    Tpat_variant(String, Option<Box<Pattern>>),
    /// Fields carry a flag telling whether the field is optional.
    Tpat_record(Vec<(Loc<Longident>, LabelDescription, Pattern, bool)>, ClosedFlag),
    Tpat_array(Vec<Pattern>),
    Tpat_or(Box<Pattern>, Box<Pattern>),
    Tpat_lazy(Box<Pattern>),
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression with its type and the environment it was checked in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub exp_desc: ExpressionDesc,
    pub exp_loc: Location,
    pub exp_extra: Vec<(ExpExtra, Location, Attributes)>,
    pub exp_type: TypeExpr,
    pub exp_env: Env,
    pub exp_attributes: Attributes,
}

/// Extra information attached to an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpExtra {
    /// `(e : t)`
    Texp_constraint(CoreType),
    /// `(e : t0 :> t)`
    Texp_coerce(Option<CoreType>, CoreType),
    /// `M.(e)`, with the environment after the open.
    Texp_open(OverrideFlag, Path, Loc<Longident>, Env),
    /// `(e : 'a. t)`
    Texp_poly(Option<CoreType>),
    /// `fun (type t) -> e`
    Texp_newtype(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionDesc {
    Texp_ident(Path, Loc<Longident>, ty::ValueDescription),
    Texp_constant(Constant),
    Texp_let(RecFlag, Vec<ValueBinding>, Box<Expression>),
    Texp_function {
        arg_label: ArgLabel,
        arity: Option<i32>,
        param: Ident,
        cases: Vec<Case>,
        partial: Partial,
        async_: bool,
    },
    Texp_apply {
        funct: Box<Expression>,
        args: Vec<(ArgLabel, Option<Expression>)>,
        partial: bool,
    },
    /// Scrutinee, value cases, exception cases.
    Texp_match(Box<Expression>, Vec<Case>, Vec<Case>, Partial),
    Texp_try(Box<Expression>, Vec<Case>),
    Texp_tuple(Vec<Expression>),
    Texp_construct(Loc<Longident>, ConstructorDescription, Vec<Expression>),
    Texp_variant(String, Option<Box<Expression>>),
    Texp_record {
        fields: Vec<(LabelDescription, RecordLabelDefinition)>,
        extended_expression: Option<Box<Expression>>,
    },
    Texp_field(Box<Expression>, Loc<Longident>, LabelDescription),
    Texp_setfield(
        Box<Expression>,
        Loc<Longident>,
        LabelDescription,
        Box<Expression>,
    ),
    Texp_array(Vec<Expression>),
    Texp_ifthenelse(Box<Expression>, Box<Expression>, Option<Box<Expression>>),
    Texp_sequence(Box<Expression>, Box<Expression>),
    Texp_while(Box<Expression>, Box<Expression>),
    Texp_for(
        Ident,
        Loc<String>,
        Box<Expression>,
        Box<Expression>,
        DirectionFlag,
        Box<Expression>,
    ),
    Texp_send(Box<Expression>, MethKind, Option<Box<Expression>>),
    Texp_new(Path, Loc<Longident>),
    Texp_letmodule(Ident, Loc<String>, Box<ModuleExpr>, Box<Expression>),
    Texp_letexception(ExtensionConstructor, Box<Expression>),
    Texp_assert(Box<Expression>),
    Texp_lazy(Box<Expression>),
    Texp_object(ClassStructure, Vec<String>),
    Texp_pack(Box<ModuleExpr>),
    Texp_unreachable,
    Texp_extension_constructor(Loc<Longident>, Path),
}

/// Method kind for `Texp_send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethKind {
    Tmeth_name(String),
    Tmeth_val(Ident),
}

/// How a record field is obtained in `{...e, l = v}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordLabelDefinition {
    /// Copied from the extended expression.
    Kept(TypeExpr),
    Overridden(Loc<Longident>, Expression),
}

/// A match case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub c_lhs: Pattern,
    pub c_guard: Option<Expression>,
    pub c_rhs: Expression,
}

/// A `let` binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBinding {
    pub vb_pat: Pattern,
    pub vb_expr: Expression,
    pub vb_attributes: Attributes,
    pub vb_loc: Location,
}

// ============================================================================
// Core Types
// ============================================================================

/// A type annotation as written, after checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreType {
    pub ctyp_desc: CoreTypeDesc,
    pub ctyp_type: TypeExpr,
    pub ctyp_env: Env,
    pub ctyp_loc: Location,
    pub ctyp_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CoreTypeDesc {
    Ttyp_any,
    Ttyp_var(String),
    Ttyp_arrow(ArgLabel, Box<CoreType>, Box<CoreType>),
    Ttyp_tuple(Vec<CoreType>),
    Ttyp_constr(Path, Loc<Longident>, Vec<CoreType>),
    Ttyp_object(Vec<ObjectField>, ClosedFlag),
    Ttyp_class(Path, Loc<Longident>, Vec<CoreType>),
    Ttyp_alias(Box<CoreType>, String),
    Ttyp_variant(Vec<RowField>, ClosedFlag, Option<Vec<String>>),
    Ttyp_poly(Vec<String>, Box<CoreType>),
    Ttyp_package(PackageType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectField {
    OTtag(Loc<String>, Attributes, CoreType),
    OTinherit(CoreType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowField {
    /// Tag, attributes, whether a constant constructor is allowed, arguments.
    Ttag(Loc<String>, Attributes, bool, Vec<CoreType>),
    Tinherit(CoreType),
}

/// `(module S with type t = ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageType {
    pub pack_path: Path,
    pub pack_fields: Vec<(Loc<Longident>, CoreType)>,
    pub pack_type: ty::ModuleType,
    pub pack_txt: Loc<Longident>,
}

// ============================================================================
// Module Expressions
// ============================================================================

/// A typed module expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleExpr {
    pub mod_desc: ModuleExprDesc,
    pub mod_loc: Location,
    pub mod_type: ty::ModuleType,
    pub mod_env: Env,
    pub mod_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleExprDesc {
    Tmod_ident(Path, Loc<Longident>),
    Tmod_structure(Structure),
    Tmod_functor(
        Ident,
        Loc<String>,
        Option<Box<ModuleTypeExpr>>,
        Box<ModuleExpr>,
    ),
    Tmod_apply(Box<ModuleExpr>, Box<ModuleExpr>, ModuleCoercion),
    Tmod_constraint(
        Box<ModuleExpr>,
        ty::ModuleType,
        ModuleTypeConstraint,
        ModuleCoercion,
    ),
    Tmod_unpack(Box<Expression>, ty::ModuleType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleTypeConstraint {
    Tmodtype_implicit,
    Tmodtype_explicit(Box<ModuleTypeExpr>),
}

/// Coercion from a module to a module type it is matched against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleCoercion {
    Tcoerce_none,
    /// Field positions with their coercions, plus identifier positions.
    Tcoerce_structure(
        Vec<(i32, ModuleCoercion)>,
        Vec<(Ident, i32, ModuleCoercion)>,
    ),
    Tcoerce_functor(Box<ModuleCoercion>, Box<ModuleCoercion>),
    Tcoerce_primitive(PrimitiveCoercion),
    /// Alias to `path`, resolved in `env`.
    Tcoerce_alias(Env, Path, Box<ModuleCoercion>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveCoercion {
    pub pc_desc: ty::PrimitiveDescription,
    pub pc_type: TypeExpr,
    pub pc_loc: Location,
}

// ============================================================================
// Module Types
// ============================================================================

/// A typed module type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTypeExpr {
    pub mty_desc: ModuleTypeDesc,
    pub mty_type: ty::ModuleType,
    pub mty_env: Env,
    pub mty_loc: Location,
    pub mty_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleTypeDesc {
    Tmty_ident(Path, Loc<Longident>),
    Tmty_signature(Signature),
    Tmty_functor(
        Ident,
        Loc<String>,
        Option<Box<ModuleTypeExpr>>,
        Box<ModuleTypeExpr>,
    ),
    Tmty_with(
        Box<ModuleTypeExpr>,
        Vec<(Path, Loc<Longident>, WithConstraint)>,
    ),
    Tmty_typeof(Box<ModuleExpr>),
    Tmty_alias(Path, Loc<Longident>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WithConstraint {
    Twith_type(TypeDeclaration),
    Twith_module(Path, Loc<Longident>),
    Twith_typesubst(TypeDeclaration),
    Twith_modsubst(Path, Loc<Longident>),
}

// ============================================================================
// Structures
// ============================================================================

/// A typed structure (implementation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub str_items: Vec<StructureItem>,
    pub str_type: ty::Signature,
    /// Environment at the end of the structure.
    pub str_final_env: Env,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureItem {
    pub str_desc: StructureItemDesc,
    pub str_loc: Location,
    pub str_env: Env,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructureItemDesc {
    Tstr_eval(Expression, Attributes),
    Tstr_value(RecFlag, Vec<ValueBinding>),
    Tstr_primitive(ValueDescription),
    Tstr_type(RecFlag, Vec<TypeDeclaration>),
    Tstr_typext(TypeExtension),
    Tstr_exception(ExtensionConstructor),
    Tstr_module(ModuleBinding),
    Tstr_recmodule(Vec<ModuleBinding>),
    Tstr_modtype(ModuleTypeDeclaration),
    Tstr_open(OpenDeclaration),
    Tstr_class(Vec<(ClassDeclaration, Vec<String>)>),
    Tstr_class_type(Vec<(Ident, Loc<String>, ClassTypeDeclaration)>),
    Tstr_include(IncludeDeclaration),
    Tstr_attribute(Attribute),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleBinding {
    pub mb_id: Ident,
    pub mb_name: Loc<String>,
    pub mb_expr: ModuleExpr,
    pub mb_attributes: Attributes,
    pub mb_loc: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleTypeDeclaration {
    pub mtd_id: Ident,
    pub mtd_name: Loc<String>,
    pub mtd_type: Option<ModuleTypeExpr>,
    pub mtd_attributes: Attributes,
    pub mtd_loc: Location,
}

/// `open M`, with the environment after the open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenDeclaration {
    pub open_path: Path,
    pub open_txt: Loc<Longident>,
    pub open_override: OverrideFlag,
    pub open_env: Env,
    pub open_loc: Location,
    pub open_attributes: Attributes,
}

/// `include` in a structure or a signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludeInfos<T> {
    pub incl_mod: T,
    pub incl_type: ty::Signature,
    pub incl_loc: Location,
    pub incl_attributes: Attributes,
}

pub type IncludeDeclaration = IncludeInfos<ModuleExpr>;
pub type IncludeDescription = IncludeInfos<ModuleTypeExpr>;

// ============================================================================
// Signatures
// ============================================================================

/// A typed signature (interface).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub sig_items: Vec<SignatureItem>,
    pub sig_type: ty::Signature,
    /// Environment at the end of the signature.
    pub sig_final_env: Env,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureItem {
    pub sig_desc: SignatureItemDesc,
    pub sig_env: Env,
    pub sig_loc: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SignatureItemDesc {
    Tsig_value(ValueDescription),
    Tsig_type(RecFlag, Vec<TypeDeclaration>),
    Tsig_typext(TypeExtension),
    Tsig_exception(ExtensionConstructor),
    Tsig_module(ModuleDeclaration),
    Tsig_recmodule(Vec<ModuleDeclaration>),
    Tsig_modtype(ModuleTypeDeclaration),
    Tsig_open(OpenDeclaration),
    Tsig_include(IncludeDescription),
    Tsig_class(Vec<ClassDescription>),
    Tsig_class_type(Vec<ClassTypeDeclaration>),
    Tsig_attribute(Attribute),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub md_id: Ident,
    pub md_name: Loc<String>,
    pub md_type: ModuleTypeExpr,
    pub md_attributes: Attributes,
    pub md_loc: Location,
}

// ============================================================================
// Declarations
// ============================================================================

/// `external` or `let` in a signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueDescription {
    pub val_id: Ident,
    pub val_name: Loc<String>,
    pub val_desc: CoreType,
    pub val_val: ty::ValueDescription,
    pub val_prim: Vec<String>,
    pub val_loc: Location,
    pub val_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub typ_id: Ident,
    pub typ_name: Loc<String>,
    pub typ_params: Vec<(CoreType, Variance)>,
    pub typ_type: ty::TypeDeclaration,
    pub typ_cstrs: Vec<(CoreType, CoreType, Location)>,
    pub typ_kind: TypeKind,
    pub typ_private: PrivateFlag,
    pub typ_manifest: Option<CoreType>,
    pub typ_loc: Location,
    pub typ_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    Ttype_abstract,
    Ttype_variant(Vec<ConstructorDeclaration>),
    Ttype_record(Vec<LabelDeclaration>),
    Ttype_open,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDeclaration {
    pub ld_id: Ident,
    pub ld_name: Loc<String>,
    pub ld_mutable: MutableFlag,
    pub ld_optional: bool,
    pub ld_type: CoreType,
    pub ld_loc: Location,
    pub ld_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    pub cd_id: Ident,
    pub cd_name: Loc<String>,
    pub cd_args: ConstructorArguments,
    pub cd_res: Option<CoreType>,
    pub cd_loc: Location,
    pub cd_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstructorArguments {
    Cstr_tuple(Vec<CoreType>),
    Cstr_record(Vec<LabelDeclaration>),
}

/// `type t += ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeExtension {
    pub tyext_path: Path,
    pub tyext_txt: Loc<Longident>,
    pub tyext_params: Vec<(CoreType, Variance)>,
    pub tyext_constructors: Vec<ExtensionConstructor>,
    pub tyext_private: PrivateFlag,
    pub tyext_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionConstructor {
    pub ext_id: Ident,
    pub ext_name: Loc<String>,
    pub ext_type: ty::ExtensionConstructor,
    pub ext_kind: ExtensionConstructorKind,
    pub ext_loc: Location,
    pub ext_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtensionConstructorKind {
    Text_decl(ConstructorArguments, Option<CoreType>),
    Text_rebind(Path, Loc<Longident>),
}

// ============================================================================
// Classes
// ============================================================================

/// A typed class expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassExpr {
    pub cl_desc: ClassExprDesc,
    pub cl_loc: Location,
    pub cl_env: Env,
    pub cl_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassExprDesc {
    Tcl_ident(Path, Loc<Longident>, Vec<CoreType>),
    Tcl_structure(ClassStructure),
    Tcl_fun(
        ArgLabel,
        Pattern,
        Vec<(Ident, Loc<String>, Expression)>,
        Box<ClassExpr>,
        Partial,
    ),
    Tcl_apply(Box<ClassExpr>, Vec<(ArgLabel, Option<Expression>)>),
    Tcl_let(
        RecFlag,
        Vec<ValueBinding>,
        Vec<(Ident, Loc<String>, Expression)>,
        Box<ClassExpr>,
    ),
    /// Expression, declared type, public values, public methods.
    Tcl_constraint(Box<ClassExpr>, Option<ClassType>, Vec<String>, Vec<String>),
    Tcl_open(OverrideFlag, Path, Loc<Longident>, Env, Box<ClassExpr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStructure {
    pub cstr_self: Pattern,
    pub cstr_fields: Vec<ClassField>,
    pub cstr_type: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassField {
    pub cf_desc: ClassFieldDesc,
    pub cf_loc: Location,
    pub cf_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassFieldDesc {
    Tcf_inherit(OverrideFlag, ClassExpr, Option<String>),
    Tcf_val(Loc<String>, MutableFlag, Ident, ClassFieldKind),
    Tcf_method(Loc<String>, PrivateFlag, ClassFieldKind),
    Tcf_constraint(CoreType, CoreType),
    Tcf_initializer(Expression),
    Tcf_attribute(Attribute),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassFieldKind {
    Tcfk_virtual(CoreType),
    Tcfk_concrete(OverrideFlag, Expression),
}

/// A typed class type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassType {
    pub cltyp_desc: ClassTypeDesc,
    pub cltyp_env: Env,
    pub cltyp_loc: Location,
    pub cltyp_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassTypeDesc {
    Tcty_constr(Path, Loc<Longident>, Vec<CoreType>),
    Tcty_signature(ClassSignature),
    Tcty_arrow(ArgLabel, CoreType, Box<ClassType>),
    Tcty_open(OverrideFlag, Path, Loc<Longident>, Env, Box<ClassType>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSignature {
    pub csig_self: CoreType,
    pub csig_fields: Vec<ClassTypeField>,
    pub csig_type: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTypeField {
    pub ctf_desc: ClassTypeFieldDesc,
    pub ctf_loc: Location,
    pub ctf_attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassTypeFieldDesc {
    Tctf_inherit(ClassType),
    Tctf_val(String, MutableFlag, VirtualFlag, CoreType),
    Tctf_method(String, PrivateFlag, VirtualFlag, CoreType),
    Tctf_constraint(CoreType, CoreType),
    Tctf_attribute(Attribute),
}

/// A class, class description or class type declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfos<T> {
    pub ci_virt: VirtualFlag,
    pub ci_params: Vec<(CoreType, Variance)>,
    pub ci_id_name: Loc<String>,
    pub ci_id_class: Ident,
    pub ci_expr: T,
    pub ci_loc: Location,
    pub ci_attributes: Attributes,
}

pub type ClassDeclaration = ClassInfos<ClassExpr>;
pub type ClassDescription = ClassInfos<ClassType>;
pub type ClassTypeDeclaration = ClassInfos<ClassType>;

// ============================================================================
// Constructors
// ============================================================================

impl Pattern {
    /// Create a pattern with no extras or attributes.
    pub fn new(desc: PatternDesc, loc: Location, typ: TypeExpr, env: Env) -> Self {
        Pattern {
            pat_desc: desc,
            pat_loc: loc,
            pat_extra: vec![],
            pat_type: typ,
            pat_env: env,
            pat_attributes: vec![],
        }
    }

    /// The identifiers bound by this pattern, left to right.
    pub fn bound_idents(&self) -> Vec<&Ident> {
        let mut ids = Vec::new();
        self.collect_idents(&mut ids);
        ids
    }

    fn collect_idents<'a>(&'a self, ids: &mut Vec<&'a Ident>) {
        match &self.pat_desc {
            PatternDesc::Tpat_any | PatternDesc::Tpat_constant(_) => {}
            PatternDesc::Tpat_var(id, _) => ids.push(id),
            PatternDesc::Tpat_alias(p, id, _) => {
                p.collect_idents(ids);
                ids.push(id);
            }
            PatternDesc::Tpat_tuple(ps)
            | PatternDesc::Tpat_construct(_, _, ps)
            | PatternDesc::Tpat_array(ps) => {
                for p in ps {
                    p.collect_idents(ids);
                }
            }
            PatternDesc::Tpat_variant(_, p) => {
                if let Some(p) = p {
                    p.collect_idents(ids);
                }
            }
            PatternDesc::Tpat_record(fields, _) => {
                for (_, _, p, _) in fields {
                    p.collect_idents(ids);
                }
            }
            PatternDesc::Tpat_or(p, _) | PatternDesc::Tpat_lazy(p) => p.collect_idents(ids),
        }
    }
}

impl Expression {
    /// Create an expression with no extras or attributes.
    pub fn new(desc: ExpressionDesc, loc: Location, typ: TypeExpr, env: Env) -> Self {
        Expression {
            exp_desc: desc,
            exp_loc: loc,
            exp_extra: vec![],
            exp_type: typ,
            exp_env: env,
            exp_attributes: vec![],
        }
    }
}

impl Structure {
    /// Number of top-level items.
    pub fn len(&self) -> usize {
        self.str_items.len()
    }

    /// Whether the structure has no items.
    pub fn is_empty(&self) -> bool {
        self.str_items.is_empty()
    }
}

impl Signature {
    /// Number of top-level items.
    pub fn len(&self) -> usize {
        self.sig_items.len()
    }

    /// Whether the signature has no items.
    pub fn is_empty(&self) -> bool {
        self.sig_items.is_empty()
    }
}
