//! Typing environments in full or summary form.
//!
//! A full [`Env`] carries binding tables usable for lookups. Annotation
//! files normally store environments reduced to their [`EnvSummary`], the
//! chain of bindings and opens from which tooling can rebuild a full
//! environment on demand. [`Env::keep_only_summary`] performs that reduction
//! and is idempotent.

use super::decl::{ModtypeDeclaration, ModuleDeclaration, TypeDeclaration, ValueDescription};
use super::path::Path;
use crate::ident::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Namespace a failed lookup was made in.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Value,
    Type,
    Module,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Namespace::Value => "value",
            Namespace::Type => "type constructor",
            Namespace::Module => "module",
        })
    }
}

/// Lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// Nothing bound under `name`.
    #[error("unbound {namespace} {name}")]
    #[allow(missing_docs)]
    Unbound { namespace: Namespace, name: String },
    /// Lookups need the binding tables, which summaries no longer have.
    #[error("environment was reduced to its summary")]
    SummaryOnly,
}

/// Result of an environment lookup.
pub type EnvResult<T> = Result<T, EnvError>;

/// Bindings and opens in scope, newest first.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvSummary {
    Empty,
    Value(Arc<EnvSummary>, Ident, Arc<ValueDescription>),
    Type(Arc<EnvSummary>, Ident, Arc<TypeDeclaration>),
    Module(Arc<EnvSummary>, Ident, Arc<ModuleDeclaration>),
    ModType(Arc<EnvSummary>, Ident, Arc<ModtypeDeclaration>),
    Open(Arc<EnvSummary>, Path),
    FunctorArg(Arc<EnvSummary>, Ident),
}

impl EnvSummary {
    /// The entry below this one; `None` at the bottom.
    pub fn parent(&self) -> Option<&EnvSummary> {
        match self {
            EnvSummary::Empty => None,
            EnvSummary::Value(rest, ..)
            | EnvSummary::Type(rest, ..)
            | EnvSummary::Module(rest, ..)
            | EnvSummary::ModType(rest, ..)
            | EnvSummary::Open(rest, _)
            | EnvSummary::FunctorArg(rest, _) => Some(rest),
        }
    }

    /// Number of entries above `Empty`.
    pub fn len(&self) -> usize {
        std::iter::successors(self.parent(), |s| s.parent()).count()
    }

    /// Whether nothing is in scope.
    pub fn is_empty(&self) -> bool {
        matches!(self, EnvSummary::Empty)
    }
}

type Scope<T> = Vec<(Ident, Arc<T>)>;

/// Newest binding satisfying `pred`.
fn newest<'a, T>(scope: &'a Scope<T>, pred: impl Fn(&Ident) -> bool) -> Option<&'a T> {
    scope
        .iter()
        .rev()
        .find(|(id, _)| pred(id))
        .map(|(_, v)| v.as_ref())
}

/// A typing environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Env {
    values: Scope<ValueDescription>,
    types: Scope<TypeDeclaration>,
    modules: Scope<ModuleDeclaration>,
    modtypes: Scope<ModtypeDeclaration>,
    summary: Arc<EnvSummary>,
    summary_only: bool,
}

impl Default for Env {
    fn default() -> Self {
        Self::empty()
    }
}

impl Env {
    /// Environment with nothing in scope.
    pub fn empty() -> Self {
        Env {
            values: Vec::new(),
            types: Vec::new(),
            modules: Vec::new(),
            modtypes: Vec::new(),
            summary: Arc::new(EnvSummary::Empty),
            summary_only: false,
        }
    }

    /// The summary chain.
    pub fn summary(&self) -> &EnvSummary {
        &self.summary
    }

    /// Whether the binding tables were dropped.
    pub fn is_summary(&self) -> bool {
        self.summary_only
    }

    /// Copy of this environment holding only its summary chain.
    pub fn keep_only_summary(&self) -> Env {
        Env {
            summary: Arc::clone(&self.summary),
            summary_only: true,
            ..Env::empty()
        }
    }

    fn push_summary(&mut self, entry: impl FnOnce(Arc<EnvSummary>) -> EnvSummary) {
        let rest = Arc::clone(&self.summary);
        self.summary = Arc::new(entry(rest));
    }

    fn tables(&self) -> EnvResult<&Self> {
        if self.summary_only {
            Err(EnvError::SummaryOnly)
        } else {
            Ok(self)
        }
    }

    /// Bind a value.
    pub fn add_value(&mut self, id: Ident, desc: ValueDescription) {
        let desc = Arc::new(desc);
        self.values.push((id.clone(), Arc::clone(&desc)));
        self.push_summary(|rest| EnvSummary::Value(rest, id, desc));
    }

    /// Bind a type.
    pub fn add_type(&mut self, id: Ident, decl: TypeDeclaration) {
        let decl = Arc::new(decl);
        self.types.push((id.clone(), Arc::clone(&decl)));
        self.push_summary(|rest| EnvSummary::Type(rest, id, decl));
    }

    /// Bind a module.
    pub fn add_module(&mut self, id: Ident, decl: ModuleDeclaration) {
        let decl = Arc::new(decl);
        self.modules.push((id.clone(), Arc::clone(&decl)));
        self.push_summary(|rest| EnvSummary::Module(rest, id, decl));
    }

    /// Bind a module type.
    pub fn add_modtype(&mut self, id: Ident, decl: ModtypeDeclaration) {
        let decl = Arc::new(decl);
        self.modtypes.push((id.clone(), Arc::clone(&decl)));
        self.push_summary(|rest| EnvSummary::ModType(rest, id, decl));
    }

    /// Record an `open`. Only the summary changes.
    pub fn add_open(&mut self, path: Path) {
        self.push_summary(|rest| EnvSummary::Open(rest, path));
    }

    /// Record a functor parameter.
    pub fn add_functor_arg(&mut self, id: Ident) {
        self.push_summary(|rest| EnvSummary::FunctorArg(rest, id));
    }

    /// This environment extended with one value.
    pub fn with_value(&self, id: Ident, desc: ValueDescription) -> Env {
        let mut env = self.clone();
        env.add_value(id, desc);
        env
    }

    /// Newest value named `name`.
    pub fn find_value(&self, name: &str) -> EnvResult<&ValueDescription> {
        newest(&self.tables()?.values, |id| id.name() == name)
            .ok_or_else(|| unbound(Namespace::Value, name))
    }

    /// Value a path resolves to. Only the last component of a dotted path
    /// is looked up; module members are not tracked.
    pub fn lookup_value(&self, path: &Path) -> EnvResult<&ValueDescription> {
        match path {
            Path::Pident(target) => newest(&self.tables()?.values, |id| id.same(target))
                .ok_or_else(|| unbound(Namespace::Value, target.name())),
            Path::Pdot(_, name, _) => self.find_value(name),
            Path::Papply(..) => Err(unbound(Namespace::Value, &path.name())),
        }
    }

    /// Newest type named `name`.
    pub fn find_type(&self, name: &str) -> EnvResult<&TypeDeclaration> {
        newest(&self.tables()?.types, |id| id.name() == name)
            .ok_or_else(|| unbound(Namespace::Type, name))
    }

    /// Newest module named `name`.
    pub fn find_module(&self, name: &str) -> EnvResult<&ModuleDeclaration> {
        newest(&self.tables()?.modules, |id| id.name() == name)
            .ok_or_else(|| unbound(Namespace::Module, name))
    }
}

fn unbound(namespace: Namespace, name: &str) -> EnvError {
    EnvError::Unbound {
        namespace,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;
    use crate::types::asttypes::PrivateFlag;
    use crate::types::decl::{ModuleType, TypeKind, ValueKind};
    use crate::types::type_expr::{TypeDesc, TypeExpr};

    fn value(id: i32) -> ValueDescription {
        ValueDescription {
            val_type: TypeExpr::generic(TypeDesc::Tvar(None), id),
            val_kind: ValueKind::ValReg,
            val_loc: Location::none(),
            val_attributes: vec![],
        }
    }

    #[test]
    fn test_newest_binding_wins() {
        let mut env = Env::empty();
        env.add_value(Ident::create_local("x"), value(1));
        env.add_value(Ident::create_local("x"), value(2));

        assert_eq!(env.find_value("x").unwrap().val_type.id, 2);
        assert_eq!(env.summary().len(), 2);
    }

    #[test]
    fn test_lookup_by_path() {
        let x = Ident::create_local("x");
        let env = Env::empty().with_value(x.clone(), value(1));
        assert!(env.lookup_value(&Path::pident(x)).is_ok());
        assert_eq!(
            Env::empty().find_module("Js").unwrap_err().to_string(),
            "unbound module Js"
        );
    }

    #[test]
    fn test_summary_drops_tables() {
        let mut env = Env::empty();
        env.add_value(Ident::create_local("x"), value(1));
        env.add_open(Path::pident(Ident::create_persistent("Js")));

        let reduced = env.keep_only_summary();
        assert!(reduced.is_summary());
        assert_eq!(reduced.summary(), env.summary());
        assert_eq!(reduced.summary().len(), 2);
        assert_eq!(reduced.find_value("x"), Err(EnvError::SummaryOnly));
        assert_eq!(reduced.keep_only_summary(), reduced);
    }

    fn abstract_type(arity: i32) -> TypeDeclaration {
        TypeDeclaration {
            type_params: vec![],
            type_arity: arity,
            type_kind: TypeKind::TypeAbstract,
            type_private: PrivateFlag::Public,
            type_manifest: None,
            type_loc: Location::none(),
            type_attributes: vec![],
        }
    }

    #[test]
    fn test_declarations_extend_the_summary() {
        let mut env = Env::empty();
        env.add_type(Ident::create_local("t"), abstract_type(0));
        env.add_functor_arg(Ident::create_local("X"));
        env.add_module(
            Ident::create_local("M"),
            ModuleDeclaration {
                md_type: ModuleType::MtySignature(vec![]),
                md_attributes: vec![],
                md_loc: Location::none(),
            },
        );
        env.add_modtype(
            Ident::create_local("S"),
            ModtypeDeclaration {
                mtd_type: None,
                mtd_attributes: vec![],
                mtd_loc: Location::none(),
            },
        );
        env.add_type(Ident::create_local("t"), abstract_type(1));

        assert_eq!(env.find_type("t").unwrap().type_arity, 1);
        assert_eq!(
            env.find_module("M").unwrap().md_type,
            ModuleType::MtySignature(vec![])
        );
        assert_eq!(
            env.find_type("u").unwrap_err().to_string(),
            "unbound type constructor u"
        );
        assert_eq!(env.summary().len(), 5);
        assert!(matches!(env.summary(), EnvSummary::Type(..)));

        let kinds: Vec<&str> = std::iter::successors(Some(env.summary()), |s| s.parent())
            .map(|s| match s {
                EnvSummary::Empty => "empty",
                EnvSummary::Value(..) => "value",
                EnvSummary::Type(..) => "type",
                EnvSummary::Module(..) => "module",
                EnvSummary::ModType(..) => "modtype",
                EnvSummary::Open(..) => "open",
                EnvSummary::FunctorArg(..) => "functor arg",
            })
            .collect();
        assert_eq!(
            kinds,
            ["type", "modtype", "module", "functor arg", "type", "empty"]
        );

        let reduced = env.keep_only_summary();
        assert_eq!(reduced.find_type("t"), Err(EnvError::SummaryOnly));
        assert_eq!(reduced.find_module("M"), Err(EnvError::SummaryOnly));
    }
}
