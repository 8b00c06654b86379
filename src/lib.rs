//! Binary annotation persistence for the ReScript compiler.
//!
//! For every compiled unit this crate writes and reads:
//!
//! - the compiled-interface descriptor (`.cmi`): exported signature plus the
//!   checksums of every interface it depends on;
//! - the annotation payload (`.cmt` / `.cmti`): the typed tree, or the
//!   fragments checked before type checking stopped, with comments, value
//!   dependencies and build metadata. Editor tooling reads these.
//!
//! # Architecture
//!
//! - [`CmtConfig`] - Immutable configuration shared across units
//! - [`CompilationContext`] - Per-unit state: imports and the [`UnitInfo`]
//!   accumulator the type checker records into
//! - [`cmt`] - File markers, codecs, environment summarization, persistence
//! - [`types`] - The typed tree and environments being persisted
//!
//! No state is global, so units can be persisted from several threads at
//! once, each through its own `CompilationContext`.
//!
//! ```rust
//! use rescript_cmt::{BinaryAnnots, CmtConfig, CompilationContext};
//! use rescript_cmt::config::ProcessInfo;
//! use rescript_cmt::types::Env;
//! use std::sync::Arc;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = Arc::new(CmtConfig::default());
//! let mut ctx = CompilationContext::with_process(config, "Foo.res", ProcessInfo::default());
//!
//! let path = dir.path().join("Foo.cmt");
//! let annots = BinaryAnnots::PartialImplementation(vec![]);
//! ctx.save_cmt(&path, annots, &Env::empty(), None, vec![]).unwrap();
//!
//! let cmt = rescript_cmt::cmt::read_cmt(&path).unwrap();
//! assert_eq!(cmt.cmt_modname, "Foo");
//! assert!(cmt.cmt_use_summaries);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![allow(clippy::uninlined_format_args)]

pub mod cmt;
pub mod config;
pub mod context;
pub mod digest;
pub mod ident;
pub mod location;
pub mod marshal;
pub mod types;

// Re-exports for convenience
pub use cmt::{BinaryAnnots, BinaryPart, CmiInfos, CmtError, CmtInfos, CmtResult, UnitInfo};
pub use config::CmtConfig;
pub use context::CompilationContext;
pub use digest::Digest;
pub use ident::Ident;
pub use location::Location;
pub use types::{Env, Path, TypeExpr};
