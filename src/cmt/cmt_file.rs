//! Annotation payloads (`.cmt` / `.cmti`).
//!
//! An annotation payload is the annotation marker followed by one record
//! holding a [`CmtInfos`]: the typed tree of the unit, or the fragments that
//! were checked before type checking stopped, plus build metadata.

use super::error::CmtResult;
use super::magic::{self, PayloadKind};
use crate::digest::Digest;
use crate::location::Location;
use crate::marshal::{input_value, output_value};
use crate::types::typedtree::{
    ClassExpr, Expression, ModuleTypeExpr, Pattern, Signature, SignatureItem, Structure,
    StructureItem,
};
use crate::types::{Env, ValueDescription};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};

/// The typed tree stored for a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinaryAnnots {
    /// A pack of several units: the resulting signature and the packed files.
    Packed(crate::types::Signature, Vec<String>),
    /// A fully checked implementation.
    Implementation(Structure),
    /// A fully checked interface.
    Interface(Signature),
    /// Fragments of an implementation whose checking did not complete.
    PartialImplementation(Vec<BinaryPart>),
    /// Fragments of an interface whose checking did not complete.
    PartialInterface(Vec<BinaryPart>),
}

impl BinaryAnnots {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            BinaryAnnots::Packed(..) => "packed",
            BinaryAnnots::Implementation(_) => "implementation",
            BinaryAnnots::Interface(_) => "interface",
            BinaryAnnots::PartialImplementation(_) => "partial implementation",
            BinaryAnnots::PartialInterface(_) => "partial interface",
        }
    }

    /// Whether the tree describes an interface.
    pub fn is_interface(&self) -> bool {
        matches!(
            self,
            BinaryAnnots::Interface(_) | BinaryAnnots::PartialInterface(_)
        )
    }
}

/// One node checked before type checking stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinaryPart {
    /// A whole structure, e.g. a functor body.
    PartialStructure(Structure),
    /// One structure item.
    PartialStructureItem(StructureItem),
    /// An expression.
    PartialExpression(Expression),
    /// A pattern.
    PartialPattern(Pattern),
    /// A class expression.
    PartialClassExpr(ClassExpr),
    /// A whole signature.
    PartialSignature(Signature),
    /// One signature item.
    PartialSignatureItem(SignatureItem),
    /// A module type.
    PartialModuleType(ModuleTypeExpr),
}

/// Contents of an annotation payload.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CmtInfos {
    /// Unit name.
    pub cmt_modname: String,
    /// The typed tree.
    pub cmt_annots: BinaryAnnots,
    /// `(used, user)` edges between value declarations.
    pub cmt_value_dependencies: Vec<(ValueDescription, ValueDescription)>,
    /// Comments in source order.
    pub cmt_comments: Vec<(String, Location)>,
    /// Compiler argument vector.
    pub cmt_args: Vec<String>,
    /// Source file the unit was compiled from.
    pub cmt_sourcefile: Option<String>,
    /// Working directory of the compiler.
    pub cmt_builddir: String,
    /// Directories searched for compiled interfaces.
    pub cmt_loadpath: Vec<String>,
    /// Checksum of the source file.
    pub cmt_source_digest: Option<Digest>,
    /// Environment the unit was checked in.
    pub cmt_initial_env: Env,
    /// Imported units with their interface checksums, sorted by name.
    pub cmt_imports: Vec<(String, Option<Digest>)>,
    /// Checksum of the unit's own interface.
    pub cmt_interface_digest: Option<Digest>,
    /// Whether environments were reduced to summaries.
    pub cmt_use_summaries: bool,
}

impl fmt::Debug for CmtInfos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmtInfos")
            .field("cmt_modname", &self.cmt_modname)
            .field("cmt_annots", &self.cmt_annots.kind())
            .field(
                "cmt_value_dependencies",
                &self.cmt_value_dependencies.len(),
            )
            .field("cmt_comments", &self.cmt_comments.len())
            .field("cmt_sourcefile", &self.cmt_sourcefile)
            .field("cmt_builddir", &self.cmt_builddir)
            .field("cmt_imports", &self.cmt_imports)
            .field("cmt_interface_digest", &self.cmt_interface_digest)
            .field("cmt_use_summaries", &self.cmt_use_summaries)
            .finish_non_exhaustive()
    }
}

/// Write an annotation payload, marker included.
pub fn output_cmt<W: Write>(writer: &mut W, cmt: &CmtInfos) -> CmtResult<()> {
    magic::write_magic(writer, PayloadKind::Annotation)?;
    let bytes = output_value(writer, cmt)?;
    log::debug!(
        "wrote {} annotations for {} ({} bytes)",
        cmt.cmt_annots.kind(),
        cmt.cmt_modname,
        bytes.len()
    );
    Ok(())
}

/// Read an annotation payload whose marker has already been consumed.
pub fn input_cmt<R: Read>(reader: &mut R) -> CmtResult<CmtInfos> {
    input_value(reader)
}
