//! Per-unit compilation context.
//!
//! Everything that is scoped to one compilation unit lives here instead of in
//! globals, so several units can be compiled concurrently, each with its own
//! context.
//!
//! ```text
//! CmtConfig (immutable, shared)
//!        │
//!        ▼
//! CompilationContext (per unit)
//!        │
//!        ├── SourceUnit (source path, module name)
//!        ├── ProcessInfo (argv, build dir, load path)
//!        ├── imports (units whose interfaces were consulted)
//!        └── UnitInfo (fragments and dependency edges)
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cmt::{BinaryAnnots, BinaryPart, CmiInfos, CmtResult, SaveRequest, UnitInfo};
use crate::config::{CmtConfig, ProcessInfo};
use crate::digest::Digest;
use crate::location::Location;
use crate::types::{Env, ValueDescription};

/// The file a unit is compiled from and the names derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path as given on the command line.
    pub path: String,
    /// `src/myModule.res` gives `MyModule`.
    pub module_name: String,
    /// `src/myModule.res` gives `src/myModule`; artifacts append an extension.
    pub stem: String,
}

impl SourceUnit {
    /// Derive the unit's names from its source path.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let file = Path::new(&path);
        let module_name = file
            .file_stem()
            .map(|stem| capitalize(&stem.to_string_lossy()))
            .unwrap_or_default();
        let stem = file.with_extension("").to_string_lossy().into_owned();
        Self {
            path,
            module_name,
            stem,
        }
    }

    /// The source file, or `None` when the unit was not read from disk
    /// (an empty path, as for units built in memory).
    pub fn file(&self) -> Option<&Path> {
        (!self.path.is_empty()).then(|| Path::new(&self.path))
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

/// Per-unit compilation context.
///
/// # Example
///
/// ```rust
/// use rescript_cmt::config::CmtConfig;
/// use rescript_cmt::context::CompilationContext;
/// use std::sync::Arc;
///
/// let mut ctx = CompilationContext::new(Arc::new(CmtConfig::default()), "src/myModule.res");
/// ctx.add_import("Js", None);
///
/// assert_eq!(ctx.module_name(), "MyModule");
/// assert_eq!(ctx.cmt_path(false).to_str(), Some("src/myModule.cmt"));
/// assert_eq!(ctx.cmt_path(true).to_str(), Some("src/myModule.cmti"));
/// ```
#[derive(Debug)]
pub struct CompilationContext {
    config: Arc<CmtConfig>,
    source: SourceUnit,
    process: ProcessInfo,
    imports: BTreeMap<String, Option<Digest>>,
    unit: UnitInfo,
}

impl CompilationContext {
    /// Create a context for a source file, capturing the current process.
    pub fn new(config: Arc<CmtConfig>, input_file: impl Into<String>) -> Self {
        Self::with_process(config, input_file, ProcessInfo::current(Vec::new()))
    }

    /// Create a context with explicit invocation metadata.
    pub fn with_process(
        config: Arc<CmtConfig>,
        input_file: impl Into<String>,
        process: ProcessInfo,
    ) -> Self {
        Self {
            config,
            source: SourceUnit::new(input_file),
            process,
            imports: BTreeMap::new(),
            unit: UnitInfo::new(),
        }
    }

    /// Get the configuration.
    #[inline]
    pub fn config(&self) -> &CmtConfig {
        &self.config
    }

    /// The unit's source file and derived names.
    #[inline]
    pub fn source(&self) -> &SourceUnit {
        &self.source
    }

    /// Get the invocation metadata.
    #[inline]
    pub fn process(&self) -> &ProcessInfo {
        &self.process
    }

    /// Name the unit is persisted under.
    #[inline]
    pub fn module_name(&self) -> &str {
        &self.source.module_name
    }

    /// Get the unit accumulator.
    #[inline]
    pub fn unit(&self) -> &UnitInfo {
        &self.unit
    }

    /// Get mutable access to the unit accumulator.
    #[inline]
    pub fn unit_mut(&mut self) -> &mut UnitInfo {
        &mut self.unit
    }

    /// Record a partially checked fragment.
    pub fn record_fragment(&mut self, part: BinaryPart) {
        self.unit.record_fragment(part);
    }

    /// Record that `user` depends on `used`.
    pub fn record_value_dependency(&mut self, used: &ValueDescription, user: &ValueDescription) {
        self.unit.record_value_dependency(used, user);
    }

    /// Record that the interface of `name` was consulted.
    ///
    /// A later call with a checksum replaces an earlier one without.
    pub fn add_import(&mut self, name: impl Into<String>, crc: Option<Digest>) {
        let entry = self.imports.entry(name.into()).or_insert(None);
        if crc.is_some() {
            *entry = crc;
        }
    }

    /// Imported units, sorted by name.
    pub fn imports(&self) -> Vec<(String, Option<Digest>)> {
        self.imports
            .iter()
            .map(|(name, crc)| (name.clone(), *crc))
            .collect()
    }

    /// Default annotation file path: `.cmti` for interfaces, `.cmt` otherwise.
    pub fn cmt_path(&self, interface: bool) -> PathBuf {
        let ext = if interface { "cmti" } else { "cmt" };
        PathBuf::from(format!("{}.{ext}", self.source.stem))
    }

    /// Persist this unit to `path`.
    ///
    /// The accumulator is drained whatever the outcome, so the context can be
    /// reused for the next unit.
    pub fn save_cmt(
        &mut self,
        path: &Path,
        annots: BinaryAnnots,
        initial_env: &Env,
        cmi: Option<&CmiInfos>,
        comments: Vec<(String, Location)>,
    ) -> CmtResult<Option<Digest>> {
        let source_file = self.source.file();
        let request = SaveRequest {
            path,
            modname: &self.source.module_name,
            annots,
            source_file,
            initial_env,
            cmi,
            imports: self.imports(),
            comments,
            process: &self.process,
        };
        crate::cmt::save_cmt(&self.config, &mut self.unit, request)
    }

    /// Persist the fragments recorded so far, for a unit whose type checking
    /// stopped early.
    pub fn save_partial_cmt(
        &mut self,
        path: &Path,
        interface: bool,
        initial_env: &Env,
        cmi: Option<&CmiInfos>,
        comments: Vec<(String, Location)>,
    ) -> CmtResult<Option<Digest>> {
        let annots = if interface {
            BinaryAnnots::PartialInterface(Vec::new())
        } else {
            BinaryAnnots::PartialImplementation(Vec::new())
        };
        self.save_cmt(path, annots, initial_env, cmi, comments)
    }
}
