//! Writing and reading complete interface/annotation files.
//!
//! # File layout
//!
//! ```text
//! [interface marker][descriptor]                                  .cmi
//! [interface marker][descriptor][annotation marker][annotations]  .cmi + .cmt
//! [annotation marker][annotations]                                .cmt / .cmti
//! ```
//!
//! Readers accept all three. A trailing annotation payload that is missing
//! or unreadable is reported as absent rather than as an error.

use super::cmi::{CmiInfos, input_cmi, output_cmi};
use super::cmt_file::{BinaryAnnots, BinaryPart, CmtInfos, input_cmt, output_cmt};
use super::error::{CmtError, CmtResult};
use super::magic::{self, MagicKind};
use super::summarize::{summarize_annots, summarize_env};
use super::unit_info::UnitInfo;
use crate::config::{CmtConfig, ProcessInfo};
use crate::digest::Digest;
use crate::location::Location;
use crate::types::Env;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::process::Command;

// ============================================================================
// Post-processing
// ============================================================================

/// A hook run on every annotation file after it is written.
///
/// Failures are logged and never abort the compilation.
pub trait PostProcess {
    /// Process the file at `cmt_path`, compiled from `source_path`.
    fn run(&self, cmt_path: &Path, source_path: Option<&Path>) -> io::Result<()>;
}

impl<F> PostProcess for F
where
    F: Fn(&Path, Option<&Path>) -> io::Result<()>,
{
    fn run(&self, cmt_path: &Path, source_path: Option<&Path>) -> io::Result<()> {
        self(cmt_path, source_path)
    }
}

/// Runs `<cmd> -cmt-add <cmt_path>[:<source_path>]` through the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPostProcess {
    command: String,
}

impl CommandPostProcess {
    /// Wrap a command template.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The full shell command line for one file.
    pub fn command_line(&self, cmt_path: &Path, source_path: Option<&Path>) -> String {
        match source_path {
            Some(source) => format!(
                "{} -cmt-add {}:{}",
                self.command,
                cmt_path.display(),
                source.display()
            ),
            None => format!("{} -cmt-add {}", self.command, cmt_path.display()),
        }
    }
}

impl PostProcess for CommandPostProcess {
    fn run(&self, cmt_path: &Path, source_path: Option<&Path>) -> io::Result<()> {
        let line = self.command_line(cmt_path, source_path);
        log::debug!("running post-process command: {line}");

        let status = shell(&line).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!("`{line}` exited with {status}")))
        }
    }
}

#[cfg(windows)]
fn shell(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

#[cfg(not(windows))]
fn shell(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

// ============================================================================
// Saving
// ============================================================================

/// Everything the type checker hands over when a unit is persisted.
#[derive(Debug)]
pub struct SaveRequest<'a> {
    /// Output file.
    pub path: &'a Path,
    /// Unit name.
    pub modname: &'a str,
    /// The typed tree.
    pub annots: BinaryAnnots,
    /// Source file the unit was compiled from.
    pub source_file: Option<&'a Path>,
    /// Environment the unit was checked in.
    pub initial_env: &'a Env,
    /// The unit's interface, when this file also carries it.
    pub cmi: Option<&'a CmiInfos>,
    /// Imported units and their interface checksums, in any order.
    pub imports: Vec<(String, Option<Digest>)>,
    /// Comments collected by the lexer, in source order.
    pub comments: Vec<(String, Location)>,
    /// Invocation metadata.
    pub process: &'a ProcessInfo,
}

/// Persist a unit using the post-process command from `config`, if any.
///
/// Returns the interface checksum when an interface was written. Nothing is
/// written when annotations are disabled or the driver is printing types.
/// The accumulator is empty when this returns, whatever the outcome.
pub fn save_cmt(
    config: &CmtConfig,
    unit: &mut UnitInfo,
    request: SaveRequest<'_>,
) -> CmtResult<Option<Digest>> {
    match &config.post_process_cmd {
        Some(cmd) => save_cmt_with(config, unit, request, Some(&CommandPostProcess::new(cmd))),
        None => save_cmt_with(config, unit, request, None),
    }
}

/// Persist a unit with an explicit post-processor.
pub fn save_cmt_with(
    config: &CmtConfig,
    unit: &mut UnitInfo,
    request: SaveRequest<'_>,
    post: Option<&dyn PostProcess>,
) -> CmtResult<Option<Digest>> {
    let result = write_unit(config, unit, request, post);
    unit.reset();
    result
}

fn write_unit(
    config: &CmtConfig,
    unit: &mut UnitInfo,
    request: SaveRequest<'_>,
    post: Option<&dyn PostProcess>,
) -> CmtResult<Option<Digest>> {
    if !config.writes_annotations() {
        log::debug!("annotations disabled, not writing {}", request.path.display());
        return Ok(None);
    }

    let SaveRequest {
        path,
        modname,
        annots,
        source_file,
        initial_env,
        cmi,
        mut imports,
        comments,
        process,
    } = request;

    let collected = unit.take();
    let annots = with_recorded_fragments(annots, collected.fragments);

    let use_summaries = !config.keep_full_envs;
    let (annots, initial_env) = if use_summaries {
        (summarize_annots(annots), summarize_env(initial_env))
    } else {
        (annots, initial_env.clone())
    };

    let cmt_source_digest = source_file.and_then(|source| match Digest::file(source) {
        Ok(digest) => Some(digest),
        Err(e) => {
            log::debug!("cannot digest {}: {e}", source.display());
            None
        }
    });
    imports.sort_by(|a, b| a.0.cmp(&b.0));

    let crc = write_file(path, |writer| {
        let crc = match cmi {
            Some(cmi) => Some(output_cmi(writer, cmi)?),
            None => None,
        };
        let cmt = CmtInfos {
            cmt_modname: modname.to_string(),
            cmt_annots: annots,
            cmt_value_dependencies: collected.value_deps,
            cmt_comments: comments,
            cmt_args: process.args.clone(),
            cmt_sourcefile: source_file.map(|p| p.to_string_lossy().into_owned()),
            cmt_builddir: process.build_dir.clone(),
            cmt_loadpath: process.load_path.clone(),
            cmt_source_digest,
            cmt_initial_env: initial_env,
            cmt_imports: imports,
            cmt_interface_digest: crc,
            cmt_use_summaries: use_summaries,
        };
        output_cmt(writer, &cmt)?;
        Ok(crc)
    })?;

    if let Some(post) = post {
        if let Err(e) = post.run(path, source_file) {
            log::warn!("post-processing {} failed: {e}", path.display());
        }
    }

    Ok(crc)
}

/// A partial payload handed over empty is filled with the fragments the
/// type checker recorded, in recording order.
fn with_recorded_fragments(annots: BinaryAnnots, fragments: Vec<BinaryPart>) -> BinaryAnnots {
    match annots {
        BinaryAnnots::PartialImplementation(parts) if parts.is_empty() => {
            BinaryAnnots::PartialImplementation(fragments)
        }
        BinaryAnnots::PartialInterface(parts) if parts.is_empty() => {
            BinaryAnnots::PartialInterface(fragments)
        }
        annots => {
            if !fragments.is_empty() {
                log::debug!(
                    "dropping {} recorded fragments, payload is {}",
                    fragments.len(),
                    annots.kind()
                );
            }
            annots
        }
    }
}

/// Write `path` through a buffered handle. On failure the partial file is
/// removed; the handle is closed on every path.
fn write_file<T>(
    path: &Path,
    write: impl FnOnce(&mut BufWriter<File>) -> CmtResult<T>,
) -> CmtResult<T> {
    let mut writer = BufWriter::new(File::create(path)?);
    let result = write(&mut writer).and_then(|value| {
        writer.flush()?;
        Ok(value)
    });
    drop(writer);

    if result.is_err() {
        if let Err(e) = fs::remove_file(path) {
            log::debug!("cannot remove partial {}: {e}", path.display());
        }
    }
    result
}

// ============================================================================
// Reading
// ============================================================================

/// Read a file holding an interface, annotations, or both.
pub fn read(path: &Path) -> CmtResult<(Option<CmiInfos>, Option<CmtInfos>)> {
    let mut reader = BufReader::new(File::open(path)?);
    match magic::read_magic(&mut reader)? {
        MagicKind::Interface => {
            let cmi = input_cmi(&mut reader)?;
            let cmt = read_trailing_cmt(&mut reader, path);
            Ok((Some(cmi), cmt))
        }
        MagicKind::Annotation => Ok((None, Some(input_cmt(&mut reader)?))),
        MagicKind::Unrecognized(bytes) => {
            log::debug!(
                "{}: unrecognized marker {:?}",
                path.display(),
                String::from_utf8_lossy(&bytes)
            );
            Err(CmtError::NotAnInterface(path.to_path_buf()))
        }
    }
}

fn read_trailing_cmt<R: Read>(reader: &mut R, path: &Path) -> Option<CmtInfos> {
    match magic::read_magic(reader) {
        Ok(MagicKind::Annotation) => match input_cmt(reader) {
            Ok(cmt) => Some(cmt),
            Err(e) => {
                log::debug!("{}: ignoring unreadable annotations: {e}", path.display());
                None
            }
        },
        Ok(kind) => {
            log::debug!("{}: unexpected trailing marker {kind:?}", path.display());
            None
        }
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(e) => {
            log::debug!("{}: cannot read trailing marker: {e}", path.display());
            None
        }
    }
}

/// Read a file that must carry annotations.
pub fn read_cmt(path: &Path) -> CmtResult<CmtInfos> {
    match read(path)? {
        (_, Some(cmt)) => Ok(cmt),
        (_, None) => Err(CmtError::NotATypedTree(path.to_path_buf())),
    }
}
