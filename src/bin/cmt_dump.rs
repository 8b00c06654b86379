//! Inspect compiled interface and annotation files.
//!
//! Usage:
//!   cmt_dump [options] <file>
//!
//! Options:
//!   --json     Print the summary as JSON
//!   -v / -q    Raise or lower the log level

use anyhow::{Context, Result, bail};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use rescript_cmt::cmt::{self, CmiInfos, CmtInfos};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Print what a .cmi, .cmt or .cmti file contains.
#[derive(Parser, Debug)]
#[command(name = "cmt_dump")]
#[command(about = "Inspect ReScript .cmi/.cmt/.cmti files")]
struct Args {
    /// File to inspect
    file: PathBuf,

    /// Print a JSON summary instead of text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Serialize, Debug)]
struct InterfaceSummary<'a> {
    name: &'a str,
    crc: Option<String>,
    items: usize,
    imports: Vec<(&'a str, Option<String>)>,
    deprecated: Option<&'a str>,
}

#[derive(Serialize, Debug)]
struct AnnotationSummary<'a> {
    modname: &'a str,
    kind: &'static str,
    sourcefile: Option<&'a str>,
    source_digest: Option<String>,
    interface_digest: Option<String>,
    builddir: &'a str,
    args: &'a [String],
    imports: Vec<(&'a str, Option<String>)>,
    value_dependencies: usize,
    comments: usize,
    use_summaries: bool,
}

#[derive(Serialize, Debug)]
struct Summary<'a> {
    interface: Option<InterfaceSummary<'a>>,
    annotations: Option<AnnotationSummary<'a>>,
}

fn crcs(list: &[(String, Option<rescript_cmt::Digest>)]) -> Vec<(&str, Option<String>)> {
    list.iter()
        .map(|(name, crc)| (name.as_str(), crc.map(|d| d.to_hex())))
        .collect()
}

fn summarize<'a>(cmi: Option<&'a CmiInfos>, cmt: Option<&'a CmtInfos>) -> Summary<'a> {
    Summary {
        interface: cmi.map(|cmi| InterfaceSummary {
            name: &cmi.cmi_name,
            crc: cmi.own_crc().map(|d| d.to_hex()),
            items: cmi.cmi_sign.len(),
            imports: crcs(&cmi.cmi_crcs),
            deprecated: cmi.deprecated(),
        }),
        annotations: cmt.map(|cmt| AnnotationSummary {
            modname: &cmt.cmt_modname,
            kind: cmt.cmt_annots.kind(),
            sourcefile: cmt.cmt_sourcefile.as_deref(),
            source_digest: cmt.cmt_source_digest.map(|d| d.to_hex()),
            interface_digest: cmt.cmt_interface_digest.map(|d| d.to_hex()),
            builddir: &cmt.cmt_builddir,
            args: &cmt.cmt_args,
            imports: crcs(&cmt.cmt_imports),
            value_dependencies: cmt.cmt_value_dependencies.len(),
            comments: cmt.cmt_comments.len(),
            use_summaries: cmt.cmt_use_summaries,
        }),
    }
}

fn print_text(out: &mut impl Write, summary: &Summary<'_>) -> std::io::Result<()> {
    if let Some(cmi) = &summary.interface {
        writeln!(out, "interface {}", cmi.name)?;
        writeln!(out, "  crc: {}", cmi.crc.as_deref().unwrap_or("-"))?;
        writeln!(out, "  items: {}", cmi.items)?;
        if let Some(msg) = cmi.deprecated {
            writeln!(out, "  deprecated: {msg}")?;
        }
        for (name, crc) in &cmi.imports {
            writeln!(out, "  import {name} {}", crc.as_deref().unwrap_or("-"))?;
        }
    }
    if let Some(cmt) = &summary.annotations {
        writeln!(out, "annotations {} ({})", cmt.modname, cmt.kind)?;
        writeln!(out, "  source: {}", cmt.sourcefile.unwrap_or("-"))?;
        writeln!(out, "  build dir: {}", cmt.builddir)?;
        writeln!(
            out,
            "  interface crc: {}",
            cmt.interface_digest.as_deref().unwrap_or("-")
        )?;
        writeln!(out, "  value dependencies: {}", cmt.value_dependencies)?;
        writeln!(out, "  comments: {}", cmt.comments)?;
        writeln!(out, "  summarized envs: {}", cmt.use_summaries)?;
        for (name, crc) in &cmt.imports {
            writeln!(out, "  import {name} {}", crc.as_deref().unwrap_or("-"))?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .filter_level(args.verbose.log_level_filter())
        .init();

    let (cmi, cmt) =
        cmt::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?;
    if cmi.is_none() && cmt.is_none() {
        bail!("{} holds no readable payload", args.file.display());
    }
    log::debug!(
        "{}: interface={} annotations={}",
        args.file.display(),
        cmi.is_some(),
        cmt.is_some()
    );

    let summary = summarize(cmi.as_ref(), cmt.as_ref());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &summary).context("writing JSON")?;
        writeln!(out)?;
    } else {
        print_text(&mut out, &summary)?;
    }
    Ok(())
}
