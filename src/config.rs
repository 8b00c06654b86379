//! Configuration for writing annotation files.
//!
//! A [`CmtConfig`] is immutable after construction and can be shared across
//! threads compiling different units.
//!
//! # Example
//!
//! ```rust
//! use rescript_cmt::config::CmtConfig;
//!
//! let config = CmtConfig::builder()
//!     .keep_full_envs(true)
//!     .post_process_cmd(Some("rescript-editor-analysis".to_string()))
//!     .build();
//!
//! assert!(config.binary_annotations);
//! assert!(config.keep_full_envs);
//! ```

use serde::{Deserialize, Serialize};
use std::ffi::OsString;

/// Presence of this variable keeps full environments in annotation files.
pub const WITHENV_VAR: &str = "OCAML_BINANNOT_WITHENV";

/// Command run on every written annotation file.
pub const POST_PROCESS_VAR: &str = "BS_CMT_POST_PROCESS_CMD";

/// Settings that control whether and how annotation files are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmtConfig {
    /// Write annotation files at all.
    pub binary_annotations: bool,
    /// The driver is only printing inferred types; nothing is persisted.
    pub print_types: bool,
    /// Store environments in full instead of reducing them to summaries.
    pub keep_full_envs: bool,
    /// Shell command run as `<cmd> -cmt-add <cmt>[:<source>]` after writing.
    pub post_process_cmd: Option<String>,
}

impl Default for CmtConfig {
    fn default() -> Self {
        Self {
            binary_annotations: true,
            print_types: false,
            keep_full_envs: false,
            post_process_cmd: None,
        }
    }
}

impl CmtConfig {
    /// Create a new builder for `CmtConfig`.
    pub fn builder() -> CmtConfigBuilder {
        CmtConfigBuilder::default()
    }

    /// Read the environment-driven settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var_os(name))
    }

    /// Read the environment-driven settings through `lookup`.
    ///
    /// Full environments are kept whenever the variable is set, whatever its
    /// value; an empty string counts as set. An empty post-process command is
    /// treated as absent.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let post_process_cmd = lookup(POST_PROCESS_VAR)
            .map(|cmd| cmd.to_string_lossy().into_owned())
            .filter(|cmd| !cmd.trim().is_empty());

        Self {
            keep_full_envs: lookup(WITHENV_VAR).is_some(),
            post_process_cmd,
            ..Self::default()
        }
    }

    /// Whether a call to save an annotation file should write anything.
    pub fn writes_annotations(&self) -> bool {
        self.binary_annotations && !self.print_types
    }
}

/// Builder for `CmtConfig`.
#[derive(Debug, Default)]
pub struct CmtConfigBuilder {
    config: CmtConfig,
}

impl CmtConfigBuilder {
    /// Start from an existing configuration, e.g. one read with `from_env`.
    pub fn from_config(config: CmtConfig) -> Self {
        Self { config }
    }

    /// Set whether annotation files are written.
    pub fn binary_annotations(mut self, value: bool) -> Self {
        self.config.binary_annotations = value;
        self
    }

    /// Set print-types mode.
    pub fn print_types(mut self, value: bool) -> Self {
        self.config.print_types = value;
        self
    }

    /// Set whether full environments are kept.
    pub fn keep_full_envs(mut self, value: bool) -> Self {
        self.config.keep_full_envs = value;
        self
    }

    /// Set the post-process command.
    pub fn post_process_cmd(mut self, value: Option<String>) -> Self {
        self.config.post_process_cmd = value;
        self
    }

    /// Finish building.
    pub fn build(self) -> CmtConfig {
        self.config
    }
}

// ============================================================================
// Process Metadata
// ============================================================================

/// Facts about the compiler invocation recorded in annotation files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessInfo {
    /// Full argument vector, program name first.
    pub args: Vec<String>,
    /// Working directory of the compiler.
    pub build_dir: String,
    /// Directories searched for compiled interfaces.
    pub load_path: Vec<String>,
}

impl ProcessInfo {
    /// Capture the running process's arguments and working directory.
    pub fn current(load_path: Vec<String>) -> Self {
        let build_dir = std::env::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            args: std::env::args().collect(),
            build_dir,
            load_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CmtConfig::default();
        assert!(config.binary_annotations);
        assert!(!config.keep_full_envs);
        assert!(config.writes_annotations());
    }

    #[test]
    fn test_builder() {
        let config = CmtConfig::builder()
            .print_types(true)
            .post_process_cmd(Some("tool".into()))
            .build();
        assert!(!config.writes_annotations());
        assert_eq!(config.post_process_cmd.as_deref(), Some("tool"));
    }

    #[test]
    fn test_withenv_presence_not_value() {
        assert!(!CmtConfig::from_vars(lookup(&[])).keep_full_envs);
        assert!(CmtConfig::from_vars(lookup(&[(WITHENV_VAR, "")])).keep_full_envs);
        assert!(CmtConfig::from_vars(lookup(&[(WITHENV_VAR, "0")])).keep_full_envs);
    }

    #[test]
    fn test_post_process_var() {
        let config = CmtConfig::from_vars(lookup(&[(POST_PROCESS_VAR, "analyzer")]));
        assert_eq!(config.post_process_cmd.as_deref(), Some("analyzer"));

        let config = CmtConfig::from_vars(lookup(&[(POST_PROCESS_VAR, "  ")]));
        assert_eq!(config.post_process_cmd, None);
    }

    #[test]
    fn test_builder_from_config() {
        let base = CmtConfig::from_vars(lookup(&[(WITHENV_VAR, "1")]));
        let config = CmtConfigBuilder::from_config(base).print_types(true).build();
        assert!(config.keep_full_envs);
        assert!(config.print_types);
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CmtConfig>();
        assert_send_sync::<ProcessInfo>();
    }
}
