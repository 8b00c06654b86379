//! Binary annotation persistence.
//!
//! - [`magic`] - Markers identifying each payload in a file
//! - [`cmi`] - Compiled-interface descriptors
//! - [`cmt_file`] - Annotation payloads
//! - [`summarize`] - Reducing environments in a typed tree to summaries
//! - [`unit_info`] - Fragments and dependency edges collected per unit
//! - [`persist`] - Writing and reading whole files
//!
//! # Example
//!
//! ```rust
//! use rescript_cmt::cmt::{self, CmiInfos};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("Foo.cmi");
//!
//! let cmi = CmiInfos {
//!     cmi_name: "Foo".to_string(),
//!     cmi_sign: vec![],
//!     cmi_crcs: vec![],
//!     cmi_flags: vec![],
//! };
//! let mut file = std::fs::File::create(&path).unwrap();
//! let crc = cmt::output_cmi(&mut file, &cmi).unwrap();
//! drop(file);
//!
//! let (read_cmi, read_cmt) = cmt::read(&path).unwrap();
//! assert_eq!(read_cmi.unwrap().own_crc(), Some(crc));
//! assert!(read_cmt.is_none());
//! ```

pub mod cmi;
pub mod cmt_file;
pub mod error;
pub mod magic;
pub mod persist;
pub mod summarize;
pub mod unit_info;

pub use cmi::{CmiInfos, PersFlag, input_cmi, output_cmi, read_cmi};
pub use cmt_file::{BinaryAnnots, BinaryPart, CmtInfos, input_cmt, output_cmt};
pub use error::{CmtError, CmtResult};
pub use magic::{CMI_MAGIC_NUMBER, CMT_MAGIC_NUMBER, MAGIC_LENGTH, MagicKind, PayloadKind};
pub use persist::{
    CommandPostProcess, PostProcess, SaveRequest, read, read_cmt, save_cmt, save_cmt_with,
};
pub use summarize::{summarize_annots, summarize_part, summarize_signature, summarize_structure};
pub use unit_info::{UnitInfo, UnitSnapshot};
