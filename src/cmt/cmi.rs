//! Compiled-interface descriptors.
//!
//! A descriptor is three records following the interface marker:
//!
//! 1. `(name, signature)`
//! 2. the checksums of every unit the interface depends on
//! 3. the format flags
//!
//! The unit's own checksum covers the marker and the first record only, so it
//! changes exactly when the exported signature changes.

use super::error::{CmtError, CmtResult};
use super::magic::{self, MagicKind, PayloadKind};
use crate::digest::{Digest, DigestBuilder};
use crate::marshal::{input_value, output_value};
use crate::types::Signature;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Flags stored alongside a compiled interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersFlag {
    /// Compiled with recursive types enabled.
    Rectypes,
    /// Every use of the unit triggers this deprecation message.
    Deprecated(String),
    /// The implementation must not be inspected across the interface.
    Opaque,
    /// Compiled with mutable strings.
    UnsafeString,
}

/// A compiled-interface descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmiInfos {
    /// Unit name.
    pub cmi_name: String,
    /// Exported signature.
    pub cmi_sign: Signature,
    /// Units this interface depends on, with their interface checksums.
    pub cmi_crcs: Vec<(String, Option<Digest>)>,
    /// Format flags.
    pub cmi_flags: Vec<PersFlag>,
}

impl CmiInfos {
    /// The checksum recorded for this unit itself, if any.
    pub fn own_crc(&self) -> Option<Digest> {
        self.cmi_crcs
            .iter()
            .find(|(name, _)| name == &self.cmi_name)
            .and_then(|(_, crc)| *crc)
    }

    /// Deprecation message, if the unit is deprecated.
    pub fn deprecated(&self) -> Option<&str> {
        self.cmi_flags.iter().find_map(|flag| match flag {
            PersFlag::Deprecated(msg) => Some(msg.as_str()),
            _ => None,
        })
    }
}

/// Write a descriptor, marker included. Returns the unit's interface checksum.
///
/// The written dependency list has `(cmi_name, Some(crc))` prepended, so a
/// reader finds the unit's own checksum in `cmi_crcs`.
pub fn output_cmi<W: Write>(writer: &mut W, cmi: &CmiInfos) -> CmtResult<Digest> {
    magic::write_magic(writer, PayloadKind::Interface)?;
    let sign_bytes = output_value(writer, &(&cmi.cmi_name, &cmi.cmi_sign))?;

    let crc = DigestBuilder::new()
        .update(PayloadKind::Interface.magic())
        .update(&sign_bytes)
        .finalize();

    let mut crcs = Vec::with_capacity(cmi.cmi_crcs.len() + 1);
    crcs.push((cmi.cmi_name.clone(), Some(crc)));
    crcs.extend(
        cmi.cmi_crcs
            .iter()
            .filter(|(name, _)| name != &cmi.cmi_name)
            .cloned(),
    );
    output_value(writer, &crcs)?;
    output_value(writer, &cmi.cmi_flags)?;

    log::debug!("wrote interface {} ({})", cmi.cmi_name, crc);
    Ok(crc)
}

/// Read a descriptor whose marker has already been consumed.
pub fn input_cmi<R: Read>(reader: &mut R) -> CmtResult<CmiInfos> {
    let (cmi_name, cmi_sign): (String, Signature) = input_value(reader)?;
    let cmi_crcs = input_value(reader)?;
    let cmi_flags = input_value(reader)?;
    Ok(CmiInfos {
        cmi_name,
        cmi_sign,
        cmi_crcs,
        cmi_flags,
    })
}

/// Read a file that must start with an interface descriptor.
pub fn read_cmi(path: &Path) -> CmtResult<CmiInfos> {
    let mut reader = BufReader::new(File::open(path)?);
    match magic::read_magic(&mut reader)? {
        MagicKind::Interface => input_cmi(&mut reader),
        MagicKind::Annotation | MagicKind::Unrecognized(_) => {
            Err(CmtError::NotAnInterface(path.to_path_buf()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::Ident;
    use crate::location::Location;
    use crate::types::{SignatureItem, TypeDesc, TypeExpr, ValueDescription, ValueKind};

    fn sample(name: &str) -> CmiInfos {
        let x = SignatureItem::SigValue(
            Ident::create_persistent("x"),
            ValueDescription {
                val_type: TypeExpr::generic(TypeDesc::Tvar(None), 1),
                val_kind: ValueKind::ValReg,
                val_loc: Location::none(),
                val_attributes: vec![],
            },
        );
        CmiInfos {
            cmi_name: name.to_string(),
            cmi_sign: vec![x],
            cmi_crcs: vec![("Js".to_string(), Some(Digest::bytes(b"Js")))],
            cmi_flags: vec![PersFlag::Deprecated("use Bar".into())],
        }
    }

    #[test]
    fn test_output_then_input() {
        let cmi = sample("Foo");
        let mut buf = Vec::new();
        let crc = output_cmi(&mut buf, &cmi).unwrap();

        let mut r = buf.as_slice();
        assert_eq!(magic::read_magic(&mut r).unwrap(), MagicKind::Interface);
        let read = input_cmi(&mut r).unwrap();

        assert_eq!(read.cmi_name, "Foo");
        assert_eq!(read.cmi_sign, cmi.cmi_sign);
        assert_eq!(read.cmi_crcs[0], ("Foo".to_string(), Some(crc)));
        assert_eq!(&read.cmi_crcs[1..], &cmi.cmi_crcs[..]);
        assert_eq!(read.own_crc(), Some(crc));
        assert_eq!(read.deprecated(), Some("use Bar"));
    }

    #[test]
    fn test_crc_depends_on_signature_only() {
        let a = sample("Foo");
        let mut b = sample("Foo");
        b.cmi_crcs.clear();
        b.cmi_flags.push(PersFlag::Opaque);

        let crc_a = output_cmi(&mut Vec::new(), &a).unwrap();
        let crc_b = output_cmi(&mut Vec::new(), &b).unwrap();
        assert_eq!(crc_a, crc_b);

        let mut c = sample("Foo");
        c.cmi_sign.clear();
        assert_ne!(crc_a, output_cmi(&mut Vec::new(), &c).unwrap());
    }

    #[test]
    fn test_rewrite_does_not_duplicate_own_crc() {
        let mut buf = Vec::new();
        output_cmi(&mut buf, &sample("Foo")).unwrap();
        let mut r = &buf[magic::MAGIC_LENGTH..];
        let first = input_cmi(&mut r).unwrap();

        let mut buf = Vec::new();
        output_cmi(&mut buf, &first).unwrap();
        let mut r = &buf[magic::MAGIC_LENGTH..];
        let second = input_cmi(&mut r).unwrap();
        assert_eq!(second.cmi_crcs, first.cmi_crcs);
    }

    #[test]
    fn test_read_cmi_rejects_foreign_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not an interface at all").unwrap();
        assert!(matches!(
            read_cmi(file.path()),
            Err(CmtError::NotAnInterface(_))
        ));
    }
}
