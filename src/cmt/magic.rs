//! File markers distinguishing interface and annotation payloads.
//!
//! Each payload in a file opens with a fixed-length marker. A file holds an
//! interface marker followed by its descriptor, optionally followed by an
//! annotation marker and the annotation record; or only the latter pair.

use std::fmt;
use std::io::{self, Read, Write};

/// Length in bytes of every marker.
pub const MAGIC_LENGTH: usize = 12;

/// Marker opening a compiled-interface descriptor.
pub const CMI_MAGIC_NUMBER: &[u8; MAGIC_LENGTH] = b"Caml1999I022";

/// Marker opening an annotation payload.
pub const CMT_MAGIC_NUMBER: &[u8; MAGIC_LENGTH] = b"Caml1999T022";

/// Payload kinds that can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Compiled-interface descriptor.
    Interface,
    /// Typed tree and build metadata.
    Annotation,
}

impl PayloadKind {
    /// The marker bytes for this kind.
    pub const fn magic(self) -> &'static [u8; MAGIC_LENGTH] {
        match self {
            PayloadKind::Interface => CMI_MAGIC_NUMBER,
            PayloadKind::Annotation => CMT_MAGIC_NUMBER,
        }
    }
}

/// A marker as read from a stream.
#[derive(Clone, PartialEq, Eq)]
pub enum MagicKind {
    /// Compiled-interface descriptor follows.
    Interface,
    /// Annotation payload follows.
    Annotation,
    /// Anything else, kept for diagnostics.
    Unrecognized([u8; MAGIC_LENGTH]),
}

impl MagicKind {
    /// Classify raw marker bytes.
    pub fn classify(bytes: [u8; MAGIC_LENGTH]) -> Self {
        if &bytes == CMI_MAGIC_NUMBER {
            MagicKind::Interface
        } else if &bytes == CMT_MAGIC_NUMBER {
            MagicKind::Annotation
        } else {
            MagicKind::Unrecognized(bytes)
        }
    }
}

impl fmt::Debug for MagicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagicKind::Interface => f.write_str("Interface"),
            MagicKind::Annotation => f.write_str("Annotation"),
            MagicKind::Unrecognized(bytes) => {
                write!(f, "Unrecognized({:?})", String::from_utf8_lossy(bytes))
            }
        }
    }
}

/// Write the marker for `kind`.
pub fn write_magic<W: Write>(writer: &mut W, kind: PayloadKind) -> io::Result<()> {
    writer.write_all(kind.magic())
}

/// Read exactly one marker. A stream shorter than a marker is an I/O error.
pub fn read_magic<R: Read>(reader: &mut R) -> io::Result<MagicKind> {
    let mut bytes = [0u8; MAGIC_LENGTH];
    reader.read_exact(&mut bytes)?;
    Ok(MagicKind::classify(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut buf = Vec::new();
        write_magic(&mut buf, PayloadKind::Interface).unwrap();
        write_magic(&mut buf, PayloadKind::Annotation).unwrap();
        assert_eq!(buf.len(), 2 * MAGIC_LENGTH);

        let mut r = buf.as_slice();
        assert_eq!(read_magic(&mut r).unwrap(), MagicKind::Interface);
        assert_eq!(read_magic(&mut r).unwrap(), MagicKind::Annotation);
    }

    #[test]
    fn test_unrecognized() {
        let kind = read_magic(&mut &b"Caml1999X011"[..]).unwrap();
        assert_eq!(kind, MagicKind::Unrecognized(*b"Caml1999X011"));
    }

    #[test]
    fn test_short_read() {
        let err = read_magic(&mut &b"Caml"[..]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
