//! Length-prefixed record framing.
//!
//! Every record written to a cmi/cmt file is a single serde value framed as:
//!
//! 1. Magic number (4 bytes): 0x8495A6BE
//! 2. Payload length (4 bytes, big endian)
//! 3. Payload: the value encoded with bincode
//!
//! Records are self-delimiting, so several of them can follow each other in
//! one stream and be read back in order.
//!
//! # Example
//!
//! ```rust
//! use rescript_cmt::marshal::{input_value, output_value};
//!
//! let mut buf = Vec::new();
//! output_value(&mut buf, &("Foo".to_string(), 42u32)).unwrap();
//!
//! let (name, n): (String, u32) = input_value(&mut buf.as_slice()).unwrap();
//! assert_eq!((name.as_str(), n), ("Foo", 42));
//! ```

use crate::cmt::error::{CmtError, CmtResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{self, Read, Write};

/// Magic number opening every record.
pub const RECORD_MAGIC: u32 = 0x8495A6BE;

/// Size of the record header: magic plus payload length.
pub const HEADER_SIZE: usize = 8;

/// Encode a value into a complete framed record.
pub fn to_record_bytes<T: Serialize + ?Sized>(value: &T) -> CmtResult<Vec<u8>> {
    let payload = bincode::serialize(value).map_err(|e| CmtError::Malformed(e.to_string()))?;
    let len = u32::try_from(payload.len()).map_err(|_| {
        CmtError::Malformed(format!("record of {} bytes is too large", payload.len()))
    })?;

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&RECORD_MAGIC.to_be_bytes());
    result.extend_from_slice(&len.to_be_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Write one framed record. Returns the bytes that were written.
pub fn output_value<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> CmtResult<Vec<u8>> {
    let bytes = to_record_bytes(value)?;
    writer.write_all(&bytes)?;
    Ok(bytes)
}

/// Read one framed record.
///
/// A stream that ends inside the header or the payload fails with an
/// `UnexpectedEof` I/O error; a bad magic number or undecodable payload fails
/// with [`CmtError::Malformed`].
pub fn input_value<R: Read, T: DeserializeOwned>(reader: &mut R) -> CmtResult<T> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let magic = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
    if magic != RECORD_MAGIC {
        return Err(CmtError::Malformed(format!(
            "bad record magic 0x{magic:08X}"
        )));
    }
    let len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]) as u64;

    // Read through `take` so a corrupt length cannot force a huge allocation.
    let mut payload = Vec::new();
    reader.take(len).read_to_end(&mut payload)?;
    if (payload.len() as u64) < len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("record truncated: expected {len} bytes, got {}", payload.len()),
        )
        .into());
    }

    bincode::deserialize(&payload).map_err(|e| CmtError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let bytes = to_record_bytes(&7u8).unwrap();
        assert_eq!(&bytes[0..4], &[0x84, 0x95, 0xA6, 0xBE]);
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(bytes[8], 7);
    }

    #[test]
    fn test_consecutive_records() {
        let mut buf = Vec::new();
        output_value(&mut buf, "first").unwrap();
        output_value(&mut buf, &vec![1i32, 2, 3]).unwrap();

        let mut r = buf.as_slice();
        let a: String = input_value(&mut r).unwrap();
        let b: Vec<i32> = input_value(&mut r).unwrap();
        assert_eq!(a, "first");
        assert_eq!(b, vec![1, 2, 3]);
        assert!(r.is_empty());
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = to_record_bytes(&"a longer string".to_string()).unwrap();
        let cut = &bytes[..bytes.len() - 3];
        let err = input_value::<_, String>(&mut &cut[..]).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_truncated_header() {
        let err = input_value::<_, u8>(&mut &[0x84, 0x95][..]).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = to_record_bytes(&1u32).unwrap();
        bytes[0] = 0;
        let err = input_value::<_, u32>(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, CmtError::Malformed(_)));
    }

    #[test]
    fn test_wrong_payload_type() {
        let bytes = to_record_bytes(&1u8).unwrap();
        let err = input_value::<_, String>(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, CmtError::Malformed(_)));
    }
}
