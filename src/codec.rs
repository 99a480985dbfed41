// Payload codec contract - separates wire parsing/encoding from domain values
//
// Every command registers exactly one decoder for its request shape and one
// encoder for its response shape. Codecs are pure transforms over byte
// buffers; they own no state and know nothing about framing or dispatch.

use crate::command::CommandId;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Trait for payload shapes that can be decoded from a frame payload.
///
/// `decode` is the layer's primary safety boundary against malicious or
/// corrupted input: it must accept anything a compliant encoder of the same
/// command could have produced, and reject malformed or truncated payloads
/// with [`CodecError`] rather than reading out of bounds or silently
/// truncating.
pub trait Decodable: Sized {
    /// The command this shape belongs to.
    fn command_id() -> CommandId;

    /// Decode a complete payload buffer into a typed value.
    ///
    /// The whole buffer belongs to this command; trailing bytes after the
    /// last field are an error, not padding.
    fn decode(payload: &[u8]) -> Result<Self, CodecError>;
}

/// Trait for payload shapes that can be encoded into a frame payload.
///
/// `encode` is total: response values are constructed by trusted server-side
/// code, so there is no failure path. An empty shape encodes to a
/// zero-length buffer, which is a valid, explicit encoding.
pub trait Encodable {
    /// The command this shape belongs to.
    fn command_id() -> CommandId;

    /// Encode this value into the buffer.
    fn encode(&self, buf: &mut BytesMut);

    /// Calculate the encoded size without keeping the buffer.
    fn encoded_size(&self) -> usize {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.len()
    }

    /// Encode this value into a fresh payload buffer.
    fn to_payload(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

/// Codec errors with enough context to log a dropped frame usefully.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("truncated payload: field '{field}' needs {needed} more byte(s)")]
    Truncated { field: &'static str, needed: usize },

    #[error("{len} trailing byte(s) after the last field")]
    TrailingBytes { len: usize },

    #[error("field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("UTF-8 error in field '{field}': {source}")]
    Utf8 {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("response value '{response}' does not belong to command {command}")]
    UnexpectedResponse {
        command: CommandId,
        response: &'static str,
    },
}

/// Decode a single byte.
pub fn decode_u8(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Truncated { field, needed: 1 });
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer.
pub fn decode_u16(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Truncated {
            field,
            needed: 2 - buf.remaining(),
        });
    }
    Ok(buf.get_u16())
}

/// Decode a 32-bit big-endian integer.
pub fn decode_u32(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Truncated {
            field,
            needed: 4 - buf.remaining(),
        });
    }
    Ok(buf.get_u32())
}

/// Decode a 64-bit big-endian integer.
pub fn decode_u64(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<u64, CodecError> {
    if buf.remaining() < 8 {
        return Err(CodecError::Truncated {
            field,
            needed: 8 - buf.remaining(),
        });
    }
    Ok(buf.get_u64())
}

/// Decode a length-prefixed UTF-8 string (u16 big-endian length, then bytes).
pub fn decode_string(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<String, CodecError> {
    let len = decode_u16(buf, field)? as usize;
    if buf.remaining() < len {
        return Err(CodecError::Truncated {
            field,
            needed: len - buf.remaining(),
        });
    }
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec()).map_err(|source| CodecError::Utf8 { field, source })
}

/// Fail with [`CodecError::TrailingBytes`] if any input remains.
///
/// Every decoder calls this after its last field so that over-long payloads
/// are rejected instead of silently ignored.
pub fn ensure_empty(buf: &Cursor<&[u8]>) -> Result<(), CodecError> {
    if buf.has_remaining() {
        return Err(CodecError::TrailingBytes {
            len: buf.remaining(),
        });
    }
    Ok(())
}

/// Encode a single byte.
pub fn encode_u8(buf: &mut BytesMut, value: u8) {
    buf.put_u8(value);
}

/// Encode a 16-bit big-endian integer.
pub fn encode_u16(buf: &mut BytesMut, value: u16) {
    buf.put_u16(value);
}

/// Encode a 32-bit big-endian integer.
pub fn encode_u32(buf: &mut BytesMut, value: u32) {
    buf.put_u32(value);
}

/// Encode a 64-bit big-endian integer.
pub fn encode_u64(buf: &mut BytesMut, value: u64) {
    buf.put_u64(value);
}

/// Encode a length-prefixed UTF-8 string (u16 big-endian length, then bytes).
pub fn encode_string(buf: &mut BytesMut, value: &str) {
    debug_assert!(value.len() <= u16::MAX as usize);
    buf.put_u16(value.len() as u16);
    buf.put_slice(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_u8_truncated() {
        let mut cursor = Cursor::new(&[][..]);
        let result = decode_u8(&mut cursor, "kind");
        assert!(matches!(
            result,
            Err(CodecError::Truncated {
                field: "kind",
                needed: 1
            })
        ));
    }

    #[test]
    fn decode_u64_partial() {
        let data = [0u8; 5];
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_u64(&mut cursor, "balance");
        assert!(matches!(
            result,
            Err(CodecError::Truncated {
                field: "balance",
                needed: 3
            })
        ));
    }

    #[test]
    fn string_round_trip() {
        let mut buf = BytesMut::new();
        encode_string(&mut buf, "warrior");

        let frozen = buf.freeze();
        let mut cursor = Cursor::new(frozen.as_ref());
        let decoded = decode_string(&mut cursor, "name").unwrap();
        assert_eq!(decoded, "warrior");
        ensure_empty(&cursor).unwrap();
    }

    #[test]
    fn string_length_prefix_beyond_buffer() {
        // Declares 10 bytes of content but carries only 3.
        let data = [0x00, 0x0A, b'a', b'b', b'c'];
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_string(&mut cursor, "name");
        assert!(matches!(
            result,
            Err(CodecError::Truncated {
                field: "name",
                needed: 7
            })
        ));
    }

    #[test]
    fn string_invalid_utf8() {
        let data = [0x00, 0x02, 0xFF, 0xFE];
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_string(&mut cursor, "name");
        assert!(matches!(result, Err(CodecError::Utf8 { field: "name", .. })));
    }

    #[test]
    fn ensure_empty_rejects_leftovers() {
        let data = [0x01];
        let cursor = Cursor::new(&data[..]);
        let result = ensure_empty(&cursor);
        assert!(matches!(result, Err(CodecError::TrailingBytes { len: 1 })));
    }

    #[test]
    fn integer_round_trips() {
        let mut buf = BytesMut::new();
        encode_u8(&mut buf, 7);
        encode_u16(&mut buf, 2401);
        encode_u32(&mut buf, 0xDEAD_BEEF);
        encode_u64(&mut buf, u64::MAX - 1);

        let frozen = buf.freeze();
        let mut cursor = Cursor::new(frozen.as_ref());
        assert_eq!(decode_u8(&mut cursor, "a").unwrap(), 7);
        assert_eq!(decode_u16(&mut cursor, "b").unwrap(), 2401);
        assert_eq!(decode_u32(&mut cursor, "c").unwrap(), 0xDEAD_BEEF);
        assert_eq!(decode_u64(&mut cursor, "d").unwrap(), u64::MAX - 1);
        ensure_empty(&cursor).unwrap();
    }
}
