//! Frame layer: self-delimiting wire units over a byte stream.
//!
//! Each frame is `[payload length: u32 BE][command id: u16 BE][payload]`,
//! so frame boundaries can be recovered from an arbitrarily fragmented
//! stream without waiting for connection close. A zero-length payload is a
//! valid, fully-specified frame (used for empty-body acknowledgements).

use crate::command::CommandId;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Bytes of header preceding the payload: 4-byte length + 2-byte command id.
pub const HEADER_SIZE: usize = 6;

/// Default cap on a single frame's declared payload length.
pub const DEFAULT_MAX_PAYLOAD: u32 = 64 * 1024;

/// One wire unit: a command identifier plus an opaque payload.
///
/// The payload is opaque at this layer; only the codec registered for the
/// command interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: CommandId,
    pub payload: Bytes,
}

/// Frame-level parse errors.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Not enough buffered data for a complete frame. An expected runtime
    /// condition while a frame trickles in, not a protocol violation.
    #[error("incomplete frame: need more data")]
    Incomplete,

    /// Declared payload length exceeds the configured maximum. Raised before
    /// any payload is buffered, so a hostile peer cannot force an oversized
    /// allocation by declaring one.
    #[error("declared payload of {declared} bytes exceeds the {max} byte limit")]
    TooLarge { declared: u32, max: u32 },
}

impl Frame {
    pub fn new(command: impl Into<CommandId>, payload: Bytes) -> Frame {
        Frame {
            command: command.into(),
            payload,
        }
    }

    /// A frame with a zero-length payload.
    pub fn empty(command: impl Into<CommandId>) -> Frame {
        Frame::new(command, Bytes::new())
    }

    /// Check whether `buf` starts with one complete frame.
    ///
    /// Much cheaper than a full parse; lets the connection avoid allocating
    /// frame structures until the whole frame has arrived. On success the
    /// cursor is left positioned at the end of the frame, so the caller can
    /// read off the consumed length before resetting.
    pub fn check(buf: &mut Cursor<&[u8]>, max_payload: u32) -> Result<(), FrameError> {
        if buf.remaining() < 4 {
            return Err(FrameError::Incomplete);
        }

        let declared = buf.get_u32();
        if declared > max_payload {
            return Err(FrameError::TooLarge {
                declared,
                max: max_payload,
            });
        }

        let rest = 2 + declared as usize;
        if buf.remaining() < rest {
            return Err(FrameError::Incomplete);
        }

        buf.advance(rest);
        Ok(())
    }

    /// Parse one complete frame from `buf`.
    ///
    /// Expects [`Frame::check`] to have succeeded on the same data; still
    /// verifies bounds rather than trusting the caller.
    pub fn parse(buf: &mut Cursor<&[u8]>) -> Result<Frame, FrameError> {
        if buf.remaining() < HEADER_SIZE {
            return Err(FrameError::Incomplete);
        }

        let len = buf.get_u32() as usize;
        let command = CommandId(buf.get_u16());

        if buf.remaining() < len {
            return Err(FrameError::Incomplete);
        }

        let payload = buf.copy_to_bytes(len);
        Ok(Frame { command, payload })
    }

    /// Encode this frame into `buf`. Total: given a valid command id and
    /// payload this always produces a well-formed frame.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_u32(self.payload.len() as u32);
        buf.put_u16(self.command.0);
        buf.put_slice(&self.payload);
    }

    /// Encode this frame into a fresh buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }

    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_incomplete_header() {
        let data = [0x00, 0x00];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor, DEFAULT_MAX_PAYLOAD),
            Err(FrameError::Incomplete)
        ));
    }

    #[test]
    fn check_incomplete_payload() {
        // Declares 4 payload bytes but delivers only 2.
        let data = [0x00, 0x00, 0x00, 0x04, 0x09, 0x61, 0xAA, 0xBB];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            Frame::check(&mut cursor, DEFAULT_MAX_PAYLOAD),
            Err(FrameError::Incomplete)
        ));
    }

    #[test]
    fn check_rejects_oversize_before_payload_arrives() {
        // Only the length prefix has arrived; the declared size alone is
        // enough to reject.
        let data = [0xFF, 0xFF, 0xFF, 0xFF];
        let mut cursor = Cursor::new(&data[..]);
        let result = Frame::check(&mut cursor, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(
            result,
            Err(FrameError::TooLarge {
                declared: 0xFFFF_FFFF,
                max: DEFAULT_MAX_PAYLOAD,
            })
        ));
    }

    #[test]
    fn check_leaves_cursor_at_frame_end() {
        let frame = Frame::new(CommandId(2411), Bytes::from_static(&[0x07]));
        let bytes = frame.to_bytes();
        let mut cursor = Cursor::new(bytes.as_ref());
        Frame::check(&mut cursor, DEFAULT_MAX_PAYLOAD).unwrap();
        assert_eq!(cursor.position() as usize, frame.encoded_len());
    }

    #[test]
    fn encode_parse_round_trip() {
        let frame = Frame::new(CommandId(2401), Bytes::from_static(b"\x01\x02\x03"));
        let bytes = frame.to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE + 3);

        let mut cursor = Cursor::new(bytes.as_ref());
        let parsed = Frame::parse(&mut cursor).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn zero_length_payload_is_a_valid_frame() {
        let frame = Frame::empty(CommandId(2401));
        let bytes = frame.to_bytes();
        assert_eq!(bytes.as_ref(), &[0x00, 0x00, 0x00, 0x00, 0x09, 0x61]);

        let mut cursor = Cursor::new(bytes.as_ref());
        Frame::check(&mut cursor, DEFAULT_MAX_PAYLOAD).unwrap();
        cursor.set_position(0);
        let parsed = Frame::parse(&mut cursor).unwrap();
        assert_eq!(parsed.command, CommandId(2401));
        assert!(parsed.payload.is_empty());
    }

    #[test]
    fn payload_exactly_at_limit_is_accepted() {
        let payload = Bytes::from(vec![0u8; 8]);
        let frame = Frame::new(CommandId(1), payload);
        let bytes = frame.to_bytes();
        let mut cursor = Cursor::new(bytes.as_ref());
        Frame::check(&mut cursor, 8).unwrap();

        let mut cursor = Cursor::new(bytes.as_ref());
        assert!(matches!(
            Frame::check(&mut cursor, 7),
            Err(FrameError::TooLarge { declared: 8, max: 7 })
        ));
    }
}
