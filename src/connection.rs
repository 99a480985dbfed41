// ABOUTME: Frame-based I/O over a byte-stream transport for the game protocol
// ABOUTME: Buffers partial frames across reads and write-buffers outbound frames

use crate::frame::{DEFAULT_MAX_PAYLOAD, Frame, FrameError};
use bytes::{Buf, BytesMut};
use std::io::{self, Cursor};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

/// Frame-based connection over an ordered byte stream.
///
/// Converts between the transport's byte stream and discrete [`Frame`]s in
/// both directions. The transport guarantees ordering but not message
/// boundaries; this type assumes nothing about how reads fragment frames.
///
/// Each connection exclusively owns its read buffer: it is never touched by
/// more than one execution context at a time, so no synchronization is
/// needed across connections.
///
/// Generic over the transport so tests can run against in-memory streams;
/// production code uses the [`TcpStream`] default.
#[derive(Debug)]
pub struct Connection<T = TcpStream> {
    // Write-level buffering; one flush per outbound frame rather than one
    // syscall per field.
    stream: BufWriter<T>,

    // Accumulates inbound bytes until a complete frame is present.
    buffer: BytesMut,

    max_payload: u32,
}

impl<T: AsyncRead + AsyncWrite + Unpin> Connection<T> {
    /// Create a connection with the default payload cap.
    pub fn new(stream: T) -> Connection<T> {
        Connection::with_max_payload(stream, DEFAULT_MAX_PAYLOAD)
    }

    /// Create a connection with an explicit cap on declared payload length.
    pub fn with_max_payload(stream: T, max_payload: u32) -> Connection<T> {
        Connection {
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(4 * 1024),
            max_payload,
        }
    }

    /// Read a single frame from the underlying stream.
    ///
    /// Waits until enough data has arrived to parse a complete frame,
    /// buffering partial frames across any number of reads. Data beyond the
    /// frame stays buffered for the next call.
    ///
    /// Returns `Ok(None)` on a clean shutdown (EOF on a frame boundary).
    /// EOF in the middle of a frame, or an oversize declared length
    /// ([`FrameError::TooLarge`]), is an error; the caller should drop the
    /// connection.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` from `read_buf` means the peer closed the stream.
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err("connection reset by peer".into())
                };
            }
        }
    }

    /// Try to parse one frame out of the read buffer.
    ///
    /// `Ok(None)` means not enough data yet. The completeness probe runs
    /// before any frame structures are allocated, and it rejects oversize
    /// declared lengths before the payload is ever buffered.
    fn parse_frame(&mut self) -> crate::Result<Option<Frame>> {
        let mut buf = Cursor::new(&self.buffer[..]);

        match Frame::check(&mut buf, self.max_payload) {
            Ok(()) => {
                // check left the cursor at the end of the frame.
                let len = buf.position() as usize;
                buf.set_position(0);

                let frame = Frame::parse(&mut buf)?;

                // Drop the consumed bytes; anything after them belongs to
                // the next frame.
                self.buffer.advance(len);

                Ok(Some(frame))
            }
            Err(FrameError::Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a single frame to the underlying stream and flush it.
    pub async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let mut buf = BytesMut::with_capacity(frame.encoded_len());
        frame.encode(&mut buf);
        self.stream.write_all(&buf).await?;
        self.stream.flush().await
    }
}
