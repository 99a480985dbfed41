//! Per-connection serve loop.
//!
//! One logical dispatch pipeline per connection; connections run
//! independently with no cross-connection shared mutable state. Frames are
//! dispatched sequentially, so responses leave in the order their requests
//! arrived.

use crate::connection::Connection;
use crate::dispatch::{DispatchError, Dispatcher, SessionContext};
use crate::frame::FrameError;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, error, warn};

/// One client session: a framed connection plus the shared dispatcher.
pub struct Session<T = TcpStream> {
    connection: Connection<T>,
    dispatcher: Arc<Dispatcher>,
    ctx: SessionContext,
}

impl<T: AsyncRead + AsyncWrite + Unpin> Session<T> {
    pub fn new(
        connection: Connection<T>,
        dispatcher: Arc<Dispatcher>,
        ctx: SessionContext,
    ) -> Session<T> {
        Session {
            connection,
            dispatcher,
            ctx,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Serve frames until the peer disconnects or a connection-fatal error
    /// occurs.
    ///
    /// Per-frame failures never tear the loop down: an unknown command or a
    /// malformed payload drops that frame with a warning and the next frame
    /// proceeds, since an unrecognized command from a slightly-mismatched
    /// client version is expected traffic. A handler failure likewise drops
    /// only its own response. An oversize declared length is the one inbound
    /// condition treated as fatal; it means a broken client or an attack,
    /// and the connection is terminated.
    pub async fn run(&mut self) -> crate::Result<()> {
        loop {
            let frame = match self.connection.read_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug!(session = self.ctx.session_id(), "peer disconnected");
                    return Ok(());
                }
                Err(e) => {
                    if let Some(FrameError::TooLarge { declared, max }) =
                        e.downcast_ref::<FrameError>()
                    {
                        error!(
                            session = self.ctx.session_id(),
                            declared = *declared,
                            max = *max,
                            "oversize frame, closing connection"
                        );
                    }
                    return Err(e);
                }
            };

            let command = frame.command;
            match self.dispatcher.dispatch(frame, &self.ctx).await {
                Ok(Some(response)) => {
                    // The handler may have outlived the session (or closed
                    // it); a response for a dead transport is discarded, not
                    // written.
                    if self.ctx.is_closed() {
                        debug!(
                            session = self.ctx.session_id(),
                            command = %command,
                            "session closed mid-dispatch, discarding response"
                        );
                        return Ok(());
                    }
                    self.connection.write_frame(&response).await?;
                }
                Ok(None) => {}
                Err(e @ DispatchError::UnknownCommand(_))
                | Err(e @ DispatchError::Decode { .. }) => {
                    warn!(
                        session = self.ctx.session_id(),
                        error = %e,
                        "dropped frame"
                    );
                }
                Err(e) => {
                    warn!(
                        session = self.ctx.session_id(),
                        command = %command,
                        error = %e,
                        "no response emitted"
                    );
                }
            }
        }
    }
}
