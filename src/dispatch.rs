//! Dispatcher: routes decoded frames to handlers and handler results back
//! toward the wire.
//!
//! Per inbound frame the pipeline is lookup, decode, handle, encode. The
//! dispatcher owns no packet data beyond the single in-flight frame and
//! mutates no shared state beyond invoking the handler; it is immutable
//! after construction and shared across connections behind an `Arc`.

use crate::codec::CodecError;
use crate::command::CommandId;
use crate::frame::Frame;
use crate::packets::{Request, Response};
use crate::registry::{CommandRegistry, RegistryError};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Opaque failure reported by a handler. The business meaning is outside
/// this layer's scope; the dispatcher only distinguishes "handler failed, no
/// response frame" from protocol-level decode failures.
pub type HandlerError = crate::Error;

type HandlerFuture = Pin<Box<dyn Future<Output = Result<Option<Response>, HandlerError>> + Send>>;
type HandlerFn = Box<dyn Fn(Request, SessionContext) -> HandlerFuture + Send + Sync>;

/// Ambient per-connection context handed to every handler invocation.
///
/// Cheaply cloneable; all clones share one underlying record. Session
/// identity and lifecycle live outside this layer, so the context carries
/// only what handlers need: who is on the other end and whether the
/// connection is still worth answering.
#[derive(Debug, Clone)]
pub struct SessionContext {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    session_id: u64,
    peer_addr: Option<SocketAddr>,
    player_id: Mutex<Option<u64>>,
    closed: AtomicBool,
}

impl SessionContext {
    pub fn new(session_id: u64, peer_addr: Option<SocketAddr>) -> SessionContext {
        SessionContext {
            inner: Arc::new(ContextInner {
                session_id,
                peer_addr,
                player_id: Mutex::new(None),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn session_id(&self) -> u64 {
        self.inner.session_id
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.inner.peer_addr
    }

    /// The player bound to this session, once authentication (an external
    /// collaborator) has established one.
    pub fn player_id(&self) -> Option<u64> {
        *self.inner.player_id.lock().unwrap()
    }

    pub fn bind_player(&self, player_id: u64) {
        *self.inner.player_id.lock().unwrap() = Some(player_id);
    }

    /// Mark the session closed. In-flight handler work may still complete,
    /// but its response will be discarded instead of written to a dead
    /// transport.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

/// Failure exits of the dispatch pipeline.
///
/// `UnknownCommand` and `Decode` are non-fatal per-frame conditions: the
/// frame is dropped, the connection survives. `Handler` means the command
/// was understood but the business logic refused it; no response frame is
/// emitted. `Encode` indicates a handler returned a response variant that
/// does not belong to the command, a programming error.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown command {0}")]
    UnknownCommand(CommandId),

    #[error("failed to decode {command} payload: {source}")]
    Decode {
        command: CommandId,
        #[source]
        source: CodecError,
    },

    #[error("handler for {command} failed: {reason}")]
    Handler {
        command: CommandId,
        reason: HandlerError,
    },

    #[error("failed to encode {command} response: {source}")]
    Encode {
        command: CommandId,
        #[source]
        source: CodecError,
    },
}

/// Routes frames to handlers by command identifier.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    handlers: HashMap<CommandId, HandlerFn>,
}

impl Dispatcher {
    pub fn builder(registry: Arc<CommandRegistry>) -> DispatcherBuilder {
        DispatcherBuilder {
            registry,
            handlers: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatch one inbound frame: look up the codec pair, decode the
    /// payload, invoke the handler, encode the response.
    ///
    /// `Ok(Some(frame))` carries the outbound response under the same
    /// command identifier as the request. `Ok(None)` is the fire-and-forget
    /// case: handled, nothing to send. A frame whose command has a codec but
    /// no handler reports [`DispatchError::UnknownCommand`], same as one the
    /// registry has never heard of.
    pub async fn dispatch(
        &self,
        frame: Frame,
        ctx: &SessionContext,
    ) -> Result<Option<Frame>, DispatchError> {
        let command = frame.command;

        let entry = self
            .registry
            .lookup(command)
            .map_err(|_| DispatchError::UnknownCommand(command))?;
        let handler = self
            .handlers
            .get(&command)
            .ok_or(DispatchError::UnknownCommand(command))?;

        let request = entry
            .decode(&frame.payload)
            .map_err(|source| DispatchError::Decode { command, source })?;

        debug!(session = ctx.session_id(), command = %command, "dispatching");

        let response = handler(request, ctx.clone())
            .await
            .map_err(|reason| DispatchError::Handler { command, reason })?;

        match response {
            Some(response) => {
                let payload = entry
                    .encode(&response)
                    .map_err(|source| DispatchError::Encode { command, source })?;
                Ok(Some(Frame::new(command, payload)))
            }
            None => Ok(None),
        }
    }
}

/// Builder collecting one handler per command before the dispatcher is
/// frozen. Handler registration is a startup activity; duplicates surface
/// here, not under load.
pub struct DispatcherBuilder {
    registry: Arc<CommandRegistry>,
    handlers: HashMap<CommandId, HandlerFn>,
}

impl DispatcherBuilder {
    /// Register the handler for one command.
    ///
    /// The handler receives the decoded request and the session context and
    /// may suspend (awaiting a store lookup, for example). Returning
    /// `Ok(None)` declares the invocation fire-and-forget: no response frame
    /// is emitted.
    pub fn handle<F, Fut>(
        mut self,
        command: impl Into<CommandId>,
        handler: F,
    ) -> Result<DispatcherBuilder, RegistryError>
    where
        F: Fn(Request, SessionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Response>, HandlerError>> + Send + 'static,
    {
        let id = command.into();
        match self.handlers.entry(id) {
            Entry::Occupied(_) => return Err(RegistryError::DuplicateCommand(id)),
            Entry::Vacant(slot) => {
                slot.insert(Box::new(move |request, ctx| -> HandlerFuture {
                    Box::pin(handler(request, ctx))
                }));
            }
        }
        Ok(self)
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: self.registry,
            handlers: self.handlers,
        }
    }
}
