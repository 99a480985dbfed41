//! Command-dispatch binary protocol layer for a multiplayer game server.
//!
//! Turns raw bytes arriving on a client connection into typed request
//! values, routes them to handlers by numeric command identifier, and turns
//! handler results back into typed response frames:
//!
//! ```text
//! bytes in → Connection → Frame → Dispatcher → registry lookup → decode
//!         → handler → encode → Dispatcher → Connection → bytes out
//! ```
//!
//! The layer neither knows nor cares how handlers use decoded data; game
//! rules, storage, and authentication are external collaborators. Command
//! identifiers and payload shapes are statically known at build time, never
//! negotiated at runtime.
//!
//! # Example
//!
//! ```rust,no_run
//! use cmdgate::packets::{InviteFightAck, Response};
//! use cmdgate::{CommandRegistry, Connection, Dispatcher, GameCommand, Session, SessionContext};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> cmdgate::Result<()> {
//!     let registry = Arc::new(CommandRegistry::standard()?);
//!     let dispatcher = Arc::new(
//!         Dispatcher::builder(registry)
//!             .handle(GameCommand::InviteFight, |_request, _ctx| async move {
//!                 Ok(Some(Response::InviteFightAck(InviteFightAck)))
//!             })?
//!             .build(),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:7101").await?;
//!     let mut next_session = 0u64;
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         next_session += 1;
//!         let ctx = SessionContext::new(next_session, Some(peer));
//!         let mut session = Session::new(Connection::new(socket), dispatcher.clone(), ctx);
//!         tokio::spawn(async move {
//!             let _ = session.run().await;
//!         });
//!     }
//! }
//! ```

pub mod codec;
pub mod command;
pub mod connection;
pub mod dispatch;
pub mod frame;
mod macros;
pub mod packets;
pub mod registry;
pub mod session;


pub use codec::{CodecError, Decodable, Encodable};
pub use command::{CommandId, GameCommand};
pub use connection::Connection;
pub use dispatch::{DispatchError, Dispatcher, DispatcherBuilder, HandlerError, SessionContext};
pub use frame::{DEFAULT_MAX_PAYLOAD, Frame, FrameError};
pub use registry::{CodecEntry, CommandRegistry, RegistryError};
pub use session::Session;

/// Error returned by connection-level and session-level functions.
///
/// Codec, frame, registry, and dispatch failures each have their own typed
/// enum; the session loop folds them into a boxed error because by that
/// point the only decision left is whether the connection survives.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Convenience `Result` alias for connection and session operations.
pub type Result<T> = std::result::Result<T, Error>;
