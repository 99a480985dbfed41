// ABOUTME: Runnable arena gateway demonstrating registry, dispatcher, and session wiring
// ABOUTME: Accepts TCP connections and serves the sample command set with stub game logic

//! # Arena gateway demo
//!
//! Stands up the protocol layer end to end: a populated command registry,
//! one handler per command, and a session task per accepted connection.
//! The handlers are stubs; in the real server they live in the game-logic
//! modules and are registered here at startup.
//!
//! ```bash
//! cargo run --example arena_server -- --addr 127.0.0.1:7101
//! ```

use argh::FromArgs;
use cmdgate::packets::{CurrencyBalance, InviteFightAck, InviteFightCancelAck, Request, Response};
use cmdgate::{
    CommandRegistry, Connection, Dispatcher, GameCommand, Session, SessionContext,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Arena gateway demo server
#[derive(FromArgs)]
struct CliArgs {
    /// whether or not to enable debug logging
    #[argh(switch, short = 'd')]
    debugging: bool,

    /// the address to listen on (default: 127.0.0.1:7101)
    #[argh(option)]
    addr: Option<String>,
}

fn build_dispatcher() -> cmdgate::Result<Dispatcher> {
    let registry = Arc::new(CommandRegistry::standard()?);

    let dispatcher = Dispatcher::builder(registry)
        .handle(GameCommand::InviteFight, |_request, ctx| async move {
            info!(session = ctx.session_id(), "fight invitation accepted");
            Ok(Some(Response::InviteFightAck(InviteFightAck)))
        })?
        .handle(GameCommand::InviteFightCancel, |_request, ctx| async move {
            info!(session = ctx.session_id(), "fight invitation withdrawn");
            Ok(Some(Response::InviteFightCancelAck(InviteFightCancelAck)))
        })?
        .handle(GameCommand::QueryCurrency, |request, _ctx| async move {
            // A real handler would consult the player store here.
            match request {
                Request::QueryCurrency(query) => {
                    Ok(Some(Response::CurrencyBalance(CurrencyBalance {
                        currency: query.currency,
                        balance: 1_000,
                    })))
                }
                _ => Err("unexpected request variant".into()),
            }
        })?
        .build();

    Ok(dispatcher)
}

#[tokio::main]
async fn main() -> cmdgate::Result<()> {
    let args: CliArgs = argh::from_env();

    let level = if args.debugging {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let addr = args.addr.unwrap_or_else(|| "127.0.0.1:7101".to_string());
    let dispatcher = Arc::new(build_dispatcher()?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "arena gateway listening");

    let next_session = AtomicU64::new(1);
    loop {
        let (socket, peer) = listener.accept().await?;
        let session_id = next_session.fetch_add(1, Ordering::Relaxed);
        let ctx = SessionContext::new(session_id, Some(peer));
        let mut session = Session::new(Connection::new(socket), dispatcher.clone(), ctx);

        tokio::spawn(async move {
            info!(session = session_id, %peer, "session opened");
            if let Err(e) = session.run().await {
                warn!(session = session_id, error = %e, "session ended with error");
            }
            info!(session = session_id, "session closed");
        });
    }
}
