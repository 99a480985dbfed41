//! Representative packet shapes.
//!
//! The full command space is much larger; the types here are the sample the
//! rest of the space follows. Each command contributes a request shape, a
//! response shape, and one variant in the [`Request`]/[`Response`] wrappers
//! the registry's type-erased closures traffic in.

mod invite_fight;
mod query_currency;

pub use invite_fight::{InviteFight, InviteFightAck, InviteFightCancel, InviteFightCancelAck};
pub use query_currency::{CurrencyBalance, QueryCurrency};

use crate::codec::Encodable;
use crate::command::CommandId;

/// A decoded request value, one variant per registered command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    InviteFight(InviteFight),
    InviteFightCancel(InviteFightCancel),
    QueryCurrency(QueryCurrency),
}

/// A response value produced by a handler, one variant per registered
/// command. `Response` itself is not `Encodable`; the registry entry for the
/// owning command knows how to unwrap and encode the right variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    InviteFightAck(InviteFightAck),
    InviteFightCancelAck(InviteFightCancelAck),
    CurrencyBalance(CurrencyBalance),
}

impl Request {
    pub fn command_id(&self) -> CommandId {
        match self {
            Request::InviteFight(_) => <InviteFight as crate::codec::Decodable>::command_id(),
            Request::InviteFightCancel(_) => {
                <InviteFightCancel as crate::codec::Decodable>::command_id()
            }
            Request::QueryCurrency(_) => <QueryCurrency as crate::codec::Decodable>::command_id(),
        }
    }
}

impl Response {
    pub fn command_id(&self) -> CommandId {
        match self {
            Response::InviteFightAck(_) => <InviteFightAck as Encodable>::command_id(),
            Response::InviteFightCancelAck(_) => <InviteFightCancelAck as Encodable>::command_id(),
            Response::CurrencyBalance(_) => <CurrencyBalance as Encodable>::command_id(),
        }
    }

    /// Variant name for error reporting.
    pub fn name(&self) -> &'static str {
        match self {
            Response::InviteFightAck(_) => "invite_fight_ack",
            Response::InviteFightCancelAck(_) => "invite_fight_cancel_ack",
            Response::CurrencyBalance(_) => "currency_balance",
        }
    }
}
