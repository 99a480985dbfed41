//! Command registry: the static map from command identifier to codec pair.
//!
//! Pure data, no behavior beyond lookup. Registration happens once during
//! process initialization, before any connection is accepted; afterwards the
//! registry sits behind an `Arc` and is safe for unsynchronized concurrent
//! reads from every connection.

use crate::codec::{CodecError, Decodable, Encodable};
use crate::command::CommandId;
use crate::packets::{Request, Response};
use bytes::Bytes;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use thiserror::Error;

type DecodeFn = Box<dyn Fn(&[u8]) -> Result<Request, CodecError> + Send + Sync>;
type EncodeFn = Box<dyn Fn(&Response) -> Result<Bytes, CodecError> + Send + Sync>;

/// Registry errors. `DuplicateCommand` indicates a build-time programming
/// defect and is fatal at startup; `UnknownCommand` is an expected runtime
/// condition (a slightly-mismatched client version, for example).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("command {0} is already registered")]
    DuplicateCommand(CommandId),

    #[error("unknown command {0}")]
    UnknownCommand(CommandId),

    #[error("request codec is for command {request} but response codec is for {response}")]
    CodecMismatch {
        request: CommandId,
        response: CommandId,
    },
}

/// The codec pair owned by the registry for one command: a request decoder
/// and a response encoder, type-erased so entries for every command fit in
/// one table.
pub struct CodecEntry {
    decode: DecodeFn,
    encode: EncodeFn,
}

impl CodecEntry {
    pub fn new(decode: DecodeFn, encode: EncodeFn) -> CodecEntry {
        CodecEntry { decode, encode }
    }

    /// Decode a payload buffer into a typed request value.
    pub fn decode(&self, payload: &[u8]) -> Result<Request, CodecError> {
        (self.decode)(payload)
    }

    /// Encode a response value into a payload buffer.
    ///
    /// The only failure is a response variant that does not belong to this
    /// command, which is a handler programming error, not a wire condition.
    pub fn encode(&self, response: &Response) -> Result<Bytes, CodecError> {
        (self.encode)(response)
    }
}

/// Static mapping from command identifier to codec pair.
pub struct CommandRegistry {
    entries: HashMap<CommandId, CodecEntry>,
}

impl CommandRegistry {
    pub fn new() -> CommandRegistry {
        CommandRegistry {
            entries: HashMap::new(),
        }
    }

    /// A registry with every packet shape this crate ships pre-registered.
    pub fn standard() -> Result<CommandRegistry, RegistryError> {
        use crate::packets::*;

        let mut registry = CommandRegistry::new();
        registry.register::<InviteFight, InviteFightAck>(Request::InviteFight, |resp| {
            match resp {
                Response::InviteFightAck(ack) => Some(ack),
                _ => None,
            }
        })?;
        registry.register::<InviteFightCancel, InviteFightCancelAck>(
            Request::InviteFightCancel,
            |resp| match resp {
                Response::InviteFightCancelAck(ack) => Some(ack),
                _ => None,
            },
        )?;
        registry.register::<QueryCurrency, CurrencyBalance>(Request::QueryCurrency, |resp| {
            match resp {
                Response::CurrencyBalance(balance) => Some(balance),
                _ => None,
            }
        })?;
        Ok(registry)
    }

    /// Register a typed request/response codec pair.
    ///
    /// The command identifier comes from the codec types themselves; the two
    /// must agree, and registering a second pair under the same identifier
    /// fails with [`RegistryError::DuplicateCommand`] without touching the
    /// first. Two codecs disagreeing about a command's shape must surface at
    /// startup, never at runtime under load.
    pub fn register<Q, S>(
        &mut self,
        wrap: fn(Q) -> Request,
        unwrap: fn(&Response) -> Option<&S>,
    ) -> Result<(), RegistryError>
    where
        Q: Decodable + 'static,
        S: Encodable + 'static,
    {
        let id = <Q as Decodable>::command_id();
        let response_id = <S as Encodable>::command_id();
        if response_id != id {
            return Err(RegistryError::CodecMismatch {
                request: id,
                response: response_id,
            });
        }

        let entry = CodecEntry::new(
            Box::new(move |payload: &[u8]| Q::decode(payload).map(wrap)),
            Box::new(move |response: &Response| match unwrap(response) {
                Some(value) => Ok(value.to_payload()),
                None => Err(CodecError::UnexpectedResponse {
                    command: id,
                    response: response.name(),
                }),
            }),
        );
        self.register_entry(id, entry)
    }

    /// Register a pre-built codec entry under an explicit identifier.
    pub fn register_entry(&mut self, id: CommandId, entry: CodecEntry) -> Result<(), RegistryError> {
        match self.entries.entry(id) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateCommand(id)),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Look up the codec pair for a command.
    pub fn lookup(&self, id: CommandId) -> Result<&CodecEntry, RegistryError> {
        self.entries
            .get(&id)
            .ok_or(RegistryError::UnknownCommand(id))
    }

    pub fn is_registered(&self, id: CommandId) -> bool {
        self.entries.contains_key(&id)
    }

    /// All registered command identifiers, in no particular order.
    pub fn registered_commands(&self) -> Vec<CommandId> {
        self.entries.keys().copied().collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
