use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Numeric identifier naming one logical message type.
///
/// The wire carries a bare `u16`, so any value is representable here,
/// including ones no codec was ever registered for. The mapping from
/// identifier to meaning is fixed at build time and identifiers are never
/// reused for different meanings within a protocol version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u16);

impl CommandId {
    /// Resolve this identifier against the table of well-known commands.
    pub fn known(self) -> Option<GameCommand> {
        GameCommand::try_from(self.0).ok()
    }
}

impl From<u16> for CommandId {
    fn from(raw: u16) -> Self {
        CommandId(raw)
    }
}

impl From<GameCommand> for CommandId {
    fn from(command: GameCommand) -> Self {
        CommandId(u16::from(command))
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known() {
            Some(command) => write!(f, "{} ({:?})", self.0, command),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Commands this crate ships codecs for.
///
/// Identifiers are grouped into per-subsystem ranges by convention only
/// (24xx is the arena subsystem); nothing in the protocol layer enforces
/// the grouping. Uniqueness is guaranteed by the registry instead.
#[derive(TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameCommand {
    InviteFight = 2401,
    InviteFightCancel = 2402,
    QueryCurrency = 2411,
}
