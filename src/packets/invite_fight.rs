use crate::command::GameCommand;
use crate::macros::impl_empty_packet;

/// Challenge the opposing player in the current arena pairing (command 2401).
///
/// Both directions are empty-bodied: the pairing is ambient session state,
/// so the request carries no fields and the acknowledgement carries none
/// either. A zero-length payload is the one valid encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InviteFight;

/// Acknowledgement for [`InviteFight`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InviteFightAck;

/// Withdraw a pending fight invitation (command 2402).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InviteFightCancel;

/// Acknowledgement for [`InviteFightCancel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InviteFightCancelAck;

impl_empty_packet!(InviteFight, GameCommand::InviteFight);
impl_empty_packet!(InviteFightAck, GameCommand::InviteFight);
impl_empty_packet!(InviteFightCancel, GameCommand::InviteFightCancel);
impl_empty_packet!(InviteFightCancelAck, GameCommand::InviteFightCancel);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, Decodable, Encodable};

    #[test]
    fn empty_shape_round_trip() {
        let payload = InviteFight.to_payload();
        assert!(payload.is_empty());
        assert_eq!(InviteFight::decode(&payload).unwrap(), InviteFight);
    }

    #[test]
    fn decode_rejects_any_nonempty_payload() {
        let result = InviteFight::decode(&[0x00]);
        assert!(matches!(result, Err(CodecError::TrailingBytes { len: 1 })));

        let result = InviteFightCancelAck::decode(&[0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(CodecError::TrailingBytes { len: 3 })));
    }

    #[test]
    fn request_and_ack_share_a_command() {
        assert_eq!(
            <InviteFight as Decodable>::command_id(),
            <InviteFightAck as Encodable>::command_id()
        );
        assert_eq!(
            <InviteFightCancel as Decodable>::command_id(),
            <InviteFightCancelAck as Encodable>::command_id()
        );
    }

    #[test]
    fn encoded_size_is_zero() {
        assert_eq!(InviteFightAck.encoded_size(), 0);
    }
}
