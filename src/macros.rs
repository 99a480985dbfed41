// Macros cutting boilerplate for empty-bodied packet shapes.

/// Implement the codec traits for an empty-bodied packet type.
///
/// Generates [`Decodable`](crate::codec::Decodable) and
/// [`Encodable`](crate::codec::Encodable) for a unit struct whose wire
/// encoding is the zero-length buffer. Decoding enforces the strict
/// empty-shape contract: a zero-length payload yields the value, any
/// non-zero-length payload is a decode error. Commands whose real contract
/// is "ignore any payload" must implement the traits by hand instead of
/// using this macro.
///
/// # Arguments
/// * `$ty` - the unit struct name (e.g. `InviteFight`)
/// * `$command` - an expression convertible into [`CommandId`](crate::command::CommandId)
macro_rules! impl_empty_packet {
    ($ty:ident, $command:expr) => {
        impl $crate::codec::Decodable for $ty {
            fn command_id() -> $crate::command::CommandId {
                $command.into()
            }

            fn decode(payload: &[u8]) -> Result<Self, $crate::codec::CodecError> {
                if !payload.is_empty() {
                    return Err($crate::codec::CodecError::TrailingBytes {
                        len: payload.len(),
                    });
                }
                Ok($ty)
            }
        }

        impl $crate::codec::Encodable for $ty {
            fn command_id() -> $crate::command::CommandId {
                $command.into()
            }

            fn encode(&self, _buf: &mut ::bytes::BytesMut) {}

            fn encoded_size(&self) -> usize {
                0
            }
        }
    };
}

pub(crate) use impl_empty_packet;
