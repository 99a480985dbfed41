use crate::codec::{self, CodecError, Decodable, Encodable};
use crate::command::{CommandId, GameCommand};
use bytes::BytesMut;
use std::io::Cursor;

/// Ask for the balance of one currency pouch (command 2411).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryCurrency {
    /// Which pouch to read; the table of kinds lives with the game rules,
    /// this layer only carries the byte.
    pub currency: u8,
}

/// Balance report answering [`QueryCurrency`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrencyBalance {
    pub currency: u8,
    pub balance: u64,
}

impl Decodable for QueryCurrency {
    fn command_id() -> CommandId {
        GameCommand::QueryCurrency.into()
    }

    fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let mut buf = Cursor::new(payload);
        let currency = codec::decode_u8(&mut buf, "currency")?;
        codec::ensure_empty(&buf)?;
        Ok(QueryCurrency { currency })
    }
}

impl Encodable for QueryCurrency {
    fn command_id() -> CommandId {
        GameCommand::QueryCurrency.into()
    }

    fn encode(&self, buf: &mut BytesMut) {
        codec::encode_u8(buf, self.currency);
    }

    fn encoded_size(&self) -> usize {
        1
    }
}

impl Decodable for CurrencyBalance {
    fn command_id() -> CommandId {
        GameCommand::QueryCurrency.into()
    }

    fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let mut buf = Cursor::new(payload);
        let currency = codec::decode_u8(&mut buf, "currency")?;
        let balance = codec::decode_u64(&mut buf, "balance")?;
        codec::ensure_empty(&buf)?;
        Ok(CurrencyBalance { currency, balance })
    }
}

impl Encodable for CurrencyBalance {
    fn command_id() -> CommandId {
        GameCommand::QueryCurrency.into()
    }

    fn encode(&self, buf: &mut BytesMut) {
        codec::encode_u8(buf, self.currency);
        codec::encode_u64(buf, self.balance);
    }

    fn encoded_size(&self) -> usize {
        9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_round_trip() {
        let original = QueryCurrency { currency: 3 };
        let decoded = QueryCurrency::decode(&original.to_payload()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn balance_round_trip() {
        let original = CurrencyBalance {
            currency: 3,
            balance: 1_234_567_890,
        };
        let payload = original.to_payload();
        assert_eq!(payload.len(), original.encoded_size());
        let decoded = CurrencyBalance::decode(&payload).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn balance_rejects_truncation() {
        let payload = CurrencyBalance {
            currency: 1,
            balance: 42,
        }
        .to_payload();
        let result = CurrencyBalance::decode(&payload[..5]);
        assert!(matches!(
            result,
            Err(CodecError::Truncated {
                field: "balance",
                ..
            })
        ));
    }

    #[test]
    fn query_rejects_trailing_bytes() {
        let result = QueryCurrency::decode(&[0x01, 0x00]);
        assert!(matches!(result, Err(CodecError::TrailingBytes { len: 1 })));
    }
}
