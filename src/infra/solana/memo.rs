//! Kin binary memo.
//!
//! Bit layout of the 32-byte memo (little-endian bit order):
//!
//! ```text
//! 0..2    magic (always 1)
//! 2..5    version
//! 5..10   transaction type
//! 10..26  app index
//! 26..256 foreign key (unused, zero)
//! ```

use base64::{Engine, prelude::BASE64_STANDARD};

use super::programs;
use super::wire::Instruction;
use crate::domain::TransactionType;

const MAGIC: u8 = 0x1;
const MEMO_VERSION: u8 = 1;

#[must_use]
pub fn encode_kin_memo(transaction_type: TransactionType, app_index: u16) -> [u8; 32] {
    let kind = transaction_type.code();
    let mut memo = [0u8; 32];

    memo[0] = MAGIC | (MEMO_VERSION << 2) | ((kind & 0x7) << 5);
    memo[1] = ((kind & 0x18) >> 3) | (((app_index & 0x3f) as u8) << 2);
    memo[2] = ((app_index & 0x3fc0) >> 6) as u8;
    memo[3] = ((app_index & 0xc000) >> 14) as u8;

    memo
}

/// Memo instruction carrying the base64 Kin memo for `app_index`.
#[must_use]
pub fn kin_memo_instruction(transaction_type: TransactionType, app_index: u16) -> Instruction {
    let memo = encode_kin_memo(transaction_type, app_index);
    programs::memo(&BASE64_STANDARD.encode(memo))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(memo: &[u8; 32]) -> (u8, u8, u8, u16) {
        let magic = memo[0] & 0x3;
        let version = (memo[0] >> 2) & 0x7;
        let kind = (memo[0] >> 5) | ((memo[1] & 0x3) << 3);
        let app_index = u16::from(memo[1] >> 2)
            | (u16::from(memo[2]) << 6)
            | (u16::from(memo[3] & 0x3) << 14);
        (magic, version, kind, app_index)
    }

    #[test]
    fn test_memo_fields() {
        let memo = encode_kin_memo(TransactionType::P2P, 1);
        assert_eq!(decode(&memo), (1, 1, 3, 1));
        assert!(memo[4..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_memo_wide_app_index() {
        let memo = encode_kin_memo(TransactionType::Earn, 0xBEEF);
        assert_eq!(decode(&memo), (1, 1, 1, 0xBEEF));
    }

    #[test]
    fn test_memo_instruction_is_base64() {
        let ix = kin_memo_instruction(TransactionType::None, 7);
        assert_eq!(ix.program_id, programs::MEMO_PROGRAM_ID);
        let text = String::from_utf8(ix.data).unwrap();
        let bytes = BASE64_STANDARD.decode(text).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(decode(&bytes.try_into().unwrap()), (1, 1, 0, 7));
    }
}
