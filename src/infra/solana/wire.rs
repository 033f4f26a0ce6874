//! Legacy transaction wire format.
//!
//! Layout of a serialized transaction:
//!
//! ```text
//! compact-u16 signature count | 64-byte signatures | message
//!
//! message:
//!   header (3 bytes) | compact-u16 key count | 32-byte keys | recent blockhash
//!   | compact-u16 instruction count | instructions
//!
//! instruction:
//!   program index (u8) | compact-u16 account count | account indices
//!   | compact-u16 data length | data
//! ```

use crate::domain::{PublicKey, TransactionError, TransactionSigner};

/// Maximum serialized transaction size accepted by the ledger.
pub const PACKET_DATA_SIZE: usize = 1232;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: PublicKey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    #[must_use]
    pub fn writable(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    #[must_use]
    pub fn readonly(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: PublicKey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

pub fn encode_compact_u16(out: &mut Vec<u8>, len: usize) -> Result<(), TransactionError> {
    let mut value = u16::try_from(len)
        .map_err(|_| TransactionError::TooLarge(format!("length {len} exceeds u16")))?;
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return Ok(());
        }
        byte |= 0x80;
        out.push(byte);
    }
}

impl Message {
    /// Compile instructions into a message paid for by `fee_payer`.
    ///
    /// Keys are ordered signer+writable, signer+readonly, writable, readonly,
    /// with the fee payer always first.
    pub fn compile(
        fee_payer: &PublicKey,
        instructions: &[Instruction],
        recent_blockhash: &str,
    ) -> Result<Self, TransactionError> {
        let blockhash = bs58::decode(recent_blockhash)
            .into_vec()
            .map_err(|e| TransactionError::InvalidBlockhash(e.to_string()))?;
        let recent_blockhash: [u8; 32] = blockhash.try_into().map_err(|v: Vec<u8>| {
            TransactionError::InvalidBlockhash(format!("expected 32 bytes, got {}", v.len()))
        })?;

        let mut metas: Vec<AccountMeta> = vec![AccountMeta::writable(*fee_payer, true)];
        let mut merge = |meta: &AccountMeta| match metas.iter_mut().find(|m| m.pubkey == meta.pubkey)
        {
            Some(existing) => {
                existing.is_signer |= meta.is_signer;
                existing.is_writable |= meta.is_writable;
            }
            None => metas.push(meta.clone()),
        };
        for ix in instructions {
            for meta in &ix.accounts {
                merge(meta);
            }
            merge(&AccountMeta::readonly(ix.program_id, false));
        }

        // Stable sort keeps the fee payer (signer + writable) in front.
        metas.sort_by_key(|m| (!m.is_signer, !m.is_writable));

        if metas.len() > usize::from(u8::MAX) {
            return Err(TransactionError::TooLarge(format!(
                "{} accounts referenced",
                metas.len()
            )));
        }

        let count = |f: fn(&AccountMeta) -> bool| metas.iter().filter(|m| f(m)).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count(|m| m.is_signer),
            num_readonly_signed_accounts: count(|m| m.is_signer && !m.is_writable),
            num_readonly_unsigned_accounts: count(|m| !m.is_signer && !m.is_writable),
        };

        let account_keys: Vec<PublicKey> = metas.iter().map(|m| m.pubkey).collect();
        let position = |key: &PublicKey| -> u8 {
            // Every key was inserted above, and there are at most 255 of them.
            account_keys.iter().position(|k| k == key).unwrap_or_default() as u8
        };

        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: position(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| position(&m.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    /// Keys whose signatures the message requires, in signature order.
    #[must_use]
    pub fn signer_keys(&self) -> &[PublicKey] {
        &self.account_keys[..usize::from(self.header.num_required_signatures)]
    }

    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let mut out = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];

        encode_compact_u16(&mut out, self.account_keys.len())?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(&self.recent_blockhash);

        encode_compact_u16(&mut out, self.instructions.len())?;
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_compact_u16(&mut out, ix.accounts.len())?;
            out.extend_from_slice(&ix.accounts);
            encode_compact_u16(&mut out, ix.data.len())?;
            out.extend_from_slice(&ix.data);
        }

        Ok(out)
    }
}

/// A message plus one signature slot per required signer.
///
/// Slots that are not signed locally stay zero-filled for the remote fee
/// payer to complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; 64]>,
    pub message: Message,
}

impl Transaction {
    #[must_use]
    pub fn new_unsigned(message: Message) -> Self {
        let slots = usize::from(message.header.num_required_signatures);
        Self {
            signatures: vec![[0u8; 64]; slots],
            message,
        }
    }

    /// Fill the slot belonging to `signer`.
    pub fn partial_sign(&mut self, signer: &dyn TransactionSigner) -> Result<(), TransactionError> {
        let key = signer.public_key();
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|k| *k == key)
            .ok_or_else(|| {
                TransactionError::Signing(format!("{key} is not a required signer"))
            })?;
        let message = self.message.serialize()?;
        self.signatures[slot] = signer.sign_message(&message)?;
        Ok(())
    }

    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let mut out = Vec::new();
        encode_compact_u16(&mut out, self.signatures.len())?;
        for signature in &self.signatures {
            out.extend_from_slice(signature);
        }
        out.extend_from_slice(&self.message.serialize()?);

        if out.len() > PACKET_DATA_SIZE {
            return Err(TransactionError::TooLarge(format!(
                "{} bytes exceeds {PACKET_DATA_SIZE}",
                out.len()
            )));
        }
        Ok(out)
    }
}
