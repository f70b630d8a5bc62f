//! Version 0 message compilation and wire encoding
//!
//! A v0 message is the 0x80 version prefix followed by the header, the
//! deduplicated account key list, the recent blockhash, the compiled
//! instructions and an (always empty here) address-table lookup list.

use crate::error::{LedgerError, LedgerResult};
use crate::instruction::Instruction;
use crate::types::{Hash, Pubkey};

/// High bit marks a versioned message; low bits carry the version.
pub const MESSAGE_VERSION_PREFIX: u8 = 0x80;

const MAX_ACCOUNT_KEYS: usize = u8::MAX as usize + 1;

/// Append `value` as a compact-u16 (7 bits per byte, high bit continues).
pub fn encode_compact_u16(mut value: u16, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

fn encode_len(len: usize, out: &mut Vec<u8>) -> LedgerResult<()> {
    let len = u16::try_from(len)
        .map_err(|_| LedgerError::Signing(format!("length {} exceeds compact-u16", len)))?;
    encode_compact_u16(len, out);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
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

#[derive(Debug, Clone, Copy)]
struct KeyFlags {
    is_signer: bool,
    is_writable: bool,
}

fn select_keys(keys: &[(Pubkey, KeyFlags)], is_signer: bool, is_writable: bool) -> Vec<Pubkey> {
    keys.iter()
        .filter(|(_, f)| f.is_signer == is_signer && f.is_writable == is_writable)
        .map(|(k, _)| *k)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageV0 {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl MessageV0 {
    /// Compile instructions into a message paid for by `payer`.
    pub fn compile(payer: &Pubkey, instructions: &[Instruction], recent_blockhash: Hash) -> LedgerResult<Self> {
        // Insertion-ordered key set; the payer always comes first.
        let mut keys: Vec<(Pubkey, KeyFlags)> = vec![(*payer, KeyFlags { is_signer: true, is_writable: true })];

        let mut upsert = |pubkey: Pubkey, is_signer: bool, is_writable: bool| {
            if let Some((_, flags)) = keys.iter_mut().find(|(k, _)| *k == pubkey) {
                flags.is_signer |= is_signer;
                flags.is_writable |= is_writable;
            } else {
                keys.push((pubkey, KeyFlags { is_signer, is_writable }));
            }
        };

        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            upsert(ix.program_id, false, false);
        }

        let writable_signers = select_keys(&keys, true, true);
        let readonly_signers = select_keys(&keys, true, false);
        let writable_unsigned = select_keys(&keys, false, true);
        let readonly_unsigned = select_keys(&keys, false, false);

        let header = MessageHeader {
            num_required_signatures: (writable_signers.len() + readonly_signers.len()) as u8,
            num_readonly_signed_accounts: readonly_signers.len() as u8,
            num_readonly_unsigned_accounts: readonly_unsigned.len() as u8,
        };

        let account_keys: Vec<Pubkey> = writable_signers
            .into_iter()
            .chain(readonly_signers)
            .chain(writable_unsigned)
            .chain(readonly_unsigned)
            .collect();

        if account_keys.len() > MAX_ACCOUNT_KEYS {
            return Err(LedgerError::Signing(format!("too many account keys: {}", account_keys.len())));
        }

        let index_of = |key: &Pubkey| -> u8 {
            // Every key was inserted above, so the lookup cannot miss.
            account_keys.iter().position(|k| k == key).unwrap_or_default() as u8
        };

        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
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

    /// Keys that must sign, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.header.num_required_signatures as usize]
    }

    /// Wire encoding; these are the bytes that get signed.
    pub fn serialize(&self) -> LedgerResult<Vec<u8>> {
        let mut out = Vec::with_capacity(256);
        out.push(MESSAGE_VERSION_PREFIX);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_len(self.account_keys.len(), &mut out)?;
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }

        out.extend_from_slice(&self.recent_blockhash.0);

        encode_len(self.instructions.len(), &mut out)?;
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_len(ix.accounts.len(), &mut out)?;
            out.extend_from_slice(&ix.accounts);
            encode_len(ix.data.len(), &mut out)?;
            out.extend_from_slice(&ix.data);
        }

        // No address table lookups
        encode_compact_u16(0, &mut out);
        Ok(out)
    }
}
