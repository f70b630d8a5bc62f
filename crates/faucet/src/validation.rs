//! Request validation. Runs before any ledger call.

use crate::error::{FaucetError, FaucetResult};
use drip_ledger::{sol_to_lamports, LAMPORTS_PER_SOL};

pub const MIN_ADDRESS_LEN: usize = 32;
pub const MAX_ADDRESS_LEN: usize = 44;

/// Most fractional digits a SOL amount can carry (1 lamport = 1e-9 SOL).
pub const MAX_DECIMAL_PLACES: usize = 9;

/// Per-request cap, inclusive.
pub const MAX_TRANSFER_SOL: f64 = 3.0;

/// Used when the request carries no amount.
pub const DEFAULT_TRANSFER_SOL: f64 = 0.5;

/// Base-58 alphabet: ASCII alphanumerics minus `0`, `O`, `I` and `l`.
fn is_base58_char(c: char) -> bool {
    c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
}

/// Syntactic check only; a passing string may still not be a real account.
pub fn is_valid_address(input: &str) -> bool {
    (MIN_ADDRESS_LEN..=MAX_ADDRESS_LEN).contains(&input.len()) && input.chars().all(is_base58_char)
}

/// Reject an address that fails the syntactic check.
pub fn check_address(input: &str) -> FaucetResult<()> {
    if is_valid_address(input) {
        Ok(())
    } else {
        Err(FaucetError::InvalidAddress)
    }
}

/// Whether `sol` is a whole number of lamports.
fn is_lamport_multiple(sol: f64) -> bool {
    let scaled = sol * LAMPORTS_PER_SOL as f64;
    (scaled - scaled.round()).abs() < 1e-6
}

/// Lamports to send for an optional SOL amount string.
///
/// An absent or empty amount falls back to the default.
pub fn parse_amount(amount: Option<&str>) -> FaucetResult<u64> {
    let raw = match amount.map(str::trim) {
        None | Some("") => return Ok(sol_to_lamports(DEFAULT_TRANSFER_SOL)),
        Some(raw) => raw,
    };

    let sol: f64 = raw.parse().map_err(|_| FaucetError::InvalidAmount)?;
    if !sol.is_finite() {
        return Err(FaucetError::InvalidAmount);
    }

    if let Some((_, fraction)) = raw.split_once('.') {
        if fraction.len() > MAX_DECIMAL_PLACES {
            return Err(FaucetError::AmountPrecision);
        }
    }

    // Exponent forms carry no literal fraction to count.
    if raw.contains(['e', 'E']) && !is_lamport_multiple(sol) {
        return Err(FaucetError::AmountPrecision);
    }

    if sol <= 0.0 || sol > MAX_TRANSFER_SOL {
        return Err(FaucetError::AmountOutOfRange);
    }

    let lamports = sol_to_lamports(sol);
    if lamports == 0 {
        return Err(FaucetError::AmountOutOfRange);
    }

    Ok(lamports)
}
