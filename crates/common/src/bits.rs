//! Compact "bits" target encoding (the same format Bitmain's difficulty
//! field uses) and the difficulty-retarget calculation run every 2016 blocks.

use num_bigint::BigUint;
use num_traits::Zero;

/// Two weeks in seconds — the target interval between difficulty
/// adjustments (2016 blocks at the intended 10-minute spacing).
pub const TWO_WEEKS: u32 = 60 * 60 * 24 * 14;

/// Expands a compact 4-byte "bits" field into its 256-bit target.
pub fn bits_to_target(bits: u32) -> BigUint {
    let bytes = bits.to_be_bytes();
    let exponent = bytes[0] as u32;
    let coefficient = BigUint::from_bytes_be(&bytes[1..]);
    if exponent <= 3 {
        let shift = 8 * (3 - exponent);
        coefficient >> shift
    } else {
        coefficient << (8 * (exponent - 3))
    }
}

/// Compresses a 256-bit target back into its compact "bits" encoding.
pub fn target_to_bits(target: &BigUint) -> u32 {
    if target.is_zero() {
        return 0;
    }
    let mut raw = target.to_bytes_be();
    // If the high bit of the first byte is set, the coefficient would read
    // as negative; shift in a leading zero byte and bump the exponent.
    if raw[0] > 0x7f {
        raw.insert(0, 0);
    }
    let exponent = raw.len() as u8;
    let mut coefficient = [0u8; 3];
    let take = raw.len().min(3);
    coefficient[..take].copy_from_slice(&raw[..take]);
    u32::from_be_bytes([exponent, coefficient[0], coefficient[1], coefficient[2]])
}

/// Computes the new "bits" value for the block following a 2016-block
/// retarget period, given the first and last block timestamps of that
/// period and the last period's bits.
pub fn calculate_new_bits(previous_bits: u32, time_differential: i64) -> u32 {
    let clamped = time_differential
        .clamp((TWO_WEEKS as i64) / 4, (TWO_WEEKS as i64) * 4) as u64;
    let previous_target = bits_to_target(previous_bits);
    let new_target = (previous_target * clamped) / (TWO_WEEKS as u64);
    target_to_bits(&new_target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_to_target_matches_known_genesis_value() {
        // mainnet genesis bits 0x1d00ffff
        let target = bits_to_target(0x1d00ffff);
        let expected = BigUint::from(0xffffu32) << (8 * (0x1d - 3));
        assert_eq!(target, expected);
    }

    #[test]
    fn target_to_bits_is_inverse_of_bits_to_target_for_round_values() {
        let bits = 0x1d00ffffu32;
        let target = bits_to_target(bits);
        assert_eq!(target_to_bits(&target), bits);
    }

    #[test]
    fn calculate_new_bits_clamps_fast_intervals() {
        // An interval far shorter than two weeks clamps to one quarter,
        // which raises difficulty (lowers the target, shrinks "bits").
        let previous_bits = 0x1d00ffff;
        let new_bits = calculate_new_bits(previous_bits, 1000);
        let old_target = bits_to_target(previous_bits);
        let new_target = bits_to_target(new_bits);
        assert!(new_target <= old_target);
    }

    #[test]
    fn calculate_new_bits_clamps_slow_intervals() {
        let previous_bits = 0x1d00ffff;
        let new_bits = calculate_new_bits(previous_bits, (TWO_WEEKS as i64) * 100);
        let old_target = bits_to_target(previous_bits);
        let new_target = bits_to_target(new_bits);
        assert!(new_target >= old_target);
    }

    #[test]
    fn calculate_new_bits_unchanged_for_exact_interval() {
        let previous_bits = 0x1d00ffff;
        let new_bits = calculate_new_bits(previous_bits, TWO_WEEKS as i64);
        assert_eq!(new_bits, previous_bits);
    }
}
