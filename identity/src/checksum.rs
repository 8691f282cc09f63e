//! Weighted mod-10 checksum over the six payload digits.
//!
//! Two formulations exist in deployed validators: a direct positional sum and
//! a loop keyed on index parity. They must agree bit-for-bit, so both are kept
//! and cross-checked by the property tests.

/// Weight applied to digits at odd token positions (1, 3, 5).
pub const ODD_WEIGHT: u32 = 3;

/// Weight applied to digits at even token positions (2, 4, 6).
pub const EVEN_WEIGHT: u32 = 1;

/// Direct positional form. `digits[0]` sits at token position 1.
pub fn checksum_positional(digits: &[u8; 6]) -> u8 {
    let d = digits.map(u32::from);
    let sum = d[0] * ODD_WEIGHT
        + d[1] * EVEN_WEIGHT
        + d[2] * ODD_WEIGHT
        + d[3] * EVEN_WEIGHT
        + d[4] * ODD_WEIGHT
        + d[5] * EVEN_WEIGHT;
    (sum % 10) as u8
}

/// Loop form keyed on the parity of the token position.
pub fn checksum_parity(digits: &[u8; 6]) -> u8 {
    let mut sum = 0u32;
    for (offset, &digit) in digits.iter().enumerate() {
        let position = offset + 1;
        let weight = if position % 2 == 1 { ODD_WEIGHT } else { EVEN_WEIGHT };
        sum += u32::from(digit) * weight;
    }
    (sum % 10) as u8
}
