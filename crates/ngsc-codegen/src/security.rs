//! Anti-tampering artifacts: the security block and the header scramble.
//!
//! Both are pure transforms over byte buffers; the only entropy source is
//! the injected PRNG, so a fixed seed gives byte-exact output.

use rand::Rng;

/// XOR key applied cyclically to security-block bytes 1..n.
pub const SECURITY_XOR_KEY: [u8; 13] = [
    0x8C, 0xC1, 0x4B, 0xFD, 0x46, 0xBD, 0x6A, 0xE5, 0x0D, 0xFF, 0x35, 0x28, 0x0A,
];

/// Byte position of the level-count verification byte.
pub const VERIFY_LEVEL_COUNT: usize = 5;
/// Byte position of the options-flags verification byte.
pub const VERIFY_OPTIONS: usize = 12;
/// Byte position of the NG-settings verification byte.
pub const VERIFY_NG_SETTINGS: usize = 19;

/// Build the scrambled security block (20–28 words of bytes).
///
/// Layout before scrambling: byte 0 holds the checksum (sum of bytes 1..n
/// mod 256), bytes 5/12/19 hold the verification values, everything else is
/// PRNG filler. Bytes 1..n are then XOR-scrambled against
/// [`SECURITY_XOR_KEY`] in position.
pub fn build_security_block<R: Rng>(
    rng: &mut R,
    level_count: u8,
    options_low: u8,
    ng_settings_low: u8,
) -> Vec<u8> {
    let words = 20 + (rng.gen::<u8>() % 9) as usize;
    let mut data = vec![0u8; words * 2];
    for b in data.iter_mut().skip(1) {
        *b = rng.gen();
    }
    data[VERIFY_LEVEL_COUNT] = level_count;
    data[VERIFY_OPTIONS] = options_low;
    data[VERIFY_NG_SETTINGS] = ng_settings_low;
    data[0] = data[1..].iter().fold(0u8, |sum, b| sum.wrapping_add(*b));
    scramble_security(&mut data);
    data
}

/// XOR bytes 1..n against the key table in position. Involutive.
pub fn scramble_security(data: &mut [u8]) {
    for (i, b) in data.iter_mut().enumerate().skip(1) {
        *b ^= SECURITY_XOR_KEY[(i - 1) % SECURITY_XOR_KEY.len()];
    }
}

/// Permutation applied to the first 64 bytes of a protected script.dat:
/// output byte `i` comes from input byte `HEADER_PERMUTATION[i]`.
pub const HEADER_PERMUTATION: [u8; 64] = [
    55, 60, 19, 54, 24, 20, 6, 30, 34, 53, 27, 63, 28, 44, 21, 29,
    49, 15, 58, 62, 52, 45, 1, 37, 51, 57, 0, 8, 26, 18, 7, 40,
    35, 4, 2, 42, 33, 32, 23, 11, 43, 17, 61, 48, 56, 5, 47, 25,
    3, 41, 13, 50, 38, 10, 12, 59, 39, 16, 31, 36, 46, 9, 22, 14,
];

/// XOR key applied cyclically on top of the permutation.
pub const HEADER_XOR_KEY: [u8; 17] = [
    0x6B, 0x8F, 0x6C, 0xEE, 0x6B, 0x27, 0xFA, 0x99, 0x95, 0x42, 0xAA, 0x92, 0x76, 0xB0, 0x19,
    0x13, 0x97,
];

/// Scramble the first 64 bytes of a finished file in place. Files shorter
/// than 64 bytes are left untouched.
pub fn scramble_header(bytes: &mut [u8]) {
    if bytes.len() < 64 {
        return;
    }
    let mut original = [0u8; 64];
    original.copy_from_slice(&bytes[..64]);
    for (i, out) in bytes[..64].iter_mut().enumerate() {
        *out = original[HEADER_PERMUTATION[i] as usize] ^ HEADER_XOR_KEY[i % HEADER_XOR_KEY.len()];
    }
}

/// Inverse of [`scramble_header`], for tooling and tests.
pub fn unscramble_header(bytes: &mut [u8]) {
    if bytes.len() < 64 {
        return;
    }
    let mut scrambled = [0u8; 64];
    scrambled.copy_from_slice(&bytes[..64]);
    for (i, &slot) in HEADER_PERMUTATION.iter().enumerate() {
        bytes[slot as usize] = scrambled[i] ^ HEADER_XOR_KEY[i % HEADER_XOR_KEY.len()];
    }
}
