//! Windows-1252 byte/string conversion.
//!
//! Every input file (scripts, language files, plugin descriptors) is decoded
//! as code page 1252, and every string written into a binary artifact is
//! encoded back the same way. Round-tripping is lossless for text that came
//! in through [`decode`].

use encoding_rs::WINDOWS_1252;

/// Decode raw file bytes as Windows-1252.
pub fn decode(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Encode a string as Windows-1252 bytes.
///
/// Characters outside the code page are replaced with `?`, matching the
/// historical tool's behavior for unrepresentable input.
pub fn encode(text: &str) -> Vec<u8> {
    let (bytes, _, _) = WINDOWS_1252.encode(text);
    bytes.into_owned()
}

/// Byte length of a string once encoded as Windows-1252.
pub fn byte_len(text: &str) -> usize {
    encode(text).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_round_trip() {
        let bytes = b"Load Game".to_vec();
        let text = decode(&bytes);
        assert_eq!(text, "Load Game");
        assert_eq!(encode(&text), bytes);
    }

    #[test]
    fn test_high_bytes_round_trip() {
        // 0xE9 is e-acute in CP-1252, 0x80 is the euro sign.
        let bytes = vec![0xE9, 0x80, 0xA3];
        let text = decode(&bytes);
        assert_eq!(text, "\u{e9}\u{20ac}\u{a3}");
        assert_eq!(encode(&text), bytes);
    }

    #[test]
    fn test_byte_len_counts_encoded_bytes() {
        assert_eq!(byte_len("abc"), 3);
        assert_eq!(byte_len("caf\u{e9}"), 4);
    }
}
