//! Text encoding of an encrypted field value.

use std::fmt;

use super::cipher::CipherError;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of an AES-GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Separator between the three envelope segments.
pub const SEPARATOR: char = ':';

/// A parsed, encrypted field value.
///
/// The string representation is `<hex(nonce)>:<hex(tag)>:<hex(ciphertext)>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw authentication tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw ciphertext bytes, without the tag.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Parse an envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] unless `s` is exactly three hex
    /// segments with a [`NONCE_LEN`]-byte nonce and a [`TAG_LEN`]-byte tag.
    /// The ciphertext segment is empty for an encrypted empty string.
    pub fn parse(s: &str) -> Result<Self, CipherError> {
        let mut parts = s.split(SEPARATOR);
        let (Some(nonce_hex), Some(tag_hex), Some(ct_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(CipherError::InvalidFormat);
        };

        let mut nonce = [0u8; NONCE_LEN];
        hex::decode_to_slice(nonce_hex, &mut nonce).map_err(|_| CipherError::InvalidFormat)?;

        let mut tag = [0u8; TAG_LEN];
        hex::decode_to_slice(tag_hex, &mut tag).map_err(|_| CipherError::InvalidFormat)?;

        let ciphertext = hex::decode(ct_hex).map_err(|_| CipherError::InvalidFormat)?;

        Ok(Self {
            nonce,
            tag,
            ciphertext,
        })
    }

    /// Returns `true` if `s` has the structural shape of an envelope.
    ///
    /// This is a shape check only; it says nothing about whether the value
    /// authenticates under the current key.
    pub fn looks_encrypted(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            nonce: [0xab; NONCE_LEN],
            tag: [0x01; TAG_LEN],
            ciphertext: vec![0xde, 0xad, 0xbe, 0xef],
        }
    }

    #[test]
    fn display_is_lowercase_hex_with_three_segments() {
        let s = sample().to_string();
        let parts: Vec<&str> = s.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ab".repeat(NONCE_LEN));
        assert_eq!(parts[1], "01".repeat(TAG_LEN));
        assert_eq!(parts[2], "deadbeef");
    }

    #[test]
    fn parse_accepts_display_output() {
        let env = sample();
        assert_eq!(Envelope::parse(&env.to_string()).unwrap(), env);
    }

    #[test]
    fn parse_rejects_plain_text() {
        assert!(Envelope::parse("notencrypted").is_err());
    }

    #[test]
    fn parse_rejects_two_segments() {
        assert!(Envelope::parse("abc123:def456").is_err());
    }

    #[test]
    fn parse_rejects_four_segments() {
        let s = format!("{}:extra", sample());
        assert!(Envelope::parse(&s).is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(Envelope::parse("nonhex:nonhex:nonhex").is_err());
    }

    #[test]
    fn parse_rejects_wrong_nonce_length() {
        let s = format!("{}:{}:00", "ab".repeat(8), "01".repeat(TAG_LEN));
        assert!(Envelope::parse(&s).is_err());
    }

    #[test]
    fn parse_rejects_wrong_tag_length() {
        let s = format!("{}:{}:00", "ab".repeat(NONCE_LEN), "01".repeat(12));
        assert!(Envelope::parse(&s).is_err());
    }

    #[test]
    fn parse_accepts_empty_ciphertext() {
        let s = format!("{}:{}:", "ab".repeat(NONCE_LEN), "01".repeat(TAG_LEN));
        let env = Envelope::parse(&s).unwrap();
        assert!(env.ciphertext.is_empty());
        assert_eq!(env.to_string(), s);
    }

    #[test]
    fn parse_rejects_empty_nonce_or_tag() {
        assert!(Envelope::parse(&format!(":{}:00", "01".repeat(TAG_LEN))).is_err());
        assert!(Envelope::parse(&format!("{}::00", "ab".repeat(NONCE_LEN))).is_err());
    }

    #[test]
    fn parse_rejects_odd_length_hex() {
        let s = format!("{}:{}:abc", "ab".repeat(NONCE_LEN), "01".repeat(TAG_LEN));
        assert!(Envelope::parse(&s).is_err());
    }

    #[test]
    fn looks_encrypted_is_shape_only() {
        assert!(Envelope::looks_encrypted(&sample().to_string()));
        assert!(!Envelope::looks_encrypted("12:30 meeting: lunch"));
    }
}
