use std::fmt;

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Standard alphabet with canonical padding. Non-zero trailing bits are
/// tolerated the way most base64 decoders do, so `AB==` decodes to `[0]`.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decoded shared access key.
///
/// Only lives as long as one token computation; `Debug` reports the length
/// and nothing else.
pub struct SigningKey {
    bytes: Vec<u8>,
}

impl SigningKey {
    /// Decodes a standard (padded, `+` and `/`) base64 key as shown on the
    /// portal for an enrollment or shared access policy.
    pub fn from_base64(key: &str) -> Result<Self> {
        let bytes = KEY_ENGINE
            .decode(key.trim())
            .map_err(|_| Error::MalformedKey("not valid base64"))?;

        if bytes.is_empty() {
            return Err(Error::MalformedKey("decodes to zero bytes"));
        }

        Ok(SigningKey { bytes })
    }

    fn mac(&self, message: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.bytes)
            .map_err(|_| Error::MalformedKey("rejected by HMAC"))?;
        mac.update(message);
        Ok(mac)
    }

    /// HMAC-SHA256 of `message`, 32 bytes.
    pub fn sign(&self, message: &str) -> Result<Vec<u8>> {
        let mac = self.mac(message.as_bytes())?;
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Constant-time check of `signature` against `message`.
    pub fn verify(&self, message: &str, signature: &[u8]) -> Result<bool> {
        let mac = self.mac(message.as_bytes())?;
        Ok(mac.verify_slice(signature).is_ok())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
