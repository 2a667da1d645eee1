//! Cookie value codecs.
//!
//! A codec authenticates (and optionally encrypts) the session ID carried in
//! a cookie. Stores hold an ordered list of codecs: the first encodes, all are
//! tried on decode, so a new key can be rolled in ahead of the old one.
//!
//! [`SecureCookie`] wire format, base64url without padding:
//!
//! ```text
//! base64url( timestamp "|" base64url(payload) "|" base64url(hmac) )
//! ```
//!
//! The HMAC-SHA256 covers `name|timestamp|base64url(payload)`, binding the
//! value to the cookie name. With a block key, `payload` is
//! `nonce || AES-256-GCM(value)`.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::error::CodecError;
use crate::session::SESSION_EXPIRE;

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 12;

/// Length in bytes of a block key.
pub const BLOCK_KEY_LEN: usize = 32;

/// Encodes and decodes cookie values.
pub trait CookieCodec: Send + Sync {
    fn encode(&self, name: &str, value: &str) -> Result<String, CodecError>;

    fn decode(&self, name: &str, value: &str) -> Result<String, CodecError>;

    /// Bounds how old a decodable value may be. Returns false if the codec
    /// has no notion of age.
    fn set_max_age(&mut self, _max_age: i64) -> bool {
        false
    }
}

// == Secure Cookie ==
/// HMAC-signed, timestamped, optionally encrypted cookie codec.
pub struct SecureCookie {
    hash_key: Vec<u8>,
    block: Option<Aes256Gcm>,
    max_age: i64,
    min_age: i64,
}

impl SecureCookie {
    /// Creates a codec from a hash key and an optional 32-byte block key.
    pub fn new(hash_key: &[u8], block_key: Option<&[u8]>) -> Result<Self, CodecError> {
        if hash_key.is_empty() {
            return Err(CodecError::InvalidKey("hash key is empty".to_string()));
        }

        let block = match block_key {
            Some(key) if !key.is_empty() => {
                if key.len() != BLOCK_KEY_LEN {
                    return Err(CodecError::InvalidKey(format!(
                        "block key must be {} bytes, got {}",
                        BLOCK_KEY_LEN,
                        key.len()
                    )));
                }
                let cipher = <Aes256Gcm as KeyInit>::new_from_slice(key)
                    .map_err(|e| CodecError::InvalidKey(e.to_string()))?;
                Some(cipher)
            }
            _ => None,
        };

        Ok(Self {
            hash_key: hash_key.to_vec(),
            block,
            max_age: SESSION_EXPIRE,
            min_age: 0,
        })
    }

    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    /// Rejects values younger than `min_age` seconds. 0, the default,
    /// accepts any timestamp not older than max-age, including ones slightly
    /// ahead of this host's clock.
    pub fn set_min_age(&mut self, min_age: i64) {
        self.min_age = min_age;
    }

    fn mac(&self, name: &str, timestamp: i64, payload: &str) -> Result<HmacSha256, CodecError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.hash_key)
            .map_err(|e| CodecError::InvalidKey(e.to_string()))?;
        mac.update(format!("{}|{}|{}", name, timestamp, payload).as_bytes());
        Ok(mac)
    }

    fn encrypt(&self, plain: &[u8]) -> Result<Vec<u8>, CodecError> {
        let Some(cipher) = &self.block else {
            return Ok(plain.to_vec());
        };
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = cipher
            .encrypt(&nonce, plain)
            .map_err(|_| CodecError::Encryption)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        let Some(cipher) = &self.block else {
            return Ok(data.to_vec());
        };
        if data.len() < NONCE_LEN {
            return Err(CodecError::Decryption);
        }
        let (nonce, sealed) = data.split_at(NONCE_LEN);
        cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CodecError::Decryption)
    }

    fn encode_at(&self, name: &str, value: &str, timestamp: i64) -> Result<String, CodecError> {
        let payload = URL_SAFE_NO_PAD.encode(self.encrypt(value.as_bytes())?);
        let signature = self.mac(name, timestamp, &payload)?.finalize().into_bytes();

        let body = format!(
            "{}|{}|{}",
            timestamp,
            payload,
            URL_SAFE_NO_PAD.encode(signature)
        );
        Ok(URL_SAFE_NO_PAD.encode(body))
    }

    fn decode_at(&self, name: &str, value: &str, now: i64) -> Result<String, CodecError> {
        let raw = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|e| CodecError::Malformed(e.to_string()))?;
        let body = String::from_utf8(raw).map_err(|e| CodecError::Malformed(e.to_string()))?;

        let mut parts = body.splitn(3, '|');
        let (Some(ts), Some(payload), Some(signature)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(CodecError::Malformed("expected three fields".to_string()));
        };
        let timestamp: i64 = ts
            .parse()
            .map_err(|_| CodecError::Malformed("invalid timestamp".to_string()))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| CodecError::Malformed(e.to_string()))?;

        self.mac(name, timestamp, payload)?
            .verify_slice(&signature)
            .map_err(|_| CodecError::InvalidSignature)?;

        if self.min_age != 0 && timestamp > now - self.min_age {
            return Err(CodecError::TimestampTooNew);
        }
        if self.max_age > 0 && timestamp < now - self.max_age {
            return Err(CodecError::Expired);
        }

        let sealed = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| CodecError::Malformed(e.to_string()))?;
        let plain = self.decrypt(&sealed)?;
        String::from_utf8(plain).map_err(|e| CodecError::Malformed(e.to_string()))
    }
}

impl CookieCodec for SecureCookie {
    fn encode(&self, name: &str, value: &str) -> Result<String, CodecError> {
        self.encode_at(name, value, chrono::Utc::now().timestamp())
    }

    fn decode(&self, name: &str, value: &str) -> Result<String, CodecError> {
        self.decode_at(name, value, chrono::Utc::now().timestamp())
    }

    fn set_max_age(&mut self, max_age: i64) -> bool {
        self.max_age = max_age;
        true
    }
}

// == Helpers ==
/// Builds one [`SecureCookie`] per (hash key, block key) pair.
///
/// Keys are read two at a time; a trailing hash key without a block key, or
/// an empty block key, yields a signing-only codec.
pub fn codecs_from_pairs<K: AsRef<[u8]>>(
    keys: &[K],
) -> Result<Vec<Box<dyn CookieCodec>>, CodecError> {
    keys.chunks(2)
        .map(|pair| {
            let block: Option<&[u8]> = pair.get(1).map(|k| k.as_ref());
            SecureCookie::new(pair[0].as_ref(), block).map(|c| Box::new(c) as Box<dyn CookieCodec>)
        })
        .collect()
}

/// Encodes with the first codec.
pub fn encode_multi(
    name: &str,
    value: &str,
    codecs: &[Box<dyn CookieCodec>],
) -> Result<String, CodecError> {
    codecs
        .first()
        .ok_or(CodecError::NoCodecs)?
        .encode(name, value)
}

/// Tries every codec in order; the first successful decode wins.
pub fn decode_multi(
    name: &str,
    value: &str,
    codecs: &[Box<dyn CookieCodec>],
) -> Result<String, CodecError> {
    let mut last = CodecError::NoCodecs;
    for codec in codecs {
        match codec.decode(name, value) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => last = e,
        }
    }
    Err(last)
}

/// Returns `len` bytes from the OS-seeded thread RNG.
pub fn generate_random_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut key);
    key
}
