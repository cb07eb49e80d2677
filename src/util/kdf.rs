// ============================================================================
// src/util/kdf.rs – PBKDF2-HMAC-SHA1 for WPA pre-shared keys
// ============================================================================

use crate::error::SoftapError;
use sha1::{Digest, Sha1};
use tracing::warn;
use zeroize::Zeroizing;

/// Iteration count the driver expects for passphrase-derived PSKs.
pub const PSK_ITERATIONS: u32 = 4096;
/// SHA-1 output size; also the PSK length carried in the AP_CFG command.
pub const SHA1_LEN: usize = 20;

const SHA1_BLOCK: usize = 64;

/// Binary key produced by [`derive`]. Wiped on drop.
pub struct DerivedKey(Zeroizing<Vec<u8>>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex, two characters per byte.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.as_bytes()))
    }
}

/// Stretch `passphrase` with `salt` (the SSID) into `output_len` bytes.
pub fn derive(
    passphrase: &str,
    salt: &str,
    iterations: u32,
    output_len: usize,
) -> Result<DerivedKey, SoftapError> {
    if passphrase.is_empty() {
        return Err(SoftapError::invalid_parameter("passphrase is empty"));
    }
    if salt.is_empty() {
        return Err(SoftapError::invalid_parameter("salt is empty"));
    }
    if iterations == 0 {
        return Err(SoftapError::invalid_parameter("iterations must be >= 1"));
    }
    if output_len == 0 {
        return Err(SoftapError::invalid_parameter("output length must be >= 1"));
    }

    let chars = passphrase.chars().count();
    if !(8..=63).contains(&chars) {
        warn!(
            length = chars,
            "passphrase outside the 8..=63 character WPA range; deriving anyway"
        );
    }

    let mut out = Zeroizing::new(vec![0u8; output_len]);
    pbkdf2_sha1(passphrase.as_bytes(), salt.as_bytes(), iterations, &mut out);
    Ok(DerivedKey(out))
}

fn pbkdf2_sha1(password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) {
    let mac = HmacSha1::new(password);
    let mut counter = 1u32;
    let mut generated = 0usize;

    while generated < out.len() {
        let block = pbkdf2_block(&mac, salt, iterations, counter);
        let take = (out.len() - generated).min(block.len());
        out[generated..generated + take].copy_from_slice(&block[..take]);
        generated += take;
        counter = counter.saturating_add(1);
    }
}

fn pbkdf2_block(
    mac: &HmacSha1,
    salt: &[u8],
    iterations: u32,
    counter: u32,
) -> Zeroizing<[u8; SHA1_LEN]> {
    let mut salt_counter = Vec::with_capacity(salt.len() + 4);
    salt_counter.extend_from_slice(salt);
    salt_counter.extend_from_slice(&counter.to_be_bytes());

    let mut u = Zeroizing::new(mac.compute(&salt_counter));
    let mut result = Zeroizing::new(*u);

    for _ in 1..iterations {
        *u = mac.compute(&*u);
        for (r, b) in result.iter_mut().zip(u.iter()) {
            *r ^= b;
        }
    }

    result
}

/// HMAC-SHA1 with the padded key absorbed once; each MAC clones the
/// prepared inner/outer states.
struct HmacSha1 {
    inner: Sha1,
    outer: Sha1,
}

impl HmacSha1 {
    fn new(key: &[u8]) -> Self {
        let mut key_block = Zeroizing::new([0u8; SHA1_BLOCK]);
        if key.len() > SHA1_BLOCK {
            let digest = Sha1::digest(key);
            key_block[..SHA1_LEN].copy_from_slice(&digest);
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut ipad = Zeroizing::new([0x36u8; SHA1_BLOCK]);
        let mut opad = Zeroizing::new([0x5cu8; SHA1_BLOCK]);
        for i in 0..SHA1_BLOCK {
            ipad[i] ^= key_block[i];
            opad[i] ^= key_block[i];
        }

        let mut inner = Sha1::new();
        inner.update(&*ipad);
        let mut outer = Sha1::new();
        outer.update(&*opad);
        Self { inner, outer }
    }

    fn compute(&self, data: &[u8]) -> [u8; SHA1_LEN] {
        let mut inner = self.inner.clone();
        inner.update(data);
        let inner_hash = inner.finalize();

        let mut outer = self.outer.clone();
        outer.update(inner_hash);
        let digest = outer.finalize();

        let mut out = [0u8; SHA1_LEN];
        out.copy_from_slice(&digest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_of(passphrase: &str, salt: &str, iterations: u32, len: usize) -> String {
        derive(passphrase, salt, iterations, len)
            .expect("derive")
            .to_hex()
            .to_string()
    }

    #[test]
    fn rfc6070_vectors() {
        assert_eq!(
            hex_of("password", "salt", 1, 20),
            "0c60c80f961f0e71f3a9b524af6012062fe037a6"
        );
        assert_eq!(
            hex_of("password", "salt", 2, 20),
            "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957"
        );
    }

    #[test]
    fn output_spanning_two_blocks() {
        assert_eq!(
            hex_of("password", "salt", 2, 25),
            "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957cae9313626"
        );
    }

    #[test]
    fn ieee_80211i_psk_prefix() {
        assert_eq!(
            hex_of("password", "IEEE", PSK_ITERATIONS, SHA1_LEN),
            "f42c6fc52df0ebef9ebb4b90b38a5f902e83fe1b"
        );
    }

    #[test]
    fn softap_known_answer() {
        assert_eq!(
            hex_of("secretpw", "MyNet", PSK_ITERATIONS, SHA1_LEN),
            "143e7333f30998a247b0e3cb0d11c2c1a22422b3"
        );
    }

    #[test]
    fn passphrase_longer_than_hash_block() {
        let long = "a".repeat(100);
        assert_eq!(
            hex_of(&long, "MyNet", PSK_ITERATIONS, SHA1_LEN),
            "3439678ce408d742273c40ce8954a442976e9388"
        );
    }

    #[test]
    fn derivation_is_deterministic_and_fixed_length() {
        let a = derive("correct horse", "HomeAP", PSK_ITERATIONS, SHA1_LEN).unwrap();
        let b = derive("correct horse", "HomeAP", PSK_ITERATIONS, SHA1_LEN).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes().len(), SHA1_LEN);
        assert_eq!(a.to_hex().len(), 2 * SHA1_LEN);
        assert!(a.to_hex().chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn rejects_out_of_contract_inputs() {
        for (pw, salt, iters, len) in [
            ("", "ssid", PSK_ITERATIONS, SHA1_LEN),
            ("password", "", PSK_ITERATIONS, SHA1_LEN),
            ("password", "ssid", 0, SHA1_LEN),
            ("password", "ssid", PSK_ITERATIONS, 0),
        ] {
            assert!(matches!(
                derive(pw, salt, iters, len),
                Err(SoftapError::InvalidParameter(_))
            ));
        }
    }
}
