use sha2::{Digest, Sha256};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(data);
    let out = h.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}

/// Key fingerprint: sha256(public_key_bytes), hex encoded.
pub fn fingerprint(public_key: &[u8]) -> String {
    hex::encode(sha256(public_key))
}

/// First 8 bytes of the fingerprint, for log lines and table columns.
pub fn short_fingerprint(public_key: &[u8]) -> String {
    hex::encode(&sha256(public_key)[..8])
}
