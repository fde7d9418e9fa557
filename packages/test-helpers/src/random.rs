use rand::distributions::{Alphanumeric, Standard};
use rand::{thread_rng, Rng};

/// Random alphanumeric string, used to name temporary directories.
#[must_use]
pub fn string(size: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(size).map(char::from).collect()
}

/// Random file content.
#[must_use]
pub fn bytes(size: usize) -> Vec<u8> {
    thread_rng().sample_iter(Standard).take(size).collect()
}

/// Random 20 bytes, usable as an info hash.
#[must_use]
pub fn info_hash_bytes() -> [u8; 20] {
    thread_rng().gen()
}
