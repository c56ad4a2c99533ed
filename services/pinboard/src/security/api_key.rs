use rand::RngExt;

/// API key length in hex characters.
pub const API_KEY_LEN: usize = 40;

const HEX: &[u8] = b"0123456789abcdef";

pub fn generate_api_key() -> String {
    let mut rng = rand::rng();
    (0..API_KEY_LEN)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect()
}
