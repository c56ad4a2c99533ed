use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// URL-safe, unpadded base64 of the decimal user id.
pub fn encode_uid(id: i32) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

pub fn decode_uid(uidb64: &str) -> Option<i32> {
    let bytes = URL_SAFE_NO_PAD.decode(uidb64).ok()?;
    std::str::from_utf8(&bytes).ok()?.parse().ok()
}
