use crate::config::Lang;

/// Characters of the text folded into the fingerprint
const SAMPLE_CHARS: usize = 200;

/// Namespace prefix so translation entries never clash with other users of
/// the same store
const NAMESPACE: &str = "translate";

/// Cache key for translated text.
///
/// The text component is a cheap order-sensitive rolling hash over at most
/// the first 200 characters, folded to 32 bits. It is a cache-hit
/// optimization, not a content identifier: two long texts sharing a
/// 200-character prefix and target language map to the same key. That
/// collision window is accepted by design.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
}

impl CacheKey {
    pub fn new(text: &str, target: &Lang) -> Self {
        Self {
            key: format!("{}:{:08x}:{}", NAMESPACE, fingerprint(text), target.as_str()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Multiply-and-add rolling hash over the sample, wrapping at 32 bits.
fn fingerprint(text: &str) -> u32 {
    let mut hash: u32 = 0;
    for c in text.chars().take(SAMPLE_CHARS) {
        hash = hash.wrapping_mul(31).wrapping_add(c as u32);
    }
    hash
}
