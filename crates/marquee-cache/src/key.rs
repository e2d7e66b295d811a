use sha2::{Digest, Sha256};

/// Fingerprint an upstream request for use as a cache key.
///
/// Equal targets with equal parameter sets hash to the same fingerprint no
/// matter what order the parameters arrive in — pairs are sorted by name
/// before hashing. Every field is length-prefixed so adjacent fields cannot
/// collide by sliding bytes across a separator.
pub fn request_key<'a, I>(target: &str, params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = params.into_iter().collect();
    pairs.sort_unstable();

    let mut hasher = Sha256::new();
    hasher.update((target.len() as u64).to_le_bytes());
    hasher.update(target.as_bytes());
    for (name, value) in pairs {
        hasher.update((name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
