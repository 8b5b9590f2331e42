//! Identifier resolution for magnet submissions.

use data_encoding::{BASE32, HEXUPPER};
use url::Url;

use crate::error::{QueueError, QueueResult};

const BTIH_PREFIX: &str = "urn:btih:";
const INFO_HASH_LEN: usize = 20;

#[must_use]
/// Whether the release URL is a magnet link rather than a metainfo download.
pub fn is_magnet(url: &str) -> bool {
    url.trim()
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("magnet:"))
}

/// Extract the info hash from a magnet URI as 40 uppercase hex digits.
///
/// Accepts hex (40 chars) and base32 (32 chars) `btih` encodings. Tracker,
/// display-name and other parameters are ignored.
///
/// # Errors
///
/// Returns [`QueueError::InvalidReleaseUrl`] when the URI cannot be parsed or
/// carries no valid `btih` parameter.
pub fn info_hash_from_magnet(uri: &str) -> QueueResult<String> {
    let invalid = || QueueError::InvalidReleaseUrl {
        url: uri.to_string(),
    };

    let parsed = Url::parse(uri.trim()).map_err(|_| invalid())?;
    if !parsed.scheme().eq_ignore_ascii_case("magnet") {
        return Err(invalid());
    }

    parsed
        .query_pairs()
        .filter(|(key, _)| key == "xt")
        .find_map(|(_, value)| decode_btih(&value))
        .ok_or_else(invalid)
}

/// Uppercase an identifier echoed back by the daemon.
#[must_use]
pub fn normalize_hash(hash: &str) -> String {
    hash.trim().to_ascii_uppercase()
}

fn decode_btih(topic: &str) -> Option<String> {
    let prefix = topic.get(..BTIH_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(BTIH_PREFIX) {
        return None;
    }
    let encoded = topic[BTIH_PREFIX.len()..].to_ascii_uppercase();

    let bytes = match encoded.len() {
        40 => HEXUPPER.decode(encoded.as_bytes()).ok()?,
        32 => BASE32.decode(encoded.as_bytes()).ok()?,
        _ => return None,
    };

    (bytes.len() == INFO_HASH_LEN).then(|| HEXUPPER.encode(&bytes))
}
