//! Correlation id generation

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of generated correlation ids
pub const CORRELATION_ID_LEN: usize = 8;

/// Generate a short random correlation id.
///
/// Ids are lowercase alphanumeric, so they can never collide with the `$__`
/// sentinel ids. Uniqueness only needs to hold within one host session.
pub fn generate_correlation_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CORRELATION_ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
