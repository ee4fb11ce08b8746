//! CSRF state nonce generation.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of the `state` value round-tripped through the provider redirect.
pub const STATE_LENGTH: usize = 16;

/// Generate a random state string for CSRF protection.
///
/// Drawn from the 62-symbol alphanumeric alphabet so the value needs no
/// escaping in a query string or a cookie. This is a double-submit check,
/// not key material.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(STATE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_length() {
        assert_eq!(generate_state().len(), STATE_LENGTH);
    }

    #[test]
    fn test_state_alphabet() {
        for _ in 0..50 {
            let state = generate_state();
            assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_state_uniqueness() {
        let a = generate_state();
        let b = generate_state();
        assert_ne!(a, b);
    }
}
