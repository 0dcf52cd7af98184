//! Initial password generation for new accounts

use rand::rngs::OsRng;
use rand::Rng;

/// Default length of generated passwords
pub const DEFAULT_PASSWORD_LENGTH: usize = 24;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random password of `length` ASCII letters and digits
///
/// Characters are drawn uniformly with replacement from the operating
/// system's CSPRNG. Accounts get this password with `must_change_password`
/// set, so it is never meant to be remembered.
pub fn generate_password(length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[OsRng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_has_requested_length() {
        for length in [0, 1, 8, DEFAULT_PASSWORD_LENGTH, 100] {
            assert_eq!(generate_password(length).len(), length);
        }
    }

    #[test]
    fn test_password_is_alphanumeric() {
        let password = generate_password(512);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_passwords_differ() {
        assert_ne!(
            generate_password(DEFAULT_PASSWORD_LENGTH),
            generate_password(DEFAULT_PASSWORD_LENGTH)
        );
    }
}
