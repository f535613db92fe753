//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use rand::Rng;

/// Generate a human-readable booking reference, e.g. `TB-7K2M9QX4`.
///
/// Ambiguous characters (0/O, 1/I) are excluded so the reference survives
/// being read over the phone.
pub fn generate_booking_reference() -> String {
    const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let code: String = (0..8)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("TB-{}", code)
}

/// Derive a URL slug from a title
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        && phone.chars().filter(|c| c.is_ascii_digit()).count() >= 7
}

/// Calculate pagination offset
pub fn calculate_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1) * page_size
}

/// Format integer minor units as a decimal amount string, e.g. 149900 -> "1499.00"
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_reference_shape() {
        let reference = generate_booking_reference();
        assert!(reference.starts_with("TB-"));
        assert_eq!(reference.len(), 11);
        assert!(!reference.contains('0'));
        assert!(!reference.contains('O'));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Annapurna Base Camp Trek"), "annapurna-base-camp-trek");
        assert_eq!(slugify("  Sahara -- 4x4! "), "sahara-4x4");
        assert_eq!(slugify("Český Krumlov"), "esk-krumlov");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("traveler@example.com"));
        assert!(!is_valid_email("traveler@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("no-at-sign"));
    }

    #[test]
    fn test_calculate_offset() {
        assert_eq!(calculate_offset(1, 20), 0);
        assert_eq!(calculate_offset(3, 20), 40);
        assert_eq!(calculate_offset(0, 20), 0);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(149900), "1499.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-250), "-2.50");
    }
}
