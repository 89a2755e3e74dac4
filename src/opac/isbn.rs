//! ISBN canonicalization and checksum validation
//!
//! Two strictness levels exist on purpose: storage-key lookups use
//! [`canonicalize`] alone (length check only, so a checksum-invalid ISBN
//! already in the catalog stays reachable), while the acquisition pipeline
//! requires [`validate`] to pass before any network traffic.

/// Strip every character that is not a digit or `X`/`x`, uppercasing a
/// trailing `x`. Returns `None` unless the result is 10 or 13 characters.
pub fn canonicalize(input: &str) -> Option<String> {
    let mut chars: Vec<char> = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect();
    if let Some(last) = chars.last_mut() {
        if *last == 'x' {
            *last = 'X';
        }
    }
    let isbn: String = chars.into_iter().collect();
    match isbn.len() {
        10 | 13 => Some(isbn),
        _ => None,
    }
}

/// Canonicalize and checksum-validate. Returns the canonical form on
/// success, `None` on any structural or checksum failure.
pub fn validate(input: &str) -> Option<String> {
    let isbn = canonicalize(input)?;
    let valid = match isbn.len() {
        10 => is_valid_isbn10(&isbn),
        13 => is_valid_isbn13(&isbn),
        _ => false,
    };
    valid.then_some(isbn)
}

fn is_valid_isbn10(isbn: &str) -> bool {
    let chars: Vec<char> = isbn.chars().collect();
    if chars.len() != 10 {
        return false;
    }
    let mut total: u32 = 0;
    for (i, c) in chars[..9].iter().enumerate() {
        match c.to_digit(10) {
            Some(d) => total += (i as u32 + 1) * d,
            // 'X' is only legal as the check digit
            None => return false,
        }
    }
    let check_char = match 11 - (total % 11) {
        10 => 'X',
        11 => '0',
        n => char::from_digit(n, 10).unwrap_or('?'),
    };
    chars[9] == check_char
}

fn is_valid_isbn13(isbn: &str) -> bool {
    if !isbn.starts_with("978") && !isbn.starts_with("979") {
        return false;
    }
    let digits: Vec<u32> = match isbn.chars().map(|c| c.to_digit(10)).collect() {
        Some(d) => d,
        None => return false,
    };
    if digits.len() != 13 {
        return false;
    }
    let total: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| (i as u32 % 2 * 2 + 1) * d)
        .sum();
    let check = (10 - total % 10) % 10;
    digits[12] == check
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_strips_hyphens() {
        assert_eq!(
            canonicalize("978-7-5658-0227-0").as_deref(),
            Some("9787565802270")
        );
    }

    #[test]
    fn canonicalize_uppercases_trailing_x() {
        assert_eq!(canonicalize("7-309-04549-x").as_deref(), Some("730904549X"));
    }

    #[test]
    fn canonicalize_rejects_bad_lengths() {
        assert_eq!(canonicalize("12345"), None);
        assert_eq!(canonicalize(""), None);
        assert_eq!(canonicalize("978756580227"), None); // 12 digits
    }

    #[test]
    fn validate_accepts_known_isbn13() {
        assert_eq!(
            validate("978-7-5658-0227-0").as_deref(),
            Some("9787565802270")
        );
        assert_eq!(validate("9787519430238").as_deref(), Some("9787519430238"));
    }

    #[test]
    fn validate_rejects_mutated_check_digit() {
        assert!(validate("9787565802270").is_some());
        assert_eq!(validate("9787565802271"), None);
    }

    #[test]
    fn validate_rejects_wrong_isbn13_prefix() {
        // Structurally fine but not a 978/979 bookland prefix
        assert_eq!(validate("1234567890128"), None);
    }

    #[test]
    fn validate_accepts_isbn10_with_x_check() {
        assert_eq!(validate("7-309-04549-X").as_deref(), Some("730904549X"));
    }

    #[test]
    fn validate_accepts_plain_isbn10() {
        assert_eq!(validate("7115139350").as_deref(), Some("7115139350"));
    }

    #[test]
    fn validate_rejects_x_in_isbn10_body() {
        assert_eq!(validate("7X0904547X"), None);
    }

    #[test]
    fn validate_rejects_bad_isbn10_checksum() {
        assert_eq!(validate("7115139351"), None);
    }
}
