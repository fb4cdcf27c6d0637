//! WhatsApp click-to-chat links.

/// Country prefix that replaces a trunk `0`.
pub const COUNTRY_CODE: &str = "27";

/// Reduce a phone number to its international digits.
///
/// Non-digits are dropped and a leading `0` becomes [`COUNTRY_CODE`].
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix('0') {
        Some(rest) => format!("{}{}", COUNTRY_CODE, rest),
        None => digits,
    }
}

/// Build a `wa.me` link that opens a chat with `text` pre-filled.
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        normalize_phone(phone),
        urlencoding::encode(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("082 123 4567"), "27821234567");
        assert_eq!(normalize_phone("+27 82-123-4567"), "27821234567");
        assert_eq!(normalize_phone("27821234567"), "27821234567");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_whatsapp_link() {
        assert_eq!(
            whatsapp_link("0821234567", "Hi Jane & co"),
            "https://wa.me/27821234567?text=Hi%20Jane%20%26%20co"
        );
    }
}
