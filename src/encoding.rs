use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except ASCII alphanumerics and `-._` is escaped. Space is
/// handled separately in [`quote_plus`].
const QUOTE_PLUS: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

/// Form-encodes a single value: spaces become `+`, reserved characters
/// (including `/`, `+`, `=` and `~`) become `%XX`.
///
/// The same rule feeds both the string-to-sign and the serialized token.
pub(crate) fn quote_plus(input: &str) -> String {
    input
        .split(' ')
        .map(|part| utf8_percent_encode(part, QUOTE_PLUS).to_string())
        .collect::<Vec<_>>()
        .join("+")
}

#[cfg(test)]
mod tests {
    use super::quote_plus;

    #[test]
    fn keeps_unreserved() {
        assert_eq!(quote_plus("abc-XYZ_0.9"), "abc-XYZ_0.9");
    }

    #[test]
    fn escapes_path_separator() {
        assert_eq!(
            quote_plus("scope/registrations/dev1"),
            "scope%2Fregistrations%2Fdev1"
        );
    }

    #[test]
    fn space_becomes_plus() {
        assert_eq!(quote_plus(" a  b "), "+a++b+");
    }

    #[test]
    fn escapes_base64_alphabet() {
        assert_eq!(quote_plus("a+b/c=="), "a%2Bb%2Fc%3D%3D");
    }

    #[test]
    fn escapes_tilde_and_star() {
        assert_eq!(quote_plus("x~y*z"), "x%7Ey%2Az");
    }

    #[test]
    fn escapes_utf8_bytes() {
        assert_eq!(quote_plus("é"), "%C3%A9");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(quote_plus(""), "");
    }
}
