pub const MAX_PARAM_CHARS: usize = 255;

const DANGEROUS_PATTERNS: [&str; 8] = ["../", "..\\", "\0", "<?php", "?>", "--", "/*", "*/"];

/// Cleans a captured route parameter before any handler sees it.
///
/// The value is cut to [`MAX_PARAM_CHARS`] characters, every dangerous
/// substring is removed (ignoring ASCII case) until none is left, and `<`, `>`
/// and `&` are entity-encoded. Quotes are left alone. Entities that are
/// already present are not encoded a second time, so sanitizing a sanitized
/// value returns it unchanged.
pub fn sanitize_param(value: &str) -> String {
    let truncated: String = value.chars().take(MAX_PARAM_CHARS).collect();

    let stripped = strip_dangerous(truncated);

    let encoded = encode_html(&stripped);

    truncate_encoded(encoded, MAX_PARAM_CHARS)
}

fn strip_dangerous(mut value: String) -> String {
    // removing one pattern can join its neighbours into another, e.g. "....//"
    loop {
        let mut next = value.clone();
        for pattern in DANGEROUS_PATTERNS {
            next = remove_ignore_ascii_case(&next, pattern);
        }
        if next == value {
            return value;
        }
        value = next;
    }
}

fn remove_ignore_ascii_case(haystack: &str, needle: &str) -> String {
    let needle = needle.as_bytes();
    let bytes = haystack.as_bytes();

    let mut result = String::with_capacity(haystack.len());
    let mut copy_from = 0;
    let mut i = 0;

    while i + needle.len() <= bytes.len() {
        if bytes[i..i + needle.len()].eq_ignore_ascii_case(needle) {
            // needles are ASCII, so both ends of a hit are char boundaries
            result.push_str(&haystack[copy_from..i]);
            i += needle.len();
            copy_from = i;
        } else {
            i += 1;
        }
    }
    result.push_str(&haystack[copy_from..]);

    result
}

fn encode_html(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());

    for (index, c) in value.char_indices() {
        match c {
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '&' if starts_with_entity(&value[index..]) => encoded.push('&'),
            '&' => encoded.push_str("&amp;"),
            _ => encoded.push(c),
        }
    }

    encoded
}

fn starts_with_entity(value: &str) -> bool {
    let Some(rest) = value.strip_prefix('&') else {
        return false;
    };

    for named in ["amp;", "lt;", "gt;", "quot;"] {
        if rest.starts_with(named) {
            return true;
        }
    }

    let Some(numeric) = rest.strip_prefix('#') else {
        return false;
    };

    let (digits, is_digit): (&str, fn(&char) -> bool) =
        match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, char::is_ascii_hexdigit),
            None => (numeric, char::is_ascii_digit),
        };

    let digit_count = digits.chars().take_while(is_digit).count();

    digit_count > 0 && digits[digit_count..].starts_with(';')
}

fn truncate_encoded(encoded: String, max_chars: usize) -> String {
    let Some((cut, _)) = encoded.char_indices().nth(max_chars) else {
        return encoded;
    };

    let kept = &encoded[..cut];

    // never leave half an entity behind
    match kept.rfind('&') {
        Some(amp) if !kept[amp..].contains(';') => kept[..amp].to_owned(),
        _ => kept.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn assert_safe(value: &str) {
        assert!(value.chars().count() <= MAX_PARAM_CHARS, "too long: {}", value);
        let lower = value.to_ascii_lowercase();
        for pattern in DANGEROUS_PATTERNS {
            assert!(!lower.contains(pattern), "{:?} contains {:?}", value, pattern);
        }
        assert!(!value.contains('<'));
        assert!(!value.contains('>'));
    }

    #[test]
    fn plain_values_pass_through() {
        assert_eq!(sanitize_param("42"), "42");
        assert_eq!(sanitize_param("hello-world"), "hello-world");
        assert_eq!(sanitize_param("用户详情"), "用户详情");
        assert_eq!(sanitize_param("it's \"quoted\""), "it's \"quoted\"");
    }

    #[test]
    fn strips_traversal_and_code_markers() {
        assert_eq!(sanitize_param("../etc/passwd"), "etc/passwd");
        assert_eq!(sanitize_param("..\\windows"), "windows");
        assert_eq!(sanitize_param("<?PHP echo 1; ?>"), " echo 1; ");
        assert_eq!(sanitize_param("1--comment"), "1comment");
        assert_eq!(sanitize_param("a/*b*/c"), "abc");
        assert_eq!(sanitize_param("nul\0byte"), "nulbyte");
    }

    #[test]
    fn stripping_runs_until_nothing_dangerous_is_left() {
        assert_eq!(sanitize_param("....//secret"), "secret");
        assert_eq!(sanitize_param("<?p<?phphp"), "");
        assert_eq!(sanitize_param("---"), "-");
    }

    #[test]
    fn encodes_markup_but_not_quotes() {
        assert_eq!(
            sanitize_param("<script>alert('x')</script>"),
            "&lt;script&gt;alert('x')&lt;/script&gt;"
        );
        assert_eq!(sanitize_param("fish & chips"), "fish &amp; chips");
    }

    #[test]
    fn existing_entities_are_not_encoded_twice() {
        assert_eq!(sanitize_param("&amp; &lt; &#39; &#x27;"), "&amp; &lt; &#39; &#x27;");
        assert_eq!(sanitize_param("&#;"), "&amp;#;");
    }

    #[test]
    fn truncates_to_limit() {
        let long = "x".repeat(1000);
        assert_eq!(sanitize_param(&long).len(), MAX_PARAM_CHARS);

        let multibyte = "é".repeat(300);
        assert_eq!(sanitize_param(&multibyte).chars().count(), MAX_PARAM_CHARS);
    }

    #[test]
    fn truncation_after_encoding_keeps_entities_whole() {
        let value = format!("{}<", "a".repeat(MAX_PARAM_CHARS - 2));
        let sanitized = sanitize_param(&value);
        assert_eq!(sanitized, "a".repeat(MAX_PARAM_CHARS - 2));
        assert_safe(&sanitized);
    }

    proptest! {
        #[test]
        fn sanitized_values_are_safe(
            value in "(\\.\\./|\\.\\.\\\\|<\\?php|<\\?PhP|\\?>|--|/\\*|\\*/|\\.|/|-|<|>|&|;|[a-z0-9 ]|é){0,400}"
        ) {
            let sanitized = sanitize_param(&value);
            assert_safe(&sanitized);
        }

        #[test]
        fn sanitizing_is_idempotent(
            value in "(\\.\\./|<\\?php|\\?>|--|/\\*|\\*/|&amp;|&lt;|&#3[0-9];|&|<|>|;|#|[a-z0-9 ]){0,400}"
        ) {
            let once = sanitize_param(&value);
            let twice = sanitize_param(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
