use super::FunctionError;
use regex::bytes::{Regex, RegexBuilder};

/// Whether `needle` occurs as a contiguous run inside `haystack`. An empty needle always matches.
#[must_use]
pub fn bcontains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|window| window == needle)
}

/// Whether `pattern` matches anywhere within `haystack`.
///
/// Bodies are often not UTF-8 (GBK, Latin-1, binary), so the pattern is first compiled
/// byte-oriented: `.` and negated classes match any byte, while literal text in the pattern
/// still matches its UTF-8 encoding. Perl classes (`\w`, `\d`, `\s`) and `(?i)` are ASCII-only
/// in that mode. Patterns that need Unicode, such as non-ASCII characters inside a bracket
/// class, are compiled Unicode-aware instead.
///
/// # Errors
///
/// Returns an error if `pattern` is not a valid regular expression.
pub fn bmatchs(pattern: &str, haystack: &[u8]) -> Result<bool, FunctionError> {
    let re = RegexBuilder::new(pattern)
        .unicode(false)
        .build()
        .or_else(|_| Regex::new(pattern))
        .map_err(|source| FunctionError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

    Ok(re.is_match(haystack))
}
