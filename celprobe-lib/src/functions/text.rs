use super::FunctionError;

const INVALID_RANGE: FunctionError = FunctionError::InvalidArgument {
    function: "substr",
    reason: "invalid start or length",
};

/// The `length` characters of `s` starting at character index `start`.
///
/// # Errors
///
/// Returns an error if `start` or `length` is negative, or if the range extends past the
/// last character.
pub fn substr(s: &str, start: i64, length: i64) -> Result<String, FunctionError> {
    let start = usize::try_from(start).ok().ok_or(INVALID_RANGE)?;
    let length = usize::try_from(length).ok().ok_or(INVALID_RANGE)?;
    let end = start.checked_add(length).ok_or(INVALID_RANGE)?;

    if end > s.chars().count() {
        return Err(INVALID_RANGE);
    }

    Ok(s.chars().skip(start).take(length).collect())
}
