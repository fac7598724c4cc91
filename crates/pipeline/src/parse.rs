//! Best-effort parsing of completion responses.
//!
//! Parsing never fails: a malformed response degrades to a shorter (possibly
//! empty) list. The orchestrator treats an empty list as a failed attempt.

/// Splits a title response into non-blank lines, order preserved.
pub fn parse_titles(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits a question response into lines that contain a question mark.
pub fn parse_questions(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| line.contains('?'))
        .map(str::to_string)
        .collect()
}
