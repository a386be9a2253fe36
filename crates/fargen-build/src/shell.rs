//! POSIX shell quoting for commands embedded in buildspec documents.
//!
//! The buildspec's post-build phase writes an image-definitions JSON file
//! through `printf`, so the JSON payload travels inside a shell word. The
//! payload is always full of double quotes, and descriptions may contain
//! anything, so the word is single-quoted and embedded single quotes are
//! rewritten as `'\''` (close quote, escaped quote, reopen quote).

/// Wrap `s` in single quotes, escaping embedded single quotes so the
/// result is exactly one shell word evaluating to `s`.
pub fn single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}
