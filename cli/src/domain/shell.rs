//! POSIX shell quoting for the one place a command crosses a shell boundary:
//! the remote command line handed to `ssh`.

/// Escape a value for use inside single quotes (`'` becomes `'\''`).
#[must_use]
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a single argument so a POSIX shell reads it back as one word.
///
/// Arguments made only of safe characters are returned unchanged.
#[must_use]
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    let safe = arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '=' | '+' | ','));
    if safe {
        return arg.to_string();
    }
    format!("'{}'", escape_single_quote_content(arg))
}

/// Quote and join arguments into a single command line.
#[must_use]
pub fn join_args<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| quote_arg(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
