//! Remote privilege escalation: the two `sudo` invocations and the failure
//! signature that selects between them.

use serde::Serialize;

use crate::domain::command::CommandFailure;

/// Substrings sudo prints when `-n` cannot proceed without a password.
pub const PASSWORD_REQUIRED_MARKERS: &[&str] = &["a password is required", "a terminal is required"];

/// How a privileged script was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Escalation {
    /// `sudo -n`: succeeds only with NOPASSWD rules.
    Passwordless,
    /// `sudo -S -p ''`: password read from stdin, no prompt text.
    Password,
}

impl Escalation {
    /// Remote argument vector running `script` as root under this mode.
    #[must_use]
    pub fn sudo_args(self, script: &str) -> Vec<&str> {
        match self {
            Self::Passwordless => vec!["sudo", "-n", "bash", "-lc", script],
            Self::Password => vec!["sudo", "-S", "-p", "", "bash", "-lc", script],
        }
    }
}

/// Returns `true` if a passwordless attempt failed only because sudo wants
/// a password.
#[must_use]
pub fn needs_password(failure: &CommandFailure) -> bool {
    PASSWORD_REQUIRED_MARKERS
        .iter()
        .any(|marker| failure.mentions(marker))
}
