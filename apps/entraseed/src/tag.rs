//! Run tags that mark every generated object for later cleanup.
//!
//! A tag looks like `LT870432514821`: the `LT` marker, the last eight
//! digits of the creation time in unix seconds, and four random digits.
//! Users carry it in `employeeId`; groups carry it in their display-name
//! prefix `TEST-{tag}-`.

use std::fmt;

use chrono::Utc;
use rand::Rng;

/// Prefix shared by every run tag.
pub const TAG_MARKER: &str = "LT";

/// Identifies one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTag(String);

impl RunTag {
    /// Generates a fresh tag from the current time and a random suffix.
    #[must_use]
    pub fn generate() -> Self {
        let seconds = Utc::now().timestamp().to_string();
        let tail = &seconds[seconds.len().saturating_sub(8)..];
        let suffix: u16 = rand::thread_rng().gen_range(1000..=9999);

        Self(format!("{TAG_MARKER}{tail}{suffix}"))
    }

    /// Wraps a tag captured from an earlier run.
    pub fn from_existing(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display-name prefix for this run's groups.
    #[must_use]
    pub fn group_prefix(&self) -> String {
        format!("TEST-{}-", self.0)
    }
}

impl fmt::Display for RunTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Extracts the run tag out of a generated group's display name.
///
/// Group names look like `TEST-{tag}-TestGroup0001 Engineering`; anything
/// not matching that shape returns `None`.
#[must_use]
pub fn parse_group_display_name(display_name: &str) -> Option<String> {
    let parts: Vec<&str> = display_name.splitn(3, '-').collect();
    if parts.len() >= 2 && parts[0] == "TEST" && parts[1].starts_with(TAG_MARKER) {
        return Some(parts[1].to_string());
    }
    None
}
