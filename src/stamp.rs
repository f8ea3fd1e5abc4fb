//! Stamp construction and token substitution
//!
//! A `Stamp` pairs the placeholder token found in site files with the
//! replacement value for one run: the stack name plus a clock time
//! formatted for a fixed UTC offset. The value is computed once and then
//! applied uniformly to every file.

use chrono::{DateTime, FixedOffset, Utc};

/// Default placeholder token looked up in site files
pub const DEFAULT_TOKEN: &str = "PULUMI_ENVIRONMENT";

/// Clock format embedded in the replacement value, e.g. "3:04:05 PM"
const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// Token/replacement pair applied to every file in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    token: String,
    replacement: String,
}

impl Stamp {
    /// Build a stamp from the current wall clock
    pub fn now(token: impl Into<String>, stack: &str, utc_offset_hours: i32) -> Self {
        Self::at(token, stack, utc_offset_hours, Utc::now())
    }

    /// Build a stamp from an explicit instant
    ///
    /// Used by tests and anywhere a deterministic replacement is needed.
    pub fn at(
        token: impl Into<String>,
        stack: &str,
        utc_offset_hours: i32,
        instant: DateTime<Utc>,
    ) -> Self {
        let offset = fixed_offset(utc_offset_hours);
        let local = instant.with_timezone(&offset);
        Self {
            token: token.into(),
            replacement: format!("STACK: {}-{}", stack, local.format(TIME_FORMAT)),
        }
    }

    /// The placeholder token this stamp replaces
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The computed replacement value
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every non-overlapping token occurrence in `text`
    ///
    /// Returns the rewritten text and the number of occurrences replaced.
    /// An empty token never matches.
    pub fn apply(&self, text: &str) -> (String, usize) {
        if self.token.is_empty() {
            return (text.to_string(), 0);
        }
        let occurrences = text.matches(self.token.as_str()).count();
        if occurrences == 0 {
            return (text.to_string(), 0);
        }
        (
            text.replace(self.token.as_str(), &self.replacement),
            occurrences,
        )
    }
}

/// Offset for the configured fixed time zone
///
/// Out-of-range offsets clamp to a whole day; the zero offset is UTC.
fn fixed_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.clamp(-23, 23) * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_instant() -> DateTime<Utc> {
        // 20:04:05 UTC is 3:04:05 PM at UTC-5
        Utc.with_ymd_and_hms(2024, 6, 3, 20, 4, 5).unwrap()
    }

    #[test]
    fn replacement_embeds_stack_and_clock_time() {
        let stamp = Stamp::at(DEFAULT_TOKEN, "dev", -5, fixed_instant());
        assert_eq!(stamp.replacement(), "STACK: dev-3:04:05 PM");
    }

    #[test]
    fn morning_hours_have_no_leading_zero() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 3, 14, 30, 0).unwrap();
        let stamp = Stamp::at(DEFAULT_TOKEN, "dev", -5, instant);
        assert_eq!(stamp.replacement(), "STACK: dev-9:30:00 AM");
    }

    #[test]
    fn apply_replaces_every_occurrence() {
        let stamp = Stamp::at(DEFAULT_TOKEN, "dev", -5, fixed_instant());
        let (out, n) = stamp.apply("a PULUMI_ENVIRONMENT b PULUMI_ENVIRONMENT");
        assert_eq!(n, 2);
        assert_eq!(out, "a STACK: dev-3:04:05 PM b STACK: dev-3:04:05 PM");
    }

    #[test]
    fn apply_without_token_is_identity() {
        let stamp = Stamp::at(DEFAULT_TOKEN, "dev", -5, fixed_instant());
        let (out, n) = stamp.apply("no placeholder here");
        assert_eq!(n, 0);
        assert_eq!(out, "no placeholder here");
    }

    #[test]
    fn apply_twice_is_a_no_op() {
        let stamp = Stamp::at(DEFAULT_TOKEN, "dev", -5, fixed_instant());
        let (once, n) = stamp.apply("Hello PULUMI_ENVIRONMENT");
        assert_eq!(n, 1);
        let (twice, again) = stamp.apply(&once);
        assert_eq!(again, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_token_never_matches() {
        let stamp = Stamp::at("", "dev", -5, fixed_instant());
        let (out, n) = stamp.apply("anything");
        assert_eq!(n, 0);
        assert_eq!(out, "anything");
    }

    #[test]
    fn out_of_range_offset_falls_back_to_a_valid_zone() {
        // Must not panic; 99 clamps into range
        let _ = Stamp::at(DEFAULT_TOKEN, "dev", 99, fixed_instant());
        let _ = Stamp::at(DEFAULT_TOKEN, "dev", -99, fixed_instant());
    }
}
