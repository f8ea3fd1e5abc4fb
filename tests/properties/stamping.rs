//! Property tests for token substitution.

use chrono::TimeZone;
use proptest::prelude::*;

use siteup::{Stamp, DEFAULT_TOKEN};

fn dev_stamp(stack: &str) -> Stamp {
    let instant = chrono::Utc.with_ymd_and_hms(2024, 6, 3, 20, 4, 5).unwrap();
    Stamp::at(DEFAULT_TOKEN, stack, -5, instant)
}

/// Lowercase stack names keep the replacement free of the token itself.
fn stack_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,15}").unwrap()
}

/// Text fragments that cannot themselves contain the token.
fn token_free_fragment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9 \\n<>/=\"]{0,24}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: applying a stamp never panics on arbitrary input.
    #[test]
    fn property_apply_never_panics(text in "(?s).{0,256}", stack in stack_name()) {
        let _ = dev_stamp(&stack).apply(&text);
    }

    /// PROPERTY: text without the token passes through unchanged.
    #[test]
    fn property_token_free_text_is_identity(text in token_free_fragment(), stack in stack_name()) {
        let stamp = dev_stamp(&stack);
        let (out, n) = stamp.apply(&text);
        prop_assert_eq!(n, 0);
        prop_assert_eq!(out, text);
    }

    /// PROPERTY: every interleaved occurrence is counted and replaced.
    #[test]
    fn property_all_occurrences_replaced(
        fragments in proptest::collection::vec(token_free_fragment(), 1..6),
        stack in stack_name(),
    ) {
        let stamp = dev_stamp(&stack);
        let text = fragments.join(DEFAULT_TOKEN);
        let expected = fragments.len() - 1;

        let (out, n) = stamp.apply(&text);

        prop_assert_eq!(n, expected);
        prop_assert_eq!(out.matches(DEFAULT_TOKEN).count(), 0);
        prop_assert_eq!(out, fragments.join(stamp.replacement()));
    }

    /// PROPERTY: stamping twice equals stamping once.
    #[test]
    fn property_stamping_is_idempotent(
        fragments in proptest::collection::vec(token_free_fragment(), 1..6),
        stack in stack_name(),
    ) {
        let stamp = dev_stamp(&stack);
        let text = fragments.join(DEFAULT_TOKEN);

        let (once, _) = stamp.apply(&text);
        let (twice, n) = stamp.apply(&once);

        prop_assert_eq!(n, 0);
        prop_assert_eq!(once, twice);
    }
}
