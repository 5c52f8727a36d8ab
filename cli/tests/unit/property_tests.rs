//! Property-based tests for polling bounds, output parsing and config
//! validation.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::time::Duration;

use proptest::prelude::*;

use skiff_cli::application::services::readiness::poll_until;
use skiff_cli::domain::config::VALID_CONFIG_KEYS;
use skiff_cli::domain::{
    PollPolicy, ProviderOutputParser, TextOutputParser, validate_config_key,
    validate_config_value,
};

fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("runtime")
}

// ============================================================================
// Poll bounding
// ============================================================================

proptest! {
    /// A probe that never succeeds is called exactly `ceil(W/I)` times and
    /// the loop sleeps once between consecutive attempts.
    #[test]
    fn prop_poll_attempts_bounded_by_budget(interval in 1u64..120, budget in 0u64..3600) {
        let policy = PollPolicy::new(Duration::from_secs(interval), Duration::from_secs(budget));
        let expected = u32::try_from(budget.div_ceil(interval)).expect("small");
        prop_assert_eq!(policy.max_attempts(), expected);

        let rt = paused_runtime();
        let (calls, elapsed) = rt.block_on(async {
            let start = tokio::time::Instant::now();
            let mut calls = 0u32;
            let res: Result<(), u32> = poll_until(policy, |_| {
                calls += 1;
                async { None }
            })
            .await;
            assert_eq!(res, Err(expected));
            (calls, start.elapsed())
        });
        prop_assert_eq!(calls, expected);
        prop_assert_eq!(elapsed, Duration::from_secs(interval * u64::from(expected.saturating_sub(1))));
    }

    /// Success on attempt `k` stops the loop at `k` calls.
    #[test]
    fn prop_poll_stops_at_first_success(k in 1u32..60) {
        let policy = PollPolicy::new(Duration::from_secs(10), Duration::from_secs(600));
        let rt = paused_runtime();
        let mut calls = 0u32;
        let got = rt.block_on(poll_until(policy, |attempt| {
            calls += 1;
            async move { (attempt == k).then_some(attempt) }
        }));
        prop_assert_eq!(got, Ok(k));
        prop_assert_eq!(calls, k);
    }
}

// ============================================================================
// Text parser
// ============================================================================

proptest! {
    /// Any routable address on a labelled line is found verbatim.
    #[test]
    fn prop_text_address_finds_labelled_ipv4(
        a in 1u8..=223, b in 0u8..=255, c in 0u8..=255, d in 1u8..=254,
        noise in "[a-z ]{0,20}",
    ) {
        prop_assume!(a != 127);
        let ip = format!("{a}.{b}.{c}.{d}");
        let details = format!("Name: hpc-analysis\nStatus: running {noise}\nPublic IP: {ip}\n");
        prop_assert_eq!(TextOutputParser.address(&details), Some(ip));
    }

    /// Output without any dotted quad never yields an address.
    #[test]
    fn prop_text_address_none_without_ipv4(text in "[a-zA-Z :\n-]{0,200}") {
        prop_assert_eq!(TextOutputParser.address(&text), None);
    }

    /// A UUID embedded in arbitrary prose is extracted exactly.
    #[test]
    fn prop_text_instance_id_extracts_uuid(
        uuid in "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
        prefix in "[A-Za-z ]{0,30}",
    ) {
        let output = format!("{prefix} created instance {uuid}, provisioning\n");
        prop_assert_eq!(TextOutputParser.instance_id(&output), Some(uuid));
    }

    /// Name lookup returns the id on the matching row regardless of row order.
    #[test]
    fn prop_text_id_for_name_matches_row(others in proptest::collection::vec("[a-z]{3,8}", 0..5)) {
        let mut listing = String::from("ID NAME STATUS\n");
        for (i, name) in others.iter().enumerate() {
            listing.push_str(&format!("id-{i} {name}-vm running\n"));
        }
        listing.push_str("abc-123 hpc-analysis running\n");
        prop_assert_eq!(
            TextOutputParser.id_for_name(&listing, "hpc-analysis"),
            Some("abc-123".to_string())
        );
    }
}

// ============================================================================
// Config validation
// ============================================================================

proptest! {
    /// Keys outside the whitelist are rejected.
    #[test]
    fn prop_arbitrary_keys_rejected(key in "[a-z]{1,20}\\.[a-z]{1,20}") {
        prop_assume!(!VALID_CONFIG_KEYS.contains(&key.as_str()));
        prop_assert!(validate_config_key(&key).is_err());
    }

    /// Numeric settings accept every positive integer and reject zero.
    #[test]
    fn prop_numeric_settings(n in 1u64..1_000_000) {
        prop_assert!(validate_config_value("poll.timeout_secs", &n.to_string()).is_ok());
        prop_assert!(validate_config_value("instance.cpus", &n.to_string()).is_ok());
        prop_assert!(validate_config_value("poll.interval_secs", "0").is_err());
    }
}

#[test]
fn test_every_whitelisted_key_validates() {
    for key in VALID_CONFIG_KEYS {
        assert!(validate_config_key(key).is_ok(), "{key}");
    }
}
