//! `SKIP_TEST_CLUSTER` policy shared by the embedded-PostgreSQL suites.

fn skip_requested() -> bool {
    std::env::var("SKIP_TEST_CLUSTER").is_ok_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        )
    })
}

/// Turn a cluster bootstrap failure into a skip when `SKIP_TEST_CLUSTER` is
/// truthy, and into a panic otherwise so CI cannot pass without a database.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if skip_requested() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded PostgreSQL unavailable: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("1"), true)]
    #[case(Some(" Yes "), true)]
    #[case(Some("TRUE"), true)]
    #[case(Some("0"), false)]
    #[case(None, false)]
    fn skip_flag_accepts_common_truthy_spellings(
        #[case] value: Option<&str>,
        #[case] expected: bool,
    ) {
        let _guard = env_lock::lock_env([("SKIP_TEST_CLUSTER", value)]);

        assert_eq!(skip_requested(), expected);
    }

    #[test]
    fn failure_without_skip_flag_panics() {
        let _guard = env_lock::lock_env([("SKIP_TEST_CLUSTER", None::<&str>)]);

        let outcome = std::panic::catch_unwind(|| handle_cluster_setup_failure::<()>("no initdb"));

        assert!(outcome.is_err());
    }
}
