//! Cache policies for API responses.
//!
//! Listings, rentals, and profiles are per-caller views, so shared caches
//! must never store them and browsers must revalidate.

use actix_web::http::header::{CACHE_CONTROL, HeaderName, HeaderValue};

const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";
const NO_STORE: &str = "no-store";

/// Header for responses scoped to the authenticated caller.
pub fn private_no_cache_header() -> (HeaderName, HeaderValue) {
    (CACHE_CONTROL, HeaderValue::from_static(PRIVATE_NO_CACHE))
}

/// Header for health responses, which must reflect the live process state.
pub fn no_store_header() -> (HeaderName, HeaderValue) {
    (CACHE_CONTROL, HeaderValue::from_static(NO_STORE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(private_no_cache_header(), "private, no-cache, must-revalidate")]
    #[case(no_store_header(), "no-store")]
    fn policies_target_cache_control(
        #[case] header: (HeaderName, HeaderValue),
        #[case] expected: &str,
    ) {
        let (name, value) = header;
        assert_eq!(name, CACHE_CONTROL);
        assert_eq!(value, expected);
    }
}
