//! HS256 JSON Web Token implementation of the `IdentityAssertions` port.
//!
//! `jsonwebtoken` compares `exp` against the system clock, so that check is
//! disabled and expiry is evaluated against the `now` the caller passes in.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{IdentityAssertionError, IdentityAssertions};
use crate::domain::{Identity, IssuedAssertion, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared HMAC secret.
pub struct JwtIdentityAssertions {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl JwtIdentityAssertions {
    /// Build the adapter from the signing secret and token lifetime.
    pub fn new(secret: &[u8], ttl: TimeDelta) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }
}

impl IdentityAssertions for JwtIdentityAssertions {
    fn issue(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedAssertion, IdentityAssertionError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: identity.user_id().to_string(),
            email: identity.email().to_owned(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| IdentityAssertionError::issue(err.to_string()))?;
        Ok(IssuedAssertion::new(token, expires_at))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, IdentityAssertionError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => IdentityAssertionError::expired(),
                _ => IdentityAssertionError::invalid(err.to_string()),
            })?;
        if now.timestamp() >= claims.exp {
            return Err(IdentityAssertionError::expired());
        }
        let user_id = Uuid::parse_str(&claims.sub)
            .map(UserId::from_uuid)
            .map_err(|_| IdentityAssertionError::invalid("subject is not a user id"))?;
        Ok(Identity::new(user_id, claims.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_timestamp;
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[fixture]
    fn assertions() -> JwtIdentityAssertions {
        JwtIdentityAssertions::new(SECRET, TimeDelta::hours(1))
    }

    #[fixture]
    fn identity() -> Identity {
        Identity::new(UserId::random(), "alice@example.com")
    }

    #[rstest]
    fn issued_tokens_verify_until_expiry(assertions: JwtIdentityAssertions, identity: Identity) {
        let now = fixture_timestamp();

        let issued = assertions.issue(&identity, now).expect("issue");

        assert_eq!(issued.expires_at(), now + TimeDelta::hours(1));
        let recovered = assertions
            .verify(issued.token(), now + TimeDelta::minutes(59))
            .expect("still valid");
        assert_eq!(recovered, identity);
    }

    #[rstest]
    fn tokens_expire_at_their_deadline(assertions: JwtIdentityAssertions, identity: Identity) {
        let now = fixture_timestamp();
        let issued = assertions.issue(&identity, now).expect("issue");

        let error = assertions
            .verify(issued.token(), now + TimeDelta::hours(1))
            .expect_err("expired");

        assert_eq!(error, IdentityAssertionError::expired());
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid(
        assertions: JwtIdentityAssertions,
        identity: Identity,
    ) {
        let now = fixture_timestamp();
        let foreign =
            JwtIdentityAssertions::new(b"another-secret-another-secret-xx", TimeDelta::hours(1));
        let issued = foreign.issue(&identity, now).expect("issue");

        let error = assertions
            .verify(issued.token(), now)
            .expect_err("bad signature");

        assert!(matches!(error, IdentityAssertionError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.token")]
    #[case("eyJhbGciOiJIUzI1NiJ9")]
    fn garbage_is_invalid(assertions: JwtIdentityAssertions, #[case] token: &str) {
        let error = assertions
            .verify(token, fixture_timestamp())
            .expect_err("garbage");
        assert!(matches!(error, IdentityAssertionError::Invalid { .. }));
    }

    #[rstest]
    fn non_uuid_subjects_are_invalid(assertions: JwtIdentityAssertions) {
        let now = fixture_timestamp();
        let claims = Claims {
            sub: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            iat: now.timestamp(),
            exp: (now + TimeDelta::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");

        let error = assertions.verify(&token, now).expect_err("bad subject");
        assert!(matches!(error, IdentityAssertionError::Invalid { .. }));
    }
}
