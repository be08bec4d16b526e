//! Access Gate: turns the `Authorization: Bearer` header into a caller
//! identity before any Listing Store or Rental Ledger handler runs.
//!
//! A missing or non-bearer header is `401 Unauthorized`; a token the verifier
//! rejects is `403 Forbidden`. Handlers never read identity from bodies.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, Identity, UserId};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Extractor proving the request carries a valid identity assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(Identity);

impl Authenticated {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn user_id(&self) -> &UserId {
        self.0.user_id()
    }
}

/// Pull the bearer token out of the headers.
///
/// Returns `None` when the header is absent, not valid UTF-8, uses another
/// scheme, or carries an empty credential.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                debug!("access gate: missing bearer credential");
                return Err(Error::unauthorized("missing bearer token"));
            };
            let state =
                state.ok_or_else(|| Error::internal("access gate is missing HTTP state"))?;
            let identity = state.verifier.verify(&token).await?;
            Ok(Self(identity))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::{TestPorts, bearer};
    use actix_web::http::StatusCode;
    use actix_web::http::header::HeaderValue;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    #[rstest]
    #[case(Some("Bearer abc.def.ghi"), Some("abc.def.ghi"))]
    #[case(Some("bearer   abc"), Some("abc"))]
    #[case(Some("Basic dXNlcjpwYXNz"), None)]
    #[case(Some("Bearer "), None)]
    #[case(Some("abc.def.ghi"), None)]
    #[case(None, None)]
    fn extracts_bearer_tokens(#[case] header: Option<&str>, #[case] expected: Option<&str>) {
        let mut headers = HeaderMap::new();
        if let Some(raw) = header {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(raw).expect("header"));
        }
        assert_eq!(bearer_token(&headers).as_deref(), expected);
    }

    async fn whoami(caller: Authenticated) -> HttpResponse {
        HttpResponse::Ok().body(caller.user_id().to_string())
    }

    #[rstest]
    #[actix_web::test]
    async fn gate_states_map_to_statuses() {
        let user_id = UserId::random();
        let mut ports = TestPorts::default();
        ports.verifier.expect_verify().returning(move |token| {
            if token == "good" {
                Ok(Identity::new(user_id, "alice@example.com"))
            } else {
                Err(Error::forbidden("invalid or expired token"))
            }
        });
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let anonymous =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let forged = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header(bearer("forged"))
                .to_request(),
        )
        .await;
        assert_eq!(forged.status(), StatusCode::FORBIDDEN);

        let ok = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .insert_header(bearer("good"))
                .to_request(),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(ok).await, user_id.to_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_state_is_an_internal_error() {
        let req = actix_test::TestRequest::get()
            .insert_header(bearer("good"))
            .to_http_request();
        let error = Authenticated::extract(&req).await.expect_err("no state");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
