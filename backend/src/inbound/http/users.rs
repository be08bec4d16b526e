//! Identity Store HTTP handlers.
//!
//! ```text
//! POST /api/v1/register {"name":"alice","email":"alice@example.com","password":"s3cretpass"}
//! POST /api/v1/login {"email":"alice@example.com","password":"s3cretpass"}
//! GET /api/v1/user
//! PUT /api/v1/user {"phone":"+44 20 7946 0000","address":""}
//! POST /api/v1/user/avatar (raw image body, or multipart/form-data with an `avatar` part)
//! ```

use std::convert::Infallible;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use futures_util::future::ready;
use futures_util::stream;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AVATAR_MAX_BYTES, AuthenticatedSession, AvatarImage, AvatarValidationError, Error,
    LoginCredentials, ProfileUpdate, RegistrationRequest, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access_gate::Authenticated;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub name: Option<String>,
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(example = "s3cretpass")]
    pub password: Option<String>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
    #[schema(example = "s3cretpass")]
    pub password: Option<String>,
}

/// Profile update body for `PUT /api/v1/user`.
///
/// Absent fields are left unchanged and empty strings clear the field. Any
/// other key is rejected.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
}

/// Public view of a user record. The credential hash is never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            phone: user.phone().map(str::to_owned),
            address: user.address().map(str::to_owned),
            avatar_url: user.avatar().map(str::to_owned),
            created_at: user.created_at(),
        }
    }
}

/// Bearer assertion issued after registration or login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl From<AuthenticatedSession> for SessionResponse {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            token: session.assertion.token().to_owned(),
            expires_at: session.assertion.expires_at(),
            user: UserResponse::from(&session.user),
        }
    }
}

/// Register a new account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Name or email already in use", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let name = require(name, FieldName::new("name"))?;
    let email = require(email, FieldName::new("email"))?;
    let password = require(password, FieldName::new("password"))?;
    let request = RegistrationRequest::try_from_parts(&name, &email, &password)?;
    let session = state.registration.register(request).await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(session)))
}

/// Authenticate and receive a bearer assertion.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let email = require(email, FieldName::new("email"))?;
    let password = require(password, FieldName::new("password"))?;
    let credentials = LoginCredentials::try_from_parts(&email, &password)?;
    let session = state.login.authenticate(&credentials).await?;
    Ok(web::Json(SessionResponse::from(session)))
}

/// Fetch the caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/user",
    responses(
        (status = 200, description = "Caller profile", body = UserResponse),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let user = state.profile.fetch_profile(caller.user_id()).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(UserResponse::from(&user)))
}

/// Update the caller's phone, address, or avatar reference.
#[utoipa::path(
    put,
    path = "/api/v1/user",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[put("/user")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let UpdateProfileRequest {
        phone,
        address,
        avatar_url,
    } = payload.into_inner();
    let update = ProfileUpdate::try_new(phone, address, avatar_url)?;
    let user = state
        .profile_command
        .update_profile(caller.user_id(), update)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Room for multipart boundaries and part headers around the image itself.
const MULTIPART_OVERHEAD: usize = 16 * 1024;
/// Form part carrying the image in `multipart/form-data` uploads.
const AVATAR_FORM_FIELD: &str = "avatar";

/// Read the request body, refusing to buffer more than `limit` bytes.
async fn read_limited(mut payload: web::Payload, limit: usize) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|err| Error::invalid_request(format!("unreadable body: {err}")))?;
        if body.len() + chunk.len() > limit {
            return Err(AvatarValidationError::TooLarge {
                max: AVATAR_MAX_BYTES,
            }
            .into());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn malformed_form(err: multer::Error) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("multipart/form-data"))
}

/// Pull the `avatar` part out of a buffered `multipart/form-data` body.
///
/// Other parts are skipped. The image type comes from the part's own
/// `Content-Type`, not the request's.
async fn avatar_from_form(content_type: &str, body: Vec<u8>) -> Result<AvatarImage, Error> {
    let boundary = multer::parse_boundary(content_type).map_err(malformed_form)?;
    let mut form = multer::Multipart::new(stream::once(ready(Ok::<_, Infallible>(body))), boundary);
    while let Some(field) = form.next_field().await.map_err(malformed_form)? {
        if field.name() != Some(AVATAR_FORM_FIELD) {
            continue;
        }
        let part_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_default();
        let bytes = field.bytes().await.map_err(malformed_form)?;
        return Ok(AvatarImage::new(&part_type, bytes.to_vec())?);
    }
    Err(AvatarValidationError::Empty.into())
}

/// Upload a new avatar image for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/user/avatar",
    request_body(
        content = Vec<u8>,
        content_type = "image/png",
        description = "PNG, JPEG, GIF, or WebP image up to 2 MiB, sent raw or as the `avatar` part of a multipart/form-data body"
    ),
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Unsupported or oversized image", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 503, description = "Avatar storage unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "uploadAvatar"
)]
#[post("/user/avatar")]
pub async fn upload_avatar(
    state: web::Data<HttpState>,
    caller: Authenticated,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<web::Json<UserResponse>> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let image = if is_multipart(&content_type) {
        let body = read_limited(payload, AVATAR_MAX_BYTES + MULTIPART_OVERHEAD).await?;
        avatar_from_form(&content_type, body).await?
    } else {
        let bytes = read_limited(payload, AVATAR_MAX_BYTES).await?;
        AvatarImage::new(&content_type, bytes)?
    };
    let user = state
        .profile_command
        .upload_avatar(caller.user_id(), image)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}
