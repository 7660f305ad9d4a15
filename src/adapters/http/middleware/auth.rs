//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that resolves the access-token cookie to an account
//! - `RequireAccount` - Extractor that requires an authenticated account
//! - `RequireAdmin` - Extractor that additionally requires a staff role
//!
//! # Architecture
//!
//! The middleware delegates to the `AuthorizationGate`: the cookie value is
//! verified as a token and the account is re-read from the store. Handlers
//! never see the raw token, only the resolved `Account`.
//!
//! ```text
//! Request → auth_middleware → injects Account into extensions
//!                                      ↓
//!                              Handler → RequireAccount extractor reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get, middleware};
//! use std::sync::Arc;
//!
//! let gate: AuthState = Arc::new(AuthorizationGate::new(tokens, accounts));
//!
//! let app = Router::new()
//!     .route("/api/subscription/manage-link", get(manage_link_handler))
//!     .layer(middleware::from_fn_with_state(gate.clone(), auth_middleware));
//!
//! async fn manage_link_handler(RequireAccount(account): RequireAccount) -> String {
//!     format!("Hello, {}!", account.email)
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::AuthorizationGate;
use crate::domain::account::Account;
use crate::domain::foundation::ErrorCode;

/// Auth middleware state - wraps the authorization gate.
pub type AuthState = Arc<AuthorizationGate>;

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authentication middleware that resolves access-token cookies.
///
/// This middleware:
/// 1. Extracts the token from the `access_token` cookie
/// 2. Resolves it to an account through the `AuthorizationGate`
/// 3. On success, injects the `Account` into request extensions
/// 4. On missing cookie, continues without injecting (handlers enforce
///    authentication through `RequireAccount`)
/// 5. On invalid token, returns 401 Unauthorized
///
/// # Token Extraction
///
/// Expects the token as a cookie named `access_token`:
/// ```text
/// Cookie: access_token=<token>
/// ```
pub async fn auth_middleware(
    State(gate): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = cookie_value(request.headers(), ACCESS_TOKEN_COOKIE);

    match token {
        Some(token) => {
            // Resolve the token to an account
            match gate.authenticate(&token, false).await {
                Ok(account) => {
                    // Inject the authenticated account into request extensions
                    request.extensions_mut().insert(account);
                    next.run(request).await
                }
                Err(err) => {
                    let (status, message) = match err.code {
                        ErrorCode::Unauthenticated => {
                            (StatusCode::UNAUTHORIZED, "Invalid or expired token")
                        }
                        _ => {
                            tracing::error!("Authentication lookup failed: {}", err);
                            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
                        }
                    };

                    (
                        status,
                        Json(serde_json::json!({
                            "error": message,
                            "code": err.code.to_string()
                        })),
                    )
                        .into_response()
                }
            }
        }
        None => {
            // No cookie provided - continue without auth
            // Handlers can use RequireAccount to enforce authentication
            next.run(request).await
        }
    }
}

/// Read a single cookie value out of the `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    let prefix = format!("{}=", name);
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
        .map(|value| value.to_string())
}

/// Extractor that requires an authenticated account.
///
/// Use this extractor in handlers that require authentication. If no account
/// is in the request extensions (i.e., the middleware didn't successfully
/// resolve a token), returns 401 Unauthorized.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAccount(account): RequireAccount) -> impl IntoResponse {
///     format!("Hello, {}!", account.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAccount(pub Account);

impl<S> axum::extract::FromRequestParts<S> for RequireAccount
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<Account>()
                .cloned()
                .map(RequireAccount)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor that requires an authenticated account with a staff role.
///
/// Rejects member-role accounts with the same 401 as a missing account, so
/// callers cannot probe which endpoints exist behind the admin surface.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Account);

impl<S> axum::extract::FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<Account>()
                .filter(|account| account.can_administer())
                .cloned()
                .map(RequireAdmin)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::{JwtConfig, JwtTokenAuthority};
    use crate::adapters::memory::InMemoryAccountStore;
    use crate::domain::account::AccountRole;
    use crate::domain::foundation::Email;
    use crate::ports::{AccountStore, TokenAuthority};
    use secrecy::SecretString;

    fn test_account() -> Account {
        Account::register(
            Email::new("test@example.com").unwrap(),
            "digest".to_string(),
        )
    }

    fn authority() -> JwtTokenAuthority {
        JwtTokenAuthority::new(JwtConfig::new(SecretString::new(
            "test-secret-at-least-32-bytes-long!!".to_string(),
        )))
    }

    async fn gate_with(account: &Account) -> AuthState {
        let accounts = Arc::new(InMemoryAccountStore::new());
        accounts.create(account).await.unwrap();
        Arc::new(AuthorizationGate::new(Arc::new(authority()), accounts))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Gate Resolution Tests (indirect via InMemoryAccountStore + JWT authority)
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn gate_resolves_account_for_issued_token() {
        let account = test_account();
        let gate = gate_with(&account).await;
        let issued = authority().issue(&account.id).unwrap();

        let resolved = gate.authenticate(&issued.token, false).await;

        assert!(resolved.is_ok());
        assert_eq!(resolved.unwrap().id, account.id);
    }

    #[tokio::test]
    async fn gate_rejects_forged_token() {
        let account = test_account();
        let gate = gate_with(&account).await;

        let result = gate.authenticate("forged-token", false).await;

        assert_eq!(result.unwrap_err().code, ErrorCode::Unauthenticated);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // RequireAccount Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_account_extracts_account_from_extensions() {
        use axum::extract::FromRequestParts;
        use axum::http::Request;

        // Create a request with an Account in extensions
        let mut request: Request<()> = Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(test_account());

        // Split into parts
        let (mut parts, _body) = request.into_parts();

        // Extract using RequireAccount
        let result: Result<RequireAccount, AuthRejection> =
            RequireAccount::from_request_parts(&mut parts, &()).await;

        assert!(result.is_ok());
        let RequireAccount(account) = result.unwrap();
        assert_eq!(account.email.as_str(), "test@example.com");
    }

    #[tokio::test]
    async fn require_account_fails_without_account() {
        use axum::extract::FromRequestParts;
        use axum::http::Request;

        // Create a request WITHOUT an Account
        let request: Request<()> = Request::builder().uri("/test").body(()).unwrap();

        let (mut parts, _body) = request.into_parts();

        let result: Result<RequireAccount, AuthRejection> =
            RequireAccount::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // RequireAdmin Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_admin_extracts_staff_account() {
        use axum::extract::FromRequestParts;
        use axum::http::Request;

        let admin = Account::invite(
            Email::new("ops@example.com").unwrap(),
            AccountRole::Admin,
        );
        let mut request: Request<()> = Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(admin);

        let (mut parts, _body) = request.into_parts();

        let result: Result<RequireAdmin, AuthRejection> =
            RequireAdmin::from_request_parts(&mut parts, &()).await;

        assert!(result.is_ok());
        let RequireAdmin(account) = result.unwrap();
        assert!(account.can_administer());
    }

    #[tokio::test]
    async fn require_admin_rejects_member_like_missing_account() {
        use axum::extract::FromRequestParts;
        use axum::http::Request;

        let mut request: Request<()> = Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(test_account());

        let (mut parts, _body) = request.into_parts();

        let result: Result<RequireAdmin, AuthRejection> =
            RequireAdmin::from_request_parts(&mut parts, &()).await;

        // Indistinguishable from no authentication at all
        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[tokio::test]
    async fn require_admin_fails_without_account() {
        use axum::extract::FromRequestParts;
        use axum::http::Request;

        let request: Request<()> = Request::builder().uri("/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result: Result<RequireAdmin, AuthRejection> =
            RequireAdmin::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // AuthRejection Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn auth_rejection_returns_401() {
        let rejection = AuthRejection::Unauthenticated;
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Cookie Extraction Helper Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn cookie_extraction_finds_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; access_token=my-secret-token; lang=en"
                .parse()
                .unwrap(),
        );

        let value = cookie_value(&headers, ACCESS_TOKEN_COOKIE);
        assert_eq!(value.as_deref(), Some("my-secret-token"));
    }

    #[test]
    fn cookie_extraction_handles_single_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "access_token=tok".parse().unwrap());

        let value = cookie_value(&headers, ACCESS_TOKEN_COOKIE);
        assert_eq!(value.as_deref(), Some("tok"));
    }

    #[test]
    fn cookie_extraction_returns_none_without_header() {
        let headers = HeaderMap::new();
        assert_eq!(cookie_value(&headers, ACCESS_TOKEN_COOKIE), None);
    }

    #[test]
    fn cookie_extraction_does_not_match_prefixed_names() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "access_token_legacy=old".parse().unwrap(),
        );

        assert_eq!(cookie_value(&headers, ACCESS_TOKEN_COOKIE), None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Type Safety Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn auth_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthState>();
    }

    #[test]
    fn require_account_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequireAccount>();
    }

    #[test]
    fn require_admin_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequireAdmin>();
    }
}
