use crate::core::access::AccountContext;
use crate::core::{AppError, AppState};
use axum::extract::{OriginalUri, State};
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// contenuto del token di sessione emesso dal provider di autenticazione
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // id dell'utente
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

/// Utente autenticato, inserito nelle extension della richiesta
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

/// Emette un token di sessione valido 24 ore (usato in sviluppo e nei test)
#[instrument(skip(secret), fields(user_id = %user_id))]
pub fn encode_session_token(
    user_id: &str,
    email: Option<&str>,
    secret: &str,
) -> Result<String, AppError> {
    debug!("Encoding session token");
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.map(str::to_string),
        exp: (now + Duration::hours(24)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!("Failed to encode session token: {:?}", e);
        AppError::internal_server_error("Error in encoding session token")
    })
}

#[instrument(skip(token, secret))]
pub fn decode_session_token(token: &str, secret: &str) -> Result<TokenData<Claims>, AppError> {
    debug!("Decoding session token");
    let mut validation = Validation::default();
    // i token del provider portano un'audience che qui non interessa
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| {
        debug!("Session token decoded for user: {}", data.claims.sub);
        data
    })
    .map_err(|e| {
        warn!("Failed to decode session token: {:?}", e);
        AppError::unauthorized("Unable to decode token")
    })
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let auth_header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(header) => header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Empty header is not allowed")
        })?,
        None => {
            warn!("Missing authorization header");
            return Err(AppError::forbidden(
                "Please add the session token to the header",
            ));
        }
    };

    let mut header = auth_header.split_whitespace();
    let token = match (header.next(), header.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => {
            warn!("Authorization header is not a bearer token");
            return Err(AppError::forbidden("Expected a bearer token"));
        }
    };

    let claims = decode_session_token(token, &state.jwt_secret)?.claims;
    info!("User authenticated: {}", claims.sub);

    req.extensions_mut().insert(Session {
        user_id: claims.sub,
        email: claims.email,
    });
    Ok(next.run(req).await)
}

/// Estrae l'id dell'account dal path `/accounts/{account_id}/...`
pub fn account_id_from_path(path: &str) -> Option<&str> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.find(|s| *s == "accounts")?;
    segments.next()
}

/// Middleware che verifica che l'utente corrente sia membro dell'account nel path
/// e inserisce l'AccountContext (membership + capacità) nelle extension
#[instrument(skip(state, req, next))]
pub async fn account_membership_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running account membership middleware");
    // 1. l'utente deve essere già stato autenticato
    let session = req
        .extensions()
        .get::<Session>()
        .ok_or_else(|| {
            warn!("Session not found in request extensions");
            AppError::unauthorized("User not authenticated")
        })?
        .clone();

    // 2. account dal path; dentro un router annidato l'uri è privo del prefisso
    let path = req
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let account_id = account_id_from_path(&path)
        .ok_or_else(|| {
            warn!("Account ID not found in path: {}", path);
            AppError::bad_request("Account ID not found in path")
        })?
        .to_string();

    debug!(
        "Checking membership for user {} in account {}",
        session.user_id, account_id
    );

    // 3. membership
    let membership = state
        .memberships
        .find_by_account_and_user(&account_id, &session.user_id)
        .await?
        .ok_or_else(|| {
            warn!(
                "User {} is not a member of account {}",
                session.user_id, account_id
            );
            AppError::forbidden("You are not a member of this account")
        })?;

    info!(
        "User {} verified as {} of account {}",
        session.user_id, membership.role, account_id
    );

    req.extensions_mut()
        .insert(AccountContext::new(membership, &state.access_policy));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip_keeps_subject_and_email() {
        let token = encode_session_token("user-1", Some("a@b.c"), "secret").unwrap();
        let data = decode_session_token(&token, "secret").unwrap();
        assert_eq!(data.claims.sub, "user-1");
        assert_eq!(data.claims.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn token_with_wrong_secret_is_unauthorized() {
        let token = encode_session_token("user-1", None, "secret").unwrap();
        let err = decode_session_token(&token, "other").unwrap_err();
        assert_eq!(err.status(), http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn account_id_is_the_segment_after_accounts() {
        assert_eq!(account_id_from_path("/accounts/acc-1"), Some("acc-1"));
        assert_eq!(
            account_id_from_path("/accounts/acc-1/members/u2/role"),
            Some("acc-1")
        );
        assert_eq!(account_id_from_path("/accounts"), None);
        assert_eq!(account_id_from_path("/me/accounts"), None);
    }
}
