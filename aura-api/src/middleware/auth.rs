use async_trait::async_trait;
use aura_core::identity::{Identity, IdentityVerifier};
use aura_core::{CoreError, CoreResult};
use aura_shared::pii::Masked;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

/// Claims of an identity token issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// Verifies HS256 identity tokens signed with a shared secret.
pub struct JwtIdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityVerifier for JwtIdentityVerifier {
    async fn verify(&self, token: &str) -> CoreResult<Identity> {
        let data = decode::<IdentityClaims>(token, &self.key, &self.validation)
            .map_err(|e| CoreError::IdentityError(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(CoreError::IdentityError("token has no subject".to_string()));
        }

        Ok(Identity {
            user_id: data.claims.sub,
            email: data.claims.email.map(Masked),
        })
    }
}

/// Resolve the bearer token to an [`Identity`], make sure the user has a
/// credits balance, and hand the identity to the handler.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Authentication("Missing bearer token".to_string()))?;

    let identity = state.identity.verify(token).await.map_err(|e| {
        tracing::debug!("Rejected identity token: {}", e);
        AppError::Authentication("Invalid or expired token".to_string())
    })?;

    state.orchestrator.initialize_user(&identity.user_id).await?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
