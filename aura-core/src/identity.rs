use async_trait::async_trait;
use aura_shared::pii::Masked;
use serde::Serialize;

use crate::CoreResult;

/// A user identity delivered by the external identity provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    /// Stable subject id; keys the credits ledger
    pub user_id: String,
    pub email: Option<Masked<String>>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify an identity token and extract the identity it carries
    async fn verify(&self, token: &str) -> CoreResult<Identity>;
}
