use super::Resource;
use crate::error::AppError;
use crate::model::credential::replace_password;
use crate::model::Credential;
use crate::schema::Fields;
use crate::state::AppState;
use async_trait::async_trait;
use serde_json::Value;

/// Hash a supplied plaintext password in place. No-op when none was supplied.
async fn hash_supplied(state: &AppState, fields: &mut Fields) -> Result<(), AppError> {
    if let Some(Value::String(plain)) = fields.get("password") {
        let hash = state.hasher.hash(plain).await?;
        replace_password(fields, hash);
    }
    Ok(())
}

#[async_trait]
impl Resource for Credential {
    const CONFLICT: &'static str = "Credential for given user already exist";

    async fn build(state: &AppState, mut fields: Fields) -> Result<Self, AppError> {
        hash_supplied(state, &mut fields).await?;
        Credential::issue(fields)
    }

    async fn prepare_update(state: &AppState, _current: &Self, fields: &mut Fields) -> Result<(), AppError> {
        hash_supplied(state, fields).await
    }
}
