use super::{fetch_record, Resource};
use crate::error::AppError;
use crate::model::User;
use crate::schema::{Embedded, Fields};
use crate::state::AppState;
use crate::store::{Filter, CREDENTIALS, ORGANISATIONS};
use async_trait::async_trait;

#[async_trait]
impl Resource for User {
    const CONFLICT: &'static str = "User already exist, please supply another email address";

    async fn build(_state: &AppState, fields: Fields) -> Result<Self, AppError> {
        User::register(fields)
    }

    async fn embed(state: &AppState, user: &Self) -> Result<Embedded, AppError> {
        let mut embedded = Embedded::new();
        if let Some(org) = fetch_record(state, &ORGANISATIONS, user.organisation_id).await? {
            embedded.insert("organisation", org);
        }
        let credential = state
            .store
            .fetch_where(&CREDENTIALS, &Filter::eq("user_id", user.id.to_string()))
            .await?
            .into_iter()
            .next();
        if let Some(credential) = credential {
            embedded.insert("credential", credential);
        }
        Ok(embedded)
    }
}
