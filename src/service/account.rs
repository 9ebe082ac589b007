use super::{fetch_record, Resource};
use crate::error::AppError;
use crate::model::Account;
use crate::schema::{Embedded, Fields};
use crate::state::AppState;
use crate::store::ORGANISATIONS;
use async_trait::async_trait;

#[async_trait]
impl Resource for Account {
    const CONFLICT: &'static str = "Account already exist, please supply another name";

    async fn build(_state: &AppState, fields: Fields) -> Result<Self, AppError> {
        Account::open(fields)
    }

    async fn embed(state: &AppState, account: &Self) -> Result<Embedded, AppError> {
        let mut embedded = Embedded::new();
        if let Some(org) = fetch_record(state, &ORGANISATIONS, account.organisation_id).await? {
            embedded.insert("organisation", org);
        }
        Ok(embedded)
    }
}
