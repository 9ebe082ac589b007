use super::{CrudService, Resource};
use crate::error::AppError;
use crate::model::organisation::SUPPLYING_ROLES;
use crate::model::{Entity, Organisation, User};
use crate::schema::Fields;
use crate::state::AppState;
use crate::store::Filter;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
impl Resource for Organisation {
    const CONFLICT: &'static str = "Organisation already exist, please supply another name";

    async fn build(_state: &AppState, fields: Fields) -> Result<Self, AppError> {
        Organisation::establish(fields)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.supplier_id == Some(self.id) {
            return Err(AppError::field(
                Self::SCHEMA.wire_name("supplier_id"),
                "An organisation cannot be its own supplier.",
            ));
        }
        Ok(())
    }
}

/// Organisation-only listings.
pub struct OrganisationService;

impl OrganisationService {
    /// Organisations holding PLATFORM_OPERATOR or SUPPLIER.
    pub fn suppliers_filter() -> Filter {
        Filter::ContainsAny(
            "roles",
            SUPPLYING_ROLES.iter().map(|r| Value::String(r.as_str().into())).collect(),
        )
    }

    pub async fn users(state: &AppState, raw_id: &str) -> Result<Vec<Fields>, AppError> {
        let org = CrudService::find::<Organisation>(state, raw_id).await?;
        CrudService::list::<User>(state, &Filter::eq("organisation_id", org.id.to_string())).await
    }

    /// Organisations naming this one as their supplier.
    pub async fn customers(state: &AppState, raw_id: &str) -> Result<Vec<Fields>, AppError> {
        let org = CrudService::find::<Organisation>(state, raw_id).await?;
        CrudService::list::<Organisation>(state, &Filter::eq("supplier_id", org.id.to_string())).await
    }
}
