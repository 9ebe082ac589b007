use super::{assemble, timestamp, Entity};
use crate::error::AppError;
use crate::schema::{Fields, Schema, ORGANISATION};
use crate::store::{Table, ORGANISATIONS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    PlatformOperator,
    Customer,
    Supplier,
    Reseller,
    Broker,
}

/// Every [`Role`], in declaration order.
pub const ROLES: [Role; 5] = [
    Role::PlatformOperator,
    Role::Customer,
    Role::Supplier,
    Role::Reseller,
    Role::Broker,
];

/// Wire names indexed by [`Role`] discriminant; the only place role strings are spelled.
pub const ROLE_NAMES: &[&str] = &["PLATFORM_OPERATOR", "CUSTOMER", "SUPPLIER", "RESELLER", "BROKER"];

/// Roles that make an organisation show up in the suppliers-only listing.
pub const SUPPLYING_ROLES: &[Role] = &[Role::PlatformOperator, Role::Supplier];

impl Role {
    pub const fn as_str(&self) -> &'static str {
        ROLE_NAMES[*self as usize]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: Uuid,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    pub supplier_id: Option<Uuid>,
    pub email_address: Option<String>,
    pub customer_number: Option<String>,
    pub phone_number: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub postal_code: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country_code: String,
    #[serde(default)]
    pub is_validated: bool,
}

impl Organisation {
    pub fn establish(fields: Fields) -> Result<Self, AppError> {
        assemble(json!({"roles": [], "is_validated": false}), fields)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl Entity for Organisation {
    const TABLE: &'static Table = &ORGANISATIONS;
    const SCHEMA: &'static Schema = &ORGANISATION;

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    /// Every organisation is a customer.
    fn normalise(&mut self) {
        if !self.has_role(Role::Customer) {
            self.roles.push(Role::Customer);
        }
    }
}
