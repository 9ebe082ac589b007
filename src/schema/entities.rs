//! Field tables for the four resources.

use super::field::{FieldKind::*, FieldSpec, Nested, Schema};
use crate::model::organisation::ROLE_NAMES;

const ID: FieldSpec = FieldSpec::new("id", "uuid", Identifier).read_only();
const CREATED_AT: FieldSpec = FieldSpec::new("created_at", "createdAt", DateTime).read_only();
const UPDATED_AT: FieldSpec = FieldSpec::new("updated_at", "updatedAt", DateTime).read_only();

pub static ORGANISATION: Schema = Schema {
    category: "organisations",
    type_tag: "OrganisationV1",
    list_type: "OrganisationListV1",
    singular: "organisation",
    fields: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        FieldSpec::new("name", "name", String).required(),
        FieldSpec::new("roles", "roles", StringList).one_of(ROLE_NAMES),
        FieldSpec::new("supplier_id", "supplierUuid", Identifier).nullable(),
        FieldSpec::new("email_address", "emailAddress", Email).nullable().max_length(320),
        FieldSpec::new("customer_number", "customerNumber", String).nullable(),
        FieldSpec::new("phone_number", "phoneNumber", String).nullable(),
        FieldSpec::new("address1", "address1", String).nullable(),
        FieldSpec::new("address2", "address2", String).nullable(),
        FieldSpec::new("postal_code", "postalCode", String).nullable().max_length(10),
        FieldSpec::new("city", "city", String).required(),
        FieldSpec::new("state", "state", String).nullable(),
        FieldSpec::new("country_code", "countryCode", String).required().max_length(2),
        FieldSpec::new("is_validated", "validated", Boolean),
    ],
    nested: &[],
};

pub static CREDENTIAL: Schema = Schema {
    category: "credentials",
    type_tag: "CredentialV1",
    list_type: "CredentialListV1",
    singular: "credential",
    fields: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        FieldSpec::new("user_id", "userUuid", Identifier).required(),
        FieldSpec::new("password", "password", String).write_only().required(),
        FieldSpec::new("password_set_at", "passwordSetAt", DateTime).read_only(),
        FieldSpec::new("is_locked", "locked", Boolean),
        FieldSpec::new("is_expired", "expired", Boolean),
        FieldSpec::new("last_login_at", "lastLoginAt", DateTime).read_only(),
        FieldSpec::new("last_logout_at", "lastLogoutAt", DateTime).read_only(),
        FieldSpec::new("user_info_last_login_at", "userInfoLastLoginAt", DateTime).read_only(),
        FieldSpec::new("user_info_last_login_failed_at", "userInfoLastLoginFailedAt", DateTime).read_only(),
        FieldSpec::new("user_info_last_login_failed_count", "userInfoLastLoginFailedCount", Integer).read_only(),
    ],
    nested: &[],
};

pub static USER: Schema = Schema {
    category: "users",
    type_tag: "UserV1",
    list_type: "UserListV1",
    singular: "user",
    fields: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        FieldSpec::new("username", "username", String).required().max_length(320),
        FieldSpec::new("email_address", "emailAddress", Email).required().max_length(320),
        FieldSpec::new("first_name", "firstName", String),
        FieldSpec::new("last_name", "lastName", String).required(),
        FieldSpec::new("phone_number", "phoneNumber", String),
        FieldSpec::new("preferred_language", "preferredLanguage", String).max_length(5),
        FieldSpec::new("registered_at", "registeredAt", DateTime).read_only(),
        FieldSpec::new("is_confirmed", "confirmed", Boolean).read_only(),
        FieldSpec::new("organisation_id", "organisationUuid", Identifier).required(),
    ],
    nested: &[
        Nested {
            name: "organisation",
            schema: &ORGANISATION,
            in_list: false,
        },
        Nested {
            name: "credential",
            schema: &CREDENTIAL,
            in_list: false,
        },
    ],
};

pub static ACCOUNT: Schema = Schema {
    category: "accounts",
    type_tag: "AccountV1",
    list_type: "AccountListV1",
    singular: "account",
    fields: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        FieldSpec::new("name", "name", String),
        FieldSpec::new("organisation_id", "organisationUuid", Identifier).required(),
    ],
    nested: &[Nested {
        name: "organisation",
        schema: &ORGANISATION,
        in_list: false,
    }],
};
