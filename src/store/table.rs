//! Relational table descriptors: columns, unique keys and foreign keys.

/// Column storage type. Maps 1:1 onto a PostgreSQL type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Uuid,
    Text,
    VarChar(u32),
    TextArray,
    Boolean,
    Integer,
    Timestamp,
}

impl ColumnKind {
    /// Type used in DDL.
    pub fn ddl_type(&self) -> String {
        match self {
            ColumnKind::VarChar(n) => format!("VARCHAR({})", n),
            other => other.cast_type().to_uppercase(),
        }
    }

    /// Type used in parameter casts (`$1::uuid`).
    pub fn cast_type(&self) -> &'static str {
        match self {
            ColumnKind::Uuid => "uuid",
            ColumnKind::Text => "text",
            ColumnKind::VarChar(_) => "varchar",
            ColumnKind::TextArray => "text[]",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Integer => "integer",
            ColumnKind::Timestamp => "timestamptz",
        }
    }
}

#[derive(Debug)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    /// SQL default expression.
    pub default: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Column {
            name,
            kind,
            nullable: true,
            default: None,
        }
    }

    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub const fn default(mut self, expression: &'static str) -> Self {
        self.default = Some(expression);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    Restrict,
    Cascade,
}

impl OnDelete {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::Restrict => "RESTRICT",
            OnDelete::Cascade => "CASCADE",
        }
    }
}

#[derive(Debug)]
pub struct ForeignKey {
    pub column: &'static str,
    /// Referenced table name; always references its `id`.
    pub references: &'static str,
    pub on_delete: OnDelete,
}

#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    /// Human name used in messages.
    pub singular: &'static str,
    pub columns: &'static [Column],
    pub unique: &'static [&'static [&'static str]],
    pub foreign_keys: &'static [ForeignKey],
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn unique_constraint_name(&self, key: &[&str]) -> String {
        format!("unique_{}_{}", self.name, key.join("_"))
    }

    pub fn foreign_key_name(&self, fk: &ForeignKey) -> String {
        format!("fk_{}_{}", self.name, fk.column)
    }
}

use ColumnKind::*;

const ID: Column = Column::new("id", Uuid).not_null().default("gen_random_uuid()");
const CREATED_AT: Column = Column::new("created_at", Timestamp).not_null().default("NOW()");
const UPDATED_AT: Column = Column::new("updated_at", Timestamp).not_null().default("NOW()");

pub static ORGANISATIONS: Table = Table {
    name: "organisations",
    singular: "organisation",
    columns: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        Column::new("name", Text).not_null(),
        Column::new("roles", TextArray).not_null().default("'{}'"),
        Column::new("supplier_id", Uuid),
        Column::new("email_address", VarChar(320)),
        Column::new("customer_number", Text),
        Column::new("phone_number", Text),
        Column::new("address1", Text),
        Column::new("address2", Text),
        Column::new("postal_code", VarChar(10)),
        Column::new("city", Text).not_null(),
        Column::new("state", Text),
        Column::new("country_code", VarChar(2)).not_null(),
        Column::new("is_validated", Boolean).not_null().default("FALSE"),
    ],
    unique: &[&["name", "country_code"]],
    foreign_keys: &[ForeignKey {
        column: "supplier_id",
        references: "organisations",
        on_delete: OnDelete::Restrict,
    }],
};

pub static USERS: Table = Table {
    name: "users",
    singular: "user",
    columns: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        Column::new("username", VarChar(320)).not_null(),
        Column::new("email_address", VarChar(320)).not_null(),
        Column::new("first_name", Text),
        Column::new("last_name", Text).not_null(),
        Column::new("phone_number", Text),
        Column::new("preferred_language", VarChar(5)).not_null().default("'en_US'"),
        Column::new("registered_at", Timestamp),
        Column::new("confirmation_code", VarChar(32)),
        Column::new("is_confirmed", Boolean).not_null().default("FALSE"),
        Column::new("organisation_id", Uuid).not_null(),
    ],
    unique: &[&["email_address"]],
    foreign_keys: &[ForeignKey {
        column: "organisation_id",
        references: "organisations",
        on_delete: OnDelete::Restrict,
    }],
};

pub static CREDENTIALS: Table = Table {
    name: "credentials",
    singular: "credential",
    columns: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        Column::new("user_id", Uuid).not_null(),
        Column::new("password", Text).not_null(),
        Column::new("password_set_at", Timestamp),
        Column::new("is_locked", Boolean).not_null().default("FALSE"),
        Column::new("is_expired", Boolean).not_null().default("FALSE"),
        Column::new("last_login_at", Timestamp),
        Column::new("last_logout_at", Timestamp),
        Column::new("user_info_last_login_at", Timestamp),
        Column::new("user_info_last_login_failed_at", Timestamp),
        Column::new("user_info_last_login_failed_count", Integer),
    ],
    unique: &[&["user_id"]],
    foreign_keys: &[ForeignKey {
        column: "user_id",
        references: "users",
        on_delete: OnDelete::Cascade,
    }],
};

pub static ACCOUNTS: Table = Table {
    name: "accounts",
    singular: "account",
    columns: &[
        ID,
        CREATED_AT,
        UPDATED_AT,
        Column::new("name", Text).not_null().default("'Default Account'"),
        Column::new("organisation_id", Uuid).not_null(),
    ],
    unique: &[&["name", "organisation_id"]],
    foreign_keys: &[ForeignKey {
        column: "organisation_id",
        references: "organisations",
        on_delete: OnDelete::Restrict,
    }],
};

/// All tables in creation order (referenced tables first).
pub static ALL_TABLES: [&Table; 4] = [&ORGANISATIONS, &USERS, &CREDENTIALS, &ACCOUNTS];

pub fn table_by_name(name: &str) -> Option<&'static Table> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}
