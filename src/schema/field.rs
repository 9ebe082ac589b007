//! Field descriptors: one row per wire/storage field of an entity.

/// Direction in which a field crosses the API boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Emitted on output, ignored on input.
    ReadOnly,
    /// Accepted on input, never emitted.
    WriteOnly,
    ReadWrite,
}

/// Declared value type, used for coercion and format checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Email,
    Boolean,
    /// List of strings with set semantics (duplicates collapse).
    StringList,
    DateTime,
    /// UUID reference or primary key.
    Identifier,
    Integer,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Storage (snake_case) name.
    pub name: &'static str,
    /// External (camelCase) name.
    pub wire: &'static str,
    pub kind: FieldKind,
    pub access: Access,
    pub required: bool,
    pub nullable: bool,
    pub max_length: Option<usize>,
    pub allowed: Option<&'static [&'static str]>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, wire: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            wire,
            kind,
            access: Access::ReadWrite,
            required: false,
            nullable: false,
            max_length: None,
            allowed: None,
        }
    }

    pub const fn read_only(mut self) -> Self {
        self.access = Access::ReadOnly;
        self
    }

    pub const fn write_only(mut self) -> Self {
        self.access = Access::WriteOnly;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }

    pub fn is_writable(&self) -> bool {
        self.access != Access::ReadOnly
    }

    pub fn is_readable(&self) -> bool {
        self.access != Access::WriteOnly
    }
}

/// Related entity embedded in the single-resource encoding.
#[derive(Debug)]
pub struct Nested {
    pub name: &'static str,
    pub schema: &'static Schema,
    /// Whether the relation is kept in list views.
    pub in_list: bool,
}

/// Declarative schema of one resource type.
#[derive(Debug)]
pub struct Schema {
    /// Envelope category, also the collection path segment.
    pub category: &'static str,
    /// Literal emitted as `type` on every encoded entity.
    pub type_tag: &'static str,
    /// Envelope `type` of collection responses.
    pub list_type: &'static str,
    /// Human name used in messages ("organisation not found").
    pub singular: &'static str,
    pub fields: &'static [FieldSpec],
    pub nested: &'static [Nested],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Wire name for a storage name; falls back to the storage name.
    pub fn wire_name<'a>(&self, name: &'a str) -> &'a str {
        self.field(name).map(|f| f.wire).unwrap_or(name)
    }

    pub fn not_found(&self) -> String {
        format!("{} not found", self.singular)
    }
}
