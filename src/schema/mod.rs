//! Wire/storage mapping: declarative field tables interpreted by one generic codec.

mod codec;
mod entities;
mod field;

pub use codec::{Embedded, Fields, Mode, View, MISSING, NOT_NULL};
pub use entities::{ACCOUNT, CREDENTIAL, ORGANISATION, USER};
pub use field::{Access, FieldKind, FieldSpec, Nested, Schema};
