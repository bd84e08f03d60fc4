//! Field descriptors for the product shape, served by `GET /products/schema`.

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr, ToSchema)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    #[serde(rename = "UUID")]
    #[strum(serialize = "UUID")]
    Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldDescriptor {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub required: bool,
}

const fn field(key: &'static str, kind: FieldType, required: bool) -> FieldDescriptor {
    FieldDescriptor {
        key,
        kind,
        required,
    }
}

/// Every stored field, identifier included
pub const PRODUCT_FIELDS: &[FieldDescriptor] = &[
    field("_id", FieldType::Uuid, false),
    field("name", FieldType::String, true),
    field("price", FieldType::Number, true),
    field("imgUrl", FieldType::String, true),
    field("apiUrl", FieldType::String, false),
    field("outOfStock", FieldType::Boolean, false),
    field("flavours", FieldType::Number, false),
    field("description", FieldType::String, false),
    field("apiRoute", FieldType::String, false),
    field("type", FieldType::String, false),
];

/// Client-facing fields: internal identifiers (leading underscore) are left out
pub fn describe() -> Vec<FieldDescriptor> {
    PRODUCT_FIELDS
        .iter()
        .filter(|f| !f.key.starts_with('_'))
        .copied()
        .collect()
}
