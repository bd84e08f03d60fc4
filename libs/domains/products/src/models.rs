use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Product document as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", with = "hyphenated_id")]
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,

    pub name: String,

    pub price: f64,

    pub img_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_of_stock: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_route: Option<String>,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

impl Product {
    pub fn new(id: Uuid, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            img_url: fields.img_url,
            api_url: fields.api_url,
            out_of_stock: fields.out_of_stock,
            flavours: fields.flavours,
            description: fields.description,
            api_route: fields.api_route,
            product_type: fields.product_type,
        }
    }
}

/// Validated, sanitized product attributes.
///
/// Serializes only the fields that are present, so it doubles as the
/// `$set` part of an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub img_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_stock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_route: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

/// Partial update: overwrite `set`, remove the fields named in `unset`
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCommand {
    pub set: ProductFields,
    pub unset: Vec<&'static str>,
}

impl UpdateCommand {
    /// `flavours` is cleared whenever an update omits it; every other
    /// optional field is left untouched.
    pub fn from_fields(set: ProductFields) -> Self {
        let unset = if set.flavours.is_none() {
            vec!["flavours"]
        } else {
            Vec::new()
        };
        Self { set, unset }
    }
}

/// Query string for `GET /products`; `type` may repeat
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Product types to include
    #[serde(default, rename = "type")]
    pub types: Vec<String>,
}

/// Category filter applied when listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Exact(String),
    AnyOf(Vec<String>),
}

impl From<ListQuery> for TypeFilter {
    fn from(query: ListQuery) -> Self {
        let mut types = query.types;
        match types.len() {
            0 => TypeFilter::All,
            1 => {
                let only = types.remove(0);
                if only.is_empty() {
                    TypeFilter::All
                } else {
                    TypeFilter::Exact(only)
                }
            }
            _ => TypeFilter::AnyOf(types),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedProduct {
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedProduct {
    pub message: String,
}

impl Default for DeletedProduct {
    fn default() -> Self {
        Self {
            message: "product deleted".to_string(),
        }
    }
}

/// Empty acknowledgement body, `{}`
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct UpdatedProduct {}

/// Ids travel as hyphenated strings so BSON filters and stored documents agree.
mod hyphenated_id {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&id.hyphenated())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(de::Error::custom)
    }
}
