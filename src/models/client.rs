use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use utoipa::ToSchema;

/// A client record as accepted by `POST /clients`, stored and echoed back.
///
/// Fields are neither type- nor presence-checked. Whatever JSON value the
/// caller sends (an explicit `null` included) is kept as is; an omitted field
/// stays absent in the store item, the published event and the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(example = "1726647066")]
    pub ci: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(example = "Christopher")]
    pub first_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(example = "Pallo")]
    pub last_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(example = "0995312828")]
    pub phone: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    #[schema(example = "Condado")]
    pub address: Option<Value>,
}

// A key that is in the body is `Some`, even when its value is `null`
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Client {
    /// Identifier used in logs and spans; `-` when the caller sent none.
    pub fn ci_or_placeholder(&self) -> Cow<'_, str> {
        match &self.ci {
            Some(Value::String(ci)) => Cow::Borrowed(ci),
            Some(other) => Cow::Owned(other.to_string()),
            None => Cow::Borrowed("-"),
        }
    }

    /// Present attributes as `(storage name, value)` pairs, in wire order.
    pub fn attributes(&self) -> Vec<(&'static str, &Value)> {
        [
            ("ci", &self.ci),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("phone", &self.phone),
            ("address", &self.address),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
        .collect()
    }
}
