use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

pub const PARSING_DONE: &str = "Parsing was done.";

/// AWS Config rule invocation as delivered to the function.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    // JSON encoded InvokingEvent, null when AWS Config has nothing to report
    pub invoking_event: Option<String>,
    pub config_rule_name: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokingEvent {
    pub configuration_item_diff: Option<ConfigurationItemDiff>,
    pub message_type: Option<String>,
    pub configuration_item: Option<ConfigurationItemSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItemSummary {
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItemDiff {
    #[serde(default)]
    pub changed_properties: IndexMap<String, PropertyChange>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One entry of `changedProperties`.
///
/// The values stay raw: for configuration paths they can be any JSON value,
/// only relationship entries carry the `RelatedResource` shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyChange {
    // missing change types are tolerated, they are never suppressed
    #[serde(default)]
    pub change_type: ChangeType,
    #[serde(default)]
    pub previous_value: Option<Value>,
    #[serde(default)]
    pub updated_value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedResource {
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub name: Option<String>,
}

impl PropertyChange {
    pub fn previous_resource(&self) -> Option<RelatedResource> {
        self.previous_value.as_ref().and_then(RelatedResource::from_value)
    }

    pub fn updated_resource(&self) -> Option<RelatedResource> {
        self.updated_value.as_ref().and_then(RelatedResource::from_value)
    }
}

impl RelatedResource {
    /// Returns `None` unless the value is an object of the relationship shape.
    fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        RelatedResource::deserialize(value).ok()
    }

    /// Most readable identifier of the related resource, for logging.
    pub fn label(&self) -> &str {
        self.resource_name
            .as_deref()
            .or(self.resource_id.as_deref())
            .or(self.name.as_deref())
            .unwrap_or("unnamed")
    }
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    #[serde(serialize_with = "status_code_or_empty")]
    pub status_code: Option<i32>,
    pub body: String,
}

impl HandlerResponse {
    pub fn done(status_code: Option<i32>) -> Self {
        Self {
            status_code,
            // the body is itself a JSON document
            body: Value::from(PARSING_DONE).to_string(),
        }
    }
}

fn status_code_or_empty<S: Serializer>(status_code: &Option<i32>, serializer: S) -> Result<S::Ok, S::Error> {
    match status_code {
        Some(code) => serializer.serialize_i32(*code),
        None => serializer.serialize_str(""),
    }
}
