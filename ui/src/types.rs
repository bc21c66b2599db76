//! Shared types for the Crucible Web UI
//!
//! These types mirror the JSON documents served by the model demo server:
//! the model metadata (schemas plus filetype side-channels), predictions,
//! and saved examples.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ============================================================================
// File types
// ============================================================================

/// File category of a file-valued field, from the filetype side-channel.
///
/// The base schema's primitive type system cannot express file values, so
/// the server ships these maps next to each schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Audio,
    Video,
    Binary,
}

impl FileType {
    /// MIME prefix accepted by a file picker for this category, if any.
    pub fn accept(&self) -> Option<&'static str> {
        match self {
            FileType::Image => Some("image/*"),
            FileType::Audio => Some("audio/*"),
            FileType::Video => Some("video/*"),
            FileType::Binary => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Audio => "audio",
            FileType::Video => "video",
            FileType::Binary => "file",
        }
    }
}

/// Mapping from field name to file category.
///
/// List- and dict-valued output fields carry their element category under
/// the `"<field>.$item"` key; see [`item_filetype_key`].
pub type FileTypeMap = HashMap<String, FileType>;

/// Side-channel key naming the per-element filetype of a list/dict field.
pub fn item_filetype_key(field: &str) -> String {
    format!("{}.$item", field)
}

// ============================================================================
// Input schema
// ============================================================================

/// One field of the model's input payload description.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputProperty {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Declared primitive type, kept as a raw string so that unknown kinds
    /// survive parsing and are rejected by the classifier instead.
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub choices: Option<Vec<Value>>,
}

impl InputProperty {
    pub fn has_numeric_bound(&self) -> bool {
        self.minimum.is_some() || self.maximum.is_some()
    }

    pub fn has_length_bound(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }
}

/// The model's declared input payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputSchema {
    #[serde(default)]
    pub properties: HashMap<String, InputProperty>,
    #[serde(default)]
    pub required: Option<Vec<String>>,
}

impl InputSchema {
    pub fn is_required(&self, field: &str) -> bool {
        self.required
            .as_ref()
            .map(|r| r.iter().any(|n| n == field))
            .unwrap_or(false)
    }

    /// Whether the schema declares any optional field at all; drives the
    /// "show optional fields" toggle.
    pub fn has_optional_fields(&self) -> bool {
        self.required.is_some() && self.properties.keys().any(|name| !self.is_required(name))
    }

    /// Field names in a stable render order: required fields first, each
    /// group sorted by name. JSON object key order is not preserved by the
    /// deserializer, so the order is reconstructed here.
    pub fn ordered_field_names(&self) -> Vec<String> {
        let mut required: Vec<String> = self
            .properties
            .keys()
            .filter(|n| self.is_required(n))
            .cloned()
            .collect();
        let mut optional: Vec<String> = self
            .properties
            .keys()
            .filter(|n| !self.is_required(n))
            .cloned()
            .collect();
        required.sort();
        optional.sort();
        required.extend(optional);
        required
    }
}

// ============================================================================
// Output schema
// ============================================================================

/// `additionalProperties` is either a nested schema or a bare boolean;
/// both count as "present" for dict detection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<OutputProperty>),
}

impl AdditionalProperties {
    pub fn schema(&self) -> Option<&OutputProperty> {
        match self {
            AdditionalProperties::Schema(s) => Some(s),
            AdditionalProperties::Bool(_) => None,
        }
    }
}

/// One field of the model's output payload description. Recursive for
/// list (`items`) and dict (`additionalProperties`) values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputProperty {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub items: Option<Box<OutputProperty>>,
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: Option<AdditionalProperties>,
    /// Unresolved reference into `definitions`; such fields render as JSON.
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
}

impl OutputProperty {
    pub fn is_array(&self) -> bool {
        self.type_.as_deref() == Some("array")
    }

    pub fn is_dict(&self) -> bool {
        self.type_.as_deref() == Some("object") && self.additional_properties.is_some()
    }
}

/// The model's declared output payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputSchema {
    #[serde(default)]
    pub properties: HashMap<String, OutputProperty>,
    #[serde(default)]
    pub definitions: Option<HashMap<String, Value>>,
}

impl OutputSchema {
    /// Field names in a stable render order.
    pub fn ordered_field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.properties.keys().cloned().collect();
        names.sort();
        names
    }
}

// ============================================================================
// Model metadata
// ============================================================================

/// The model metadata document fetched once at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub examples_count: usize,
    #[serde(default)]
    pub input_schema: InputSchema,
    #[serde(default)]
    pub output_schema: OutputSchema,
    /// Schema of the human-oriented output rendered in the preview pane.
    #[serde(default)]
    pub demo_output_schema: OutputSchema,
    #[serde(default)]
    pub input_filetypes: FileTypeMap,
    #[serde(default)]
    pub output_filetypes: FileTypeMap,
    #[serde(default)]
    pub demo_output_filetypes: FileTypeMap,
}

impl Metadata {
    pub fn input_filetype(&self, field: &str) -> Option<FileType> {
        self.input_filetypes.get(field).copied()
    }

    pub fn demo_filetype(&self, field: &str) -> Option<FileType> {
        self.demo_output_filetypes.get(field).copied()
    }

    pub fn demo_item_filetype(&self, field: &str) -> Option<FileType> {
        self.demo_output_filetypes
            .get(&item_filetype_key(field))
            .copied()
    }
}

// ============================================================================
// Predictions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, PredictionStatus::Pending | PredictionStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_in_flight()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    UserFailure,
    SystemFailure,
    Timeout,
    UnknownFailure,
}

impl FailureReason {
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::UserFailure => "The model rejected the input",
            FailureReason::SystemFailure => "The model failed unexpectedly",
            FailureReason::Timeout => "The prediction timed out",
            FailureReason::UnknownFailure => "The prediction failed for an unknown reason",
        }
    }
}

/// A prediction as reported by the server while polling.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub input: HashMap<String, Value>,
    #[serde(default)]
    pub output: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub demo_output: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<FailureReason>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostPredictionResponse {
    pub prediction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct PostExampleResponse {
    pub example_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileUploadResponse {
    pub serving_url: String,
}

// ============================================================================
// Examples
// ============================================================================

/// A saved prediction shown in the examples gallery.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Example {
    pub id: String,
    #[serde(default)]
    pub input: HashMap<String, Value>,
    #[serde(default)]
    pub output: HashMap<String, Value>,
    #[serde(default)]
    pub demo_output: HashMap<String, Value>,
    #[serde(default)]
    pub logs: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filetype_parsing() {
        let map: FileTypeMap =
            serde_json::from_value(json!({"img": "image", "clip": "video", "raw": "binary"}))
                .unwrap();
        assert_eq!(map.get("img"), Some(&FileType::Image));
        assert_eq!(map.get("clip"), Some(&FileType::Video));
        assert_eq!(map.get("raw"), Some(&FileType::Binary));
    }

    #[test]
    fn test_item_filetype_key() {
        assert_eq!(item_filetype_key("masks"), "masks.$item");
    }

    #[test]
    fn test_metadata_item_filetype_lookup() {
        let meta: Metadata = serde_json::from_value(json!({
            "name": "sr-model",
            "demo_output_filetypes": {"frames.$item": "image"}
        }))
        .unwrap();
        assert_eq!(meta.demo_item_filetype("frames"), Some(FileType::Image));
        assert_eq!(meta.demo_filetype("frames"), None);
    }

    #[test]
    fn test_input_schema_ordering_and_required() {
        let schema: InputSchema = serde_json::from_value(json!({
            "properties": {
                "seed": {"type": "integer"},
                "prompt": {"type": "string"},
                "steps": {"type": "integer"}
            },
            "required": ["prompt"]
        }))
        .unwrap();
        assert!(schema.is_required("prompt"));
        assert!(!schema.is_required("seed"));
        assert!(schema.has_optional_fields());
        assert_eq!(schema.ordered_field_names(), vec!["prompt", "seed", "steps"]);
    }

    #[test]
    fn test_all_required_has_no_optional_fields() {
        let schema: InputSchema = serde_json::from_value(json!({
            "properties": {"prompt": {"type": "string"}},
            "required": ["prompt"]
        }))
        .unwrap();
        assert!(!schema.has_optional_fields());
    }

    #[test]
    fn test_output_property_dict_detection() {
        let prop: OutputProperty = serde_json::from_value(json!({
            "type": "object",
            "additionalProperties": {"type": "string"}
        }))
        .unwrap();
        assert!(prop.is_dict());
        assert!(prop
            .additional_properties
            .as_ref()
            .and_then(|a| a.schema())
            .is_some());

        let bare: OutputProperty = serde_json::from_value(json!({"type": "object"})).unwrap();
        assert!(!bare.is_dict());

        let boolean: OutputProperty =
            serde_json::from_value(json!({"type": "object", "additionalProperties": true}))
                .unwrap();
        assert!(boolean.is_dict());
        assert!(boolean
            .additional_properties
            .as_ref()
            .and_then(|a| a.schema())
            .is_none());
    }

    #[test]
    fn test_prediction_status_parsing() {
        let pred: Prediction = serde_json::from_value(json!({
            "id": "p1",
            "status": "running",
            "input": {"prompt": "hi"}
        }))
        .unwrap();
        assert_eq!(pred.status, PredictionStatus::Running);
        assert!(pred.status.is_in_flight());

        let failed: Prediction = serde_json::from_value(json!({
            "id": "p2",
            "status": "failed",
            "failure_reason": "system_failure"
        }))
        .unwrap();
        assert!(failed.status.is_terminal());
        assert_eq!(failed.failure_reason, Some(FailureReason::SystemFailure));
    }
}
