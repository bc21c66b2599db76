//! Field-kind classification
//!
//! Maps one schema property plus its filetype side-channel entry to a
//! discrete field kind, for both directions. The kind decides which widget
//! edits an input field and which view renders an output field, so every
//! downstream dispatch is an exhaustive match instead of repeated schema
//! probing.

use crate::types::{FileType, InputProperty, OutputProperty};

// ============================================================================
// Kinds
// ============================================================================

/// Classification of one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFieldKind {
    /// File-valued, editing restricted to the carried category.
    File(FileType),
    Str,
    /// String with a length bound.
    ConStr,
    Int,
    /// Integer with a numeric bound.
    ConInt,
    Float,
    /// Float with a numeric bound.
    ConFloat,
    Bool,
    StrChoice,
    IntChoice,
    FloatChoice,
}

/// Classification of one output field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFieldKind {
    File(FileType),
    /// List whose elements are files of the carried category.
    FileList(FileType),
    /// Dict whose values are files of the carried category.
    FileDict(FileType),
    Str,
    Number,
    Bool,
    /// Opaque structured fallback; always renderable.
    Json,
}

// ============================================================================
// Errors
// ============================================================================

/// Schema-contract violations detected while classifying or building a
/// widget. These are not transient: they abort rendering of the affected
/// field and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("unsupported declared type `{declared}`")]
    UnsupportedType { declared: String },
    #[error("choice field without a choices list")]
    MissingChoices,
}

// ============================================================================
// Classification
// ============================================================================

/// Classify an input field.
///
/// First match wins: filetype, then choices, then the declared primitive.
/// A declared type outside {string, integer, number, boolean} is an error;
/// the form renders an error block for that field instead of guessing.
pub fn classify_input(
    prop: &InputProperty,
    filetype: Option<FileType>,
) -> Result<InputFieldKind, FieldError> {
    // File: the side-channel overrides the declared primitive type.
    if let Some(ft) = filetype {
        return Ok(InputFieldKind::File(ft));
    }

    let declared = prop.type_.as_deref();

    // Choices
    let has_choices = prop
        .choices
        .as_ref()
        .map(|c| !c.is_empty())
        .unwrap_or(false);
    if has_choices {
        match declared {
            Some("string") => return Ok(InputFieldKind::StrChoice),
            Some("integer") => return Ok(InputFieldKind::IntChoice),
            Some("number") => return Ok(InputFieldKind::FloatChoice),
            _ => {}
        }
    }

    match declared {
        Some("integer") => Ok(if prop.has_numeric_bound() {
            InputFieldKind::ConInt
        } else {
            InputFieldKind::Int
        }),
        Some("number") => Ok(if prop.has_numeric_bound() {
            InputFieldKind::ConFloat
        } else {
            InputFieldKind::Float
        }),
        Some("boolean") => Ok(InputFieldKind::Bool),
        Some("string") => Ok(if prop.has_length_bound() {
            InputFieldKind::ConStr
        } else {
            InputFieldKind::Str
        }),
        other => Err(FieldError::UnsupportedType {
            declared: other.unwrap_or("unspecified").to_string(),
        }),
    }
}

/// Classify an output field. Total: anything the other arms do not claim
/// falls back to `Json`, so every server-provided field stays renderable.
pub fn classify_output(
    prop: &OutputProperty,
    filetype: Option<FileType>,
    item_filetype: Option<FileType>,
) -> OutputFieldKind {
    if let Some(ft) = filetype {
        return OutputFieldKind::File(ft);
    }

    if let Some(item) = item_filetype {
        if prop.is_array() {
            return OutputFieldKind::FileList(item);
        }
        if prop.is_dict() {
            return OutputFieldKind::FileDict(item);
        }
    }

    match prop.type_.as_deref() {
        Some("integer") | Some("number") => OutputFieldKind::Number,
        Some("boolean") => OutputFieldKind::Bool,
        Some("string") => OutputFieldKind::Str,
        other => {
            // Arrays and objects of non-file values legitimately render as
            // JSON; anything else declared here is a schema the classifier
            // does not recognize, absorbed by the fallback but logged.
            if let Some(declared) = other {
                if declared != "array" && declared != "object" {
                    log::warn!(
                        "output field declares unrecognized type `{}`, rendering as JSON",
                        declared
                    );
                }
            }
            OutputFieldKind::Json
        }
    }
}

/// Choice labels for a choice-kind field.
///
/// The kind guarantees choices were present at classification time, but the
/// widget re-reads them from the property; an absent or empty list here is
/// a configuration-contract violation.
pub fn choice_labels(prop: &InputProperty) -> Result<Vec<String>, FieldError> {
    let choices = prop.choices.as_ref().ok_or(FieldError::MissingChoices)?;
    if choices.is_empty() {
        return Err(FieldError::MissingChoices);
    }
    Ok(choices.iter().map(choice_label).collect())
}

/// Display string of one choice literal (numbers without quotes).
pub fn choice_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a numeric-choice selection back to the stored numeric value.
pub fn parse_numeric_choice(label: &str, integer: bool) -> Option<serde_json::Value> {
    if integer {
        label.parse::<i64>().ok().map(|n| serde_json::json!(n))
    } else {
        label.parse::<f64>().ok().map(|n| serde_json::json!(n))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::item_filetype_key;
    use serde_json::json;

    fn input_prop(value: serde_json::Value) -> InputProperty {
        serde_json::from_value(value).unwrap()
    }

    fn output_prop(value: serde_json::Value) -> OutputProperty {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_filetype_takes_precedence_over_declared_type() {
        for declared in ["string", "integer", "number", "boolean"] {
            let prop = input_prop(json!({"type": declared}));
            assert_eq!(
                classify_input(&prop, Some(FileType::Image)),
                Ok(InputFieldKind::File(FileType::Image)),
                "declared type {} should lose to the filetype side-channel",
                declared
            );
        }

        let out = output_prop(json!({"type": "string"}));
        assert_eq!(
            classify_output(&out, Some(FileType::Audio), None),
            OutputFieldKind::File(FileType::Audio)
        );
    }

    #[test]
    fn test_integer_classification() {
        let unbounded = input_prop(json!({"type": "integer"}));
        assert_eq!(classify_input(&unbounded, None), Ok(InputFieldKind::Int));

        let bounded = input_prop(json!({"type": "integer", "minimum": 0, "maximum": 10}));
        assert_eq!(classify_input(&bounded, None), Ok(InputFieldKind::ConInt));

        let half_bounded = input_prop(json!({"type": "integer", "maximum": 10}));
        assert_eq!(
            classify_input(&half_bounded, None),
            Ok(InputFieldKind::ConInt)
        );
    }

    #[test]
    fn test_float_classification() {
        let unbounded = input_prop(json!({"type": "number"}));
        assert_eq!(classify_input(&unbounded, None), Ok(InputFieldKind::Float));

        let bounded = input_prop(json!({"type": "number", "minimum": 0.5}));
        assert_eq!(classify_input(&bounded, None), Ok(InputFieldKind::ConFloat));
    }

    #[test]
    fn test_string_classification() {
        let plain = input_prop(json!({"type": "string"}));
        assert_eq!(classify_input(&plain, None), Ok(InputFieldKind::Str));

        let bounded = input_prop(json!({"type": "string", "max_length": 80}));
        assert_eq!(classify_input(&bounded, None), Ok(InputFieldKind::ConStr));
    }

    #[test]
    fn test_bool_classification() {
        let prop = input_prop(json!({"type": "boolean"}));
        assert_eq!(classify_input(&prop, None), Ok(InputFieldKind::Bool));
    }

    #[test]
    fn test_choice_classification() {
        let strings = input_prop(json!({"type": "string", "choices": ["a", "b"]}));
        assert_eq!(classify_input(&strings, None), Ok(InputFieldKind::StrChoice));

        let ints = input_prop(json!({"type": "integer", "choices": [1, 2, 3]}));
        assert_eq!(classify_input(&ints, None), Ok(InputFieldKind::IntChoice));

        let floats = input_prop(json!({"type": "number", "choices": [0.5, 1.0]}));
        assert_eq!(
            classify_input(&floats, None),
            Ok(InputFieldKind::FloatChoice)
        );

        // Choices on an unsupported carrier type fall through to the
        // declared-type branches.
        let bools = input_prop(json!({"type": "boolean", "choices": [true]}));
        assert_eq!(classify_input(&bools, None), Ok(InputFieldKind::Bool));

        // An empty list is not a choice field.
        let empty = input_prop(json!({"type": "integer", "choices": []}));
        assert_eq!(classify_input(&empty, None), Ok(InputFieldKind::Int));
    }

    #[test]
    fn test_choices_take_precedence_over_bounds() {
        let prop = input_prop(json!({
            "type": "integer",
            "choices": [1, 2],
            "minimum": 0,
            "maximum": 10
        }));
        assert_eq!(classify_input(&prop, None), Ok(InputFieldKind::IntChoice));
    }

    #[test]
    fn test_unknown_input_type_is_an_error() {
        let arr = input_prop(json!({"type": "array"}));
        assert_eq!(
            classify_input(&arr, None),
            Err(FieldError::UnsupportedType {
                declared: "array".to_string()
            })
        );

        let missing = input_prop(json!({}));
        assert!(matches!(
            classify_input(&missing, None),
            Err(FieldError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let prop = input_prop(json!({"type": "number", "minimum": 0.0}));
        assert_eq!(classify_input(&prop, None), classify_input(&prop, None));

        let out = output_prop(json!({"type": "array", "items": {"type": "string"}}));
        assert_eq!(
            classify_output(&out, None, Some(FileType::Image)),
            classify_output(&out, None, Some(FileType::Image))
        );
    }

    #[test]
    fn test_output_file_list_and_dict() {
        let list = output_prop(json!({"type": "array", "items": {}}));
        assert_eq!(
            classify_output(&list, None, Some(FileType::Image)),
            OutputFieldKind::FileList(FileType::Image)
        );

        let dict = output_prop(json!({"type": "object", "additionalProperties": {}}));
        assert_eq!(
            classify_output(&dict, None, Some(FileType::Audio)),
            OutputFieldKind::FileDict(FileType::Audio)
        );

        // A dict needs the additionalProperties schema to count as one.
        let bare_object = output_prop(json!({"type": "object"}));
        assert_eq!(
            classify_output(&bare_object, None, Some(FileType::Audio)),
            OutputFieldKind::Json
        );
    }

    #[test]
    fn test_output_scalars() {
        assert_eq!(
            classify_output(&output_prop(json!({"type": "integer"})), None, None),
            OutputFieldKind::Number
        );
        assert_eq!(
            classify_output(&output_prop(json!({"type": "number"})), None, None),
            OutputFieldKind::Number
        );
        assert_eq!(
            classify_output(&output_prop(json!({"type": "boolean"})), None, None),
            OutputFieldKind::Bool
        );
        assert_eq!(
            classify_output(&output_prop(json!({"type": "string"})), None, None),
            OutputFieldKind::Str
        );
    }

    #[test]
    fn test_output_fallback_never_fails() {
        // Object without item filetype, ref-only property, unknown declared
        // type: everything lands on JSON.
        assert_eq!(
            classify_output(&output_prop(json!({"type": "object"})), None, None),
            OutputFieldKind::Json
        );
        assert_eq!(
            classify_output(
                &output_prop(json!({"$ref": "#/definitions/Nested"})),
                None,
                None
            ),
            OutputFieldKind::Json
        );
        assert_eq!(
            classify_output(&output_prop(json!({"type": "tensor"})), None, None),
            OutputFieldKind::Json
        );
    }

    #[test]
    fn test_item_filetype_requires_container_shape() {
        // An item filetype on a scalar field does not produce a file kind.
        let scalar = output_prop(json!({"type": "string"}));
        assert_eq!(
            classify_output(&scalar, None, Some(FileType::Image)),
            OutputFieldKind::Str
        );
        // Sanity check on the key convention used to look the entry up.
        assert_eq!(item_filetype_key("frames"), "frames.$item");
    }

    #[test]
    fn test_choice_labels() {
        let prop = input_prop(json!({"type": "string", "choices": ["fast", "slow"]}));
        assert_eq!(
            choice_labels(&prop).unwrap(),
            vec!["fast".to_string(), "slow".to_string()]
        );

        let missing = input_prop(json!({"type": "string"}));
        assert_eq!(choice_labels(&missing), Err(FieldError::MissingChoices));

        let empty = input_prop(json!({"type": "string", "choices": []}));
        assert_eq!(choice_labels(&empty), Err(FieldError::MissingChoices));
    }

    #[test]
    fn test_numeric_choice_round_trip() {
        let int_choices = vec![json!(1), json!(5), json!(25)];
        for choice in &int_choices {
            let label = choice_label(choice);
            assert_eq!(parse_numeric_choice(&label, true).as_ref(), Some(choice));
        }

        let float_choices = vec![json!(0.25), json!(1.5), json!(2.0)];
        for choice in &float_choices {
            let label = choice_label(choice);
            assert_eq!(parse_numeric_choice(&label, false).as_ref(), Some(choice));
        }
    }
}
