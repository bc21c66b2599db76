//! Output field rendering
//!
//! Read-only views over a prediction's output document: file previews,
//! recursive file lists/dicts, text and scalar blocks, and a pretty-printed
//! JSON fallback. The output classifier is total, so every field the
//! server reports is renderable.

use leptos::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::file_view::FileView;
use super::kinds::{classify_output, OutputFieldKind};
use crate::types::{item_filetype_key, FileType, FileTypeMap, OutputProperty, OutputSchema};

// ============================================================================
// Containers
// ============================================================================

/// Renders every field of an output document, labeled, in stable order.
#[component]
pub fn OutputFields(
    schema: OutputSchema,
    filetypes: FileTypeMap,
    values: HashMap<String, Value>,
) -> impl IntoView {
    view! {
        <div class="space-y-4">
            {schema.ordered_field_names().into_iter().map(|name| {
                let prop = schema.properties.get(&name).cloned().unwrap_or_default();
                let filetype = filetypes.get(&name).copied();
                let item_filetype = filetypes.get(&item_filetype_key(&name)).copied();
                let value = values.get(&name).cloned();
                view! {
                    <div>
                        <div class="text-sm font-medium text-gray-700 mb-1">{name.clone()}</div>
                        {match value {
                            Some(v) => output_view(&prop, filetype, item_filetype, &v),
                            None => view! {
                                <div class="text-sm text-gray-400 italic">"(no value)"</div>
                            }.into_any(),
                        }}
                    </div>
                }
            }).collect_view()}
        </div>
    }
}

// ============================================================================
// Field dispatch
// ============================================================================

/// View of one output value, recursive through file lists and dicts.
pub fn output_view(
    prop: &OutputProperty,
    filetype: Option<FileType>,
    item_filetype: Option<FileType>,
    value: &Value,
) -> AnyView {
    match classify_output(prop, filetype, item_filetype) {
        OutputFieldKind::File(ft) => file_view(ft, value),

        OutputFieldKind::FileList(item) => {
            let items_prop = prop
                .items
                .as_deref()
                .cloned()
                .unwrap_or_default();
            let elements = value.as_array().cloned().unwrap_or_default();
            view! {
                <div class="space-y-2">
                    {elements.into_iter().map(|element| {
                        output_view(&items_prop, Some(item), None, &element)
                    }).collect_view()}
                </div>
            }
            .into_any()
        }

        OutputFieldKind::FileDict(item) => {
            let value_prop = prop
                .additional_properties
                .as_ref()
                .and_then(|a| a.schema())
                .cloned()
                .unwrap_or_default();
            let mut entries: Vec<(String, Value)> = value
                .as_object()
                .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            view! {
                <div class="space-y-2">
                    {entries.into_iter().map(|(key, element)| {
                        let element_view = output_view(&value_prop, Some(item), None, &element);
                        view! {
                            <div>
                                <div class="text-xs text-gray-500 mb-1">{key}</div>
                                {element_view}
                            </div>
                        }
                    }).collect_view()}
                </div>
            }
            .into_any()
        }

        OutputFieldKind::Str => match value.as_str() {
            Some(text) => text_block(text.to_string()),
            // A declared string holding something else degrades, it
            // does not fail.
            None => code_block(pretty_json(value)),
        },

        OutputFieldKind::Number | OutputFieldKind::Bool => text_block(scalar_text(value)),

        OutputFieldKind::Json => code_block(pretty_json(value)),
    }
}

fn file_view(filetype: FileType, value: &Value) -> AnyView {
    match value.as_str() {
        Some(url) => view! { <FileView url=url.to_string() filetype=filetype /> }.into_any(),
        None => code_block(pretty_json(value)),
    }
}

fn text_block(text: String) -> AnyView {
    view! {
        <pre class="px-3 py-2 text-sm bg-gray-50 border border-gray-200 rounded-md whitespace-pre-wrap break-words font-sans">
            {text}
        </pre>
    }
    .into_any()
}

fn code_block(text: String) -> AnyView {
    view! {
        <pre class="px-3 py-2 text-xs bg-gray-50 border border-gray-200 rounded-md whitespace-pre-wrap break-words font-mono overflow-x-auto">
            {text}
        </pre>
    }
    .into_any()
}

// ============================================================================
// Value formatting
// ============================================================================

/// Stringified form of a scalar output value.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => pretty_json(other),
    }
}

/// Pretty-printed JSON with two-space indentation.
pub fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| value.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let value = json!({"a": [1, 2]});
        let printed = pretty_json(&value);
        assert_eq!(printed, "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(3)), "3");
        assert_eq!(scalar_text(&json!(2.5)), "2.5");
        assert_eq!(scalar_text(&json!(true)), "true");
        assert_eq!(scalar_text(&json!("plain")), "plain");
    }

    #[test]
    fn test_scalar_text_degrades_to_json() {
        assert_eq!(scalar_text(&json!([1])), "[\n  1\n]");
    }
}
