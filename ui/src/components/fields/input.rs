//! Input field widgets
//!
//! One editable widget per input field kind, all reading and writing
//! through the shared form-value map. The dispatch is an exhaustive match
//! on the classified kind; contract violations render an error block for
//! the affected field only.

use leptos::prelude::*;
use leptos::web_sys;
use serde_json::{json, Value};
use std::collections::HashMap;
use wasm_bindgen::JsCast;

use super::file_input::FileInput;
use super::kinds::*;
use crate::types::{FileType, InputProperty};

// ============================================================================
// Dispatch
// ============================================================================

/// Renders the editing widget for one input field.
#[component]
pub fn InputField(
    name: String,
    prop: InputProperty,
    filetype: Option<FileType>,
    form_values: RwSignal<HashMap<String, Value>>,
    form_files: RwSignal<HashMap<String, web_sys::File>>,
) -> impl IntoView {
    let kind = match classify_input(&prop, filetype) {
        Ok(kind) => kind,
        Err(err) => return field_error_view(&name, &err),
    };

    match kind {
        InputFieldKind::File(ft) => view! {
            <FileInput
                name=name
                filetype=ft
                form_values=form_values
                form_files=form_files
            />
        }
        .into_any(),

        InputFieldKind::Str | InputFieldKind::ConStr => view! {
            <TextInput
                name=name
                min_length=prop.min_length
                max_length=prop.max_length
                form_values=form_values
            />
        }
        .into_any(),

        InputFieldKind::Int | InputFieldKind::Float => view! {
            <NumberInput
                name=name
                is_integer=matches!(kind, InputFieldKind::Int)
                minimum=prop.minimum
                maximum=prop.maximum
                with_slider=false
                form_values=form_values
            />
        }
        .into_any(),

        // Constrained numeric kinds pair the stepper with a slider bound
        // to the same form value.
        InputFieldKind::ConInt | InputFieldKind::ConFloat => view! {
            <NumberInput
                name=name
                is_integer=matches!(kind, InputFieldKind::ConInt)
                minimum=prop.minimum
                maximum=prop.maximum
                with_slider=true
                form_values=form_values
            />
        }
        .into_any(),

        InputFieldKind::Bool => view! {
            <BoolToggle name=name form_values=form_values />
        }
        .into_any(),

        InputFieldKind::StrChoice => match choice_labels(&prop) {
            Ok(labels) => view! {
                <ChoiceSelect name=name labels=labels numeric=None form_values=form_values />
            }
            .into_any(),
            Err(err) => field_error_view(&name, &err),
        },

        InputFieldKind::IntChoice | InputFieldKind::FloatChoice => {
            let integer = matches!(kind, InputFieldKind::IntChoice);
            match choice_labels(&prop) {
                Ok(labels) => view! {
                    <ChoiceSelect
                        name=name
                        labels=labels
                        numeric=Some(integer)
                        form_values=form_values
                    />
                }
                .into_any(),
                Err(err) => field_error_view(&name, &err),
            }
        }
    }
}

fn field_error_view(name: &str, err: &FieldError) -> AnyView {
    log::error!("cannot render input field `{}`: {}", name, err);
    view! {
        <div class="px-3 py-2 text-sm text-red-700 bg-red-50 border border-red-200 rounded-md">
            {format!("Cannot render this field: {}", err)}
        </div>
    }
    .into_any()
}

// ============================================================================
// Text input
// ============================================================================

#[component]
fn TextInput(
    name: String,
    min_length: Option<u64>,
    max_length: Option<u64>,
    form_values: RwSignal<HashMap<String, Value>>,
) -> impl IntoView {
    let name_for_change = name.clone();
    let on_change = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        form_values.update(|v| {
            v.insert(name_for_change.clone(), Value::String(value));
        });
    };

    let minlength_attr = min_length.map(|v| v.to_string());
    let maxlength_attr = max_length.map(|v| v.to_string());

    view! {
        <textarea
            rows=2
            class="w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
            minlength=minlength_attr
            maxlength=maxlength_attr
            prop:value=move || {
                form_values.get()
                    .get(&name)
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .unwrap_or_default()
            }
            on:input=on_change
        />
    }
}

// ============================================================================
// Number input
// ============================================================================

#[component]
fn NumberInput(
    name: String,
    is_integer: bool,
    minimum: Option<f64>,
    maximum: Option<f64>,
    with_slider: bool,
    form_values: RwSignal<HashMap<String, Value>>,
) -> impl IntoView {
    let parse_into = move |raw: String| {
        if is_integer {
            raw.parse::<i64>().ok().map(|n| json!(n))
        } else {
            raw.parse::<f64>().ok().map(|n| json!(n))
        }
    };

    let name_for_input = name.clone();
    let on_input = move |ev: web_sys::Event| {
        if let Some(val) = parse_into(event_target_value(&ev)) {
            form_values.update(|v| {
                v.insert(name_for_input.clone(), val);
            });
        }
    };

    let name_for_display = name.clone();
    let display = move || {
        form_values
            .get()
            .get(&name_for_display)
            .and_then(|v| v.as_f64())
            .map(|n| n.to_string())
            .unwrap_or_default()
    };

    let step = if is_integer { "1" } else { "0.01" };
    let min_attr = minimum.map(|v| v.to_string());
    let max_attr = maximum.map(|v| v.to_string());
    let width = if with_slider { "w-24" } else { "w-full" };

    let stepper = view! {
        <input
            type="number"
            step=step
            min=min_attr.clone()
            max=max_attr.clone()
            class=format!("{} px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500", width)
            prop:value=display.clone()
            on:input=on_input.clone()
        />
    };

    if !with_slider {
        return stepper.into_any();
    }

    view! {
        <div class="flex items-center gap-3">
            {stepper}
            <input
                type="range"
                step=step
                min=min_attr
                max=max_attr
                class="flex-1 accent-blue-600"
                prop:value=display
                on:input=on_input
            />
        </div>
    }
    .into_any()
}

// ============================================================================
// Boolean toggle
// ============================================================================

#[component]
fn BoolToggle(name: String, form_values: RwSignal<HashMap<String, Value>>) -> impl IntoView {
    let name_for_change = name.clone();
    let on_change = move |ev: web_sys::Event| {
        let checked = event_target_checked(&ev);
        form_values.update(|v| {
            v.insert(name_for_change.clone(), Value::Bool(checked));
        });
    };

    let name_for_label = name.clone();
    let is_on = move |name: &str| {
        form_values
            .get()
            .get(name)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    };
    let is_on_for_label = is_on.clone();

    view! {
        <label class="inline-flex items-center gap-2 cursor-pointer">
            <input
                type="checkbox"
                class="w-4 h-4 accent-blue-600"
                prop:checked=move || is_on(&name)
                on:change=on_change
            />
            <span class="text-sm text-gray-600">
                {move || if is_on_for_label(&name_for_label) { "true" } else { "false" }}
            </span>
        </label>
    }
}

// ============================================================================
// Choice select
// ============================================================================

/// Single select over the declared choices. For numeric choices the option
/// labels are stringified numbers while the stored value stays numeric;
/// `numeric` carries the integer-vs-float precision of the conversion.
#[component]
fn ChoiceSelect(
    name: String,
    labels: Vec<String>,
    numeric: Option<bool>,
    form_values: RwSignal<HashMap<String, Value>>,
) -> impl IntoView {
    let name_for_change = name.clone();
    let on_change = move |ev: web_sys::Event| {
        let target = ev.target().unwrap();
        let select: web_sys::HtmlSelectElement = target.dyn_into().unwrap();
        let selected = select.value();

        form_values.update(|v| {
            if selected.is_empty() {
                v.remove(&name_for_change);
                return;
            }
            let stored = match numeric {
                Some(integer) => parse_numeric_choice(&selected, integer),
                None => Some(Value::String(selected.clone())),
            };
            match stored {
                Some(val) => {
                    v.insert(name_for_change.clone(), val);
                }
                None => {
                    v.remove(&name_for_change);
                }
            }
        });
    };

    let selected_label = move || {
        form_values
            .get()
            .get(&name)
            .map(choice_label)
            .unwrap_or_default()
    };

    view! {
        <select
            class="w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
            prop:value=selected_label
            on:change=on_change
        >
            <option value="">"-- Select --"</option>
            {labels.into_iter().map(|label| {
                view! {
                    <option value=label.clone()>{label.clone()}</option>
                }
            }).collect_view()}
        </select>
    }
}
