//! Run page: dynamic input form, prediction submission, status polling,
//! and output rendering.
//!
//! The form widgets write into one shared value map; on submit, picked
//! files are uploaded and replaced by serving URLs before the prediction
//! request goes out. A 500 ms poll loop follows the prediction until a
//! terminal status; a generation counter stops superseded loops.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::web_sys;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use super::fields::input::InputField;
use super::fields::output::{pretty_json, OutputFields};
use super::TryExampleSignal;
use crate::api;
use crate::types::*;

const POLL_INTERVAL_MS: u32 = 500;

/// How the success panel shows the result.
#[derive(Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Preview,
    Json,
}

#[component]
pub fn RunPage() -> impl IntoView {
    let metadata = expect_context::<RwSignal<Option<Metadata>>>();

    view! {
        {move || match metadata.get() {
            Some(meta) => view! { <ModelRun metadata=meta /> }.into_any(),
            None => view! {
                <div class="p-6 text-gray-500">"Loading model..."</div>
            }.into_any(),
        }}
    }
}

#[component]
fn ModelRun(metadata: Metadata) -> impl IntoView {
    let form_values = RwSignal::new(HashMap::<String, Value>::new());
    let form_files = RwSignal::new(HashMap::<String, web_sys::File>::new());
    let show_optional = RwSignal::new(false);
    let prediction = RwSignal::new(Option::<Prediction>::None);
    let submit_error = RwSignal::new(Option::<String>::None);
    let save_message = RwSignal::new(Option::<String>::None);
    let output_mode = RwSignal::new(OutputMode::Preview);
    // Bumped whenever a run is superseded; stale poll loops notice and stop.
    let run_generation = RwSignal::new(0u64);

    // Seed defaults, then overlay an example chosen in the gallery.
    form_values.set(default_values(&metadata.input_schema));
    let try_example = expect_context::<TryExampleSignal>();
    if let Some(example) = try_example.0.get_untracked() {
        try_example.0.set(None);
        form_values.update(|values| {
            for (name, value) in example.input {
                values.insert(name, value);
            }
        });
    }

    let in_flight = move || {
        prediction
            .get()
            .map(|p| p.status.is_in_flight())
            .unwrap_or(false)
    };

    // ------------------------------------------------------------------
    // Submit
    // ------------------------------------------------------------------

    let meta_for_submit = metadata.clone();
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit_error.set(None);
        save_message.set(None);

        let meta = meta_for_submit.clone();
        let values = form_values.get_untracked();
        let files = form_files.get_untracked();

        if let Err(message) = check_required(&meta.input_schema, &values, &files) {
            submit_error.set(Some(message));
            return;
        }

        let generation = run_generation.get_untracked() + 1;
        run_generation.set(generation);
        let previous = prediction.get_untracked();
        output_mode.set(OutputMode::Preview);

        wasm_bindgen_futures::spawn_local(async move {
            // A not-yet-finished prediction is superseded by the new run.
            if let Some(prev) = previous {
                if prev.status.is_in_flight() {
                    let _ = api::cancel_prediction(&prev.id).await;
                }
            }

            let mut input = values;
            for (name, file) in files {
                match api::upload_file(&file).await {
                    Ok(resp) => {
                        input.insert(name, Value::String(resp.serving_url));
                    }
                    Err(err) => {
                        submit_error.set(Some(format!("Failed to upload `{}`: {}", name, err)));
                        return;
                    }
                }
            }

            let id = match api::create_prediction(&input).await {
                Ok(resp) => resp.prediction_id,
                Err(err) => {
                    submit_error.set(Some(format!("Failed to start prediction: {}", err)));
                    return;
                }
            };

            prediction.set(Some(Prediction {
                id: id.clone(),
                status: PredictionStatus::Pending,
                input,
                output: None,
                demo_output: None,
                logs: None,
                failure_reason: None,
            }));

            loop {
                TimeoutFuture::new(POLL_INTERVAL_MS).await;
                if run_generation.get_untracked() != generation {
                    return;
                }
                match api::get_prediction(&id).await {
                    Ok(update) => {
                        let terminal = update.status.is_terminal();
                        prediction.set(Some(update));
                        if terminal {
                            return;
                        }
                    }
                    Err(err) => {
                        // Transient poll failures keep the loop alive.
                        log::error!("failed to poll prediction {}: {}", id, err);
                    }
                }
            }
        });
    };

    // ------------------------------------------------------------------
    // Cancel / clear / reset / save
    // ------------------------------------------------------------------

    let on_cancel = move |_| {
        if let Some(current) = prediction.get_untracked() {
            run_generation.update(|g| *g += 1);
            prediction.set(None);
            wasm_bindgen_futures::spawn_local(async move {
                let _ = api::cancel_prediction(&current.id).await;
            });
        }
    };

    let on_clear = move |_| {
        run_generation.update(|g| *g += 1);
        prediction.set(None);
        save_message.set(None);
    };

    let schema_for_reset = metadata.input_schema.clone();
    let on_reset = move |_| {
        form_values.set(default_values(&schema_for_reset));
        form_files.set(HashMap::new());
        submit_error.set(None);
    };

    let on_save = move |_| {
        if let Some(current) = prediction.get_untracked() {
            wasm_bindgen_futures::spawn_local(async move {
                match api::save_prediction_as_example(&current.id).await {
                    Ok(_) => {
                        save_message.set(Some("Saved to examples".to_string()));
                        let handle = gloo_timers::callback::Timeout::new(3000, move || {
                            save_message.set(None);
                        });
                        handle.forget();
                    }
                    Err(err) => {
                        save_message.set(Some(format!("Failed to save: {}", err)));
                    }
                }
            });
        }
    };

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    let schema = metadata.input_schema.clone();
    let input_filetypes = metadata.input_filetypes.clone();
    let demo_schema = metadata.demo_output_schema.clone();
    let demo_filetypes = metadata.demo_output_filetypes.clone();
    let has_optional = schema.has_optional_fields();

    view! {
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 p-6 items-start">
            // Input card
            <div class="bg-white rounded-lg shadow p-4">
                <div class="flex items-center justify-between mb-4">
                    <h2 class="text-lg font-semibold text-gray-700">"Input"</h2>
                    {has_optional.then(|| view! {
                        <label class="inline-flex items-center gap-2 text-sm text-gray-600 cursor-pointer">
                            <input
                                type="checkbox"
                                class="w-4 h-4 accent-blue-600"
                                prop:checked=move || show_optional.get()
                                on:change=move |ev| show_optional.set(event_target_checked(&ev))
                            />
                            "Show optional fields"
                        </label>
                    })}
                </div>

                {move || submit_error.get().map(|message| view! {
                    <div class="mb-4 px-3 py-2 text-sm text-red-700 bg-red-50 border border-red-200 rounded-md flex items-center justify-between">
                        <span>{message}</span>
                        <button
                            type="button"
                            class="text-red-400 hover:text-red-600"
                            on:click=move |_| submit_error.set(None)
                        >
                            "\u{00d7}"
                        </button>
                    </div>
                })}

                <form on:submit=on_submit>
                    <div class="space-y-4">
                        {schema.ordered_field_names().into_iter().filter_map(|name| {
                            let prop = schema.properties.get(&name)?.clone();
                            let required = schema.is_required(&name);
                            let filetype = input_filetypes.get(&name).copied();
                            let description = prop.description.clone();
                            Some(view! {
                                <div style=move || {
                                    if required || show_optional.get() { "" } else { "display: none" }
                                }>
                                    <div class="flex items-center gap-1 mb-1">
                                        <span class="text-sm font-medium text-gray-700 font-mono">
                                            {name.clone()}
                                        </span>
                                        {required.then(|| view! {
                                            <span class="text-xs text-red-500 font-medium">"*"</span>
                                        })}
                                    </div>
                                    {description.map(|desc| view! {
                                        <p class="text-xs text-gray-500 mb-1">{desc}</p>
                                    })}
                                    <InputField
                                        name=name
                                        prop=prop
                                        filetype=filetype
                                        form_values=form_values
                                        form_files=form_files
                                    />
                                </div>
                            })
                        }).collect_view()}
                    </div>

                    <div class="flex justify-end gap-2 mt-6">
                        <button
                            type="button"
                            class="px-4 py-2 text-sm border border-gray-300 rounded-md hover:bg-gray-50"
                            on:click=on_reset
                        >
                            "Reset"
                        </button>
                        <button
                            type="submit"
                            class="px-4 py-2 text-sm text-white bg-blue-600 rounded-md hover:bg-blue-700 disabled:opacity-50"
                            disabled=in_flight
                        >
                            {move || if in_flight() { "Running..." } else { "Run" }}
                        </button>
                    </div>
                </form>
            </div>

            // Output card
            <div class="bg-white rounded-lg shadow p-4">
                <h2 class="text-lg font-semibold text-gray-700 mb-4">"Output"</h2>
                {move || {
                    let demo_schema = demo_schema.clone();
                    let demo_filetypes = demo_filetypes.clone();
                    match prediction.get() {
                        None => view! {
                            <div class="py-12 text-center text-sm text-gray-400">
                                "Run the model to see output here."
                            </div>
                        }.into_any(),
                        Some(pred) => match pred.status {
                            PredictionStatus::Pending | PredictionStatus::Running => view! {
                                <div class="space-y-4">
                                    <div class="flex items-center gap-2 text-sm text-gray-600">
                                        <span class="w-3 h-3 rounded-full bg-blue-500 animate-pulse"></span>
                                        {if pred.status == PredictionStatus::Pending {
                                            "Waiting for the model..."
                                        } else {
                                            "Running..."
                                        }}
                                    </div>
                                    {(pred.status == PredictionStatus::Running).then(|| view! {
                                        <LogsArea logs=pred.logs.clone().unwrap_or_default() />
                                    })}
                                    <button
                                        type="button"
                                        class="w-full px-4 py-2 text-sm border border-gray-300 rounded-md hover:bg-gray-50"
                                        on:click=on_cancel.clone()
                                    >
                                        "Cancel"
                                    </button>
                                </div>
                            }.into_any(),

                            PredictionStatus::Failed => view! {
                                <div class="space-y-4">
                                    <div class="px-3 py-2 text-sm text-red-700 bg-red-50 border border-red-200 rounded-md">
                                        {pred.failure_reason
                                            .map(|r| r.message())
                                            .unwrap_or("The prediction failed")}
                                    </div>
                                    <LogsArea logs=pred.logs.clone().unwrap_or_default() />
                                    <ClearButton on_clear=on_clear.clone() />
                                </div>
                            }.into_any(),

                            PredictionStatus::Canceled => view! {
                                <div class="space-y-4">
                                    <div class="px-3 py-2 text-sm text-gray-600 bg-gray-50 border border-gray-200 rounded-md">
                                        "Prediction canceled."
                                    </div>
                                    <ClearButton on_clear=on_clear.clone() />
                                </div>
                            }.into_any(),

                            PredictionStatus::Success => {
                                let demo_output = pred.demo_output.clone().unwrap_or_default();
                                let raw_output = pred.output.clone().unwrap_or_default();
                                view! {
                                    <div class="space-y-4">
                                        <ModeToggle mode=output_mode />
                                        {move || match output_mode.get() {
                                            OutputMode::Preview => view! {
                                                <OutputFields
                                                    schema=demo_schema.clone()
                                                    filetypes=demo_filetypes.clone()
                                                    values=demo_output.clone()
                                                />
                                            }.into_any(),
                                            OutputMode::Json => view! {
                                                <pre class="px-3 py-2 text-xs bg-gray-50 border border-gray-200 rounded-md whitespace-pre-wrap break-words font-mono overflow-x-auto">
                                                    {output_json(&raw_output)}
                                                </pre>
                                            }.into_any(),
                                        }}
                                        {pred.logs.clone().filter(|l| !l.is_empty()).map(|logs| view! {
                                            <LogsArea logs=logs />
                                        })}
                                        {move || save_message.get().map(|message| view! {
                                            <div class="px-3 py-2 text-sm text-green-700 bg-green-50 border border-green-200 rounded-md">
                                                {message}
                                            </div>
                                        })}
                                        <div class="flex justify-end gap-2">
                                            <button
                                                type="button"
                                                class="px-4 py-2 text-sm border border-gray-300 rounded-md hover:bg-gray-50"
                                                on:click=on_save.clone()
                                            >
                                                "Save as example"
                                            </button>
                                            <ClearButton on_clear=on_clear.clone() />
                                        </div>
                                    </div>
                                }.into_any()
                            }
                        },
                    }
                }}
            </div>
        </div>
    }
}

// ============================================================================
// Pieces
// ============================================================================

#[component]
fn LogsArea(logs: String) -> impl IntoView {
    view! {
        <pre class="px-3 py-2 text-xs bg-gray-900 text-gray-100 rounded-md max-h-64 overflow-y-auto whitespace-pre-wrap break-words font-mono">
            {logs}
        </pre>
    }
}

#[component]
fn ClearButton<F>(on_clear: F) -> impl IntoView
where
    F: FnMut(web_sys::MouseEvent) + 'static,
{
    view! {
        <button
            type="button"
            class="px-4 py-2 text-sm border border-gray-300 rounded-md hover:bg-gray-50"
            on:click=on_clear
        >
            "Clear"
        </button>
    }
}

#[component]
fn ModeToggle(mode: RwSignal<OutputMode>) -> impl IntoView {
    let button_class = move |active: bool| {
        if active {
            "px-2 py-1 text-xs font-medium rounded bg-white shadow text-gray-900"
        } else {
            "px-2 py-1 text-xs font-medium rounded text-gray-600 hover:text-gray-900"
        }
    };

    view! {
        <div class="inline-flex bg-gray-100 rounded-lg p-0.5">
            <button
                type="button"
                class=move || button_class(mode.get() == OutputMode::Preview)
                on:click=move |_| mode.set(OutputMode::Preview)
            >
                "Preview"
            </button>
            <button
                type="button"
                class=move || button_class(mode.get() == OutputMode::Json)
                on:click=move |_| mode.set(OutputMode::Json)
            >
                "JSON"
            </button>
        </div>
    }
}

// ============================================================================
// Form helpers
// ============================================================================

/// Initial form values: every schema default, verbatim.
fn default_values(schema: &InputSchema) -> HashMap<String, Value> {
    schema
        .properties
        .iter()
        .filter_map(|(name, prop)| {
            prop.default
                .clone()
                .map(|default| (name.clone(), default))
        })
        .collect()
}

/// Every required field must have a non-empty value or a picked file.
fn check_required(
    schema: &InputSchema,
    values: &HashMap<String, Value>,
    files: &HashMap<String, web_sys::File>,
) -> Result<(), String> {
    for name in schema.ordered_field_names() {
        if !schema.is_required(&name) {
            continue;
        }
        if files.contains_key(&name) {
            continue;
        }
        let filled = match values.get(&name) {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        if !filled {
            return Err(format!("Field `{}` is required", name));
        }
    }
    Ok(())
}

/// Raw output document as deterministic pretty JSON.
fn output_json(output: &HashMap<String, Value>) -> String {
    let sorted: BTreeMap<&String, &Value> = output.iter().collect();
    match serde_json::to_value(&sorted) {
        Ok(value) => pretty_json(&value),
        Err(_) => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> InputSchema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_values_seeded_from_schema() {
        let schema = schema(json!({
            "properties": {
                "prompt": {"type": "string"},
                "steps": {"type": "integer", "default": 20},
                "upscale": {"type": "boolean", "default": false}
            }
        }));
        let values = default_values(&schema);
        assert_eq!(values.get("steps"), Some(&json!(20)));
        assert_eq!(values.get("upscale"), Some(&json!(false)));
        assert!(!values.contains_key("prompt"));
    }

    #[test]
    fn test_check_required_rejects_missing_and_empty() {
        let schema = schema(json!({
            "properties": {
                "prompt": {"type": "string"},
                "seed": {"type": "integer"}
            },
            "required": ["prompt"]
        }));

        let empty = HashMap::new();
        assert!(check_required(&schema, &empty, &HashMap::new()).is_err());

        let mut blank = HashMap::new();
        blank.insert("prompt".to_string(), json!(""));
        assert!(check_required(&schema, &blank, &HashMap::new()).is_err());

        let mut filled = HashMap::new();
        filled.insert("prompt".to_string(), json!("a cat"));
        assert!(check_required(&schema, &filled, &HashMap::new()).is_ok());
    }

    #[test]
    fn test_check_required_ignores_optional_fields() {
        let schema = schema(json!({
            "properties": {"seed": {"type": "integer"}},
            "required": []
        }));
        assert!(check_required(&schema, &HashMap::new(), &HashMap::new()).is_ok());
    }

    #[test]
    fn test_output_json_is_sorted_and_indented() {
        let mut output = HashMap::new();
        output.insert("b".to_string(), json!(2));
        output.insert("a".to_string(), json!(1));
        assert_eq!(output_json(&output), "{\n  \"a\": 1,\n  \"b\": 2\n}");
    }
}
