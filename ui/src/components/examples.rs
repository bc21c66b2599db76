//! Saved-example gallery
//!
//! Lists predictions saved on the server. Each card shows the input
//! values (file inputs as previews) and the rendered demo output; "Try"
//! loads the input back into the run form.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use serde_json::Value;

use super::fields::file_view::FileView;
use super::fields::output::{scalar_text, OutputFields};
use super::TryExampleSignal;
use crate::api;
use crate::types::*;

#[component]
pub fn ExamplesPage() -> impl IntoView {
    let metadata = expect_context::<RwSignal<Option<Metadata>>>();
    let refresh = RwSignal::new(0u32);
    let examples = LocalResource::new(move || {
        // Depend on the refresh counter so deletes reload the list.
        let _ = refresh.get();
        async move { api::list_examples().await }
    });

    view! {
        <div class="p-6">
            <h2 class="text-2xl font-bold mb-6">"Examples"</h2>

            <Suspense fallback=move || view! { <div class="text-gray-500">"Loading examples..."</div> }>
                {move || {
                    match (examples.get(), metadata.get()) {
                        (Some(Ok(list)), Some(meta)) => {
                            if list.is_empty() {
                                view! {
                                    <div class="py-12 text-center text-sm text-gray-400">
                                        "No saved examples yet. Run the model and save a result."
                                    </div>
                                }.into_any()
                            } else {
                                view! {
                                    <div class="space-y-6">
                                        {list.into_iter().map(|example| view! {
                                            <ExampleCard
                                                example=example
                                                metadata=meta.clone()
                                                refresh=refresh
                                            />
                                        }).collect_view()}
                                    </div>
                                }.into_any()
                            }
                        }
                        (Some(Err(err)), _) => view! {
                            <div class="px-3 py-2 text-sm text-red-700 bg-red-50 border border-red-200 rounded-md">
                                {format!("Failed to load examples: {}", err)}
                            </div>
                        }.into_any(),
                        _ => view! {
                            <div class="text-gray-500">"Loading examples..."</div>
                        }.into_any(),
                    }
                }}
            </Suspense>
        </div>
    }
}

#[component]
fn ExampleCard(example: Example, metadata: Metadata, refresh: RwSignal<u32>) -> impl IntoView {
    let try_example = expect_context::<TryExampleSignal>();
    let navigate = use_navigate();

    let example_for_try = example.clone();
    let on_try = move |_| {
        try_example.0.set(Some(example_for_try.clone()));
        navigate("/", Default::default());
    };

    let id_for_delete = example.id.clone();
    let on_delete = move |_| {
        let id = id_for_delete.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match api::delete_example(&id).await {
                Ok(()) => refresh.update(|n| *n += 1),
                Err(err) => log::error!("failed to delete example {}: {}", id, err),
            }
        });
    };

    let mut input_rows: Vec<(String, Value)> = example
        .input
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    input_rows.sort_by(|a, b| a.0.cmp(&b.0));
    let input_filetypes = metadata.input_filetypes.clone();

    view! {
        <div class="bg-white rounded-lg shadow p-4">
            <div class="flex items-center justify-between mb-4">
                <span class="text-xs text-gray-400 font-mono">{format!("#{}", example.id)}</span>
                <div class="flex gap-2">
                    <button
                        type="button"
                        class="px-3 py-1.5 text-sm text-white bg-blue-600 rounded-md hover:bg-blue-700"
                        on:click=on_try
                    >
                        "Try"
                    </button>
                    <button
                        type="button"
                        class="px-3 py-1.5 text-sm text-red-600 border border-red-200 rounded-md hover:bg-red-50"
                        on:click=on_delete
                    >
                        "Delete"
                    </button>
                </div>
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 items-start">
                <div>
                    <h3 class="text-sm font-semibold text-gray-500 uppercase tracking-wide mb-2">
                        "Input"
                    </h3>
                    <div class="space-y-3">
                        {input_rows.into_iter().map(|(name, value)| {
                            let filetype = input_filetypes.get(&name).copied();
                            view! {
                                <div>
                                    <div class="text-sm font-medium text-gray-700 font-mono mb-1">
                                        {name}
                                    </div>
                                    <InputValueView value=value filetype=filetype />
                                </div>
                            }
                        }).collect_view()}
                    </div>
                </div>

                <div>
                    <h3 class="text-sm font-semibold text-gray-500 uppercase tracking-wide mb-2">
                        "Output"
                    </h3>
                    <OutputFields
                        schema=metadata.demo_output_schema.clone()
                        filetypes=metadata.demo_output_filetypes.clone()
                        values=example.demo_output.clone()
                    />
                </div>
            </div>
        </div>
    }
}

/// One input value of a saved example: a file preview when the field is
/// file-valued, otherwise the stringified value.
#[component]
fn InputValueView(value: Value, filetype: Option<FileType>) -> impl IntoView {
    match (filetype, value.as_str()) {
        (Some(ft), Some(url)) => view! {
            <FileView url=url.to_string() filetype=ft />
        }
        .into_any(),
        _ => view! {
            <div class="px-3 py-2 text-sm bg-gray-50 border border-gray-200 rounded-md whitespace-pre-wrap break-words">
                {scalar_text(&value)}
            </div>
        }
        .into_any(),
    }
}
