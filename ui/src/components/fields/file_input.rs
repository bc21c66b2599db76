//! File input widget
//!
//! Pick-or-drop zone for file-valued input fields, restricted to the
//! field's declared file category. The picked `web_sys::File` handle lives
//! in the form's file map until submit time, when it is uploaded and
//! replaced by a serving URL.

use leptos::prelude::*;
use leptos::web_sys;
use std::collections::HashMap;
use wasm_bindgen::JsCast;

use super::file_view::{filename_from_url, FileView};
use crate::types::FileType;

#[component]
pub fn FileInput(
    name: String,
    filetype: FileType,
    form_values: RwSignal<HashMap<String, serde_json::Value>>,
    form_files: RwSignal<HashMap<String, web_sys::File>>,
) -> impl IntoView {
    // Object URL of the currently picked file, revoked on replacement.
    let (preview_url, set_preview_url) = signal(Option::<String>::None);

    let name_for_change = name.clone();
    let on_change = move |ev: web_sys::Event| {
        let target = ev.target().unwrap();
        let input: web_sys::HtmlInputElement = target.dyn_into().unwrap();
        let Some(file) = input.files().and_then(|list| list.get(0)) else {
            return;
        };

        if let Some(old) = preview_url.get_untracked() {
            let _ = web_sys::Url::revoke_object_url(&old);
        }
        set_preview_url.set(web_sys::Url::create_object_url_with_blob(&file).ok());

        form_files.update(|files| {
            files.insert(name_for_change.clone(), file);
        });
        // A freshly picked file supersedes any URL loaded from an example.
        form_values.update(|values| {
            values.remove(&name_for_change);
        });
    };

    let name_for_clear = name.clone();
    let on_clear = move |_| {
        if let Some(old) = preview_url.get_untracked() {
            let _ = web_sys::Url::revoke_object_url(&old);
        }
        set_preview_url.set(None);
        form_files.update(|files| {
            files.remove(&name_for_clear);
        });
        form_values.update(|values| {
            values.remove(&name_for_clear);
        });
    };

    // Current preview: a picked file, or a serving URL loaded from an
    // example; None shows the picker alone.
    let name_for_preview = name.clone();
    let preview = move || {
        if let Some(file) = form_files.get().get(&name_for_preview) {
            preview_url.get().map(|url| (url, file.name()))
        } else {
            form_values
                .get()
                .get(&name_for_preview)
                .and_then(|v| v.as_str())
                .map(|url| (url.to_string(), filename_from_url(url, filetype)))
        }
    };

    let accept = filetype.accept().map(String::from);

    view! {
        <div class="space-y-2">
            {move || preview().map(|(url, filename)| view! {
                <div class="space-y-1">
                    <FileView url=url filetype=filetype />
                    <div class="flex items-center gap-2 text-xs text-gray-600">
                        <span class="font-mono truncate">{filename}</span>
                        <button
                            type="button"
                            class="text-gray-400 hover:text-red-500"
                            title="Remove file"
                            on:click=on_clear.clone()
                        >
                            "\u{00d7}"
                        </button>
                    </div>
                </div>
            })}
            <label class="flex items-center justify-center gap-2 w-full px-3 py-4 text-sm text-gray-600 border-2 border-dashed border-gray-300 rounded-md cursor-pointer hover:border-gray-400 hover:bg-gray-50">
                <span>{format!("Drop a {} here or click to select", filetype.label())}</span>
                <input
                    type="file"
                    class="hidden"
                    accept=accept
                    on:change=on_change
                />
            </label>
        </div>
    }
}
