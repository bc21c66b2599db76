use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

mod api;
mod components;
mod types;

use components::examples::ExamplesPage;
use components::readme::ReadmePage;
use components::run::RunPage;
use components::TryExampleSignal;
use types::{Example, Metadata};

#[component]
pub fn App() -> impl IntoView {
    let metadata = RwSignal::new(Option::<Metadata>::None);
    let load_error = RwSignal::new(Option::<String>::None);
    provide_context(metadata);
    provide_context(TryExampleSignal(RwSignal::new(Option::<Example>::None)));

    // Fetched once; every page reads the same metadata snapshot.
    wasm_bindgen_futures::spawn_local(async move {
        match api::get_metadata().await {
            Ok(meta) => metadata.set(Some(meta)),
            Err(err) => load_error.set(Some(err)),
        }
    });

    view! {
        <Router>
            <div class="min-h-screen bg-gray-100">
                <Header metadata=metadata />

                {move || match load_error.get() {
                    Some(err) => view! {
                        <div class="m-6 bg-red-50 border border-red-200 rounded-lg p-4">
                            <p class="text-red-800">
                                <strong>"Failed to load model metadata."</strong>
                                {format!(" {}", err)}
                            </p>
                        </div>
                    }.into_any(),
                    None => view! {
                        <Routes fallback=|| "Not found.">
                            <Route path=path!("/") view=RunPage/>
                            <Route path=path!("/readme") view=ReadmePage/>
                            <Route path=path!("/examples") view=ExamplesPage/>
                        </Routes>
                    }.into_any(),
                }}
            </div>
        </Router>
    }
}

#[component]
fn Header(metadata: RwSignal<Option<Metadata>>) -> impl IntoView {
    view! {
        <div class="bg-white shadow">
            <div class="px-6 py-4 flex items-center gap-4">
                {move || metadata.get().map(|meta| view! {
                    <img
                        src=meta.avatar_url.clone()
                        alt="model avatar"
                        class="w-10 h-10 rounded-full bg-gray-200"
                    />
                    <div>
                        <h1 class="text-xl font-bold">{meta.name.clone()}</h1>
                        <p class="text-sm text-gray-500">{meta.description.clone()}</p>
                    </div>
                })}
            </div>
            <nav class="px-6 flex gap-1">
                <NavTab href="/" label="Demo" />
                {move || metadata.get().and_then(|m| m.readme).map(|_| view! {
                    <NavTab href="/readme" label="Readme" />
                })}
                <NavTab href="/examples" label="Examples" />
            </nav>
        </div>
    }
}

#[component]
fn NavTab(href: &'static str, label: &'static str) -> impl IntoView {
    view! {
        <A href=href attr:class="px-3 py-2 text-sm text-gray-600 hover:text-gray-900 transition-colors">
            {label}
        </A>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(App);
}
