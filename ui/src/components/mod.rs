use leptos::prelude::RwSignal;

use crate::types::Example;

pub mod examples;
pub mod fields;
pub mod readme;
pub mod run;

/// Shared context slot carrying an example chosen in the gallery to the
/// run form. The run page takes the value and clears the slot.
#[derive(Clone, Copy)]
pub struct TryExampleSignal(pub RwSignal<Option<Example>>);
