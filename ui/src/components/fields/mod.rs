//! Schema-driven field classification and rendering
//!
//! One module per concern: `kinds` classifies schema properties into field
//! kinds, `input` edits them, `output` renders prediction results, and the
//! file modules handle file-valued fields on both sides.

pub mod file_input;
pub mod file_view;
pub mod input;
pub mod kinds;
pub mod output;
