//! Form state module
//! Owns the editable form and the files it is persisted in

pub mod loader;
pub mod state;

pub use loader::{load_form, save_form};
pub use state::FormState;
