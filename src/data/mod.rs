//! Dataset access layer: typed column readers and CSV input/output.

pub mod columns;
pub mod loader;

pub use columns::{case_indicator, category_labels, continuous_values};
pub use loader::{read_csv, write_csv};
