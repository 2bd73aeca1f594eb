//! `stocksnap-vision`
//!
//! **Responsibility:** boundary to the external vision model that reads
//! handwritten usage lists.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It never mutates inventory.
//! - It turns an image into [`ScanGuess`](stocksnap_inventory::ScanGuess)es; reconciliation
//!   happens elsewhere, after any ambiguous guesses are resolved.
//!
//! No model client ships here. Embedders implement [`ModelClient`] for their
//! vision API and drive [`scan_image`]. The `stocksnap` CLI uses only
//! [`build_prompt`] and [`parse_guesses`], on an answer saved to a file.

pub mod error;
pub mod extractor;
pub mod prompt;
pub mod response;

pub use error::ExtractionError;
pub use extractor::{ImagePayload, ModelClient, PromptedExtractor, VisionExtractor, scan_image};
pub use prompt::build_prompt;
pub use response::parse_guesses;
