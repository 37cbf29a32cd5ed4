//! Interactive form-field overlay geometry for rendered PDF pages
//!
//! This crate maps a PDF form field's native geometry (bottom-left
//! origin, point units) onto a rendered page canvas (top-left origin,
//! scaled pixels), and tracks which fields are visible as a document is
//! paged through.
//!
//! Two pieces:
//! - [`coords`]: pure conversion, validation, and clamping functions
//! - [`registry::FieldRegistry`]: the stateful per-document table of
//!   placed widgets the rendering layer queries
//!
//! Field metadata itself comes from an extractor such as the
//! `formoverlay-pdf` crate; this crate never touches PDF bytes.

pub mod coords;
pub mod field;
pub mod registry;

pub use coords::{
    display_to_percentages, pdf_bounds_to_display, sanitize_coordinates,
    validate_display_coordinates, DisplayCoordinates, PageDimensions, PercentCoordinates,
    DEFAULT_DISPLAY_SCALE, MIN_FIELD_SIZE, US_LETTER,
};
pub use field::{FieldType, FieldValue, FormField, PdfBounds, ValueError};
pub use registry::{
    FieldRegistry, OccurrenceKey, PlacementReport, RegistryEntry, RegistrySnapshot, RegistryStats,
    SkipReason, SkippedOccurrence,
};
