//! lopdf-backed form plumbing for the overlay core
//!
//! The thin call-through layer between PDF bytes and
//! `formoverlay-core`: detect AcroForm fields with their geometry and
//! page occurrences, report native page sizes, write values back into
//! the form dictionary, and save the result. No rendering, no appearance
//! stream regeneration.

pub mod acroform;
pub mod error;
pub mod fill;

#[cfg(test)]
mod test_pdf;

pub use acroform::{detect_form_fields, page_dimensions};
pub use error::FormPdfError;
pub use fill::{fill_form, FillReport, FillSkipReason, SkippedFill};

use lopdf::Document;

/// Parse PDF bytes into a document
pub fn load_document(bytes: &[u8]) -> Result<Document, FormPdfError> {
    Document::load_mem(bytes).map_err(|e| FormPdfError::ParseError(e.to_string()))
}

/// Serialize a document back to bytes
pub fn save_document(doc: &mut Document) -> Result<Vec<u8>, FormPdfError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| FormPdfError::SaveError(e.to_string()))?;
    Ok(buffer)
}
