use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormPdfError {
    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),
}
