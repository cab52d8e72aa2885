use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfTextError {
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password-protected PDF")]
    PasswordProtected,

    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    #[error("PDF extraction failed: {0}")]
    Extraction(String),
}

impl PdfTextError {
    /// Whether the document itself is unusable, as opposed to unreadable from disk
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            PdfTextError::InvalidPdf(_)
                | PdfTextError::PasswordProtected
                | PdfTextError::Extraction(_)
        )
    }
}
