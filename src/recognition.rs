//! Image-to-medication flow around an external text recognizer.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{CatalogError, CatalogProvider};
use crate::matching::{MatchResult, Resolver};

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("Text recognition service unavailable: {0}")]
    Unavailable(String),

    #[error("Text recognition failed: {0}")]
    Failed(String),

    #[error("Empty image payload")]
    EmptyImage,
}

#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// External OCR service: image bytes in, detected text out.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, RecognitionError>;
}

/// Resolution result kept next to the text it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identification {
    pub detected_text: String,
    pub result: MatchResult,
}

/// Recognize the text on an image and resolve it against the catalog.
pub fn identify_image<P: CatalogProvider>(
    recognizer: &dyn TextRecognizer,
    resolver: &Resolver<P>,
    image_bytes: &[u8],
) -> Result<Identification, IdentifyError> {
    if image_bytes.is_empty() {
        return Err(RecognitionError::EmptyImage.into());
    }

    let detected_text = recognizer.recognize(image_bytes)?.trim().to_string();
    tracing::debug!(
        image_bytes = image_bytes.len(),
        text_len = detected_text.len(),
        "Text recognized from image"
    );

    let result = resolver.resolve(&detected_text)?;
    Ok(Identification {
        detected_text,
        result,
    })
}
