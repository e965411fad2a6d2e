//! OCR via the Tesseract engine.
//!
//! Remote references (`http://`, `https://`) are downloaded with `reqwest`
//! into a temporary file; anything else is treated as a local path.
//!
//! With the `leptess` feature the engine runs in-process through `leptess` on
//! a blocking task. That links leptonica and libtesseract, so the default
//! build instead runs the executable as `tesseract <image> stdout -l <language>`
//! and reads the recognized text from its stdout.

use std::path::{Path, PathBuf};

#[cfg(not(feature = "leptess"))]
use tokio::process::Command;
use tracing::{debug, warn};

use glimpse_core::config::OcrConfig;
use glimpse_core::error::GlimpseError;
use glimpse_core::types::{ImageReference, RecognitionResult};

use crate::OcrService;

/// Tesseract-backed OCR service.
pub struct TesseractOcrService {
    config: OcrConfig,
    client: reqwest::Client,
}

impl TesseractOcrService {
    /// Create a new service with the given configuration.
    pub fn new(config: OcrConfig) -> Result<Self, GlimpseError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GlimpseError::Fetch(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Get a reference to the OCR configuration.
    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, GlimpseError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GlimpseError::Fetch(format!("Request to {} failed: {}", url, e)))?
            .error_for_status()
            .map_err(|e| GlimpseError::Fetch(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GlimpseError::Fetch(format!("Failed to read body: {}", e)))?;

        debug!(url = %url, bytes = bytes.len(), "Image downloaded");
        Ok(bytes.to_vec())
    }

    #[cfg(feature = "leptess")]
    async fn run_engine(&self, path: &Path, language: &str) -> Result<String, GlimpseError> {
        let path = path.to_path_buf();
        let language = language.to_string();
        let tessdata_dir = self.config.tessdata_dir.clone();

        tokio::task::spawn_blocking(move || {
            recognize_in_process(&path, tessdata_dir.as_deref(), &language)
        })
        .await
        .map_err(|e| GlimpseError::Ocr(format!("OCR task failed: {}", e)))?
    }

    #[cfg(not(feature = "leptess"))]
    async fn run_engine(&self, path: &Path, language: &str) -> Result<String, GlimpseError> {
        let output = Command::new(&self.config.tesseract_path)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                GlimpseError::Ocr(format!(
                    "Failed to execute {}: {}",
                    self.config.tesseract_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GlimpseError::Ocr(format!(
                "Tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| GlimpseError::Ocr(format!("Invalid UTF-8 output: {}", e)))?;
        Ok(strip_page_separator(text))
    }
}

/// Run libtesseract on `path`. Blocks for the whole recognition.
#[cfg(feature = "leptess")]
fn recognize_in_process(
    path: &Path,
    tessdata_dir: Option<&str>,
    language: &str,
) -> Result<String, GlimpseError> {
    let mut engine = leptess::LepTess::new(tessdata_dir, language).map_err(|e| {
        GlimpseError::Ocr(format!("Tesseract init failed for {}: {:?}", language, e))
    })?;
    engine.set_image(path).map_err(|e| {
        GlimpseError::Ocr(format!("Failed to load image {}: {:?}", path.display(), e))
    })?;
    let text = engine
        .get_utf8_text()
        .map_err(|e| GlimpseError::Ocr(format!("Invalid UTF-8 output: {}", e)))?;
    Ok(strip_page_separator(text))
}

/// Drop the form-feed page separator tesseract appends after the last page.
fn strip_page_separator(text: String) -> String {
    text.trim_end_matches('\u{c}').to_string()
}

impl OcrService for TesseractOcrService {
    async fn recognize(
        &self,
        image: &ImageReference,
        language: &str,
    ) -> Result<RecognitionResult, GlimpseError> {
        // The temp file must outlive the engine run.
        let (path, _temp) = if image.is_remote() {
            let bytes = self.download(image.as_str().trim()).await?;
            if bytes.is_empty() {
                return Err(GlimpseError::Ocr("Empty image data".to_string()));
            }
            let file = tempfile::Builder::new().prefix("glimpse-").tempfile()?;
            tokio::fs::write(file.path(), &bytes).await?;
            (file.path().to_path_buf(), Some(file))
        } else {
            let path = PathBuf::from(image.as_str());
            if !tokio::fs::try_exists(&path).await? {
                warn!(path = %path.display(), "Image not found");
                return Err(GlimpseError::Fetch(format!(
                    "Image not found: {}",
                    path.display()
                )));
            }
            (path, None)
        };

        let text = self.run_engine(&path, language).await?;
        debug!(chars = text.len(), language = %language, "OCR completed");
        Ok(RecognitionResult::new(text, language))
    }
}
