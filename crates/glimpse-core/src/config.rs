use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GlimpseError, Result};

/// Image used by the demo-link helper when no other URL is configured.
pub const DEFAULT_DEMO_IMAGE_URL: &str = "https://res.cloudinary.com/dagdqfdvi/image/upload/v1741891624/WhatsApp_Image_2025-03-14_at_00.16.40_7fd88c6b_xcvkm7.jpg";

/// Top-level configuration for Glimpse.
///
/// Loaded from `~/.glimpse/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlimpseConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

impl GlimpseConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GlimpseConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GlimpseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code passed with every recognition request.
    pub language: String,
    /// Path or name of the `tesseract` executable.
    pub tesseract_path: String,
    /// Directory holding `<language>.traineddata` for the in-process engine.
    /// `None` uses the library's default search path.
    pub tessdata_dir: Option<String>,
    /// User-Agent header sent when fetching remote images.
    pub user_agent: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            tesseract_path: "tesseract".to_string(),
            tessdata_dir: None,
            user_agent: format!("glimpse/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Clipboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// Command (program followed by arguments) that reads the clipboard text
    /// from stdin. Empty selects the platform default.
    pub command: Vec<String>,
}

/// Demo link helper configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// URL copied to the clipboard by the demo-link helper.
    pub image_url: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            image_url: DEFAULT_DEMO_IMAGE_URL.to_string(),
        }
    }
}
