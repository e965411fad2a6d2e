//! Clipboard access and the demo-link helper.
//!
//! The shipped clipboard pipes text into a platform clipboard command
//! (`pbcopy`, `clip`, `wl-copy`, or `xclip`). The demo-link helper writes a
//! fixed image URL through it and reports the outcome as a notice; it never
//! touches session state.

use std::process::Stdio;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use glimpse_core::config::ClipboardConfig;
use glimpse_core::error::GlimpseError;
use glimpse_core::types::Notice;

use crate::notice::Notifier;

/// System clipboard collaborator.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `value`.
    async fn write_text(&self, value: &str) -> Result<(), GlimpseError>;
}

/// Clipboard backed by an external command that reads stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Use `program` with `args` as the clipboard command.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from config, falling back to the platform default when no
    /// command is configured.
    pub fn from_config(config: &ClipboardConfig) -> Self {
        match config.command.split_first() {
            Some((program, args)) => Self::new(program.clone(), args.to_vec()),
            None => Self::platform_default(),
        }
    }

    /// Clipboard command for the current platform.
    pub fn platform_default() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::new("pbcopy", Vec::new())
        }
        #[cfg(target_os = "windows")]
        {
            Self::new("clip", Vec::new())
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                Self::new("wl-copy", Vec::new())
            } else {
                Self::new(
                    "xclip",
                    vec!["-selection".to_string(), "clipboard".to_string()],
                )
            }
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, value: &str) -> Result<(), GlimpseError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GlimpseError::Clipboard(format!("Failed to execute {}: {}", self.program, e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GlimpseError::Clipboard("Clipboard stdin unavailable".to_string()))?;
        stdin
            .write_all(value.as_bytes())
            .await
            .map_err(|e| GlimpseError::Clipboard(format!("Failed to write clipboard: {}", e)))?;
        // Closing stdin lets the command finish.
        drop(stdin);

        let status = child
            .wait()
            .await
            .map_err(|e| GlimpseError::Clipboard(format!("Clipboard command failed: {}", e)))?;
        if !status.success() {
            return Err(GlimpseError::Clipboard(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        tracing::info!(text_len = value.len(), program = %self.program, "Copied to clipboard");
        Ok(())
    }
}

/// In-memory clipboard for tests.
#[derive(Debug, Default)]
pub struct MockClipboard {
    fail: bool,
    written: Mutex<Vec<String>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose every write fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            written: Mutex::new(Vec::new()),
        }
    }

    /// Values written so far.
    pub fn written(&self) -> Vec<String> {
        self.written
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Clipboard for MockClipboard {
    async fn write_text(&self, value: &str) -> Result<(), GlimpseError> {
        if self.fail {
            return Err(GlimpseError::Clipboard("Clipboard unavailable".to_string()));
        }
        self.written
            .lock()
            .map_err(|e| GlimpseError::Clipboard(format!("Mock clipboard poisoned: {}", e)))?
            .push(value.to_string());
        Ok(())
    }
}

/// Copies a fixed demo image URL to the clipboard.
pub struct DemoLinkHelper {
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    url: String,
}

impl DemoLinkHelper {
    pub fn new(
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            clipboard,
            notifier,
            url: url.into(),
        }
    }

    /// The URL this helper copies.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Write the demo URL to the clipboard and notify the user.
    ///
    /// Returns the notice that was raised. Failure detail is logged only.
    pub async fn copy_demo_link(&self) -> Notice {
        let notice = match self.clipboard.write_text(&self.url).await {
            Ok(()) => Notice::DemoLinkCopied,
            Err(e) => {
                tracing::error!(error = %e, "Error copying link");
                Notice::ClipboardFailure
            }
        };
        self.notifier.notify(notice);
        notice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::RecordingNotifier;

    const DEMO_URL: &str = "https://example.com/demo-card.jpg";

    #[tokio::test]
    async fn test_copy_demo_link_success() {
        let clipboard = Arc::new(MockClipboard::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let helper = DemoLinkHelper::new(clipboard.clone(), notifier.clone(), DEMO_URL);

        let notice = helper.copy_demo_link().await;

        assert_eq!(notice, Notice::DemoLinkCopied);
        assert_eq!(clipboard.written(), vec![DEMO_URL.to_string()]);
        assert_eq!(notifier.notices(), vec![Notice::DemoLinkCopied]);
    }

    #[tokio::test]
    async fn test_copy_demo_link_failure() {
        let clipboard = Arc::new(MockClipboard::failing());
        let notifier = Arc::new(RecordingNotifier::new());
        let helper = DemoLinkHelper::new(clipboard.clone(), notifier.clone(), DEMO_URL);

        let notice = helper.copy_demo_link().await;

        assert_eq!(notice, Notice::ClipboardFailure);
        assert!(clipboard.written().is_empty());
        assert_eq!(notifier.notices(), vec![Notice::ClipboardFailure]);
    }

    #[test]
    fn test_from_config_uses_configured_command() {
        let config = ClipboardConfig {
            command: vec![
                "xsel".to_string(),
                "--clipboard".to_string(),
                "--input".to_string(),
            ],
        };
        let clipboard = CommandClipboard::from_config(&config);
        assert_eq!(clipboard.program(), "xsel");
        assert_eq!(clipboard.args(), ["--clipboard", "--input"]);
    }

    #[test]
    fn test_from_config_empty_uses_platform_default() {
        let clipboard = CommandClipboard::from_config(&ClipboardConfig::default());
        assert_eq!(clipboard, CommandClipboard::platform_default());
        assert!(!clipboard.program().is_empty());
    }

    #[tokio::test]
    async fn test_missing_command_is_clipboard_error() {
        let clipboard = CommandClipboard::new("/nonexistent/bin/clipboard", Vec::new());
        let result = clipboard.write_text("text").await;
        assert!(matches!(result, Err(GlimpseError::Clipboard(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_reads_stdin() {
        let clipboard = CommandClipboard::new("cat", Vec::new());
        clipboard.write_text(DEMO_URL).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_failure_status() {
        let clipboard = CommandClipboard::new("false", Vec::new());
        // `false` may exit before reading stdin, so either the write or the
        // exit status reports the failure.
        let result = clipboard.write_text(DEMO_URL).await;
        assert!(matches!(result, Err(GlimpseError::Clipboard(_))));
    }
}
