//! External matting command invocation

use std::path::PathBuf;
use std::process::Stdio;

use bytes::Bytes;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::matte::compose;

/// Configuration for the background removal pipeline
#[derive(Debug, Clone)]
pub struct MatteConfig {
    /// External matting command
    pub command: String,
    /// Source image handed to the matting command
    pub input_path: PathBuf,
    /// Cut-out written by the command, post-processed and served from here
    pub output_path: PathBuf,
    /// Pass `--alpha-matting` to the command
    pub alpha_matting: bool,
    /// Gaussian sigma for the edge softening pass
    pub edge_blur_sigma: f32,
}

impl Default for MatteConfig {
    fn default() -> Self {
        Self {
            command: "backgroundremover".to_string(),
            input_path: PathBuf::from("assets/image/input.jpg"),
            output_path: PathBuf::from("assets/image/output.png"),
            alpha_matting: true,
            edge_blur_sigma: 2.0,
        }
    }
}

/// Runs the matting command and serves the composited result
///
/// The input and output paths are fixed and shared by every request, so
/// invocations are serialized behind a mutex; concurrent requests would
/// otherwise overwrite each other's files mid-processing.
pub struct MatteProcessor {
    config: MatteConfig,
    serialize: Mutex<()>,
}

impl MatteProcessor {
    pub fn new(config: MatteConfig) -> Self {
        Self {
            config,
            serialize: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &MatteConfig {
        &self.config
    }

    /// Run the full pipeline and return the processed image bytes
    ///
    /// Matting command → alpha blur → black composite → PNG overwrite at the
    /// output path. Any failure along the way means no bytes are returned.
    pub async fn process(&self) -> Result<Bytes> {
        let _guard = self.serialize.lock().await;

        tracing::info!(
            input = %self.config.input_path.display(),
            "Removing background"
        );
        self.remove_background().await?;

        let output = self.config.output_path.clone();
        let sigma = self.config.edge_blur_sigma;
        tokio::task::spawn_blocking(move || compose::compose_output(&output, sigma))
            .await
            .map_err(|e| Error::Matte(format!("post-processing task failed: {}", e)))??;

        let bytes = tokio::fs::read(&self.config.output_path).await?;
        tracing::debug!(bytes = bytes.len(), "Background removed");
        Ok(Bytes::from(bytes))
    }

    async fn remove_background(&self) -> Result<()> {
        let mut command = Command::new(&self.config.command);
        command
            .arg("-i")
            .arg(&self.config.input_path)
            .arg("-o")
            .arg(&self.config.output_path)
            .stdin(Stdio::null());
        if self.config.alpha_matting {
            command.arg("--alpha-matting");
        }

        let status = command.status().await?;
        if !status.success() {
            return Err(Error::Matte(format!(
                "{} exited with {}",
                self.config.command, status
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_command(command: &str) -> MatteConfig {
        let dir = std::env::temp_dir();
        MatteConfig {
            command: command.to_string(),
            input_path: dir.join("matte-test-input.jpg"),
            output_path: dir.join("matte-test-output.png"),
            ..MatteConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = MatteConfig::default();
        assert_eq!(config.command, "backgroundremover");
        assert!(config.alpha_matting);
        assert_eq!(config.edge_blur_sigma, 2.0);
    }

    #[tokio::test]
    async fn test_command_failure_is_hard_failure() {
        let processor = MatteProcessor::new(config_with_command("false"));

        let result = processor.process().await;
        assert!(matches!(result, Err(Error::Matte(_))));
    }

    #[tokio::test]
    async fn test_missing_command_is_hard_failure() {
        let processor =
            MatteProcessor::new(config_with_command("definitely-not-a-real-command-9f2c"));

        let result = processor.process().await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_no_output_means_no_bytes() {
        // The command "succeeds" without writing the output file; the
        // post-process must fail rather than serve stale or missing bytes.
        let dir = tempfile::tempdir().unwrap();
        let config = MatteConfig {
            command: "true".to_string(),
            input_path: dir.path().join("input.jpg"),
            output_path: dir.path().join("never-written.png"),
            ..MatteConfig::default()
        };
        let processor = MatteProcessor::new(config);

        assert!(processor.process().await.is_err());
    }
}
