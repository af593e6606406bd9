//! External document parsing for formats without a native parser

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

use super::parser::FileParser;

/// External parser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalParserConfig {
    /// Enable the hosted parsing API
    pub enabled: bool,
    /// Unstructured.io API key
    pub unstructured_api_key: Option<String>,
    /// Unstructured.io API URL
    pub unstructured_url: String,
    /// Convert legacy Office files with a local LibreOffice install
    pub use_libreoffice_fallback: bool,
    /// Timeout for hosted parsing requests in seconds
    pub timeout_secs: u64,
}

impl Default for ExternalParserConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            unstructured_api_key: None,
            unstructured_url: "https://api.unstructured.io/general/v0/general".to_string(),
            use_libreoffice_fallback: true,
            timeout_secs: 120,
        }
    }
}

/// External document parser
pub struct ExternalParser {
    client: Client,
    config: ExternalParserConfig,
}

#[derive(Debug, Deserialize)]
struct UnstructuredElement {
    text: String,
}

impl ExternalParser {
    /// Create a new external parser
    pub fn new(config: ExternalParserConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Check if the hosted API can be used
    pub fn is_available(&self) -> bool {
        self.config.enabled
    }

    /// Check if a file needs external parsing
    pub fn needs_external_parsing(filename: &str) -> bool {
        let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        matches!(ext.as_str(), "doc")
    }

    /// Extract text from a legacy file, trying LibreOffice first, then the hosted API
    pub async fn parse(&self, filename: &str, data: &[u8]) -> Result<String> {
        let mut last_error = None;

        if self.config.use_libreoffice_fallback {
            match self.convert_with_libreoffice(filename, data).await {
                Ok(converted) => return Ok(FileParser::parse_docx(filename, &converted)?.content),
                Err(e) => {
                    tracing::warn!("LibreOffice conversion of {} failed: {}", filename, e);
                    last_error = Some(e);
                }
            }
        }

        if self.is_available() {
            return self.parse_with_unstructured(filename, data).await;
        }

        Err(last_error.unwrap_or_else(|| {
            Error::UnsupportedFileType(format!(
                "{} - enable LibreOffice conversion or the hosted parser",
                filename
            ))
        }))
    }

    /// Parse document using the Unstructured.io API
    pub async fn parse_with_unstructured(&self, filename: &str, data: &[u8]) -> Result<String> {
        if !self.config.enabled {
            return Err(Error::Internal("External parsing is disabled".to_string()));
        }

        let form = reqwest::multipart::Form::new().part(
            "files",
            reqwest::multipart::Part::bytes(data.to_vec()).file_name(filename.to_string()),
        );

        let mut request = self.client.post(&self.config.unstructured_url).multipart(form);

        if let Some(ref api_key) = self.config.unstructured_api_key {
            request = request.header("unstructured-api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::file_parse(filename, format!("Unstructured API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::file_parse(
                filename,
                format!("Unstructured API error: {} - {}", status, body),
            ));
        }

        let elements: Vec<UnstructuredElement> = response.json().await.map_err(|e| {
            Error::file_parse(filename, format!("Failed to parse Unstructured response: {}", e))
        })?;

        Ok(join_elements(elements))
    }

    /// Convert a legacy Word file to .docx using LibreOffice
    pub async fn convert_with_libreoffice(&self, filename: &str, data: &[u8]) -> Result<Vec<u8>> {
        let temp_dir = tempfile::Builder::new().prefix("rag-chat-convert-").tempdir()?;

        let base_name = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.doc".to_string());
        let input_path = temp_dir.path().join(&base_name);
        tokio::fs::write(&input_path, data).await?;

        let output = tokio::process::Command::new("libreoffice")
            .arg("--headless")
            .arg("--convert-to")
            .arg("docx")
            .arg("--outdir")
            .arg(temp_dir.path())
            .arg(&input_path)
            .output()
            .await
            .map_err(|e| Error::file_parse(filename, format!("LibreOffice conversion failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::file_parse(filename, format!("LibreOffice error: {}", stderr)));
        }

        let stem = Path::new(&base_name)
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let output_path = temp_dir.path().join(format!("{}.docx", stem));

        let converted = tokio::fs::read(&output_path).await.map_err(|e| {
            Error::file_parse(filename, format!("Failed to read converted file: {}", e))
        })?;

        Ok(converted)
    }
}

fn join_elements(elements: Vec<UnstructuredElement>) -> String {
    elements
        .into_iter()
        .map(|e| e.text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_external_parsing() {
        assert!(ExternalParser::needs_external_parsing("memo.DOC"));
        assert!(!ExternalParser::needs_external_parsing("memo.docx"));
    }

    #[test]
    fn test_join_elements_skips_empty() {
        let elements: Vec<UnstructuredElement> = serde_json::from_str(
            r#"[{"type":"Title","text":"Intro"},{"type":"Break","text":""},{"type":"Text","text":"Body"}]"#,
        )
        .unwrap();
        assert_eq!(join_elements(elements), "Intro\n\nBody");
    }

    #[tokio::test]
    async fn test_parse_without_any_backend_is_unsupported() {
        let parser = ExternalParser::new(ExternalParserConfig {
            use_libreoffice_fallback: false,
            ..Default::default()
        })
        .unwrap();

        let err = parser.parse("memo.doc", b"\xd0\xcf\x11\xe0").await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }
}
