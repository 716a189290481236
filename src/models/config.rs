use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::processing::LocatorPolicy;
use crate::utils::PassportError;

/// OCR engine that produced the text chunks of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackend {
    /// Cloud document text detection, one chunk per paragraph.
    #[default]
    CloudVision,
    /// Neural region detector followed by per-region OCR.
    RegionDetector,
    /// Whole-image tesseract run split on line breaks.
    Tesseract,
}

impl OcrBackend {
    pub fn locator_policy(&self) -> LocatorPolicy {
        match self {
            OcrBackend::CloudVision | OcrBackend::RegionDetector => LocatorPolicy::SingleChunk,
            // tesseract tends to break the MRZ into its two lines
            OcrBackend::Tesseract => LocatorPolicy::AdjacentPairs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Fraction of the image height/width used as vertical/horizontal merge threshold.
    pub threshold_ratio: f64,
    /// Detector boxes with a shorter diagonal are discarded.
    pub min_diagonal: f64,
    /// Padding factor applied to each merged region before cropping.
    pub scale_factor: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            threshold_ratio: 0.05,
            min_diagonal: 5.0,
            scale_factor: 1.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cluster: ClusterConfig,
    pub backend: OcrBackend,
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PassportError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PassportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn check(&self) -> Result<(), PassportError> {
        let cluster = &self.cluster;
        if !(cluster.threshold_ratio > 0.0 && cluster.threshold_ratio < 1.0) {
            return Err(PassportError::ConfigError(format!(
                "threshold_ratio must be in (0, 1), got {}",
                cluster.threshold_ratio
            )));
        }
        if cluster.min_diagonal < 0.0 {
            return Err(PassportError::ConfigError(format!(
                "min_diagonal must not be negative, got {}",
                cluster.min_diagonal
            )));
        }
        if cluster.scale_factor <= 0.0 {
            return Err(PassportError::ConfigError(format!(
                "scale_factor must be positive, got {}",
                cluster.scale_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.backend.locator_policy(), LocatorPolicy::SingleChunk);
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"backend": "tesseract", "cluster": {{"scale_factor": 1.3}}}}"#
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.backend, OcrBackend::Tesseract);
        assert_eq!(config.cluster.scale_factor, 1.3);
        assert_eq!(config.cluster.threshold_ratio, 0.05);
        assert_eq!(config.backend.locator_policy(), LocatorPolicy::AdjacentPairs);
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let err = PipelineConfig::from_json_str(r#"{"cluster": {"threshold_ratio": 1.5}}"#);
        assert!(matches!(err, Err(PassportError::ConfigError(_))));
    }
}
