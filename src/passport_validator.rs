use log::{info, warn};

use crate::models::*;
use crate::processing::text::{normalize_ocr_text, split_ocr_output};
use crate::processing::*;
use crate::validation::*;

pub struct PassportValidator {
    config: PipelineConfig,
}

impl PassportValidator {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        PassportValidator { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // Crop regions to hand to OCR for one image's detector output
    pub fn plan_crops(&self, detections: &[Rectangle], image_width: u32, image_height: u32) -> Vec<Rectangle> {
        RegionPlanner::new(self.config.cluster.clone()).plan(detections, image_width, image_height)
    }

    // Main validation function: OCR chunks of one image against one form
    pub fn validate<S: AsRef<str>>(&self, chunks: &[S], form: &FormSubmission) -> ValidationReport {
        // Step 1: Normalise the full page text
        let ocr_text = normalize_ocr_text(chunks);

        // Step 2: Locate the MRZ with the policy of the configured backend
        let policy = self.config.backend.locator_policy();
        let mrz_text = MrzLocator::locate(chunks, policy);
        if mrz_text.is_none() {
            warn!("MRZ not located, MRZ-backed fields will fail");
        }

        // Step 3: Match every field
        let window = MrzWindow::new(mrz_text.as_deref().unwrap_or_default());
        let fields = FieldValidator::validate(form, &ocr_text, &window);

        let is_valid = fields.all_valid();
        info!(
            "Passport validation result: {}",
            if is_valid { "VALID" } else { "INVALID" }
        );

        ValidationReport {
            is_valid,
            mrz_text,
            fields,
        }
    }

    // Same as validate, for backends that return a single line-oriented dump
    pub fn validate_text(&self, ocr_output: &str, form: &FormSubmission) -> ValidationReport {
        self.validate(&split_ocr_output(ocr_output), form)
    }
}

impl Default for PassportValidator {
    fn default() -> Self {
        Self::new()
    }
}
