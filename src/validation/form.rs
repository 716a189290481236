use chrono::NaiveDate;
use log::{debug, warn};

use crate::models::{FieldValidationResult, FormField, FormSubmission};
use crate::processing::text::normalize_alphanumeric;
use crate::validation::mrz_window::MrzWindow;

/// Cross-checks a form submission against what OCR read off the passport.
pub struct FieldValidator;

impl FieldValidator {
    /// `ocr_text` is the whole page, normalised to lower-case alphanumerics.
    ///
    /// Names are matched against the whole page since the MRZ truncates long
    /// names; every other field is matched against its MRZ window. Every field
    /// is checked and reported on its own.
    pub fn validate(form: &FormSubmission, ocr_text: &str, mrz: &MrzWindow) -> FieldValidationResult {
        let result = FieldValidationResult {
            surname: Self::name_found(&form.surname, ocr_text),
            given_name: Self::name_found(&form.given_name, ocr_text),
            gender: Self::value_found(&form.gender, &mrz.gender()),
            date_of_birth: Self::date_found(&form.date_of_birth, &mrz.date_of_birth()),
            passport_number: Self::value_found(&form.passport_number, &mrz.passport_number()),
            nationality: Self::value_found(&form.nationality, &mrz.nationality()),
            expiry_date: Self::date_found(&form.expiry_date, &mrz.expiration_date()),
        };

        for field in FormField::ALL {
            debug!("{}: {}", field.form_name(), result.get(field));
        }
        result
    }

    /// Every space-separated word of the name appears somewhere in the text.
    fn name_found(name: &str, ocr_text: &str) -> bool {
        name.split(' ')
            .all(|word| ocr_text.contains(normalize_alphanumeric(word).as_str()))
    }

    fn value_found(value: &str, window: &str) -> bool {
        window.to_lowercase().contains(normalize_alphanumeric(value).as_str())
    }

    /// Form dates arrive as `YYYY-MM-DD`; the MRZ writes them `yymmdd`.
    fn date_found(value: &str, window: &str) -> bool {
        match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
            Ok(date) => window.contains(date.format("%y%m%d").to_string().as_str()),
            Err(e) => {
                warn!("Unparseable form date '{}': {}", value, e);
                false
            }
        }
    }
}
