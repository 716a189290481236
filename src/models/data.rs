use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::utils::PassportError;

/// Characters per MRZ line on a TD3 (passport) document.
pub const TD3_LINE_LENGTH: usize = 44;

/// Number of MRZ lines on a TD3 document.
pub const TD3_LINE_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    Unspecified,
}

impl Gender {
    pub fn from_mrz(c: char) -> Self {
        match c {
            'M' => Gender::Male,
            'F' => Gender::Female,
            _ => Gender::Unspecified,
        }
    }
}

/// Check digits recomputed from the second MRZ line.
///
/// `None` means the covered field holds characters outside the MRZ alphabet,
/// so no digit could be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckDigits {
    pub passport_number_check: Option<char>,
    pub date_of_birth_check: Option<char>,
    pub expiration_date_check: Option<char>,
    /// `<` when the personal number is entirely filler.
    pub personal_number_check: Option<char>,
    pub composite_check: Option<char>,
}

/// Fields decoded from a strict two-line TD3 MRZ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MrzRecord {
    /// First character of line 1 is `P`.
    pub is_passport: bool,
    /// Passport sub-type, absent when the position holds filler.
    pub passport_type: Option<char>,
    pub country_code: String,
    pub surname: String,
    pub given_name: String,
    pub passport_number: String,
    pub nationality: String,
    #[serde(serialize_with = "serialize_report_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Gender,
    #[serde(serialize_with = "serialize_report_date")]
    pub expiration_date: Option<NaiveDate>,
    pub personal_number: Option<String>,
    pub check_digits: CheckDigits,
    pub is_valid: bool,
}

fn serialize_report_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match date {
        Some(d) => serializer.serialize_str(&d.format("%d/%m/%Y").to_string()),
        None => serializer.serialize_none(),
    }
}

/// The seven form fields cross-checked against the passport image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Surname,
    GivenName,
    Gender,
    DateOfBirth,
    PassportNumber,
    Nationality,
    ExpiryDate,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Surname,
        FormField::GivenName,
        FormField::Gender,
        FormField::DateOfBirth,
        FormField::PassportNumber,
        FormField::Nationality,
        FormField::ExpiryDate,
    ];

    /// Name of the field on the submitted form.
    pub fn form_name(&self) -> &'static str {
        match self {
            FormField::Surname => "surname",
            FormField::GivenName => "givenName",
            FormField::Gender => "gender",
            FormField::DateOfBirth => "dob",
            FormField::PassportNumber => "passportNumber",
            FormField::Nationality => "nationality",
            FormField::ExpiryDate => "passportExpiryDate",
        }
    }
}

/// Values submitted by the user alongside the passport photo.
///
/// Dates are expected as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub surname: String,
    #[serde(rename = "givenName")]
    pub given_name: String,
    pub gender: String,
    #[serde(rename = "dob")]
    pub date_of_birth: String,
    #[serde(rename = "passportNumber")]
    pub passport_number: String,
    pub nationality: String,
    #[serde(rename = "passportExpiryDate")]
    pub expiry_date: String,
}

impl FormSubmission {
    /// Build a submission from raw form key/value pairs.
    pub fn from_map(form: &HashMap<String, String>) -> Result<Self, PassportError> {
        let take = |field: FormField| {
            form.get(field.form_name())
                .cloned()
                .ok_or_else(|| PassportError::MissingField(field.form_name().to_string()))
        };

        Ok(FormSubmission {
            surname: take(FormField::Surname)?,
            given_name: take(FormField::GivenName)?,
            gender: take(FormField::Gender)?,
            date_of_birth: take(FormField::DateOfBirth)?,
            passport_number: take(FormField::PassportNumber)?,
            nationality: take(FormField::Nationality)?,
            expiry_date: take(FormField::ExpiryDate)?,
        })
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Surname => &self.surname,
            FormField::GivenName => &self.given_name,
            FormField::Gender => &self.gender,
            FormField::DateOfBirth => &self.date_of_birth,
            FormField::PassportNumber => &self.passport_number,
            FormField::Nationality => &self.nationality,
            FormField::ExpiryDate => &self.expiry_date,
        }
    }
}

/// Per-field outcome of matching a form submission against OCR output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FieldValidationResult {
    pub surname: bool,
    #[serde(rename = "givenName")]
    pub given_name: bool,
    pub gender: bool,
    #[serde(rename = "dob")]
    pub date_of_birth: bool,
    #[serde(rename = "passportNumber")]
    pub passport_number: bool,
    pub nationality: bool,
    #[serde(rename = "passportExpiryDate")]
    pub expiry_date: bool,
}

impl FieldValidationResult {
    pub fn get(&self, field: FormField) -> bool {
        match field {
            FormField::Surname => self.surname,
            FormField::GivenName => self.given_name,
            FormField::Gender => self.gender,
            FormField::DateOfBirth => self.date_of_birth,
            FormField::PassportNumber => self.passport_number,
            FormField::Nationality => self.nationality,
            FormField::ExpiryDate => self.expiry_date,
        }
    }

    pub fn all_valid(&self) -> bool {
        FormField::ALL.iter().all(|f| self.get(*f))
    }

    pub fn failed_fields(&self) -> Vec<FormField> {
        FormField::ALL.iter().copied().filter(|f| !self.get(*f)).collect()
    }
}

/// Outcome of validating one submission against one passport image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Normalised text picked as the MRZ, if any chunk qualified.
    pub mrz_text: Option<String>,
    pub fields: FieldValidationResult,
}
