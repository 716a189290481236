use std::ops::Range;

use crate::models::{TD3_LINE_COUNT, TD3_LINE_LENGTH};
use crate::validation::mrz::split_name;

const EXPECTED_LENGTH: usize = TD3_LINE_COUNT * TD3_LINE_LENGTH;

// Offsets into both MRZ lines read as one string
const DOCUMENT_TYPE: Range<usize> = 0..0;
const PASSPORT_TYPE: Range<usize> = 1..1;
const COUNTRY_CODE: Range<usize> = 2..5;
const NAME: Range<usize> = 5..44;
const PASSPORT_NUMBER: Range<usize> = 44..53;
const NATIONALITY: Range<usize> = 54..57;
const DATE_OF_BIRTH: Range<usize> = 57..63;
const GENDER: Range<usize> = 64..65;
const EXPIRATION_DATE: Range<usize> = 65..71;
const PERSONAL_NUMBER: Range<usize> = 72..86;

/// Positional field reader for noisy OCR renderings of the MRZ.
///
/// OCR drops and invents characters, so every field is read from a window
/// around its nominal offset. The window widens by one character per
/// character of length drift away from the expected 88. No check digits are
/// verified.
#[derive(Debug, Clone)]
pub struct MrzWindow {
    chars: Vec<char>,
    error_margin: usize,
}

impl MrzWindow {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let error_margin = 1 + chars.len().abs_diff(EXPECTED_LENGTH);
        MrzWindow { chars, error_margin }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn error_margin(&self) -> usize {
        self.error_margin
    }

    /// Expand a nominal field range by the error margin, clamped to the text.
    pub fn error_range(&self, field: Range<usize>) -> Range<usize> {
        let end = (field.end + self.error_margin).min(self.chars.len());
        let start = field.start.saturating_sub(self.error_margin).min(end);
        start..end
    }

    fn window(&self, field: Range<usize>) -> String {
        self.chars[self.error_range(field)].iter().collect()
    }

    pub fn document_type(&self) -> String {
        self.window(DOCUMENT_TYPE)
    }

    pub fn passport_type(&self) -> String {
        self.window(PASSPORT_TYPE)
    }

    pub fn country_code(&self) -> String {
        self.window(COUNTRY_CODE)
    }

    pub fn name(&self) -> String {
        self.window(NAME)
    }

    pub fn surname(&self) -> String {
        split_name(&self.name()).0
    }

    pub fn given_name(&self) -> String {
        split_name(&self.name()).1
    }

    pub fn passport_number(&self) -> String {
        self.window(PASSPORT_NUMBER)
    }

    pub fn nationality(&self) -> String {
        self.window(NATIONALITY)
    }

    pub fn date_of_birth(&self) -> String {
        self.window(DATE_OF_BIRTH)
    }

    pub fn gender(&self) -> String {
        self.window(GENDER)
    }

    pub fn expiration_date(&self) -> String {
        self.window(EXPIRATION_DATE)
    }

    pub fn personal_number(&self) -> String {
        self.window(PERSONAL_NUMBER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FLAT: &str = "p<utoeriksson<<anna<maria<<<<<<<<<<<<<<<<<<<\
                        l898902c36uto7408122f1204159ze184226b<<<<<10";

    #[test]
    fn margin_tracks_length_drift() {
        assert_eq!(MrzWindow::new(FLAT).error_margin(), 1);
        assert_eq!(MrzWindow::new(&FLAT[..86]).error_margin(), 3);
        assert_eq!(MrzWindow::new("").error_margin(), 89);
    }

    #[test]
    fn reads_fields_of_exact_length_text() {
        let mrz = MrzWindow::new(FLAT);
        assert_eq!(mrz.passport_number(), "<l898902c36");
        assert_eq!(mrz.nationality(), "6uto7");
        assert_eq!(mrz.date_of_birth(), "o7408122");
        assert_eq!(mrz.gender(), "2f1");
        assert_eq!(mrz.expiration_date(), "f1204159");
        assert_eq!(mrz.country_code(), "<utoe");
        assert_eq!(mrz.document_type(), "p");
        assert_eq!(mrz.surname(), "oeriksson");
    }

    #[test]
    fn tolerates_dropped_characters() {
        // two filler characters lost from the first line
        let noisy = FLAT.replacen("<<<<<<<<<<<<<<<<<<<", "<<<<<<<<<<<<<<<<<", 1);
        let mrz = MrzWindow::new(&noisy);
        assert_eq!(mrz.error_margin(), 3);
        assert!(mrz.passport_number().contains("l898902c3"));
        assert!(mrz.date_of_birth().contains("740812"));
        assert!(mrz.expiration_date().contains("120415"));
    }

    #[test]
    fn windows_stay_in_bounds() {
        for len in [0, 1, 5, 44, 60, 87, 88, 89, 120] {
            let text = "x".repeat(len);
            let mrz = MrzWindow::new(&text);
            for field in [
                DOCUMENT_TYPE,
                PASSPORT_TYPE,
                COUNTRY_CODE,
                NAME,
                PASSPORT_NUMBER,
                NATIONALITY,
                DATE_OF_BIRTH,
                GENDER,
                EXPIRATION_DATE,
                PERSONAL_NUMBER,
            ] {
                let range = mrz.error_range(field);
                assert!(range.start <= range.end && range.end <= len);
            }
            assert!(mrz.personal_number().len() <= len);
        }
    }

    #[test]
    fn short_text_is_read_whole() {
        let mrz = MrzWindow::new("abc");
        assert_eq!(mrz.passport_number(), "abc");
        assert_eq!(mrz.given_name(), "");
    }
}
