use std::ops::Range;

use chrono::{Datelike, Local, NaiveDate};
use log::{debug, warn};

use crate::models::{CheckDigits, Gender, MrzRecord, TD3_LINE_COUNT, TD3_LINE_LENGTH};
use crate::utils::PassportError;
use crate::validation::checksum::check_digit;

// Line 1 layout
const COUNTRY_CODE: Range<usize> = 2..5;
const NAME: Range<usize> = 5..44;

// Line 2 layout
const PASSPORT_NUMBER: Range<usize> = 0..9;
const PASSPORT_NUMBER_CHECK: usize = 9;
const NATIONALITY: Range<usize> = 10..13;
const DATE_OF_BIRTH: Range<usize> = 13..19;
const DATE_OF_BIRTH_CHECK: usize = 19;
const GENDER: usize = 20;
const EXPIRATION_DATE: Range<usize> = 21..27;
const EXPIRATION_DATE_CHECK: usize = 27;
const PERSONAL_NUMBER: Range<usize> = 28..42;
const PERSONAL_NUMBER_CHECK: usize = 42;
const COMPOSITE_CHECK: usize = 43;

/// Strict decoder for the two-line TD3 passport MRZ.
pub struct MrzDecoder;

impl MrzDecoder {
    /// Decode `raw`, resolving two-digit birth years against today's date.
    pub fn decode(raw: &str) -> Result<MrzRecord, PassportError> {
        Self::decode_at(raw, Local::now().naive_local().date())
    }

    /// Decode `raw` as of `today`.
    ///
    /// Wrong line counts or line lengths yield a record with `is_valid`
    /// unset; only input too short to address every field is an error.
    pub fn decode_at(raw: &str, today: NaiveDate) -> Result<MrzRecord, PassportError> {
        let lines: Vec<Vec<char>> = raw.lines().map(|l| l.chars().collect()).collect();

        if lines.len() < TD3_LINE_COUNT {
            return Err(PassportError::MrzParsingError(format!(
                "expected {} lines, found {}",
                TD3_LINE_COUNT,
                lines.len()
            )));
        }
        for (i, line) in lines.iter().take(TD3_LINE_COUNT).enumerate() {
            if line.len() < TD3_LINE_LENGTH {
                return Err(PassportError::MrzParsingError(format!(
                    "line {} has {} characters, expected {}",
                    i + 1,
                    line.len(),
                    TD3_LINE_LENGTH
                )));
            }
        }

        let first = &lines[0];
        let second = &lines[1];

        let (surname, given_name) = split_name(&text(first, NAME));

        let personal_number = without_filler(&text(second, PERSONAL_NUMBER));
        let personal_number = if personal_number.is_empty() {
            None
        } else {
            Some(personal_number)
        };

        let composite_field = format!(
            "{}{}{}",
            text(second, 0..PASSPORT_NUMBER_CHECK + 1),
            text(second, DATE_OF_BIRTH.start..DATE_OF_BIRTH_CHECK + 1),
            text(second, EXPIRATION_DATE.start..PERSONAL_NUMBER_CHECK + 1),
        );

        let check_digits = CheckDigits {
            passport_number_check: digit_over(&text(second, PASSPORT_NUMBER)),
            date_of_birth_check: digit_over(&text(second, DATE_OF_BIRTH)),
            expiration_date_check: digit_over(&text(second, EXPIRATION_DATE)),
            personal_number_check: match personal_number {
                Some(_) => digit_over(&text(second, PERSONAL_NUMBER)),
                None => Some('<'),
            },
            composite_check: digit_over(&composite_field),
        };

        let well_formed = lines.len() == TD3_LINE_COUNT
            && first.len() == TD3_LINE_LENGTH
            && second.len() == TD3_LINE_LENGTH;

        let checks = [
            (check_digits.passport_number_check, PASSPORT_NUMBER_CHECK),
            (check_digits.date_of_birth_check, DATE_OF_BIRTH_CHECK),
            (check_digits.expiration_date_check, EXPIRATION_DATE_CHECK),
            (check_digits.personal_number_check, PERSONAL_NUMBER_CHECK),
            (check_digits.composite_check, COMPOSITE_CHECK),
        ];
        let checks_pass = checks
            .iter()
            .all(|(computed, pos)| *computed == Some(second[*pos]));

        if !well_formed {
            debug!("MRZ is not exactly {}x{} characters", TD3_LINE_COUNT, TD3_LINE_LENGTH);
        } else if !checks_pass {
            debug!("MRZ check digit mismatch: {:?}", check_digits);
        }

        let date_of_birth = parse_mrz_date(&text(second, DATE_OF_BIRTH), 2000)
            .map(|dob| {
                if dob > today {
                    dob.with_year(dob.year() - 100).unwrap_or(dob)
                } else {
                    dob
                }
            })
            .map_err(|e| warn!("Date of birth: {}", e))
            .ok();

        let expiration_date = expiry_date(&text(second, EXPIRATION_DATE))
            .map_err(|e| warn!("Expiration date: {}", e))
            .ok();

        Ok(MrzRecord {
            is_passport: first[0] == 'P',
            passport_type: match first[1] {
                '<' => None,
                c => Some(c),
            },
            country_code: without_filler(&text(first, COUNTRY_CODE)),
            surname,
            given_name,
            passport_number: without_filler(&text(second, PASSPORT_NUMBER)),
            nationality: without_filler(&text(second, NATIONALITY)),
            date_of_birth,
            gender: Gender::from_mrz(second[GENDER]),
            expiration_date,
            personal_number,
            check_digits,
            is_valid: well_formed && checks_pass,
        })
    }
}

fn text(line: &[char], range: Range<usize>) -> String {
    line[range].iter().collect()
}

fn without_filler(field: &str) -> String {
    field.replace('<', "")
}

fn digit_over(field: &str) -> Option<char> {
    check_digit(field)
        .ok()
        .and_then(|d| char::from_digit(d as u32, 10))
}

/// Split a filler-delimited name field into surname and given names.
///
/// The first non-empty token is the surname; the rest are joined with a
/// single space.
pub fn split_name(field: &str) -> (String, String) {
    let mut tokens = field.split('<').filter(|t| !t.is_empty());
    let surname = tokens.next().unwrap_or_default().to_string();
    let given_name = tokens.collect::<Vec<_>>().join(" ");
    (surname, given_name)
}

/// Parse `yymmdd`, placing the year in the century starting at `century`.
fn parse_mrz_date(raw: &str, century: i32) -> Result<NaiveDate, PassportError> {
    let invalid = || PassportError::InvalidDate(raw.to_string());

    if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let yy: i32 = raw[0..2].parse().map_err(|_| invalid())?;
    let mm: u32 = raw[2..4].parse().map_err(|_| invalid())?;
    let dd: u32 = raw[4..6].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(century + yy, mm, dd).ok_or_else(invalid)
}

/// Expiry years follow the POSIX two-digit pivot: 69-99 are 19xx, the rest 20xx.
fn expiry_date(raw: &str) -> Result<NaiveDate, PassportError> {
    let yy: i32 = raw
        .get(0..2)
        .and_then(|y| y.parse().ok())
        .ok_or_else(|| PassportError::InvalidDate(raw.to_string()))?;
    let century = if yy >= 69 { 1900 } else { 2000 };
    parse_mrz_date(raw, century)
}
