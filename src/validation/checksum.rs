use crate::utils::PassportError;

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Value of a single MRZ character: digits map to themselves, letters to
/// 10..=35 and the filler `<` to 0. Lower-case letters count as upper-case.
pub fn char_value(c: char) -> Result<u32, PassportError> {
    match c {
        '<' => Ok(0),
        '0'..='9' => Ok(c as u32 - '0' as u32),
        'A'..='Z' => Ok(c as u32 - 'A' as u32 + 10),
        'a'..='z' => Ok(c as u32 - 'a' as u32 + 10),
        _ => Err(PassportError::InvalidCharacter(c)),
    }
}

/// ICAO 9303 check digit: 7-3-1 weighted sum of character values, mod 10.
pub fn check_digit(field: &str) -> Result<u8, PassportError> {
    let mut sum = 0u32;
    for (i, c) in field.chars().enumerate() {
        sum += char_value(c)? * WEIGHTS[i % 3];
    }
    Ok((sum % 10) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icao_reference_examples() {
        assert_eq!(check_digit("L898902C3").unwrap(), 6);
        assert_eq!(check_digit("740812").unwrap(), 2);
        assert_eq!(check_digit("120415").unwrap(), 9);
    }

    #[test]
    fn filler_and_empty_fields() {
        assert_eq!(check_digit("<<<<<<<<<").unwrap(), 0);
        assert_eq!(check_digit("").unwrap(), 0);
    }

    #[test]
    fn case_does_not_matter() {
        assert_eq!(check_digit("l898902c3").unwrap(), 6);
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        assert!(matches!(
            check_digit("L89 902C3"),
            Err(PassportError::InvalidCharacter(' '))
        ));
    }
}
