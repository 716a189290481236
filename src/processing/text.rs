use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
    static ref NON_MRZ: Regex = Regex::new(r"[^<a-zA-Z0-9]").unwrap();
}

/// How to pick the MRZ out of a list of OCR text chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorPolicy {
    /// The MRZ survived as one chunk.
    SingleChunk,
    /// The MRZ may be split across two consecutive chunks.
    AdjacentPairs,
}

/// Lower-case `text` and drop everything but ASCII letters and digits.
pub fn normalize_alphanumeric(text: &str) -> String {
    NON_ALPHANUMERIC.replace_all(text, "").to_lowercase()
}

/// Collapse OCR chunks into one lower-case alphanumeric string.
pub fn normalize_ocr_text<S: AsRef<str>>(chunks: &[S]) -> String {
    let joined = chunks
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_alphanumeric(&joined)
}

/// Split a line-oriented OCR dump into chunks, one per line.
pub fn split_ocr_output(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn normalize_mrz_chunk(chunk: &str) -> String {
    NON_MRZ.replace_all(chunk, "").to_lowercase()
}

fn filler_count(chunk: &str) -> usize {
    chunk.chars().filter(|&c| c == '<').count()
}

pub struct MrzLocator;

impl MrzLocator {
    /// Pick the text most likely to be the MRZ, normalised to lower-case
    /// alphanumerics and filler. `None` when there is nothing to pick from.
    pub fn locate<S: AsRef<str>>(chunks: &[S], policy: LocatorPolicy) -> Option<String> {
        let located = match policy {
            LocatorPolicy::SingleChunk => Self::from_chunks(chunks),
            LocatorPolicy::AdjacentPairs => Self::from_pairs(chunks),
        };

        match &located {
            Some(mrz) => debug!("Located MRZ candidate ({} chars, {:?})", mrz.len(), policy),
            None => warn!("No MRZ candidate among {} chunks", chunks.len()),
        }
        located
    }

    /// The chunk with the most `<` characters; the first one wins a tie.
    pub fn from_chunks<S: AsRef<str>>(chunks: &[S]) -> Option<String> {
        let mut best: Option<(&str, usize)> = None;
        for chunk in chunks.iter().map(|c| c.as_ref()) {
            let count = filler_count(chunk);
            if best.map_or(true, |(_, top)| count > top) {
                best = Some((chunk, count));
            }
        }
        best.map(|(chunk, _)| normalize_mrz_chunk(chunk))
    }

    /// Concatenate each pair of consecutive non-empty chunks and pick the
    /// pair with the most `<` characters.
    ///
    /// With fewer than two non-empty chunks there are no pairs, so the
    /// single-chunk rule is applied instead.
    pub fn from_pairs<S: AsRef<str>>(chunks: &[S]) -> Option<String> {
        let non_empty: Vec<&str> = chunks
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| !c.is_empty())
            .collect();

        if non_empty.len() < 2 {
            return Self::from_chunks(&non_empty);
        }

        let pairs: Vec<String> = non_empty
            .windows(2)
            .map(|pair| format!("{}{}", pair[0], pair[1]))
            .collect();
        Self::from_chunks(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalizes_ocr_chunks() {
        let chunks = ["PASSPORT / PASSEPORT\n", "Surname: ERIKSSON", "12.08.1974"];
        assert_eq!(
            normalize_ocr_text(&chunks),
            "passportpasseportsurnameeriksson12081974"
        );
    }

    #[test]
    fn splits_line_oriented_output() {
        assert_eq!(split_ocr_output("a\nb\n\nc"), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn picks_chunk_with_most_filler() {
        let chunks = ["abc", "p<<<<<<<<name<<<", "xyz"];
        assert_eq!(
            MrzLocator::locate(&chunks, LocatorPolicy::SingleChunk),
            Some("p<<<<<<<<name<<<".to_string())
        );
    }

    #[test]
    fn strips_noise_from_located_chunk() {
        let chunks = ["P<UTO ERIKSSON<<ANNA-MARIA<<<", "<1>"];
        assert_eq!(
            MrzLocator::from_chunks(&chunks),
            Some("p<utoeriksson<<annamaria<<<".to_string())
        );
    }

    #[test]
    fn first_chunk_wins_a_tie() {
        let chunks = ["a<b", "c<d"];
        assert_eq!(MrzLocator::from_chunks(&chunks), Some("a<b".to_string()));
    }

    #[test]
    fn joins_mrz_split_across_lines() {
        let chunks = [
            "UTOPIA",
            "",
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<",
            "L898902C36UTO7408122F1204159<<<<<<",
            "signature",
        ];
        assert_eq!(
            MrzLocator::locate(&chunks, LocatorPolicy::AdjacentPairs),
            Some("p<utoeriksson<<anna<maria<<<<<<l898902c36uto7408122f1204159<<<<<<".to_string())
        );
    }

    #[test]
    fn pairs_fall_back_to_single_chunk() {
        let chunks = ["", "P<<ONLY<<", ""];
        assert_eq!(MrzLocator::from_pairs(&chunks), Some("p<<only<<".to_string()));
    }

    #[test]
    fn nothing_to_locate() {
        let empty: [&str; 0] = [];
        assert_eq!(MrzLocator::locate(&empty, LocatorPolicy::SingleChunk), None);
        assert_eq!(MrzLocator::locate(&empty, LocatorPolicy::AdjacentPairs), None);
    }
}
