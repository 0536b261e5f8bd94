//! Language-aware selection among multi-valued free-text fields.

use oaicorpus_core::RawField;

use crate::language::{EnglishCheck, LanguageDetector};

/// Picks the best title-like value from `candidates`, in priority order:
/// a lone candidate wins unconditionally, then the first explicitly
/// English-tagged one, then the first untagged one the detector calls
/// English, then the shortest candidate as a last resort. The shortest
/// fallback deliberately favours the least verbose value, nothing more.
pub fn select_preferring_short<'a>(
    candidates: &'a [RawField],
    check: &EnglishCheck,
    detector: &dyn LanguageDetector,
) -> Option<&'a str> {
    match candidates {
        [] => None,
        [only] => Some(&only.text),
        many => {
            if let Some(tagged) = many.iter().find(|c| c.is_english_tagged()) {
                return Some(&tagged.text);
            }
            if let Some(detected) = many
                .iter()
                .filter(|c| c.language == oaicorpus_core::UNKNOWN)
                .find(|c| check.is_english(detector, &c.text))
            {
                return Some(&detected.text);
            }
            many.iter()
                .min_by_key(|c| c.text.chars().count())
                .map(|c| c.text.as_str())
        }
    }
}

/// Keeps the longest candidate that is English, either by explicit tag
/// or by detector vote over untagged text. Abstracts benefit from
/// completeness, so length wins and non-English candidates are dropped
/// outright. Returns `None` when no candidate qualifies.
pub fn select_longest_english<'a>(
    candidates: &'a [RawField],
    check: &EnglishCheck,
    detector: &dyn LanguageDetector,
) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|c| {
            c.is_english_tagged()
                || (c.language == oaicorpus_core::UNKNOWN && check.is_english(detector, &c.text))
        })
        .max_by_key(|c| c.text.chars().count())
        .map(|c| c.text.as_str())
}
