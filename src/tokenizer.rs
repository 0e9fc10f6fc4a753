//! Noun extraction from scraped text.
//!
//! Part-of-speech tagging is an external capability behind the
//! [`NounTokenizer`] trait. The bundled [`HangulNounTokenizer`] is a light
//! heuristic for Korean headlines: it takes runs of Hangul syllables, peels
//! off a trailing postposition and discards runs that look like predicates.
//! It makes no claim to linguistic accuracy.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maps raw text to the noun tokens it contains, in text order.
pub trait NounTokenizer {
    fn nouns(&self, text: &str) -> Vec<String>;
}

static HANGUL_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[가-힣]+").unwrap());

/// Postpositions, longest first so that `에서는` wins over `는`.
const PARTICLES: &[&str] = &[
    "에서는", "으로는", "에게서", "이라는", "에서", "으로", "에게", "까지", "부터", "처럼",
    "보다", "라는", "이나", "하고", "과의", "와의", "의", "가", "이", "은", "는", "을", "를",
    "에", "와", "과", "도", "로", "만",
];

/// Endings that mark a run as a verb or adjective rather than a noun.
const PREDICATE_ENDINGS: &[&str] = &[
    "니다", "했다", "한다", "된다", "있다", "없다", "하는", "했던", "되는", "있는", "없는",
    "하게", "해서", "하며",
];

/// Heuristic Korean noun extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct HangulNounTokenizer;

impl HangulNounTokenizer {
    fn noun_of(run: &str) -> Option<String> {
        if PREDICATE_ENDINGS.iter().any(|e| run.ends_with(e)) {
            return None;
        }
        let stem = PARTICLES
            .iter()
            .filter_map(|p| run.strip_suffix(p))
            .find(|stem| stem.chars().count() >= 2)
            .unwrap_or(run);
        Some(stem.to_string())
    }
}

impl NounTokenizer for HangulNounTokenizer {
    fn nouns(&self, text: &str) -> Vec<String> {
        HANGUL_RUN
            .find_iter(text)
            .filter_map(|m| Self::noun_of(m.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_particles() {
        let nouns = HangulNounTokenizer.nouns("정부는 경제를 살리기 위해 국회에서 논의");
        assert!(nouns.contains(&"정부".to_string()));
        assert!(nouns.contains(&"경제".to_string()));
        assert!(nouns.contains(&"국회".to_string()));
        assert!(nouns.contains(&"논의".to_string()));
    }

    #[test]
    fn test_longest_particle_wins() {
        assert_eq!(HangulNounTokenizer.nouns("서울에서는"), vec!["서울".to_string()]);
    }

    #[test]
    fn test_keeps_two_syllable_minimum_when_stripping() {
        // stripping "이" would leave a single syllable
        assert_eq!(HangulNounTokenizer.nouns("나이"), vec!["나이".to_string()]);
    }

    #[test]
    fn test_drops_predicates() {
        assert!(HangulNounTokenizer.nouns("발표했다 진행합니다").is_empty());
    }

    #[test]
    fn test_ignores_latin_digits_and_markup() {
        let nouns = HangulNounTokenizer.nouns("<div>KBS 2024 뉴스</div> &nbsp;");
        assert_eq!(nouns, vec!["뉴스".to_string()]);
    }

    #[test]
    fn test_empty_text() {
        assert!(HangulNounTokenizer.nouns("").is_empty());
    }
}
