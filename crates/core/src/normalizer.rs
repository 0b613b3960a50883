use crate::error::IngestError;
use crate::models::{Granularity, Sentences, Unit};
use regex::Regex;

const NON_TOKEN_CHARS: &str = r"[^a-z -]+";
const MIN_SENTENCE_CHARS: usize = 3;
const PARAGRAPH_SUFFIX: &str = "_pg";

#[derive(Debug, Clone)]
pub struct Normalizer {
    non_token_re: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self, IngestError> {
        Ok(Self {
            non_token_re: Regex::new(NON_TOKEN_CHARS)?,
        })
    }

    pub fn units(&self, source_id: &str, raw_text: &str, granularity: Granularity) -> Vec<Unit> {
        match granularity {
            Granularity::Document => vec![self.document_unit(source_id, raw_text)],
            Granularity::Paragraph => self.paragraph_units(source_id, raw_text),
        }
    }

    pub fn normalize_sentence(&self, sentence: &str) -> Vec<String> {
        let lowered = sentence.trim().to_lowercase();
        self.non_token_re
            .replace_all(&lowered, "")
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    fn document_unit(&self, source_id: &str, raw_text: &str) -> Unit {
        let joined = raw_text.split('\n').collect::<Vec<_>>().join(" ");
        let sentences: Sentences = sentence_candidates(&joined)
            .map(|sentence| self.normalize_sentence(sentence))
            .collect();

        Unit::new(source_id, raw_text, sentences)
    }

    fn paragraph_units(&self, source_id: &str, raw_text: &str) -> Vec<Unit> {
        let mut units = Vec::new();

        for line in raw_text.split('\n') {
            let sentences: Sentences = sentence_candidates(line)
                .map(|sentence| self.normalize_sentence(sentence))
                .filter(|tokens| !tokens.is_empty())
                .collect();

            if sentences.is_empty() {
                continue;
            }

            let key = paragraph_key(source_id, units.len());
            units.push(Unit::new(key, line, sentences));
        }

        units
    }
}

fn sentence_candidates(text: &str) -> impl Iterator<Item = &str> {
    text.split('.')
        .filter(|sentence| sentence.chars().count() >= MIN_SENTENCE_CHARS)
}

pub fn paragraph_key(source_id: &str, ordinal: usize) -> String {
    format!("{source_id}{PARAGRAPH_SUFFIX}{ordinal}")
}

pub fn belongs_to_source(unit_key: &str, source_id: &str) -> bool {
    match unit_key.strip_prefix(source_id) {
        Some("") => true,
        Some(rest) => rest.strip_prefix(PARAGRAPH_SUFFIX).is_some_and(|ordinal| {
            !ordinal.is_empty() && ordinal.bytes().all(|byte| byte.is_ascii_digit())
        }),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new().expect("token regex compiles")
    }

    #[test]
    fn sentence_is_lowercased_and_stripped() {
        let tokens = normalizer().normalize_sentence("  Well-known   Cats, 42 of them!  ");
        assert_eq!(tokens, ["well-known", "cats", "of", "them"]);
    }

    #[test]
    fn document_mode_keeps_empty_sentences() {
        let units = normalizer().units("a.txt", "One two three. 1234. Four five", Granularity::Document);
        assert_eq!(units.len(), 1);
        let unit = &units[0];
        assert_eq!(unit.key(), "a.txt");
        assert_eq!(unit.sentences().len(), 3);
        assert!(unit.sentences()[1].is_empty());
        assert_eq!(unit.length(), 5);
    }

    #[test]
    fn document_mode_joins_lines() {
        let units = normalizer().units("a.txt", "The cat\nsat down.", Granularity::Document);
        assert_eq!(units[0].sentences().len(), 1);
        assert_eq!(units[0].sentences()[0], ["the", "cat", "sat", "down"]);
        assert_eq!(units[0].raw_text(), "The cat\nsat down.");
    }

    #[test]
    fn short_fragments_are_dropped() {
        let units = normalizer().units("a.txt", "Hi.ok..", Granularity::Document);
        assert_eq!(units.len(), 1);
        assert!(units[0].sentences().is_empty());
        assert_eq!(units[0].length(), 0);
    }

    #[test]
    fn paragraph_ordinals_are_dense_over_survivors() {
        let units = normalizer().units(
            "doc.txt",
            "Hello world.\n\n  \nSecond paragraph here.",
            Granularity::Paragraph,
        );
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].key(), "doc.txt_pg0");
        assert_eq!(units[1].key(), "doc.txt_pg1");
        assert_eq!(units[1].raw_text(), "Second paragraph here.");
        assert_eq!(units[1].length(), 3);
    }

    #[test]
    fn paragraph_mode_drops_tokenless_paragraphs() {
        let units = normalizer().units("doc.txt", "12345.\n!!!???\n", Granularity::Paragraph);
        assert!(units.is_empty());
    }

    #[test]
    fn paragraph_of_short_fragments_is_dropped() {
        let units = normalizer().units("doc.txt", "Hi.ok\nno", Granularity::Paragraph);
        assert!(units.is_empty());
    }

    #[test]
    fn source_membership_matches_document_and_paragraphs() {
        assert!(belongs_to_source("a.txt", "a.txt"));
        assert!(belongs_to_source("a.txt_pg12", "a.txt"));
        assert!(!belongs_to_source("a.txt_pg", "a.txt"));
        assert!(!belongs_to_source("a.txt.bak", "a.txt"));
        assert!(!belongs_to_source("b.txt_pg0", "a.txt"));
    }
}
