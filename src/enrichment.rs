// WHY: Offline enrichment of extract documents: the verse word a sentence explains
// and the half-verse (pada) it occurs in

use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::document::ExtractDocument;
use crate::error::CitationError;

/// Particles never taken as the explained word
const COMMON_PARTICLES: [&str; 9] = ["इति", "च", "वा", "अथ", "तु", "एव", "अपि", "किम्", "तत्"];

const PADA_DELIMITER: char = '।';
const VERSE_END: char = '॥';

/// Appended to the extract comment once padas are present
const PADA_COMMENT_MARK: &str = " [pada field added]";

fn looks_like_notation(candidate: &str) -> bool {
    candidate.contains(['।', '|', '.'])
}

/// Pattern-based search for the verse word a commentary sentence explains
#[derive(Debug, Clone)]
pub struct WordFinder {
    quoted: Regex,
    before_iti: Regex,
    compound: Regex,
    devanagari: Regex,
}

impl WordFinder {
    pub fn new() -> Result<Self, CitationError> {
        Ok(Self {
            quoted: Regex::new(r"`([^`]+)`")?,
            before_iti: Regex::new(r"(\S+)\s*इति")?,
            compound: Regex::new(r"(\S+)\s+च\s+\S+\s+च\s+(\S+)")?,
            devanagari: Regex::new(r"[\x{0900}-\x{097F}]+")?,
        })
    }

    /// First group `group` of each match of `regex` in `text`
    fn groups<'t>(regex: &'t Regex, text: &'t str, group: usize) -> impl Iterator<Item = &'t str> + 't {
        regex
            .captures_iter(text)
            .filter_map(move |caps| caps.get_group(group).map(|span| &text[span.range()]))
    }

    /// Word of `sentence` that also occurs in `verse`, or `None`
    ///
    /// Tried in order: a backtick-quoted term, the word before `इति`, the last member of
    /// an `X च Y च Z` analysis, then the first Devanagari word of more than two
    /// characters that is not a common particle.
    pub fn find_word(&self, sentence: &str, verse: &str) -> Option<String> {
        if sentence.is_empty() || verse.is_empty() {
            return None;
        }

        let quoted = Self::groups(&self.quoted, sentence, 1)
            .map(str::trim)
            .find(|w| !looks_like_notation(w) && verse.contains(w));

        let before_iti = || {
            Self::groups(&self.before_iti, sentence, 1)
                .map(str::trim)
                .find(|w| !looks_like_notation(w) && !w.contains('`') && verse.contains(w))
        };

        let compound = || Self::groups(&self.compound, sentence, 2).find(|w| verse.contains(w));

        let devanagari = || {
            self.devanagari
                .find_iter(sentence)
                .map(|m| &sentence[m.range()])
                .find(|w| !COMMON_PARTICLES.contains(w) && w.chars().count() > 2 && verse.contains(w))
        };

        quoted
            .or_else(before_iti)
            .or_else(compound)
            .or_else(devanagari)
            .map(str::to_string)
    }
}

/// Half-verse of `verse` containing `word`
///
/// Falls back to a half-verse containing the first half of a longer word, then to the
/// first half-verse. Empty when either input is empty.
pub fn find_pada_for_word(verse: &str, word: &str) -> String {
    if word.is_empty() || verse.is_empty() {
        return String::new();
    }

    let padas: Vec<String> = verse
        .split(PADA_DELIMITER)
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.trim().replace(VERSE_END, "").trim().to_string())
        .collect();

    if let Some(pada) = padas.iter().find(|p| p.contains(word)) {
        return pada.clone();
    }

    let length = word.chars().count();
    if length > 3 {
        let root: String = word.chars().take(length / 2).collect();
        if let Some(pada) = padas.iter().find(|p| p.contains(root.as_str())) {
            return pada.clone();
        }
    }

    padas.into_iter().next().unwrap_or_else(|| verse.to_string())
}

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// Fill empty `word` fields
    pub fill_words: bool,
    /// Set `pada` on every sutra sentence
    pub add_pada: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            fill_words: true,
            add_pada: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EnrichStats {
    pub total_sentences: usize,
    pub words_filled: usize,
    pub words_still_empty: usize,
    pub padas_added: usize,
}

/// Enrich a document in place
pub fn enrich_document(document: &mut ExtractDocument, finder: &WordFinder, options: &EnrichOptions) -> EnrichStats {
    let mut stats = EnrichStats::default();

    for entry in &mut document.data {
        for sentence in &mut entry.sutra_sentences {
            stats.total_sentences += 1;

            if options.fill_words && sentence.word.is_empty() {
                match finder.find_word(&sentence.sentence, &entry.v) {
                    Some(word) => {
                        debug!("Verse {}, sutra {}: word '{}'", entry.loc, sentence.sutra, word);
                        sentence.word = word;
                        stats.words_filled += 1;
                    }
                    None => {
                        debug!("Verse {}, sutra {}: no word found", entry.loc, sentence.sutra);
                        stats.words_still_empty += 1;
                    }
                }
            }

            if options.add_pada {
                sentence.pada = Some(find_pada_for_word(&entry.v, &sentence.word));
                stats.padas_added += 1;
            }
        }
    }

    if options.add_pada && !document.comment.contains("pada field") {
        document.comment.push_str(PADA_COMMENT_MARK);
    }

    info!(
        "Enriched {}: {} words filled, {} still empty, {} padas",
        document.text, stats.words_filled, stats.words_still_empty, stats.padas_added
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ExtractEntry, SutraSentence};

    const VERSE: &str = "वागर्थाविव सम्पृक्तौ वागर्थप्रतिपत्तये। जगतः पितरौ वन्दे पार्वतीपरमेश्वरौ॥";

    fn finder() -> WordFinder {
        WordFinder::new().unwrap()
    }

    #[test]
    fn test_quoted_term_in_verse() {
        let word = finder().find_word("`पितरौ` इति द्विवचनम्।", VERSE);
        assert_eq!(word.as_deref(), Some("पितरौ"));
    }

    #[test]
    fn test_quoted_sutra_text_skipped() {
        // The quoted sutra is not in the verse, the word before इति is
        let word = finder().find_word("`पिता मात्रा` पितरौ इति।", VERSE);
        assert_eq!(word.as_deref(), Some("पितरौ"));
    }

    #[test]
    fn test_compound_analysis() {
        let verse = "पार्वतीपरमेश्वरौ वन्दे";
        let word = finder().find_word("पार्वती च परमेश्वरः च पार्वतीपरमेश्वरौ", verse);
        assert_eq!(word.as_deref(), Some("पार्वतीपरमेश्वरौ"));
    }

    #[test]
    fn test_devanagari_fallback_skips_particles() {
        let word = finder().find_word("अथ वन्दे नमस्करोमि", VERSE);
        assert_eq!(word.as_deref(), Some("वन्दे"));
    }

    #[test]
    fn test_no_word() {
        assert_eq!(finder().find_word("अन्यत् किमपि", VERSE), None);
        assert_eq!(finder().find_word("", VERSE), None);
        assert_eq!(finder().find_word("वन्दे", ""), None);
    }

    #[test]
    fn test_pada_lookup() {
        assert_eq!(find_pada_for_word(VERSE, "पितरौ"), "जगतः पितरौ वन्दे पार्वतीपरमेश्वरौ");
        assert_eq!(find_pada_for_word(VERSE, "सम्पृक्तौ"), "वागर्थाविव सम्पृक्तौ वागर्थप्रतिपत्तये");
        // First half of the word matches
        assert_eq!(find_pada_for_word(VERSE, "पार्वतीभिः"), "जगतः पितरौ वन्दे पार्वतीपरमेश्वरौ");
        // Falls back to the first pada
        assert_eq!(find_pada_for_word(VERSE, "कः"), "वागर्थाविव सम्पृक्तौ वागर्थप्रतिपत्तये");
        assert_eq!(find_pada_for_word(VERSE, ""), "");
        assert_eq!(find_pada_for_word("", "पितरौ"), "");
    }

    #[test]
    fn test_enrich_document() {
        let mut document = ExtractDocument {
            text: "raghuvansham".to_string(),
            comment: "This file contains 1 unique Panini sutras referenced in the commentary".to_string(),
            data: vec![ExtractEntry {
                loc: "1.1".to_string(),
                v: VERSE.to_string(),
                sutra_sentences: vec![
                    SutraSentence {
                        sutra: "1.2.70".parse().unwrap(),
                        word: String::new(),
                        sentence: "`पितरौ` इति द्विवचनम्।".to_string(),
                        pada: None,
                    },
                    SutraSentence {
                        sutra: "2.2.29".parse().unwrap(),
                        word: "कृतम्".to_string(),
                        sentence: "अन्यत्।".to_string(),
                        pada: None,
                    },
                ],
            }],
            ..Default::default()
        };

        let stats = enrich_document(&mut document, &finder(), &EnrichOptions::default());

        assert_eq!(stats.total_sentences, 2);
        assert_eq!(stats.words_filled, 1);
        assert_eq!(stats.padas_added, 2);
        let first = &document.data[0].sutra_sentences[0];
        assert_eq!(first.word, "पितरौ");
        assert_eq!(first.pada.as_deref(), Some("जगतः पितरौ वन्दे पार्वतीपरमेश्वरौ"));
        // Existing words are kept
        assert_eq!(document.data[0].sutra_sentences[1].word, "कृतम्");
        assert!(document.comment.ends_with(PADA_COMMENT_MARK));

        enrich_document(&mut document, &finder(), &EnrichOptions::default());
        assert_eq!(document.comment.matches("pada field").count(), 1);
    }
}
