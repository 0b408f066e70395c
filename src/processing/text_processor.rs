//! Text normalization and job-description keyword extraction

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Whitespace and unicode cleanup applied to every text before further
/// processing. Both normalizers are idempotent.
pub struct TextNormalizer {
    whitespace_regex: Regex,
    line_whitespace_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            whitespace_regex: Regex::new(r"\s+").expect("Invalid whitespace regex"),
            line_whitespace_regex: Regex::new(r"[ \t]+").expect("Invalid line whitespace regex"),
        }
    }

    /// Collapse all whitespace runs to single spaces and trim the ends.
    /// Feeds the embedding and keyword stages.
    pub fn normalize(&self, text: &str) -> String {
        let folded = Self::fold_unicode(text);
        self.whitespace_regex
            .replace_all(&folded, " ")
            .trim()
            .to_string()
    }

    /// Collapse whitespace within each line but keep line breaks, so the
    /// line-oriented field heuristics still see document structure.
    pub fn normalize_lines(&self, text: &str) -> String {
        let folded = Self::fold_unicode(text);
        let lines: Vec<String> = folded
            .lines()
            .map(|ln| self.line_whitespace_regex.replace_all(ln, " ").trim().to_string())
            .collect();
        lines.join("\n").trim_matches('\n').to_string()
    }

    fn fold_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'', // Smart quotes to regular quotes
                '\u{201C}' | '\u{201D}' => '"',  // Smart double quotes
                '\u{2013}' | '\u{2014}' => '-',  // En dash, em dash to hyphen
                '\u{2026}' => '.',               // Ellipsis to period
                '\u{00A0}' => ' ',               // Non-breaking space
                _ => c,
            })
            .collect()
    }
}

/// Turns raw job-description text into a deduplicated set of keyword tokens.
///
/// Below `fast_path_threshold` characters each token is reduced to a base form
/// by a rule-based suffix lemmatizer; at or above it the plain regex tokens are
/// used unchanged to bound latency on oversized input. Extraction never fails.
pub struct KeywordExtractor {
    stop_words: HashSet<String>,
    word_regex: Regex,
    fast_path_threshold: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(300_000)
    }
}

impl KeywordExtractor {
    pub fn new(fast_path_threshold: usize) -> Self {
        Self {
            stop_words: Self::create_stop_words(),
            word_regex: Regex::new(r"[A-Za-z]+").expect("Invalid word regex"),
            fast_path_threshold,
        }
    }

    /// Extract the keyword set from normalized JD text. Empty input yields an
    /// empty set.
    pub fn extract(&self, text: &str) -> HashSet<String> {
        if text.len() >= self.fast_path_threshold {
            return self.regex_tokens(text);
        }

        self.unicode_tokens(text)
            .into_iter()
            .map(|t| Self::lemmatize(&t))
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Full tokenizer: Unicode word segmentation, lowercased alphabetic tokens.
    fn unicode_tokens(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|w| w.to_lowercase())
            .filter(|t| t.len() > 1 && t.chars().any(|c| c.is_alphabetic()))
            .filter(|t| !self.stop_words.contains(t))
            .collect()
    }

    /// Fast fallback tokenizer: lowercase alphabetic words minus stop words.
    fn regex_tokens(&self, text: &str) -> HashSet<String> {
        let lower = text.to_lowercase();
        self.word_regex
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .filter(|t| t.len() > 1 && !self.stop_words.contains(t))
            .collect()
    }

    /// Reduce common English inflections to a base form. Rule-based on
    /// purpose: deterministic, allocation-light, and cannot fail.
    pub fn lemmatize(word: &str) -> String {
        let w = word;
        if w.len() > 4 && w.ends_with("ies") {
            return format!("{}y", &w[..w.len() - 3]);
        }
        if w.len() > 5 && w.ends_with("sses") {
            return w[..w.len() - 2].to_string();
        }
        if w.len() >= 6 && w.ends_with("ing") {
            return Self::restore_stem(&w[..w.len() - 3]);
        }
        if w.len() >= 5 && w.ends_with("ed") {
            return Self::restore_stem(&w[..w.len() - 2]);
        }
        if w.len() > 3
            && w.ends_with('s')
            && !w.ends_with("ss")
            && !w.ends_with("us")
            && !w.ends_with("is")
        {
            return w[..w.len() - 1].to_string();
        }
        w.to_string()
    }

    /// Undo consonant doubling ("planned" -> "plan") and restore a dropped
    /// magic-e ("hiring" -> "hire") after suffix stripping.
    fn restore_stem(stem: &str) -> String {
        let chars: Vec<char> = stem.chars().collect();
        let n = chars.len();
        if n >= 2 && chars[n - 1] == chars[n - 2] && !Self::is_vowel(chars[n - 1]) {
            return chars[..n - 1].iter().collect();
        }
        if n >= 3
            && !Self::is_vowel(chars[n - 1])
            && Self::is_vowel(chars[n - 2])
            && !Self::is_vowel(chars[n - 3])
        {
            return format!("{}e", stem);
        }
        stem.to_string()
    }

    fn is_vowel(c: char) -> bool {
        matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
    }

    fn create_stop_words() -> HashSet<String> {
        let stop_words = [
            "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
            "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
            "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing",
            "down", "during", "each", "few", "for", "from", "further", "had", "has", "have",
            "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
            "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more",
            "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
            "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
            "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs",
            "them", "themselves", "then", "there", "these", "they", "this", "those",
            "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
            "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with",
            "would", "you", "your", "yours", "yourself", "yourselves",
        ];

        stop_words.iter().map(|&s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("  hello \t\n  world  "), "hello world");
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = TextNormalizer::new();
        let once = normalizer.normalize("a \u{2019}quoted\u{2019}\n\n  text");
        assert_eq!(normalizer.normalize(&once), once);

        let lines_once = normalizer.normalize_lines("Jane  Doe\n\n  Education  \nMIT");
        assert_eq!(normalizer.normalize_lines(&lines_once), lines_once);
    }

    #[test]
    fn test_normalize_lines_keeps_structure() {
        let normalizer = TextNormalizer::new();
        let out = normalizer.normalize_lines("Jane  Doe\njane@example.com\n\nSkills");
        assert_eq!(out, "Jane Doe\njane@example.com\n\nSkills");
    }

    #[test]
    fn test_keywords_have_no_stop_words_or_duplicates() {
        let extractor = KeywordExtractor::default();
        let keywords =
            extractor.extract("The developer will work with Python and the SQL and python tools");

        assert!(keywords.contains("python"));
        assert!(keywords.contains("sql"));
        assert!(!keywords.contains("the"));
        assert!(!keywords.contains("and"));
        assert!(!keywords.contains("with"));
    }

    #[test]
    fn test_lemmatization() {
        assert_eq!(KeywordExtractor::lemmatize("years"), "year");
        assert_eq!(KeywordExtractor::lemmatize("skills"), "skill");
        assert_eq!(KeywordExtractor::lemmatize("technologies"), "technology");
        assert_eq!(KeywordExtractor::lemmatize("hiring"), "hire");
        assert_eq!(KeywordExtractor::lemmatize("learning"), "learn");
        assert_eq!(KeywordExtractor::lemmatize("planned"), "plan");
        assert_eq!(KeywordExtractor::lemmatize("sql"), "sql");
        assert_eq!(KeywordExtractor::lemmatize("css"), "css");
        assert_eq!(KeywordExtractor::lemmatize("aws"), "aws");
    }

    #[test]
    fn test_unicode_word_segmentation() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("Fine-tuning na\u{EF}ve retrieval models");

        // Hyphenated compounds split at Unicode word boundaries
        assert!(keywords.contains("fine"));
        assert!(keywords.contains("tune"));
        assert!(keywords.contains("model"));
        // Non-ASCII letters survive segmentation and lemmatization
        assert!(keywords.contains("na\u{EF}ve"));
    }

    #[test]
    fn test_oversized_input_uses_fast_path() {
        let extractor = KeywordExtractor::new(1_000);
        let big = "python developer ".repeat(100);
        assert!(big.len() >= 1_000);

        let keywords = extractor.extract(&big);
        assert!(!keywords.is_empty());
        assert!(keywords.contains("python"));
        // Fast path skips lemmatization
        assert!(keywords.contains("developer"));
    }

    #[test]
    fn test_empty_input() {
        let extractor = KeywordExtractor::default();
        assert!(extractor.extract("").is_empty());
    }
}
