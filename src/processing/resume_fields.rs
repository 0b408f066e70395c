//! Heuristic extraction of name, skills, education and experience from
//! resume text. Every sub-extraction is advisory: a miss yields that field's
//! empty default, never an error.

use crate::error::{Result, ScreenerError};
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFields {
    pub name: String,
    pub skills: BTreeSet<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
}

impl Default for ResumeFields {
    fn default() -> Self {
        Self {
            name: "Unknown".to_string(),
            skills: BTreeSet::new(),
            education: Vec::new(),
            experience: Vec::new(),
        }
    }
}

pub struct FieldExtractor {
    lexicon: Vec<String>,
    skill_matcher: AhoCorasick,
    name_line_regex: Regex,
    contact_regex: Regex,
    name_token_regex: Regex,
    noise_regex: Regex,
    email_regex: Regex,
    section_header_regex: Regex,
    education_header_regex: Regex,
    degree_regex: Regex,
    years_regex: Regex,
    explicit_experience_regex: Regex,
    max_education: usize,
    max_experience: usize,
}

impl FieldExtractor {
    pub fn new() -> Result<Self> {
        Self::with_extra_skills(&[], 3, 3)
    }

    pub fn with_extra_skills(
        extra_skills: &[String],
        max_education: usize,
        max_experience: usize,
    ) -> Result<Self> {
        let mut lexicon = Self::default_lexicon();
        lexicon.extend(extra_skills.iter().map(|s| s.to_lowercase()));
        lexicon.sort();
        lexicon.dedup();

        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&lexicon)
            .map_err(|e| {
                ScreenerError::TextProcessing(format!("Failed to build skill matcher: {}", e))
            })?;

        Ok(Self {
            lexicon,
            skill_matcher,
            name_line_regex: Regex::new(r"(?mi)^\s*name\s*[:\-]\s*(.+)$")
                .expect("Invalid name line regex"),
            contact_regex: Regex::new(r"@|https?://|\d{7,}").expect("Invalid contact regex"),
            name_token_regex: Regex::new(r"^[A-Za-z\-']+$").expect("Invalid name token regex"),
            noise_regex: Regex::new(r"[^A-Za-z\s\-']").expect("Invalid noise regex"),
            email_regex: Regex::new(r"([A-Za-z0-9._%+\-]+)@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
                .expect("Invalid email regex"),
            section_header_regex: Regex::new(
                r"(?i)\b(skills|experience|education|projects|certifications|summary|objective|profile|contact)\b",
            )
            .expect("Invalid section header regex"),
            education_header_regex: Regex::new(r"(?i)^\s*education\s*[:\-]?\s*$")
                .expect("Invalid education header regex"),
            degree_regex: Regex::new(
                r"(?i)\bb\.?tech\b|\bbachelor|\bmtech\b|\bmaster|\bmsc\b|\bms\b|\bmba\b|\bph\.?d\b|\bbsc\b|\bba\b|\buniversity\b|\bcollege\b|\binstitute\b|\bschool\b",
            )
            .expect("Invalid degree regex"),
            years_regex: Regex::new(r"(\d{1,2})\+?\s*(?:years|yrs)\b").expect("Invalid years regex"),
            explicit_experience_regex: Regex::new(r"experience\s*[:\-]\s*(\d{1,2})\s*(?:years|yrs)\b")
                .expect("Invalid experience regex"),
            max_education,
            max_experience,
        })
    }

    /// Parse all fields out of line-normalized resume text.
    pub fn extract(&self, text: &str) -> ResumeFields {
        if text.trim().is_empty() {
            return ResumeFields::default();
        }

        ResumeFields {
            name: self.extract_name(text),
            skills: self.extract_skills(text),
            education: self.extract_education(text),
            experience: self.extract_experience(text),
        }
    }

    /// Ordered fallback chain: explicit `Name:` line, first name-like line,
    /// email local-part, then "Unknown".
    pub fn extract_name(&self, text: &str) -> String {
        if let Some(cap) = self.name_line_regex.captures(text) {
            let cleaned = self.clean_snippet(&cap[1]);
            let titled = Self::title_case(&cleaned);
            if !titled.is_empty() {
                return titled;
            }
        }

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || self.contact_regex.is_match(line) {
                continue;
            }
            if self.looks_like_name(line) {
                let tokens: Vec<&str> = line.split_whitespace().take(4).collect();
                return Self::title_case(&tokens.join(" "));
            }
        }

        if let Some(cap) = self.email_regex.captures(text) {
            let parts: Vec<&str> = cap[1]
                .split(['.', '_', '-', '+'])
                .filter(|p| p.len() > 1)
                .collect();
            if !parts.is_empty() {
                return parts
                    .iter()
                    .take(3)
                    .map(|p| Self::title_case(p))
                    .collect::<Vec<_>>()
                    .join(" ");
            }
        }

        "Unknown".to_string()
    }

    /// Whole-word / whole-phrase lexicon membership. Matches are reported as
    /// the lexicon spelling, not the raw text span.
    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for mat in self.skill_matcher.find_iter(text) {
            if Self::on_word_boundary(text, mat.start(), mat.end()) {
                found.insert(self.lexicon[mat.pattern().as_usize()].clone());
            }
        }
        found
    }

    fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    }

    /// Snippets under an explicit `Education` header first, degree/institution
    /// keyword lines as fallback. Deduplicated, first-seen order.
    pub fn extract_education(&self, text: &str) -> Vec<String> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        let mut snippets = Vec::new();
        if let Some(idx) = lines
            .iter()
            .position(|ln| self.education_header_regex.is_match(ln))
        {
            let mut count = 0;
            for line in lines.iter().skip(idx + 1).take(5) {
                if line.is_empty() {
                    if count > 0 {
                        break;
                    }
                    continue;
                }
                if self.section_header_regex.is_match(line) {
                    break;
                }
                let cleaned = self.clean_snippet(line);
                if !cleaned.is_empty() {
                    snippets.push(Self::truncate_chars(&cleaned, 160));
                    count += 1;
                }
                if count >= self.max_education {
                    break;
                }
            }
        }

        if snippets.is_empty() {
            for line in &lines {
                if line.is_empty() {
                    continue;
                }
                if self.degree_regex.is_match(line) {
                    let cleaned = self.clean_snippet(line);
                    if !cleaned.is_empty() {
                        snippets.push(Self::truncate_chars(&cleaned, 160));
                    }
                }
                if snippets.len() >= self.max_education {
                    break;
                }
            }
        }

        Self::dedupe_keep_order(snippets)
    }

    /// Explicit `experience: N years` first, then every `N years`/`N yrs`
    /// occurrence, normalized to `"N years"`, capped.
    pub fn extract_experience(&self, text: &str) -> Vec<String> {
        let low = text.to_lowercase();
        let mut out = Vec::new();

        if let Some(cap) = self.explicit_experience_regex.captures(&low) {
            out.push(format!("{} years", &cap[1]));
        }
        for cap in self.years_regex.captures_iter(&low) {
            let token = format!("{} years", &cap[1]);
            if !out.contains(&token) {
                out.push(token);
            }
        }

        out.truncate(self.max_experience);
        out
    }

    /// Strict name-shape check for candidate lines: 2-5 tokens, each
    /// alphabetic (hyphen/apostrophe allowed), at most 120 chars.
    pub fn looks_like_name(&self, s: &str) -> bool {
        let s = s.trim();
        if s.is_empty() || s.chars().count() > 120 {
            return false;
        }
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if !(2..=5).contains(&tokens.len()) {
            return false;
        }
        tokens.iter().take(4).all(|t| self.name_token_regex.is_match(t))
    }

    /// Loose variant used when filtering education snippets: punctuation is
    /// stripped before the token check, so "Jane A. Doe" still reads as a name.
    pub fn looks_like_name_loose(&self, s: &str) -> bool {
        let stripped = self.noise_regex.replace_all(s, " ");
        self.looks_like_name(stripped.trim())
    }

    /// Cut a snippet at the first section-header keyword and strip trailing
    /// punctuation.
    fn clean_snippet(&self, s: &str) -> String {
        let mut s = s.trim();
        if let Some(m) = self.section_header_regex.find(s) {
            s = &s[..m.start()];
        }
        let s = s.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | ':' | '-' | ','));
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn title_case(s: &str) -> String {
        s.split_whitespace()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>()
                        + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn truncate_chars(s: &str, max: usize) -> String {
        s.chars().take(max).collect()
    }

    fn dedupe_keep_order(items: Vec<String>) -> Vec<String> {
        let mut seen = BTreeSet::new();
        items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect()
    }

    fn default_lexicon() -> Vec<String> {
        [
            "python", "sql", "tensorflow", "pytorch", "aws", "azure", "gcp", "docker",
            "kubernetes", "terraform", "react", "javascript", "typescript", "html", "css",
            "node", "java", "c++", "c#", "rust", "kotlin", "swift", "scala", "git", "linux",
            "nlp", "machine learning", "deep learning", "pandas", "numpy", "spark",
            "postgresql", "mysql", "mongodb", "redis", "graphql", "excel",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new().unwrap()
    }

    #[test]
    fn test_explicit_name_line() {
        let fields = extractor().extract("Name: jane q. public\njane@example.com");
        assert_eq!(fields.name, "Jane Q. Public");
    }

    #[test]
    fn test_name_from_first_line() {
        let text = "Alice Johnson\nalice@example.com\n5551234567\nSkills: Python";
        assert_eq!(extractor().extract_name(text), "Alice Johnson");
    }

    #[test]
    fn test_name_skips_contact_lines() {
        let text = "alice@example.com\nhttps://example.com/alice\n5551234567\nAlice Johnson";
        assert_eq!(extractor().extract_name(text), "Alice Johnson");
    }

    #[test]
    fn test_name_from_email_local_part() {
        let text = "Resume\ncontact: john.q.doe@example.com";
        assert_eq!(extractor().extract_name(text), "John Doe");
    }

    #[test]
    fn test_name_default() {
        assert_eq!(extractor().extract_name("no identifying lines here at all 123"), "Unknown");
    }

    #[test]
    fn test_skill_extraction_normalizes_to_lexicon() {
        let fields = extractor().extract("Worked with PYTHON, TensorFlow and machine LEARNING.");
        assert!(fields.skills.contains("python"));
        assert!(fields.skills.contains("tensorflow"));
        assert!(fields.skills.contains("machine learning"));
    }

    #[test]
    fn test_skill_whole_word_only() {
        let skills = extractor().extract_skills("An excellent javadoc reader");
        assert!(!skills.contains("excel"));
        assert!(!skills.contains("java"));
    }

    #[test]
    fn test_education_header_block() {
        let text = "Jane Doe\n\nEducation\nB.Tech in Computer Science, IIT Delhi\nClass of 2019\n\nSkills\nPython";
        let education = extractor().extract_education(text);
        assert_eq!(education[0], "B.Tech in Computer Science, IIT Delhi");
        assert!(education.len() <= 3);
    }

    #[test]
    fn test_education_keyword_fallback() {
        let text = "Jane Doe\nGraduated from Stanford University with honors";
        let education = extractor().extract_education(text);
        assert_eq!(education.len(), 1);
        assert!(education[0].contains("Stanford University"));
    }

    #[test]
    fn test_education_deduplicated() {
        let text = "Education\nMIT\nMIT\nOxford College";
        let education = extractor().extract_education(text);
        assert_eq!(education, vec!["MIT".to_string(), "Oxford College".to_string()]);
    }

    #[test]
    fn test_experience_order_and_dedup() {
        let text = "Built systems for 5 years. Led a team for 3 yrs. Again 5 years total.";
        let experience = extractor().extract_experience(text);
        assert_eq!(experience, vec!["5 years".to_string(), "3 years".to_string()]);
    }

    #[test]
    fn test_explicit_experience_first() {
        let text = "Worked 2 years at X. Experience: 7 years";
        let experience = extractor().extract_experience(text);
        assert_eq!(experience[0], "7 years");
    }

    #[test]
    fn test_looks_like_name() {
        let ex = extractor();
        assert!(ex.looks_like_name("Jane Doe"));
        assert!(ex.looks_like_name("Mary-Jane O'Brien"));
        assert!(!ex.looks_like_name("Jane"));
        assert!(!ex.looks_like_name("B.Tech in Computer Science, IIT Delhi"));
        assert!(ex.looks_like_name_loose("Jane A. Doe"));
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let fields = extractor().extract("   ");
        assert_eq!(fields, ResumeFields::default());
    }
}
