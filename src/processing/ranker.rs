//! Ranking aggregator: blends embedding similarity with skill overlap and
//! produces the ordered candidate table.

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::processing::embeddings::{cosine_similarity, Embedder};
use crate::processing::entities::{EntityExtractor, ENTITY_DATE, ENTITY_ORG};
use crate::processing::resume_fields::{FieldExtractor, ResumeFields};
use crate::processing::text_processor::{KeywordExtractor, TextNormalizer};
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// One job description per ranking run; immutable after construction.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub raw: String,
    pub text: String,
    pub keywords: HashSet<String>,
}

/// A resume as handed to the pipeline: its identifier plus either the
/// extracted text or the load failure message.
#[derive(Debug, Clone)]
pub struct ResumeInput {
    pub source: String,
    pub text: std::result::Result<String, String>,
}

impl ResumeInput {
    pub fn ok(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: Ok(text.into()),
        }
    }

    pub fn failed(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: Err(error.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub source: String,
    pub raw: String,
    /// Line-preserving normalization, input to the field heuristics.
    pub lines: String,
    /// Fully collapsed normalization, input to embeddings.
    pub text: String,
    pub load_error: Option<String>,
    pub fields: ResumeFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub candidate_name: String,
    pub source: String,
    pub similarity: f32,
    pub skill_overlap: f32,
    pub final_score: f32,
    pub matched_skills: Vec<String>,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orgs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<String>,
}

pub struct Ranker {
    normalizer: TextNormalizer,
    keyword_extractor: KeywordExtractor,
    field_extractor: FieldExtractor,
    entity_extractor: EntityExtractor,
    education_block_regex: Regex,
    similarity_weight: f32,
    skill_overlap_weight: f32,
    use_entities: bool,
}

impl Ranker {
    pub fn new(config: &Config, use_entities: bool) -> Result<Self> {
        let field_extractor = FieldExtractor::with_extra_skills(
            &config.extraction.extra_skills,
            config.extraction.max_education_entries,
            config.extraction.max_experience_entries,
        )?;

        Ok(Self {
            normalizer: TextNormalizer::new(),
            keyword_extractor: KeywordExtractor::new(config.extraction.fast_tokenizer_threshold),
            field_extractor,
            entity_extractor: EntityExtractor::new(),
            education_block_regex: Regex::new(
                r"(?is)education\s*[:\-]\s*(.+?)(?:\n\s*\n|\n(?:skills|experience|projects|certifications)\b|\z)",
            )
            .expect("Invalid education block regex"),
            similarity_weight: config.scoring.similarity_weight,
            skill_overlap_weight: config.scoring.skill_overlap_weight,
            use_entities,
        })
    }

    /// Normalize the JD and derive its keyword set.
    pub fn parse_jd(&self, raw: &str) -> JobDescription {
        let text = self.normalizer.normalize(raw);
        let keywords = self.keyword_extractor.extract(&text);
        JobDescription {
            raw: raw.to_string(),
            text,
            keywords,
        }
    }

    /// Normalize one resume and run the field heuristics. A failed load
    /// yields a document with default fields and the error recorded.
    pub fn parse_resume(&self, input: ResumeInput) -> ResumeDocument {
        match input.text {
            Ok(raw) => {
                let lines = self.normalizer.normalize_lines(&raw);
                let text = self.normalizer.normalize(&raw);
                let fields = self.field_extractor.extract(&lines);
                ResumeDocument {
                    source: input.source,
                    raw,
                    lines,
                    text,
                    load_error: None,
                    fields,
                }
            }
            Err(error) => ResumeDocument {
                source: input.source,
                raw: String::new(),
                lines: String::new(),
                text: String::new(),
                load_error: Some(error),
                fields: ResumeFields::default(),
            },
        }
    }

    /// Rank a batch of resumes against one job description. Returns the full
    /// ranked sequence, final score descending, ties in input order.
    pub fn rank<E: Embedder>(
        &self,
        embedder: &E,
        jd_text: &str,
        inputs: Vec<ResumeInput>,
    ) -> Result<Vec<ScoredCandidate>> {
        if jd_text.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(
                "Job description is empty".to_string(),
            ));
        }
        if inputs.is_empty() {
            return Err(ScreenerError::InvalidInput(
                "No resumes to rank".to_string(),
            ));
        }

        let jd = self.parse_jd(jd_text);
        debug!("JD keywords: {}", jd.keywords.len());

        let documents: Vec<ResumeDocument> =
            inputs.into_iter().map(|i| self.parse_resume(i)).collect();

        // Encode JD and all resumes in one batch. Unreadable resumes are
        // embedded as an error sentinel so they still get a defined score.
        let mut all_texts = Vec::with_capacity(documents.len() + 1);
        all_texts.push(jd.text.clone());
        for doc in &documents {
            match &doc.load_error {
                None => all_texts.push(doc.text.clone()),
                Some(e) => all_texts.push(format!("__ERROR__ {}", e)),
            }
        }

        let mut vectors = embedder.encode(&all_texts)?;
        if vectors.len() != documents.len() + 1 {
            return Err(ScreenerError::Embedding(format!(
                "Embedder returned {} vectors for {} texts",
                vectors.len(),
                all_texts.len()
            )));
        }
        let jd_vector = vectors.remove(0);

        let mut candidates = Vec::with_capacity(documents.len());
        for (doc, vector) in documents.iter().zip(vectors.iter()) {
            let similarity = cosine_similarity(&jd_vector, vector)?;
            candidates.push(self.score_document(&jd, doc, similarity));
        }

        // Stable sort keeps input order among equal scores.
        candidates.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        Ok(candidates)
    }

    /// Combine similarity and skill overlap into the final row.
    pub fn score_document(
        &self,
        jd: &JobDescription,
        doc: &ResumeDocument,
        similarity: f32,
    ) -> ScoredCandidate {
        let matched_skills: Vec<String> = doc
            .fields
            .skills
            .iter()
            .filter(|s| jd.keywords.contains(*s))
            .cloned()
            .collect();

        // Denominator floor prevents divide-by-zero on keyword-less JDs.
        let skill_overlap = matched_skills.len() as f32 / jd.keywords.len().max(1) as f32;
        let final_score =
            self.similarity_weight * similarity + self.skill_overlap_weight * skill_overlap;

        let education = self.filter_education(doc);

        let (orgs, dates) = if self.use_entities && doc.load_error.is_none() {
            let entities = self.entity_extractor.extract(&doc.lines);
            (
                entities.get(ENTITY_ORG).map(|v| Self::head(v, 5)).unwrap_or_default(),
                entities.get(ENTITY_DATE).map(|v| Self::head(v, 3)).unwrap_or_default(),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        ScoredCandidate {
            candidate_name: doc.fields.name.clone(),
            source: doc.source.clone(),
            similarity,
            skill_overlap: round3(skill_overlap),
            final_score: round3(final_score),
            matched_skills,
            education,
            experience: doc.fields.experience.clone(),
            orgs,
            dates,
        }
    }

    /// Drop education snippets that look like a person name or echo the
    /// candidate name; fall back to a regex search over the raw text if the
    /// filter empties the list.
    fn filter_education(&self, doc: &ResumeDocument) -> Vec<String> {
        let name_lower = doc.fields.name.trim().to_lowercase();

        let mut kept: Vec<String> = doc
            .fields
            .education
            .iter()
            .filter(|e| {
                let e = e.trim();
                !e.is_empty()
                    && e.to_lowercase() != name_lower
                    && !self.field_extractor.looks_like_name_loose(e)
            })
            .cloned()
            .collect();

        if kept.is_empty() {
            kept = self.education_block_fallback(&doc.raw);
        }
        kept
    }

    fn education_block_fallback(&self, raw: &str) -> Vec<String> {
        let Some(cap) = self.education_block_regex.captures(raw) else {
            return Vec::new();
        };

        cap[1]
            .lines()
            .map(str::trim)
            .filter(|ln| !ln.is_empty())
            .filter(|ln| !self.field_extractor.looks_like_name_loose(ln))
            .take(3)
            .map(|ln| {
                ln.split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .chars()
                    .take(160)
                    .collect()
            })
            .collect()
    }

    fn head(items: &[String], n: usize) -> Vec<String> {
        items.iter().take(n).cloned().collect()
    }
}

/// Round to 3 decimal places for display.
pub fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embeddings::Embedder;

    /// Deterministic bag-of-words embedder for tests: hashes tokens into a
    /// fixed number of buckets and normalizes.
    struct HashingEmbedder;

    impl Embedder for HashingEmbedder {
        fn encode(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| Self::embed(t)).collect())
        }
    }

    impl HashingEmbedder {
        fn embed(text: &str) -> Vec<f32> {
            let mut v = vec![0.0f32; 64];
            for token in text.to_lowercase().split_whitespace() {
                let token: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
                if token.is_empty() {
                    continue;
                }
                let mut h: u32 = 2166136261;
                for b in token.bytes() {
                    h ^= b as u32;
                    h = h.wrapping_mul(16777619);
                }
                v[(h % 64) as usize] += 1.0;
            }
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for x in &mut v {
                    *x /= norm;
                }
            }
            v
        }
    }

    fn ranker() -> Ranker {
        Ranker::new(&Config::default(), false).unwrap()
    }

    #[test]
    fn test_rejects_empty_jd() {
        let result = ranker().rank(&HashingEmbedder, "  ", vec![ResumeInput::ok("a.txt", "x")]);
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_empty_batch() {
        let result = ranker().rank(&HashingEmbedder, "Hiring a Python developer", vec![]);
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[test]
    fn test_end_to_end_ordering() {
        let jd = "Hiring a Python developer with SQL and machine learning experience.";
        let inputs = vec![
            ResumeInput::ok(
                "alice.txt",
                "Alice has 3 years of Python and ML experience. She knows TensorFlow and SQL.",
            ),
            ResumeInput::ok("bob.txt", "Bob is a graphic designer with Adobe skills."),
        ];

        let ranked = ranker().rank(&HashingEmbedder, jd, inputs).unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].source, "alice.txt");
        assert!(ranked[0].final_score > ranked[1].final_score);
        assert!(ranked[0].matched_skills.contains(&"python".to_string()));
        assert!(ranked[0].matched_skills.contains(&"sql".to_string()));
    }

    #[test]
    fn test_scores_within_bounds_and_sorted() {
        let jd = "Looking for python sql docker kubernetes engineers";
        let inputs = vec![
            ResumeInput::ok("a.txt", "python docker kubernetes sql expert with 4 years"),
            ResumeInput::ok("b.txt", "python beginner"),
            ResumeInput::ok("c.txt", "completely unrelated florist"),
        ];

        let ranked = ranker().rank(&HashingEmbedder, jd, inputs).unwrap();

        for row in &ranked {
            assert!((0.0..=1.0).contains(&row.skill_overlap));
            assert!((0.0..=1.0).contains(&row.final_score));
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
    }

    #[test]
    fn test_failed_load_still_produces_row() {
        let jd = "Hiring a Python developer";
        let inputs = vec![
            ResumeInput::ok("good.txt", "Python developer with 5 years experience"),
            ResumeInput::failed("broken.pdf", "unreadable content"),
        ];

        let ranked = ranker().rank(&HashingEmbedder, jd, inputs).unwrap();

        assert_eq!(ranked.len(), 2);
        let broken = ranked.iter().find(|c| c.source == "broken.pdf").unwrap();
        assert!(broken.similarity.is_finite());
        assert!(broken.matched_skills.is_empty());
        assert!(broken.education.is_empty());
        assert!(broken.experience.is_empty());
        assert_eq!(broken.candidate_name, "Unknown");
    }

    #[test]
    fn test_stable_ordering_for_ties() {
        let jd = "Hiring a Python developer";
        let text = "Python developer, 3 years";
        let inputs = vec![
            ResumeInput::ok("first.txt", text),
            ResumeInput::ok("second.txt", text),
            ResumeInput::ok("third.txt", text),
        ];

        let ranked = ranker().rank(&HashingEmbedder, jd, inputs).unwrap();
        let sources: Vec<&str> = ranked.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["first.txt", "second.txt", "third.txt"]);
    }

    #[test]
    fn test_education_filter_drops_candidate_name() {
        let r = ranker();
        let jd = r.parse_jd("Hiring engineers");
        let doc = ResumeDocument {
            source: "x.txt".to_string(),
            raw: String::new(),
            lines: String::new(),
            text: String::new(),
            load_error: None,
            fields: ResumeFields {
                name: "Jane Doe".to_string(),
                skills: Default::default(),
                education: vec![
                    "jane doe".to_string(),
                    "B.Tech in Computer Science, IIT Delhi".to_string(),
                ],
                experience: vec![],
            },
        };

        let row = r.score_document(&jd, &doc, 0.5);
        assert_eq!(row.education, vec!["B.Tech in Computer Science, IIT Delhi".to_string()]);
    }

    #[test]
    fn test_education_second_chance_from_raw_text() {
        let r = ranker();
        let jd = r.parse_jd("Hiring engineers");
        let doc = ResumeDocument {
            source: "x.txt".to_string(),
            raw: "Education: B.Sc in Physics from Oslo University\n\nSkills: none".to_string(),
            lines: String::new(),
            text: String::new(),
            load_error: None,
            fields: ResumeFields {
                name: "Jane Doe".to_string(),
                skills: Default::default(),
                // Only a name-shaped snippet, which the filter removes.
                education: vec!["Jane Doe".to_string()],
                experience: vec![],
            },
        };

        let row = r.score_document(&jd, &doc, 0.5);
        assert_eq!(row.education.len(), 1);
        assert!(row.education[0].contains("Oslo University"));
    }

    #[test]
    fn test_zero_keyword_jd_gets_zero_overlap() {
        let r = ranker();
        let jd = r.parse_jd("the and of");
        assert!(jd.keywords.is_empty());

        let doc = r.parse_resume(ResumeInput::ok("a.txt", "Python expert"));
        let row = r.score_document(&jd, &doc, 0.4);
        assert_eq!(row.skill_overlap, 0.0);
        assert_eq!(row.final_score, round3(0.7 * 0.4));
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.123_456), 0.123);
        assert_eq!(round3(0.999_9), 1.0);
    }
}
