//! Optional heuristic entity extraction (organizations, dates)
//!
//! Advisory only: a text with no recognizable entities yields an empty map,
//! and nothing here can fail the batch.

use regex::Regex;
use std::collections::HashMap;

pub const ENTITY_ORG: &str = "ORG";
pub const ENTITY_DATE: &str = "DATE";

pub struct EntityExtractor {
    org_regex: Regex,
    year_regex: Regex,
    year_range_regex: Regex,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    pub fn new() -> Self {
        // Capitalized spans ending in a company/institution marker word.
        let org_regex = Regex::new(
            r"\b((?:[A-Z][A-Za-z&.\-]+\s+){0,4}(?:University|College|Institute|Inc|Ltd|LLC|Corp|Corporation|Technologies|Labs|Systems|Solutions))\b",
        )
        .expect("Invalid org regex");
        let year_regex = Regex::new(r"\b(19|20)\d{2}\b").expect("Invalid year regex");
        let year_range_regex =
            Regex::new(r"\b((?:19|20)\d{2})\s*[-\u{2013}]\s*((?:19|20)\d{2}|present)\b")
                .expect("Invalid year range regex");

        Self {
            org_regex,
            year_regex,
            year_range_regex,
        }
    }

    /// Map from entity kind to the spans found, deduplicated in first-seen
    /// order. Kinds with no hits are omitted.
    pub fn extract(&self, text: &str) -> HashMap<String, Vec<String>> {
        let mut entities: HashMap<String, Vec<String>> = HashMap::new();

        let orgs = self.collect_unique(self.org_regex.find_iter(text).map(|m| m.as_str()));
        if !orgs.is_empty() {
            entities.insert(ENTITY_ORG.to_string(), orgs);
        }

        let mut dates: Vec<String> = Vec::new();
        for cap in self.year_range_regex.captures_iter(text) {
            let span = cap[0].split_whitespace().collect::<Vec<_>>().join(" ");
            if !dates.contains(&span) {
                dates.push(span);
            }
        }
        for m in self.year_regex.find_iter(text) {
            let year = m.as_str().to_string();
            if !dates.iter().any(|d| d.contains(&year)) {
                dates.push(year);
            }
        }
        if !dates.is_empty() {
            entities.insert(ENTITY_DATE.to_string(), dates);
        }

        entities
    }

    fn collect_unique<'a>(&self, items: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for item in items {
            let item = item.trim().to_string();
            if !out.contains(&item) {
                out.push(item);
            }
        }
        out
    }
}
