//! Formatters for the ranked candidate table

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::ranker::ScoredCandidate;
use colored::Colorize;
use std::io::Write;
use std::path::Path;

/// Console formatter with optional color and per-candidate detail.
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    pub fn format(&self, candidates: &[ScoredCandidate], top_k: usize) -> String {
        let mut out = String::new();
        let shown = candidates.len().min(top_k);

        out.push_str(&format!(
            "Ranked {} candidate(s), showing top {}\n\n",
            candidates.len(),
            shown
        ));

        for (i, candidate) in candidates.iter().take(top_k).enumerate() {
            let rank = format!("{:>2}.", i + 1);
            let score = format!("{:.3}", candidate.final_score);
            let score = if self.use_colors {
                self.colorize_score(candidate.final_score, &score)
            } else {
                score
            };

            out.push_str(&format!(
                "{} {}  {}  (similarity {:.3}, skill overlap {:.3})\n",
                rank, score, candidate.candidate_name, candidate.similarity, candidate.skill_overlap
            ));
            out.push_str(&format!("    source: {}\n", candidate.source));

            if !candidate.matched_skills.is_empty() {
                out.push_str(&format!(
                    "    matched skills: {}\n",
                    candidate.matched_skills.join(", ")
                ));
            }

            if self.detailed {
                if !candidate.education.is_empty() {
                    out.push_str(&format!("    education: {}\n", candidate.education.join("; ")));
                }
                if !candidate.experience.is_empty() {
                    out.push_str(&format!(
                        "    experience: {}\n",
                        candidate.experience.join(", ")
                    ));
                }
                if !candidate.orgs.is_empty() {
                    out.push_str(&format!("    organizations: {}\n", candidate.orgs.join(", ")));
                }
                if !candidate.dates.is_empty() {
                    out.push_str(&format!("    dates: {}\n", candidate.dates.join(", ")));
                }
            }
            out.push('\n');
        }

        out
    }

    fn colorize_score(&self, score: f32, text: &str) -> String {
        if score >= 0.7 {
            text.green().bold().to_string()
        } else if score >= 0.4 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }
}

/// CSV formatter. Column order is fixed:
/// candidate_name, similarity, skill_overlap, final_score, matched_skills,
/// education, experience. List cells are joined with ", ".
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn write<W: Write>(&self, candidates: &[ScoredCandidate], writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

        csv_writer.write_record([
            "candidate_name",
            "similarity",
            "skill_overlap",
            "final_score",
            "matched_skills",
            "education",
            "experience",
        ])?;

        for candidate in candidates {
            let record = [
                candidate.candidate_name.clone(),
                format!("{:.6}", candidate.similarity),
                format!("{:.3}", candidate.skill_overlap),
                format!("{:.3}", candidate.final_score),
                candidate.matched_skills.join(", "),
                candidate.education.join(", "),
                candidate.experience.join(", "),
            ];
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, candidates: &[ScoredCandidate], path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write(candidates, file)
    }

    pub fn format(&self, candidates: &[ScoredCandidate]) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(candidates, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            crate::error::ScreenerError::OutputFormatting(format!("CSV is not valid UTF-8: {}", e))
        })
    }
}

/// JSON formatter for the full ranking.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn format(&self, candidates: &[ScoredCandidate]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(candidates)?
        } else {
            serde_json::to_string(candidates)?
        };
        Ok(json)
    }
}

/// Render the full ranking in the requested format; console output is
/// truncated to `top_k`, file formats always carry every row.
pub fn render(
    candidates: &[ScoredCandidate],
    format: &OutputFormat,
    top_k: usize,
    use_colors: bool,
    detailed: bool,
) -> Result<String> {
    match format {
        OutputFormat::Console => {
            Ok(ConsoleFormatter::new(use_colors, detailed).format(candidates, top_k))
        }
        OutputFormat::Csv => CsvFormatter.format(candidates),
        OutputFormat::Json => JsonFormatter::new(true).format(candidates),
    }
}
