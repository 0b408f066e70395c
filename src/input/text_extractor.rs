//! Text extraction from various file formats

use crate::error::{Result, ScreenerError};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await.map_err(ScreenerError::Io)?;

        let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            ScreenerError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(text)
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await.map_err(ScreenerError::Io)?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await.map_err(ScreenerError::Io)?;
        Ok(Self::flatten(&markdown_content))
    }
}

impl MarkdownExtractor {
    /// Walk the markdown event stream, keeping text and inline code and
    /// closing each block with a newline so headings and list items stay on
    /// their own lines for the field heuristics.
    fn flatten(markdown: &str) -> String {
        let mut text = String::new();
        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Heading(..))
                | Event::End(Tag::Paragraph)
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_flatten_keeps_line_structure() {
        let md = "# Jane Doe\n\nSkills: **Python**, `sql`\n\n- Docker\n- Kubernetes\n";
        let text = MarkdownExtractor::flatten(md);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Jane Doe");
        assert_eq!(lines[1], "Skills: Python, sql");
        assert_eq!(lines[2], "Docker");
        assert_eq!(lines[3], "Kubernetes");
    }
}
