//! Deterministic answer synthesis over retrieved chunks.
//!
//! No model calls and no randomness: the retrieved texts are cleaned by
//! an ordered pipeline of named pattern steps, split into sentences,
//! scored against the query, and composed through intent-specific
//! templates. Identical inputs always produce identical answers, which
//! keeps the whole component unit-testable without mocking anything.

use airguide_core::AppResult;
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

use crate::gate;
use crate::templates::Templates;
use crate::types::{Answer, QueryResult, SourceRef};

/// Number of key sentences extracted from the context.
const MAX_KEY_SENTENCES: usize = 3;

/// Minimum combined length of the key sentences for the context to count
/// as usable.
const MIN_CONTEXT_CHARS: usize = 40;

/// Score bonus for a sentence that mentions a domain term.
const DOMAIN_TERM_BONUS: usize = 2;

/// Maximum snippet length for source references.
const MAX_SNIPPET_LENGTH: usize = 150;

/// Query intent categories, classified by keyword heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    Definition,
    HowTo,
    Recommendation,
    General,
}

/// Intent cue table, checked in order; the first matching row wins.
const INTENT_RULES: &[(&[&str], QueryIntent)] = &[
    (
        &[
            "what is",
            "what are",
            "define",
            "definition of",
            "meaning of",
            "explain what",
        ],
        QueryIntent::Definition,
    ),
    (
        &[
            "how do", "how to", "how can", "how does", "install", "steps",
        ],
        QueryIntent::HowTo,
    ),
    (
        &[
            "which", "recommend", "best", "should i", "choose", "better",
        ],
        QueryIntent::Recommendation,
    ),
];

/// Classify a query into an intent category.
pub fn classify_intent(query: &str) -> QueryIntent {
    let query = query.to_lowercase();
    for (cues, intent) in INTENT_RULES {
        if cues.iter().any(|cue| query.contains(cue)) {
            return *intent;
        }
    }
    QueryIntent::General
}

/// One named step of the context cleanup pipeline.
pub struct CleanupStep {
    pub name: &'static str,
    pattern: Regex,
}

impl CleanupStep {
    fn new(name: &'static str, pattern: &str) -> AppResult<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            airguide_core::AppError::Config(format!("Invalid cleanup pattern '{}': {}", name, e))
        })?;
        Ok(Self { name, pattern })
    }

    /// Apply this step to a piece of text.
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, " ").into_owned()
    }
}

/// Build the ordered cleanup pipeline: structural noise first, dates
/// last, whitespace normalization handled separately after all steps.
pub fn cleanup_steps() -> AppResult<Vec<CleanupStep>> {
    Ok(vec![
        CleanupStep::new("page-markers", r"(?i)\bpage\s+\d+(\s+of\s+\d+)?\b")?,
        CleanupStep::new(
            "structure-refs",
            r"(?i)\b(figure|fig\.|table|chapter|section)\s+\d+(\.\d+)*\b",
        )?,
        CleanupStep::new("version-tags", r"(?i)\b(revision|rev\.|version|v)\s?\d+(\.\d+)*\b")?,
        CleanupStep::new(
            "dates",
            r"\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b",
        )?,
    ])
}

/// Collapse all runs of whitespace to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Composes answers from retrieved chunks and the query.
pub struct AnswerSynthesizer {
    cleanup: Vec<CleanupStep>,
    sentence_breaks: Regex,
    templates: Templates,
}

impl AnswerSynthesizer {
    /// Compile the cleanup pipeline and answer templates.
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            cleanup: cleanup_steps()?,
            sentence_breaks: Regex::new(r"[.!?]+").map_err(|e| {
                airguide_core::AppError::Config(format!("Invalid sentence pattern: {}", e))
            })?,
            templates: Templates::new()?,
        })
    }

    /// Synthesize an answer from retrieval results.
    ///
    /// Never fails: degraded inputs fall through to canned messages, and
    /// an unexpected template failure yields the generic domain fallback
    /// rather than propagating.
    pub fn synthesize(&self, results: &[QueryResult], query: &str) -> Answer {
        let sources = build_sources(results);

        let context = results
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let cleaned = self.clean(&context);
        let key_sentences = self.key_sentences(&cleaned, query);

        let body = if self.context_usable(&key_sentences) {
            let intent = classify_intent(query);
            self.templates
                .render(intent, &key_sentences)
                .unwrap_or_else(|e| {
                    warn!("Answer template failed: {}; using fallback", e);
                    domain_fallback()
                })
        } else if gate::is_in_domain(query) {
            domain_fallback()
        } else {
            out_of_scope()
        };

        Answer { body, sources }
    }

    /// Run the cleanup pipeline over the raw context.
    fn clean(&self, context: &str) -> String {
        let mut text = context.to_string();
        for step in &self.cleanup {
            text = step.apply(&text);
        }
        normalize_whitespace(&text)
    }

    /// Extract the top-scoring sentences, kept in text order.
    fn key_sentences(&self, cleaned: &str, query: &str) -> Vec<String> {
        let query_tokens = tokens(query);

        let sentences: Vec<&str> = self
            .sentence_breaks
            .split(cleaned)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        let mut scored: Vec<(usize, usize)> = sentences
            .iter()
            .enumerate()
            .map(|(i, sentence)| (i, score_sentence(sentence, &query_tokens)))
            .filter(|(_, score)| *score > 0)
            .collect();

        // Stable sort keeps earlier sentences first on ties.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(MAX_KEY_SENTENCES);
        scored.sort_by_key(|(i, _)| *i);

        scored
            .into_iter()
            .map(|(i, _)| sentences[i].to_string())
            .collect()
    }

    /// Whether the extracted sentences are enough to answer from.
    fn context_usable(&self, key_sentences: &[String]) -> bool {
        let total_len: usize = key_sentences.iter().map(|s| s.len()).sum();
        total_len >= MIN_CONTEXT_CHARS
            && key_sentences.iter().any(|s| gate::mentions_domain(s))
    }
}

fn tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(|w| w.to_string())
        .collect()
}

fn score_sentence(sentence: &str, query_tokens: &HashSet<String>) -> usize {
    let overlap = sentence
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .filter(|w| query_tokens.contains(*w))
        .count();

    let bonus = if gate::mentions_domain(sentence) {
        DOMAIN_TERM_BONUS
    } else {
        0
    };

    overlap + bonus
}

fn build_sources(results: &[QueryResult]) -> Vec<SourceRef> {
    results
        .iter()
        .filter(|r| !r.text.trim().is_empty())
        .map(|r| SourceRef {
            title: r.title.clone(),
            url: r.url.clone(),
            chunk_id: r.chunk_id,
            snippet: truncate_snippet(&r.text, MAX_SNIPPET_LENGTH),
        })
        .collect()
}

/// Build a preview snippet: newlines collapsed, truncated at a word
/// boundary, ellipsis-terminated.
fn truncate_snippet(text: &str, max_len: usize) -> String {
    let collapsed = normalize_whitespace(text);

    if collapsed.chars().count() <= max_len {
        return collapsed;
    }

    let truncated: String = collapsed.chars().take(max_len).collect();
    match truncated.rfind(char::is_whitespace) {
        Some(pos) => format!("{}...", &truncated[..pos]),
        None => format!("{}...", truncated),
    }
}

fn domain_fallback() -> String {
    "I could not find a passage in the indexed documents that answers this directly. \
     The corpus covers heat pump selection, ventilation, and heating and cooling system \
     design; try rephrasing with the specific equipment or measure in mind."
        .to_string()
}

fn out_of_scope() -> String {
    "This assistant answers questions about HVAC design: heat pumps, ventilation, and \
     heating and cooling systems. That question falls outside the indexed material, so \
     the document corpus cannot help with it."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(text: &str) -> QueryResult {
        QueryResult {
            text: text.to_string(),
            title: "Heat Pump Basics".to_string(),
            url: Some("https://example.com/hp.pdf".to_string()),
            chunk_id: 0,
            score: 0.9,
        }
    }

    #[test]
    fn test_intent_classification() {
        assert_eq!(classify_intent("what is a heat pump"), QueryIntent::Definition);
        assert_eq!(classify_intent("How do I install a thermostat"), QueryIntent::HowTo);
        assert_eq!(
            classify_intent("which refrigerant should I pick"),
            QueryIntent::Recommendation
        );
        assert_eq!(classify_intent("heat pump noise at night"), QueryIntent::General);
    }

    #[test]
    fn test_intent_priority_order() {
        // Definition cues outrank recommendation cues.
        assert_eq!(
            classify_intent("what is the best heat pump"),
            QueryIntent::Definition
        );
        // How-to cues outrank recommendation cues.
        assert_eq!(
            classify_intent("how to choose a compressor"),
            QueryIntent::HowTo
        );
    }

    #[test]
    fn test_cleanup_steps_individually() {
        let steps = cleanup_steps().unwrap();
        let by_name = |name: &str| steps.iter().find(|s| s.name == name).unwrap();

        let out = by_name("page-markers").apply("see Page 12 of 300 for details");
        assert!(!out.to_lowercase().contains("page 12"));

        let out = by_name("structure-refs").apply("as shown in Figure 4.2 above");
        assert!(!out.to_lowercase().contains("figure 4.2"));

        let out = by_name("version-tags").apply("manual revision 3 applies");
        assert!(!out.to_lowercase().contains("revision 3"));

        let out = by_name("dates").apply("updated 2023-05-01 and 3/14/21");
        assert!(!out.contains("2023-05-01"));
        assert!(!out.contains("3/14/21"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("a \n\n b\t c"), "a b c");
    }

    #[test]
    fn test_empty_results_in_domain_gives_fallback() {
        let synthesizer = AnswerSynthesizer::new().unwrap();
        let answer = synthesizer.synthesize(&[], "what is a heat pump");

        assert!(!answer.body.is_empty());
        assert!(answer.body.contains("could not find"));
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_empty_results_out_of_domain_gives_scope_message() {
        let synthesizer = AnswerSynthesizer::new().unwrap();
        let answer = synthesizer.synthesize(&[], "what is the capital of France");

        assert!(answer.body.contains("HVAC design"));
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_usable_context_composes_from_key_sentences() {
        let synthesizer = AnswerSynthesizer::new().unwrap();
        let results = vec![result(
            "A heat pump moves heat between indoors and outdoors. \
             Page 12 of 88. Its efficiency is rated by the seasonal SEER figure. \
             Compressors are discussed elsewhere.",
        )];

        let answer = synthesizer.synthesize(&results, "what is a heat pump");

        assert!(answer.body.contains("**What the references say**"));
        assert!(answer.body.contains("heat pump moves heat"));
        assert!(!answer.body.to_lowercase().contains("page 12"));
        assert_eq!(answer.sources.len(), 1);
        assert_eq!(answer.sources[0].title, "Heat Pump Basics");
    }

    #[test]
    fn test_irrelevant_context_falls_back() {
        let synthesizer = AnswerSynthesizer::new().unwrap();
        let results = vec![result("Totally unrelated prose about garden furniture styles.")];

        let answer = synthesizer.synthesize(&results, "what is a heat pump");

        assert!(answer.body.contains("could not find"));
        // Sources still cite the non-empty retrieved chunks.
        assert_eq!(answer.sources.len(), 1);
    }

    #[test]
    fn test_snippet_truncation() {
        let short = truncate_snippet("Short text", 100);
        assert_eq!(short, "Short text");

        let long_text = "word ".repeat(60);
        let snippet = truncate_snippet(&long_text, 50);
        assert!(snippet.len() <= 53);
        assert!(snippet.ends_with("..."));

        let multiline = truncate_snippet("line one\nline two", 100);
        assert_eq!(multiline, "line one line two");
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let synthesizer = AnswerSynthesizer::new().unwrap();
        let results = vec![result(
            "A heat pump moves heat between indoors and outdoors. \
             Sizing starts from the building heat load.",
        )];

        let a = synthesizer.synthesize(&results, "what is a heat pump");
        let b = synthesizer.synthesize(&results, "what is a heat pump");
        assert_eq!(a.body, b.body);
        assert_eq!(a.sources.len(), b.sources.len());
    }

    #[test]
    fn test_key_sentences_limited_to_three() {
        let synthesizer = AnswerSynthesizer::new().unwrap();
        let cleaned = "Heat pump one is rated. Heat pump two is sized. \
                       Heat pump three is installed. Heat pump four is serviced.";
        let key = synthesizer.key_sentences(cleaned, "heat pump rating");
        assert!(key.len() <= 3);
    }
}
