//! Intent-specific answer templates.
//!
//! Deterministic Handlebars templates that interleave the extracted key
//! sentences with fixed explanatory prose. Rendering is pure: the same
//! sentences and intent always produce the same body.

use airguide_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde_json::json;

use crate::synthesize::QueryIntent;

const DEFINITION_TEMPLATE: &str = "\
**What the references say**

{{#each points}}
• {{this}}
{{/each}}

These statements come directly from the indexed design documents; the cited sources carry the surrounding context.";

const HOW_TO_TEMPLATE: &str = "\
**Suggested approach**

{{#each steps}}
{{n}}. {{text}}
{{/each}}

Work through these against the equipment manufacturer's documentation; model-specific procedures take precedence.";

const RECOMMENDATION_TEMPLATE: &str = "\
**Selection guidance**

{{#each points}}
• {{this}}
{{/each}}

Confirm the final choice against the project's heat load calculation and local code requirements.";

const GENERAL_TEMPLATE: &str = "\
The indexed references offer the following on this topic: {{body}}

For a fuller treatment, open the cited source documents.";

/// Registry of the four intent templates.
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Compile and register all templates.
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // The body is lightweight markup, not HTML; nothing to escape.
        registry.register_escape_fn(handlebars::no_escape);

        for (name, template) in [
            ("definition", DEFINITION_TEMPLATE),
            ("how_to", HOW_TO_TEMPLATE),
            ("recommendation", RECOMMENDATION_TEMPLATE),
            ("general", GENERAL_TEMPLATE),
        ] {
            registry
                .register_template_string(name, template)
                .map_err(|e| {
                    AppError::Config(format!("Invalid answer template '{}': {}", name, e))
                })?;
        }

        Ok(Self { registry })
    }

    /// Render the template for an intent over the key sentences.
    ///
    /// Each sentence arrives without its terminator; the period is
    /// restored here.
    pub fn render(&self, intent: QueryIntent, sentences: &[String]) -> AppResult<String> {
        let points: Vec<String> = sentences.iter().map(|s| format!("{}.", s)).collect();

        let (name, data) = match intent {
            QueryIntent::Definition => ("definition", json!({ "points": points })),
            QueryIntent::HowTo => (
                "how_to",
                json!({
                    "steps": points
                        .iter()
                        .enumerate()
                        .map(|(i, text)| json!({ "n": i + 1, "text": text }))
                        .collect::<Vec<_>>()
                }),
            ),
            QueryIntent::Recommendation => ("recommendation", json!({ "points": points })),
            QueryIntent::General => ("general", json!({ "body": points.join(" ") })),
        };

        self.registry
            .render(name, &data)
            .map_err(|e| AppError::Other(format!("Template render failed: {}", e)))
    }
}
