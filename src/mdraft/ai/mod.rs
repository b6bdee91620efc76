//! # AI Transform
//!
//! Turns a free-form user prompt plus the current selection into a markdown
//! mutation of the document. The generator backend is injected through the
//! [`TextGenerator`] capability so hosts and tests pick their own client;
//! [`gemini::GeminiClient`] is the production implementation.
//!
//! The response target is classified from the user's own prompt wording
//! before the generator is invoked, never from the response. See
//! [`wants_rewrite`].

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MdraftError, Result};
use crate::selection::SelectionBridge;

pub mod gemini;
pub mod prompts;

/// Opaque text generation capability: prompt in, markdown out, or failure.
/// No retries happen at this seam.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Where a generated response lands in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTarget {
    ReplaceSelection,
    Append,
}

static REWRITE_INTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)improve|rewrite|refactor|make |summarize|shorter|longer").unwrap()
});

/// Keyword heuristic over the raw user prompt. The trailing space in
/// `make ` is part of the pattern.
pub fn wants_rewrite(prompt: &str) -> bool {
    REWRITE_INTENT.is_match(prompt)
}

/// A rewrite-intent prompt aimed at an active selection replaces it;
/// everything else is appended.
pub fn classify(prompt: &str, selected_text: &str) -> ResponseTarget {
    if !selected_text.is_empty() && wants_rewrite(prompt) {
        ResponseTarget::ReplaceSelection
    } else {
        ResponseTarget::Append
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutcome {
    pub target: ResponseTarget,
    pub text: String,
}

/// Orchestrates one selection-scoped transform per call: capture selection,
/// build the contextual prompt, invoke the generator, apply the result.
pub struct AiAssistant<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> AiAssistant<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Run the transform protocol against the given surface.
    ///
    /// On failure the document is untouched; the caller keeps its dialog
    /// open and shows the error message.
    pub async fn execute<B: SelectionBridge>(
        &self,
        bridge: &mut B,
        prompt: &str,
    ) -> Result<TransformOutcome> {
        if prompt.trim().is_empty() {
            return Err(MdraftError::Validation(
                "Please enter a prompt.".to_string(),
            ));
        }

        let selected = bridge.selected_text();
        // Decided from the static input, before the generator responds
        let target = classify(prompt, &selected);

        let full_prompt = if selected.is_empty() {
            prompt.to_string()
        } else {
            prompts::contextual_prompt(prompt, &selected)
        };

        let text = self.generator.generate(&full_prompt).await?;
        let text = text.trim().to_string();

        match target {
            ResponseTarget::ReplaceSelection => bridge.replace_selection(&text),
            ResponseTarget::Append => bridge.append_to_document(&text),
        }

        Ok(TransformOutcome { target, text })
    }
}
