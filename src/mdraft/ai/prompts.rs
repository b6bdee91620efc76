//! Prompt templates for the generator. Pure string builders, no I/O.

/// Wraps a user prompt with the active selection as editing context. The
/// selection informs the response; the generator is told not to restate it.
pub fn contextual_prompt(prompt: &str, selected: &str) -> String {
    format!(
        "You are assisting with editing markdown content. The user prompt: \"{prompt}\". \
Selected markdown to inform your response (do not just repeat it):\n\n{selected}\n\n\
Return only markdown content."
    )
}

pub fn improve_prompt(text: &str, instruction: &str) -> String {
    format!(
        "Please {instruction} the following text while maintaining its markdown formatting:\n\n\
{text}\n\n\
Return only the improved text without any additional explanation."
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicLength {
    Short,
    #[default]
    Medium,
    Long,
}

pub fn topic_prompt(topic: &str, length: TopicLength) -> String {
    let length_instruction = match length {
        TopicLength::Short => "Write a brief paragraph (2-3 sentences)",
        TopicLength::Medium => "Write a comprehensive section (3-5 paragraphs)",
        TopicLength::Long => "Write a detailed article (6+ paragraphs with subheadings)",
    };
    format!(
        "{length_instruction} about \"{topic}\". Use proper markdown formatting including \
headers, lists, and emphasis where appropriate. Make it informative and well-structured."
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContinueDirection {
    #[default]
    Forward,
    Expand,
}

pub fn continue_prompt(existing: &str, direction: ContinueDirection) -> String {
    let instruction = match direction {
        ContinueDirection::Forward => {
            "Continue writing from where this text ends, maintaining the same style and tone:"
        }
        ContinueDirection::Expand => {
            "Expand on the ideas in this text with more detail and examples:"
        }
    };
    format!(
        "{instruction}\n\n{existing}\n\n\
Return only the new content to be added, using proper markdown formatting."
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryLength {
    #[default]
    Brief,
    Detailed,
}

pub fn summarize_prompt(text: &str, length: SummaryLength) -> String {
    let instruction = match length {
        SummaryLength::Brief => "Create a brief summary (1-2 sentences)",
        SummaryLength::Detailed => "Create a detailed summary with key points",
    };
    format!(
        "{instruction} of the following text:\n\n{text}\n\n\
Use markdown formatting for the summary."
    )
}

pub fn rewrite_prompt(text: &str, tone: &str) -> String {
    format!(
        "Rewrite the following text in a {tone} tone while maintaining its core meaning and \
markdown formatting:\n\n{text}\n\n\
Return only the rewritten text."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contextual_prompt_embeds_prompt_and_selection() {
        let full = contextual_prompt("summarize", "# Notes");
        assert!(full.contains("The user prompt: \"summarize\""));
        assert!(full.contains("# Notes"));
        assert!(full.ends_with("Return only markdown content."));
    }

    #[test]
    fn topic_prompt_varies_by_length() {
        let short = topic_prompt("rust", TopicLength::Short);
        let long = topic_prompt("rust", TopicLength::Long);
        assert!(short.contains("brief paragraph"));
        assert!(long.contains("detailed article"));
        assert!(short.contains("\"rust\""));
    }

    #[test]
    fn continue_prompt_asks_for_new_content_only() {
        let full = continue_prompt("existing text", ContinueDirection::Expand);
        assert!(full.starts_with("Expand on the ideas"));
        assert!(full.contains("existing text"));
        assert!(full.contains("Return only the new content"));
    }

    #[test]
    fn rewrite_prompt_carries_the_tone() {
        let full = rewrite_prompt("body", "formal");
        assert!(full.contains("in a formal tone"));
    }
}
