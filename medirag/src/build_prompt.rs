use crate::vector_index::RetrievedPassage;

/// Instructions sent ahead of every retrieval-augmented question.
pub const INSTRUCTIONS: &str = "Use the pieces of information provided in the context to answer the user's question.
If you don't know the answer, just say that you don't know — don't make it up.
Only use information from the provided context.";

pub const CLOSING: &str = "Start the answer directly. Be concise.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptEnvelope {
    pub context: String,
    pub question: String,
}

impl PromptEnvelope {
    pub fn render(&self) -> String {
        format!(
            "\n{}\n\nContext: {}\nQuestion: {}\n\n{}\n",
            INSTRUCTIONS, self.context, self.question, CLOSING
        )
    }
}

pub fn format_context(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(passages: &[RetrievedPassage], question: &str) -> PromptEnvelope {
    PromptEnvelope {
        context: format_context(passages),
        question: question.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str) -> RetrievedPassage {
        RetrievedPassage {
            text: text.to_string(),
            source: None,
            score: None,
        }
    }

    #[test]
    fn context_is_newline_joined() {
        let passages = [passage("Fever is a symptom."), passage("Rest helps.")];
        assert_eq!(format_context(&passages), "Fever is a symptom.\nRest helps.");
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn render_fills_both_slots() {
        let envelope = build_prompt(&[passage("Aspirin thins blood.")], "What does aspirin do?");
        let prompt = envelope.render();
        assert!(prompt.contains("Context: Aspirin thins blood.\n"));
        assert!(prompt.contains("Question: What does aspirin do?\n"));
        assert!(prompt.contains("just say that you don't know"));
        assert!(prompt.starts_with("\nUse the pieces of information"));
        assert!(prompt.ends_with("Be concise.\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = build_prompt(&[passage("x"), passage("y")], "why?");
        let b = build_prompt(&[passage("x"), passage("y")], "why?");
        assert_eq!(a, b);
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn passage_text_is_not_escaped() {
        let envelope = build_prompt(&[passage("{question} <b>raw</b>")], "q & {context}");
        let prompt = envelope.render();
        assert!(prompt.contains("Context: {question} <b>raw</b>\n"));
        assert!(prompt.contains("Question: q & {context}\n"));
    }
}
