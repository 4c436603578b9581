use tracing::{debug, info};

use crate::build_prompt::build_prompt;
use crate::canned::canned_reply;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::generate::{build_generator, Generator};
use crate::retrieve_passages::Retriever;
use crate::session::ConversationHistory;
use crate::vector_index::RetrievedPassage;

#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    pub passages: Vec<RetrievedPassage>,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Canned(&'static str),
    Generated(Answer),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Canned(text) => *text,
            Reply::Generated(answer) => answer.text.as_str(),
        }
    }

    pub fn passages(&self) -> &[RetrievedPassage] {
        match self {
            Reply::Canned(_) => &[],
            Reply::Generated(answer) => answer.passages.as_slice(),
        }
    }
}

/// Retrieval-augmented answering: retrieve, assemble the prompt, generate.
pub struct Pipeline {
    retriever: Retriever,
    generator: Box<dyn Generator>,
}

impl Pipeline {
    pub fn new(retriever: Retriever, generator: Box<dyn Generator>) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let generator = build_generator(cfg)?;
        info!(backend = generator.name(), index = %cfg.index_dir.display(), "pipeline ready");
        Ok(Self::new(Retriever::from_config(cfg), generator))
    }

    pub fn answer(&self, question: &str) -> Result<Answer> {
        if question.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }
        let passages = self.retriever.retrieve(question)?;
        let prompt = build_prompt(&passages, question).render();
        debug!(passages = passages.len(), backend = self.generator.name(), "generating answer");
        let text = self.generator.generate(&prompt)?;
        Ok(Answer { passages, text })
    }

    /// Canned replies short-circuit before any retrieval or generation.
    pub fn reply(&self, input: &str) -> Result<Reply> {
        if input.trim().is_empty() {
            return Err(Error::EmptyQuestion);
        }
        if let Some(text) = canned_reply(input) {
            debug!("canned reply");
            return Ok(Reply::Canned(text));
        }
        self.answer(input).map(Reply::Generated)
    }

    /// Records the user turn, then the assistant turn only if a reply was produced.
    pub fn respond(&self, history: &mut ConversationHistory, input: &str) -> Result<Reply> {
        record_question(history, input)?;
        let reply = self.reply(input)?;
        record_reply(history, &reply);
        Ok(reply)
    }
}

/// Opens a turn. Blank input is rejected and leaves the history untouched.
pub fn record_question(history: &mut ConversationHistory, input: &str) -> Result<()> {
    if input.trim().is_empty() {
        return Err(Error::EmptyQuestion);
    }
    history.push_user(input);
    Ok(())
}

/// Closes a turn. Failed turns never reach this, so they keep only the user entry.
pub fn record_reply(history: &mut ConversationHistory, reply: &Reply) {
    history.push_assistant(reply.text());
}
