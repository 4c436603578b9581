mod analyze;
mod build_prompt;
mod canned;
mod config;
mod embed_query;
mod error;
mod generate;
mod http;
mod pipeline;
mod quick_topics;
mod retrieve_passages;
mod session;
mod vector_index;

pub use analyze::{AnalysisSource, SymptomAnalyzer, DESCRIPTION_INSTRUCTIONS, IMAGE_INSTRUCTIONS};
pub use build_prompt::{build_prompt, format_context, PromptEnvelope, CLOSING, INSTRUCTIONS};
pub use canned::{canned_reply, GREETING_PHRASES, GREETING_REPLY, POLITE_PHRASES, POLITE_REPLY};
pub use config::{Backend, Config};
pub use embed_query::{Embedder, OllamaEmbedder};
pub use error::{Error, Result};
pub use generate::{
    build_generator, BedrockClient, ContentPart, GatewayClient, Generator, ImageUrl, Message,
    MessageContent,
};
pub use pipeline::{record_question, record_reply, Answer, Pipeline, Reply};
pub use quick_topics::{QuickTopic, MEDICATION_KEYWORDS, NO_HISTORY_MEDICATIONS, WARNING_SIGNS};
pub use retrieve_passages::Retriever;
pub use session::{ChatRole, ChatTurn, ConversationHistory};
pub use vector_index::{
    IndexFile, RetrievedPassage, StoredPassage, VectorIndex, DOCSTORE_FILE, INDEX_FILE,
};
