//! Seams for the external collaborators.

mod corpus_loader;
mod encoder;
mod summarizer;

pub use corpus_loader::ICorpusLoader;
pub use encoder::IEncoder;
pub use summarizer::ISummarizer;
