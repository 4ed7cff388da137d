pub mod chunker;
pub mod cleaner;
pub mod config;
pub mod detect;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod language;
pub mod metadata;
pub mod model;
pub mod pacing;
pub mod parse;
pub mod preprocess;
pub mod scoring;
pub mod selector;
pub mod strategy;
pub mod summarize;
pub mod translate;

pub use chunker::{Chunker, TextChunk};
pub use cleaner::{TextCleaner, clean_text};
pub use config::{VertoConfig, VertoConfigBuilder};
pub use detect::LanguageDetector;
pub use error::{Result, VertoError};
pub use fetch::{FetchConfig, Page};
pub use fetch::{fetch_file, fetch_stdin, fetch_url};
pub use formatters::{TextConfig, convert_to_text};
pub use language::LanguageTable;
pub use metadata::Metadata;
pub use model::{MockModel, ModelClient, OllamaClient};
pub use pacing::{Pacer, RetryPolicy};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use selector::{CandidateSummary, ContentExtractor, ExtractionResult, select_best};
pub use strategy::{Article, ExtractionCandidate, ExtractionStrategy, StrategyId, StrategyOutcome};
pub use summarize::Summarizer;
pub use translate::{TranslationJob, Translator};
