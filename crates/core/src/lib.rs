pub mod assistant;
pub mod bm25;
pub mod collection;
pub mod error;
pub mod index;
pub mod ingest;
pub mod models;
pub mod normalizer;
pub mod outliers;
pub mod traits;

pub use assistant::{AssistantRankings, ReadingAssistant};
pub use bm25::{idf, rank, term_score, Bm25Params, DEFAULT_B, DEFAULT_K1};
pub use collection::Collection;
pub use error::{IndexError, IngestError, RankError};
pub use index::{InvertedIndex, LengthStats, PostingMap};
pub use ingest::{list_documents, read_document_text, source_id_for};
pub use models::{Granularity, RankedUnit, Ranking, RankingOptions, Sentences, Unit};
pub use normalizer::{belongs_to_source, paragraph_key, Normalizer};
pub use outliers::{filter_outliers, ScoreSummary, DEFAULT_SCOPE};
pub use traits::SimilarityProvider;
