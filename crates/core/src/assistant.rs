use crate::bm25::Bm25Params;
use crate::collection::Collection;
use crate::error::{IndexError, IngestError, RankError};
use crate::ingest::{list_documents, read_document_text, source_id_for};
use crate::models::{Granularity, Ranking, Unit};
use crate::traits::SimilarityProvider;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct ReadingAssistant {
    read_folder: PathBuf,
    params: Bm25Params,
    documents: Collection,
    paragraphs: Collection,
}

#[derive(Debug, Clone)]
pub struct AssistantRankings {
    pub document: Vec<Ranking>,
    pub paragraph: Vec<Ranking>,
}

impl ReadingAssistant {
    pub fn new(read_folder: impl Into<PathBuf>, params: Bm25Params) -> Result<Self, IngestError> {
        Ok(Self {
            read_folder: read_folder.into(),
            params,
            documents: Collection::new(Granularity::Document)?,
            paragraphs: Collection::new(Granularity::Paragraph)?,
        })
    }

    pub fn open(read_folder: impl Into<PathBuf>, params: Bm25Params) -> Result<Self, IngestError> {
        let mut assistant = Self::new(read_folder, params)?;
        assistant.load_folder()?;
        Ok(assistant)
    }

    pub fn read_folder(&self) -> &Path {
        &self.read_folder
    }

    pub fn params(&self) -> Bm25Params {
        self.params
    }

    pub fn load_folder(&mut self) -> Result<usize, IngestError> {
        let files = list_documents(&self.read_folder)?;
        for path in &files {
            self.add_file(path)?;
        }

        info!(
            folder = %self.read_folder.display(),
            documents = self.documents.len(),
            paragraphs = self.paragraphs.len(),
            "read folder loaded"
        );
        Ok(files.len())
    }

    pub fn add_file(&mut self, path: &Path) -> Result<(), IngestError> {
        let source_id = source_id_for(path)?;
        let text = read_document_text(path)?;
        self.add_text(&source_id, &text)
    }

    pub fn add_text(&mut self, source_id: &str, raw_text: &str) -> Result<(), IngestError> {
        self.documents.ingest(source_id, raw_text)?;
        if let Err(error) = self.paragraphs.ingest(source_id, raw_text) {
            if let Err(rollback) = self.documents.forget(source_id) {
                warn!(source = source_id, error = %rollback, "document rollback failed");
            }
            return Err(error.into());
        }
        Ok(())
    }

    pub fn forget(&mut self, source_id: &str) -> Result<(), IndexError> {
        self.documents.forget(source_id)?;
        match self.paragraphs.forget(source_id) {
            Ok(_) | Err(IndexError::UnknownUnit(_)) => Ok(()),
            Err(error) => Err(error),
        }
    }

    pub fn collection(&self, granularity: Granularity) -> &Collection {
        match granularity {
            Granularity::Document => &self.documents,
            Granularity::Paragraph => &self.paragraphs,
        }
    }

    pub fn view(&self, granularity: Granularity, unit_key: &str) -> Option<&Unit> {
        self.collection(granularity).get(unit_key)
    }

    pub fn rank_text(&self, query_id: &str, raw_text: &str) -> AssistantRankings {
        AssistantRankings {
            document: self.documents.rank(query_id, raw_text, self.params),
            paragraph: self.paragraphs.rank(query_id, raw_text, self.params),
        }
    }

    pub fn rank_path(&self, query_path: &Path) -> Result<AssistantRankings, IngestError> {
        let query_id = source_id_for(query_path)?;
        let text = read_document_text(query_path)?;
        Ok(self.rank_text(&query_id, &text))
    }
}

impl SimilarityProvider for ReadingAssistant {
    fn name(&self) -> &str {
        "BM25"
    }

    fn rank_file(&self, query_path: &Path, granularity: Granularity) -> Result<Vec<Ranking>, RankError> {
        let query_id = source_id_for(query_path)?;
        let text = read_document_text(query_path)?;
        Ok(self
            .collection(granularity)
            .rank(&query_id, &text, self.params))
    }
}
