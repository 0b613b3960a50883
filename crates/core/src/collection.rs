use crate::bm25::{self, Bm25Params};
use crate::error::{IndexError, IngestError};
use crate::ingest::{read_document_text, source_id_for};
use crate::index::InvertedIndex;
use crate::models::{Granularity, Ranking, Unit};
use crate::normalizer::{belongs_to_source, Normalizer};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Collection {
    granularity: Granularity,
    normalizer: Normalizer,
    units: Vec<Unit>,
    index: InvertedIndex,
}

impl Collection {
    pub fn new(granularity: Granularity) -> Result<Self, IngestError> {
        Ok(Self {
            granularity,
            normalizer: Normalizer::new()?,
            units: Vec::new(),
            index: InvertedIndex::new(),
        })
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, unit_key: &str) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.key() == unit_key)
    }

    pub fn ingest(&mut self, source_id: &str, raw_text: &str) -> Result<Vec<String>, IndexError> {
        let units = self.normalizer.units(source_id, raw_text, self.granularity);

        if let Some(existing) = units.iter().find(|unit| self.index.contains_unit(unit.key())) {
            return Err(IndexError::DuplicateUnit(existing.key().to_string()));
        }

        let mut keys = Vec::with_capacity(units.len());
        for unit in units {
            self.index.add(&unit)?;
            keys.push(unit.key().to_string());
            self.units.push(unit);
        }

        debug!(
            source = source_id,
            granularity = %self.granularity,
            unit_count = keys.len(),
            "source ingested"
        );
        Ok(keys)
    }

    pub fn ingest_file(&mut self, path: &Path) -> Result<Vec<String>, IngestError> {
        let source_id = source_id_for(path)?;
        let text = read_document_text(path)?;
        Ok(self.ingest(&source_id, &text)?)
    }

    /// Removes the units ingested from `source_id`: the document unit itself,
    /// or every `{source_id}_pgN` paragraph unit.
    pub fn forget(&mut self, source_id: &str) -> Result<Vec<Unit>, IndexError> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.units.len());

        for unit in std::mem::take(&mut self.units) {
            if self.is_from_source(unit.key(), source_id) {
                removed.push(unit);
            } else {
                kept.push(unit);
            }
        }
        self.units = kept;

        if removed.is_empty() {
            return Err(IndexError::UnknownUnit(source_id.to_string()));
        }

        for unit in &removed {
            self.index.remove(unit)?;
        }

        debug!(
            source = source_id,
            granularity = %self.granularity,
            removed = removed.len(),
            remaining = self.index.unit_count(),
            "source forgotten"
        );
        Ok(removed)
    }

    fn is_from_source(&self, unit_key: &str, source_id: &str) -> bool {
        match self.granularity {
            Granularity::Document => unit_key == source_id,
            Granularity::Paragraph => belongs_to_source(unit_key, source_id),
        }
    }

    pub fn rank(&self, query_id: &str, raw_text: &str, params: Bm25Params) -> Vec<Ranking> {
        self.normalizer
            .units(query_id, raw_text, self.granularity)
            .into_iter()
            .map(|query| self.rank_unit(&query, params))
            .collect()
    }

    pub fn rank_unit(&self, query: &Unit, params: Bm25Params) -> Ranking {
        Ranking {
            query_key: query.key().to_string(),
            raw_text: query.raw_text().to_string(),
            processed_text: query.sentences().clone(),
            ranked: bm25::rank(query, &self.units, &self.index, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn ingest_indexes_each_paragraph() -> Result<(), Box<dyn std::error::Error>> {
        let mut collection = Collection::new(Granularity::Paragraph)?;
        let keys = collection.ingest("cats.txt", "Cats purr softly.\n\nDogs bark loudly.")?;

        assert_eq!(keys, ["cats.txt_pg0", "cats.txt_pg1"]);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.index().unit_count(), 2);
        assert_eq!(collection.index().term_frequency("purr", "cats.txt_pg0"), 1);
        Ok(())
    }

    #[test]
    fn forget_removes_document_and_paragraphs() -> Result<(), Box<dyn std::error::Error>> {
        let mut collection = Collection::new(Granularity::Paragraph)?;
        collection.ingest("a.txt", "First line here.\nSecond line here.")?;
        collection.ingest("a.txt.bak", "Backup line here.")?;

        let removed = collection.forget("a.txt")?;
        assert_eq!(removed.len(), 2);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.index().unit_count(), 1);
        assert_eq!(collection.index().document_frequency("first"), 0);
        assert!(collection.get("a.txt.bak_pg0").is_some());
        Ok(())
    }

    #[test]
    fn forget_at_document_level_matches_exact_key() -> Result<(), Box<dyn std::error::Error>> {
        let mut collection = Collection::new(Granularity::Document)?;
        collection.ingest("a.txt", "First file here.")?;
        collection.ingest("a.txt_pg1", "Second file here.")?;

        let removed = collection.forget("a.txt")?;
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].key(), "a.txt");
        assert!(collection.get("a.txt_pg1").is_some());
        assert_eq!(collection.index().unit_count(), 1);

        collection.forget("a.txt_pg1")?;
        assert!(collection.is_empty());
        Ok(())
    }

    #[test]
    fn forgetting_unknown_source_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let mut collection = Collection::new(Granularity::Document)?;
        collection.ingest("a.txt", "Some words here.")?;
        assert_eq!(
            collection.forget("b.txt"),
            Err(IndexError::UnknownUnit("b.txt".to_string()))
        );
        assert_eq!(collection.len(), 1);
        Ok(())
    }

    #[test]
    fn duplicate_ingest_leaves_collection_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let mut collection = Collection::new(Granularity::Document)?;
        collection.ingest("a.txt", "Some words here.")?;
        assert!(matches!(
            collection.ingest("a.txt", "Other words here."),
            Err(IndexError::DuplicateUnit(_))
        ));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.index().term_frequency("other", "a.txt"), 0);
        Ok(())
    }

    #[test]
    fn rank_returns_one_ranking_per_query_paragraph() -> Result<(), Box<dyn std::error::Error>> {
        let mut collection = Collection::new(Granularity::Paragraph)?;
        collection.ingest("pets.txt", "The cat sat on the mat.\nThe dog ran in the park.")?;

        let rankings = collection.rank(
            "new.txt",
            "A cat sat quietly.\nA dog ran quickly.",
            Bm25Params::default(),
        );

        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0].query_key, "new.txt_pg0");
        assert_eq!(rankings[0].ranked[0].unit_key, "pets.txt_pg0");
        assert_eq!(rankings[1].ranked[0].unit_key, "pets.txt_pg1");
        assert_eq!(rankings[1].raw_text, "A dog ran quickly.");
        Ok(())
    }

    #[test]
    fn ranking_an_empty_collection_is_empty() -> Result<(), Box<dyn std::error::Error>> {
        let collection = Collection::new(Granularity::Document)?;
        let rankings = collection.rank("new.txt", "Anything at all.", Bm25Params::default());
        assert_eq!(rankings.len(), 1);
        assert!(rankings[0].ranked.is_empty());
        Ok(())
    }

    #[test]
    fn ingest_file_uses_file_name_as_key() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("essay.txt");
        fs::write(&path, b"Reading is fun.\n")?;

        let mut collection = Collection::new(Granularity::Document)?;
        let keys = collection.ingest_file(&path)?;
        assert_eq!(keys, ["essay.txt"]);
        assert_eq!(collection.get("essay.txt").map(Unit::length), Some(3));
        Ok(())
    }
}
