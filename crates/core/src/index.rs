use crate::error::IndexError;
use crate::models::Unit;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct PostingMap {
    postings: HashMap<String, HashMap<String, u32>>,
}

impl PostingMap {
    pub fn get_or_zero(&self, token: &str, unit_key: &str) -> u32 {
        self.postings
            .get(token)
            .and_then(|units| units.get(unit_key))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    pub fn document_frequency(&self, token: &str) -> usize {
        self.postings.get(token).map_or(0, HashMap::len)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.len()
    }

    fn contains_key_for(&self, token: &str, unit_key: &str) -> bool {
        self.get_or_zero(token, unit_key) > 0
    }

    fn increment(&mut self, token: &str, unit_key: &str) {
        *self
            .postings
            .entry(token.to_string())
            .or_default()
            .entry(unit_key.to_string())
            .or_insert(0) += 1;
    }

    fn remove_entry(&mut self, token: &str, unit_key: &str) {
        if let Some(units) = self.postings.get_mut(token) {
            units.remove(unit_key);
            if units.is_empty() {
                self.postings.remove(token);
            }
        }
    }
}

/// Unit count and summed unit length. The average is derived from the exact
/// integer total, so an add followed by the matching remove restores the
/// previous average bit for bit.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LengthStats {
    unit_count: usize,
    total_length: u64,
}

impl LengthStats {
    pub fn add(&mut self, length: usize) {
        self.unit_count += 1;
        self.total_length += length as u64;
    }

    pub fn remove(&mut self, length: usize) -> bool {
        let length = length as u64;
        if self.unit_count == 0 || self.total_length < length {
            return false;
        }
        self.unit_count -= 1;
        self.total_length -= length;
        if self.unit_count == 0 {
            debug_assert_eq!(self.total_length, 0);
            self.total_length = 0;
        }
        true
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    pub fn average(&self) -> f64 {
        if self.unit_count == 0 {
            return 0.0;
        }
        self.total_length as f64 / self.unit_count as f64
    }
}

#[derive(Debug, Clone)]
struct IndexedUnit {
    length: usize,
    terms: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    postings: PostingMap,
    units: HashMap<String, IndexedUnit>,
    stats: LengthStats,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, unit: &Unit) -> Result<(), IndexError> {
        if self.units.contains_key(unit.key()) {
            return Err(IndexError::DuplicateUnit(unit.key().to_string()));
        }

        let mut terms: Vec<String> = Vec::new();
        for token in unit.tokens() {
            if !self.postings.contains_key_for(token, unit.key()) {
                terms.push(token.to_string());
            }
            self.postings.increment(token, unit.key());
        }

        self.stats.add(unit.length());
        self.units.insert(
            unit.key().to_string(),
            IndexedUnit {
                length: unit.length(),
                terms,
            },
        );

        debug!(
            unit = unit.key(),
            length = unit.length(),
            unit_count = self.stats.unit_count(),
            "unit added to inverted index"
        );
        Ok(())
    }

    pub fn remove(&mut self, unit: &Unit) -> Result<(), IndexError> {
        self.remove_key(unit.key())
    }

    pub fn remove_key(&mut self, unit_key: &str) -> Result<(), IndexError> {
        let indexed = self
            .units
            .remove(unit_key)
            .ok_or_else(|| IndexError::UnknownUnit(unit_key.to_string()))?;

        for term in &indexed.terms {
            self.postings.remove_entry(term, unit_key);
        }

        let reversed = self.stats.remove(indexed.length);
        debug_assert!(reversed, "length stats out of sync for {unit_key}");

        debug!(
            unit = unit_key,
            unit_count = self.stats.unit_count(),
            "unit removed from inverted index"
        );
        Ok(())
    }

    pub fn contains_unit(&self, unit_key: &str) -> bool {
        self.units.contains_key(unit_key)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.postings.contains(token)
    }

    pub fn term_frequency(&self, token: &str, unit_key: &str) -> u32 {
        self.postings.get_or_zero(token, unit_key)
    }

    pub fn document_frequency(&self, token: &str) -> usize {
        self.postings.document_frequency(token)
    }

    pub fn unit_count(&self) -> usize {
        self.stats.unit_count()
    }

    pub fn average_unit_length(&self) -> f64 {
        self.stats.average()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.postings.vocabulary_size()
    }
}
