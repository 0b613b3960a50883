use crate::bm25::Bm25Params;
use crate::error::RankError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Document,
    Paragraph,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Document => "document",
            Granularity::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Sentences = Vec<Vec<String>>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Unit {
    key: String,
    raw_text: String,
    sentences: Sentences,
    length: usize,
}

impl Unit {
    pub fn new(key: impl Into<String>, raw_text: impl Into<String>, sentences: Sentences) -> Self {
        let length = sentences.iter().map(Vec::len).sum();
        Self {
            key: key.into(),
            raw_text: raw_text.into(),
            sentences,
            length,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn sentences(&self) -> &Sentences {
        &self.sentences
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        self.sentences
            .iter()
            .flat_map(|sentence| sentence.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedUnit {
    pub unit_key: String,
    pub score: f64,
    pub raw_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ranking {
    pub query_key: String,
    pub raw_text: String,
    pub processed_text: Sentences,
    pub ranked: Vec<RankedUnit>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RankingOptions {
    pub k1: f64,
    pub b: f64,
    pub scope: f64,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            scope: 2.0,
        }
    }
}

impl RankingOptions {
    pub fn validate(&self) -> Result<(), RankError> {
        self.bm25_params()?;
        if !self.scope.is_finite() {
            return Err(RankError::InvalidParameter {
                name: "scope",
                value: self.scope,
                reason: "must be a finite number",
            });
        }
        Ok(())
    }

    pub fn bm25_params(&self) -> Result<Bm25Params, RankError> {
        Bm25Params::new(self.k1, self.b)
    }
}
