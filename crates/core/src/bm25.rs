use crate::error::RankError;
use crate::index::InvertedIndex;
use crate::models::{RankedUnit, Unit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_K1: f64 = 1.2;
pub const DEFAULT_B: f64 = 0.75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bm25Params {
    k1: f64,
    b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
        }
    }
}

impl Bm25Params {
    pub fn new(k1: f64, b: f64) -> Result<Self, RankError> {
        if !k1.is_finite() || k1 < 0.0 {
            return Err(RankError::InvalidParameter {
                name: "k1",
                value: k1,
                reason: "must be a finite, non-negative number",
            });
        }
        if !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(RankError::InvalidParameter {
                name: "b",
                value: b,
                reason: "must lie within [0, 1]",
            });
        }
        Ok(Self { k1, b })
    }

    pub fn k1(&self) -> f64 {
        self.k1
    }

    pub fn b(&self) -> f64 {
        self.b
    }
}

/// `max(0, ln((N - df + 0.5) / (df + 0.5) + 1))`
pub fn idf(unit_count: usize, document_frequency: usize) -> f64 {
    let n = unit_count as f64;
    let df = document_frequency as f64;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln().max(0.0)
}

pub fn term_score(idf: f64, tf: u32, length: usize, average_length: f64, params: Bm25Params) -> f64 {
    if tf == 0 {
        return 0.0;
    }
    let tf = f64::from(tf);
    let relative_length = if average_length > 0.0 {
        length as f64 / average_length
    } else {
        1.0
    };
    let saturation = params.k1 * (1.0 - params.b + params.b * relative_length);
    idf * (tf * (params.k1 + 1.0)) / (tf + saturation)
}

pub fn rank<'a, I>(query: &Unit, units: I, index: &InvertedIndex, params: Bm25Params) -> Vec<RankedUnit>
where
    I: IntoIterator<Item = &'a Unit>,
{
    if index.unit_count() == 0 {
        return Vec::new();
    }

    let unit_count = index.unit_count();
    let average_length = index.average_unit_length();

    let mut idf_cache: HashMap<&str, f64> = HashMap::new();
    let query_terms: Vec<(&str, f64)> = query
        .tokens()
        .map(|token| {
            let weight = *idf_cache
                .entry(token)
                .or_insert_with(|| idf(unit_count, index.document_frequency(token)));
            (token, weight)
        })
        .collect();

    let mut ranked: Vec<RankedUnit> = units
        .into_iter()
        .map(|unit| {
            let score = query_terms
                .iter()
                .map(|(token, weight)| {
                    term_score(
                        *weight,
                        index.term_frequency(token, unit.key()),
                        unit.length(),
                        average_length,
                        params,
                    )
                })
                .sum();

            RankedUnit {
                unit_key: unit.key().to_string(),
                score,
                raw_text: unit.raw_text().to_string(),
            }
        })
        .collect();

    ranked.sort_by(|left, right| right.score.total_cmp(&left.score));
    ranked
}
