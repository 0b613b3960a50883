use crate::error::RankError;
use crate::models::{Granularity, Ranking};
use std::path::Path;

pub trait SimilarityProvider {
    fn name(&self) -> &str;

    fn rank_file(&self, query_path: &Path, granularity: Granularity) -> Result<Vec<Ranking>, RankError>;
}
