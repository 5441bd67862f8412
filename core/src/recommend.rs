use serde::Serialize;

use crate::corpus::Recipe;

/// Result-count and relevance-threshold knobs for the recommender.
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// Results returned when the caller does not override the count.
    pub top_k: usize,
    /// Results scoring at or below this are dropped even inside the top k.
    pub min_score: f32,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self { top_k: 5, min_score: 0.05 }
    }
}

/// One ranked result. The extracted-ingredient list is echoed identically
/// into every recommendation of a response.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub recipe: Recipe,
    pub score: f32,
    pub extracted_ingredients: Vec<String>,
}

/// Everything one recommendation request produces. An empty recommendation
/// list is the valid representation of "no matches", not an error.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResult {
    pub recommendations: Vec<Recommendation>,
    pub extracted_ingredients: Vec<String>,
}
