use std::cmp::Ordering;
use std::path::Path;

use anyhow::Result;

use crate::corpus::Corpus;
use crate::extract::{extract_ingredients, IngredientMatcher, KnownIngredient, SubstringMatcher};
use crate::model::VectorSpaceModel;
use crate::normalize::normalize;
use crate::persist::ModelStore;
use crate::recommend::{Recommendation, RecommendResult, RecommenderConfig};

/// The recommendation engine: a corpus and its fitted vector space, built
/// once and shared read-only across requests. No locking on the read path;
/// every field is immutable after construction.
pub struct RecommendationService {
    corpus: Corpus,
    model: VectorSpaceModel,
    known: Vec<KnownIngredient>,
    matcher: Box<dyn IngredientMatcher>,
    config: RecommenderConfig,
}

impl RecommendationService {
    pub fn new(corpus: Corpus, model: VectorSpaceModel, config: RecommenderConfig) -> Self {
        let known = KnownIngredient::index(&corpus);
        Self {
            corpus,
            model,
            known,
            matcher: Box::new(SubstringMatcher),
            config,
        }
    }

    /// Swap the ingredient-resolution strategy.
    pub fn with_matcher(mut self, matcher: Box<dyn IngredientMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Build the service from a dataset path and a model cache directory,
    /// fitting the vector space only when no matching artifact exists.
    pub fn open_or_build(
        corpus_path: impl AsRef<Path>,
        model_dir: impl AsRef<Path>,
        config: RecommenderConfig,
    ) -> Result<Self> {
        let corpus = Corpus::load(corpus_path)?;
        let store = ModelStore::new(model_dir);
        let model = store.load_or_build(&corpus)?;
        Ok(Self::new(corpus, model, config))
    }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn model(&self) -> &VectorSpaceModel { &self.model }

    pub fn config(&self) -> &RecommenderConfig { &self.config }

    /// The sorted known-ingredient listing, for auto-complete use.
    pub fn known_ingredients(&self) -> impl Iterator<Item = &str> {
        self.known.iter().map(|k| k.surface.as_str())
    }

    /// Rank recipes for one free-text query. `k` overrides the configured
    /// result count when present. Never fails: an unparseable or unmatched
    /// query degrades to an empty result list.
    pub fn recommend(&self, query: &str, k: Option<usize>) -> RecommendResult {
        let k = k.unwrap_or(self.config.top_k);
        let extracted = extract_ingredients(query, &self.known, self.matcher.as_ref());

        // Fall back to the raw query when nothing was recognized; the input
        // may already be a well-formed ingredient list, or a style of text
        // the segmentation heuristics cannot parse.
        let scoring_text = if extracted.is_empty() {
            normalize(query)
        } else {
            extracted
                .iter()
                .map(|ingredient| normalize(ingredient))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let query_vector = self.model.transform(&scoring_text);
        let mut scored: Vec<(usize, f32)> = self
            .model
            .score_all(&query_vector)
            .into_iter()
            .enumerate()
            .collect();
        // Descending by score; equal scores keep corpus order.
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let recommendations = scored
            .into_iter()
            .filter(|&(_, score)| score > self.config.min_score)
            .take(k)
            .filter_map(|(index, score)| {
                let recipe = self.corpus.get(index)?;
                Some(Recommendation {
                    recipe: recipe.clone(),
                    score,
                    extracted_ingredients: extracted.clone(),
                })
            })
            .collect();

        RecommendResult {
            recommendations,
            extracted_ingredients: extracted,
        }
    }
}
