use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::corpus::{Corpus, Recipe};
use crate::error::IndexBuildError;
use crate::normalize::normalize;

pub type TermId = u32;

/// Terms appearing in strictly more than this share of contexts are dropped
/// as uninformative.
const MAX_DOC_FREQ_RATIO: f32 = 0.95;
/// Tokens shorter than this are not indexed.
const MIN_TOKEN_CHARS: usize = 2;

/// A TF-IDF vector space fitted over recipe contexts. Immutable once fitted;
/// recipe vectors stay index-aligned with the corpus they were fitted from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSpaceModel {
    vocabulary: HashMap<String, TermId>,
    idf: Vec<f32>,
    recipe_vectors: Vec<Vec<(TermId, f32)>>,
}

impl VectorSpaceModel {
    /// The text the model indexes for one recipe: normalized name plus each
    /// ingredient normalized independently, space-joined.
    pub fn recipe_context(recipe: &Recipe) -> String {
        let ingredients_text = recipe
            .ingredients
            .iter()
            .map(|ingredient| normalize(ingredient))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", normalize(&recipe.name), ingredients_text)
    }

    /// Fit the vector space over all recipe contexts: unigrams and bigrams,
    /// sublinear term frequency, smoothed IDF, L2-normalized recipe vectors.
    ///
    /// Vocabulary ids are assigned in lexicographic term order, so refitting
    /// an unchanged corpus reproduces the identical model.
    pub fn fit(corpus: &Corpus) -> Result<Self, IndexBuildError> {
        if corpus.is_empty() {
            return Err(IndexBuildError::EmptyCorpus);
        }
        let num_docs = corpus.len();

        let mut doc_counts: Vec<HashMap<String, u32>> = Vec::with_capacity(num_docs);
        let mut df: BTreeMap<String, u32> = BTreeMap::new();
        for recipe in corpus.recipes() {
            let counts = ngram_counts(&Self::recipe_context(recipe));
            for term in counts.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
            doc_counts.push(counts);
        }

        let max_df = MAX_DOC_FREQ_RATIO * num_docs as f32;
        let mut vocabulary: HashMap<String, TermId> = HashMap::new();
        let mut idf: Vec<f32> = Vec::new();
        for (term, df_t) in &df {
            if *df_t as f32 > max_df {
                continue;
            }
            let id = idf.len() as TermId;
            idf.push(((1.0 + num_docs as f32) / (1.0 + *df_t as f32)).ln() + 1.0);
            vocabulary.insert(term.clone(), id);
        }
        if vocabulary.is_empty() {
            return Err(IndexBuildError::EmptyVocabulary);
        }

        let recipe_vectors = doc_counts
            .iter()
            .map(|counts| weigh(counts, &vocabulary, &idf))
            .collect();

        tracing::debug!(num_recipes = num_docs, vocab = vocabulary.len(), "fitted vector space");
        Ok(Self { vocabulary, idf, recipe_vectors })
    }

    /// Project arbitrary text into the fitted space with the same vocabulary
    /// and IDF weights. Out-of-vocabulary terms contribute nothing; the
    /// all-zero vector is legal and scores 0 against everything.
    pub fn transform(&self, text: &str) -> Vec<(TermId, f32)> {
        weigh(&ngram_counts(&normalize(text)), &self.vocabulary, &self.idf)
    }

    /// Cosine score of a projected query against every recipe vector,
    /// index-aligned with the corpus.
    pub fn score_all(&self, query: &[(TermId, f32)]) -> Vec<f32> {
        self.recipe_vectors.iter().map(|vector| dot(query, vector)).collect()
    }

    pub fn vocabulary(&self) -> &HashMap<String, TermId> { &self.vocabulary }

    pub fn idf(&self) -> &[f32] { &self.idf }

    pub fn recipe_vector(&self, index: usize) -> Option<&[(TermId, f32)]> {
        self.recipe_vectors.get(index).map(Vec::as_slice)
    }

    pub fn num_recipes(&self) -> usize { self.recipe_vectors.len() }

    pub fn vocabulary_len(&self) -> usize { self.vocabulary.len() }
}

/// Unigram and bigram counts over the whitespace tokens of normalized text.
fn ngram_counts(text: &str) -> HashMap<String, u32> {
    let tokens: Vec<&str> = text
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .collect();
    let mut counts = HashMap::new();
    for token in &tokens {
        *counts.entry((*token).to_string()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Sublinear-tf × idf weights for one bag of terms, sorted by term id and
/// L2-normalized. Terms outside the vocabulary are skipped.
fn weigh(
    counts: &HashMap<String, u32>,
    vocabulary: &HashMap<String, TermId>,
    idf: &[f32],
) -> Vec<(TermId, f32)> {
    let mut vector: Vec<(TermId, f32)> = counts
        .iter()
        .filter_map(|(term, tf_raw)| {
            let &id = vocabulary.get(term)?;
            let tf = 1.0 + (*tf_raw as f32).ln();
            Some((id, tf * idf[id as usize]))
        })
        .collect();
    vector.sort_by_key(|&(id, _)| id);
    let norm: f32 = vector.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in vector.iter_mut() {
            *w /= norm;
        }
    }
    vector
}

/// Dot product of two sorted sparse vectors; cosine similarity here, since
/// both sides are L2-normalized.
fn dot(a: &[(TermId, f32)], b: &[(TermId, f32)]) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut acc = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                acc += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    acc
}
