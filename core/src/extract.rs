use lazy_static::lazy_static;
use regex::Regex;

use crate::corpus::Corpus;
use crate::normalize::normalize;

lazy_static! {
    /// Separators between ingredient mentions: list punctuation or the
    /// English/Indonesian connectives.
    static ref SEPARATORS: Regex = Regex::new(r"[,;.]|and|dan").expect("valid regex");
}

/// Lead-in phrases that precede ingredient lists in free text, removed
/// verbatim before segmentation. English plus the Indonesian equivalents.
const FILLER_PHRASES: &[&str] = &[
    "i have",
    "we have",
    "got",
    "using",
    "with",
    "use",
    "ingredients:",
    "ingredients are",
    "ingredients include",
    "saya punya",
    "aku punya",
    "bahan:",
    "bahan-bahan:",
];

/// A corpus ingredient with its normalized form precomputed for matching.
#[derive(Debug, Clone)]
pub struct KnownIngredient {
    pub surface: String,
    pub normalized: String,
}

impl KnownIngredient {
    pub fn new(surface: impl Into<String>) -> Self {
        let surface = surface.into();
        let normalized = normalize(&surface);
        Self { surface, normalized }
    }

    /// Index the corpus's ingredient union (sorted, de-duplicated) for matching.
    pub fn index(corpus: &Corpus) -> Vec<KnownIngredient> {
        corpus.known_ingredients().into_iter().map(Self::new).collect()
    }
}

/// Strategy for resolving a candidate phrase against the known-ingredient
/// vocabulary. A seam: the shipped heuristic can be swapped for a stricter
/// matcher without touching the recommender.
pub trait IngredientMatcher: Send + Sync {
    /// The known ingredient the candidate refers to, if any.
    fn resolve<'a>(&self, candidate: &str, known: &'a [KnownIngredient]) -> Option<&'a KnownIngredient>;
}

/// Substring double-containment over normalized forms: a candidate matches a
/// known ingredient when either contains the other, first match over the
/// sorted known list wins. Deliberately loose ("egg" matches "eggplant").
pub struct SubstringMatcher;

impl IngredientMatcher for SubstringMatcher {
    fn resolve<'a>(&self, candidate: &str, known: &'a [KnownIngredient]) -> Option<&'a KnownIngredient> {
        let candidate = normalize(candidate);
        if candidate.is_empty() {
            return None;
        }
        known
            .iter()
            .find(|k| candidate.contains(&k.normalized) || k.normalized.contains(&candidate))
    }
}

/// Split a query into candidate ingredient phrases: strip filler lead-ins,
/// split on separators, trim, drop fragments of one character or less.
/// Candidates come back in order of appearance.
pub fn segment_phrases(query: &str) -> Vec<String> {
    let mut text = query.to_lowercase();
    for phrase in FILLER_PHRASES {
        text = text.replace(phrase, "");
    }
    SEPARATORS
        .split(&text)
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() > 1)
        .map(String::from)
        .collect()
}

/// Extract the known ingredients a query mentions, in order of appearance.
/// Unrecognized candidates are silently dropped; the empty list means the
/// query's phrasing could not be resolved against the corpus vocabulary.
pub fn extract_ingredients(
    query: &str,
    known: &[KnownIngredient],
    matcher: &dyn IngredientMatcher,
) -> Vec<String> {
    segment_phrases(query)
        .iter()
        .filter_map(|candidate| matcher.resolve(candidate, known))
        .map(|k| k.surface.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_on_separators_and_connectives() {
        assert_eq!(
            segment_phrases("chicken, rice; garlic and onion"),
            vec!["chicken", "rice", "garlic", "onion"]
        );
    }

    #[test]
    fn strips_filler_lead_ins() {
        assert_eq!(segment_phrases("i have chicken"), vec!["chicken"]);
        assert_eq!(segment_phrases("saya punya telur dan nasi"), vec!["telur", "nasi"]);
    }

    #[test]
    fn drops_short_fragments() {
        assert_eq!(segment_phrases("a, rice"), vec!["rice"]);
        assert!(segment_phrases(", .").is_empty());
    }
}
