use dapur_core::corpus::{Corpus, Recipe};
use dapur_core::error::IndexBuildError;
use dapur_core::model::VectorSpaceModel;

fn recipe(name: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        name: name.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        instructions: "cook it".to_string(),
    }
}

fn sample_corpus() -> Corpus {
    Corpus::new(vec![
        recipe("Fried Rice", &["rice", "egg", "soy sauce"]),
        recipe("Garlic Bread", &["bread", "garlic", "butter"]),
    ])
    .unwrap()
}

#[test]
fn fit_rejects_an_empty_corpus() {
    let corpus = Corpus::new(vec![]).unwrap();
    let err = VectorSpaceModel::fit(&corpus).unwrap_err();
    assert!(matches!(err, IndexBuildError::EmptyCorpus));
}

#[test]
fn fit_rejects_a_vocabulary_emptied_by_df_filtering() {
    // Identical contexts: every term appears in 100% of documents and the
    // maximum-document-frequency cutoff drops them all.
    let corpus = Corpus::new(vec![
        recipe("Salt Mix", &["salt"]),
        recipe("Salt Mix", &["salt"]),
    ])
    .unwrap();
    let err = VectorSpaceModel::fit(&corpus).unwrap_err();
    assert!(matches!(err, IndexBuildError::EmptyVocabulary));
}

#[test]
fn vocabulary_holds_unigrams_and_bigrams() {
    let model = VectorSpaceModel::fit(&sample_corpus()).unwrap();
    let vocab = model.vocabulary();
    assert!(vocab.contains_key("rice"));
    assert!(vocab.contains_key("garlic"));
    // Bigram over the normalized ingredient tokens of "soy sauce".
    assert!(vocab.contains_key("soy sauc"));
}

#[test]
fn overly_common_terms_are_dropped() {
    let corpus = Corpus::new(vec![
        recipe("Boiled Potatoes", &["potato", "salt"]),
        recipe("Roast Carrots", &["carrot", "salt"]),
    ])
    .unwrap();
    let model = VectorSpaceModel::fit(&corpus).unwrap();
    // "salt" appears in every context and carries no signal.
    assert!(!model.vocabulary().contains_key("salt"));
    assert!(model.vocabulary().contains_key("potato"));
}

#[test]
fn refitting_an_unchanged_corpus_is_deterministic() {
    let corpus = sample_corpus();
    let a = VectorSpaceModel::fit(&corpus).unwrap();
    let b = VectorSpaceModel::fit(&corpus).unwrap();

    assert_eq!(a.vocabulary(), b.vocabulary());
    assert_eq!(a.idf().len(), b.idf().len());
    for (x, y) in a.idf().iter().zip(b.idf()) {
        assert!((x - y).abs() < 1e-6);
    }
    for i in 0..corpus.len() {
        let va = a.recipe_vector(i).unwrap();
        let vb = b.recipe_vector(i).unwrap();
        assert_eq!(va.len(), vb.len());
        for (&(ta, wa), &(tb, wb)) in va.iter().zip(vb) {
            assert_eq!(ta, tb);
            assert!((wa - wb).abs() < 1e-6);
        }
    }
}

#[test]
fn recipe_vectors_are_unit_length() {
    let model = VectorSpaceModel::fit(&sample_corpus()).unwrap();
    for i in 0..model.num_recipes() {
        let norm: f32 = model
            .recipe_vector(i)
            .unwrap()
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f32>()
            .sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}

#[test]
fn self_similarity_is_maximal() {
    let corpus = sample_corpus();
    let model = VectorSpaceModel::fit(&corpus).unwrap();
    for (i, recipe) in corpus.recipes().iter().enumerate() {
        let query = model.transform(&VectorSpaceModel::recipe_context(recipe));
        let scores = model.score_all(&query);
        assert!((scores[i] - 1.0).abs() < 1e-4, "self-similarity was {}", scores[i]);
        for (j, &score) in scores.iter().enumerate() {
            assert!(scores[i] >= score - 1e-6, "recipe {j} outscored recipe {i}'s own context");
        }
    }
}

#[test]
fn out_of_vocabulary_query_scores_zero_everywhere() {
    let model = VectorSpaceModel::fit(&sample_corpus()).unwrap();
    let query = model.transform("zzz qqq unrelated words");
    for score in model.score_all(&query) {
        assert_eq!(score, 0.0);
    }
}
