use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::CorpusLoadError;

/// One recipe of the corpus. Immutable after load; identity is the recipe's
/// position in the corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// On-disk dataset shape: a top-level `recipes` array. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct RecipeFile {
    recipes: Vec<Recipe>,
}

/// The fixed collection of recipes the system recommends from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    recipes: Vec<Recipe>,
}

impl Corpus {
    pub fn new(recipes: Vec<Recipe>) -> Result<Self, CorpusLoadError> {
        for (index, recipe) in recipes.iter().enumerate() {
            if recipe.ingredients.is_empty() {
                return Err(CorpusLoadError::NoIngredients {
                    index,
                    name: recipe.name.clone(),
                });
            }
        }
        Ok(Self { recipes })
    }

    /// Load the recipe dataset from a JSON file keyed under `recipes`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CorpusLoadError> {
        let f = File::open(path.as_ref())?;
        let file: RecipeFile = serde_json::from_reader(BufReader::new(f))?;
        Self::new(file.recipes)
    }

    pub fn recipes(&self) -> &[Recipe] { &self.recipes }

    pub fn get(&self, index: usize) -> Option<&Recipe> { self.recipes.get(index) }

    pub fn len(&self) -> usize { self.recipes.len() }

    pub fn is_empty(&self) -> bool { self.recipes.is_empty() }

    /// Union of every ingredient string across the corpus, lexicographically
    /// sorted and de-duplicated.
    pub fn known_ingredients(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self
            .recipes
            .iter()
            .flat_map(|recipe| recipe.ingredients.iter().map(String::as_str))
            .collect();
        unique.into_iter().map(String::from).collect()
    }

    /// SHA-256 over the canonical serialization. Keys the persisted model
    /// artifact by corpus identity.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(&self.recipes).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }
}
