use anyhow::Result;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::corpus::Corpus;
use crate::model::VectorSpaceModel;

/// On-disk artifact layout version; bump when the format changes.
const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_recipes: u32,
    pub corpus_fingerprint: String,
    pub created_at: String,
    pub version: u32,
}

pub struct ModelPaths {
    pub root: PathBuf,
}

impl ModelPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn model(&self) -> PathBuf { self.root.join("model.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_model(paths: &ModelPaths, model: &VectorSpaceModel) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.model())?;
    let bytes = bincode::serialize(model)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_model(paths: &ModelPaths) -> Result<VectorSpaceModel> {
    let mut f = File::open(paths.model())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let model = bincode::deserialize(&buf)?;
    Ok(model)
}

pub fn save_meta(paths: &ModelPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &ModelPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Build-or-load of the fitted model as one guarded operation: concurrent
/// callers observing a missing artifact serialize on the build lock instead
/// of racing independent rebuilds and artifact writes.
pub struct ModelStore {
    paths: ModelPaths,
    build_lock: Mutex<()>,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { paths: ModelPaths::new(root), build_lock: Mutex::new(()) }
    }

    pub fn paths(&self) -> &ModelPaths { &self.paths }

    /// Load the cached model when its fingerprint matches the corpus,
    /// otherwise fit and persist a fresh one. The artifact is disposable:
    /// any load failure falls through to a rebuild.
    pub fn load_or_build(&self, corpus: &Corpus) -> Result<VectorSpaceModel> {
        let _guard = self.build_lock.lock();
        let fingerprint = corpus.fingerprint();
        match load_meta(&self.paths) {
            Ok(meta) if meta.corpus_fingerprint == fingerprint && meta.version == ARTIFACT_VERSION => {
                match load_model(&self.paths) {
                    Ok(model) => {
                        tracing::info!(root = %self.paths.root.display(), "loaded cached model");
                        return Ok(model);
                    }
                    Err(err) => tracing::warn!(%err, "cached model unreadable, refitting"),
                }
            }
            Ok(_) => tracing::info!("corpus changed since last fit, refitting"),
            Err(_) => tracing::info!("no cached model, fitting"),
        }
        self.fit_and_persist(corpus, fingerprint)
    }

    /// Fit and persist unconditionally, ignoring any cached artifact.
    pub fn rebuild(&self, corpus: &Corpus) -> Result<VectorSpaceModel> {
        let _guard = self.build_lock.lock();
        let fingerprint = corpus.fingerprint();
        self.fit_and_persist(corpus, fingerprint)
    }

    fn fit_and_persist(&self, corpus: &Corpus, fingerprint: String) -> Result<VectorSpaceModel> {
        let model = VectorSpaceModel::fit(corpus)?;
        save_model(&self.paths, &model)?;
        let meta = MetaFile {
            num_recipes: corpus.len() as u32,
            corpus_fingerprint: fingerprint,
            created_at: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_else(|_| "".into()),
            version: ARTIFACT_VERSION,
        };
        save_meta(&self.paths, &meta)?;
        tracing::info!(root = %self.paths.root.display(), vocab = model.vocabulary_len(), "model fitted and persisted");
        Ok(model)
    }
}
