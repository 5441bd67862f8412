pub mod corpus;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod recommend;
pub mod service;

pub use corpus::{Corpus, Recipe};
pub use error::{CorpusLoadError, IndexBuildError};
pub use model::{TermId, VectorSpaceModel};
pub use recommend::{Recommendation, RecommendResult, RecommenderConfig};
pub use service::RecommendationService;
