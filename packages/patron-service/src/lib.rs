pub mod missions;
pub mod stores;

mod rerank;

use std::{future::Future, pin::Pin, sync::Arc};

pub use missions::MissionRecommendation;
pub use stores::StoreRecommendation;

use patron_config::{Config, EmbeddingProviderConfig};
use patron_providers::embedding;

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The one network-facing seam of the engine. Tests substitute this to
/// script or break the embedding stage.
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

#[derive(Debug)]
pub enum ServiceError {
	/// The user has no interest tags; recommendation is undefined without at
	/// least one.
	NoInterestTags { user_id: i64 },
	/// A mission references a store absent from the snapshot.
	StoreNotFound { store_id: i64, mission_id: i64 },
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

/// Stateless per-request recommendation pipeline over caller-supplied
/// snapshots.
pub struct RecommendService {
	pub cfg: Config,
	pub providers: Providers,
}

struct DefaultProviders;

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::NoInterestTags { user_id } => {
				write!(f, "User {user_id} has no interest tags to recommend from.")
			},
			Self::StoreNotFound { store_id, mission_id } => {
				write!(f, "Store {store_id} referenced by mission {mission_id} was not found.")
			},
		}
	}
}

impl std::error::Error for ServiceError {}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

impl RecommendService {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}
}
