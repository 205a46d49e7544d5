use std::collections::HashMap;

use patron_domain::{
	scoring::{self, CANDIDATE_WINDOW},
	snapshot::{StoreSnapshot, UserSnapshot},
	text,
};

use crate::{RecommendService, ServiceError, ServiceResult, rerank};

/// One recommended store, in final presentation order.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct StoreRecommendation {
	pub id: i64,
	pub name: String,
	pub main_image_url: String,
	pub hashtags: Vec<String>,
}

impl RecommendService {
	/// Recommends up to five stores for `user`, best first.
	///
	/// Deterministic selection runs first: tag overlap, then the user's
	/// mission participation at the store, then store id, all descending,
	/// with two backfill passes for under-filled windows. The surviving
	/// window is reranked by embedding similarity when the gateway
	/// cooperates and returned in selection order when it does not.
	pub async fn recommend_stores(
		&self,
		user: &UserSnapshot,
		stores: &[StoreSnapshot],
	) -> ServiceResult<Vec<StoreRecommendation>> {
		if user.tags.is_empty() {
			return Err(ServiceError::NoInterestTags { user_id: user.user_id });
		}

		let scored = scoring::score_candidates(
			&user.tags,
			stores.iter().map(|store| {
				let engagement = user.store_engagements.get(&store.id).copied().unwrap_or(0);

				(store.id, &store.tags, engagement)
			}),
		);
		let window = scoring::select_window(&scored, CANDIDATE_WINDOW);

		if window.is_empty() {
			return Ok(Vec::new());
		}

		let by_id: HashMap<i64, &StoreSnapshot> =
			stores.iter().map(|store| (store.id, store)).collect();
		let candidates: Vec<&StoreSnapshot> =
			window.iter().filter_map(|id| by_id.get(id).copied()).collect();
		let user_text = text::user_text(&user.tags);
		let texts: Vec<String> = candidates
			.iter()
			.map(|store| text::store_text(&store.description, &store.tags))
			.collect();
		let order = rerank::semantic_order(
			&self.providers,
			&self.cfg.providers.embedding,
			&user_text,
			&texts,
		)
		.await;

		Ok(order
			.into_iter()
			.filter_map(|index| candidates.get(index))
			.map(|store| StoreRecommendation {
				id: store.id,
				name: store.name.clone(),
				main_image_url: store.main_image_url.clone(),
				hashtags: store.tags.display_tags().to_vec(),
			})
			.collect())
	}
}
