use std::collections::HashMap;

use patron_domain::{
	scoring::{self, CANDIDATE_WINDOW},
	snapshot::{MissionSnapshot, StoreSnapshot, UserSnapshot},
	text,
};

use crate::{RecommendService, ServiceError, ServiceResult, rerank};

/// The single mission picked for the user, or nothing when no mission
/// exists to recommend.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct MissionRecommendation {
	pub mission_id: i64,
	pub title: String,
	pub reward: String,
	pub store_name: String,
}

impl RecommendService {
	/// Recommends one mission for `user`.
	///
	/// Missions score on their owning store's tags (overlap), then their own
	/// global completion count, then mission id, all descending. A window of
	/// up to five is still ranked semantically; only its head is returned.
	pub async fn recommend_mission(
		&self,
		user: &UserSnapshot,
		missions: &[MissionSnapshot],
		stores: &[StoreSnapshot],
	) -> ServiceResult<Option<MissionRecommendation>> {
		if user.tags.is_empty() {
			return Err(ServiceError::NoInterestTags { user_id: user.user_id });
		}
		if missions.is_empty() {
			return Ok(None);
		}

		let stores_by_id: HashMap<i64, &StoreSnapshot> =
			stores.iter().map(|store| (store.id, store)).collect();
		let mut pairs = Vec::with_capacity(missions.len());

		for mission in missions {
			let store = stores_by_id.get(&mission.store_id).copied().ok_or(
				ServiceError::StoreNotFound { store_id: mission.store_id, mission_id: mission.id },
			)?;

			pairs.push((mission, store));
		}

		let scored = scoring::score_candidates(
			&user.tags,
			pairs
				.iter()
				.map(|(mission, store)| (mission.id, &store.tags, mission.completion_count)),
		);
		let window = scoring::select_window(&scored, CANDIDATE_WINDOW);
		let by_id: HashMap<i64, (&MissionSnapshot, &StoreSnapshot)> =
			pairs.iter().map(|(mission, store)| (mission.id, (*mission, *store))).collect();
		let candidates: Vec<(&MissionSnapshot, &StoreSnapshot)> =
			window.iter().filter_map(|id| by_id.get(id).copied()).collect();

		if candidates.is_empty() {
			return Ok(None);
		}

		let user_text = text::user_text(&user.tags);
		let texts: Vec<String> = candidates
			.iter()
			.map(|(mission, store)| {
				text::mission_text(&mission.title, &mission.description, &store.tags)
			})
			.collect();
		let order = rerank::semantic_order(
			&self.providers,
			&self.cfg.providers.embedding,
			&user_text,
			&texts,
		)
		.await;
		let Some((mission, store)) =
			order.first().and_then(|&index| candidates.get(index).copied())
		else {
			return Ok(None);
		};

		Ok(Some(MissionRecommendation {
			mission_id: mission.id,
			title: mission.title.clone(),
			reward: mission.reward.clone(),
			store_name: store.name.clone(),
		}))
	}
}
