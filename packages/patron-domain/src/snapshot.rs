use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tags::TagSet;

/// Read-only view of the requesting user, materialized by the caller.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserSnapshot {
	pub user_id: i64,
	pub tags: TagSet,
	/// Completed missions grouped by owning store: store id to count.
	pub store_engagements: HashMap<i64, u64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StoreSnapshot {
	pub id: i64,
	pub name: String,
	pub description: String,
	pub main_image_url: String,
	pub tags: TagSet,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MissionSnapshot {
	pub id: i64,
	pub store_id: i64,
	pub title: String,
	pub description: String,
	pub reward: String,
	/// How often this mission has been completed across all users.
	pub completion_count: u64,
}
