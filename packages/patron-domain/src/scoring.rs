use std::collections::HashSet;

use crate::tags::TagSet;

/// Number of candidates handed to the semantic stage.
pub const CANDIDATE_WINDOW: usize = 5;

/// Deterministic per-candidate signals, computed once per request.
///
/// `tag_overlap` is the canonical intersection count between the user's tags
/// and the candidate's; `engagement` is the variant-specific secondary
/// signal (the user's mission participation at the candidate store, or the
/// mission's global completion count).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScoredCandidate {
	pub id: i64,
	pub tag_overlap: usize,
	pub engagement: u64,
}

/// Scores every candidate against the user's tag set. Pure; a candidate
/// without tags scores an overlap of zero.
pub fn score_candidates<'a, I>(user_tags: &TagSet, candidates: I) -> Vec<ScoredCandidate>
where
	I: IntoIterator<Item = (i64, &'a TagSet, u64)>,
{
	candidates
		.into_iter()
		.map(|(id, tags, engagement)| ScoredCandidate {
			id,
			tag_overlap: user_tags.overlap(tags),
			engagement,
		})
		.collect()
}

/// Picks up to `window` candidate ids in the deterministic pre-semantic
/// order. Three passes, each one only running while slots remain:
///
/// 1. tag matches, sorted by overlap desc, engagement desc, id desc;
/// 2. unmatched candidates with engagement, sorted by engagement desc,
///    id desc;
/// 3. whatever is left, by id desc.
pub fn select_window(scored: &[ScoredCandidate], window: usize) -> Vec<i64> {
	let mut picked = Vec::with_capacity(window.min(scored.len()));
	let mut taken = HashSet::new();
	let mut matched: Vec<&ScoredCandidate> =
		scored.iter().filter(|candidate| candidate.tag_overlap > 0).collect();

	matched.sort_by(|a, b| {
		b.tag_overlap
			.cmp(&a.tag_overlap)
			.then(b.engagement.cmp(&a.engagement))
			.then(b.id.cmp(&a.id))
	});
	fill(&mut picked, &mut taken, &matched, window);

	if picked.len() < window {
		let mut engaged: Vec<&ScoredCandidate> = scored
			.iter()
			.filter(|candidate| candidate.tag_overlap == 0 && candidate.engagement > 0)
			.collect();

		engaged.sort_by(|a, b| b.engagement.cmp(&a.engagement).then(b.id.cmp(&a.id)));
		fill(&mut picked, &mut taken, &engaged, window);
	}
	if picked.len() < window {
		let mut rest: Vec<&ScoredCandidate> = scored.iter().collect();

		rest.sort_by(|a, b| b.id.cmp(&a.id));
		fill(&mut picked, &mut taken, &rest, window);
	}

	picked
}

fn fill(
	picked: &mut Vec<i64>,
	taken: &mut HashSet<i64>,
	pool: &[&ScoredCandidate],
	window: usize,
) {
	for candidate in pool {
		if picked.len() >= window {
			break;
		}
		if taken.insert(candidate.id) {
			picked.push(candidate.id);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scored(id: i64, tag_overlap: usize, engagement: u64) -> ScoredCandidate {
		ScoredCandidate { id, tag_overlap, engagement }
	}

	#[test]
	fn scoring_counts_canonical_intersection() {
		let user = TagSet::from_raw(["#spicy", "#quiet"]);
		let a = TagSet::from_raw(["#spicy", "#quiet", "#cheap"]);
		let b = TagSet::from_raw(["#Spicy"]);
		let c = TagSet::from_raw(Vec::<String>::new());
		let out = score_candidates(&user, [(1, &a, 3), (2, &b, 10), (3, &c, 0)]);

		assert_eq!(out[0], scored(1, 2, 3));
		assert_eq!(out[1], scored(2, 1, 10));
		assert_eq!(out[2], scored(3, 0, 0));
	}

	#[test]
	fn overlap_dominates_engagement() {
		let all = [scored(1, 2, 3), scored(2, 1, 10)];

		assert_eq!(select_window(&all, CANDIDATE_WINDOW), [1, 2]);
	}

	#[test]
	fn equal_scores_break_ties_by_id_descending() {
		let all = [scored(7, 1, 4), scored(12, 1, 4)];

		assert_eq!(select_window(&all, CANDIDATE_WINDOW), [12, 7]);
	}

	#[test]
	fn engagement_breaks_ties_within_equal_overlap() {
		let all = [scored(5, 2, 1), scored(4, 2, 9), scored(3, 2, 9)];

		assert_eq!(select_window(&all, CANDIDATE_WINDOW), [4, 3, 5]);
	}

	#[test]
	fn backfill_appends_engaged_candidates_after_matches() {
		let all = [
			scored(1, 3, 0),
			scored(2, 0, 5),
			scored(3, 0, 9),
			scored(4, 0, 2),
			scored(5, 0, 2),
		];

		// Stage one yields only id 1; engagement desc then id desc fill the rest.
		assert_eq!(select_window(&all, CANDIDATE_WINDOW), [1, 3, 2, 5, 4]);
	}

	#[test]
	fn final_pass_fills_with_id_descending_alone() {
		let all = [scored(10, 1, 0), scored(2, 0, 0), scored(8, 0, 0), scored(5, 0, 0)];

		assert_eq!(select_window(&all, CANDIDATE_WINDOW), [10, 8, 5, 2]);
	}

	#[test]
	fn window_caps_the_selection() {
		let all: Vec<ScoredCandidate> = (1..=9).map(|id| scored(id, 1, 0)).collect();
		let picked = select_window(&all, CANDIDATE_WINDOW);

		assert_eq!(picked, [9, 8, 7, 6, 5]);
	}

	#[test]
	fn empty_universe_selects_nothing() {
		assert!(select_window(&[], CANDIDATE_WINDOW).is_empty());
	}

	#[test]
	fn selection_is_deterministic() {
		let all = [
			scored(4, 1, 2),
			scored(9, 0, 7),
			scored(1, 1, 2),
			scored(6, 0, 0),
			scored(2, 2, 0),
			scored(8, 0, 7),
		];
		let first = select_window(&all, CANDIDATE_WINDOW);
		let second = select_window(&all, CANDIDATE_WINDOW);

		assert_eq!(first, second);
		assert_eq!(first, [2, 4, 1, 9, 8]);
	}
}
