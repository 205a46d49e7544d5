use std::cmp::Ordering;

use tracing::warn;

use patron_config::EmbeddingProviderConfig;
use patron_providers::embedding::cosine;

use crate::Providers;

/// A candidate's position in the pre-semantic order paired with its cosine
/// similarity to the user vector. Produced only when the gateway succeeds.
#[derive(Clone, Copy, Debug)]
struct RankedCandidate {
	index: usize,
	similarity: f32,
}

/// Reorders `0..texts.len()` by semantic similarity to `user_text`,
/// descending. Every gateway or payload anomaly keeps the incoming order
/// and is logged, never surfaced: the deterministic selection is the
/// fallback ranking.
pub(crate) async fn semantic_order(
	providers: &Providers,
	cfg: &EmbeddingProviderConfig,
	user_text: &str,
	texts: &[String],
) -> Vec<usize> {
	let fallback: Vec<usize> = (0..texts.len()).collect();

	if texts.is_empty() {
		return fallback;
	}

	let mut inputs = Vec::with_capacity(1 + texts.len());

	inputs.push(user_text.to_string());
	inputs.extend(texts.iter().cloned());

	let vectors = match providers.embedding.embed(cfg, &inputs).await {
		Ok(vectors) => vectors,
		Err(err) => {
			warn!(error = %err, "Embedding call failed; keeping deterministic order.");

			return fallback;
		},
	};

	if vectors.len() != inputs.len() {
		warn!(
			expected = inputs.len(),
			got = vectors.len(),
			"Embedding count mismatch; keeping deterministic order."
		);

		return fallback;
	}

	let user_vector = &vectors[0];
	let mut ranked = Vec::with_capacity(texts.len());

	for (index, vector) in vectors[1..].iter().enumerate() {
		if vector.len() != user_vector.len() {
			warn!(
				index,
				expected = user_vector.len(),
				got = vector.len(),
				"Embedding dimension mismatch; keeping deterministic order."
			);

			return fallback;
		}

		let similarity = cosine(user_vector, vector);

		if !similarity.is_finite() {
			warn!(index, "Embedding yielded a non-finite similarity; keeping deterministic order.");

			return fallback;
		}

		ranked.push(RankedCandidate { index, similarity });
	}

	// Stable sort: equal similarities keep the deterministic relative order.
	ranked.sort_by(|a, b| {
		b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal)
	});

	ranked.into_iter().map(|candidate| candidate.index).collect()
}
