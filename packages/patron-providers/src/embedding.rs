// std
use std::time::Duration;

// crates.io
use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::Value;

/// Embeds every text in one batch call against an OpenAI-compatible
/// embeddings endpoint. The returned vectors follow the request order.
pub async fn embed(
	cfg: &patron_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	if texts.is_empty() {
		return Ok(Vec::new());
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

/// Cosine similarity in `[-1, 1]`; `-1.0` when the vectors are incomparable
/// (differing dimensionality or a zero norm).
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	if a.len() != b.len() {
		return -1.0;
	}

	let mut dot = 0.0;
	let mut norm_a = 0.0;
	let mut norm_b = 0.0;

	for (x, y) in a.iter().zip(b) {
		let (x, y) = (f64::from(*x), f64::from(*y));

		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return -1.0;
	}

	(dot / (norm_a.sqrt() * norm_b.sqrt())) as f32
}

fn auth_headers(
	api_key: &str,
	default_headers: &serde_json::Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

// Providers may stream items out of request order; the index field is
// authoritative.
fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Embedding response is missing data array."))?;
	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.and_then(|v| v.as_array())
			.ok_or_else(|| eyre::eyre!("Embedding item missing embedding array."))?;
		let mut vec = Vec::with_capacity(embedding.len());

		for value in embedding {
			let number =
				value.as_f64().ok_or_else(|| eyre::eyre!("Embedding value must be numeric."))?;

			vec.push(number as f32);
		}

		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_embeddings_in_index_order() {
		let json = serde_json::json!({
			"data": [
				{ "index": 2, "embedding": [9.0] },
				{ "index": 0, "embedding": [1.0] },
				{ "index": 1, "embedding": [5.0] }
			]
		});
		let parsed = parse_embedding_response(json).expect("parse failed");

		assert_eq!(parsed, vec![vec![1.0], vec![5.0], vec![9.0]]);
	}

	#[test]
	fn missing_data_array_is_an_error() {
		let json = serde_json::json!({ "error": { "message": "rate limited" } });

		assert!(parse_embedding_response(json).is_err());
	}

	#[test]
	fn non_numeric_embedding_value_is_an_error() {
		let json = serde_json::json!({
			"data": [{ "index": 0, "embedding": [0.1, "oops"] }]
		});

		assert!(parse_embedding_response(json).is_err());
	}

	#[test]
	fn cosine_of_a_vector_with_itself_is_one() {
		let a = [0.3, -1.2, 4.5];

		assert!((cosine(&a, &a) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn cosine_stays_within_bounds() {
		let a = [1.0, 2.0, 3.0];
		let b = [-3.0, 0.5, -1.0];
		let sim = cosine(&a, &b);

		assert!((-1.0..=1.0).contains(&sim));
	}

	#[test]
	fn opposite_vectors_score_minus_one() {
		let a = [2.0, -1.0];
		let b = [-2.0, 1.0];

		assert!((cosine(&a, &b) + 1.0).abs() < 1e-6);
	}

	#[test]
	fn orthogonal_vectors_score_zero() {
		let a = [1.0, 0.0];
		let b = [0.0, 1.0];

		assert!(cosine(&a, &b).abs() < 1e-6);
	}

	#[test]
	fn zero_norm_is_incomparable() {
		let a = [0.0, 0.0];
		let b = [1.0, 2.0];

		assert_eq!(cosine(&a, &b), -1.0);
		assert_eq!(cosine(&b, &a), -1.0);
	}

	#[test]
	fn dimension_mismatch_is_incomparable() {
		let a = [1.0, 2.0];
		let b = [1.0, 2.0, 3.0];

		assert_eq!(cosine(&a, &b), -1.0);
	}
}
