mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, EmbeddingProviderConfig, Providers, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	let embedding = &cfg.providers.embedding;

	if embedding.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_base must be non-empty.".to_string(),
		});
	}
	if embedding.path.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.path must be non-empty.".to_string(),
		});
	}
	if embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_key must be non-empty.".to_string(),
		});
	}
	if embedding.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.model must be non-empty.".to_string(),
		});
	}
	if embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for value in embedding.default_headers.values() {
		if !value.is_string() {
			return Err(Error::Validation {
				message: "providers.embedding.default_headers values must be strings.".to_string(),
			});
		}
	}

	Ok(())
}

// The client concatenates api_base and path verbatim; trim the joint here so
// "https://host/v1/" plus "/embeddings" does not yield a double slash.
fn normalize(cfg: &mut Config) {
	let embedding = &mut cfg.providers.embedding;

	while embedding.api_base.ends_with('/') {
		embedding.api_base.pop();
	}
	if !embedding.path.is_empty() && !embedding.path.starts_with('/') {
		embedding.path.insert(0, '/');
	}
}
