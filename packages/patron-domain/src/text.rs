use crate::tags::TagSet;

/// The text embedded for the user: their plain-word tag string.
pub fn user_text(tags: &TagSet) -> String {
	tags.embedding_text()
}

/// The text embedded for a store: description plus its plain-word tags.
pub fn store_text(description: &str, tags: &TagSet) -> String {
	join_parts(&[description, &tags.embedding_text()])
}

/// The text embedded for a mission: title, description, and the owning
/// store's plain-word tags.
pub fn mission_text(title: &str, description: &str, store_tags: &TagSet) -> String {
	join_parts(&[title, description, &store_tags.embedding_text()])
}

fn join_parts(parts: &[&str]) -> String {
	let mut out = String::new();

	for part in parts {
		let part = part.trim();

		if part.is_empty() {
			continue;
		}
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(part);
	}

	out
}
