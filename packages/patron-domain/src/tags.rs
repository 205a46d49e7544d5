use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const TAG_MARKER: char = '#';

/// A hashtag collection held in both comparison and display form.
///
/// Tags compare by canonical form (leading marker stripped, case-folded) and
/// are de-duplicated on construction, keeping the first-seen spelling and
/// relative order for display and embedding text.
#[derive(Clone, Debug, Default)]
pub struct TagSet {
	canonical: HashSet<String>,
	display: Vec<String>,
	words: Vec<String>,
}

impl TagSet {
	pub fn from_raw<I, S>(raw: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut canonical = HashSet::new();
		let mut display = Vec::new();
		let mut words = Vec::new();

		for tag in raw {
			let word = strip_marker(tag.as_ref());

			if word.is_empty() {
				continue;
			}
			if !canonical.insert(word.to_lowercase()) {
				continue;
			}

			display.push(format!("{TAG_MARKER}{word}"));
			words.push(word.to_string());
		}

		Self { canonical, display, words }
	}

	/// Number of tags shared with `other`, compared canonically.
	pub fn overlap(&self, other: &TagSet) -> usize {
		if self.canonical.len() > other.canonical.len() {
			return other.overlap(self);
		}

		self.canonical.iter().filter(|tag| other.canonical.contains(*tag)).count()
	}

	/// Marker-stripped words joined with single spaces, first-seen order.
	pub fn embedding_text(&self) -> String {
		self.words.join(" ")
	}

	/// Marker-prefixed forms in first-seen order.
	pub fn display_tags(&self) -> &[String] {
		&self.display
	}

	pub fn len(&self) -> usize {
		self.canonical.len()
	}

	pub fn is_empty(&self) -> bool {
		self.canonical.is_empty()
	}
}

impl Serialize for TagSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.display.serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for TagSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(Self::from_raw(Vec::<String>::deserialize(deserializer)?))
	}
}

fn strip_marker(raw: &str) -> &str {
	raw.strip_prefix(TAG_MARKER).unwrap_or(raw)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canonical_comparison_ignores_marker_and_case() {
		let user = TagSet::from_raw(["#Spicy", "#quiet"]);
		let store = TagSet::from_raw(["spicy", "#QUIET", "#cheap"]);

		assert_eq!(user.overlap(&store), 2);
		assert_eq!(store.overlap(&user), 2);
	}

	#[test]
	fn duplicates_collapse_to_first_spelling() {
		let tags = TagSet::from_raw(["#Spicy", "#spicy", "spicy", "#quiet"]);

		assert_eq!(tags.len(), 2);
		assert_eq!(tags.display_tags(), ["#Spicy", "#quiet"]);
		assert_eq!(tags.embedding_text(), "Spicy quiet");
	}

	#[test]
	fn display_form_always_carries_the_marker() {
		let tags = TagSet::from_raw(["spicy", "#quiet"]);

		assert_eq!(tags.display_tags(), ["#spicy", "#quiet"]);
	}

	#[test]
	fn embedding_text_preserves_input_order() {
		let tags = TagSet::from_raw(["#quiet", "#spicy", "#cheap"]);

		assert_eq!(tags.embedding_text(), "quiet spicy cheap");
	}

	#[test]
	fn empty_input_is_not_an_error() {
		let tags = TagSet::from_raw(Vec::<String>::new());

		assert!(tags.is_empty());
		assert_eq!(tags.embedding_text(), "");
		assert!(tags.display_tags().is_empty());
	}

	#[test]
	fn blank_and_bare_marker_entries_are_dropped() {
		let tags = TagSet::from_raw(["", "#", "#spicy"]);

		assert_eq!(tags.len(), 1);
		assert_eq!(tags.display_tags(), ["#spicy"]);
	}

	#[test]
	fn only_one_leading_marker_is_stripped() {
		let tags = TagSet::from_raw(["##loud"]);

		assert_eq!(tags.display_tags(), ["##loud"]);
		assert_eq!(tags.embedding_text(), "#loud");
	}

	#[test]
	fn serde_round_trips_through_display_form() {
		let tags = TagSet::from_raw(["#spicy", "#quiet"]);
		let json = serde_json::to_string(&tags).expect("serialize failed");

		assert_eq!(json, r##"["#spicy","#quiet"]"##);

		let parsed: TagSet = serde_json::from_str(&json).expect("deserialize failed");

		assert_eq!(parsed.display_tags(), tags.display_tags());
	}
}
