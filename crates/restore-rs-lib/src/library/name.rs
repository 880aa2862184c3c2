use serde::*;

/// The id of a library.
///
/// Ids compare, hash and sort without regard to ASCII case, `Newtonsoft.Json` and `newtonsoft.json`
/// name the same library. The original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LibraryName(String);

impl LibraryName {
	pub fn new(name: &str) -> Self {
		Self(name.to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	fn folded(&self) -> impl Iterator<Item = u8> + '_ {
		self.0.bytes().map(|b| b.to_ascii_lowercase())
	}
}

impl PartialEq for LibraryName {
	fn eq(&self, other: &Self) -> bool {
		self.0.eq_ignore_ascii_case(&other.0)
	}
}

impl Eq for LibraryName {}

impl std::hash::Hash for LibraryName {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		for b in self.folded() {
			state.write_u8(b);
		}
		state.write_u8(0xff);
	}
}

impl Ord for LibraryName {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.folded().cmp(other.folded())
	}
}

impl PartialOrd for LibraryName {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for LibraryName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl AsRef<str> for LibraryName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for LibraryName {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for LibraryName {
	fn from(value: String) -> Self {
		Self(value)
	}
}
