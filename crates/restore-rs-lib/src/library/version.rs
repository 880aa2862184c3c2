use serde::*;

/// A library version.
///
/// # Format
/// `major[.minor[.patch[.revision]]][-label[.label...]][+metadata]`
///
/// Missing numeric parts are zero so `1.0` and `1.0.0` are the same version.
/// Build metadata is accepted but dropped, it never takes part in comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
	numbers: [u64; 4],
	release: Vec<String>,
}

impl Version {
	pub fn new(version: &str) -> crate::Result<Self> {
		let version = version.trim();
		let without_metadata = version.split_once('+').map_or(version, |(v, _)| v);
		let (numeric, release) = match without_metadata.split_once('-') {
			Some((n, r)) => (n, Some(r)),
			None => (without_metadata, None),
		};

		let parts: Vec<&str> = numeric.split('.').collect();
		if parts.len() > 4 {
			return Err(crate::Error::Parse(format!("too many version components in `{}`", version)))
		}

		let mut numbers = [0u64; 4];
		for (i, part) in parts.iter().enumerate() {
			numbers[i] = part.parse::<u64>()
				.map_err(|_| crate::Error::Parse(format!("invalid version component `{}` in `{}`", part, version)))?;
		}

		let release = match release {
			Some(r) => {
				let labels = r.split('.').map(str::to_string).collect::<Vec<_>>();
				if labels.iter().any(|l| l.is_empty() || !l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')) {
					return Err(crate::Error::Parse(format!("invalid release label in `{}`", version)))
				}
				labels
			},
			None => Vec::new(),
		};

		Ok(Self { numbers, release })
	}

	pub fn from_parts(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
		Self {
			numbers: [major, minor, patch, revision],
			release: Vec::new(),
		}
	}

	pub fn major(&self) -> u64 { self.numbers[0] }
	pub fn minor(&self) -> u64 { self.numbers[1] }
	pub fn patch(&self) -> u64 { self.numbers[2] }
	pub fn revision(&self) -> u64 { self.numbers[3] }
}

fn compare_label(lhs: &str, rhs: &str) -> std::cmp::Ordering {
	/* Numeric labels sort before alphanumeric ones */
	match (lhs.parse::<u64>(), rhs.parse::<u64>()) {
		(Ok(l), Ok(r)) => l.cmp(&r),
		(Ok(_), Err(_)) => std::cmp::Ordering::Less,
		(Err(_), Ok(_)) => std::cmp::Ordering::Greater,
		(Err(_), Err(_)) => lhs.to_ascii_lowercase().cmp(&rhs.to_ascii_lowercase()),
	}
}

impl Ord for Version {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.numbers.cmp(&other.numbers) {
			std::cmp::Ordering::Equal => {},
			ord => return ord,
		}

		match (self.release.is_empty(), other.release.is_empty()) {
			(true, true) => std::cmp::Ordering::Equal,
			(true, false) => std::cmp::Ordering::Greater,
			(false, true) => std::cmp::Ordering::Less,
			(false, false) => {
				for (l, r) in self.release.iter().zip(other.release.iter()) {
					match compare_label(l, r) {
						std::cmp::Ordering::Equal => {},
						ord => return ord,
					}
				}
				self.release.len().cmp(&other.release.len())
			},
		}
	}
}

impl PartialOrd for Version {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Version {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == std::cmp::Ordering::Equal
	}
}

impl Eq for Version {}

impl std::hash::Hash for Version {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.numbers.hash(state);
		for label in &self.release {
			label.to_ascii_lowercase().hash(state);
		}
	}
}

impl std::fmt::Display for Version {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}.{}", self.numbers[0], self.numbers[1], self.numbers[2])?;
		if self.numbers[3] != 0 {
			write!(f, ".{}", self.numbers[3])?;
		}
		if !self.release.is_empty() {
			write!(f, "-{}", self.release.join("."))?;
		}
		Ok(())
	}
}

impl std::str::FromStr for Version {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for Version {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl From<Version> for String {
	fn from(value: Version) -> Self {
		value.to_string()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }

	#[test] fn short_form_equal() { assert_eq!(v("1.0"), v("1.0.0")) }
	#[test] fn revision_equal() { assert_eq!(v("1.0.0.0"), v("1.0.0")) }
	#[test] fn numeric_ord() { assert!(v("1.10.0") > v("1.9.0")) }
	#[test] fn revision_ord() { assert!(v("1.0.0.1") > v("1.0.0")) }
	#[test] fn prerelease_below_release() { assert!(v("2.0.0-beta") < v("2.0.0")) }
	#[test] fn prerelease_above_previous() { assert!(v("2.0.0-beta") > v("1.9.9")) }
	#[test] fn prerelease_label_ord() { assert!(v("1.0.0-alpha") < v("1.0.0-beta")) }
	#[test] fn prerelease_numeric_label_ord() { assert!(v("1.0.0-beta.2") < v("1.0.0-beta.10")) }
	#[test] fn prerelease_numeric_before_alpha() { assert!(v("1.0.0-1") < v("1.0.0-alpha")) }
	#[test] fn prerelease_longer_wins() { assert!(v("1.0.0-beta") < v("1.0.0-beta.1")) }
	#[test] fn prerelease_case_insensitive() { assert_eq!(v("1.0.0-BETA"), v("1.0.0-beta")) }
	#[test] fn metadata_ignored() { assert_eq!(v("1.0.0+abc"), v("1.0.0")) }
	#[test] fn display_short() { assert_eq!(v("1.0").to_string(), "1.0.0") }
	#[test] fn display_revision() { assert_eq!(v("1.2.3.4").to_string(), "1.2.3.4") }
	#[test] fn display_prerelease() { assert_eq!(v("1.2.3-rc.1").to_string(), "1.2.3-rc.1") }
	#[test] fn invalid_component() { assert!(Version::new("1.x.0").is_err()) }
	#[test] fn invalid_empty() { assert!(Version::new("").is_err()) }
	#[test] fn invalid_too_long() { assert!(Version::new("1.2.3.4.5").is_err()) }
	#[test] fn invalid_empty_label() { assert!(Version::new("1.0.0-").is_err()) }

	#[test]
	fn serde_as_string() {
		let version: Version = serde_json::from_str("\"3.1.0-preview\"").unwrap();
		assert_eq!(version, v("3.1.0-preview"));
		assert_eq!(serde_json::to_string(&version).unwrap(), "\"3.1.0-preview\"");
	}
}
