use serde::*;
use super::Version;

/// A range of acceptable versions.
///
/// Parsed from interval notation, `[1.0.0, 2.0.0)`, `(, 3.0]`, `[1.2.3]`.
/// A bare version such as `1.0.0` is a lower bound inclusive of itself and `*` or an empty string is any version.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VersionRange {
	#[default] Any,
	Explicit(Version),
	MinOnly { min: Version, inclusive: bool },
	MaxOnly { max: Version, inclusive: bool },
	MinMax { min: Version, min_inclusive: bool, max: Version, max_inclusive: bool },
}

impl VersionRange {
	pub fn new(range: &str) -> crate::Result<Self> {
		let range = range.trim();
		if range.is_empty() || range == "*" {
			return Ok(VersionRange::Any)
		}

		let open = range.chars().next();
		if !matches!(open, Some('[') | Some('(')) {
			return Ok(VersionRange::MinOnly { min: Version::new(range)?, inclusive: true })
		}

		let close = range.chars().last();
		if range.len() < 2 || !matches!(close, Some(']') | Some(')')) {
			return Err(crate::Error::Parse(format!("unterminated version range `{}`", range)))
		}
		let min_inclusive = open == Some('[');
		let max_inclusive = close == Some(']');
		let inner = &range[1..range.len() - 1];

		let Some((lo, hi)) = inner.split_once(',') else {
			if !(min_inclusive && max_inclusive) {
				return Err(crate::Error::Parse(format!("exact version range must use `[]`, got `{}`", range)))
			}
			return Ok(VersionRange::Explicit(Version::new(inner)?))
		};

		let parse_bound = |s: &str| -> crate::Result<Option<Version>> {
			let s = s.trim();
			if s.is_empty() { Ok(None) } else { Version::new(s).map(Some) }
		};

		match (parse_bound(lo)?, parse_bound(hi)?) {
			(None, None) => Ok(VersionRange::Any),
			(Some(min), None) => Ok(VersionRange::MinOnly { min, inclusive: min_inclusive }),
			(None, Some(max)) => Ok(VersionRange::MaxOnly { max, inclusive: max_inclusive }),
			(Some(min), Some(max)) => {
				if min > max || (min == max && !(min_inclusive && max_inclusive)) {
					return Err(crate::Error::Parse(format!("version range `{}` is empty", range)))
				}
				Ok(VersionRange::MinMax { min, min_inclusive, max, max_inclusive })
			},
		}
	}

	pub fn is_version_within(&self, other: &Version) -> bool {
		fn above(v: &Version, min: &Version, inclusive: bool) -> bool {
			if inclusive { v >= min } else { v > min }
		}
		fn below(v: &Version, max: &Version, inclusive: bool) -> bool {
			if inclusive { v <= max } else { v < max }
		}

		match self {
			VersionRange::Any => true,
			VersionRange::Explicit(v) => other == v,
			VersionRange::MinOnly { min, inclusive } => above(other, min, *inclusive),
			VersionRange::MaxOnly { max, inclusive } => below(other, max, *inclusive),
			VersionRange::MinMax { min, min_inclusive, max, max_inclusive } => {
				above(other, min, *min_inclusive) && below(other, max, *max_inclusive)
			},
		}
	}

	/// True when `other` lies past the upper bound of the range.
	///
	/// Ranges without an upper bound never report a version as above it.
	pub fn is_above_upper_bound(&self, other: &Version) -> bool {
		match self {
			VersionRange::Any | VersionRange::MinOnly { .. } => false,
			VersionRange::Explicit(max) => other > max,
			VersionRange::MaxOnly { max, inclusive } | VersionRange::MinMax { max, max_inclusive: inclusive, .. } => {
				if *inclusive { other > max } else { other >= max }
			},
		}
	}

	/// Highest version from `versions` the range allows.
	pub fn find_best_match<'a>(&self, versions: impl IntoIterator<Item = &'a Version>) -> Option<&'a Version> {
		versions.into_iter()
			.filter(|v| self.is_version_within(v))
			.fold(None, |best: Option<&Version>, v| match best {
				Some(b) if b >= v => Some(b),
				_ => Some(v),
			})
	}
}

impl std::fmt::Display for VersionRange {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let open = |inclusive: bool| if inclusive { '[' } else { '(' };
		let close = |inclusive: bool| if inclusive { ']' } else { ')' };
		match self {
			VersionRange::Any => write!(f, "*"),
			VersionRange::Explicit(v) => write!(f, "[{}]", v),
			VersionRange::MinOnly { min, inclusive: true } => write!(f, "{}", min),
			VersionRange::MinOnly { min, inclusive: false } => write!(f, "({}, )", min),
			VersionRange::MaxOnly { max, inclusive } => write!(f, "(, {}{}", max, close(*inclusive)),
			VersionRange::MinMax { min, min_inclusive, max, max_inclusive } => {
				write!(f, "{}{}, {}{}", open(*min_inclusive), min, max, close(*max_inclusive))
			},
		}
	}
}

impl std::str::FromStr for VersionRange {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for VersionRange {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl From<VersionRange> for String {
	fn from(value: VersionRange) -> Self {
		value.to_string()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> Version { Version::new(s).unwrap() }
	fn r(s: &str) -> VersionRange { VersionRange::new(s).unwrap() }

	#[test] fn any_empty() { assert_eq!(r(""), VersionRange::Any) }
	#[test] fn any_star() { assert_eq!(r("*"), VersionRange::Any) }
	#[test] fn bare_is_min_inclusive() { assert!(r("1.0.0").is_version_within(&v("1.0.0"))) }
	#[test] fn bare_allows_higher() { assert!(r("1.0.0").is_version_within(&v("9.0.0"))) }
	#[test] fn bare_rejects_lower() { assert!(!r("1.0.0").is_version_within(&v("0.9.0"))) }
	#[test] fn explicit_match() { assert!(r("[1.2.3]").is_version_within(&v("1.2.3"))) }
	#[test] fn explicit_miss() { assert!(!r("[1.2.3]").is_version_within(&v("1.2.4"))) }
	#[test] fn exclusive_upper() { assert!(!r("[1.0.0, 2.0.0)").is_version_within(&v("2.0.0"))) }
	#[test] fn inclusive_upper() { assert!(r("[1.0.0, 2.0.0]").is_version_within(&v("2.0.0"))) }
	#[test] fn exclusive_lower() { assert!(!r("(1.0.0, 2.0.0]").is_version_within(&v("1.0.0"))) }
	#[test] fn max_only() { assert!(r("(, 3.0]").is_version_within(&v("0.1.0"))) }
	#[test] fn prerelease_under_exclusive_upper() { assert!(r("[1.0.0, 2.0.0)").is_version_within(&v("2.0.0-beta"))) }
	#[test] fn above_exclusive_upper() { assert!(r("[1.0.0, 2.0.0)").is_above_upper_bound(&v("2.0.0"))) }
	#[test] fn prerelease_not_above_upper() { assert!(!r("[1.0.0, 2.0.0)").is_above_upper_bound(&v("2.0.0-beta"))) }
	#[test] fn above_inclusive_upper() { assert!(!r("[1.0.0, 2.0.0]").is_above_upper_bound(&v("2.0.0"))) }
	#[test] fn above_explicit() { assert!(r("[1.0.0]").is_above_upper_bound(&v("1.0.1"))) }
	#[test] fn no_upper_bound() { assert!(!r("1.0.0").is_above_upper_bound(&v("100.0.0"))) }
	#[test] fn empty_range_invalid() { assert!(VersionRange::new("(1.0.0, 1.0.0)").is_err()) }
	#[test] fn reversed_range_invalid() { assert!(VersionRange::new("[2.0.0, 1.0.0]").is_err()) }
	#[test] fn unterminated_invalid() { assert!(VersionRange::new("[1.0.0, 2.0.0").is_err()) }
	#[test] fn display_min_max() { assert_eq!(r("[1.0, 2.0)").to_string(), "[1.0.0, 2.0.0)") }
	#[test] fn display_round_trip() { assert_eq!(r(&r("(1.0.0, )").to_string()), r("(1.0.0, )")) }

	#[test]
	fn best_match_is_highest_within() {
		let versions = vec![v("1.0.0"), v("1.5.0"), v("2.0.0")];
		assert_eq!(r("[1.0.0, 2.0.0)").find_best_match(&versions), Some(&versions[1]));
		assert_eq!(r("[3.0.0, )").find_best_match(&versions), None);
	}
}
