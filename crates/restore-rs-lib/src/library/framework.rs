use std::sync::LazyLock;
use regex::Regex;
use serde::*;
use super::Version;

/// The family a [`Framework`] belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrameworkFamily {
	/// Compatible with everything, used by libraries that ship no framework specific assets.
	Any,
	NetFramework,
	NetStandard,
	/// .NET Core, including `net5.0` and later.
	NetCoreApp,
	Other(String),
}

/// A target framework such as `net472` or `netstandard2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Framework {
	family: FrameworkFamily,
	version: Version,
}

static SHORT_NAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^([a-z]+)(\d[\d.]*)?$").expect("framework pattern is valid")
});

/// `472` is 4.7.2 while `3.1` is read as a normal version.
fn parse_framework_version(s: &str) -> crate::Result<Version> {
	if s.contains('.') {
		return Version::new(s)
	}
	let digits = s.chars().filter_map(|c| c.to_digit(10)).map(u64::from).collect::<Vec<_>>();
	if digits.is_empty() || digits.len() > 4 {
		return Err(crate::Error::Parse(format!("invalid framework version `{}`", s)))
	}
	let part = |i: usize| digits.get(i).copied().unwrap_or(0);
	Ok(Version::from_parts(part(0), part(1), part(2), part(3)))
}

impl Framework {
	pub fn new(short_name: &str) -> crate::Result<Self> {
		let short_name = short_name.trim().to_ascii_lowercase();
		if short_name.is_empty() || short_name == "any" {
			return Ok(Self::any())
		}

		let captures = SHORT_NAME.captures(&short_name)
			.ok_or_else(|| crate::Error::Parse(format!("invalid framework `{}`", short_name)))?;
		let name = captures.get(1).map_or("", |m| m.as_str());
		let version = match captures.get(2) {
			Some(m) => parse_framework_version(m.as_str())?,
			None => Version::from_parts(0, 0, 0, 0),
		};

		let family = match name {
			"net" if version.major() >= 5 => FrameworkFamily::NetCoreApp,
			"net" => FrameworkFamily::NetFramework,
			"netstandard" => FrameworkFamily::NetStandard,
			"netcoreapp" => FrameworkFamily::NetCoreApp,
			other => FrameworkFamily::Other(other.to_string()),
		};

		Ok(Self { family, version })
	}

	pub fn any() -> Self {
		Self {
			family: FrameworkFamily::Any,
			version: Version::from_parts(0, 0, 0, 0),
		}
	}

	pub fn family(&self) -> &FrameworkFamily {
		&self.family
	}

	pub fn version(&self) -> &Version {
		&self.version
	}

	/// Can a project targeting `self` consume assets built for `candidate`.
	pub fn supports(&self, candidate: &Framework) -> bool {
		let v = |major, minor| Version::from_parts(major, minor, 0, 0);
		match (&self.family, &candidate.family) {
			(_, FrameworkFamily::Any) => true,
			(FrameworkFamily::Any, _) => false,
			(target, other) if target == other => candidate.version <= self.version,
			(FrameworkFamily::NetFramework, FrameworkFamily::NetStandard) => {
				self.version >= Version::from_parts(4, 6, 1, 0) && candidate.version <= v(2, 0)
			},
			(FrameworkFamily::NetCoreApp, FrameworkFamily::NetStandard) => {
				(self.version >= v(2, 0) && candidate.version <= v(2, 0))
				|| (self.version >= v(3, 0) && candidate.version <= v(2, 1))
			},
			_ => false,
		}
	}

	fn nearest_rank(&self, candidate: &Framework) -> (u8, Version) {
		let tier = match &candidate.family {
			f if *f == self.family => 2,
			FrameworkFamily::NetStandard => 1,
			_ => 0,
		};
		(tier, candidate.version.clone())
	}
}

/// Picks the best match for `target` from `candidates`.
///
/// Prefers the target's own family with the highest version, then the highest compatible .NETStandard, then `any`.
/// Incompatible candidates are never chosen.
pub fn get_nearest<'a>(target: &Framework, candidates: impl IntoIterator<Item = &'a Framework>) -> Option<&'a Framework> {
	let mut best: Option<(&Framework, (u8, Version))> = None;
	for candidate in candidates.into_iter().filter(|c| target.supports(c)) {
		let rank = target.nearest_rank(candidate);
		match &best {
			Some((_, best_rank)) if *best_rank >= rank => {},
			_ => best = Some((candidate, rank)),
		}
	}
	best.map(|(f, _)| f)
}

impl std::fmt::Display for Framework {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let v = &self.version;
		match &self.family {
			FrameworkFamily::Any => write!(f, "any"),
			FrameworkFamily::NetFramework => {
				write!(f, "net{}{}", v.major(), v.minor())?;
				if v.patch() != 0 {
					write!(f, "{}", v.patch())?;
				}
				Ok(())
			},
			FrameworkFamily::NetStandard => write!(f, "netstandard{}.{}", v.major(), v.minor()),
			FrameworkFamily::NetCoreApp if v.major() >= 5 => write!(f, "net{}.{}", v.major(), v.minor()),
			FrameworkFamily::NetCoreApp => write!(f, "netcoreapp{}.{}", v.major(), v.minor()),
			FrameworkFamily::Other(name) if v.major() == 0 && v.minor() == 0 => write!(f, "{}", name),
			FrameworkFamily::Other(name) => write!(f, "{}{}.{}", name, v.major(), v.minor()),
		}
	}
}

impl std::str::FromStr for Framework {
	type Err = crate::Error;
	fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for Framework {
	type Error = crate::Error;
	fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(&value) }
}

impl From<Framework> for String {
	fn from(value: Framework) -> Self {
		value.to_string()
	}
}

/// One framework and optional runtime identifier a restore produces a graph for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target {
	pub framework: Framework,
	pub runtime: Option<String>,
}

impl Target {
	pub fn new(framework: Framework, runtime: Option<String>) -> Self {
		Self { framework, runtime }
	}
}

impl From<Framework> for Target {
	fn from(framework: Framework) -> Self {
		Self { framework, runtime: None }
	}
}

impl std::fmt::Display for Target {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.runtime {
			Some(rid) => write!(f, "{}/{}", self.framework, rid),
			None => write!(f, "{}", self.framework),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn fw(s: &str) -> Framework { Framework::new(s).unwrap() }

	#[test] fn parse_net_framework() { assert_eq!(fw("net472").family(), &FrameworkFamily::NetFramework) }
	#[test] fn parse_net_framework_version() { assert_eq!(fw("net472").version(), &Version::from_parts(4, 7, 2, 0)) }
	#[test] fn parse_net5_is_core() { assert_eq!(fw("net8.0").family(), &FrameworkFamily::NetCoreApp) }
	#[test] fn parse_case_insensitive() { assert_eq!(fw("NetStandard2.0"), fw("netstandard2.0")) }
	#[test] fn parse_other() { assert_eq!(fw("uap10.0").family(), &FrameworkFamily::Other("uap".to_string())) }
	#[test] fn parse_invalid() { assert!(Framework::new("net-46").is_err()) }
	#[test] fn display_net_framework() { assert_eq!(fw("net46").to_string(), "net46") }
	#[test] fn display_net_framework_patch() { assert_eq!(fw("net472").to_string(), "net472") }
	#[test] fn display_core() { assert_eq!(fw("netcoreapp3.1").to_string(), "netcoreapp3.1") }
	#[test] fn display_net5() { assert_eq!(fw("net8.0").to_string(), "net8.0") }
	#[test] fn display_any() { assert_eq!(Framework::any().to_string(), "any") }

	#[test] fn same_family_lower() { assert!(fw("net472").supports(&fw("net46"))) }
	#[test] fn same_family_higher() { assert!(!fw("net46").supports(&fw("net472"))) }
	#[test] fn standard_on_framework() { assert!(fw("net472").supports(&fw("netstandard2.0"))) }
	#[test] fn standard_on_old_framework() { assert!(!fw("net46").supports(&fw("netstandard2.0"))) }
	#[test] fn standard21_on_framework() { assert!(!fw("net472").supports(&fw("netstandard2.1"))) }
	#[test] fn standard21_on_core3() { assert!(fw("netcoreapp3.1").supports(&fw("netstandard2.1"))) }
	#[test] fn standard21_on_core2() { assert!(!fw("netcoreapp2.0").supports(&fw("netstandard2.1"))) }
	#[test] fn core_on_net8() { assert!(fw("net8.0").supports(&fw("netcoreapp3.1"))) }
	#[test] fn framework_on_core() { assert!(!fw("net8.0").supports(&fw("net472"))) }
	#[test] fn any_everywhere() { assert!(fw("net46").supports(&Framework::any())) }

	#[test]
	fn nearest_prefers_own_family() {
		let candidates = vec![fw("netstandard2.0"), fw("net45"), fw("net461"), Framework::any()];
		assert_eq!(get_nearest(&fw("net472"), &candidates), Some(&candidates[2]));
	}

	#[test]
	fn nearest_falls_back_to_standard() {
		let candidates = vec![Framework::any(), fw("netstandard1.3"), fw("netstandard2.0"), fw("net472")];
		assert_eq!(get_nearest(&fw("netcoreapp3.1"), &candidates), Some(&candidates[2]));
	}

	#[test]
	fn nearest_none_compatible() {
		let candidates = vec![fw("net472")];
		assert_eq!(get_nearest(&fw("netcoreapp3.1"), &candidates), None);
	}

	#[test] fn target_display() { assert_eq!(Target::new(fw("net46"), Some("win-x64".to_string())).to_string(), "net46/win-x64") }
}
