use serde::*;

bitflags::bitflags! {
	/// Categories of assets a library can contribute to a consumer.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
	pub struct AssetFlags: u8 {
		const COMPILE = 1 << 0;
		const RUNTIME = 1 << 1;
		const NATIVE = 1 << 2;
		const BUILD = 1 << 3;
		const CONTENT_FILES = 1 << 4;
		const FRAMEWORK_REFERENCES = 1 << 5;
	}
}

const NAMES: [(&str, AssetFlags); 6] = [
	("Compile", AssetFlags::COMPILE),
	("Runtime", AssetFlags::RUNTIME),
	("Native", AssetFlags::NATIVE),
	("Build", AssetFlags::BUILD),
	("ContentFiles", AssetFlags::CONTENT_FILES),
	("FrameworkReferences", AssetFlags::FRAMEWORK_REFERENCES),
];

impl AssetFlags {
	/// Assets a project keeps to itself when it references a package.
	pub const DEFAULT_SUPPRESS_PARENT: Self = Self::BUILD.union(Self::CONTENT_FILES);
	/// Assets a package's own dependencies don't flow unless its metadata says otherwise.
	pub const DEFAULT_TRANSITIVE_EXCLUDE: Self = Self::BUILD.union(Self::CONTENT_FILES);

	/// Parses a `;` or `,` separated list of asset names such as `compile;runtime`.
	///
	/// `all` and `none` are accepted. Unknown names are an [`crate::Error::InvalidMetadata`].
	pub fn parse(s: &str) -> crate::Result<Self> {
		let mut flags = AssetFlags::empty();
		for name in s.split([';', ',']).map(str::trim).filter(|n| !n.is_empty()) {
			if name.eq_ignore_ascii_case("all") {
				flags |= AssetFlags::all();
			} else if name.eq_ignore_ascii_case("none") {
				continue
			} else {
				let (_, flag) = NAMES.iter()
					.find(|(n, _)| n.eq_ignore_ascii_case(name))
					.ok_or_else(|| crate::Error::InvalidMetadata(format!("unknown asset type `{}`", name)))?;
				flags |= *flag;
			}
		}
		Ok(flags)
	}
}

impl Default for AssetFlags {
	fn default() -> Self {
		AssetFlags::empty()
	}
}

impl std::fmt::Display for AssetFlags {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.is_all() {
			return write!(f, "All")
		}
		if self.is_empty() {
			return write!(f, "None")
		}
		let names = NAMES.iter()
			.filter(|(_, flag)| self.contains(*flag))
			.map(|(n, _)| *n)
			.collect::<Vec<_>>();
		write!(f, "{}", names.join(", "))
	}
}

impl Serialize for AssetFlags {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for AssetFlags {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		AssetFlags::parse(&s).map_err(de::Error::custom)
	}
}
