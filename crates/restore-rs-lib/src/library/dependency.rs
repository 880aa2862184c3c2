use serde::*;
use super::*;

/// A unique identifier for a resolved library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LibraryIdentity {
	pub name: LibraryName,
	pub version: Version,
}

impl LibraryIdentity {
	pub fn new(name: impl Into<LibraryName>, version: Version) -> Self {
		Self {
			name: name.into(),
			version,
		}
	}
}

impl std::fmt::Display for LibraryIdentity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.name, self.version)
	}
}

/// Describes a library using a name and version requirement.
///
/// Differs from [`LibraryIdentity`] in that it represents a range of libraries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryRange {
	pub name: LibraryName,
	#[serde(default)]
	pub version: VersionRange,
	#[serde(default)]
	pub hint: LibraryKindHint,
}

impl LibraryRange {
	pub fn new(name: impl Into<LibraryName>, version: VersionRange, hint: LibraryKindHint) -> Self {
		Self {
			name: name.into(),
			version,
			hint,
		}
	}
}

impl std::fmt::Display for LibraryRange {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.name, self.version)
	}
}

/// A declared dependency from one library on a range of another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
	pub from: LibraryIdentity,
	pub target: LibraryRange,
	pub include: AssetFlags,
	pub exclude: AssetFlags,
	/// Assets that stop at the dependent and don't flow to its own dependents.
	pub suppress_parent: AssetFlags,
}

impl DependencyEdge {
	/// An edge written in a project file.
	pub fn declared_by_project(from: LibraryIdentity, target: LibraryRange) -> Self {
		Self {
			from,
			target,
			include: AssetFlags::all(),
			exclude: AssetFlags::empty(),
			suppress_parent: AssetFlags::DEFAULT_SUPPRESS_PARENT,
		}
	}

	/// An edge from a package's own metadata.
	pub fn declared_by_package(from: LibraryIdentity, target: LibraryRange) -> Self {
		Self {
			from,
			target,
			include: AssetFlags::all(),
			exclude: AssetFlags::DEFAULT_TRANSITIVE_EXCLUDE,
			suppress_parent: AssetFlags::empty(),
		}
	}

	pub fn with_include(mut self, include: AssetFlags) -> Self {
		self.include = include;
		self
	}

	pub fn with_exclude(mut self, exclude: AssetFlags) -> Self {
		self.exclude = exclude;
		self
	}

	pub fn with_suppress_parent(mut self, suppress_parent: AssetFlags) -> Self {
		self.suppress_parent = suppress_parent;
		self
	}

	/// `include \ exclude`
	pub fn effective_assets(&self) -> AssetFlags {
		self.include.difference(self.exclude)
	}

	/// What the target receives through this edge when the dependent itself received `parent`.
	pub fn forwarded_assets(&self, parent: AssetFlags) -> AssetFlags {
		parent.intersection(self.effective_assets()).difference(self.suppress_parent)
	}
}
