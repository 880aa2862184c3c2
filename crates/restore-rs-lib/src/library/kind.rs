use serde::*;

/// What a resolved graph node is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LibraryKind {
	/// A package from a feed.
	#[default] Package,
	/// A project that is part of the build.
	Project,
	/// A project the build knows about only by reference.
	ExternalReference,
	/// Nothing could be selected for the request.
	Unresolved,
}

impl LibraryKind {
	pub fn is_project(&self) -> bool {
		matches!(self, LibraryKind::Project | LibraryKind::ExternalReference)
	}
}

/// Restricts which kinds of library may satisfy a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LibraryKindHint {
	PackageOnly,
	ProjectOnly,
	#[default] Either,
}

impl LibraryKindHint {
	pub fn allows(&self, kind: LibraryKind) -> bool {
		match kind {
			LibraryKind::Package => matches!(self, LibraryKindHint::PackageOnly | LibraryKindHint::Either),
			LibraryKind::Project | LibraryKind::ExternalReference => matches!(self, LibraryKindHint::ProjectOnly | LibraryKindHint::Either),
			LibraryKind::Unresolved => false,
		}
	}
}
