//! Sources of library metadata and content files.
//!
//! The resolver never talks to a feed directly, everything it knows about a library comes
//! through a [`MetadataProvider`]. [`LibraryCatalog`] is an in-memory provider loaded from JSON.

use serde::*;

use crate::library::*;
use crate::warnings::WarningSuppressionState;

pub mod catalog;
pub use catalog::LibraryCatalog;
pub use catalog::CatalogSource;
pub use catalog::RootProject;

/// What a provider knows about one library for one framework.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryInfo {
	pub identity: LibraryIdentity,
	/// Dependencies in declaration order.
	pub dependencies: Vec<DependencyEdge>,
	/// Frameworks the library has assets for, empty when it has no framework specific assets.
	pub frameworks: Vec<Framework>,
	/// Only projects carry warning properties.
	pub warning_properties: Option<WarningSuppressionState>,
}

impl LibraryInfo {
	pub fn supports(&self, target: &Framework) -> bool {
		self.frameworks.is_empty() || self.frameworks.iter().any(|f| target.supports(f))
	}
}

pub trait MetadataProvider: Send + Sync {
	/// The kind of library every identity from this provider is.
	fn library_kind(&self) -> LibraryKind;
	fn get_all_versions(&self, name: &LibraryName) -> Vec<Version>;
	fn get_dependencies(&self, identity: &LibraryIdentity, framework: &Framework) -> crate::Result<LibraryInfo>;
}

/// How a content file is handled by the consuming build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildAction {
	Compile,
	Content,
	EmbeddedResource,
	Resource,
	Page,
	ApplicationDefinition,
	None,
}

impl BuildAction {
	pub fn parse(s: &str) -> crate::Result<Self> {
		const ACTIONS: [(&str, BuildAction); 7] = [
			("Compile", BuildAction::Compile),
			("Content", BuildAction::Content),
			("EmbeddedResource", BuildAction::EmbeddedResource),
			("Resource", BuildAction::Resource),
			("Page", BuildAction::Page),
			("ApplicationDefinition", BuildAction::ApplicationDefinition),
			("None", BuildAction::None),
		];
		ACTIONS.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
			.map(|(_, action)| *action)
			.ok_or_else(|| crate::Error::InvalidMetadata(format!("unknown build action `{}`", s)))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFileEntry {
	pub path: String,
	pub build_action: BuildAction,
	pub copy_to_output: bool,
	pub flatten: bool,
}

/// Picks the content files of a package for a framework.
pub trait ContentFileSelector: Send + Sync {
	fn select(&self, identity: &LibraryIdentity, framework: &Framework) -> crate::Result<Vec<ContentFileEntry>>;
}
