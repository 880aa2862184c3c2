//! An in-memory catalog of packages and projects that can be read from JSON.
//!
//! ```json
//! {
//!   "packages": [
//!     { "id": "PackageA", "version": "1.0.0", "frameworks": ["netstandard2.0"],
//!       "dependencyGroups": [{ "framework": "netstandard2.0", "dependencies": [{ "id": "PackageB", "version": "[1.0.0, 2.0.0)" }] }] }
//!   ],
//!   "projects": [
//!     { "name": "ProjectB", "frameworks": [{ "framework": "net46", "dependencies": [] }] }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use serde::*;

use crate::library::*;
use crate::warnings::WarningSuppressionState;
use super::*;

/// A dependency as written in a package's metadata or a project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDependency {
	pub id: LibraryName,
	#[serde(default)]
	pub version: VersionRange,
	#[serde(default)]
	pub hint: LibraryKindHint,
	/* Asset lists are validated when the edge is built so a bad name fails the restore, not the load. */
	#[serde(default)]
	pub include: Option<String>,
	#[serde(default)]
	pub exclude: Option<String>,
	#[serde(default)]
	pub suppress_parent: Option<String>,
}

impl CatalogDependency {
	pub fn new(id: impl Into<LibraryName>, version: VersionRange) -> Self {
		Self {
			id: id.into(),
			version,
			hint: LibraryKindHint::Either,
			include: None,
			exclude: None,
			suppress_parent: None,
		}
	}

	/// Builds the edge using the defaults for whoever declared it.
	pub fn to_edge(&self, from: &LibraryIdentity, declared_by: LibraryKind) -> crate::Result<DependencyEdge> {
		let target = LibraryRange::new(self.id.clone(), self.version.clone(), self.hint);
		let mut edge = if declared_by.is_project() {
			DependencyEdge::declared_by_project(from.clone(), target)
		} else {
			DependencyEdge::declared_by_package(from.clone(), target)
		};
		if let Some(include) = &self.include {
			edge = edge.with_include(AssetFlags::parse(include)?);
		}
		if let Some(exclude) = &self.exclude {
			edge = edge.with_exclude(AssetFlags::parse(exclude)?);
		}
		if let Some(suppress_parent) = &self.suppress_parent {
			edge = edge.with_suppress_parent(AssetFlags::parse(suppress_parent)?);
		}
		Ok(edge)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroup {
	/// `None` applies to every framework without a group of its own.
	#[serde(default)]
	pub framework: Option<Framework>,
	#[serde(default)]
	pub dependencies: Vec<CatalogDependency>,
}

fn default_build_action() -> String {
	"Compile".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogContentFile {
	pub path: String,
	#[serde(default = "default_build_action")]
	pub build_action: String,
	#[serde(default)]
	pub copy_to_output: bool,
	#[serde(default)]
	pub flatten: bool,
	#[serde(default)]
	pub framework: Option<Framework>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPackage {
	pub id: LibraryName,
	pub version: Version,
	#[serde(default)]
	pub frameworks: Vec<Framework>,
	#[serde(default)]
	pub dependency_groups: Vec<DependencyGroup>,
	#[serde(default)]
	pub content_files: Vec<CatalogContentFile>,
}

impl CatalogPackage {
	pub fn identity(&self) -> LibraryIdentity {
		LibraryIdentity::new(self.id.clone(), self.version.clone())
	}

	fn dependency_group(&self, framework: &Framework) -> Option<&DependencyGroup> {
		let frameworks = self.dependency_groups.iter().filter_map(|g| g.framework.as_ref());
		match get_nearest(framework, frameworks) {
			Some(nearest) => self.dependency_groups.iter().find(|g| g.framework.as_ref() == Some(nearest)),
			None => self.dependency_groups.iter().find(|g| g.framework.is_none()),
		}
	}

	pub fn library_info(&self, framework: &Framework) -> crate::Result<LibraryInfo> {
		let identity = self.identity();
		let dependencies = match self.dependency_group(framework) {
			Some(group) => group.dependencies.iter()
				.map(|d| d.to_edge(&identity, LibraryKind::Package))
				.collect::<crate::Result<Vec<_>>>()?,
			None => Vec::new(),
		};
		Ok(LibraryInfo {
			identity,
			dependencies,
			frameworks: self.frameworks.clone(),
			warning_properties: None,
		})
	}

	pub fn content_files(&self, framework: &Framework) -> crate::Result<Vec<ContentFileEntry>> {
		let nearest = get_nearest(framework, self.content_files.iter().filter_map(|c| c.framework.as_ref()));
		self.content_files.iter()
			.filter(|c| c.framework.is_none() || c.framework.as_ref() == nearest)
			.map(|c| Ok(ContentFileEntry {
				path: c.path.clone(),
				build_action: BuildAction::parse(&c.build_action)?,
				copy_to_output: c.copy_to_output,
				flatten: c.flatten,
			}))
			.collect()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFramework {
	pub framework: Framework,
	#[serde(default)]
	pub dependencies: Vec<CatalogDependency>,
}

fn default_project_version() -> Version {
	Version::from_parts(1, 0, 0, 0)
}

/// A project of the build, either the one being restored or one it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProject {
	pub name: LibraryName,
	#[serde(default = "default_project_version")]
	pub version: Version,
	#[serde(default)]
	pub frameworks: Vec<ProjectFramework>,
	/// Runtime identifiers restored in addition to the framework only targets.
	#[serde(default)]
	pub runtimes: Vec<String>,
	#[serde(default)]
	pub warning_properties: Option<WarningSuppressionState>,
}

/// The project a restore starts from.
pub type RootProject = CatalogProject;

impl CatalogProject {
	pub fn new(name: impl Into<LibraryName>) -> Self {
		Self {
			name: name.into(),
			version: default_project_version(),
			frameworks: Vec::new(),
			runtimes: Vec::new(),
			warning_properties: None,
		}
	}

	pub fn identity(&self) -> LibraryIdentity {
		LibraryIdentity::new(self.name.clone(), self.version.clone())
	}

	pub fn framework_list(&self) -> Vec<Framework> {
		self.frameworks.iter().map(|f| f.framework.clone()).collect()
	}

	/// Every framework with no runtime, then every framework with each runtime.
	pub fn targets(&self) -> Vec<Target> {
		let mut targets = self.framework_list().into_iter().map(Target::from).collect::<Vec<_>>();
		for framework in self.framework_list() {
			for runtime in &self.runtimes {
				targets.push(Target::new(framework.clone(), Some(runtime.clone())));
			}
		}
		targets
	}

	/// Warning properties as seen from `target`, the default state when the project sets none.
	pub fn warning_properties_for(&self, target: &Framework) -> WarningSuppressionState {
		self.warning_properties.clone().unwrap_or_default().narrowed_to(target, &self.framework_list())
	}

	pub fn library_info(&self, target: &Framework) -> crate::Result<LibraryInfo> {
		let identity = self.identity();
		let frameworks = self.framework_list();
		let dependencies = match get_nearest(target, &frameworks) {
			Some(nearest) => self.frameworks.iter()
				.filter(|f| &f.framework == nearest)
				.flat_map(|f| f.dependencies.iter())
				.map(|d| d.to_edge(&identity, LibraryKind::Project))
				.collect::<crate::Result<Vec<_>>>()?,
			None => Vec::new(),
		};
		Ok(LibraryInfo {
			identity,
			dependencies,
			warning_properties: self.warning_properties.as_ref().map(|w| w.narrowed_to(target, &frameworks)),
			frameworks,
		})
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryCatalog {
	pub packages: Vec<CatalogPackage>,
	pub projects: Vec<CatalogProject>,
}

impl LibraryCatalog {
	pub fn load_from_file(path: &Path) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Reads every `.json` file below `path` and joins them into one catalog.
	pub fn load_from_dir(path: &Path) -> crate::Result<Self> {
		let mut catalog = Self::default();
		for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
			let entry = entry?;
			let is_json = entry.path().extension().map_or(false, |e| e.eq_ignore_ascii_case("json"));
			if !entry.file_type().is_file() || !is_json {
				continue
			}
			log::trace!("reading catalog file {}", entry.path().display());
			catalog.extend(Self::load_from_file(entry.path())?);
		}
		log::debug!("loaded {} packages and {} projects from {}", catalog.packages.len(), catalog.projects.len(), path.display());
		Ok(catalog)
	}

	pub fn extend(&mut self, other: LibraryCatalog) {
		self.packages.extend(other.packages);
		self.projects.extend(other.projects);
	}

	pub fn get_package(&self, identity: &LibraryIdentity) -> Option<&CatalogPackage> {
		self.packages.iter().find(|p| p.id == identity.name && p.version == identity.version)
	}

	pub fn get_project(&self, name: &LibraryName) -> Option<&CatalogProject> {
		self.projects.iter().find(|p| &p.name == name)
	}

	/// The catalog's packages as a provider.
	pub fn package_source(self: &Arc<Self>) -> CatalogSource {
		CatalogSource { catalog: Arc::clone(self), kind: LibraryKind::Package }
	}

	/// The catalog's projects as a provider.
	pub fn project_source(self: &Arc<Self>) -> CatalogSource {
		CatalogSource { catalog: Arc::clone(self), kind: LibraryKind::Project }
	}
}

impl ContentFileSelector for LibraryCatalog {
	fn select(&self, identity: &LibraryIdentity, framework: &Framework) -> crate::Result<Vec<ContentFileEntry>> {
		match self.get_package(identity) {
			Some(package) => package.content_files(framework),
			None => Ok(Vec::new()),
		}
	}
}

/// One side of a [`LibraryCatalog`] seen as a [`MetadataProvider`].
#[derive(Debug, Clone)]
pub struct CatalogSource {
	catalog: Arc<LibraryCatalog>,
	kind: LibraryKind,
}

impl MetadataProvider for CatalogSource {
	fn library_kind(&self) -> LibraryKind {
		self.kind
	}

	fn get_all_versions(&self, name: &LibraryName) -> Vec<Version> {
		let mut versions = if self.kind.is_project() {
			self.catalog.get_project(name).map(|p| vec![p.version.clone()]).unwrap_or_default()
		} else {
			self.catalog.packages.iter()
				.filter(|p| &p.id == name)
				.map(|p| p.version.clone())
				.collect::<Vec<_>>()
		};
		versions.sort();
		versions.dedup();
		versions
	}

	fn get_dependencies(&self, identity: &LibraryIdentity, framework: &Framework) -> crate::Result<LibraryInfo> {
		if self.kind.is_project() {
			self.catalog.get_project(&identity.name)
				.ok_or_else(|| crate::Error::Provider(format!("project {} is not in the catalog", identity.name)))?
				.library_info(framework)
		} else {
			self.catalog.get_package(identity)
				.ok_or_else(|| crate::Error::Provider(format!("package {} is not in the catalog", identity)))?
				.library_info(framework)
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn fw(s: &str) -> Framework { Framework::new(s).unwrap() }

	fn catalog() -> Arc<LibraryCatalog> {
		let catalog: LibraryCatalog = serde_json::from_str(r#"{
			"packages": [
				{ "id": "a", "version": "1.0.0",
					"dependencyGroups": [
						{ "framework": "net46", "dependencies": [{ "id": "b", "version": "1.0.0" }] },
						{ "framework": "netstandard2.0", "dependencies": [{ "id": "c", "version": "1.0.0", "include": "runtime" }] },
						{ "dependencies": [{ "id": "d" }] }
					],
					"contentFiles": [
						{ "path": "any/readme.txt", "buildAction": "None" },
						{ "path": "net46/a.cs", "framework": "net46" },
						{ "path": "netstandard2.0/a.cs", "framework": "netstandard2.0", "copyToOutput": true }
					]
				},
				{ "id": "a", "version": "2.0.0" },
				{ "id": "A", "version": "1.5.0" }
			],
			"projects": [
				{ "name": "ProjectB", "version": "3.0.0", "frameworks": [{ "framework": "net46", "dependencies": [{ "id": "a" }] }] }
			]
		}"#).unwrap();
		Arc::new(catalog)
	}

	#[test]
	fn versions_sorted() {
		let versions = catalog().package_source().get_all_versions(&"a".into());
		assert_eq!(versions.iter().map(|v| v.to_string()).collect::<Vec<_>>(), vec!["1.0.0", "1.5.0", "2.0.0"]);
	}

	#[test]
	fn project_versions() {
		let source = catalog().project_source();
		assert_eq!(source.get_all_versions(&"projectb".into()), vec![Version::new("3.0.0").unwrap()]);
		assert!(source.get_all_versions(&"a".into()).is_empty());
	}

	#[test]
	fn nearest_dependency_group() {
		let source = catalog().package_source();
		let identity = LibraryIdentity::new("a", Version::new("1.0.0").unwrap());
		let net472 = source.get_dependencies(&identity, &fw("net472")).unwrap();
		assert_eq!(net472.dependencies[0].target.name, LibraryName::from("b"));
		let core = source.get_dependencies(&identity, &fw("netcoreapp3.1")).unwrap();
		assert_eq!(core.dependencies[0].target.name, LibraryName::from("c"));
		assert_eq!(core.dependencies[0].include, AssetFlags::RUNTIME);
		assert_eq!(core.dependencies[0].exclude, AssetFlags::DEFAULT_TRANSITIVE_EXCLUDE);
	}

	#[test]
	fn fallback_dependency_group() {
		let source = catalog().package_source();
		let identity = LibraryIdentity::new("a", Version::new("1.0.0").unwrap());
		let info = source.get_dependencies(&identity, &fw("uap10.0")).unwrap();
		assert_eq!(info.dependencies[0].target.name, LibraryName::from("d"));
	}

	#[test]
	fn project_edges_are_private_for_build() {
		let source = catalog().project_source();
		let identity = LibraryIdentity::new("ProjectB", Version::new("3.0.0").unwrap());
		let info = source.get_dependencies(&identity, &fw("net472")).unwrap();
		assert_eq!(info.dependencies[0].suppress_parent, AssetFlags::DEFAULT_SUPPRESS_PARENT);
		assert_eq!(info.frameworks, vec![fw("net46")]);
	}

	#[test]
	fn missing_package_is_provider_error() {
		let source = catalog().package_source();
		let identity = LibraryIdentity::new("zzz", Version::new("1.0.0").unwrap());
		assert!(matches!(source.get_dependencies(&identity, &fw("net46")), Err(crate::Error::Provider(_))));
	}

	#[test]
	fn content_files_nearest_and_any() {
		let identity = LibraryIdentity::new("a", Version::new("1.0.0").unwrap());
		let files = catalog().select(&identity, &fw("netcoreapp3.1")).unwrap();
		assert_eq!(files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>(), vec!["any/readme.txt", "netstandard2.0/a.cs"]);
		assert_eq!(files[0].build_action, BuildAction::None);
		assert!(files[1].copy_to_output);
	}

	#[test]
	fn bad_asset_name_fails_edge() {
		let dependency = CatalogDependency { include: Some("compile;bogus".to_string()), ..CatalogDependency::new("x", VersionRange::Any) };
		let from = LibraryIdentity::new("a", Version::from_parts(1, 0, 0, 0));
		assert!(matches!(dependency.to_edge(&from, LibraryKind::Package), Err(crate::Error::InvalidMetadata(_))));
	}

	#[test]
	fn load_from_dir_joins_files() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("a.json"), r#"{ "packages": [{ "id": "a", "version": "1.0.0" }] }"#).unwrap();
		std::fs::create_dir(dir.path().join("nested")).unwrap();
		std::fs::write(dir.path().join("nested").join("b.json"), r#"{ "packages": [{ "id": "b", "version": "1.0.0" }] }"#).unwrap();
		std::fs::write(dir.path().join("notes.txt"), "not json").unwrap();
		let catalog = LibraryCatalog::load_from_dir(dir.path()).unwrap();
		assert_eq!(catalog.packages.len(), 2);
	}
}
