//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::sync::Arc;

use restore_rs::library::*;
use restore_rs::diagnostics::LogCode;
use restore_rs::provider::catalog::*;
use restore_rs::provider::LibraryCatalog;
use restore_rs::warnings::WarningSuppressionState;

/// A dependency kept as text until the catalog is built so builders never fail.
#[derive(Debug, Clone)]
struct TestDependency {
	id: String,
	range: String,
	hint: LibraryKindHint,
	include: Option<String>,
	exclude: Option<String>,
	suppress_parent: Option<String>,
}

impl TestDependency {
	fn to_catalog_dependency(&self) -> restore_rs::Result<CatalogDependency> {
		Ok(CatalogDependency {
			hint: self.hint,
			include: self.include.clone(),
			exclude: self.exclude.clone(),
			suppress_parent: self.suppress_parent.clone(),
			..CatalogDependency::new(self.id.as_str(), VersionRange::new(&self.range)?)
		})
	}
}

/// A package for a test feed.
///
/// `include`, `exclude` and `suppress_parent` describe edges pointing *to* this package, they are copied
/// into every dependency created with [`TestPackage::depends_on`] or [`TestProject::depends_on`].
#[derive(Debug, Clone)]
pub struct TestPackage {
	pub id: String,
	pub version: String,
	include: Option<String>,
	exclude: Option<String>,
	suppress_parent: Option<String>,
	frameworks: Vec<String>,
	dependencies: Vec<TestDependency>,
	content_files: Vec<(String, String)>,
}

impl TestPackage {
	pub fn new(id: &str, version: &str) -> Self {
		Self {
			id: id.to_string(),
			version: version.to_string(),
			include: None,
			exclude: None,
			suppress_parent: None,
			frameworks: Vec::new(),
			dependencies: Vec::new(),
			content_files: Vec::new(),
		}
	}

	pub fn include(mut self, flags: &str) -> Self {
		self.include = Some(flags.to_string());
		self
	}

	pub fn exclude(mut self, flags: &str) -> Self {
		self.exclude = Some(flags.to_string());
		self
	}

	pub fn suppress_parent(mut self, flags: &str) -> Self {
		self.suppress_parent = Some(flags.to_string());
		self
	}

	/// Limits the package to `framework`, call again to add more.
	pub fn framework(mut self, framework: &str) -> Self {
		self.frameworks.push(framework.to_string());
		self
	}

	/// Depends on `other` with a minimum of its version.
	pub fn depends_on(mut self, other: &TestPackage) -> Self {
		self.dependencies.push(other.as_dependency(&other.version));
		self
	}

	pub fn depends_on_range(mut self, id: &str, range: &str) -> Self {
		self.dependencies.push(TestDependency {
			id: id.to_string(),
			range: range.to_string(),
			hint: LibraryKindHint::Either,
			include: None,
			exclude: None,
			suppress_parent: None,
		});
		self
	}

	pub fn content_file(mut self, path: &str, build_action: &str) -> Self {
		self.content_files.push((path.to_string(), build_action.to_string()));
		self
	}

	fn as_dependency(&self, range: &str) -> TestDependency {
		TestDependency {
			id: self.id.clone(),
			range: range.to_string(),
			hint: LibraryKindHint::Either,
			include: self.include.clone(),
			exclude: self.exclude.clone(),
			suppress_parent: self.suppress_parent.clone(),
		}
	}

	pub fn to_catalog_package(&self) -> restore_rs::Result<CatalogPackage> {
		Ok(CatalogPackage {
			id: self.id.as_str().into(),
			version: Version::new(&self.version)?,
			frameworks: self.frameworks.iter().map(|f| Framework::new(f)).collect::<restore_rs::Result<_>>()?,
			dependency_groups: vec![DependencyGroup {
				framework: None,
				dependencies: self.dependencies.iter().map(TestDependency::to_catalog_dependency).collect::<restore_rs::Result<_>>()?,
			}],
			content_files: self.content_files.iter().map(|(path, build_action)| CatalogContentFile {
				path: path.clone(),
				build_action: build_action.clone(),
				copy_to_output: false,
				flatten: false,
				framework: None,
			}).collect(),
		})
	}
}

/// A project for a test restore, either the root or one it references.
#[derive(Debug, Clone)]
pub struct TestProject {
	pub name: String,
	frameworks: Vec<String>,
	runtimes: Vec<String>,
	dependencies: Vec<TestDependency>,
	warning_properties: Option<TestWarningProperties>,
}

#[derive(Debug, Clone, Default)]
struct TestWarningProperties {
	no_warn: String,
	warn_as_error: String,
	all_warnings_as_errors: bool,
	package_no_warn: Vec<(String, String, String)>,
}

impl TestProject {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			frameworks: Vec::new(),
			runtimes: Vec::new(),
			dependencies: Vec::new(),
			warning_properties: None,
		}
	}

	pub fn framework(mut self, framework: &str) -> Self {
		self.frameworks.push(framework.to_string());
		self
	}

	pub fn runtime(mut self, runtime: &str) -> Self {
		self.runtimes.push(runtime.to_string());
		self
	}

	pub fn depends_on(mut self, package: &TestPackage) -> Self {
		self.dependencies.push(package.as_dependency(&package.version));
		self
	}

	pub fn depends_on_range(mut self, package: &TestPackage, range: &str) -> Self {
		self.dependencies.push(package.as_dependency(range));
		self
	}

	/// A project reference, only projects may satisfy it.
	pub fn references(mut self, project: &TestProject) -> Self {
		self.dependencies.push(TestDependency {
			id: project.name.clone(),
			range: String::new(),
			hint: LibraryKindHint::ProjectOnly,
			include: None,
			exclude: None,
			suppress_parent: None,
		});
		self
	}

	fn warning_properties(&mut self) -> &mut TestWarningProperties {
		self.warning_properties.get_or_insert_with(Default::default)
	}

	pub fn no_warn(mut self, codes: &str) -> Self {
		self.warning_properties().no_warn.push_str(&format!("{};", codes));
		self
	}

	pub fn warn_as_error(mut self, codes: &str) -> Self {
		self.warning_properties().warn_as_error.push_str(&format!("{};", codes));
		self
	}

	pub fn all_warnings_as_errors(mut self) -> Self {
		self.warning_properties().all_warnings_as_errors = true;
		self
	}

	pub fn package_no_warn(mut self, id: &str, framework: &str, codes: &str) -> Self {
		self.warning_properties().package_no_warn.push((id.to_string(), framework.to_string(), codes.to_string()));
		self
	}

	pub fn to_catalog_project(&self) -> restore_rs::Result<CatalogProject> {
		let dependencies = self.dependencies.iter().map(TestDependency::to_catalog_dependency).collect::<restore_rs::Result<Vec<_>>>()?;
		let frameworks = self.frameworks.iter()
			.map(|f| Ok(ProjectFramework { framework: Framework::new(f)?, dependencies: dependencies.clone() }))
			.collect::<restore_rs::Result<Vec<_>>>()?;

		let warning_properties = match &self.warning_properties {
			Some(props) => {
				let mut state = WarningSuppressionState::default()
					.with_no_warn(LogCode::parse_list(&props.no_warn)?)
					.with_warn_as_error(LogCode::parse_list(&props.warn_as_error)?)
					.with_all_warnings_as_errors(props.all_warnings_as_errors);
				for (id, framework, codes) in &props.package_no_warn {
					state = state.with_package_no_warn(id.as_str().into(), Framework::new(framework)?, LogCode::parse_list(codes)?);
				}
				Some(state)
			},
			None => None,
		};

		Ok(CatalogProject {
			frameworks,
			runtimes: self.runtimes.clone(),
			warning_properties,
			..CatalogProject::new(self.name.as_str())
		})
	}
}

pub fn create_catalog(packages: &[TestPackage], projects: &[TestProject]) -> restore_rs::Result<LibraryCatalog> {
	Ok(LibraryCatalog {
		packages: packages.iter().map(TestPackage::to_catalog_package).collect::<restore_rs::Result<_>>()?,
		projects: projects.iter().map(TestProject::to_catalog_project).collect::<restore_rs::Result<_>>()?,
	})
}

/// Builds a request for `root` over a catalog of `packages` and `projects`.
pub fn create_request(root: &TestProject, packages: &[TestPackage], projects: &[TestProject]) -> restore_rs::Result<restore_rs::RestoreRequestBuilder> {
	let catalog = Arc::new(create_catalog(packages, projects)?);
	Ok(restore_rs::RestoreRequestBuilder::new(root.to_catalog_project()?).add_catalog(catalog))
}

pub fn restore(root: &TestProject, packages: &[TestPackage], projects: &[TestProject]) -> restore_rs::Result<restore_rs::RestoreResult> {
	create_request(root, packages, projects)?.build().resolve()
}

/// Writes every package and project of `catalog` to its own file in a new temporary directory.
pub fn write_catalog_dir(catalog: &LibraryCatalog) -> restore_rs::Result<tempfile::TempDir> {
	let dir = tempfile::tempdir()?;
	for (i, package) in catalog.packages.iter().enumerate() {
		let single = LibraryCatalog { packages: vec![package.clone()], projects: vec![] };
		std::fs::write(dir.path().join(format!("package-{}.json", i)), serde_json::to_vec_pretty(&single)?)?;
	}
	for (i, project) in catalog.projects.iter().enumerate() {
		let single = LibraryCatalog { packages: vec![], projects: vec![project.clone()] };
		std::fs::write(dir.path().join(format!("project-{}.json", i)), serde_json::to_vec_pretty(&single)?)?;
	}
	Ok(dir)
}
