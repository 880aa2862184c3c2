//! Picks one library for every requested name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::diagnostics::LogCode;
use crate::library::*;
use crate::provider::MetadataProvider;

/// Why a name could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
	/// No provider has any version of the name.
	NoVersions,
	/// Versions exist but none satisfy a request.
	NoMatchingVersion { available: Vec<Version> },
	/// Only project references asked for the name and no project provider knows it.
	ProjectMissing,
}

impl UnresolvedReason {
	pub fn log_code(&self) -> LogCode {
		match self {
			UnresolvedReason::NoVersions => LogCode::NU1101,
			UnresolvedReason::NoMatchingVersion { .. } => LogCode::NU1102,
			UnresolvedReason::ProjectMissing => LogCode::NU1104,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
	Resolved {
		identity: LibraryIdentity,
		kind: LibraryKind,
		/// Index into the request's providers.
		provider: usize,
	},
	Unresolved(UnresolvedReason),
}

/// Deterministic choice between competing requests, there is no backtracking.
///
/// A project wins when any request allows one and a project provider knows the name.
/// Otherwise the highest package version satisfying at least one request is chosen, equal versions go to the earlier provider.
pub struct VersionSelector<'a> {
	providers: &'a [Arc<dyn MetadataProvider>],
	versions: HashMap<(usize, LibraryName), Vec<Version>>,
}

impl<'a> VersionSelector<'a> {
	pub fn new(providers: &'a [Arc<dyn MetadataProvider>]) -> Self {
		Self {
			providers,
			versions: HashMap::new(),
		}
	}

	fn get_all_versions(&mut self, provider: usize, name: &LibraryName) -> &[Version] {
		let providers = self.providers;
		self.versions.entry((provider, name.clone()))
			.or_insert_with(|| providers[provider].get_all_versions(name))
	}

	pub fn select(&mut self, name: &LibraryName, requests: &[&LibraryRange]) -> Selection {
		let providers = self.providers;

		if requests.iter().any(|r| r.hint.allows(LibraryKind::Project)) {
			for (i, provider) in providers.iter().enumerate().filter(|(_, p)| p.library_kind().is_project()) {
				if let Some(version) = self.get_all_versions(i, name).iter().max() {
					return Selection::Resolved {
						identity: LibraryIdentity::new(name.clone(), version.clone()),
						kind: provider.library_kind(),
						provider: i,
					}
				}
			}
		}

		let package_requests = requests.iter()
			.filter(|r| r.hint.allows(LibraryKind::Package))
			.collect::<Vec<_>>();
		if package_requests.is_empty() {
			return Selection::Unresolved(UnresolvedReason::ProjectMissing)
		}

		let mut available = Vec::<Version>::new();
		let mut best: Option<(Version, usize)> = None;
		for (i, _) in providers.iter().enumerate().filter(|(_, p)| p.library_kind() == LibraryKind::Package) {
			let versions = self.get_all_versions(i, name);
			available.extend(versions.iter().cloned());
			let matched = package_requests.iter().filter_map(|r| r.version.find_best_match(versions)).max();
			if let Some(version) = matched {
				if best.as_ref().map_or(true, |(b, _)| version > b) {
					best = Some((version.clone(), i));
				}
			}
		}

		match best {
			Some((version, provider)) => Selection::Resolved {
				identity: LibraryIdentity::new(name.clone(), version),
				kind: LibraryKind::Package,
				provider,
			},
			None if available.is_empty() => Selection::Unresolved(UnresolvedReason::NoVersions),
			None => {
				available.sort();
				available.dedup();
				Selection::Unresolved(UnresolvedReason::NoMatchingVersion { available })
			},
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::provider::LibraryInfo;

	struct Fixed {
		kind: LibraryKind,
		versions: Vec<(&'static str, &'static str)>,
	}

	impl MetadataProvider for Fixed {
		fn library_kind(&self) -> LibraryKind { self.kind }
		fn get_all_versions(&self, name: &LibraryName) -> Vec<Version> {
			self.versions.iter()
				.filter(|(n, _)| LibraryName::from(*n) == *name)
				.map(|(_, v)| Version::new(v).unwrap())
				.collect()
		}
		fn get_dependencies(&self, identity: &LibraryIdentity, _: &Framework) -> crate::Result<LibraryInfo> {
			Ok(LibraryInfo { identity: identity.clone(), dependencies: vec![], frameworks: vec![], warning_properties: None })
		}
	}

	fn providers() -> Vec<Arc<dyn MetadataProvider>> {
		vec![
			Arc::new(Fixed { kind: LibraryKind::Project, versions: vec![("shared", "5.0.0")] }),
			Arc::new(Fixed { kind: LibraryKind::Package, versions: vec![("a", "1.0.0"), ("a", "2.0.0"), ("shared", "1.0.0")] }),
			Arc::new(Fixed { kind: LibraryKind::Package, versions: vec![("a", "2.0.0"), ("a", "3.0.0-beta")] }),
		]
	}

	fn range(name: &str, version: &str, hint: LibraryKindHint) -> LibraryRange {
		LibraryRange::new(name, VersionRange::new(version).unwrap(), hint)
	}

	#[test]
	fn highest_satisfying_any_request() {
		let providers = providers();
		let mut selector = VersionSelector::new(&providers);
		let low = range("a", "[1.0.0]", LibraryKindHint::Either);
		let high = range("a", "[1.5.0, 2.5.0)", LibraryKindHint::Either);
		let selection = selector.select(&"a".into(), &[&low, &high]);
		assert_eq!(selection, Selection::Resolved {
			identity: LibraryIdentity::new("a", Version::new("2.0.0").unwrap()),
			kind: LibraryKind::Package,
			provider: 1,
		});
	}

	#[test]
	fn prerelease_selected_when_highest_in_range() {
		let providers = providers();
		let mut selector = VersionSelector::new(&providers);
		let open = range("a", "2.0.0", LibraryKindHint::PackageOnly);
		match selector.select(&"a".into(), &[&open]) {
			Selection::Resolved { identity, provider, .. } => {
				assert_eq!(identity.version, Version::new("3.0.0-beta").unwrap());
				assert_eq!(provider, 2);
			},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn project_shadows_package() {
		let providers = providers();
		let mut selector = VersionSelector::new(&providers);
		let request = range("shared", "1.0.0", LibraryKindHint::Either);
		match selector.select(&"shared".into(), &[&request]) {
			Selection::Resolved { kind, provider, .. } => {
				assert_eq!(kind, LibraryKind::Project);
				assert_eq!(provider, 0);
			},
			other => panic!("unexpected {:?}", other),
		}
	}

	#[test]
	fn package_only_ignores_project() {
		let providers = providers();
		let mut selector = VersionSelector::new(&providers);
		let request = range("shared", "1.0.0", LibraryKindHint::PackageOnly);
		assert!(matches!(selector.select(&"shared".into(), &[&request]), Selection::Resolved { kind: LibraryKind::Package, .. }));
	}

	#[test]
	fn unresolved_reasons() {
		let providers = providers();
		let mut selector = VersionSelector::new(&providers);
		let missing = range("nothing", "1.0.0", LibraryKindHint::Either);
		assert_eq!(selector.select(&"nothing".into(), &[&missing]), Selection::Unresolved(UnresolvedReason::NoVersions));

		let too_high = range("a", "9.0.0", LibraryKindHint::Either);
		assert_eq!(selector.select(&"a".into(), &[&too_high]).clone(), Selection::Unresolved(UnresolvedReason::NoMatchingVersion {
			available: vec![Version::new("1.0.0").unwrap(), Version::new("2.0.0").unwrap(), Version::new("3.0.0-beta").unwrap()],
		}));

		let project = range("a", "1.0.0", LibraryKindHint::ProjectOnly);
		assert_eq!(selector.select(&"a".into(), &[&project]), Selection::Unresolved(UnresolvedReason::ProjectMissing));
	}

	#[test] fn reason_codes() { assert_eq!(UnresolvedReason::ProjectMissing.log_code(), LogCode::NU1104) }
}
