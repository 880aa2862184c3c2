use std::collections::{BTreeMap, BTreeSet};
use serde::*;

use crate::diagnostics::LogCode;
use crate::library::*;

/// Per package suppressions, keyed by package then framework.
pub type PackageNoWarn = BTreeMap<LibraryName, BTreeMap<Framework, BTreeSet<LogCode>>>;

/// Warning properties of a project, or of a path of projects once merged.
///
/// Every collection is ordered so two states holding the same codes compare and hash equal
/// regardless of how they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WarningSuppressionState {
	pub no_warn: BTreeSet<LogCode>,
	pub all_warnings_as_errors: bool,
	pub warn_as_error: BTreeSet<LogCode>,
	pub per_package: PackageNoWarn,
	/// Frameworks the per package suppressions still apply to, `None` is unscoped.
	pub scope_frameworks: Option<BTreeSet<Framework>>,
}

impl WarningSuppressionState {
	pub fn with_no_warn(mut self, codes: impl IntoIterator<Item = LogCode>) -> Self {
		self.no_warn.extend(codes);
		self
	}

	pub fn with_warn_as_error(mut self, codes: impl IntoIterator<Item = LogCode>) -> Self {
		self.warn_as_error.extend(codes);
		self
	}

	pub fn with_all_warnings_as_errors(mut self, value: bool) -> Self {
		self.all_warnings_as_errors = value;
		self
	}

	pub fn with_package_no_warn(mut self, id: LibraryName, framework: Framework, codes: impl IntoIterator<Item = LogCode>) -> Self {
		self.per_package.entry(id).or_default().entry(framework).or_default().extend(codes);
		self
	}

	/// Combines two states met along one path.
	///
	/// `warn_as_error` does not survive a merge, only the root project's own list escalates warnings.
	pub fn merge(&self, other: &Self) -> Self {
		Self {
			no_warn: merge_no_warn(&self.no_warn, &other.no_warn),
			all_warnings_as_errors: self.all_warnings_as_errors || other.all_warnings_as_errors,
			warn_as_error: BTreeSet::new(),
			per_package: merge_package_specific(&self.per_package, &other.per_package),
			scope_frameworks: merge_scope(self.scope_frameworks.as_ref(), other.scope_frameworks.as_ref()),
		}
	}

	pub fn merge_optional(first: Option<&Self>, second: Option<&Self>) -> Option<Self> {
		match (first, second) {
			(None, None) => None,
			(Some(s), None) | (None, Some(s)) => Some(s.clone()),
			(Some(a), Some(b)) => Some(a.merge(b)),
		}
	}

	/// The state as seen from `target` by a project declaring `project_frameworks`.
	///
	/// Per package entries of the project's nearest framework are kept under `target`, the framework the
	/// consumer restores for, and the scope becomes `target` alone. Entries for other frameworks are dropped.
	pub fn narrowed_to(&self, target: &Framework, project_frameworks: &[Framework]) -> Self {
		let nearest = get_nearest(target, project_frameworks);
		let per_package = self.per_package.iter()
			.filter_map(|(id, by_framework)| {
				let codes = by_framework.get(nearest?)?;
				Some((id.clone(), BTreeMap::from([(target.clone(), codes.clone())])))
			})
			.collect();

		Self {
			per_package,
			scope_frameworks: Some(BTreeSet::from([target.clone()])),
			..self.clone()
		}
	}

	/// Codes hidden for `id` by this state, project wide codes included.
	pub fn extract_package_no_warn(&self, id: &LibraryName) -> BTreeSet<LogCode> {
		let mut codes = self.no_warn.clone();
		if let Some(by_framework) = self.per_package.get(id) {
			for (framework, package_codes) in by_framework {
				let in_scope = self.scope_frameworks.as_ref().map_or(true, |scope| scope.contains(framework));
				if in_scope {
					codes.extend(package_codes.iter().copied());
				}
			}
		}
		codes
	}

	/// Does this state hide `code` for `id` on `framework`, ignoring scope.
	pub fn is_package_code_suppressed(&self, id: &LibraryName, framework: &Framework, code: LogCode) -> bool {
		self.per_package.get(id)
			.and_then(|by_framework| by_framework.get(framework))
			.map_or(false, |codes| codes.contains(&code))
	}
}

pub fn merge_no_warn(lhs: &BTreeSet<LogCode>, rhs: &BTreeSet<LogCode>) -> BTreeSet<LogCode> {
	lhs.union(rhs).copied().collect()
}

pub fn merge_package_specific(lhs: &PackageNoWarn, rhs: &PackageNoWarn) -> PackageNoWarn {
	let mut merged = lhs.clone();
	for (id, by_framework) in rhs {
		let entry = merged.entry(id.clone()).or_default();
		for (framework, codes) in by_framework {
			entry.entry(framework.clone()).or_default().extend(codes.iter().copied());
		}
	}
	merged
}

/// `None` passes the other side through, two scopes intersect.
pub fn merge_scope(lhs: Option<&BTreeSet<Framework>>, rhs: Option<&BTreeSet<Framework>>) -> Option<BTreeSet<Framework>> {
	match (lhs, rhs) {
		(None, None) => None,
		(Some(s), None) | (None, Some(s)) => Some(s.clone()),
		(Some(a), Some(b)) => Some(a.intersection(b).cloned().collect()),
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn code(s: &str) -> LogCode { s.parse().unwrap() }
	fn fw(s: &str) -> Framework { Framework::new(s).unwrap() }

	fn state_a() -> WarningSuppressionState {
		WarningSuppressionState::default()
			.with_no_warn([code("NU1500"), code("NU1601")])
			.with_package_no_warn("x".into(), fw("net46"), [code("NU1603")])
			.with_all_warnings_as_errors(true)
	}

	fn state_b() -> WarningSuppressionState {
		let mut state = WarningSuppressionState::default()
			.with_no_warn([code("NU1601"), code("NU1605")])
			.with_package_no_warn("y".into(), fw("net46"), [code("NU1107")])
			.with_package_no_warn("X".into(), fw("netcoreapp3.1"), [code("NU1701")]);
		state.scope_frameworks = Some([fw("net46"), fw("netcoreapp3.1")].into_iter().collect());
		state
	}

	fn state_c() -> WarningSuppressionState {
		let mut state = WarningSuppressionState::default()
			.with_warn_as_error([code("NU1608")])
			.with_package_no_warn("x".into(), fw("net46"), [code("NU1608")]);
		state.scope_frameworks = Some([fw("net46")].into_iter().collect());
		state
	}

	#[test]
	fn merge_with_empty_keeps_no_warn() {
		let lhs = WarningSuppressionState::default().with_no_warn([code("NU1500")]);
		let merged = lhs.merge(&WarningSuppressionState::default());
		assert_eq!(merged.no_warn, [code("NU1500")].into_iter().collect());
		assert!(!merged.all_warnings_as_errors);
	}

	#[test]
	fn merge_optional_passes_single_side() {
		assert_eq!(WarningSuppressionState::merge_optional(Some(&state_a()), None), Some(state_a()));
		assert_eq!(WarningSuppressionState::merge_optional(None, Some(&state_b())), Some(state_b()));
		assert_eq!(WarningSuppressionState::merge_optional(None, None), None);
	}

	#[test]
	fn merge_drops_warn_as_error() {
		let merged = state_c().merge(&state_c());
		assert!(merged.warn_as_error.is_empty());
	}

	#[test]
	fn merge_commutative() {
		assert_eq!(state_a().merge(&state_b()), state_b().merge(&state_a()));
		assert_eq!(state_b().merge(&state_c()), state_c().merge(&state_b()));
	}

	#[test]
	fn merge_associative() {
		let left = state_a().merge(&state_b()).merge(&state_c());
		let right = state_a().merge(&state_b().merge(&state_c()));
		assert_eq!(left, right);
	}

	#[test]
	fn merge_idempotent_once_merged() {
		let merged = state_a().merge(&state_b());
		assert_eq!(merged.merge(&merged), merged);
	}

	#[test]
	fn merge_case_insensitive_package_keys() {
		let merged = state_a().merge(&state_b());
		assert_eq!(merged.per_package.len(), 2);
		assert_eq!(merged.per_package[&LibraryName::from("X")].len(), 2);
	}

	#[test]
	fn scope_intersects() {
		let merged = state_b().merge(&state_c());
		assert_eq!(merged.scope_frameworks, Some([fw("net46")].into_iter().collect()));
	}

	#[test]
	fn extract_unscoped_takes_all_frameworks() {
		let state = state_a().with_package_no_warn("x".into(), fw("net8.0"), [code("NU1701")]);
		let codes = state.extract_package_no_warn(&"x".into());
		assert!(codes.contains(&code("NU1603")));
		assert!(codes.contains(&code("NU1701")));
		assert!(codes.contains(&code("NU1500")));
	}

	#[test]
	fn extract_scoped_skips_other_frameworks() {
		let merged = state_b().merge(&state_c());
		let codes = merged.extract_package_no_warn(&"x".into());
		assert!(codes.contains(&code("NU1608")));
		assert!(!codes.contains(&code("NU1701")));
	}

	#[test]
	fn narrowed_keeps_nearest_framework_only() {
		let state = WarningSuppressionState::default()
			.with_package_no_warn("x".into(), fw("net46"), [code("NU1603")])
			.with_package_no_warn("x".into(), fw("netstandard2.0"), [code("NU1701")]);
		let narrowed = state.narrowed_to(&fw("net472"), &[fw("net46"), fw("netstandard2.0")]);
		assert!(narrowed.is_package_code_suppressed(&"x".into(), &fw("net472"), code("NU1603")));
		assert!(!narrowed.is_package_code_suppressed(&"x".into(), &fw("net472"), code("NU1701")));
		assert_eq!(narrowed.scope_frameworks, Some([fw("net472")].into_iter().collect()));
	}

	#[test]
	fn narrowed_child_survives_merge_with_consumer() {
		let child = WarningSuppressionState::default()
			.with_package_no_warn("c".into(), fw("netstandard2.0"), [LogCode::NU1608])
			.narrowed_to(&fw("netcoreapp3.1"), &[fw("netstandard2.0")]);
		let root = WarningSuppressionState::default().narrowed_to(&fw("netcoreapp3.1"), &[fw("netcoreapp3.1")]);
		let merged = root.merge(&child);
		assert!(merged.extract_package_no_warn(&"c".into()).contains(&LogCode::NU1608));
	}

	#[test]
	fn narrowed_without_compatible_framework_drops_entries() {
		let state = WarningSuppressionState::default()
			.with_package_no_warn("x".into(), fw("net472"), [code("NU1603")]);
		assert!(state.narrowed_to(&fw("net46"), &[fw("net472")]).per_package.is_empty());
	}

	#[test]
	fn deserialize_camel_case() {
		let state: WarningSuppressionState = serde_json::from_str(r#"{
			"noWarn": ["NU1603"],
			"allWarningsAsErrors": true,
			"perPackage": { "PackageA": { "net46": ["NU1608"] } }
		}"#).unwrap();
		assert!(state.all_warnings_as_errors);
		assert!(state.is_package_code_suppressed(&"packagea".into(), &fw("net46"), LogCode::NU1608));
		assert_eq!(state.scope_frameworks, None);
	}
}
