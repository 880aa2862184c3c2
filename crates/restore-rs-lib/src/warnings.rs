//! Warning suppression and escalation.
//!
//! Projects set warning properties for themselves. A project's `noWarn` also hides warnings about the
//! packages it brings in, and those suppressions travel up to the root through every project on the way.

mod suppression_state;
pub use suppression_state::WarningSuppressionState;
pub use suppression_state::PackageNoWarn;
pub use suppression_state::{merge_no_warn, merge_package_specific, merge_scope};

mod transitive;
pub use transitive::SuppressionGraphNode;
pub use transitive::TransitiveNoWarn;
pub use transitive::extract_transitive_no_warn;

use crate::diagnostics::*;
use crate::library::Framework;

/// Decides which diagnostics of one target survive and at what level.
pub struct WarningFilter<'a> {
	pub root: &'a WarningSuppressionState,
	pub transitive: &'a TransitiveNoWarn,
	pub framework: &'a Framework,
}

impl<'a> WarningFilter<'a> {
	/// `None` when the diagnostic is suppressed.
	pub fn apply(&self, mut diagnostic: Diagnostic) -> Option<Diagnostic> {
		if diagnostic.level != LogLevel::Warning {
			return Some(diagnostic)
		}

		let code = diagnostic.code;
		let suppressed = self.root.no_warn.contains(&code) || match &diagnostic.library_id {
			Some(id) => self.transitive.is_suppressed(id, code) || self.root.is_package_code_suppressed(id, self.framework, code),
			None => false,
		};
		if suppressed {
			log::trace!("suppressed {}", diagnostic);
			return None
		}

		if self.root.all_warnings_as_errors || self.root.warn_as_error.contains(&code) {
			diagnostic.level = LogLevel::Error;
		}
		Some(diagnostic)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn fw() -> Framework { Framework::new("net46").unwrap() }
	fn warning() -> Diagnostic { Diagnostic::warning(LogCode::NU1608, "above".to_string()).with_library("a".into()) }

	#[test]
	fn errors_pass_untouched() {
		let root = WarningSuppressionState::default().with_no_warn([LogCode::NU1101]);
		let transitive = TransitiveNoWarn::default();
		let framework = fw();
		let filter = WarningFilter { root: &root, transitive: &transitive, framework: &framework };
		let error = Diagnostic::error(LogCode::NU1101, "missing".to_string());
		assert_eq!(filter.apply(error.clone()), Some(error));
	}

	#[test]
	fn root_per_package_suppresses() {
		let root = WarningSuppressionState::default().with_package_no_warn("A".into(), fw(), [LogCode::NU1608]);
		let transitive = TransitiveNoWarn::default();
		let framework = fw();
		let filter = WarningFilter { root: &root, transitive: &transitive, framework: &framework };
		assert_eq!(filter.apply(warning()), None);
	}

	#[test]
	fn root_per_package_other_framework_keeps() {
		let root = WarningSuppressionState::default().with_package_no_warn("a".into(), Framework::new("net8.0").unwrap(), [LogCode::NU1608]);
		let transitive = TransitiveNoWarn::default();
		let framework = fw();
		let filter = WarningFilter { root: &root, transitive: &transitive, framework: &framework };
		assert!(filter.apply(warning()).is_some());
	}

	#[test]
	fn transitive_suppresses() {
		let root = WarningSuppressionState::default();
		let mut transitive = TransitiveNoWarn::default();
		transitive.per_package.insert("a".into(), [LogCode::NU1608].into_iter().collect());
		let framework = fw();
		let filter = WarningFilter { root: &root, transitive: &transitive, framework: &framework };
		assert_eq!(filter.apply(warning()), None);
	}

	#[test]
	fn warn_as_error_escalates() {
		let root = WarningSuppressionState::default().with_warn_as_error([LogCode::NU1608]);
		let transitive = TransitiveNoWarn::default();
		let framework = fw();
		let filter = WarningFilter { root: &root, transitive: &transitive, framework: &framework };
		assert_eq!(filter.apply(warning()).map(|d| d.level), Some(LogLevel::Error));
	}

	#[test]
	fn no_warn_beats_all_warnings_as_errors() {
		let root = WarningSuppressionState::default().with_no_warn([LogCode::NU1608]).with_all_warnings_as_errors(true);
		let transitive = TransitiveNoWarn::default();
		let framework = fw();
		let filter = WarningFilter { root: &root, transitive: &transitive, framework: &framework };
		assert_eq!(filter.apply(warning()), None);
	}
}
