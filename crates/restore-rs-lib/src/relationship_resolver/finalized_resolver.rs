//! Joins the walker output into the results handed back to the caller.

use serde::*;

use crate::diagnostics::*;
use crate::library::*;
use crate::provider::ContentFileEntry;
use crate::warnings::*;
use super::RestoreRequest;
use super::flatten::flatten_dependency_types;
use super::graph_walker::WalkOutcome;

/// A library in the restored graph of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNode {
	pub identity: LibraryIdentity,
	pub kind: LibraryKind,
	pub effective_assets: AssetFlags,
	pub dependencies: Vec<DependencyEdge>,
	pub is_compatible: bool,
	/// Only filled when [`AssetFlags::CONTENT_FILES`] is among the effective assets.
	pub content_files: Vec<ContentFileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerFrameworkResult {
	pub target: Target,
	/// Sorted by name then version.
	pub resolved_libraries: Vec<ResolvedNode>,
	pub diagnostics: Vec<Diagnostic>,
	pub unresolved: Vec<LibraryRange>,
}

impl PerFrameworkResult {
	pub fn get_library(&self, name: &LibraryName) -> Option<&ResolvedNode> {
		self.resolved_libraries.iter().find(|l| &l.identity.name == name)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreResult {
	pub targets: Vec<PerFrameworkResult>,
	/// Diagnostics of every target, merged when the config asks for it.
	pub diagnostics: Vec<Diagnostic>,
	/// False when any diagnostic is an error.
	pub success: bool,
}

impl RestoreResult {
	pub fn get_target(&self, target: &Target) -> Option<&PerFrameworkResult> {
		self.targets.iter().find(|t| &t.target == target)
	}

	pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
		self.diagnostics.iter().filter(|d| d.level == LogLevel::Error)
	}
}

pub(super) fn assemble_target(request: &RestoreRequest, target: &Target, outcome: WalkOutcome) -> crate::Result<PerFrameworkResult> {
	let WalkOutcome { graph, diagnostics, unresolved } = outcome;
	let flags = flatten_dependency_types(&graph);

	let mut resolved_libraries = Vec::new();
	for (i, library) in graph.libraries() {
		let effective_assets = flags.get(&i).copied().unwrap_or_default();
		let content_files = match &request.content_selector {
			Some(selector) if library.kind == LibraryKind::Package && effective_assets.contains(AssetFlags::CONTENT_FILES) => {
				selector.select(&library.identity, &target.framework)?
			},
			_ => Vec::new(),
		};
		resolved_libraries.push(ResolvedNode {
			identity: library.identity.clone(),
			kind: library.kind,
			effective_assets,
			dependencies: library.info.dependencies.clone(),
			is_compatible: library.is_compatible,
			content_files,
		});
	}
	resolved_libraries.sort_by(|a, b| a.identity.cmp(&b.identity));

	let root_state = request.root.warning_properties_for(&target.framework);
	let cancel = request.cancel.as_deref();
	let transitive = extract_transitive_no_warn(&graph, &root_state, cancel)?;
	let filter = WarningFilter {
		root: &root_state,
		transitive: &transitive,
		framework: &target.framework,
	};
	let diagnostics = diagnostics.into_iter()
		.filter_map(|d| filter.apply(d))
		.map(|d| d.for_target(target.to_string()))
		.collect::<Vec<_>>();

	log::debug!("{}: {} libraries, {} diagnostics, {} unresolved", target, resolved_libraries.len(), diagnostics.len(), unresolved.len());

	Ok(PerFrameworkResult {
		target: target.clone(),
		resolved_libraries,
		diagnostics,
		unresolved,
	})
}

pub(super) fn finalize(request: &RestoreRequest, targets: Vec<PerFrameworkResult>) -> RestoreResult {
	let mut diagnostics = Vec::<Diagnostic>::new();
	for diagnostic in targets.iter().flat_map(|t| t.diagnostics.iter()) {
		let existing = if request.config.merge_target_diagnostics() {
			diagnostics.iter_mut().find(|d| d.is_same_report(diagnostic))
		} else {
			None
		};
		match existing {
			Some(existing) => existing.target_graphs.extend(diagnostic.target_graphs.iter().cloned()),
			None => diagnostics.push(diagnostic.clone()),
		}
	}

	for diagnostic in &diagnostics {
		match diagnostic.level {
			LogLevel::Error => log::error!("{}", diagnostic),
			LogLevel::Warning => log::warn!("{}", diagnostic),
			LogLevel::Info => log::info!("{}", diagnostic),
		}
	}

	let success = !diagnostics.iter().any(|d| d.level == LogLevel::Error);
	log::info!("restore of {} finished for {} targets, success: {}", request.root.name, targets.len(), success);
	RestoreResult {
		targets,
		diagnostics,
		success,
	}
}
