//! Builds the graph of one target.
//!
//! Version selection and graph construction depend on each other: which library is selected for a
//! name decides which dependencies are walked, and the walked dependencies decide the requests a
//! selection is made from. The walker alternates the two until the selections stop changing.
//!
//! Ranges requested in earlier passes keep counting after the library that asked for them drops out of
//! the graph. Selections therefore never go back down and the passes settle.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use petgraph::prelude::*;

use crate::Config;
use crate::diagnostics::*;
use crate::library::*;
use crate::provider::*;
use super::cycle_guard::{CycleGuard, describe_cycle};
use super::dependency_graph::*;
use super::version_selector::*;

/// Everything the walk produced for the assembler.
#[derive(Debug)]
pub struct WalkOutcome {
	pub graph: DependencyGraph,
	pub diagnostics: Vec<Diagnostic>,
	pub unresolved: Vec<LibraryRange>,
}

/// One walk of the graph with a fixed set of selections.
struct Pass {
	graph: DependencyGraph,
	/// Every edge met, grouped by the name it asks for.
	requests: BTreeMap<LibraryName, Vec<DependencyEdge>>,
	diagnostics: Vec<Diagnostic>,
}

pub struct GraphWalker<'r> {
	providers: &'r [Arc<dyn MetadataProvider>],
	root: &'r RootProject,
	target: &'r Target,
	config: &'r Config,
	cancel: Option<&'r AtomicBool>,
	info_cache: HashMap<(usize, LibraryIdentity), Arc<LibraryInfo>>,
}

impl<'r> GraphWalker<'r> {
	pub fn new(
		providers: &'r [Arc<dyn MetadataProvider>],
		root: &'r RootProject,
		target: &'r Target,
		config: &'r Config,
		cancel: Option<&'r AtomicBool>,
	) -> Self {
		Self {
			providers,
			root,
			target,
			config,
			cancel,
			info_cache: HashMap::new(),
		}
	}

	fn check_cancelled(&self) -> crate::Result<()> {
		match self.cancel {
			Some(flag) if flag.load(Ordering::Relaxed) => Err(crate::Error::Cancelled),
			_ => Ok(()),
		}
	}

	/// Run the walk until the selections settle.
	pub fn walk(mut self) -> crate::Result<WalkOutcome> {
		let root_info = Arc::new(self.root.library_info(&self.target.framework)?);
		let providers = self.providers;
		let mut selector = VersionSelector::new(providers);
		let mut selections = BTreeMap::<LibraryName, Selection>::new();
		/* Ranges from every pass so far */
		let mut seen_ranges = BTreeMap::<LibraryName, Vec<LibraryRange>>::new();

		for pass_number in 1..=self.config.max_resolve_passes() {
			self.check_cancelled()?;
			let pass = self.build_pass(Arc::clone(&root_info), &selections)?;

			for (name, edges) in &pass.requests {
				let ranges = seen_ranges.entry(name.clone()).or_default();
				for edge in edges {
					if !ranges.contains(&edge.target) {
						ranges.push(edge.target.clone());
					}
				}
			}

			let next = seen_ranges.iter()
				.map(|(name, ranges)| {
					let ranges = ranges.iter().collect::<Vec<_>>();
					(name.clone(), selector.select(name, &ranges))
				})
				.collect::<BTreeMap<_, _>>();

			if next == selections {
				log::debug!("{}: selections settled after {} passes", self.target, pass_number);
				return Ok(self.finish(pass, &selections))
			}
			log::trace!("{}: pass {} selected {} names", self.target, pass_number, next.len());
			selections = next;
		}

		Err(crate::Error::SelectionDidNotConverge(self.config.max_resolve_passes()))
	}

	fn fetch_info(&mut self, provider: usize, identity: &LibraryIdentity) -> crate::Result<Arc<LibraryInfo>> {
		let key = (provider, identity.clone());
		if let Some(info) = self.info_cache.get(&key) {
			return Ok(Arc::clone(info))
		}
		let info = Arc::new(self.providers[provider].get_dependencies(identity, &self.target.framework)?);
		self.info_cache.insert(key, Arc::clone(&info));
		Ok(info)
	}

	/// Depth first walk from the root using `selections`.
	///
	/// Names without a selection yet are only recorded as requests. A dependency on a library that is
	/// still on the walk stack is recorded as a cycle break instead of an edge.
	fn build_pass(&mut self, root_info: Arc<LibraryInfo>, selections: &BTreeMap<LibraryName, Selection>) -> crate::Result<Pass> {
		let root = LibraryNode {
			identity: self.root.identity(),
			kind: LibraryKind::Project,
			info: root_info,
			provider: None,
			is_compatible: true,
		};
		let mut pass = Pass {
			graph: DependencyGraph::new(root),
			requests: BTreeMap::new(),
			diagnostics: Vec::new(),
		};
		let mut guard = CycleGuard::default();
		guard.enter(self.root.identity());

		/* (node, index of its next dependency) */
		let mut stack: Vec<(NodeIndex, usize)> = vec![(pass.graph.root_node, 0)];
		while let Some((node, next)) = stack.last().copied() {
			self.check_cancelled()?;

			let edge = pass.graph.library(node).and_then(|l| l.info.dependencies.get(next).cloned());
			let Some(edge) = edge else {
				stack.pop();
				guard.leave();
				continue
			};
			if let Some(top) = stack.last_mut() {
				top.1 += 1;
			}

			pass.requests.entry(edge.target.name.clone()).or_default().push(edge.clone());

			match selections.get(&edge.target.name) {
				None => {},
				Some(Selection::Unresolved(_)) => {
					let unresolved = pass.graph.get_or_add_unresolved(&edge.target);
					pass.graph.add_dependency(node, unresolved, edge);
				},
				Some(Selection::Resolved { identity, kind, provider }) => {
					if let Some(existing) = pass.graph.get_node_index(&identity.name) {
						if guard.is_on_stack(&identity.name) {
							if let Some(cycle) = guard.record_cycle(&identity.name) {
								log::debug!("{}: cycle {}", self.target, describe_cycle(&cycle));
								pass.diagnostics.push(Diagnostic::error(
									LogCode::NU1108,
									format!("Cycle detected. {}", describe_cycle(&cycle)),
								).with_library(identity.name.clone()));
							}
							pass.graph.add_cycle_break(node, existing, edge);
						} else {
							pass.graph.add_dependency(node, existing, edge);
						}
						continue
					}

					let info = self.fetch_info(*provider, identity)?;
					let is_compatible = info.supports(&self.target.framework);
					if !is_compatible {
						pass.diagnostics.push(self.incompatible_diagnostic(identity, *kind, &info));
					}
					let child = pass.graph.add_library(LibraryNode {
						identity: identity.clone(),
						kind: *kind,
						info,
						provider: Some(*provider),
						is_compatible,
					});
					pass.graph.add_dependency(node, child, edge);
					if is_compatible {
						guard.enter(identity.clone());
						stack.push((child, 0));
					}
				},
			}
		}

		Ok(pass)
	}

	fn incompatible_diagnostic(&self, identity: &LibraryIdentity, kind: LibraryKind, info: &LibraryInfo) -> Diagnostic {
		let supported = info.frameworks.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", ");
		let (code, noun) = if kind.is_project() {
			(LogCode::NU1201, "Project")
		} else {
			(LogCode::NU1202, "Package")
		};
		Diagnostic::error(
			code,
			format!("{} {} is not compatible with {}. {} {} supports: {}", noun, identity, self.target, noun, identity, supported),
		).with_library(identity.name.clone())
	}

	/// Turns the settled pass into the outcome, reporting unresolved names and versions above a requested range.
	fn finish(&self, pass: Pass, selections: &BTreeMap<LibraryName, Selection>) -> WalkOutcome {
		let mut diagnostics = pass.diagnostics;
		let mut unresolved = Vec::<LibraryRange>::new();

		for (name, edges) in &pass.requests {
			match selections.get(name) {
				Some(Selection::Unresolved(reason)) => {
					let mut ranges = Vec::<&LibraryRange>::new();
					for edge in edges {
						if !ranges.contains(&&edge.target) {
							ranges.push(&edge.target);
						}
					}
					diagnostics.push(unresolved_diagnostic(name, reason, &ranges));
					unresolved.extend(ranges.into_iter().cloned());
				},
				Some(Selection::Resolved { identity, kind: LibraryKind::Package, .. }) => {
					for edge in edges {
						if edge.target.hint.allows(LibraryKind::Package) && edge.target.version.is_above_upper_bound(&identity.version) {
							diagnostics.push(Diagnostic::warning(
								LogCode::NU1608,
								format!(
									"Detected package version outside of dependency constraint: {} requires {} ({}) but version {} was resolved.",
									edge.from, edge.target.name, edge.target.version, identity,
								),
							).with_library(name.clone()));
						}
					}
				},
				_ => {},
			}
		}

		WalkOutcome {
			graph: pass.graph,
			diagnostics,
			unresolved,
		}
	}
}

fn unresolved_diagnostic(name: &LibraryName, reason: &UnresolvedReason, ranges: &[&LibraryRange]) -> Diagnostic {
	let requested = ranges.iter().map(|r| r.version.to_string()).collect::<Vec<_>>().join(", ");
	let message = match reason {
		UnresolvedReason::NoVersions => format!("Unable to find package {}. No packages exist with this id in source(s).", name),
		UnresolvedReason::NoMatchingVersion { available } => {
			let listed = available.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
			format!("Unable to find package {} with version ({}). Found {} version(s): {}", name, requested, available.len(), listed)
		},
		UnresolvedReason::ProjectMissing => format!("Unable to find project '{}'.", name),
	};
	Diagnostic::error(reason.log_code(), message).with_library(name.clone())
}
