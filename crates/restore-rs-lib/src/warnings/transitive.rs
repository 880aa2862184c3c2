//! Works out which warnings the projects along every path to a package hide for it.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use petgraph::prelude::*;

use crate::diagnostics::LogCode;
use crate::library::*;
use crate::relationship_resolver::DependencyGraph;
use super::WarningSuppressionState;

/// A library reached with the state merged along the path to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SuppressionGraphNode {
	pub id: LibraryName,
	pub is_project: bool,
	pub state: Rc<WarningSuppressionState>,
}

/// Codes hidden per package by the projects that reference it, directly or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitiveNoWarn {
	pub per_package: BTreeMap<LibraryName, BTreeSet<LogCode>>,
}

impl TransitiveNoWarn {
	pub fn is_suppressed(&self, id: &LibraryName, code: LogCode) -> bool {
		self.per_package.get(id).map_or(false, |codes| codes.contains(&code))
	}
}

/// Walks `graph` from the root carrying the merged project states.
///
/// A package keeps a code only when every path reaching it hides that code. The walk stops early once
/// every package is known to hide nothing.
pub fn extract_transitive_no_warn(
	graph: &DependencyGraph,
	root_state: &WarningSuppressionState,
	cancel: Option<&AtomicBool>,
) -> crate::Result<TransitiveNoWarn> {
	let mut remaining = graph.libraries()
		.filter(|(_, l)| l.kind == LibraryKind::Package)
		.map(|(_, l)| l.identity.name.clone())
		.collect::<HashSet<_>>();
	let mut package_no_warn = BTreeMap::<LibraryName, BTreeSet<LogCode>>::new();
	let mut seen = HashSet::<SuppressionGraphNode>::new();

	let root_state = Rc::new(root_state.clone());
	let mut stack = Vec::<(NodeIndex, Rc<WarningSuppressionState>)>::new();
	push_children(graph, graph.root_node, &root_state, &mut stack);

	while let Some((node, path_state)) = stack.pop() {
		if remaining.is_empty() {
			break
		}
		if cancel.map_or(false, |c| c.load(Ordering::Relaxed)) {
			return Err(crate::Error::Cancelled)
		}
		if node == graph.root_node {
			continue
		}
		let Some(library) = graph.library(node) else { continue };

		let key = SuppressionGraphNode {
			id: library.identity.name.clone(),
			is_project: library.kind.is_project(),
			state: Rc::clone(&path_state),
		};
		if !seen.insert(key) {
			continue
		}

		match library.kind {
			LibraryKind::Project | LibraryKind::ExternalReference => {
				let merged = WarningSuppressionState::merge_optional(Some(&path_state), library.info.warning_properties.as_ref())
					.map(Rc::new)
					.unwrap_or(path_state);
				push_children(graph, node, &merged, &mut stack);
			},
			LibraryKind::Package => {
				let name = &library.identity.name;
				let codes = path_state.extract_package_no_warn(name);
				let entry = package_no_warn.entry(name.clone()).or_insert(codes.clone());
				entry.retain(|c| codes.contains(c));
				if entry.is_empty() {
					remaining.remove(name);
				}
				push_children(graph, node, &path_state, &mut stack);
			},
			LibraryKind::Unresolved => {},
		}
	}

	package_no_warn.retain(|_, codes| !codes.is_empty());
	log::trace!("transitive suppressions for {} packages", package_no_warn.len());
	Ok(TransitiveNoWarn { per_package: package_no_warn })
}

fn push_children(graph: &DependencyGraph, node: NodeIndex, state: &Rc<WarningSuppressionState>, stack: &mut Vec<(NodeIndex, Rc<WarningSuppressionState>)>) {
	let compatible = graph.library(node).map_or(false, |l| l.is_compatible);
	if !compatible {
		return
	}
	let children = graph.dependencies_of(node).into_iter().map(|(child, _)| child)
		.chain(graph.cycle_breaks_from(node).map(|b| b.to))
		.collect::<Vec<_>>();
	for child in children.into_iter().rev() {
		stack.push((child, Rc::clone(state)));
	}
}
