//! Works out which assets each library contributes to the root.

use std::collections::BTreeMap;
use petgraph::prelude::*;

use crate::library::AssetFlags;
use super::dependency_graph::*;

/// Flags for every library node reachable from the root.
///
/// A node receives `parent ∩ (include \ exclude) \ suppress_parent` over every incoming edge, root edges
/// seed with `include \ exclude`. A node is expanded again only when it gains a flag, so the result does
/// not depend on visiting order. Cycle breaks add their flags to the target without walking further.
pub fn flatten_dependency_types(graph: &DependencyGraph) -> BTreeMap<NodeIndex, AssetFlags> {
	let mut flags = BTreeMap::<NodeIndex, AssetFlags>::new();
	let root = graph.root_node;

	let mut stack = graph.dependencies_of(root).into_iter()
		.map(|(child, edge)| (child, edge.effective_assets()))
		.collect::<Vec<_>>();
	stack.reverse();

	while let Some((node, received)) = stack.pop() {
		if node == root {
			continue
		}
		let Some(library) = graph.library(node) else { continue };

		match flags.get_mut(&node) {
			Some(current) if current.contains(received) => continue,
			Some(current) => *current |= received,
			None => { flags.insert(node, received); },
		}

		if !library.is_compatible {
			continue
		}

		for (child, edge) in graph.dependencies_of(node).into_iter().rev() {
			if edge.suppress_parent.is_all() {
				continue
			}
			stack.push((child, edge.forwarded_assets(received)));
		}

		for cycle_break in graph.cycle_breaks_from(node) {
			if cycle_break.to == root || cycle_break.edge.suppress_parent.is_all() || graph.library(cycle_break.to).is_none() {
				continue
			}
			*flags.entry(cycle_break.to).or_default() |= cycle_break.edge.forwarded_assets(received);
		}
	}

	for (node, node_flags) in flags.iter_mut() {
		if graph.library(*node).map_or(false, |l| !l.is_compatible) {
			*node_flags = AssetFlags::empty();
		}
	}

	flags
}
