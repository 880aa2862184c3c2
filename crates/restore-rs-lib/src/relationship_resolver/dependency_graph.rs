//! Module for only DependencyGraph functions not related to the overall resolving process.

use std::collections::HashMap;
use std::sync::Arc;
use petgraph::prelude::*;

use crate::library::*;
use crate::provider::LibraryInfo;

/// A library selected into the graph.
#[derive(Debug, Clone)]
pub struct LibraryNode {
	pub identity: LibraryIdentity,
	pub kind: LibraryKind,
	pub info: Arc<LibraryInfo>,
	/// Index of the provider the library came from, `None` for the root project.
	pub provider: Option<usize>,
	/// False when the library has no assets usable by the target framework. Such nodes are never expanded.
	pub is_compatible: bool,
}

#[derive(Debug, Clone)]
pub enum NodeData {
	Library(LibraryNode),
	/// Nothing could be selected for this request.
	Unresolved(LibraryRange),
}

pub type EdgeData = DependencyEdge;

/// A back edge found while walking, kept out of the graph so the graph stays acyclic.
#[derive(Debug, Clone)]
pub struct CycleBreak {
	pub from: NodeIndex,
	pub to: NodeIndex,
	pub edge: DependencyEdge,
}

/// The resolved graph of one target.
///
/// There is at most one node per library name.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
	pub graph: StableDiGraph<NodeData, EdgeData>,
	pub root_node: NodeIndex,
	pub cycle_breaks: Vec<CycleBreak>,
	index: HashMap<LibraryName, NodeIndex>,
}

impl DependencyGraph {
	pub fn new(root: LibraryNode) -> Self {
		let mut graph = StableDiGraph::<NodeData, EdgeData>::default();
		let name = root.identity.name.clone();
		let root_node = graph.add_node(NodeData::Library(root));
		Self {
			graph,
			root_node,
			cycle_breaks: Vec::new(),
			index: HashMap::from([(name, root_node)]),
		}
	}

	pub fn get_node_index(&self, name: &LibraryName) -> Option<NodeIndex> {
		self.index.get(name).copied()
	}

	pub fn library(&self, src: NodeIndex) -> Option<&LibraryNode> {
		match self.graph.node_weight(src)? {
			NodeData::Library(library) => Some(library),
			NodeData::Unresolved(_) => None,
		}
	}

	/// Adds a node for `library`, replacing nothing. Callers check [`Self::get_node_index`] first.
	pub fn add_library(&mut self, library: LibraryNode) -> NodeIndex {
		let name = library.identity.name.clone();
		let i = self.graph.add_node(NodeData::Library(library));
		self.index.insert(name, i);
		i
	}

	/// Returns the index of the existing node or a new `Unresolved` node for `range`.
	pub fn get_or_add_unresolved(&mut self, range: &LibraryRange) -> NodeIndex {
		if let Some(i) = self.get_node_index(&range.name) {
			return i
		}
		let i = self.graph.add_node(NodeData::Unresolved(range.clone()));
		self.index.insert(range.name.clone(), i);
		i
	}

	pub fn add_dependency(&mut self, from: NodeIndex, to: NodeIndex, edge: DependencyEdge) {
		self.graph.add_edge(from, to, edge);
	}

	pub fn add_cycle_break(&mut self, from: NodeIndex, to: NodeIndex, edge: DependencyEdge) {
		self.cycle_breaks.push(CycleBreak { from, to, edge });
	}

	/// Outgoing edges of `src` in the order they were added.
	pub fn dependencies_of(&self, src: NodeIndex) -> Vec<(NodeIndex, &DependencyEdge)> {
		let mut edges = self.graph.edges_directed(src, Outgoing)
			.map(|e| (e.id(), e.target(), e.weight()))
			.collect::<Vec<_>>();
		edges.sort_by_key(|(id, _, _)| *id);
		edges.into_iter().map(|(_, target, weight)| (target, weight)).collect()
	}

	pub fn cycle_breaks_from(&self, src: NodeIndex) -> impl Iterator<Item = &CycleBreak> {
		self.cycle_breaks.iter().filter(move |b| b.from == src)
	}

	/// Every library node other than the root.
	pub fn libraries(&self) -> impl Iterator<Item = (NodeIndex, &LibraryNode)> {
		self.graph.node_indices()
			.filter(move |i| *i != self.root_node)
			.filter_map(move |i| self.library(i).map(|l| (i, l)))
	}

	pub fn unresolved(&self) -> impl Iterator<Item = &LibraryRange> {
		self.graph.node_weights().filter_map(|n| match n {
			NodeData::Unresolved(range) => Some(range),
			NodeData::Library(_) => None,
		})
	}

	pub fn root(&self) -> Option<&LibraryNode> {
		self.library(self.root_node)
	}
}
