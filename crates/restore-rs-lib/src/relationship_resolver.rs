//! Resolves the transitive libraries of a project, the assets each contributes and the diagnostics that survive.
//!
//! # Usage
//! 1. Create a [`RestoreRequestBuilder`] from the [`RootProject`](crate::provider::RootProject).
//! 1. Add providers with [`RestoreRequestBuilder::add_provider()`] or [`RestoreRequestBuilder::add_catalog()`].
//! 1. [`RestoreRequestBuilder::build()`] to get a [`RestoreRequest`].
//! 1. [`RestoreRequest::resolve()`], or [`RestoreRequest::resolve_parallel()`] from async code, to get a [`RestoreResult`].
//! 1. [`RestoreResult::get_target()`] to read the libraries of one target.
//!
//! Each target is resolved on its own: the [graph walker](graph_walker) builds the graph, asset flags are
//! [flattened](flatten) over it, suppressions are [propagated](crate::warnings) and the assembler joins the three.

mod dependency_graph;
pub use dependency_graph::DependencyGraph;
pub use dependency_graph::LibraryNode;
pub use dependency_graph::NodeData;
pub use dependency_graph::CycleBreak;

mod cycle_guard;
pub use cycle_guard::CycleGuard;

mod version_selector;
pub use version_selector::VersionSelector;
pub use version_selector::Selection;
pub use version_selector::UnresolvedReason;

pub mod graph_walker;
pub mod flatten;

mod resolver_builder;
pub use resolver_builder::RestoreRequestBuilder;
mod restore_request;
pub use restore_request::RestoreRequest;
mod finalized_resolver;
pub use finalized_resolver::ResolvedNode;
pub use finalized_resolver::PerFrameworkResult;
pub use finalized_resolver::RestoreResult;
