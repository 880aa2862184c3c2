use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::Config;
use crate::diagnostics::DiagnosticSink;
use crate::library::Target;
use crate::provider::*;
use super::finalized_resolver::*;
use super::graph_walker::GraphWalker;

/// One restore of a root project, created by [`super::RestoreRequestBuilder`].
///
/// Every call to a resolve method starts from scratch, nothing is kept between calls.
pub struct RestoreRequest {
	pub(super) root: RootProject,
	pub(super) providers: Vec<Arc<dyn MetadataProvider>>,
	pub(super) content_selector: Option<Arc<dyn ContentFileSelector>>,
	pub(super) targets: Vec<Target>,
	pub(super) config: Config,
	pub(super) cancel: Option<Arc<AtomicBool>>,
}

impl RestoreRequest {
	pub fn root(&self) -> &RootProject {
		&self.root
	}

	pub fn targets(&self) -> &[Target] {
		&self.targets
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Resolves a single target.
	pub fn resolve_target(&self, target: &Target) -> crate::Result<PerFrameworkResult> {
		log::debug!("resolving {} for {}", self.root.name, target);
		let outcome = GraphWalker::new(&self.providers, &self.root, target, &self.config, self.cancel.as_deref()).walk()?;
		assemble_target(self, target, outcome)
	}

	/// Resolves every target one after the other.
	pub fn resolve(&self) -> crate::Result<RestoreResult> {
		let targets = self.targets.iter()
			.map(|t| self.resolve_target(t))
			.collect::<crate::Result<Vec<_>>>()?;
		Ok(finalize(self, targets))
	}

	/// [`Self::resolve`] then delivers the final diagnostics to `sink`.
	pub fn resolve_with_sink(&self, sink: &mut dyn DiagnosticSink) -> crate::Result<RestoreResult> {
		let result = self.resolve()?;
		for diagnostic in &result.diagnostics {
			sink.log(diagnostic);
		}
		Ok(result)
	}

	/// Resolves each target on the blocking pool. The result is the same as [`Self::resolve`].
	pub async fn resolve_parallel(self: Arc<Self>) -> crate::Result<RestoreResult> {
		let handles = self.targets.iter()
			.cloned()
			.map(|target| {
				let request = Arc::clone(&self);
				tokio::task::spawn_blocking(move || request.resolve_target(&target))
			})
			.collect::<Vec<_>>();

		let mut targets = Vec::with_capacity(handles.len());
		for handle in handles {
			targets.push(handle.await??);
		}
		Ok(finalize(&self, targets))
	}
}
