use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::Config;
use crate::library::Target;
use crate::provider::*;
use super::RestoreRequest;

pub struct RestoreRequestBuilder {
	root: RootProject,
	providers: Vec<Arc<dyn MetadataProvider>>,
	content_selector: Option<Arc<dyn ContentFileSelector>>,
	targets: Option<Vec<Target>>,
	config: Config,
	cancel: Option<Arc<AtomicBool>>,
}

impl RestoreRequestBuilder {
	pub fn new(root: RootProject) -> Self {
		Self {
			root,
			providers: Default::default(),
			content_selector: None,
			targets: None,
			config: Default::default(),
			cancel: None,
		}
	}

	/// Providers are consulted in the order they are added.
	pub fn add_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
		self.providers.push(provider);
		self
	}

	pub fn add_providers(mut self, providers: impl IntoIterator<Item = Arc<dyn MetadataProvider>>) -> Self {
		for provider in providers {
			self.providers.push(provider);
		}
		self
	}

	/// Adds the catalog's projects and packages as providers and uses it for content files.
	pub fn add_catalog(mut self, catalog: Arc<LibraryCatalog>) -> Self {
		self.providers.push(Arc::new(catalog.project_source()));
		self.providers.push(Arc::new(catalog.package_source()));
		self.content_selector = Some(catalog as Arc<dyn ContentFileSelector>);
		self
	}

	pub fn content_selector(mut self, selector: Arc<dyn ContentFileSelector>) -> Self {
		self.content_selector = Some(selector);
		self
	}

	/// Replaces the targets taken from the root project's frameworks and runtimes.
	pub fn targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
		self.targets = Some(targets.into_iter().collect());
		self
	}

	pub fn config(mut self, config: Config) -> Self {
		self.config = config;
		self
	}

	/// Resolving stops with [`crate::Error::Cancelled`] once `flag` is set.
	pub fn cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
		self.cancel = Some(flag);
		self
	}

	pub fn build(self) -> RestoreRequest {
		let targets = self.targets.unwrap_or_else(|| self.root.targets());
		RestoreRequest {
			root: self.root,
			providers: self.providers,
			content_selector: self.content_selector,
			targets,
			config: self.config,
			cancel: self.cancel,
		}
	}
}
