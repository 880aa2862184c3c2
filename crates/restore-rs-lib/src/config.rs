use serde::*;

/// Options for a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	max_resolve_passes: usize,
	parallel_targets: bool,
	merge_target_diagnostics: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			max_resolve_passes: 64,
			parallel_targets: false,
			merge_target_diagnostics: true,
		}
	}
}

impl Config {
	pub fn load_from_disk(path: &std::path::Path) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	pub fn save_to_disk(&self, path: &std::path::Path) -> crate::Result<()> {
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(file, self)?;
		Ok(())
	}

	/// How many times version selection may be redone before the restore gives up.
	pub fn max_resolve_passes(&self) -> usize {
		/* Loaded files skip the setter */
		self.max_resolve_passes.max(1)
	}
	pub fn set_max_resolve_passes(&mut self, max_resolve_passes: usize) {
		self.max_resolve_passes = max_resolve_passes.max(1);
	}

	pub fn parallel_targets(&self) -> bool {
		self.parallel_targets
	}
	pub fn set_parallel_targets(&mut self, parallel_targets: bool) {
		self.parallel_targets = parallel_targets;
	}

	/// Report a diagnostic raised by several targets once, listing every target.
	pub fn merge_target_diagnostics(&self) -> bool {
		self.merge_target_diagnostics
	}
	pub fn set_merge_target_diagnostics(&mut self, merge_target_diagnostics: bool) {
		self.merge_target_diagnostics = merge_target_diagnostics;
	}
}
