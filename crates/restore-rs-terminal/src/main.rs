use std::path::{Path, PathBuf};
use std::sync::Arc;

use restore_rs::library::{Framework, Target};
use restore_rs::provider::{LibraryCatalog, RootProject};

#[tokio::main]
async fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",      "Show help");
		opts.optopt(  "c", "config",    "Config file to use", "FILE");
		opts.optopt(  "o", "output",    "Write the result to a file instead of stdout", "FILE");
		opts.optmulti("f", "framework", "Only restore this framework, may be repeated", "TFM");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: restore-rs-terminal [options] CATALOG ROOT_PROJECT"));
			return;
		}

		parsed_options
	};

	let config = match parsed_options.opt_str("c") {
		Some(path) => restore_rs::Config::load_from_disk(Path::new(&path)).unwrap_or_else(|e| {
			log::warn!("Failed to read config file: {}", e);
			log::warn!("Using default config.");
			restore_rs::Config::default()
		}),
		None => restore_rs::Config::default(),
	};

	let (catalog_path, root_path) = match (parsed_options.free.get(0), parsed_options.free.get(1)) {
		(Some(catalog), Some(root)) => (PathBuf::from(catalog), PathBuf::from(root)),
		_ => {
			log::error!("Catalog and root project paths must be provided.");
			eprintln!("{}", opts.usage("Usage: restore-rs-terminal [options] CATALOG ROOT_PROJECT"));
			return
		},
	};

	let frameworks = parsed_options.opt_strs("f");
	let output = parsed_options.opt_str("o").map(PathBuf::from);

	match restore(config, &catalog_path, &root_path, &frameworks, output.as_deref()).await {
		Ok(true) => {},
		Ok(false) => {
			log::error!("Restore failed.");
			std::process::exit(1);
		},
		Err(e) => {
			log::error!("Restore did not complete: {}", e);
			std::process::exit(2);
		},
	}
}

fn load_catalog(path: &Path) -> Result<LibraryCatalog, Error> {
	let catalog = if path.is_dir() {
		LibraryCatalog::load_from_dir(path)?
	} else {
		LibraryCatalog::load_from_file(path)?
	};
	log::info!("Loaded {} packages and {} projects from {}", catalog.packages.len(), catalog.projects.len(), path.display());
	Ok(catalog)
}

/// Restores `root_path` against the catalog, returns whether the restore succeeded.
async fn restore(config: restore_rs::Config, catalog_path: &Path, root_path: &Path, frameworks: &[String], output: Option<&Path>) -> Result<bool, Error> {
	let catalog = Arc::new(load_catalog(catalog_path)?);
	let root: RootProject = serde_json::from_reader(std::fs::File::open(root_path)?)?;

	let mut builder = restore_rs::RestoreRequestBuilder::new(root).add_catalog(catalog);
	if !frameworks.is_empty() {
		let targets = frameworks.iter()
			.map(|f| Framework::new(f).map(Target::from))
			.collect::<restore_rs::Result<Vec<_>>>()?;
		builder = builder.targets(targets);
	}

	let parallel = config.parallel_targets();
	let request = Arc::new(builder.config(config).build());
	if request.targets().is_empty() {
		return Err(Error::NoTargets);
	}

	let result = if parallel {
		request.resolve_parallel().await?
	} else {
		request.resolve()?
	};

	let json = serde_json::to_string_pretty(&result)?;
	match output {
		Some(path) => std::fs::write(path, json)?,
		None => println!("{}", json),
	}

	Ok(result.success)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("restore-rs error: {0}")]
	RestoreRs(#[from] restore_rs::Error),
	#[error("IO: {0}")]
	IO(#[from] std::io::Error),
	#[error("Serde JSON: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("Root project has no frameworks to restore")]
	NoTargets,
}
