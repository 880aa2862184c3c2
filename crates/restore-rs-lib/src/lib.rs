pub mod error;
pub use error::Result;
pub use error::Error;

pub mod config;
pub use config::Config;

pub mod library;
pub mod diagnostics;
pub mod provider;
pub mod warnings;

pub mod relationship_resolver;
pub use relationship_resolver::RestoreRequestBuilder;
pub use relationship_resolver::RestoreRequest;
pub use relationship_resolver::RestoreResult;
