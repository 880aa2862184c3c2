//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("walkdir error: {0}")]
	WalkDir(#[from] walkdir::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("invalid metadata: {0}")]
	InvalidMetadata(String),
	#[error("provider error: {0}")]
	Provider(String),
	#[error("version selection did not settle after {0} passes")]
	SelectionDidNotConverge(usize),
	#[error("restore was cancelled")]
	Cancelled,
	#[error("target task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
}
