use thiserror::Error;

/// Failure to obtain or decode data handed to the map by its host page.
#[derive(Debug, Error)]
pub enum SnapshotError {
	#[error("malformed JSON: {0}")]
	Json(#[from] serde_json::Error),
	#[error("no element with id `{0}`")]
	MissingElement(&'static str),
	#[error("element `{0}` has no readable text")]
	Unreadable(&'static str),
	#[error("invalid map config: {0}")]
	InvalidConfig(&'static str),
}
