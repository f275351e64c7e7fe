//! Error types for store validation and document persistence.

/// Reasons the store refuses to create an edge.
///
/// Rejections are silent from the user's point of view: callers log them and
/// carry on with the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EdgeRejected {
	/// Both endpoints are the same node.
	#[error("edge would connect node {node} to itself")]
	SelfLoop {
		/// The node on both ends.
		node: String,
	},

	/// An endpoint is not in the store.
	#[error("edge endpoint {node} does not exist")]
	MissingEndpoint {
		/// The absent node id.
		node: String,
	},

	/// The pair is already connected, in either direction.
	#[error("nodes {source_id} and {target_id} are already connected by edge {existing}")]
	DuplicatePair {
		/// Requested source.
		source_id: String,
		/// Requested target.
		target_id: String,
		/// Id of the edge already joining them.
		existing: String,
	},

	/// A restored edge reuses an id.
	#[error("edge id {edge} is already in use")]
	DuplicateId {
		/// The clashing id.
		edge: String,
	},
}

/// Failures while reading or writing a graph document.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
	/// Text is not JSON or lacks the `nodes`/`edges` arrays.
	#[error("could not read graph document: {0}")]
	Parse(#[source] serde_json::Error),

	/// Serialization failed.
	#[error("could not write graph document: {0}")]
	Serialize(#[source] serde_json::Error),
}

/// Result alias for document load and save.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
