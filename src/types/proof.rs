use serde::{Deserialize, Serialize};

/// A citation pointing at the source chunk that supported part of a reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proof {
    /// Identifier of the chunk within the project's index.
    pub chunk_id: i64,

    /// Name of the document the chunk was cut from.
    pub file_name: String,

    /// Similarity between the query and the chunk, as scored by the backend.
    pub similarity_score: f64,
}

impl Proof {
    /// Creates a new Proof
    pub fn new(chunk_id: i64, file_name: impl Into<String>, similarity_score: f64) -> Self {
        Self {
            chunk_id,
            file_name: file_name.into(),
            similarity_score,
        }
    }
}

/// Returns the distinct file names cited by `proofs`, in order of first occurrence.
///
/// This is what the renderer shows as proof chips; chunk ids and scores are not
/// displayed.
pub fn unique_file_names(proofs: &[Proof]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::with_capacity(proofs.len());
    for proof in proofs {
        if !names.contains(&proof.file_name.as_str()) {
            names.push(&proof.file_name);
        }
    }
    names
}
