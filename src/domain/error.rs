//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Branch;

/// Domain errors represent violations of the knowledge tree invariants.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("path leaves the tree after {depth} steps: {path:?}")]
    PathOutOfTree { path: Vec<Branch>, depth: usize },

    #[error("path does not end at an animal: {0:?}")]
    NotALeaf(Vec<Branch>),

    #[error("animal already known: {0}")]
    DuplicateAnimal(String),

    #[error("empty {0}")]
    Empty(&'static str),
}
