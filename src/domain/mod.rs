//! Domain layer: the knowledge tree and its rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod negation;
pub mod tree;

pub use error::DomainError;
pub use negation::{Negation, NotPrefix};
pub use tree::{Branch, KnowledgeTree, Node, TreeStatistics};
