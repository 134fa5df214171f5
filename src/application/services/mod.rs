//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (Dialogue) and the language rules
//! but are themselves concrete structs, not traits.

mod game;
mod knowledge;

pub use game::{greeting, GameService, RoundOutcome, FAREWELL};
pub use knowledge::{AnimalFacts, KnowledgeService};
