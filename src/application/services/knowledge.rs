//! Knowledge queries
//!
//! Read-only views on the knowledge tree: listing, search, statistics and
//! the printed tree.

use std::sync::Arc;

use itertools::Itertools;
use tracing::instrument;

use crate::application::Language;
use crate::domain::{KnowledgeTree, TreeStatistics};

/// Everything known about one animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalFacts {
    pub animal: String,
    /// Facts as sentences, root-to-leaf order
    pub facts: Vec<String>,
}

/// Service answering questions about the knowledge tree.
pub struct KnowledgeService {
    language: Arc<dyn Language>,
}

impl KnowledgeService {
    pub fn new(language: Arc<dyn Language>) -> Self {
        Self { language }
    }

    /// Animal names without articles, sorted.
    #[instrument(level = "debug", skip_all)]
    pub fn list_animals(&self, tree: &KnowledgeTree) -> Vec<String> {
        tree.animals(self.language.as_ref())
            .keys()
            .map(|animal| self.language.bare_name(animal).to_string())
            .sorted()
            .collect()
    }

    /// Facts about one animal; `None` if the tree does not know it.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn search(&self, tree: &KnowledgeTree, input: &str) -> Option<AnimalFacts> {
        let animal = self.language.normalize_animal(input);
        let facts = tree.facts_of(&animal, self.language.as_ref())?;
        let facts = facts
            .iter()
            .map(|fact| self.language.describe(&animal, fact))
            .collect();
        Some(AnimalFacts { animal, facts })
    }

    pub fn statistics(&self, tree: &KnowledgeTree) -> TreeStatistics {
        tree.statistics(self.language.as_ref())
    }

    /// Statistics root rendered for display: a question, or the lone animal.
    pub fn root_label(&self, tree: &KnowledgeTree) -> String {
        let root = tree.root();
        if root.is_leaf() {
            root.data().to_string()
        } else {
            self.language.as_question(root.data())
        }
    }

    /// The tree with questions phrased as questions.
    pub fn render(&self, tree: &KnowledgeTree) -> String {
        tree.to_tree_string(|statement| self.language.as_question(statement))
            .to_string()
    }
}
