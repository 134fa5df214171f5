//! Knowledge tree: a strictly binary tree of yes/no statements with animals at the leaves.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::{DomainError, Negation};

/// Node of the knowledge tree.
///
/// A `Question` always owns exactly two children. `yes` is the subtree for
/// animals the statement is true of, `no` the subtree for the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Leaf {
        animal: String,
    },
    Question {
        statement: String,
        yes: Box<Node>,
        no: Box<Node>,
    },
}

/// Direction taken at a `Question` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Statement confirmed true (right child)
    Yes,
    /// Statement confirmed false (left child)
    No,
}

impl From<bool> for Branch {
    fn from(answer: bool) -> Self {
        if answer {
            Branch::Yes
        } else {
            Branch::No
        }
    }
}

impl Node {
    pub fn leaf(animal: impl Into<String>) -> Self {
        Node::Leaf {
            animal: animal.into(),
        }
    }

    pub fn question(statement: impl Into<String>, yes: Node, no: Node) -> Self {
        Node::Question {
            statement: statement.into(),
            yes: Box::new(yes),
            no: Box::new(no),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Animal name for leaves, statement for questions.
    pub fn data(&self) -> &str {
        match self {
            Node::Leaf { animal } => animal,
            Node::Question { statement, .. } => statement,
        }
    }

    pub fn child(&self, branch: Branch) -> Option<&Node> {
        match (self, branch) {
            (Node::Leaf { .. }, _) => None,
            (Node::Question { yes, .. }, Branch::Yes) => Some(yes.as_ref()),
            (Node::Question { no, .. }, Branch::No) => Some(no.as_ref()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Question { yes, no, .. } => yes.leaf_count() + no.leaf_count(),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Question { yes, no, .. } => 1 + yes.node_count() + no.node_count(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data())
    }
}

/// Aggregate numbers over the per-animal fact counts.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStatistics {
    /// Statement (or animal, for a single-leaf tree) at the root
    pub root: String,
    /// Number of animals (leaves)
    pub count: usize,
    /// Fewest facts known about any animal
    pub min: usize,
    /// Most facts known about any animal
    pub max: usize,
    /// Mean number of facts per animal
    pub average: f64,
}

impl TreeStatistics {
    /// Internal nodes of a strictly binary tree with `count` leaves.
    pub fn statements(&self) -> usize {
        self.count - 1
    }

    pub fn nodes(&self) -> usize {
        2 * self.count - 1
    }

    /// Height in edges: the longest fact list.
    pub fn height(&self) -> usize {
        self.max
    }
}

/// Single owner of the root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeTree {
    root: Node,
}

impl KnowledgeTree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Minimal tree: one known animal.
    pub fn with_animal(animal: impl Into<String>) -> Self {
        Self::new(Node::leaf(animal))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn set_root(&mut self, root: Node) {
        self.root = root;
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Follow `path` from the root.
    pub fn node_at(&self, path: &[Branch]) -> Result<&Node, DomainError> {
        let mut node = &self.root;
        for (depth, branch) in path.iter().enumerate() {
            node = node
                .child(*branch)
                .ok_or_else(|| DomainError::PathOutOfTree {
                    path: path.to_vec(),
                    depth,
                })?;
        }
        Ok(node)
    }

    fn slot_mut(&mut self, path: &[Branch]) -> Result<&mut Node, DomainError> {
        let mut node = &mut self.root;
        for (depth, branch) in path.iter().enumerate() {
            node = match node {
                Node::Question { yes, no, .. } => match branch {
                    Branch::Yes => yes.as_mut(),
                    Branch::No => no.as_mut(),
                },
                Node::Leaf { .. } => {
                    return Err(DomainError::PathOutOfTree {
                        path: path.to_vec(),
                        depth,
                    })
                }
            };
        }
        Ok(node)
    }

    pub fn contains(&self, animal: &str) -> bool {
        fn walk(node: &Node, animal: &str) -> bool {
            match node {
                Node::Leaf { animal: known } => known == animal,
                Node::Question { yes, no, .. } => walk(yes, animal) || walk(no, animal),
            }
        }
        walk(&self.root, animal)
    }

    /// Replace the leaf at `path` with a question distinguishing `animal` from it.
    ///
    /// The new question holds `statement`, which must be true of `animal` and
    /// false of the animal currently at the leaf. The new animal goes to the
    /// `yes` branch, the old one to `no`. Nothing outside the slot is touched.
    #[instrument(level = "debug", skip(self, animal, statement))]
    pub fn learn(
        &mut self,
        path: &[Branch],
        animal: impl Into<String>,
        statement: impl Into<String>,
    ) -> Result<(), DomainError> {
        let animal = animal.into();
        let statement = statement.into();
        if animal.is_empty() {
            return Err(DomainError::Empty("animal"));
        }
        if statement.is_empty() {
            return Err(DomainError::Empty("statement"));
        }

        let slot = self.slot_mut(path)?;
        let Node::Leaf { animal: known } = slot else {
            return Err(DomainError::NotALeaf(path.to_vec()));
        };
        if *known == animal {
            return Err(DomainError::DuplicateAnimal(animal));
        }
        let known = std::mem::take(known);
        debug!("learn: '{}' vs '{}' by '{}'", animal, known, statement);
        *slot = Node::question(statement, Node::leaf(animal), Node::leaf(known));
        Ok(())
    }

    /// Every animal with its facts in root-to-leaf order.
    ///
    /// Facts on the `yes` side are the statement verbatim, facts on the `no`
    /// side its negation. Rebuilt on every call.
    #[instrument(level = "debug", skip_all)]
    pub fn animals<N>(&self, negation: &N) -> BTreeMap<String, Vec<String>>
    where
        N: Negation + ?Sized,
    {
        let mut animals = BTreeMap::new();
        let mut facts = Vec::new();
        collect_animals(&self.root, negation, &mut facts, &mut animals);
        animals
    }

    pub fn facts_of<N>(&self, animal: &str, negation: &N) -> Option<Vec<String>>
    where
        N: Negation + ?Sized,
    {
        self.animals(negation).remove(animal)
    }

    #[instrument(level = "debug", skip_all)]
    pub fn statistics<N>(&self, negation: &N) -> TreeStatistics
    where
        N: Negation + ?Sized,
    {
        let sizes: Vec<usize> = self.animals(negation).values().map(Vec::len).collect();
        let count = sizes.len();
        let total: usize = sizes.iter().sum();
        let stats = TreeStatistics {
            root: self.root.data().to_string(),
            count,
            min: sizes.iter().copied().min().unwrap_or(0),
            max: sizes.iter().copied().max().unwrap_or(0),
            average: if count == 0 {
                0.0
            } else {
                total as f64 / count as f64
            },
        };
        debug_assert_eq!(
            stats.nodes(),
            self.node_count(),
            "duplicate animals in tree"
        );
        stats
    }

    /// Indented rendering: questions via `ask`, leaves as the bare animal, `yes` before `no`.
    pub fn to_tree_string<F>(&self, ask: F) -> Tree<String>
    where
        F: Fn(&str) -> String,
    {
        fn render<F: Fn(&str) -> String>(node: &Node, ask: &F) -> Tree<String> {
            match node {
                Node::Leaf { animal } => Tree::new(animal.clone()),
                Node::Question { statement, yes, no } => {
                    Tree::new(ask(statement)).with_leaves([render(yes, ask), render(no, ask)])
                }
            }
        }
        render(&self.root, &ask)
    }
}

fn collect_animals<N>(
    node: &Node,
    negation: &N,
    facts: &mut Vec<String>,
    animals: &mut BTreeMap<String, Vec<String>>,
) where
    N: Negation + ?Sized,
{
    match node {
        Node::Leaf { animal } => {
            if animals.insert(animal.clone(), facts.clone()).is_some() {
                debug!("collect_animals: '{}' appears at more than one leaf", animal);
            }
        }
        Node::Question { statement, yes, no } => {
            facts.push(statement.clone());
            collect_animals(yes, negation, facts, animals);
            facts.pop();
            facts.push(negation.negate(statement));
            collect_animals(no, negation, facts, animals);
            facts.pop();
        }
    }
}
