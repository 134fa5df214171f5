//! Tests for knowledge queries with English phrasing

use std::sync::Arc;

use rstest::{fixture, rstest};

use animals::application::services::{AnimalFacts, KnowledgeService};
use animals::application::English;
use animals::domain::{KnowledgeTree, Node};

#[fixture]
fn service() -> KnowledgeService {
    KnowledgeService::new(Arc::new(English::default()))
}

#[fixture]
fn tree() -> KnowledgeTree {
    KnowledgeTree::new(Node::question(
        "It can fly",
        Node::leaf("an owl"),
        Node::question("It has horns", Node::leaf("a goat"), Node::leaf("a dog")),
    ))
}

#[rstest]
fn given_tree_when_listing_then_bare_names_are_sorted(
    service: KnowledgeService,
    tree: KnowledgeTree,
) {
    assert_eq!(service.list_animals(&tree), vec!["dog", "goat", "owl"]);
}

#[rstest]
#[case("Goat")]
#[case("the goat")]
#[case("a goat.")]
fn given_any_spelling_when_searching_then_facts_are_sentences(
    service: KnowledgeService,
    tree: KnowledgeTree,
    #[case] input: &str,
) {
    let found = service.search(&tree, input).unwrap();

    assert_eq!(
        found,
        AnimalFacts {
            animal: "a goat".into(),
            facts: vec!["The goat can't fly.".into(), "The goat has horns.".into()],
        }
    );
}

#[rstest]
fn given_unknown_animal_when_searching_then_none(service: KnowledgeService, tree: KnowledgeTree) {
    assert!(service.search(&tree, "shark").is_none());
}

#[rstest]
fn given_tree_when_rendering_then_questions_are_phrased(
    service: KnowledgeService,
    tree: KnowledgeTree,
) {
    let rendered = service.render(&tree);

    assert!(rendered.starts_with("Can it fly?\n"));
    assert!(rendered.contains("Does it have horns?"));
    assert_eq!(service.root_label(&tree), "Can it fly?");
    assert_eq!(
        service.root_label(&KnowledgeTree::with_animal("a dog")),
        "a dog"
    );
}

#[rstest]
fn given_tree_when_computing_statistics_then_english_negation_is_used(
    service: KnowledgeService,
    tree: KnowledgeTree,
) {
    let stats = service.statistics(&tree);

    assert_eq!((stats.count, stats.min, stats.max), (3, 1, 2));
    assert_eq!(stats.root, "It can fly");
}
