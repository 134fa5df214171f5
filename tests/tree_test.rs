//! Tests for the knowledge tree: learning, enumeration and statistics

use rstest::{fixture, rstest};

use animals::domain::{Branch, KnowledgeTree, Negation, Node, NotPrefix};

#[fixture]
fn cat_dog() -> KnowledgeTree {
    let mut tree = KnowledgeTree::with_animal("dog");
    tree.learn(&[], "cat", "It meows").unwrap();
    tree
}

#[fixture]
fn cat_bird_dog(mut cat_dog: KnowledgeTree) -> KnowledgeTree {
    cat_dog.learn(&[Branch::No], "bird", "It can fly").unwrap();
    cat_dog
}

#[rstest]
fn given_single_leaf_when_learning_then_root_becomes_question(cat_dog: KnowledgeTree) {
    assert_eq!(
        cat_dog.root(),
        &Node::question("It meows", Node::leaf("cat"), Node::leaf("dog"))
    );

    let animals = cat_dog.animals(&NotPrefix);
    assert_eq!(animals.len(), 2);
    assert_eq!(animals["cat"], vec!["It meows"]);
    assert_eq!(animals["dog"], vec!["NOT It meows"]);
}

#[rstest]
fn given_deeper_leaf_when_learning_then_only_that_slot_changes(
    cat_dog: KnowledgeTree,
    cat_bird_dog: KnowledgeTree,
) {
    assert_eq!(
        cat_bird_dog.node_at(&[Branch::Yes]),
        cat_dog.node_at(&[Branch::Yes])
    );
    assert_eq!(
        cat_bird_dog.node_at(&[Branch::No]).unwrap(),
        &Node::question("It can fly", Node::leaf("bird"), Node::leaf("dog"))
    );
    assert_eq!(cat_bird_dog.root().data(), "It meows");
    assert_eq!(cat_bird_dog.leaf_count(), 3);
}

#[rstest]
fn given_three_animals_when_enumerating_then_facts_follow_root_to_leaf_order(
    cat_bird_dog: KnowledgeTree,
) {
    let animals = cat_bird_dog.animals(&NotPrefix);

    assert_eq!(
        animals.keys().cloned().collect::<Vec<_>>(),
        vec!["bird", "cat", "dog"]
    );
    assert_eq!(animals["bird"], vec!["NOT It meows", "It can fly"]);
    assert_eq!(animals["dog"], vec!["NOT It meows", "NOT It can fly"]);
}

#[rstest]
fn given_three_animals_when_computing_statistics_then_depths_are_aggregated(
    cat_bird_dog: KnowledgeTree,
) {
    let stats = cat_bird_dog.statistics(&NotPrefix);

    assert_eq!(stats.root, "It meows");
    assert_eq!(stats.count, 3);
    assert_eq!(stats.min, 1);
    assert_eq!(stats.max, 2);
    assert!((stats.average - 5.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.statements(), 2);
    assert_eq!(stats.nodes(), 5);
    assert_eq!(stats.height(), 2);
}

#[rstest]
fn given_learning_sequence_when_growing_then_count_identities_hold() {
    let mut tree = KnowledgeTree::with_animal("a0");
    let mut path = Vec::new();
    for i in 1..=6 {
        tree.learn(&path, format!("a{}", i), format!("fact {}", i))
            .unwrap();
        // alternate so the tree gets both deep and wide
        path.push(if i % 2 == 0 { Branch::Yes } else { Branch::No });

        let stats = tree.statistics(&NotPrefix);
        assert_eq!(tree.leaf_count(), i + 1);
        assert_eq!(tree.node_count(), 2 * tree.leaf_count() - 1);
        assert_eq!(stats.nodes(), tree.node_count());
        assert!(stats.min as f64 <= stats.average && stats.average <= stats.max as f64);
    }
}

#[rstest]
fn given_tree_when_learning_fails_then_tree_is_unchanged(cat_dog: KnowledgeTree) {
    let before = cat_dog.clone();
    let mut tree = cat_dog;

    assert!(tree.learn(&[Branch::Yes, Branch::Yes], "cow", "It moos").is_err());
    assert!(tree.learn(&[Branch::No], "dog", "It barks").is_err());

    assert_eq!(tree, before);
}

#[rstest]
fn given_closure_negation_when_enumerating_then_it_is_used(cat_dog: KnowledgeTree) {
    let negation = |s: &str| format!("{} (false)", s);
    let facts = cat_dog.facts_of("dog", &negation).unwrap();
    assert_eq!(facts, vec!["It meows (false)"]);
    assert_eq!(negation.negate("x"), "x (false)");
    assert!(cat_dog.facts_of("cow", &NotPrefix).is_none());
}

#[rstest]
fn given_tree_when_rendering_then_yes_comes_before_no(cat_bird_dog: KnowledgeTree) {
    let rendered = cat_bird_dog
        .to_tree_string(|s| format!("{}?", s))
        .to_string();

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "It meows?");
    assert!(lines[1].ends_with("cat"));
    assert!(lines[2].ends_with("It can fly?"));
    assert!(lines[3].ends_with("bird"));
    assert!(lines[4].ends_with("dog"));
    assert_eq!(lines.len(), 5);
}

#[rstest]
fn given_loaded_root_when_replacing_then_tree_uses_it(mut cat_dog: KnowledgeTree) {
    cat_dog.set_root(Node::leaf("cow"));

    assert_eq!(cat_dog, KnowledgeTree::with_animal("cow"));
    assert_eq!(cat_dog.statistics(&NotPrefix).root, "cow");
}
