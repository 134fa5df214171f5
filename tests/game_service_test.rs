//! Tests for guessing rounds driven by a scripted dialogue

use std::sync::Arc;

use rstest::rstest;

use animals::application::services::{GameService, RoundOutcome};
use animals::application::{English, Plain};
use animals::domain::{Branch, KnowledgeTree, Node, NotPrefix};
use animals::util::testing::{init_test_setup, ScriptedDialogue};

fn plain_game() -> GameService {
    init_test_setup();
    GameService::new(Arc::new(Plain))
}

fn cat_dog() -> KnowledgeTree {
    KnowledgeTree::new(Node::question(
        "It meows",
        Node::leaf("cat"),
        Node::leaf("dog"),
    ))
}

#[test]
fn given_single_leaf_when_guess_is_wrong_then_tree_learns() {
    let game = plain_game();
    let mut tree = KnowledgeTree::with_animal("dog");
    let mut dialogue = ScriptedDialogue::new(["no", "cat", "It meows"]);

    let outcome = game.play_round(&mut tree, &mut dialogue).unwrap();

    assert_eq!(
        outcome,
        RoundOutcome::Learned {
            animal: "cat".into(),
            statement: "It meows".into(),
            guessed: "dog".into(),
        }
    );
    assert_eq!(tree, cat_dog());
    assert_eq!(dialogue.prompts[0], "Is it dog?");
    assert_eq!(dialogue.remaining(), 0);
}

#[test]
fn given_known_animal_when_guess_is_right_then_tree_is_unchanged() {
    let game = plain_game();
    let mut tree = cat_dog();
    let mut dialogue = ScriptedDialogue::new(["yes", "yes"]);

    let outcome = game.play_round(&mut tree, &mut dialogue).unwrap();

    assert_eq!(outcome, RoundOutcome::Guessed { animal: "cat".into() });
    assert_eq!(tree, cat_dog());
    assert_eq!(dialogue.prompts, vec!["It meows", "Is it cat?"]);
    assert!(dialogue.transcript().contains("Great, I guessed it!"));
}

#[test]
fn given_two_animals_when_missing_on_no_branch_then_left_subtree_grows() {
    let game = plain_game();
    let mut tree = cat_dog();
    let mut dialogue = ScriptedDialogue::new(["no", "no", "bird", "It can fly"]);

    game.play_round(&mut tree, &mut dialogue).unwrap();

    assert_eq!(
        tree.node_at(&[Branch::No]).unwrap(),
        &Node::question("It can fly", Node::leaf("bird"), Node::leaf("dog"))
    );
    assert_eq!(tree.leaf_count(), 3);
    let stats = tree.statistics(&NotPrefix);
    assert_eq!((stats.min, stats.max), (1, 2));
}

#[test]
fn given_animal_known_elsewhere_when_guess_is_wrong_then_nothing_is_learned() {
    let game = plain_game();
    let mut tree = cat_dog();
    let mut dialogue = ScriptedDialogue::new(["no", "no", "cat"]);

    let outcome = game.play_round(&mut tree, &mut dialogue).unwrap();

    assert_eq!(
        outcome,
        RoundOutcome::AlreadyKnown {
            animal: "cat".into(),
            guessed: "dog".into(),
        }
    );
    assert_eq!(tree, cat_dog());
}

#[test]
fn given_blank_statement_when_learning_then_statement_is_asked_again() {
    let game = plain_game();
    let mut tree = KnowledgeTree::with_animal("dog");
    let mut dialogue = ScriptedDialogue::new(["no", "cat", "   ", "It meows"]);

    game.play_round(&mut tree, &mut dialogue).unwrap();

    assert_eq!(tree, cat_dog());
    assert!(dialogue
        .transcript()
        .contains("The statement must not be empty."));
}

#[test]
fn given_no_knowledge_base_when_bootstrapping_then_favourite_animal_is_root() {
    let game = plain_game();
    let mut dialogue = ScriptedDialogue::new(["  ", "dog"]);

    let tree = game.bootstrap(&mut dialogue).unwrap();

    assert_eq!(tree, KnowledgeTree::with_animal("dog"));
    assert_eq!(dialogue.prompts.len(), 2);
}

#[test]
fn given_play_when_player_declines_then_rounds_stop() {
    let game = plain_game();
    let mut tree = KnowledgeTree::with_animal("dog");
    let mut dialogue = ScriptedDialogue::new([
        "no", "cat", "It meows", // round 1 learns
        "yes",                   // play again
        "yes", "yes", // round 2 guesses cat
        "no",         // stop
    ]);

    let outcomes = game.play(&mut tree, &mut dialogue).unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[1], RoundOutcome::Guessed { .. }));
    assert_eq!(dialogue.remaining(), 0);
}

#[test]
fn given_closed_input_when_playing_then_error_keeps_learned_tree() {
    let game = plain_game();
    let mut tree = KnowledgeTree::with_animal("dog");
    let mut dialogue = ScriptedDialogue::new(["no", "cat", "It meows"]);

    assert!(game.play(&mut tree, &mut dialogue).is_err());
    assert_eq!(tree, cat_dog());
}

#[rstest]
#[case("It can swim", "Can it swim?")]
#[case("it has a tail.", "Does it have a tail?")]
fn given_english_rules_when_learning_then_statement_is_normalized(
    #[case] input: &str,
    #[case] question: &str,
) {
    init_test_setup();
    let game = GameService::new(Arc::new(English::default()));
    let mut tree = KnowledgeTree::with_animal("a cat");
    let mut dialogue = ScriptedDialogue::new(["no", "Shark", "it flies", input]);

    game.play_round(&mut tree, &mut dialogue).unwrap();

    assert_eq!(dialogue.prompts[0], "Is it a cat?");
    assert_eq!(
        dialogue.prompts[2],
        "Specify a fact that distinguishes a shark from a cat."
    );
    // "it flies" is rejected, the hint is shown, then the statement is asked again
    assert_eq!(dialogue.prompts.len(), 4);
    assert_eq!(tree.root().child(Branch::Yes).unwrap().data(), "a shark");
    assert!(dialogue.told.iter().any(|line| line.ends_with(question)));
}
