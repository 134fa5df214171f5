//! Game service
//!
//! Plays guessing rounds against the knowledge tree and grows it whenever a
//! guess is wrong.

use std::sync::Arc;

use chrono::{NaiveTime, Timelike};
use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, Language};
use crate::domain::{Branch, KnowledgeTree, Node};
use crate::infrastructure::traits::Dialogue;

/// How a round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The guess was right; the tree is unchanged.
    Guessed { animal: String },
    /// The guess was wrong and the tree learned `animal`.
    Learned {
        animal: String,
        statement: String,
        guessed: String,
    },
    /// The guess was wrong but the tree already knows `animal` elsewhere.
    AlreadyKnown { animal: String, guessed: String },
}

/// Greeting for the time of day.
pub fn greeting(time: NaiveTime) -> &'static str {
    match time.hour() {
        5..=11 => "Good morning!",
        12..=17 => "Good afternoon!",
        _ => "Good evening!",
    }
}

pub const FAREWELL: &str = "Bye!";

/// Service running game rounds.
pub struct GameService {
    language: Arc<dyn Language>,
}

impl GameService {
    pub fn new(language: Arc<dyn Language>) -> Self {
        Self { language }
    }

    /// Ask for a first animal when there is no knowledge base yet.
    #[instrument(level = "debug", skip_all)]
    pub fn bootstrap(&self, dialogue: &mut dyn Dialogue) -> ApplicationResult<KnowledgeTree> {
        let prompt = "I want to learn about animals.\nWhich animal do you like most?";
        let animal = self.ask_animal(dialogue, prompt)?;
        debug!("bootstrap: {}", animal);
        Ok(KnowledgeTree::with_animal(animal))
    }

    /// Rounds until the player declines another one.
    #[instrument(level = "debug", skip_all)]
    pub fn play(
        &self,
        tree: &mut KnowledgeTree,
        dialogue: &mut dyn Dialogue,
    ) -> ApplicationResult<Vec<RoundOutcome>> {
        let mut outcomes = Vec::new();
        loop {
            say(dialogue, "You think of an animal, and I guess it.")?;
            outcomes.push(self.play_round(tree, dialogue)?);
            let again = dialogue
                .ask_yes_no("Would you like to play again?")
                .with_context("ask to play again")?;
            if !again {
                break;
            }
        }
        Ok(outcomes)
    }

    /// One round: walk down by yes/no answers, guess, learn on a miss.
    #[instrument(level = "debug", skip_all)]
    pub fn play_round(
        &self,
        tree: &mut KnowledgeTree,
        dialogue: &mut dyn Dialogue,
    ) -> ApplicationResult<RoundOutcome> {
        let mut path = Vec::new();
        let mut node = tree.root();
        while let Node::Question { statement, yes, no } = node {
            let answer = dialogue
                .ask_yes_no(&self.language.as_question(statement))
                .with_context("ask question")?;
            path.push(Branch::from(answer));
            node = if answer { yes.as_ref() } else { no.as_ref() };
        }
        let guessed = node.data().to_string();
        debug!("play_round: guessing '{}' after {} questions", guessed, path.len());

        let correct = dialogue
            .ask_yes_no(&format!("Is it {}?", guessed))
            .with_context("ask guess")?;
        if correct {
            say(dialogue, "Great, I guessed it!")?;
            return Ok(RoundOutcome::Guessed { animal: guessed });
        }
        self.learn(tree, &path, guessed, dialogue)
    }

    fn learn(
        &self,
        tree: &mut KnowledgeTree,
        path: &[Branch],
        guessed: String,
        dialogue: &mut dyn Dialogue,
    ) -> ApplicationResult<RoundOutcome> {
        let animal = self.ask_animal(dialogue, "I give up. What animal do you have in mind?")?;
        if tree.contains(&animal) {
            say(
                dialogue,
                &format!(
                    "I already know {}, but I didn't get there this time.",
                    animal
                ),
            )?;
            return Ok(RoundOutcome::AlreadyKnown { animal, guessed });
        }

        let prompt = format!(
            "Specify a fact that distinguishes {} from {}.",
            animal, guessed
        );
        let statement = loop {
            let input = dialogue.ask_text(&prompt).with_context("ask statement")?;
            match self.language.parse_statement(&input) {
                Some(statement) => break statement,
                None => say(dialogue, self.language.statement_hint())?,
            }
        };

        tree.learn(path, animal.clone(), statement.clone())?;

        let language = &self.language;
        say(dialogue, "I have learned the following facts about animals:")?;
        say(
            dialogue,
            &format!(" - {}", language.describe(&guessed, &language.negate(&statement))),
        )?;
        say(
            dialogue,
            &format!(" - {}", language.describe(&animal, &statement)),
        )?;
        say(
            dialogue,
            "I can distinguish these animals by asking the question:",
        )?;
        say(dialogue, &format!(" - {}", language.as_question(&statement)))?;
        say(dialogue, "Nice! I've learned so much about animals!")?;

        Ok(RoundOutcome::Learned {
            animal,
            statement,
            guessed,
        })
    }

    fn ask_animal(&self, dialogue: &mut dyn Dialogue, prompt: &str) -> ApplicationResult<String> {
        loop {
            let input = dialogue.ask_text(prompt).with_context("ask animal")?;
            let animal = self.language.normalize_animal(&input);
            if !animal.is_empty() {
                return Ok(animal);
            }
        }
    }
}

fn say(dialogue: &mut dyn Dialogue, message: &str) -> ApplicationResult<()> {
    dialogue.tell(message).with_context("tell")
}
