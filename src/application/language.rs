//! Language rules: how animals and statements are phrased
//!
//! The tree treats statements as opaque strings. Everything that depends on
//! grammar (articles, negation, turning a statement into a question) lives
//! behind the [`Language`] trait.

use std::sync::Arc;

use clap::ValueEnum;
use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::{Negation, NotPrefix};

pub trait Language: Negation + Send + Sync {
    /// Canonical form of an animal name as typed by the user.
    fn normalize_animal(&self, input: &str) -> String;

    /// Animal name without any article.
    fn bare_name<'a>(&self, animal: &'a str) -> &'a str {
        animal
    }

    /// Canonical form of a statement, `None` if it is not acceptable.
    fn parse_statement(&self, input: &str) -> Option<String>;

    fn as_question(&self, statement: &str) -> String;

    /// A fact about `animal` as a sentence.
    fn describe(&self, animal: &str, fact: &str) -> String {
        format!("{}: {}", animal, fact)
    }

    /// Shown when `parse_statement` rejects the input.
    fn statement_hint(&self) -> &'static str {
        "The statement must not be empty."
    }
}

/// Selectable rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    #[default]
    English,
    Plain,
}

impl LanguageKind {
    pub fn rules(self) -> Arc<dyn Language> {
        match self {
            LanguageKind::English => Arc::new(English::default()),
            LanguageKind::Plain => Arc::new(Plain),
        }
    }
}

/// (affirmative prefix, negated prefix, question prefix)
const VERBS: [(&str, &str, &str); 3] = [
    ("It can ", "It can't ", "Can it "),
    ("It has ", "It doesn't have ", "Does it have "),
    ("It is ", "It isn't ", "Is it "),
];

const ARTICLES: [&str; 3] = ["a ", "an ", "the "];

/// English phrasing: "It can fly" / "It can't fly" / "Can it fly?".
#[derive(Debug, Clone)]
pub struct English {
    statement: Regex,
}

impl Default for English {
    fn default() -> Self {
        Self {
            statement: Regex::new(r"(?i)^it\s+(can|has|is)\s+\S").expect("valid statement pattern"),
        }
    }
}

impl English {
    fn article_for(noun: &str) -> &'static str {
        match noun.chars().next() {
            Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
            _ => "a",
        }
    }
}

fn trim_sentence(input: &str) -> &str {
    input
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .trim_end()
}

impl Negation for English {
    fn negate(&self, statement: &str) -> String {
        for (positive, negative, _) in VERBS {
            if let Some(rest) = statement.strip_prefix(positive) {
                return format!("{}{}", negative, rest);
            }
            if let Some(rest) = statement.strip_prefix(negative) {
                return format!("{}{}", positive, rest);
            }
        }
        format!("It is not true that {}", statement)
    }
}

impl Language for English {
    fn normalize_animal(&self, input: &str) -> String {
        let name = trim_sentence(input).to_lowercase();
        let name = name.split_whitespace().join(" ");
        if name.is_empty() || name.starts_with("a ") || name.starts_with("an ") {
            return name;
        }
        let noun = name.strip_prefix("the ").unwrap_or(&name);
        format!("{} {}", Self::article_for(noun), noun)
    }

    fn bare_name<'a>(&self, animal: &'a str) -> &'a str {
        ARTICLES
            .iter()
            .find_map(|article| animal.strip_prefix(article))
            .unwrap_or(animal)
    }

    fn parse_statement(&self, input: &str) -> Option<String> {
        let sentence = trim_sentence(input);
        let caps = self.statement.captures(sentence)?;
        let verb = caps.get(1)?;
        let rest = sentence[verb.end()..].trim_start();
        Some(format!("It {} {}", verb.as_str().to_lowercase(), rest))
    }

    fn as_question(&self, statement: &str) -> String {
        VERBS
            .iter()
            .find_map(|(positive, _, question)| {
                statement
                    .strip_prefix(positive)
                    .map(|rest| format!("{}{}?", question, rest))
            })
            .unwrap_or_else(|| format!("{}?", statement))
    }

    fn describe(&self, animal: &str, fact: &str) -> String {
        match fact.strip_prefix("It ") {
            Some(rest) => format!("The {} {}.", self.bare_name(animal), rest),
            None => format!("{}: {}.", self.bare_name(animal), fact),
        }
    }

    fn statement_hint(&self) -> &'static str {
        "The statement should be of the form 'It can ...', 'It has ...' or 'It is ...'."
    }
}

/// Deterministic stand-in: `NOT ` prefix negation, everything else verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Negation for Plain {
    fn negate(&self, statement: &str) -> String {
        NotPrefix.negate(statement)
    }
}

impl Language for Plain {
    fn normalize_animal(&self, input: &str) -> String {
        input.trim().to_string()
    }

    fn parse_statement(&self, input: &str) -> Option<String> {
        let statement = input.trim();
        (!statement.is_empty()).then(|| statement.to_string())
    }

    fn as_question(&self, statement: &str) -> String {
        statement.to_string()
    }
}
