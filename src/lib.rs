//! Guess the animal: a binary knowledge tree of yes/no statements that
//! grows a new question every time it guesses wrong.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
