//! Test helpers: logging setup and in-memory stand-ins for the I/O traits.

use std::collections::{HashMap, VecDeque};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::infrastructure::traits::{parse_yes_no, Dialogue, FileSystem};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let module_filter = filter_fn(|metadata| metadata.target().starts_with("animals"));
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Dialogue playing back canned answers.
///
/// Yes/no prompts accept anything `parse_yes_no` understands. When the
/// script runs out every further question fails with `UnexpectedEof`, the
/// same way the console does on a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedDialogue {
    answers: VecDeque<String>,
    /// Every question asked, in order.
    pub prompts: Vec<String>,
    /// Every message shown, in order.
    pub told: Vec<String>,
}

impl ScriptedDialogue {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// All messages shown, one per line.
    pub fn transcript(&self) -> String {
        self.told.join("\n")
    }

    fn next_answer(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("script exhausted at: {}", prompt),
            )
        })
    }
}

impl Dialogue for ScriptedDialogue {
    fn ask_yes_no(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.next_answer(prompt)?;
        parse_yes_no(&answer).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a yes/no answer: {}", answer),
            )
        })
    }

    fn ask_text(&mut self, prompt: &str) -> io::Result<String> {
        self.next_answer(prompt)
    }

    fn tell(&mut self, message: &str) -> io::Result<()> {
        self.told.push(message.to_string());
        Ok(())
    }
}

/// Filesystem kept in a map, for storage tests without a disk.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let fs = Self::default();
        fs.insert(path, content);
        fs
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.lock().insert(path.into(), content.into());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.lock().get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.insert(path, content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn ensure_parent(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

// test
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn test_scripted_dialogue_plays_back_and_records() {
        let mut dialogue = ScriptedDialogue::new(["yes", "a cat"]);

        assert!(dialogue.ask_yes_no("Ready?").unwrap());
        assert_eq!(dialogue.ask_text("Animal?").unwrap(), "a cat");
        dialogue.tell("done").unwrap();

        assert_eq!(dialogue.prompts, vec!["Ready?", "Animal?"]);
        assert_eq!(dialogue.transcript(), "done");
        let err = dialogue.ask_text("More?").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
