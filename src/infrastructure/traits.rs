//! I/O boundary traits for testability
//!
//! These traits abstract the user dialogue and the filesystem, allowing
//! services to be tested with mock implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Question-and-answer channel to the player.
///
/// Every call blocks until the player answers. Answers are taken as ground
/// truth; validating the raw input is the implementation's job.
pub trait Dialogue {
    /// Ask a yes/no question.
    fn ask_yes_no(&mut self, prompt: &str) -> io::Result<bool>;

    /// Ask for a line of free text (never empty).
    fn ask_text(&mut self, prompt: &str) -> io::Result<String>;

    /// Show a message.
    fn tell(&mut self, message: &str) -> io::Result<()>;
}

const YES: [&str; 12] = [
    "y",
    "yes",
    "yeah",
    "yep",
    "sure",
    "right",
    "affirmative",
    "correct",
    "indeed",
    "you bet",
    "exactly",
    "you said it",
];

const NO: [&str; 8] = [
    "n",
    "no",
    "no way",
    "nah",
    "nope",
    "negative",
    "i don't think so",
    "yeah no",
];

/// Interpret a yes/no answer, `None` if it is neither.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    let answer = input.trim().to_lowercase();
    let answer = answer
        .strip_suffix(['.', '!'])
        .unwrap_or(answer.as_str())
        .trim_end();
    if YES.contains(&answer) {
        Some(true)
    } else if NO.contains(&answer) {
        Some(false)
    } else {
        None
    }
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Line-based dialogue over any reader/writer pair.
///
/// `ConsoleDialogue::stdio()` talks to the terminal; tests pass a `Cursor`
/// and a `Vec<u8>`.
#[derive(Debug)]
pub struct ConsoleDialogue<R, W> {
    input: R,
    output: W,
}

impl ConsoleDialogue<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleDialogue<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Dialogue for ConsoleDialogue<R, W> {
    fn ask_yes_no(&mut self, prompt: &str) -> io::Result<bool> {
        self.tell(prompt)?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let line = self.read_line()?;
            match parse_yes_no(&line) {
                Some(answer) => return Ok(answer),
                None => self.tell("Come on, yes or no?")?,
            }
        }
    }

    fn ask_text(&mut self, prompt: &str) -> io::Result<String> {
        self.tell(prompt)?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let line = self.read_line()?;
            if !line.is_empty() {
                return Ok(line);
            }
        }
    }

    fn tell(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}
