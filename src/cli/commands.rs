//! Command dispatch
//!
//! Every command except `config` and `completion` runs a session: load the
//! knowledge base (or bootstrap one), run the command against the tree and
//! save the tree if it changed.

use std::io;

use chrono::Local;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, info, instrument};

use crate::application::services::{greeting, AnimalFacts, FAREWELL};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{KnowledgeTree, TreeStatistics};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{ConsoleDialogue, Dialogue};
use crate::infrastructure::{InfraError, TreeStore};

const MENU: &str = "\
What do you want to do:

1. Play the guessing game
2. List of all animals
3. Search for an animal
4. Calculate statistics
5. Print the Knowledge Tree
0. Exit";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            _completion(*shell);
            Ok(())
        }
        command => {
            let settings = load_settings(cli)?;
            let container = ServiceContainer::new(settings);
            let mut dialogue = ConsoleDialogue::stdio();
            run_session(&container, command.as_ref(), &mut dialogue)
        }
    }
}

/// Settings from config layers plus command line overrides.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?;
    let mut settings = Settings::load(Some(&cwd))?;
    apply_cli_overrides(&mut settings, cli);
    Ok(settings)
}

pub fn apply_cli_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(format) = cli.format {
        settings.format = format;
    }
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    if let Some(language) = cli.language {
        settings.language = language;
    }
}

/// Load, run `command` (menu if `None`), save if the tree changed.
///
/// The tree is saved even when the command fails half way, so nothing
/// learned before the failure is lost.
#[instrument(level = "debug", skip(container, dialogue))]
pub fn run_session(
    container: &ServiceContainer,
    command: Option<&Commands>,
    dialogue: &mut dyn Dialogue,
) -> CliResult<()> {
    let store = container.store();
    let loaded = store.load();
    let mut tree = match &loaded {
        Some(root) => KnowledgeTree::new(root.clone()),
        None => container.game().bootstrap(dialogue)?,
    };

    let result = match command {
        None => _menu(container, &mut tree, dialogue),
        Some(Commands::Play) => _play(container, &mut tree, dialogue),
        Some(Commands::List) => _list(container, &tree, dialogue),
        Some(Commands::Search { animal }) => _search(container, &tree, animal, dialogue),
        Some(Commands::Stats) => _stats(container, &tree, dialogue),
        Some(Commands::Print) => _print(container, &tree, dialogue),
        Some(Commands::Config { .. }) | Some(Commands::Completion { .. }) => Err(
            CliError::Usage("not a knowledge base command".to_string()),
        ),
    };

    if loaded.as_ref() != Some(tree.root()) {
        save(&store, &tree);
    }
    result
}

/// Save failures are reported but never fatal.
fn save(store: &dyn TreeStore, tree: &KnowledgeTree) {
    match store.save(tree.root()) {
        Ok(()) => info!("knowledge base saved: {}", store.location()),
        Err(e) => output::warning(&format!(
            "cannot save knowledge base {}: {}",
            store.location(),
            e
        )),
    }
}

fn tell(dialogue: &mut dyn Dialogue, message: &str) -> CliResult<()> {
    dialogue
        .tell(message)
        .map_err(|e| InfraError::io("write to terminal", e).into())
}

#[instrument(level = "debug", skip_all)]
fn _menu(
    container: &ServiceContainer,
    tree: &mut KnowledgeTree,
    dialogue: &mut dyn Dialogue,
) -> CliResult<()> {
    tell(dialogue, greeting(Local::now().time()))?;
    loop {
        let choice = dialogue
            .ask_text(MENU)
            .map_err(|e| InfraError::io("read menu choice", e))?;
        debug!("menu: {}", choice);
        match choice.trim() {
            "1" => {
                container.game().play_round(tree, dialogue)?;
            }
            "2" => _list(container, tree, dialogue)?,
            "3" => {
                let animal = dialogue
                    .ask_text("Enter the animal:")
                    .map_err(|e| InfraError::io("read animal", e))?;
                _search(container, tree, &animal, dialogue)?;
            }
            "4" => _stats(container, tree, dialogue)?,
            "5" => _print(container, tree, dialogue)?,
            "0" => break,
            _ => tell(dialogue, "Please enter the number from 0 up to 5")?,
        }
    }
    tell(dialogue, FAREWELL)
}

#[instrument(level = "debug", skip_all)]
fn _play(
    container: &ServiceContainer,
    tree: &mut KnowledgeTree,
    dialogue: &mut dyn Dialogue,
) -> CliResult<()> {
    tell(dialogue, greeting(Local::now().time()))?;
    let outcomes = container.game().play(tree, dialogue)?;
    debug!("play: {} rounds", outcomes.len());
    tell(dialogue, FAREWELL)
}

fn _list(
    container: &ServiceContainer,
    tree: &KnowledgeTree,
    dialogue: &mut dyn Dialogue,
) -> CliResult<()> {
    tell(dialogue, "Here are the animals I know:")?;
    for animal in container.knowledge().list_animals(tree) {
        tell(dialogue, &format!(" - {}", animal))?;
    }
    Ok(())
}

fn _search(
    container: &ServiceContainer,
    tree: &KnowledgeTree,
    input: &str,
    dialogue: &mut dyn Dialogue,
) -> CliResult<()> {
    let animal = container.language.normalize_animal(input);
    let name = container.language.bare_name(&animal);
    match container.knowledge().search(tree, input) {
        Some(AnimalFacts { facts, .. }) if !facts.is_empty() => {
            tell(dialogue, &format!("Facts about the {}:", name))?;
            for fact in facts {
                tell(dialogue, &format!(" - {}", fact))?;
            }
        }
        Some(_) => tell(
            dialogue,
            &format!("The {} is the only animal I know so far.", name),
        )?,
        None => tell(dialogue, &format!("No facts about the {}.", name))?,
    }
    Ok(())
}

fn _stats(
    container: &ServiceContainer,
    tree: &KnowledgeTree,
    dialogue: &mut dyn Dialogue,
) -> CliResult<()> {
    let knowledge = container.knowledge();
    let stats = knowledge.statistics(tree);
    for line in statistics_lines(&knowledge.root_label(tree), &stats) {
        tell(dialogue, &line)?;
    }
    Ok(())
}

/// Statistics report, one line per entry.
pub fn statistics_lines(root: &str, stats: &TreeStatistics) -> Vec<String> {
    let rows = [
        ("root node", root.to_string()),
        ("total number of nodes", stats.nodes().to_string()),
        ("total number of animals", stats.count.to_string()),
        ("total number of statements", stats.statements().to_string()),
        ("height of the tree", stats.height().to_string()),
        ("minimum animal's depth", stats.min.to_string()),
        ("average animal's depth", format!("{:.1}", stats.average)),
    ];
    let mut lines = vec!["The Knowledge Tree stats".to_string(), String::new()];
    lines.extend(
        rows.iter()
            .map(|(label, value)| format!("- {:<30} {}", label, value)),
    );
    lines
}

fn _print(
    container: &ServiceContainer,
    tree: &KnowledgeTree,
    dialogue: &mut dyn Dialogue,
) -> CliResult<()> {
    let rendered = container.knowledge().render(tree);
    tell(dialogue, rendered.trim_end())
}

#[instrument(level = "debug")]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let settings = load_settings(cli)?;
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".to_string());
            let cwd =
                std::env::current_dir().map_err(|e| InfraError::io("current directory", e))?;
            output::action("global", &global);
            output::action("local", &local_config_path(&cwd).display());
            output::action("knowledge base", &settings.knowledge_base_path().display());
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path()
                    .ok_or_else(|| CliError::Usage("no config directory on this system".into()))?
            } else {
                let cwd = std::env::current_dir()
                    .map_err(|e| InfraError::io("current directory", e))?;
                local_config_path(&cwd)
            };
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| InfraError::io(format!("create {}", parent.display()), e))?;
            }
            std::fs::write(&path, Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
        }
    }
    Ok(())
}

fn _completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    eprintln!("Generating completion file for {shell:?}...");
    generate(shell, &mut cmd, name, &mut io::stdout());
}
