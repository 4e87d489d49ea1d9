//! Implementation of the `git flow init` command.
//!
//! # What `git flow init` does
//!
//! 1. Creates the repository if the directory is not one yet, otherwise
//!    requires a clean working tree (unless nothing is committed yet)
//! 2. Refuses to run again on an initialized repository without `-f`
//! 3. Chooses the production and integration branch names, prompting on
//!    stdin unless `-d` is given
//! 4. Creates an initial commit and the integration branch when missing
//! 5. Stores the branch names and the supporting-branch prefixes

use crate::cli::InitArgs;
use crate::config::types::*;
use crate::config::{ConfigStore, FlowConfig, GitConfigStore, Prefixes};
use crate::context::{STATE_DIR, current_dir};
use crate::error::{FlowError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::git::{Git, Verbosity};
use crate::guards::require_clean_working_tree;
use crate::repo;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Production branch names tried, in order, when guessing a default.
const MASTER_GUESSES: &[&str] = &["production", "main", "master"];

/// Integration branch names tried, in order, when guessing a default.
const DEVELOP_GUESSES: &[&str] = &["develop", "int", "integration", "master"];

/// Options for initialization.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InitOptions {
    pub force: bool,
    pub defaults: bool,
}

/// Execute the `git flow init` command in the current directory.
pub fn cmd_init(args: &InitArgs, verbosity: Verbosity) -> Result<()> {
    let cwd = current_dir()?;
    let opts = InitOptions {
        force: args.force,
        defaults: args.defaults,
    };
    let stdin = io::stdin();
    let config = init_repo(&cwd, verbosity, opts, &mut stdin.lock())?;

    println!();
    println!("Initialized git-flow.");
    println!("  Production branch:  {}", config.master_branch);
    println!("  Integration branch: {}", config.develop_branch);
    Ok(())
}

/// Asks questions with a suggested default.
struct Prompter<'a> {
    input: &'a mut dyn BufRead,
    defaults: bool,
}

impl Prompter<'_> {
    fn ask(&mut self, question: &str, suggestion: &str) -> Result<String> {
        print!("{} [{}] ", question, suggestion);
        if self.defaults {
            println!();
            return Ok(suggestion.to_string());
        }
        io::stdout()
            .flush()
            .map_err(|e| FlowError::UserError(format!("failed to write prompt: {}", e)))?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .map_err(|e| FlowError::UserError(format!("failed to read answer: {}", e)))?;

        let answer = line.trim();
        if answer.is_empty() {
            Ok(suggestion.to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}

/// Initialize the repository at `cwd`, reading answers from `input`.
pub(crate) fn init_repo(
    cwd: &Path,
    verbosity: Verbosity,
    opts: InitOptions,
    input: &mut dyn BufRead,
) -> Result<FlowConfig> {
    let git = Git::new(cwd, verbosity);

    if !repo::is_git_repo(&git)? {
        git.run(&["init", "-q"])?;
    } else if !repo::is_headless(&git)? {
        require_clean_working_tree(&git)?;
    }

    let mut store = GitConfigStore::new(git.clone());
    if FlowConfig::is_initialized(&store)? && !opts.force {
        return Err(FlowError::UserError(
            "Already initialized for gitflow.\nTo force reinitialization, use: git flow init -f"
                .to_string(),
        ));
    }

    let mut prompter = Prompter {
        input,
        defaults: opts.defaults,
    };
    if opts.defaults {
        eprintln!("Using default branch names.");
    }

    let master = choose_master(&git, &store, opts, &mut prompter)?;
    let develop = choose_develop(&git, &store, opts, &master, &mut prompter)?;
    if master == develop {
        return Err(FlowError::UserError(
            "Production and integration branches should differ.".to_string(),
        ));
    }

    let mut created = false;
    if repo::is_headless(&git)? {
        let head = format!("refs/heads/{}", master);
        git.run(&["symbolic-ref", "HEAD", &head])?;
        git.run(&["commit", "--allow-empty", "--quiet", "-m", "Initial commit"])?;
        created = true;
    }
    if !repo::local_branch_exists(&git, &develop)? {
        git.run(&["branch", "--no-track", &develop, &master])?;
        created = true;
    }

    let prefixes = choose_prefixes(&store, opts, &mut prompter)?;
    let config = FlowConfig {
        master_branch: master,
        develop_branch: develop,
        origin: configured(&store, KEY_ORIGIN)?.unwrap_or_else(|| FlowConfig::default().origin),
        prefixes,
    };
    config.save(&mut store)?;

    if created {
        git.run(&["checkout", "-q", &config.develop_branch])?;
    }

    let state_dir = repo::git_dir(&git)?.join(STATE_DIR);
    append_event(
        &state_dir,
        &Event::new(EventAction::Init).with_details(json!({
            "master": config.master_branch,
            "develop": config.develop_branch,
            "forced": opts.force,
        })),
    )?;

    Ok(config)
}

fn configured(store: &dyn ConfigStore, key: &str) -> Result<Option<String>> {
    Ok(store.get(key)?.filter(|v| !v.is_empty()))
}

fn choose_master(
    git: &Git,
    store: &dyn ConfigStore,
    opts: InitOptions,
    prompter: &mut Prompter<'_>,
) -> Result<String> {
    let existing = configured(store, KEY_MASTER)?;
    if let Some(master) = &existing
        && !opts.force
    {
        return Ok(master.clone());
    }

    let branches = repo::local_branches(git)?;
    let suggestion = if branches.is_empty() {
        println!("No branches exist yet. Base branches must be created now.");
        existing.unwrap_or_else(|| "master".to_string())
    } else {
        println!();
        println!("Which branch should be used for bringing forth production releases?");
        for branch in &branches {
            println!("   - {}", branch);
        }
        existing
            .into_iter()
            .chain(MASTER_GUESSES.iter().map(|g| g.to_string()))
            .find(|guess| branches.contains(guess))
            .unwrap_or_default()
    };

    let master = prompter.ask("Branch name for production releases:", &suggestion)?;
    if !branches.is_empty() && !branches.contains(&master) {
        return Err(FlowError::UserError(format!(
            "Local branch '{}' does not exist.",
            master
        )));
    }
    Ok(master)
}

fn choose_develop(
    git: &Git,
    store: &dyn ConfigStore,
    opts: InitOptions,
    master: &str,
    prompter: &mut Prompter<'_>,
) -> Result<String> {
    let existing = configured(store, KEY_DEVELOP)?;
    if let Some(develop) = &existing
        && !opts.force
    {
        return Ok(develop.clone());
    }

    let branches: Vec<String> = repo::local_branches(git)?
        .into_iter()
        .filter(|b| b != master)
        .collect();
    let suggestion = if branches.is_empty() {
        existing.unwrap_or_else(|| "develop".to_string())
    } else {
        println!();
        println!("Which branch should be used for integration of the \"next release\"?");
        for branch in &branches {
            println!("   - {}", branch);
        }
        existing
            .into_iter()
            .chain(DEVELOP_GUESSES.iter().map(|g| g.to_string()))
            .find(|guess| guess != master && branches.contains(guess))
            .unwrap_or_default()
    };

    let develop = prompter.ask("Branch name for \"next release\" development:", &suggestion)?;
    if !branches.is_empty() && develop != master && !branches.contains(&develop) {
        return Err(FlowError::UserError(format!(
            "Local branch '{}' does not exist.",
            develop
        )));
    }
    Ok(develop)
}

fn choose_prefixes(
    store: &dyn ConfigStore,
    opts: InitOptions,
    prompter: &mut Prompter<'_>,
) -> Result<Prefixes> {
    let defaults = Prefixes::default();
    let questions = [
        (KEY_PREFIX_FEATURE, "Feature branches?", defaults.feature),
        (KEY_PREFIX_RELEASE, "Release branches?", defaults.release),
        (KEY_PREFIX_HOTFIX, "Hotfix branches?", defaults.hotfix),
        (KEY_PREFIX_SUPPORT, "Support branches?", defaults.support),
        (KEY_PREFIX_VERSIONTAG, "Version tag prefix?", defaults.versiontag),
    ];

    let mut asked_header = false;
    let mut answers = Vec::with_capacity(questions.len());
    for (key, question, default) in questions {
        let existing = store.get(key)?;
        let value = match existing {
            Some(value) if !opts.force && (key == KEY_PREFIX_VERSIONTAG || !value.is_empty()) => {
                value
            }
            existing => {
                if !asked_header {
                    println!();
                    println!("How to name your supporting branch prefixes?");
                    asked_header = true;
                }
                let suggestion = existing.filter(|v| !v.is_empty()).unwrap_or(default);
                prompter.ask(question, &suggestion)?
            }
        };
        answers.push(value);
    }

    let mut answers = answers.into_iter();
    let mut next = || answers.next().unwrap_or_default();
    Ok(Prefixes {
        feature: next(),
        release: next(),
        hotfix: next(),
        support: next(),
        versiontag: next(),
    })
}
