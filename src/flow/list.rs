//! Listing supporting branches.

use super::BranchKind;
use crate::context::FlowContext;
use crate::error::Result;
use crate::repo;

/// One row of `git flow <kind> list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Short name without the kind prefix.
    pub name: String,
    /// Whether this branch is checked out.
    pub current: bool,
    /// Relation to the source line; only computed in verbose mode.
    pub annotation: Option<String>,
}

/// Collect the local branches of `kind`, in ref order.
pub fn list_entries(ctx: &FlowContext, kind: BranchKind, verbose: bool) -> Result<Vec<ListEntry>> {
    let git = &ctx.git;
    let prefix = kind.prefix(&ctx.config);
    let source = kind.source_branch(&ctx.config);
    let current = repo::current_branch(git)?;

    let mut entries = Vec::new();
    for branch in repo::local_branches(git)? {
        let Some(name) = branch.strip_prefix(prefix) else {
            continue;
        };
        let annotation = if verbose {
            Some(annotate(ctx, kind, &branch, source)?)
        } else {
            None
        };
        entries.push(ListEntry {
            name: name.to_string(),
            current: current.as_deref() == Some(branch.as_str()),
            annotation,
        });
    }
    Ok(entries)
}

fn annotate(ctx: &FlowContext, kind: BranchKind, branch: &str, source: &str) -> Result<String> {
    let git = &ctx.git;
    let branch_sha = repo::rev_parse(git, branch)?;
    let source_sha = repo::rev_parse(git, source)?;
    if branch_sha == source_sha {
        return Ok("(no commits yet)".to_string());
    }
    let base = repo::merge_base(git, branch, source)?;

    match kind {
        BranchKind::Feature | BranchKind::Release => Ok(match base {
            Some(base) if base == branch_sha => format!("(is behind {}, may ff)", source),
            Some(base) if base == source_sha => format!("(based on latest {})", source),
            _ => "(may be rebased)".to_string(),
        }),
        BranchKind::Hotfix | BranchKind::Support => {
            let Some(base) = base else {
                return Ok("(may be rebased)".to_string());
            };
            let named = git.execute(&["name-rev", "--tags", "--no-undefined", "--name-only", &base])?;
            let nicename = if named.success && !named.is_empty() {
                named.stdout.trim().to_string()
            } else {
                repo::short_sha(git, &base)?
            };
            Ok(format!("(based on {})", nicename))
        }
    }
}

/// Print the branches of `kind`, marking the current one.
pub fn list(ctx: &FlowContext, kind: BranchKind, verbose: bool) -> Result<()> {
    let entries = list_entries(ctx, kind, verbose)?;

    if entries.is_empty() {
        eprintln!("No {} branches exist.", kind);
        eprintln!();
        eprintln!("You can start a new {} branch:", kind);
        eprintln!();
        eprintln!("    git flow {} start <{}> [<base>]", kind, kind.arg_name());
        eprintln!();
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0) + 3;
    for entry in &entries {
        let marker = if entry.current { "* " } else { "  " };
        match &entry.annotation {
            Some(note) => println!("{}{:<width$}{}", marker, entry.name, note, width = width),
            None => println!("{}{}", marker, entry.name),
        }
    }
    Ok(())
}
