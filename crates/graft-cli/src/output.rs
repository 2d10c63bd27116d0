//! Terminal output formatting utilities.

use colored::Colorize;
use graft_core::{CommitGraph, NodeId, Progress, Segment};
use graft_git::Oid;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Print a detail line without prefix.
///
/// Use for indented detail lines that accompany info or warn messages.
pub fn detail(msg: &str) {
    println!("{msg}");
}

fn short(id: Oid) -> String {
    id.to_string()[..8].to_string()
}

/// Print a commit tree, root first, one indented line per commit.
pub fn print_tree(tree: &CommitGraph) {
    print_subtree(tree, tree.root_id(), 0);
}

fn print_subtree(tree: &CommitGraph, node: NodeId, depth: usize) {
    let commit = tree.node(node);
    let labels = if commit.labels.is_empty() {
        String::new()
    } else {
        format!(" [{}]", commit.labels.join(", "))
            .cyan()
            .to_string()
    };
    println!(
        "{}{} {}{}",
        "    ".repeat(depth),
        short(commit.id).dimmed(),
        commit.summary,
        labels
    );
    for &child in &commit.children {
        print_subtree(tree, child, depth + 1);
    }
}

/// [`Progress`] renderer for reconstruction runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn segment_started(&self, segment: &Segment, onto: &str) {
        info(&format!(
            "replaying {} -> {} (onto {onto})",
            segment.start_label.as_deref().unwrap_or("(root)"),
            segment.end_label,
        ));
    }

    fn commit_replayed(&self, id: Oid, summary: &str) {
        detail(&format!("    {} {}", short(id).dimmed(), summary));
    }

    fn conflict_detected(&self, id: Oid, files: &[String]) {
        warn(&format!(
            "Conflict while picking {} - please resolve and commit to continue...",
            short(id)
        ));
        for file in files {
            detail(&format!("    {file}"));
        }
    }

    fn conflict_resolved(&self) {
        info("Conflict resolved - continuing");
    }
}
