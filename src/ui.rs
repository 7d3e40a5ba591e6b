//! Console output helpers.
//!
//! Pure formatting functions in the style of the rest of the tooling:
//! one line per event, ANSI colors, errors to stderr.

use crate::patch::FileChange;
use crate::version::Version;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Display the computed version transition.
pub fn display_transition(current: &Version, next: &Version) {
    println!("\n\x1b[1mVersion Change:\x1b[0m");
    println!("  From: \x1b[31m{}\x1b[0m", current);
    println!("  To:   \x1b[32m{}\x1b[0m", next);
}

/// Display the dry-run plan: the transition plus every file that would
/// be rewritten. Nothing is touched.
pub fn display_dry_run_plan(current: &Version, next: &Version, changes: &[FileChange]) {
    display_transition(current, next);
    println!("\n\x1b[1mWould update {} files (dry run):\x1b[0m", changes.len());
    for change in changes {
        println!("  - {} ({})", change.path.display(), change.label());
    }
}
