//! Subcommand implementations for the `fp` binary.

pub mod demo;
pub mod pips;

use colored::Colorize;
use fp_module::{FriendPoints, sheet};

/// Render a pip row like `[##-] 2/3`, colored by how full the pool is.
pub(crate) fn pip_row(points: FriendPoints) -> String {
    let row: String = sheet::pip_states(points)
        .iter()
        .map(|&filled| if filled { '#' } else { '-' })
        .collect();
    let row = if points.is_empty() {
        row.red()
    } else if points.is_full() {
        row.green()
    } else {
        row.yellow()
    };
    format!("[{row}] {points}")
}
