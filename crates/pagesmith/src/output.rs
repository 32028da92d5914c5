use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn step(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", "→".cyan(), message);
    }
}

pub fn note(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

pub fn failure(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Path shown relative to `root` when it lives under it
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
