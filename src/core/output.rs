//! Terminal presentation seam.
//!
//! The formatting backend is a capability selected once at startup, not a
//! conditional sprinkled through logic: core components take a
//! `&dyn Presenter` and never know which backend is active.

use colored::Colorize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemStatus {
    Pass,
    Fail,
    Fixed,
    Skipped,
    Info,
}

impl ItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Pass => "PASS",
            ItemStatus::Fail => "FAIL",
            ItemStatus::Fixed => "FIXED",
            ItemStatus::Skipped => "SKIP",
            ItemStatus::Info => "INFO",
        }
    }
}

pub trait Presenter {
    fn section(&self, title: &str);
    fn item(&self, status: ItemStatus, text: &str);
    fn warn(&self, text: &str);
    fn line(&self, text: &str);
}

/// Colored backend for interactive terminals.
pub struct RichPresenter;

impl Presenter for RichPresenter {
    fn section(&self, title: &str) {
        println!();
        println!("{}", title.bright_white().bold());
    }

    fn item(&self, status: ItemStatus, text: &str) {
        let label = match status {
            ItemStatus::Pass => status.label().bright_green(),
            ItemStatus::Fail => status.label().bright_red().bold(),
            ItemStatus::Fixed => status.label().bright_cyan(),
            ItemStatus::Skipped => status.label().bright_black(),
            ItemStatus::Info => status.label().bright_blue(),
        };
        println!("  [{}] {}", label, text);
    }

    fn warn(&self, text: &str) {
        println!("{} {}", "⚠".bright_yellow().bold(), text.bright_yellow());
    }

    fn line(&self, text: &str) {
        println!("{}", text);
    }
}

/// Plain-text backend for pipes, logs, and `--plain`.
pub struct PlainPresenter;

impl Presenter for PlainPresenter {
    fn section(&self, title: &str) {
        println!();
        println!("{}", title);
    }

    fn item(&self, status: ItemStatus, text: &str) {
        println!("  [{}] {}", status.label(), text);
    }

    fn warn(&self, text: &str) {
        println!("warning: {}", text);
    }

    fn line(&self, text: &str) {
        println!("{}", text);
    }
}

/// Select the backend once at startup. `NO_COLOR` and explicit config both
/// force the plain backend.
pub fn for_terminal(color: bool) -> Box<dyn Presenter> {
    if color && std::env::var_os("NO_COLOR").is_none() {
        Box::new(RichPresenter)
    } else {
        Box::new(PlainPresenter)
    }
}
