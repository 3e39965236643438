use dialoguer::{Confirm, Input};
use tracing::warn;

/// Source of the optional region filter for a run.
pub trait FilterPrompt {
    fn ask_filter_region(&self) -> Option<String>;
}

/// Asks on the terminal: filter y/n, then the region.
pub struct ConsolePrompt;

impl FilterPrompt for ConsolePrompt {
    fn ask_filter_region(&self) -> Option<String> {
        let wants_filter = answer_or(
            Confirm::new()
                .with_prompt("Do you want to filter data?")
                .default(false)
                .interact(),
            false,
            "filter confirmation",
        );
        if !wants_filter {
            return None;
        }
        let region = answer_or(
            Input::<String>::new()
                .with_prompt("Enter region")
                .allow_empty(true)
                .interact_text(),
            String::new(),
            "region",
        );
        normalize_region(region)
    }
}

/// Region already known up front (`--region`, `--no-prompt`).
pub struct FixedRegion(pub Option<String>);

impl FilterPrompt for FixedRegion {
    fn ask_filter_region(&self) -> Option<String> {
        self.0.clone().and_then(normalize_region)
    }
}

/// A failed prompt (no terminal, closed stdin) falls back to `fallback`.
fn answer_or<T>(answer: dialoguer::Result<T>, fallback: T, what: &str) -> T {
    match answer {
        Ok(value) => value,
        Err(e) => {
            warn!("{what} prompt failed, continuing without a filter: {e}");
            fallback
        }
    }
}

fn normalize_region(region: String) -> Option<String> {
    let trimmed = region.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
