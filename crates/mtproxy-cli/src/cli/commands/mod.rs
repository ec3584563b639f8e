//! CLI command handlers, one per file.

mod completions;
mod output;
mod post;
mod post_empty;
mod show_config;

pub use completions::run_completions;
pub use post::run_post;
pub use post_empty::run_post_empty;
pub use show_config::run_show_config;
