//! CLI domain: parse, route, output, and presentation only.
//! No batch orchestration here beyond wiring; the route table dispatches to domain services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, GenerateArgs, PathArgs};
pub use presentation::{
    format_record_line, format_status_json, format_status_text, format_summary_text,
    ConsoleReporter,
};
pub use route::RunContext;
