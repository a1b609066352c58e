//! Output rendering: the assistant brief and the Markdown/JSON reports.

pub mod brief;
pub mod generator;

pub use brief::{build_brief, BriefInput};
pub use generator::{generate_json_report, generate_markdown_report};
