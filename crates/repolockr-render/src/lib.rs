//! Rendering utilities for the surfaces a verdict is shown on: the check run itself, Markdown,
//! and GitHub Actions annotations.

#![forbid(unsafe_code)]

mod check_run;
mod gha;
mod markdown;
mod model;

pub use check_run::{conclusion_for, render_check_run_output};
pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{RenderableReport, RenderableStatus};
