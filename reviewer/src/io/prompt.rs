//! Review prompt rendering.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::core::questions::QUESTIONS;

const REVIEW_TEMPLATE: &str = include_str!("prompts/review.md");

/// Render the review request for one case: the case text followed by the
/// review instruction and the questionnaire.
pub fn render_review_prompt(case: &str) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("review", REVIEW_TEMPLATE)
        .context("parse review template")?;
    let template = env.get_template("review")?;
    let rendered = template
        .render(context! {
            case => case,
            questions => QUESTIONS,
        })
        .context("render review prompt")?;
    Ok(rendered)
}
