//! CLI command implementations.

use anyhow::{Context, Result};
use reviewer::core::case_format::collect_cases;
use reviewer::core::domain::Domain;
use reviewer::core::readable::render_reviews;
use reviewer::core::score::score;
use reviewer::core::stats::domain_stats;
use reviewer::io::batch::review_run;
use reviewer::io::client::ChatReviewClient;
use reviewer::io::config::ReviewerConfig;
use reviewer::io::store::{
    DataPaths, load_reviews, load_simulations, load_tasks, write_readable,
};
use tracing::{debug, info};

use crate::report::{render_scorecard, render_stats};

/// Print evaluation-criteria statistics for every domain.
pub fn show_stats(cfg: &ReviewerConfig) -> Result<()> {
    let paths = DataPaths::new(&cfg.data_dir);
    for domain in Domain::ALL {
        let tasks = load_tasks(&paths, domain)?;
        debug!(%domain, tasks = tasks.len(), "tasks loaded");
        print!("{}", render_stats(&domain_stats(domain, &tasks)));
    }
    Ok(())
}

/// Print the formatted case of every failed simulation in a run.
pub fn show_cases(cfg: &ReviewerConfig, name: &str) -> Result<()> {
    let paths = DataPaths::new(&cfg.data_dir);
    let domain = Domain::from_run_name(name)?;
    let tasks = load_tasks(&paths, domain)?;
    let simulations = load_simulations(&paths, name)?;
    let cases = collect_cases(&tasks, &simulations)?;
    for pending in cases {
        println!("task-{}", pending.task_id);
        println!("{}", pending.case);
    }
    Ok(())
}

/// Review every failed simulation of a run and persist the results.
pub async fn review(cfg: &ReviewerConfig, name: &str) -> Result<()> {
    let client = ChatReviewClient::from_config(&cfg.model).context("build review client")?;
    let paths = DataPaths::new(&cfg.data_dir);
    info!(run = name, model = %cfg.model.name, "starting review");
    let output = review_run(&client, &paths, name, cfg.concurrency, cfg.wrap_width).await?;
    println!(
        "review: run={} reviewed={} skipped={} reviews={} readable={}",
        name,
        output.reviewed,
        output.skipped,
        output.reviews_path.display(),
        output.readable_path.display()
    );
    Ok(())
}

/// Regenerate the readable report from an existing review file.
pub fn readable(cfg: &ReviewerConfig, name: &str, include_case: bool) -> Result<()> {
    let paths = DataPaths::new(&cfg.data_dir);
    let records = load_reviews(&paths, name)?;
    let text = render_reviews(&records, include_case, cfg.wrap_width);
    let path = write_readable(&paths, name, &text)?;
    println!("readable: run={} reviews={} path={}", name, records.len(), path.display());
    Ok(())
}

/// Score a reviewed run and print pass rates and the error distribution.
pub fn score_run(cfg: &ReviewerConfig, name: &str) -> Result<()> {
    let paths = DataPaths::new(&cfg.data_dir);
    let simulations = load_simulations(&paths, name)?;
    let reviews = load_reviews(&paths, name)?;
    let card = score(&simulations, &reviews).with_context(|| format!("score run {name}"))?;
    print!("{}", render_scorecard(&card));
    Ok(())
}
