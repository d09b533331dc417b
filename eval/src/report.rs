//! Text rendering of scorecards and dataset statistics for stdout.

use reviewer::core::case_format::banner;
use reviewer::core::score::Scorecard;
use reviewer::core::stats::DomainStats;

pub fn render_scorecard(card: &Scorecard) -> String {
    let mut lines = Vec::new();
    lines.push(format!("pass^1: {:.4}", card.pass_rate));
    lines.push(format!(
        "pass^1 (weighted responsibility): {:.4}",
        card.weighted_pass_rate
    ));
    lines.push(format!(
        "simulations: {} passed: {} weighted: {:.1}",
        card.total, card.base_passes, card.weighted_passes
    ));

    lines.push(String::new());
    lines.push("Responsibility of failed simulations:".to_string());
    for (tier, count) in &card.tiers {
        lines.push(format!(
            "- {}: {} (+{:.1} each)",
            tier.as_str(),
            count,
            tier.credit()
        ));
    }

    lines.push(String::new());
    lines.push("Agent error distribution (% of all agent errors):".to_string());
    for share in &card.error_distribution {
        lines.push(format!(
            "- {}: {} ({:.1}%)",
            share.error.as_str(),
            share.count,
            share.share * 100.0
        ));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn render_stats(stats: &DomainStats) -> String {
    let mut lines = Vec::new();
    lines.push(banner(stats.domain.as_str()));
    lines.push(format!("totals: {}", stats.tasks));
    let avg: Vec<String> = stats
        .criteria
        .iter()
        .map(|c| format!("{}={:.3}", c.criterion.as_str(), c.average))
        .collect();
    lines.push(format!("avg: {}", avg.join(" ")));
    let per: Vec<String> = stats
        .criteria
        .iter()
        .map(|c| format!("{}={:.3}", c.criterion.as_str(), c.present))
        .collect();
    lines.push(format!("per: {}", per.join(" ")));
    lines.push(String::new());
    lines.join("\n")
}
