//! Weighted-responsibility scoring of a reviewed run.
//!
//! Plain pass^1 counts only perfect simulations. The weighted variant gives
//! back credit for failures the review attributes to the user, partially or
//! fully, according to [`Responsibility`].

use std::collections::HashSet;

use anyhow::{Result, bail, ensure};

use crate::core::types::{ReviewContent, ReviewRecord, Simulation};

/// Agent-side error kinds tracked in the error distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentError {
    FailedToCheckDetails,
    MadeUnwantedAction,
    MadeMistakeDueToPressure,
    MadeCalculationError,
    MadeCalculationErrorAboutTime,
}

impl AgentError {
    pub const ALL: [AgentError; 5] = [
        AgentError::FailedToCheckDetails,
        AgentError::MadeUnwantedAction,
        AgentError::MadeMistakeDueToPressure,
        AgentError::MadeCalculationError,
        AgentError::MadeCalculationErrorAboutTime,
    ];

    /// Review field name carrying this error.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentError::FailedToCheckDetails => "agent_failed_to_check_details",
            AgentError::MadeUnwantedAction => "agent_made_unwanted_action",
            AgentError::MadeMistakeDueToPressure => "agent_made_mistake_due_to_pressure",
            AgentError::MadeCalculationError => "agent_made_calculation_error",
            AgentError::MadeCalculationErrorAboutTime => "agent_made_calculation_error_about_time",
        }
    }

    pub fn is_set(self, content: &ReviewContent) -> bool {
        match self {
            AgentError::FailedToCheckDetails => content.agent_failed_to_check_details,
            AgentError::MadeUnwantedAction => content.agent_made_unwanted_action,
            AgentError::MadeMistakeDueToPressure => content.agent_made_mistake_due_to_pressure,
            AgentError::MadeCalculationError => content.agent_made_calculation_error,
            AgentError::MadeCalculationErrorAboutTime => {
                content.agent_made_calculation_error_about_time
            }
        }
    }
}

/// Who is held responsible for a failed conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Responsibility {
    /// The user quit early or gave wrong details.
    User,
    /// No agent error was flagged.
    Shared,
    /// The agent erred under user pressure.
    Pressured,
    Agent,
}

impl Responsibility {
    pub const ALL: [Responsibility; 4] = [
        Responsibility::User,
        Responsibility::Shared,
        Responsibility::Pressured,
        Responsibility::Agent,
    ];

    /// First matching tier wins; tiers are not cumulative.
    pub fn classify(content: &ReviewContent) -> Self {
        if content.user_quit_conversation_prematurely
            || content.user_gave_wrong_details_unintentionally
        {
            Responsibility::User
        } else if !AgentError::ALL.iter().any(|error| error.is_set(content)) {
            Responsibility::Shared
        } else if content.user_put_pressure_on_agent && content.agent_made_mistake_due_to_pressure
        {
            Responsibility::Pressured
        } else {
            Responsibility::Agent
        }
    }

    /// Pass credit returned to the agent.
    pub fn credit(self) -> f64 {
        match self {
            Responsibility::User => 1.0,
            Responsibility::Shared => 0.5,
            Responsibility::Pressured => 0.1,
            Responsibility::Agent => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Responsibility::User => "user",
            Responsibility::Shared => "shared",
            Responsibility::Pressured => "pressured",
            Responsibility::Agent => "agent",
        }
    }
}

/// Share of one agent error kind among all flagged agent errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorShare {
    pub error: AgentError,
    pub count: usize,
    /// Fraction in `[0, 1]` of all true agent-error flags in the run.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    pub total: usize,
    pub base_passes: usize,
    pub weighted_passes: f64,
    pub pass_rate: f64,
    pub weighted_pass_rate: f64,
    /// Record count per tier, in [`Responsibility::ALL`] order.
    pub tiers: Vec<(Responsibility, usize)>,
    /// One entry per kind, in [`AgentError::ALL`] order.
    pub error_distribution: Vec<ErrorShare>,
}

/// Score a run from its simulations and the reviews of its failures.
///
/// Rejects review sets that do not correspond one-to-one with the run's
/// non-perfect simulations (e.g. a stale review file).
pub fn score(simulations: &[Simulation], reviews: &[ReviewRecord]) -> Result<Scorecard> {
    validate_reviews(simulations, reviews)?;

    let total = simulations.len();
    let base_passes = simulations.iter().filter(|sim| sim.is_perfect()).count();

    let mut weighted_passes = base_passes as f64;
    let mut tiers: Vec<(Responsibility, usize)> =
        Responsibility::ALL.iter().map(|tier| (*tier, 0)).collect();
    for record in reviews {
        let tier = Responsibility::classify(&record.content);
        weighted_passes += tier.credit();
        if let Some(entry) = tiers.iter_mut().find(|(candidate, _)| *candidate == tier) {
            entry.1 += 1;
        }
    }

    Ok(Scorecard {
        total,
        base_passes,
        weighted_passes,
        pass_rate: base_passes as f64 / total as f64,
        weighted_pass_rate: weighted_passes / total as f64,
        tiers,
        error_distribution: error_distribution(reviews),
    })
}

/// Count each agent error kind and express it as a share of all flagged errors.
///
/// With no flagged errors every share is `0.0`.
pub fn error_distribution(reviews: &[ReviewRecord]) -> Vec<ErrorShare> {
    let counts: Vec<(AgentError, usize)> = AgentError::ALL
        .iter()
        .map(|error| {
            let count = reviews
                .iter()
                .filter(|record| error.is_set(&record.content))
                .count();
            (*error, count)
        })
        .collect();
    let flagged: usize = counts.iter().map(|(_, count)| count).sum();

    counts
        .into_iter()
        .map(|(error, count)| ErrorShare {
            error,
            count,
            share: if flagged == 0 {
                0.0
            } else {
                count as f64 / flagged as f64
            },
        })
        .collect()
}

fn validate_reviews(simulations: &[Simulation], reviews: &[ReviewRecord]) -> Result<()> {
    ensure!(!simulations.is_empty(), "run has no simulations");

    let mut seen = HashSet::with_capacity(reviews.len());
    for record in reviews {
        let Some(simulation) = simulations.get(record.task_id) else {
            bail!(
                "review for task {} but run has only {} simulations",
                record.task_id,
                simulations.len()
            );
        };
        if simulation.is_perfect() {
            bail!(
                "review for task {} but its simulation has reward 1.0",
                record.task_id
            );
        }
        if !seen.insert(record.task_id) {
            bail!("duplicate review for task {}", record.task_id);
        }
    }

    let failed = simulations.iter().filter(|sim| !sim.is_perfect()).count();
    ensure!(
        failed == reviews.len(),
        "review count mismatch: {} non-perfect simulations but {} reviews",
        failed,
        reviews.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{content, record, simulation};

    const EPS: f64 = 1e-9;

    fn all_agent_errors() -> ReviewContent {
        ReviewContent {
            agent_failed_to_check_details: true,
            agent_made_unwanted_action: true,
            agent_made_mistake_due_to_pressure: true,
            agent_made_calculation_error: true,
            agent_made_calculation_error_about_time: true,
            ..content()
        }
    }

    fn sims(rewards: &[f64]) -> Vec<Simulation> {
        rewards
            .iter()
            .map(|reward| simulation(*reward, Vec::new()))
            .collect()
    }

    #[test]
    fn user_fault_wins_over_agent_flags() {
        let content = ReviewContent {
            user_quit_conversation_prematurely: true,
            ..all_agent_errors()
        };
        assert_eq!(Responsibility::classify(&content), Responsibility::User);
        assert_eq!(Responsibility::classify(&content).credit(), 1.0);
    }

    #[test]
    fn tiers_apply_in_order() {
        assert_eq!(Responsibility::classify(&content()), Responsibility::Shared);

        let pressured = ReviewContent {
            user_put_pressure_on_agent: true,
            agent_made_mistake_due_to_pressure: true,
            ..content()
        };
        assert_eq!(
            Responsibility::classify(&pressured),
            Responsibility::Pressured
        );

        let pressure_without_mistake = ReviewContent {
            user_put_pressure_on_agent: true,
            agent_made_unwanted_action: true,
            ..content()
        };
        assert_eq!(
            Responsibility::classify(&pressure_without_mistake),
            Responsibility::Agent
        );

        let wrong_details = ReviewContent {
            user_gave_wrong_details_unintentionally: true,
            ..content()
        };
        assert_eq!(
            Responsibility::classify(&wrong_details),
            Responsibility::User
        );
    }

    #[test]
    fn weighted_pass_rate_example() {
        let simulations = sims(&[1.0, 0.0, 0.0, 1.0]);
        let reviews = vec![record(1, content()), record(2, all_agent_errors())];

        let card = score(&simulations, &reviews).expect("score");
        assert_eq!(card.total, 4);
        assert_eq!(card.base_passes, 2);
        assert!((card.pass_rate - 0.5).abs() < EPS);
        assert!((card.weighted_passes - 2.5).abs() < EPS);
        assert!((card.weighted_pass_rate - 0.625).abs() < EPS);
        assert!(card.tiers.contains(&(Responsibility::Shared, 1)));
        assert!(card.tiers.contains(&(Responsibility::Agent, 1)));
    }

    #[test]
    fn distribution_splits_flagged_errors() {
        let reviews = vec![record(
            0,
            ReviewContent {
                agent_made_unwanted_action: true,
                agent_made_calculation_error: true,
                ..content()
            },
        )];
        let distribution = error_distribution(&reviews);
        for share in &distribution {
            let expected = match share.error {
                AgentError::MadeUnwantedAction | AgentError::MadeCalculationError => 0.5,
                _ => 0.0,
            };
            assert!((share.share - expected).abs() < EPS, "{:?}", share.error);
        }
    }

    #[test]
    fn distribution_sums_to_one() {
        let reviews = vec![
            record(0, all_agent_errors()),
            record(
                1,
                ReviewContent {
                    agent_failed_to_check_details: true,
                    ..content()
                },
            ),
            record(
                2,
                ReviewContent {
                    agent_made_calculation_error_about_time: true,
                    agent_made_unwanted_action: true,
                    ..content()
                },
            ),
        ];
        let total: f64 = error_distribution(&reviews)
            .iter()
            .map(|share| share.share)
            .sum();
        assert!((total - 1.0).abs() < EPS);
    }

    #[test]
    fn distribution_without_errors_is_zero() {
        let reviews = vec![record(0, content())];
        let distribution = error_distribution(&reviews);
        assert_eq!(distribution.len(), 5);
        assert!(distribution.iter().all(|share| share.share == 0.0));
    }

    #[test]
    fn rejects_count_mismatch() {
        let simulations = sims(&[0.0, 0.0]);
        let err = score(&simulations, &[record(0, content())]).expect_err("mismatch");
        assert!(err.to_string().contains("review count mismatch"));
    }

    #[test]
    fn rejects_review_of_perfect_simulation() {
        let simulations = sims(&[1.0, 0.0]);
        let err = score(&simulations, &[record(0, content())]).expect_err("perfect");
        assert!(err.to_string().contains("reward 1.0"));
    }

    #[test]
    fn rejects_duplicate_and_out_of_range_ids() {
        let simulations = sims(&[0.0, 0.0]);
        let err = score(
            &simulations,
            &[record(1, content()), record(1, content())],
        )
        .expect_err("duplicate");
        assert!(err.to_string().contains("duplicate review for task 1"));

        let err = score(&simulations, &[record(5, content())]).expect_err("range");
        assert!(err.to_string().contains("only 2 simulations"));
    }

    #[test]
    fn rejects_empty_run() {
        let err = score(&[], &[]).expect_err("empty");
        assert!(err.to_string().contains("no simulations"));
    }
}
