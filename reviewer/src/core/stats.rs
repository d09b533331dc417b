//! Dataset statistics over task evaluation criteria.

use crate::core::domain::Domain;
use crate::core::types::Task;

/// Evaluation criteria kinds counted per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Actions,
    CommunicateInfo,
    NlAssertions,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [
        Criterion::Actions,
        Criterion::CommunicateInfo,
        Criterion::NlAssertions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Actions => "actions",
            Criterion::CommunicateInfo => "communicate_info",
            Criterion::NlAssertions => "nl_assertions",
        }
    }

    fn count(self, task: &Task) -> usize {
        let criteria = &task.evaluation_criteria;
        match self {
            Criterion::Actions => criteria.actions().len(),
            Criterion::CommunicateInfo => criteria.communicate_info().len(),
            Criterion::NlAssertions => criteria.nl_assertions().len(),
        }
    }
}

/// Statistics for one criterion across a task set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriterionStats {
    pub criterion: Criterion,
    /// Mean number of items per task.
    pub average: f64,
    /// Fraction of tasks with at least one item.
    pub present: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DomainStats {
    pub domain: Domain,
    pub tasks: usize,
    /// One entry per criterion, in [`Criterion::ALL`] order.
    pub criteria: Vec<CriterionStats>,
}

/// Summarize a domain's task set. An empty set yields zeros.
pub fn domain_stats(domain: Domain, tasks: &[Task]) -> DomainStats {
    let criteria = Criterion::ALL
        .iter()
        .map(|criterion| {
            let mut items = 0usize;
            let mut present = 0usize;
            for task in tasks {
                let count = criterion.count(task);
                items += count;
                if count > 0 {
                    present += 1;
                }
            }
            CriterionStats {
                criterion: *criterion,
                average: ratio(items, tasks.len()),
                present: ratio(present, tasks.len()),
            }
        })
        .collect();
    DomainStats {
        domain,
        tasks: tasks.len(),
        criteria,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
