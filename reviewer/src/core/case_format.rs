//! Rendering of (task, simulation) pairs into reviewable case text.
//!
//! A case has two sections: the task setup (pretty JSON, expected actions
//! rendered as call expressions) and the conversation turn by turn.

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::core::types::{Role, Simulation, Task};

const BANNER_WIDTH: usize = 80;

/// A non-perfect simulation waiting for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCase {
    pub task_id: usize,
    pub case: String,
}

/// Section banner: the label centred in a run of dashes.
pub fn banner(label: &str) -> String {
    format!("{:-^width$}", format!(" {label} "), width = BANNER_WIDTH)
}

/// Render one case. Deterministic: equal inputs give byte-identical text.
pub fn format_case(task: &Task, simulation: &Simulation) -> Result<String> {
    let mut lines = Vec::new();
    lines.push(banner("setup"));
    lines.push(render_setup(task)?);
    lines.push(String::new());
    lines.push(banner("conversation"));
    lines.push(String::new());

    for message in &simulation.messages {
        let content = message.content.as_deref().unwrap_or_default().trim();
        match message.role {
            Role::User => lines.push(format!("[USER]  ==> {content}")),
            Role::Assistant => lines.push(format!("[AGENT] ==> {content}")),
            Role::Other => {}
        }
        for call in message.tool_calls() {
            lines.push(call.to_string());
        }
    }

    lines.push(String::new());
    Ok(lines.join("\n"))
}

/// Build the cases to review for a run: every simulation whose reward is not
/// exactly 1.0, paired with the task at the same index.
pub fn collect_cases(tasks: &[Task], simulations: &[Simulation]) -> Result<Vec<PendingCase>> {
    let mut cases = Vec::new();
    for (task_id, simulation) in simulations.iter().enumerate() {
        if simulation.is_perfect() {
            continue;
        }
        let Some(task) = tasks.get(task_id) else {
            bail!(
                "simulation {task_id} has no task definition ({} tasks loaded)",
                tasks.len()
            );
        };
        let case =
            format_case(task, simulation).with_context(|| format!("format case {task_id}"))?;
        cases.push(PendingCase { task_id, case });
    }
    Ok(cases)
}

fn render_setup(task: &Task) -> Result<String> {
    let mut value = serde_json::to_value(task).context("serialize task")?;
    let actions = task
        .evaluation_criteria
        .actions()
        .iter()
        .map(|call| Value::String(call.to_string()))
        .collect();
    if let Some(criteria) = value
        .get_mut("evaluation_criteria")
        .and_then(Value::as_object_mut)
    {
        criteria.insert("actions".to_string(), Value::Array(actions));
    }
    serde_json::to_string_pretty(&value).context("render task setup")
}
