//! Test-only helpers for constructing tasks, transcripts and reviews.

use serde_json::{Map, Value};

use crate::core::types::{
    EvaluationCriteria, ReviewContent, ReviewRecord, RewardInfo, Role, Simulation,
    SimulationMessage, Task, ToolCall,
};

/// Create a task with the given expected actions and empty assertions.
pub fn task(id: &str, actions: Vec<ToolCall>) -> Task {
    Task {
        id: id.to_string(),
        evaluation_criteria: EvaluationCriteria {
            actions: Some(actions),
            communicate_info: Some(Vec::new()),
            nl_assertions: Some(Vec::new()),
            extra: Map::new(),
        },
        extra: Map::new(),
    }
}

/// Create a tool call with string-valued arguments.
pub fn tool_call(name: &str, arguments: &[(&str, &str)]) -> ToolCall {
    ToolCall {
        name: name.to_string(),
        arguments: arguments
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect(),
    }
}

pub fn user(content: Option<&str>) -> SimulationMessage {
    message(Role::User, content)
}

pub fn assistant(content: Option<&str>) -> SimulationMessage {
    message(Role::Assistant, content)
}

fn message(role: Role, content: Option<&str>) -> SimulationMessage {
    SimulationMessage {
        role,
        content: content.map(str::to_string),
        tool_calls: None,
    }
}

pub fn simulation(reward: f64, messages: Vec<SimulationMessage>) -> Simulation {
    Simulation {
        reward_info: RewardInfo { reward },
        messages,
    }
}

/// Review content with every flag false.
pub fn content() -> ReviewContent {
    ReviewContent {
        review: "The agent followed the policy.".to_string(),
        ..ReviewContent::default()
    }
}

pub fn record(task_id: usize, content: ReviewContent) -> ReviewRecord {
    ReviewRecord {
        task_id,
        case: format!("case {task_id}"),
        content,
    }
}
