//! Data model for benchmark tasks, simulation transcripts and reviews.
//!
//! Field names follow the benchmark's JSON files so the types deserialize
//! directly from them. Unknown task fields are kept so the case setup shows
//! the task as it was defined.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ground-truth definition of one conversation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub evaluation_criteria: EvaluationCriteria,
    /// Remaining task fields (user scenario, description, ...), rendered verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Success criteria of a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    #[serde(default)]
    pub actions: Option<Vec<ToolCall>>,
    #[serde(default)]
    pub communicate_info: Option<Vec<String>>,
    #[serde(default)]
    pub nl_assertions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EvaluationCriteria {
    /// Expected actions; `null` reads as empty.
    pub fn actions(&self) -> &[ToolCall] {
        self.actions.as_deref().unwrap_or_default()
    }

    pub fn communicate_info(&self) -> &[String] {
        self.communicate_info.as_deref().unwrap_or_default()
    }

    pub fn nl_assertions(&self) -> &[String] {
        self.nl_assertions.as_deref().unwrap_or_default()
    }
}

/// A tool invocation, either expected by a task or made during a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// Renders as `name(arguments)` with the arguments as compact JSON.
impl fmt::Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arguments = Value::Object(self.arguments.clone());
        write!(f, "{}({})", self.name, arguments)
    }
}

/// Speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Tool results and any other role; only their tool calls are rendered.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl SimulationMessage {
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }
}

/// One recorded attempt at a task. Index-aligned with the domain's task list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub reward_info: RewardInfo,
    #[serde(default)]
    pub messages: Vec<SimulationMessage>,
}

impl Simulation {
    /// A reward of exactly 1.0 means the conversation needs no review.
    pub fn is_perfect(&self) -> bool {
        self.reward_info.reward == 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardInfo {
    pub reward: f64,
}

/// Top-level shape of a simulation run file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub simulations: Vec<Simulation>,
}

/// Structured judgment returned by the model for one case.
///
/// Missing flags in stored review files read as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewContent {
    pub review: String,
    pub user_achieved_original_goal: bool,
    pub user_put_pressure_on_agent: bool,
    pub user_quit_conversation_prematurely: bool,
    pub user_gave_wrong_details_unintentionally: bool,
    pub user_correct_unintentional_agent_mistake: bool,
    pub agent_failed_to_check_details: bool,
    pub agent_made_unwanted_action: bool,
    pub agent_made_mistake_due_to_pressure: bool,
    pub agent_made_calculation_error: bool,
    pub agent_made_calculation_error_about_time: bool,
}

impl ReviewContent {
    /// Boolean answers keyed by field name, in questionnaire order.
    pub fn flags(&self) -> [(&'static str, bool); 10] {
        [
            (
                "user_achieved_original_goal",
                self.user_achieved_original_goal,
            ),
            ("user_put_pressure_on_agent", self.user_put_pressure_on_agent),
            (
                "user_quit_conversation_prematurely",
                self.user_quit_conversation_prematurely,
            ),
            (
                "user_gave_wrong_details_unintentionally",
                self.user_gave_wrong_details_unintentionally,
            ),
            (
                "user_correct_unintentional_agent_mistake",
                self.user_correct_unintentional_agent_mistake,
            ),
            (
                "agent_failed_to_check_details",
                self.agent_failed_to_check_details,
            ),
            ("agent_made_unwanted_action", self.agent_made_unwanted_action),
            (
                "agent_made_mistake_due_to_pressure",
                self.agent_made_mistake_due_to_pressure,
            ),
            (
                "agent_made_calculation_error",
                self.agent_made_calculation_error,
            ),
            (
                "agent_made_calculation_error_about_time",
                self.agent_made_calculation_error_about_time,
            ),
        ]
    }
}

/// A review of one non-perfect simulation, as persisted in the review file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Index of the simulation (and task) within its run.
    pub task_id: usize,
    /// Rendered case text that was sent for review.
    pub case: String,
    pub content: ReviewContent,
}
