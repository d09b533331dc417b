//! The fixed review questionnaire and its response schema.
//!
//! Each question maps to one boolean field of
//! [`ReviewContent`](crate::core::types::ReviewContent); together with the
//! free-text `review` field they form the schema the model must answer in.

use std::sync::LazyLock;

use serde::Serialize;
use serde_json::{Map, Value, json};

/// One yes/no question and the response field that carries its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub key: &'static str,
    pub text: &'static str,
}

/// Free-text summary field.
pub const REVIEW_FIELD: &str = "review";

pub const QUESTIONS: [Question; 10] = [
    Question {
        key: "user_achieved_original_goal",
        text: "Did the user achieved the original goal listed in the setup?",
    },
    Question {
        key: "user_put_pressure_on_agent",
        text: "Did the user put pressure on agent?",
    },
    Question {
        key: "user_quit_conversation_prematurely",
        text: "Did the user stopped the conversation prematurely before achieving the goal in the setup?",
    },
    Question {
        key: "user_gave_wrong_details_unintentionally",
        text: "Did the user gave wrong details unintentionally that cause agent made mistake?",
    },
    Question {
        key: "user_correct_unintentional_agent_mistake",
        text: "Did the user try to correct an unintentional mistake made by the agent?",
    },
    Question {
        key: "agent_failed_to_check_details",
        text: "Did the agent failed to check for details related to the policy?",
    },
    Question {
        key: "agent_made_unwanted_action",
        text: "Did the agent made unwanted write actions that might negatively impact the user (or violated the policy)?",
    },
    Question {
        key: "agent_made_mistake_due_to_pressure",
        text: "Did the agent made mistake due to user's pressure?",
    },
    Question {
        key: "agent_made_calculation_error",
        text: "Did the agent made a calculation error?",
    },
    Question {
        key: "agent_made_calculation_error_about_time",
        text: "Did the agent made a calculation error about time?",
    },
];

static REVIEW_SCHEMA: LazyLock<Value> = LazyLock::new(build_schema);

/// JSON schema of the review response: `review` string plus one boolean per question.
pub fn review_schema() -> &'static Value {
    &REVIEW_SCHEMA
}

fn build_schema() -> Value {
    let mut properties = Map::new();
    properties.insert(REVIEW_FIELD.to_string(), json!({"type": "string"}));
    for question in &QUESTIONS {
        properties.insert(question.key.to_string(), json!({"type": "boolean"}));
    }
    let required: Vec<&str> = std::iter::once(REVIEW_FIELD)
        .chain(QUESTIONS.iter().map(|question| question.key))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}
