//! Response kinds and their post-extraction normalization.
//!
//! The model output is not schema-validated. Each kind only stamps the
//! caller's label onto the object and defaults list fields to `[]` so
//! consumers can iterate without checking. Missing scalars stay absent.

use serde_json::{Map, Value};

/// Plan phases whose `goals` and `tasks` lists are defaulted.
const PLAN_PHASES: [&str; 3] = ["day30", "day60", "day90"];
const PHASE_LIST_FIELDS: [&str; 2] = ["goals", "tasks"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Assessment,
    MentorRecommendation,
    ExecutionPlan,
    MeetingExtraction,
    FollowUps,
}

impl ResponseKind {
    /// Human-readable name used in logs and failure messages.
    pub fn noun(self) -> &'static str {
        match self {
            ResponseKind::Assessment => "assessment",
            ResponseKind::MentorRecommendation => "mentor recommendation",
            ResponseKind::ExecutionPlan => "execution plan",
            ResponseKind::MeetingExtraction => "meeting insights",
            ResponseKind::FollowUps => "follow-up suggestions",
        }
    }

    /// Output-token budget for the generation call.
    pub fn max_tokens(self) -> u32 {
        match self {
            ResponseKind::Assessment | ResponseKind::MentorRecommendation => 1024,
            ResponseKind::ExecutionPlan => 4096,
            ResponseKind::MeetingExtraction => 2048,
            ResponseKind::FollowUps => 1024,
        }
    }

    /// Only the plan is large enough to hit the token ceiling, so only the
    /// plan gets a truncation-repair attempt.
    pub fn allows_repair(self) -> bool {
        matches!(self, ResponseKind::ExecutionPlan)
    }

    /// Field the caller-supplied label is stamped into.
    pub fn label_field(self) -> Option<&'static str> {
        match self {
            ResponseKind::Assessment
            | ResponseKind::MentorRecommendation
            | ResponseKind::ExecutionPlan => Some("directionLabel"),
            ResponseKind::MeetingExtraction => Some("title"),
            ResponseKind::FollowUps => None,
        }
    }

    /// Top-level fields that are lists and default to `[]` when absent.
    pub fn list_fields(self) -> &'static [&'static str] {
        match self {
            ResponseKind::Assessment => &["assets", "gaps", "readiness"],
            ResponseKind::MentorRecommendation => &[
                "matchReasons",
                "sessionExpectations",
                "questionsToAsk",
                "whatToPrepare",
            ],
            ResponseKind::ExecutionPlan => &[
                "hardSkills",
                "softSkills",
                "tools",
                "weeklyActions",
                "quickWins",
                "potentialBlockers",
                "successMetrics",
            ],
            ResponseKind::MeetingExtraction => &["highlights", "actionItems"],
            ResponseKind::FollowUps => &["suggestions"],
        }
    }
}

/// Applies the kind's label stamp and list defaults in place.
pub fn normalize(kind: ResponseKind, object: &mut Map<String, Value>, label: Option<&str>) {
    if let (Some(field), Some(label)) = (kind.label_field(), label) {
        object.insert(field.to_string(), Value::String(label.to_string()));
    }

    for field in kind.list_fields() {
        default_list(object, field);
    }

    if kind == ResponseKind::ExecutionPlan {
        if let Some(Value::Object(phased_path)) = object.get_mut("phasedPath") {
            for phase in PLAN_PHASES {
                if let Some(Value::Object(phase_object)) = phased_path.get_mut(phase) {
                    for field in PHASE_LIST_FIELDS {
                        default_list(phase_object, field);
                    }
                }
            }
        }
    }
}

/// Absent or null becomes `[]`. Anything else is left as the model sent it.
fn default_list(object: &mut Map<String, Value>, field: &str) {
    match object.get(field) {
        None | Some(Value::Null) => {
            object.insert(field.to_string(), Value::Array(Vec::new()));
        }
        Some(_) => {}
    }
}
