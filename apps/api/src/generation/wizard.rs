//! The five-step coaching journey as an explicit state machine.
//!
//! The web client drives the flow; this module is the authoritative model of
//! which moves are legal and what each move keeps or clears. No route calls
//! it, so the server binary only reaches it through the tests below.

#![allow(dead_code)]

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::generation::kinds::ResponseKind;
use crate::models::coaching::CoachingRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    #[default]
    DirectionInput,
    Assessment,
    Confirmation,
    MentorMatch,
    Plan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    SubmitDirection,
    AssessmentReady,
    Confirm,
    Back,
    MentorReady,
    PlanReady,
    StartOver,
}

/// A move plus the data it carries.
#[derive(Debug, Clone)]
pub enum Event {
    SubmitDirection(CoachingRequest),
    AssessmentReady(Map<String, Value>),
    /// Optional corrections typed on the confirmation screen.
    Confirm { adjustments: Option<String> },
    Back,
    MentorReady(Map<String, Value>),
    PlanReady(Map<String, Value>),
    StartOver,
}

impl Event {
    pub fn trigger(&self) -> Trigger {
        match self {
            Event::SubmitDirection(_) => Trigger::SubmitDirection,
            Event::AssessmentReady(_) => Trigger::AssessmentReady,
            Event::Confirm { .. } => Trigger::Confirm,
            Event::Back => Trigger::Back,
            Event::MentorReady(_) => Trigger::MentorReady,
            Event::PlanReady(_) => Trigger::PlanReady,
            Event::StartOver => Trigger::StartOver,
        }
    }
}

/// (from, trigger, to). `StartOver` is accepted from every step and is not listed.
const TRANSITIONS: &[(Step, Trigger, Step)] = &[
    (Step::DirectionInput, Trigger::SubmitDirection, Step::Assessment),
    (Step::Assessment, Trigger::AssessmentReady, Step::Confirmation),
    (Step::Confirmation, Trigger::Confirm, Step::MentorMatch),
    (Step::Confirmation, Trigger::Back, Step::Assessment),
    (Step::MentorMatch, Trigger::MentorReady, Step::Plan),
    (Step::MentorMatch, Trigger::Back, Step::Confirmation),
    (Step::Plan, Trigger::PlanReady, Step::Plan),
];

pub fn next_step(from: Step, trigger: Trigger) -> Option<Step> {
    if trigger == Trigger::StartOver {
        return Some(Step::DirectionInput);
    }
    TRANSITIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == trigger)
        .map(|(_, _, to)| *to)
}

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("Cannot apply {trigger:?} while on step {from:?}")]
    InvalidTransition { from: Step, trigger: Trigger },
}

/// Everything the user has entered and received so far.
#[derive(Debug, Clone, Default)]
pub struct Journey {
    step: Step,
    profile: Option<CoachingRequest>,
    assessment: Option<Map<String, Value>>,
    mentor: Option<Map<String, Value>>,
    plan: Option<Map<String, Value>>,
}

impl Journey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn profile(&self) -> Option<&CoachingRequest> {
        self.profile.as_ref()
    }

    /// Applies one move. An illegal move returns an error and changes nothing.
    pub fn apply(&mut self, event: Event) -> Result<Step, WizardError> {
        let to = next_step(self.step, event.trigger()).ok_or(WizardError::InvalidTransition {
            from: self.step,
            trigger: event.trigger(),
        })?;

        match event {
            Event::SubmitDirection(profile) => self.profile = Some(profile),
            Event::AssessmentReady(assessment) => self.assessment = Some(assessment),
            Event::Confirm { adjustments } => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.adjustments = adjustments.filter(|a| !a.trim().is_empty());
                }
            }
            Event::Back => {}
            Event::MentorReady(mentor) => self.mentor = Some(mentor),
            Event::PlanReady(plan) => self.plan = Some(plan),
            Event::StartOver => *self = Journey::default(),
        }

        self.step = to;
        Ok(to)
    }

    /// The generation the current step is still waiting on, if any.
    pub fn pending_kind(&self) -> Option<ResponseKind> {
        match self.step {
            Step::Assessment if self.assessment.is_none() => Some(ResponseKind::Assessment),
            Step::MentorMatch if self.mentor.is_none() => Some(ResponseKind::MentorRecommendation),
            Step::Plan if self.plan.is_none() => Some(ResponseKind::ExecutionPlan),
            _ => None,
        }
    }

    /// Snapshot used for the downloadable journey summary.
    pub fn export(&self) -> Value {
        json!({
            "step": self.step,
            "profile": self.profile,
            "assessment": self.assessment,
            "mentor": self.mentor,
            "plan": self.plan,
        })
    }
}
