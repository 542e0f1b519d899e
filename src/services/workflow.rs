// src/services/workflow.rs
//! Multi-step navigation of the create-DID wizard.
//!
//! The wizard is an ordered list of [`WizardStep`]s, each bound to a route.
//! Moving between steps goes through a [`Router`], which carries the
//! [`StepContext`] query parameters to the destination.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Landing route listing the DIDs held in the vault.
pub const MANAGE_DIDS_ROUTE: &str = "/dids/manage";

/// Steps of the create-DID wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Action,
    ManagementKeys,
    DidKeys,
    Services,
    Summary,
    Final,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Action,
        WizardStep::ManagementKeys,
        WizardStep::DidKeys,
        WizardStep::Services,
        WizardStep::Summary,
        WizardStep::Final,
    ];

    pub fn route(self) -> &'static str {
        match self {
            WizardStep::Action => "/action",
            WizardStep::ManagementKeys => "/create/keys/management",
            WizardStep::DidKeys => "/create/keys/did",
            WizardStep::Services => "/create/services",
            WizardStep::Summary => "/create/summary",
            WizardStep::Final => "/create/final",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

/// Parameters handed to the next step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepContext {
    query_params: BTreeMap<String, String>,
}

impl StepContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query_params.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.query_params.is_empty()
    }

    /// `route` followed by the query string, if there is one.
    pub fn location(&self, route: &str) -> String {
        if self.is_empty() {
            route.to_string()
        } else {
            format!("{}?{}", route, self)
        }
    }

    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query_params
    }
}

impl fmt::Display for StepContext {
    /// Formats as a URL query string (without the leading `?`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut url = reqwest::Url::parse("wizard:/").map_err(|_| fmt::Error)?;
        url.query_pairs_mut().extend_pairs(self.query_params.iter());
        f.write_str(url.query().unwrap_or_default())
    }
}

/// Moves the user to a route.
pub trait Router: Send + Sync {
    fn navigate(&self, route: &str, context: &StepContext);
}

/// Step navigation used by wizard screens.
pub trait WorkflowNavigator: Send + Sync {
    fn move_to_next_step(&self, context: StepContext);
    fn move_to_previous_step(&self);
}

/// Tracks the current wizard step and routes on every move.
///
/// Moves past the first or last step stay where they are.
pub struct Workflow {
    router: Arc<dyn Router>,
    current: Mutex<WizardStep>,
}

impl Workflow {
    pub fn new(router: Arc<dyn Router>, start: WizardStep) -> Self {
        Self {
            router,
            current: Mutex::new(start),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn move_by(&self, forward: bool, context: StepContext) {
        let step = {
            let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
            let index = current.index();
            let next = if forward {
                (index + 1).min(WizardStep::ALL.len() - 1)
            } else {
                index.saturating_sub(1)
            };
            *current = WizardStep::ALL[next];
            *current
        };
        log::debug!("Wizard step -> {:?}", step);
        self.router.navigate(step.route(), &context);
    }
}

impl WorkflowNavigator for Workflow {
    fn move_to_next_step(&self, context: StepContext) {
        self.move_by(true, context);
    }

    fn move_to_previous_step(&self) {
        self.move_by(false, StepContext::new());
    }
}

/// Router that remembers where it was sent. Used by the terminal front end to
/// decide what to show after a step finishes.
#[derive(Default)]
pub struct HistoryRouter {
    history: Mutex<Vec<(String, StepContext)>>,
}

impl HistoryRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<(String, StepContext)> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Router for HistoryRouter {
    fn navigate(&self, route: &str, context: &StepContext) {
        log::info!("Navigating to {}", context.location(route));
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((route.to_string(), context.clone()));
    }
}
