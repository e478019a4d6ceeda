//! Selection workflow state machine.
//!
//! Four screens, visited in order:
//!
//! ```text
//! SignalSelection ──select──▶ ModulatorSelection ──select──▶ Loading ──resolved──▶ InsightCard
//!        ▲                         │      ▲                    │                      │  │
//!        └────────── back ─────────┘      └─────────────── back ──────────────────────┘  │
//!        ▲                                                     │                         │
//!        └───────────────────── failed ────────────────────────┘                         │
//!        └──────────────────────────────────── reset ────────────────────────────────────┘
//! ```
//!
//! Each state carries exactly the data that is valid in it, so a modulator can
//! never be selected without a signal and at most one insight exists.
//! [`WorkflowState::transition`] is the pure reducer; [`Workflow`] owns the
//! current state and applies transitions.

use innersight_types::{Catalog, Insight, Modulator, Signal};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SignalSelection,
    ModulatorSelection,
    Loading,
    InsightCard,
}

impl Screen {
    /// One-based position in the three visible steps (loading counts as step 3).
    #[must_use]
    pub const fn step(self) -> usize {
        match self {
            Screen::SignalSelection => 1,
            Screen::ModulatorSelection => 2,
            Screen::Loading | Screen::InsightCard => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    SignalSelection,
    ModulatorSelection {
        signal: Signal,
    },
    /// One insight request is in flight for this pair.
    Loading {
        signal: Signal,
        modulator: Modulator,
    },
    InsightCard {
        signal: Signal,
        modulator: Modulator,
        insight: Insight,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectSignal(Signal),
    SelectModulator(Modulator),
    InsightResolved(Insight),
    InsightFailed(String),
    Back,
    Reset,
}

/// An insight request the caller must dispatch to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightRequest {
    pub signal: Signal,
    pub modulator: Modulator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: WorkflowState,
    pub request: Option<InsightRequest>,
}

impl Transition {
    fn to(next: WorkflowState) -> Self {
        Self {
            next,
            request: None,
        }
    }
}

/// Selection of an item that is not in the catalog.
///
/// The UI only ever offers catalog members, so this is a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSelection {
    #[error("signal {0:?} is not in the catalog")]
    Signal(String),
    #[error("modulator {0:?} is not in the catalog")]
    Modulator(String),
}

impl WorkflowState {
    #[must_use]
    pub const fn screen(&self) -> Screen {
        match self {
            WorkflowState::SignalSelection => Screen::SignalSelection,
            WorkflowState::ModulatorSelection { .. } => Screen::ModulatorSelection,
            WorkflowState::Loading { .. } => Screen::Loading,
            WorkflowState::InsightCard { .. } => Screen::InsightCard,
        }
    }

    #[must_use]
    pub const fn selected_signal(&self) -> Option<Signal> {
        match self {
            WorkflowState::SignalSelection => None,
            WorkflowState::ModulatorSelection { signal }
            | WorkflowState::Loading { signal, .. }
            | WorkflowState::InsightCard { signal, .. } => Some(*signal),
        }
    }

    #[must_use]
    pub const fn selected_modulator(&self) -> Option<Modulator> {
        match self {
            WorkflowState::SignalSelection | WorkflowState::ModulatorSelection { .. } => None,
            WorkflowState::Loading { modulator, .. }
            | WorkflowState::InsightCard { modulator, .. } => Some(*modulator),
        }
    }

    #[must_use]
    pub const fn insight(&self) -> Option<&Insight> {
        match self {
            WorkflowState::InsightCard { insight, .. } => Some(insight),
            _ => None,
        }
    }

    /// Compute the next state for `event`.
    ///
    /// `Ok(None)` means the event does not apply in this state and is ignored;
    /// this includes a second modulator selection while a request is in flight.
    pub fn transition(
        &self,
        event: Event,
        catalog: &Catalog,
    ) -> Result<Option<Transition>, InvalidSelection> {
        let transition = match (self, event) {
            (WorkflowState::SignalSelection, Event::SelectSignal(signal)) => {
                if !catalog.contains_signal(&signal) {
                    return Err(InvalidSelection::Signal(signal.name().to_string()));
                }
                Transition::to(WorkflowState::ModulatorSelection { signal })
            }
            (WorkflowState::ModulatorSelection { signal }, Event::SelectModulator(modulator)) => {
                if !catalog.contains_modulator(&modulator) {
                    return Err(InvalidSelection::Modulator(modulator.name().to_string()));
                }
                Transition {
                    next: WorkflowState::Loading {
                        signal: *signal,
                        modulator,
                    },
                    request: Some(InsightRequest {
                        signal: *signal,
                        modulator,
                    }),
                }
            }
            (WorkflowState::ModulatorSelection { .. }, Event::Back)
            | (WorkflowState::Loading { .. }, Event::InsightFailed(_))
            | (WorkflowState::InsightCard { .. }, Event::Reset) => {
                Transition::to(WorkflowState::SignalSelection)
            }
            (WorkflowState::Loading { signal, modulator }, Event::InsightResolved(insight)) => {
                Transition::to(WorkflowState::InsightCard {
                    signal: *signal,
                    modulator: *modulator,
                    insight,
                })
            }
            (WorkflowState::InsightCard { signal, .. }, Event::Back) => {
                Transition::to(WorkflowState::ModulatorSelection { signal: *signal })
            }
            _ => return Ok(None),
        };
        Ok(Some(transition))
    }
}

/// What happened when an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Transitioned,
    /// Entered `Loading`; the caller must start this request.
    RequestInsight(InsightRequest),
}

/// Owner of the single workflow state for a session.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    catalog: Catalog,
    state: WorkflowState,
}

impl Workflow {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: WorkflowState::SignalSelection,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    /// Apply `event`. On error the state is unchanged.
    pub fn apply(&mut self, event: Event) -> Result<Outcome, InvalidSelection> {
        let from = self.state.screen();
        if let (Screen::Loading, Event::SelectModulator(modulator)) = (from, &event) {
            tracing::debug!(
                modulator = %modulator,
                "Insight request already in flight; ignoring selection"
            );
        }
        if let (Screen::Loading, Event::InsightFailed(error)) = (from, &event) {
            tracing::error!("Insight generation failed, starting over: {error}");
        }

        let Some(transition) = self.state.transition(event, &self.catalog)? else {
            return Ok(Outcome::Ignored);
        };
        self.state = transition.next;
        tracing::debug!(from = ?from, to = ?self.state.screen(), "Workflow transition");

        Ok(match transition.request {
            Some(request) => Outcome::RequestInsight(request),
            None => Outcome::Transitioned,
        })
    }
}
