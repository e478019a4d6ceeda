//! Core engine for Innersight - workflow state machine, carousel model, and orchestration.
//!
//! This crate contains the App without TUI dependencies.

mod app;
pub mod carousel;
mod config;
mod provider;
pub mod workflow;

pub use app::{App, REVEAL_SECTIONS, REVEAL_STEP};
pub use carousel::{Carousel, VisibleItem, closest_index};
pub use config::{
    AppConfig, ApiKeys, CarouselConfig, ConfigError, GoogleConfig, InnersightConfig,
    InsightConfig, ProviderKind, config_path,
};
pub use provider::build_provider;
pub use workflow::{
    Event, InsightRequest, InvalidSelection, Outcome, Screen, Transition, Workflow, WorkflowState,
};

// Re-export from crates for public API
pub use innersight_providers::{self, InsightProvider, ProviderError};
pub use innersight_types::{
    Catalog, Insight, MODULATORS, Modulator, SIGNALS, Signal, ui::UiOptions,
};
