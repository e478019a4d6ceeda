//! Application orchestrator.
//!
//! Owns the workflow, the signal carousel, and the single in-flight insight
//! request. The TUI calls the command methods on input and [`App::tick`] once
//! per frame; provider results are picked up during `tick`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::FutureExt;
use tokio::task::JoinHandle;

use innersight_providers::{InsightProvider, ProviderError};
use innersight_types::ui::UiOptions;
use innersight_types::{Catalog, Insight, Signal};

use crate::carousel::{Carousel, DEFAULT_REPEAT};
use crate::config::InnersightConfig;
use crate::provider::build_provider;
use crate::workflow::{Event, InsightRequest, Outcome, Screen, Workflow, WorkflowState};

/// Delay between insight card sections appearing.
pub const REVEAL_STEP: Duration = Duration::from_millis(600);
/// Title, reflection, action, journal prompt.
pub const REVEAL_SECTIONS: usize = 4;

struct PendingInsight {
    request: InsightRequest,
    handle: JoinHandle<Result<Insight, ProviderError>>,
}

pub struct App {
    workflow: Workflow,
    carousel: Carousel<Signal>,
    provider: Arc<dyn InsightProvider>,
    pending: Option<PendingInsight>,
    modulator_cursor: usize,
    /// Time on the current screen, driven by frame deltas.
    screen_elapsed: Duration,
    ui_options: UiOptions,
    last_frame: Instant,
    should_quit: bool,
}

impl App {
    /// Build from configuration: provider, UI options, and carousel repetition.
    #[must_use]
    pub fn new(config: &InnersightConfig) -> Self {
        let provider = build_provider(config);
        let repeat = config.carousel_repeat().unwrap_or(DEFAULT_REPEAT);
        Self::with_provider(provider, config.ui_options(), repeat)
    }

    #[must_use]
    pub fn with_provider(
        provider: Arc<dyn InsightProvider>,
        ui_options: UiOptions,
        repeat: usize,
    ) -> Self {
        let catalog = Catalog::standard();
        let mut carousel = Carousel::new(catalog.signals().to_vec(), repeat);
        carousel.set_reduced_motion(ui_options.reduced_motion);
        Self {
            workflow: Workflow::new(catalog),
            carousel,
            provider,
            pending: None,
            modulator_cursor: 0,
            screen_elapsed: Duration::ZERO,
            ui_options,
            last_frame: Instant::now(),
            should_quit: false,
        }
    }

    // ---------------------------------------------------------------------
    // Read access for rendering
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.workflow.screen()
    }

    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        self.workflow.state()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.workflow.catalog()
    }

    #[must_use]
    pub fn carousel(&self) -> &Carousel<Signal> {
        &self.carousel
    }

    #[must_use]
    pub fn modulator_cursor(&self) -> usize {
        self.modulator_cursor
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    #[must_use]
    pub fn is_request_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Time spent on the current screen. Drives the loading spinner.
    #[must_use]
    pub fn screen_elapsed(&self) -> Duration {
        self.screen_elapsed
    }

    /// Number of insight card sections currently shown.
    ///
    /// The card opens empty; one more section appears every [`REVEAL_STEP`].
    #[must_use]
    pub fn revealed_sections(&self) -> usize {
        if self.screen() != Screen::InsightCard {
            return 0;
        }
        if self.ui_options.reduced_motion {
            return REVEAL_SECTIONS;
        }
        let steps = self.screen_elapsed.as_millis() / REVEAL_STEP.as_millis();
        (steps as usize).min(REVEAL_SECTIONS)
    }

    /// "Begin Again" is offered once the whole card is visible.
    #[must_use]
    pub fn can_begin_again(&self) -> bool {
        self.screen() == Screen::InsightCard && self.revealed_sections() == REVEAL_SECTIONS
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // ---------------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------------

    pub fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    /// Per-frame update using wall-clock frame time.
    pub fn tick(&mut self) {
        let delta = self.frame_elapsed();
        self.advance(delta);
    }

    /// Advance animations by `delta` and collect a finished insight request.
    pub fn advance(&mut self, delta: Duration) {
        self.carousel.advance(delta);
        self.screen_elapsed = self.screen_elapsed.saturating_add(delta);
        self.poll_insight();
    }

    /// Report the carousel viewport width measured by the renderer.
    pub fn measure_carousel(&mut self, width: u16) {
        self.carousel.set_viewport_width(f32::from(width));
    }

    fn poll_insight(&mut self) {
        let finished = match &self.pending {
            Some(pending) => pending.handle.is_finished(),
            None => return,
        };
        if !finished {
            return;
        }
        let Some(PendingInsight {
            request,
            mut handle,
        }) = self.pending.take()
        else {
            return;
        };

        let event = match (&mut handle).now_or_never() {
            Some(Ok(Ok(insight))) => Event::InsightResolved(insight.sanitized()),
            Some(Ok(Err(e))) => Event::InsightFailed(e.to_string()),
            Some(Err(e)) => Event::InsightFailed(format!("insight task panicked: {e}")),
            None => {
                self.pending = Some(PendingInsight { request, handle });
                return;
            }
        };
        tracing::debug!(
            signal = %request.signal,
            modulator = %request.modulator,
            "Insight request settled"
        );
        self.dispatch(event);
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Nudge the carousel one item left (`-1`) or right (`+1`).
    pub fn nudge_carousel(&mut self, direction: isize) {
        if self.screen() == Screen::SignalSelection {
            self.carousel.scroll_by(direction);
        }
    }

    /// Fine-scroll the carousel by `delta` columns.
    pub fn scroll_carousel(&mut self, delta: f32) {
        if self.screen() == Screen::SignalSelection {
            self.carousel.scroll_by_offset(delta);
        }
    }

    /// Commit the signal under the carousel centre line.
    pub fn confirm_signal(&mut self) {
        if self.screen() != Screen::SignalSelection {
            return;
        }
        let Some(signal) = self.carousel.select_active().copied() else {
            tracing::debug!("Carousel not ready; ignoring selection");
            return;
        };
        self.dispatch(Event::SelectSignal(signal));
    }

    pub fn move_modulator_cursor(&mut self, delta: isize) {
        if self.screen() != Screen::ModulatorSelection {
            return;
        }
        let len = self.catalog().modulators().len();
        if len == 0 {
            return;
        }
        self.modulator_cursor = self
            .modulator_cursor
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    pub fn confirm_modulator(&mut self) {
        self.select_modulator_at(self.modulator_cursor);
    }

    /// Select the modulator at `index` in display order.
    pub fn select_modulator_at(&mut self, index: usize) {
        if self.screen() != Screen::ModulatorSelection {
            return;
        }
        let Some(modulator) = self.catalog().modulator(index) else {
            return;
        };
        self.modulator_cursor = index;
        self.dispatch(Event::SelectModulator(modulator));
    }

    pub fn go_back(&mut self) {
        self.dispatch(Event::Back);
    }

    /// Start over from the insight card. Only once the card is fully revealed.
    pub fn begin_again(&mut self) {
        if !self.can_begin_again() {
            return;
        }
        self.dispatch(Event::Reset);
    }

    fn dispatch(&mut self, event: Event) {
        let from = self.screen();
        match self.workflow.apply(event) {
            Ok(Outcome::Ignored) => {}
            Ok(Outcome::Transitioned) => self.on_screen_entered(from),
            Ok(Outcome::RequestInsight(request)) => {
                self.start_request(request);
                self.on_screen_entered(from);
            }
            Err(e) => {
                tracing::error!("Invalid selection: {e}");
                debug_assert!(false, "invalid selection reached the workflow: {e}");
            }
        }
    }

    fn on_screen_entered(&mut self, from: Screen) {
        self.screen_elapsed = Duration::ZERO;
        // Coming back from the card keeps the cursor on the last choice.
        if self.screen() == Screen::ModulatorSelection && from == Screen::SignalSelection {
            self.modulator_cursor = 0;
        }
    }

    fn start_request(&mut self, request: InsightRequest) {
        if self.pending.is_some() {
            // The workflow only emits a request on entering Loading.
            tracing::error!("Insight request already in flight; dropping new request");
            return;
        }
        tracing::info!(
            provider = self.provider.name(),
            signal = %request.signal,
            modulator = %request.modulator,
            "Requesting insight"
        );
        let future = self
            .provider
            .generate(request.signal.name(), request.modulator.name());
        let handle = tokio::spawn(future);
        self.pending = Some(PendingInsight { request, handle });
    }
}
