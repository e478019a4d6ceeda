//! The fixed, compiled-in lists of signals and modulators.
//!
//! The catalog is read-only for the lifetime of the process. Order matters:
//! the carousel and the modulator list both render in declaration order.

use crate::{Modulator, Signal};

pub const SIGNALS: [Signal; 5] = [
    Signal::new("Clarity", "A feeling of knowing the path forward."),
    Signal::new("Momentum", "The sense of making tangible progress."),
    Signal::new("Confidence", "A strong belief in your own ability."),
    Signal::new("Ambiguity", "A lack of clarity; the path is unclear."),
    Signal::new("Tension", "A feeling of friction or unresolved conflict."),
];

pub const MODULATORS: [Modulator; 5] = [
    Modulator::new("Resonance", "A deep, intuitive sense of alignment."),
    Modulator::new("Cohesion", "A feeling of unity and togetherness."),
    Modulator::new("Adaptability", "The capacity to be flexible and pivot."),
    Modulator::new("Resistance", "An internal or external force pushing back."),
    Modulator::new("Curiosity", "An open, inquisitive approach to the unknown."),
];

/// Read-only view over the static signal and modulator lists.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    signals: &'static [Signal],
    modulators: &'static [Modulator],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            signals: &SIGNALS,
            modulators: &MODULATORS,
        }
    }

    #[must_use]
    pub const fn signals(&self) -> &'static [Signal] {
        self.signals
    }

    #[must_use]
    pub const fn modulators(&self) -> &'static [Modulator] {
        self.modulators
    }

    #[must_use]
    pub fn modulator(&self, index: usize) -> Option<Modulator> {
        self.modulators.get(index).copied()
    }

    #[must_use]
    pub fn find_signal(&self, name: &str) -> Option<Signal> {
        self.signals.iter().find(|s| s.name() == name).copied()
    }

    #[must_use]
    pub fn find_modulator(&self, name: &str) -> Option<Modulator> {
        self.modulators.iter().find(|m| m.name() == name).copied()
    }

    #[must_use]
    pub fn contains_signal(&self, signal: &Signal) -> bool {
        self.signals.contains(signal)
    }

    #[must_use]
    pub fn contains_modulator(&self, modulator: &Modulator) -> bool {
        self.modulators.contains(modulator)
    }
}
