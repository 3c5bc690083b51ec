//! This module provides rate units, the nodes linked by rate connections.
//!
//! Both units follow the [`Node`] contract: they declare the event kinds they send and, on receptor 0, the
//! event kinds they handle.

use std::collections::VecDeque;

use log::warn;

use super::dictionary::Dictionary;
use super::event::{EventKind, EventKindSet, ReceivedEvent, SecondaryEvent};
use super::node::{Capabilities, Node, NodeId};
use super::MAX_DELAY_STEPS;

/// Represents a rate neuron with linear gain.
///
/// Delayed input is kept per delay slot: an event with a delay of `d` steps contributes to the rate computed by
/// the `d`-th next call to [`RateNeuron::update`], instantaneous input to the next one.
#[derive(Debug, PartialEq, Clone)]
pub struct RateNeuron {
    id: NodeId,
    rate: f64,
    capabilities: Capabilities,
    delayed_input: VecDeque<f64>,
    instantaneous_input: f64,
}

impl RateNeuron {
    pub const MODEL: &'static str = "rate_neuron";

    /// Create a new rate neuron at rest.
    pub fn new(id: NodeId) -> Self {
        let rate_events = EventKindSet::of(&[EventKind::DelayedRate, EventKind::InstantaneousRate]);
        RateNeuron {
            id,
            rate: 0.0,
            capabilities: Capabilities::new()
                .emitting(EventKind::DelayedRate)
                .emitting(EventKind::InstantaneousRate)
                .with_receptor(rate_events),
            delayed_input: VecDeque::new(),
            instantaneous_input: 0.0,
        }
    }

    /// Set the rate propagated along outgoing connections.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Returns the input accumulated in the provided delay slot.
    pub fn delayed_input(&self, delay_steps: u64) -> f64 {
        self.delayed_input
            .get(delay_steps as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Returns the input accumulated for the current step.
    pub fn instantaneous_input(&self) -> f64 {
        self.instantaneous_input
    }

    /// Advance the neuron by one step: the rate becomes the input due now, and delayed input moves one slot closer.
    pub fn update(&mut self) {
        let due = self.delayed_input.pop_front().unwrap_or(0.0);
        self.rate = due + self.instantaneous_input;
        self.instantaneous_input = 0.0;
    }
}

impl Node for RateNeuron {
    fn id(&self) -> NodeId {
        self.id
    }

    fn model(&self) -> &str {
        Self::MODEL
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn get_status(&self, d: &mut Dictionary) {
        d.insert("model", Self::MODEL);
        d.insert("node_id", self.id);
        d.insert("rate", self.rate);
        d.insert("instantaneous_input", self.instantaneous_input);
        d.insert("delayed_input", Vec::from(self.delayed_input.clone()));
    }

    fn handle(&mut self, event: ReceivedEvent<'_>) {
        match event {
            ReceivedEvent::DelayedRate(e) => {
                if e.delay_steps() > MAX_DELAY_STEPS {
                    warn!(
                        "{} {} drops an event with delay {} beyond {} steps",
                        Self::MODEL,
                        self.id,
                        e.delay_steps(),
                        MAX_DELAY_STEPS
                    );
                    return;
                }
                let slot = e.delay_steps() as usize;
                if self.delayed_input.len() <= slot {
                    self.delayed_input.resize(slot + 1, 0.0);
                }
                self.delayed_input[slot] += e.weight() * e.rate();
            }
            ReceivedEvent::InstantaneousRate(e) => {
                self.instantaneous_input += e.weight() * e.rate();
            }
            ReceivedEvent::Diffusion(_) => {
                warn!("{} {} ignores {}", Self::MODEL, self.id, EventKind::Diffusion);
            }
        }
    }
}

/// Represents a mean-field unit receiving the drift (mean) and diffusion (variance) of its input.
/// The transfer from input statistics to rate is left to the caller.
#[derive(Debug, PartialEq, Clone)]
pub struct SiegertNeuron {
    id: NodeId,
    rate: f64,
    capabilities: Capabilities,
    drift_input: f64,
    diffusion_input: f64,
}

impl SiegertNeuron {
    pub const MODEL: &'static str = "siegert_neuron";

    pub fn new(id: NodeId) -> Self {
        SiegertNeuron {
            id,
            rate: 0.0,
            capabilities: Capabilities::new()
                .emitting(EventKind::Diffusion)
                .with_receptor(EventKindSet::of(&[EventKind::Diffusion])),
            drift_input: 0.0,
            diffusion_input: 0.0,
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    /// Returns the accumulated mean input.
    pub fn drift_input(&self) -> f64 {
        self.drift_input
    }

    /// Returns the accumulated input variance.
    pub fn diffusion_input(&self) -> f64 {
        self.diffusion_input
    }

    /// Clear the accumulated input.
    pub fn clear_input(&mut self) {
        self.drift_input = 0.0;
        self.diffusion_input = 0.0;
    }
}

impl Node for SiegertNeuron {
    fn id(&self) -> NodeId {
        self.id
    }

    fn model(&self) -> &str {
        Self::MODEL
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn get_status(&self, d: &mut Dictionary) {
        d.insert("model", Self::MODEL);
        d.insert("node_id", self.id);
        d.insert("rate", self.rate);
        d.insert("drift_input", self.drift_input);
        d.insert("diffusion_input", self.diffusion_input);
    }

    fn handle(&mut self, event: ReceivedEvent<'_>) {
        match event {
            ReceivedEvent::Diffusion(e) => {
                self.drift_input += e.drift_factor() * e.rate();
                self.diffusion_input += e.diffusion_factor() * e.rate();
            }
            other => warn!("{} {} ignores {}", Self::MODEL, self.id, other.kind()),
        }
    }
}
