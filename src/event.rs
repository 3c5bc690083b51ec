//! Module implementing the secondary (rate-coded) events carried by connections.
//!
//! Every connection variant transmits exactly one kind of event. The kind is used as a probe during the
//! handshake, and the event itself is stamped with the connection parameters and delivered at every step.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SynapseError;
use super::node::{NodeId, NodeResolver, Port, ThreadId};

/// The kinds of rate-coded events a node may send or handle.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A weighted rate transmitted with a delay.
    DelayedRate,
    /// A weighted rate transmitted within the same step.
    InstantaneousRate,
    /// A rate scaled by a drift and a diffusion factor, transmitted within the same step.
    Diffusion,
}

impl EventKind {
    /// All event kinds, in bit order.
    pub const ALL: [EventKind; 3] = [
        EventKind::DelayedRate,
        EventKind::InstantaneousRate,
        EventKind::Diffusion,
    ];

    fn bit(self) -> u8 {
        match self {
            EventKind::DelayedRate => 1,
            EventKind::InstantaneousRate => 1 << 1,
            EventKind::Diffusion => 1 << 2,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventKind::DelayedRate => write!(f, "DelayedRateNeuronEvent"),
            EventKind::InstantaneousRate => write!(f, "InstantaneousRateNeuronEvent"),
            EventKind::Diffusion => write!(f, "DiffusionEvent"),
        }
    }
}

/// A set of event kinds, stored as a bit mask.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct EventKindSet(u8);

impl EventKindSet {
    /// Returns the empty set.
    pub const fn empty() -> Self {
        EventKindSet(0)
    }

    /// Returns the set with the provided kinds.
    pub fn of(kinds: &[EventKind]) -> Self {
        kinds.iter().fold(Self::empty(), |set, &kind| set.with(kind))
    }

    /// Returns a copy of the set including the provided kind.
    pub fn with(self, kind: EventKind) -> Self {
        EventKindSet(self.0 | kind.bit())
    }

    /// Returns true if the set contains the provided kind.
    pub fn contains(&self, kind: EventKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns true if the set contains no kind.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns an iterator over the kinds in the set.
    pub fn iter(&self) -> impl Iterator<Item = EventKind> {
        let set = *self;
        EventKind::ALL
            .into_iter()
            .filter(move |&kind| set.contains(kind))
    }
}

/// Routing fields shared by all events.
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct EventHeader {
    /// ID of the sending node
    sender: NodeId,
    /// ID of the receiving node
    receiver: NodeId,
    /// Port of the receiving node
    rport: Port,
}

/// A borrowed view of an event, as handed to the receiving node.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ReceivedEvent<'a> {
    DelayedRate(&'a DelayedRateEvent),
    InstantaneousRate(&'a InstantaneousRateEvent),
    Diffusion(&'a DiffusionEvent),
}

impl ReceivedEvent<'_> {
    /// Returns the kind of the event.
    pub fn kind(&self) -> EventKind {
        match self {
            ReceivedEvent::DelayedRate(_) => EventKind::DelayedRate,
            ReceivedEvent::InstantaneousRate(_) => EventKind::InstantaneousRate,
            ReceivedEvent::Diffusion(_) => EventKind::Diffusion,
        }
    }
}

/// Common interface of the events transmitted by connections.
pub trait SecondaryEvent: Default + fmt::Debug {
    /// The kind of the event, used as a probe during the handshake.
    const KIND: EventKind;

    fn header(&self) -> &EventHeader;

    fn header_mut(&mut self) -> &mut EventHeader;

    /// Returns a view of the event for the receiving node.
    fn as_received(&self) -> ReceivedEvent<'_>;

    /// Returns the rate value carried by the event.
    fn rate(&self) -> f64;

    /// Set the rate value carried by the event.
    fn set_rate(&mut self, rate: f64);

    fn sender(&self) -> NodeId {
        self.header().sender
    }

    fn set_sender(&mut self, sender: NodeId) {
        self.header_mut().sender = sender;
    }

    fn receiver(&self) -> NodeId {
        self.header().receiver
    }

    fn set_receiver(&mut self, receiver: NodeId) {
        self.header_mut().receiver = receiver;
    }

    fn rport(&self) -> Port {
        self.header().rport
    }

    fn set_rport(&mut self, rport: Port) {
        self.header_mut().rport = rport;
    }

    /// Deliver the event to its receiver, resolved on the provided thread.
    fn deliver<R: NodeResolver + ?Sized>(
        &self,
        nodes: &mut R,
        thread: ThreadId,
    ) -> Result<(), SynapseError> {
        nodes
            .resolve_mut(self.receiver(), thread)?
            .handle(self.as_received());
        Ok(())
    }
}

/// Event carrying a weighted rate to be applied after a delay.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct DelayedRateEvent {
    header: EventHeader,
    rate: f64,
    weight: f64,
    delay_steps: u64,
}

impl DelayedRateEvent {
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Returns the delay (in steps) after which the rate applies.
    pub fn delay_steps(&self) -> u64 {
        self.delay_steps
    }

    pub fn set_delay_steps(&mut self, delay_steps: u64) {
        self.delay_steps = delay_steps;
    }
}

impl SecondaryEvent for DelayedRateEvent {
    const KIND: EventKind = EventKind::DelayedRate;

    fn header(&self) -> &EventHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    fn as_received(&self) -> ReceivedEvent<'_> {
        ReceivedEvent::DelayedRate(self)
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
}

/// Event carrying a weighted rate to be applied within the current step.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct InstantaneousRateEvent {
    header: EventHeader,
    rate: f64,
    weight: f64,
}

impl InstantaneousRateEvent {
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}

impl SecondaryEvent for InstantaneousRateEvent {
    const KIND: EventKind = EventKind::InstantaneousRate;

    fn header(&self) -> &EventHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    fn as_received(&self) -> ReceivedEvent<'_> {
        ReceivedEvent::InstantaneousRate(self)
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
}

/// Event carrying a rate together with the factors scaling its contribution to the mean (drift) and the
/// variance (diffusion) of the receiver input. It has neither weight nor delay.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct DiffusionEvent {
    header: EventHeader,
    rate: f64,
    drift_factor: f64,
    diffusion_factor: f64,
}

impl DiffusionEvent {
    pub fn drift_factor(&self) -> f64 {
        self.drift_factor
    }

    pub fn set_drift_factor(&mut self, drift_factor: f64) {
        self.drift_factor = drift_factor;
    }

    pub fn diffusion_factor(&self) -> f64 {
        self.diffusion_factor
    }

    pub fn set_diffusion_factor(&mut self, diffusion_factor: f64) {
        self.diffusion_factor = diffusion_factor;
    }
}

impl SecondaryEvent for DiffusionEvent {
    const KIND: EventKind = EventKind::Diffusion;

    fn header(&self) -> &EventHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    fn as_received(&self) -> ReceivedEvent<'_> {
        ReceivedEvent::Diffusion(self)
    }

    fn rate(&self) -> f64 {
        self.rate
    }

    fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }
}
