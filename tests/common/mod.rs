#![allow(dead_code)]

use rusty_rate::dictionary::Dictionary;
use rusty_rate::error::SynapseError;
use rusty_rate::event::{
    DelayedRateEvent, DiffusionEvent, EventKind, EventKindSet, InstantaneousRateEvent, ReceivedEvent,
};
use rusty_rate::node::{Capabilities, Node, NodeId, NodeResolver, ThreadId};

/// A node recording every event it handles.
#[derive(Debug, Clone)]
pub struct Recorder {
    id: NodeId,
    capabilities: Capabilities,
    pub delayed_rate: Vec<DelayedRateEvent>,
    pub instantaneous_rate: Vec<InstantaneousRateEvent>,
    pub diffusion: Vec<DiffusionEvent>,
}

impl Recorder {
    pub fn new(id: NodeId, capabilities: Capabilities) -> Self {
        Recorder {
            id,
            capabilities,
            delayed_rate: vec![],
            instantaneous_rate: vec![],
            diffusion: vec![],
        }
    }

    /// A recorder sending every kind and handling every kind on each of its receptors.
    pub fn universal(id: NodeId, num_receptors: usize) -> Self {
        let all = EventKindSet::of(&EventKind::ALL);
        let capabilities = (0..num_receptors).fold(
            EventKind::ALL
                .into_iter()
                .fold(Capabilities::new(), |c, kind| c.emitting(kind)),
            |c, _| c.with_receptor(all),
        );
        Recorder::new(id, capabilities)
    }

    pub fn num_events(&self) -> usize {
        self.delayed_rate.len() + self.instantaneous_rate.len() + self.diffusion.len()
    }
}

impl Node for Recorder {
    fn id(&self) -> NodeId {
        self.id
    }

    fn model(&self) -> &str {
        "recorder"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn rate(&self) -> f64 {
        0.0
    }

    fn get_status(&self, d: &mut Dictionary) {
        d.insert("num_events", self.num_events());
    }

    fn handle(&mut self, event: ReceivedEvent<'_>) {
        match event {
            ReceivedEvent::DelayedRate(e) => self.delayed_rate.push(e.clone()),
            ReceivedEvent::InstantaneousRate(e) => self.instantaneous_rate.push(e.clone()),
            ReceivedEvent::Diffusion(e) => self.diffusion.push(e.clone()),
        }
    }
}

/// A source and a target, with IDs 0 and 1.
pub struct Pair {
    pub source: Recorder,
    pub target: Recorder,
}

impl NodeResolver for Pair {
    fn resolve(&self, id: NodeId, _thread: ThreadId) -> Result<&dyn Node, SynapseError> {
        match id {
            0 => Ok(&self.source),
            1 => Ok(&self.target),
            _ => Err(SynapseError::UnknownNode(id)),
        }
    }

    fn resolve_mut(&mut self, id: NodeId, _thread: ThreadId) -> Result<&mut dyn Node, SynapseError> {
        match id {
            0 => Ok(&mut self.source),
            1 => Ok(&mut self.target),
            _ => Err(SynapseError::UnknownNode(id)),
        }
    }
}
