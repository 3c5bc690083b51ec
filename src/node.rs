//! Module defining the contract between connections and the nodes they link.
//!
//! A node declares which event kinds it sends and, for each of its receptors, which event kinds it
//! handles. Connections query these capabilities once, during the handshake.

use serde::{Deserialize, Serialize};

use super::dictionary::Dictionary;
use super::error::SynapseError;
use super::event::{EventKind, EventKindSet, ReceivedEvent};

/// Locator of a node in the network.
pub type NodeId = usize;
/// Resolved input port of a receiving node.
pub type Port = usize;
/// ID of the thread visiting a connection.
pub type ThreadId = usize;

/// The event kinds a node sends and handles, the latter per receptor.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Event kinds the node sends
    emits: EventKindSet,
    /// Event kinds handled by each receptor, indexed by receptor type
    receptors: Vec<EventKindSet>,
}

impl Capabilities {
    /// Create capabilities with no emitted kind and no receptor.
    pub fn new() -> Self {
        Capabilities::default()
    }

    /// Returns the capabilities extended with an emitted event kind.
    pub fn emitting(mut self, kind: EventKind) -> Self {
        self.emits = self.emits.with(kind);
        self
    }

    /// Returns the capabilities extended with a new receptor handling the provided kinds.
    /// Receptors are numbered in the order they are added, starting from 0.
    pub fn with_receptor(mut self, handles: EventKindSet) -> Self {
        self.receptors.push(handles);
        self
    }

    /// Returns the set of emitted event kinds.
    pub fn emits(&self) -> EventKindSet {
        self.emits
    }

    /// Returns the number of receptors.
    pub fn num_receptors(&self) -> usize {
        self.receptors.len()
    }

    /// Resolve the port handling the event kind on the provided receptor.
    pub fn resolve_receptor(
        &self,
        model: &str,
        kind: EventKind,
        receptor: usize,
    ) -> Result<Port, SynapseError> {
        match self.receptors.get(receptor) {
            None => Err(SynapseError::UnknownReceptorType {
                model: model.to_string(),
                receptor,
            }),
            Some(handles) if !handles.contains(kind) => Err(SynapseError::IncompatibleEventKind {
                model: model.to_string(),
                kind,
                receptor,
            }),
            Some(_) => Ok(receptor),
        }
    }
}

/// A simulated unit able to send and handle rate events.
pub trait Node: Send {
    /// Returns the node ID.
    fn id(&self) -> NodeId;

    /// Returns the name of the node model.
    fn model(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    /// Returns the rate the node propagates along its outgoing connections.
    fn rate(&self) -> f64;

    /// Write the state of the node to the dictionary.
    fn get_status(&self, d: &mut Dictionary) {
        d.insert("model", self.model());
        d.insert("node_id", self.id());
        d.insert("rate", self.rate());
    }

    /// Returns an error if the node does not send events like the probe.
    fn sends_secondary_event(&self, probe: ReceivedEvent<'_>) -> Result<(), SynapseError> {
        if self.capabilities().emits().contains(probe.kind()) {
            Ok(())
        } else {
            Err(SynapseError::UnsupportedEventKind {
                model: self.model().to_string(),
                kind: probe.kind(),
            })
        }
    }

    /// Returns the port handling events like the probe on the provided receptor.
    fn handles_test_event(&self, probe: ReceivedEvent<'_>, receptor: usize) -> Result<Port, SynapseError> {
        self.capabilities()
            .resolve_receptor(self.model(), probe.kind(), receptor)
    }

    /// Handle an event delivered by a connection.
    fn handle(&mut self, event: ReceivedEvent<'_>);
}

/// Resolves node locators to live nodes.
pub trait NodeResolver {
    fn resolve(&self, id: NodeId, thread: ThreadId) -> Result<&dyn Node, SynapseError>;

    fn resolve_mut(&mut self, id: NodeId, thread: ThreadId) -> Result<&mut dyn Node, SynapseError>;
}

/// Nodes stored by ID, on a single thread.
impl NodeResolver for Vec<Box<dyn Node>> {
    fn resolve(&self, id: NodeId, _thread: ThreadId) -> Result<&dyn Node, SynapseError> {
        match self.get(id) {
            Some(node) => Ok(node.as_ref()),
            None => Err(SynapseError::UnknownNode(id)),
        }
    }

    fn resolve_mut(&mut self, id: NodeId, _thread: ThreadId) -> Result<&mut dyn Node, SynapseError> {
        match self.get_mut(id) {
            Some(node) => {
                let node: &mut dyn Node = node.as_mut();
                Ok(node)
            }
            None => Err(SynapseError::UnknownNode(id)),
        }
    }
}
