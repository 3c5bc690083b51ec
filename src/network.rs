//! Network structure owning the nodes and the rate connections between them.
//!
//! Connections are created by model name, configured from a status dictionary and negotiated through the
//! handshake. A failed connection leaves the network unchanged.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::connection::delay_rate::DelayRateConnection;
use super::connection::diffusion::DiffusionConnection;
use super::connection::rate_instantaneous::RateConnectionInstantaneous;
use super::connection::{CommonProperties, Connection, ConnectorModel, DelayChecker, SynapseModel};
use super::dictionary::Dictionary;
use super::error::SynapseError;
use super::event::SecondaryEvent;
use super::node::{Node, NodeId, NodeResolver, Port, ThreadId};
use super::MIN_PARALLEL_CONNECTIONS;

/// A connection of any model.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub enum AnyConnection {
    DelayRate(DelayRateConnection),
    RateInstantaneous(RateConnectionInstantaneous),
    Diffusion(DiffusionConnection),
}

impl AnyConnection {
    /// Create a connection of the provided model, with default parameters.
    pub fn new(model: SynapseModel) -> Self {
        match model {
            SynapseModel::DelayRate => AnyConnection::DelayRate(DelayRateConnection::default()),
            SynapseModel::RateInstantaneous => {
                AnyConnection::RateInstantaneous(RateConnectionInstantaneous::default())
            }
            SynapseModel::Diffusion => AnyConnection::Diffusion(DiffusionConnection::default()),
        }
    }

    pub fn model(&self) -> SynapseModel {
        match self {
            AnyConnection::DelayRate(_) => DelayRateConnection::MODEL,
            AnyConnection::RateInstantaneous(_) => RateConnectionInstantaneous::MODEL,
            AnyConnection::Diffusion(_) => DiffusionConnection::MODEL,
        }
    }

    pub fn target(&self, thread: ThreadId) -> Result<NodeId, SynapseError> {
        match self {
            AnyConnection::DelayRate(c) => c.target(thread),
            AnyConnection::RateInstantaneous(c) => c.target(thread),
            AnyConnection::Diffusion(c) => c.target(thread),
        }
    }

    pub fn rport(&self) -> Port {
        match self {
            AnyConnection::DelayRate(c) => c.rport(),
            AnyConnection::RateInstantaneous(c) => c.rport(),
            AnyConnection::Diffusion(c) => c.rport(),
        }
    }

    pub fn check_connection(
        &mut self,
        source: &dyn Node,
        target: &dyn Node,
        receptor: usize,
        cp: &CommonProperties,
    ) -> Result<(), SynapseError> {
        match self {
            AnyConnection::DelayRate(c) => c.check_connection(source, target, receptor, cp),
            AnyConnection::RateInstantaneous(c) => c.check_connection(source, target, receptor, cp),
            AnyConnection::Diffusion(c) => c.check_connection(source, target, receptor, cp),
        }
    }

    pub fn get_status(&self, d: &mut Dictionary) {
        match self {
            AnyConnection::DelayRate(c) => c.get_status(d),
            AnyConnection::RateInstantaneous(c) => c.get_status(d),
            AnyConnection::Diffusion(c) => c.get_status(d),
        }
    }

    pub fn status(&self) -> Dictionary {
        let mut d = Dictionary::new();
        self.get_status(&mut d);
        d
    }

    pub fn set_status(&mut self, d: &Dictionary, cm: &ConnectorModel) -> Result<(), SynapseError> {
        match self {
            AnyConnection::DelayRate(c) => c.set_status(d, cm),
            AnyConnection::RateInstantaneous(c) => c.set_status(d, cm),
            AnyConnection::Diffusion(c) => c.set_status(d, cm),
        }
    }

    /// Send the rate of the source along the connection.
    pub fn send_rate<R: NodeResolver + ?Sized>(
        &self,
        sender: NodeId,
        rate: f64,
        thread: ThreadId,
        cp: &CommonProperties,
        nodes: &mut R,
    ) -> Result<(), SynapseError> {
        match self {
            AnyConnection::DelayRate(c) => send_rate(c, sender, rate, thread, cp, nodes),
            AnyConnection::RateInstantaneous(c) => send_rate(c, sender, rate, thread, cp, nodes),
            AnyConnection::Diffusion(c) => send_rate(c, sender, rate, thread, cp, nodes),
        }
    }
}

fn send_rate<C: Connection, R: NodeResolver + ?Sized>(
    connection: &C,
    sender: NodeId,
    rate: f64,
    thread: ThreadId,
    cp: &CommonProperties,
    nodes: &mut R,
) -> Result<(), SynapseError> {
    let mut event = C::Event::default();
    event.set_sender(sender);
    event.set_rate(rate);
    connection.send(&mut event, thread, cp, nodes)
}

/// Locates a connection: the source node and the position among its outgoing connections.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct ConnectionId {
    pub source: NodeId,
    pub index: usize,
}

/// Represents a network of rate units.
pub struct Network {
    nodes: Vec<Box<dyn Node>>,
    /// Outgoing connections, indexed by source ID
    connections: Vec<Vec<AnyConnection>>,
    /// One connector model per synapse model, in the order of `SynapseModel::ALL`
    connector_models: Vec<ConnectorModel>,
}

impl Default for Network {
    fn default() -> Self {
        Network::new()
    }
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Network {
            nodes: vec![],
            connections: vec![],
            connector_models: SynapseModel::ALL
                .into_iter()
                .map(ConnectorModel::new)
                .collect(),
        }
    }

    /// Add a node built from its ID and returns the ID.
    pub fn add_node<N, F>(&mut self, build: F) -> NodeId
    where
        N: Node + 'static,
        F: FnOnce(NodeId) -> N,
    {
        let id = self.nodes.len();
        self.nodes.push(Box::new(build(id)));
        self.connections.push(vec![]);
        id
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the total number of connections in the network.
    pub fn num_connections(&self) -> usize {
        self.connections.iter().map(|c| c.len()).sum()
    }

    pub fn node(&self, id: NodeId) -> Result<&dyn Node, SynapseError> {
        self.nodes.resolve(id, 0)
    }

    /// Returns the status of a node.
    pub fn get_node_status(&self, id: NodeId) -> Result<Dictionary, SynapseError> {
        let mut d = Dictionary::new();
        self.node(id)?.get_status(&mut d);
        Ok(d)
    }

    pub fn connector_model(&self, model: SynapseModel) -> &ConnectorModel {
        &self.connector_models[model as usize]
    }

    /// Set the delay bounds of a model. Existing connections are not checked again.
    pub fn set_delay_checker(&mut self, model: SynapseModel, delay_checker: DelayChecker) {
        self.connector_models[model as usize].set_delay_checker(delay_checker);
    }

    /// Set the parameters applied to every new connection of a model.
    /// The parameters are validated against the model before being stored.
    pub fn set_defaults(&mut self, model: SynapseModel, defaults: Dictionary) -> Result<(), SynapseError> {
        self.connector_models[model as usize].set_defaults(defaults)
    }

    /// Connect two nodes with a connection of the named model on the provided receptor of the target.
    /// The connection is configured from the model defaults, then from the provided parameters, and negotiated
    /// with the nodes. Returns the ID of the new connection.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        model: &str,
        receptor: usize,
        params: &Dictionary,
    ) -> Result<ConnectionId, SynapseError> {
        let model = SynapseModel::from_name(model)?;
        let cm = &self.connector_models[model as usize];
        let source_node = self.nodes.resolve(source, 0)?;
        let target_node = self.nodes.resolve(target, 0)?;

        let mut connection = AnyConnection::new(model);
        connection.set_status(cm.defaults(), cm)?;
        connection.set_status(params, cm)?;
        connection.check_connection(source_node, target_node, receptor, cm.common())?;

        let outgoing = &mut self.connections[source];
        outgoing.push(connection);
        Ok(ConnectionId {
            source,
            index: outgoing.len() - 1,
        })
    }

    /// Returns the outgoing connections of a node.
    pub fn connections_from(&self, source: NodeId) -> Result<&[AnyConnection], SynapseError> {
        self.connections
            .get(source)
            .map(|c| c.as_slice())
            .ok_or(SynapseError::UnknownNode(source))
    }

    fn connection(&self, id: ConnectionId) -> Result<&AnyConnection, SynapseError> {
        self.connections_from(id.source)?
            .get(id.index)
            .ok_or_else(|| {
                SynapseError::InvalidParameter(format!(
                    "Node {} has no connection {}",
                    id.source, id.index
                ))
            })
    }

    pub fn get_connection_status(&self, id: ConnectionId) -> Result<Dictionary, SynapseError> {
        Ok(self.connection(id)?.status())
    }

    /// Update the parameters of a connection. On error, the connection is left unchanged.
    pub fn set_connection_status(&mut self, id: ConnectionId, d: &Dictionary) -> Result<(), SynapseError> {
        let connection = self
            .connections
            .get_mut(id.source)
            .ok_or(SynapseError::UnknownNode(id.source))?
            .get_mut(id.index)
            .ok_or_else(|| {
                SynapseError::InvalidParameter(format!(
                    "Node {} has no connection {}",
                    id.source, id.index
                ))
            })?;
        let cm = &self.connector_models[connection.model() as usize];
        connection.set_status(d, cm)
    }

    /// Returns the status of every connection, ordered by source and creation.
    pub fn connection_statuses(&self) -> Vec<Dictionary> {
        if self.num_connections() < MIN_PARALLEL_CONNECTIONS {
            self.connections
                .iter()
                .flatten()
                .map(AnyConnection::status)
                .collect()
        } else {
            self.connections
                .par_iter()
                .flat_map_iter(|outgoing| outgoing.iter().map(AnyConnection::status))
                .collect()
        }
    }

    /// Send the current rate of the source along all its outgoing connections.
    /// Returns the number of events delivered.
    pub fn propagate(&mut self, source: NodeId, thread: ThreadId) -> Result<usize, SynapseError> {
        let rate = self.nodes.resolve(source, thread)?.rate();
        let outgoing = self
            .connections
            .get(source)
            .ok_or(SynapseError::UnknownNode(source))?;

        for connection in outgoing {
            let cm = &self.connector_models[connection.model() as usize];
            connection.send_rate(source, rate, thread, cm.common(), &mut self.nodes)?;
        }
        Ok(outgoing.len())
    }

    /// Propagate the rate of every node.
    pub fn propagate_all(&mut self, thread: ThreadId) -> Result<usize, SynapseError> {
        let mut num_events = 0;
        for source in 0..self.nodes.len() {
            num_events += self.propagate(source, thread)?;
        }
        Ok(num_events)
    }
}
