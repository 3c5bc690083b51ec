//! Rate connection with a weight and a transmission delay, between rate neurons.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::dictionary::{Dictionary, StatusKey};
use crate::error::SynapseError;
use crate::event::{DelayedRateEvent, SecondaryEvent};
use crate::node::{NodeResolver, ThreadId};

use super::{CommonProperties, Connection, ConnectionBase, ConnectorModel, SynapseModel};

/// Represents a delayed rate connection. Transmits [`DelayedRateEvent`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct DelayRateConnection {
    base: ConnectionBase,
    /// Connection weight
    #[derivative(Default(value = "1.0"))]
    weight: f64,
}

impl DelayRateConnection {
    /// Returns the weight of the connection.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Connection for DelayRateConnection {
    type Event = DelayedRateEvent;

    const MODEL: SynapseModel = SynapseModel::DelayRate;

    fn base(&self) -> &ConnectionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConnectionBase {
        &mut self.base
    }

    fn send<R: NodeResolver + ?Sized>(
        &self,
        event: &mut DelayedRateEvent,
        thread: ThreadId,
        _cp: &CommonProperties,
        nodes: &mut R,
    ) -> Result<(), SynapseError> {
        event.set_weight(self.weight);
        event.set_delay_steps(self.delay_steps());
        event.set_receiver(self.target(thread)?);
        event.set_rport(self.rport());
        event.deliver(nodes, thread)
    }

    fn get_status(&self, d: &mut Dictionary) {
        d.define(StatusKey::SynapseModel, Self::MODEL.name());
        self.base.get_status(d);
        d.define(StatusKey::Delay, self.base.delay_steps());
        d.define(StatusKey::Weight, self.weight);
        d.define(StatusKey::SizeOf, std::mem::size_of::<Self>());
    }

    fn set_status(&mut self, d: &Dictionary, cm: &ConnectorModel) -> Result<(), SynapseError> {
        Self::MODEL.check_keys(d)?;
        let delay_steps = self.base.staged_delay_steps(d, cm.delay_checker())?;
        let weight = d.extract_or(StatusKey::Weight, self.weight)?;

        self.base.delay_steps = delay_steps;
        self.weight = weight;
        Ok(())
    }

    fn set_weight(&mut self, weight: f64) -> Result<(), SynapseError> {
        self.weight = weight;
        Ok(())
    }
}
