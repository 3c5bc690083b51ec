//! Instantaneous connection between mean-field (e.g., Siegert) units, propagating the rate of the source into
//! the mean and the variance of the target input.
//!
//! The connection has no delay, and its weight is replaced by two factors: `drift_factor` scales the
//! contribution to the mean input and `diffusion_factor` the contribution to the input variance. Setting the
//! weight or the delay is an error.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::dictionary::{Dictionary, StatusKey};
use crate::error::SynapseError;
use crate::event::{DiffusionEvent, SecondaryEvent};
use crate::node::{NodeResolver, ThreadId};

use super::{CommonProperties, Connection, ConnectionBase, ConnectorModel, SynapseModel};

/// Represents a diffusion connection. Transmits [`DiffusionEvent`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct DiffusionConnection {
    #[derivative(Default(value = "ConnectionBase::without_delay()"))]
    base: ConnectionBase,
    /// Stored but write-protected, never transmitted
    #[derivative(Default(value = "1.0"))]
    weight: f64,
    /// Factor of the source rate in the target mean input
    #[derivative(Default(value = "1.0"))]
    drift_factor: f64,
    /// Factor of the source rate in the target input variance
    #[derivative(Default(value = "1.0"))]
    diffusion_factor: f64,
}

impl DiffusionConnection {
    /// Returns the inert weight of the connection.
    pub fn weight(&self) -> f64 {
        self.weight
    }

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

impl Connection for DiffusionConnection {
    type Event = DiffusionEvent;

    const MODEL: SynapseModel = SynapseModel::Diffusion;

    fn base(&self) -> &ConnectionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConnectionBase {
        &mut self.base
    }

    fn send<R: NodeResolver + ?Sized>(
        &self,
        event: &mut DiffusionEvent,
        thread: ThreadId,
        _cp: &CommonProperties,
        nodes: &mut R,
    ) -> Result<(), SynapseError> {
        event.set_drift_factor(self.drift_factor);
        event.set_diffusion_factor(self.diffusion_factor);
        event.set_receiver(self.target(thread)?);
        event.set_rport(self.rport());
        event.deliver(nodes, thread)
    }

    fn get_status(&self, d: &mut Dictionary) {
        d.define(StatusKey::SynapseModel, Self::MODEL.name());
        self.base.get_status(d);
        d.define(StatusKey::Weight, self.weight);
        d.define(StatusKey::DriftFactor, self.drift_factor);
        d.define(StatusKey::DiffusionFactor, self.diffusion_factor);
        d.define(StatusKey::SizeOf, std::mem::size_of::<Self>());
    }

    fn set_status(&mut self, d: &Dictionary, _cm: &ConnectorModel) -> Result<(), SynapseError> {
        // rejects weight and delay before any factor is read
        Self::MODEL.check_keys(d)?;
        let drift_factor = d.extract_or(StatusKey::DriftFactor, self.drift_factor)?;
        let diffusion_factor = d.extract_or(StatusKey::DiffusionFactor, self.diffusion_factor)?;

        self.drift_factor = drift_factor;
        self.diffusion_factor = diffusion_factor;
        Ok(())
    }

    fn set_weight(&mut self, _weight: f64) -> Result<(), SynapseError> {
        Err(Self::MODEL.invalid_property(StatusKey::Weight))
    }

    fn set_delay(&mut self, _delay_steps: u64, _cm: &ConnectorModel) -> Result<(), SynapseError> {
        Err(Self::MODEL.invalid_property(StatusKey::Delay))
    }
}
