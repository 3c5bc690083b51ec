//! Rate connection with a weight and no delay, between rate neurons.

use derivative::Derivative;
use serde::{Deserialize, Serialize};

use crate::dictionary::{Dictionary, StatusKey};
use crate::error::SynapseError;
use crate::event::{InstantaneousRateEvent, SecondaryEvent};
use crate::node::{NodeResolver, ThreadId};

use super::{CommonProperties, Connection, ConnectionBase, ConnectorModel, SynapseModel};

/// Represents an instantaneous rate connection. Transmits [`InstantaneousRateEvent`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct RateConnectionInstantaneous {
    #[derivative(Default(value = "ConnectionBase::without_delay()"))]
    base: ConnectionBase,
    /// Connection weight
    #[derivative(Default(value = "1.0"))]
    weight: f64,
}

impl RateConnectionInstantaneous {
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Connection for RateConnectionInstantaneous {
    type Event = InstantaneousRateEvent;

    const MODEL: SynapseModel = SynapseModel::RateInstantaneous;

    fn base(&self) -> &ConnectionBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConnectionBase {
        &mut self.base
    }

    fn send<R: NodeResolver + ?Sized>(
        &self,
        event: &mut InstantaneousRateEvent,
        thread: ThreadId,
        _cp: &CommonProperties,
        nodes: &mut R,
    ) -> Result<(), SynapseError> {
        event.set_weight(self.weight);
        event.set_receiver(self.target(thread)?);
        event.set_rport(self.rport());
        event.deliver(nodes, thread)
    }

    fn get_status(&self, d: &mut Dictionary) {
        d.define(StatusKey::SynapseModel, Self::MODEL.name());
        self.base.get_status(d);
        d.define(StatusKey::Weight, self.weight);
        d.define(StatusKey::SizeOf, std::mem::size_of::<Self>());
    }

    fn set_status(&mut self, d: &Dictionary, _cm: &ConnectorModel) -> Result<(), SynapseError> {
        Self::MODEL.check_keys(d)?;
        self.weight = d.extract_or(StatusKey::Weight, self.weight)?;
        Ok(())
    }

    fn set_weight(&mut self, weight: f64) -> Result<(), SynapseError> {
        self.weight = weight;
        Ok(())
    }

    fn set_delay(&mut self, _delay_steps: u64, _cm: &ConnectorModel) -> Result<(), SynapseError> {
        Err(Self::MODEL.invalid_property(StatusKey::Delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status() {
        let cm = ConnectorModel::new(SynapseModel::RateInstantaneous);
        let mut connection = RateConnectionInstantaneous::default();
        assert_eq!(connection.delay_steps(), 0);

        connection
            .set_status(&Dictionary::new().with(StatusKey::Weight, 0.75), &cm)
            .unwrap();
        assert_eq!(connection.weight(), 0.75);

        let status = connection.status();
        assert!(!status.contains(StatusKey::Delay));
        assert_eq!(status.extract::<f64>(StatusKey::Weight), Ok(Some(0.75)));

        let mut copy = RateConnectionInstantaneous::default();
        copy.set_status(&status, &cm).unwrap();
        assert_eq!(copy, connection);
    }

    #[test]
    fn test_no_delay() {
        let cm = ConnectorModel::new(SynapseModel::RateInstantaneous);
        let mut connection = RateConnectionInstantaneous::default();

        let d = Dictionary::new()
            .with(StatusKey::Weight, 5.0)
            .with(StatusKey::Delay, 2);
        assert_eq!(
            connection.set_status(&d, &cm),
            Err(SynapseError::InvalidPropertyForVariant(
                "rate_connection_instantaneous has no delay.".to_string()
            ))
        );
        assert_eq!(connection.weight(), 1.0);
        assert!(connection.set_delay(2, &cm).is_err());

        assert_eq!(connection.set_weight(5.0), Ok(()));
        assert_eq!(connection.weight(), 5.0);
    }
}
