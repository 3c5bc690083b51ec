//! Module implementing the concept of rate connections between nodes.
//!
//! Every connection model shares a [`ConnectionBase`] holding the target locator, the resolved receptor port
//! and the delay, and implements the [`Connection`] trait:
//! - the handshake ([`Connection::check_connection`]) is run once, when the connection is established;
//! - the dispatch ([`Connection::send`]) is run at every step for which the source has a rate to propagate;
//! - the status protocol ([`Connection::get_status`], [`Connection::set_status`]) reads and writes parameters
//!   through a [`Dictionary`].
//!
//! # Examples
//!
//! ```
//! use rusty_rate::connection::{Connection, ConnectorModel, SynapseModel};
//! use rusty_rate::connection::delay_rate::DelayRateConnection;
//! use rusty_rate::dictionary::{Dictionary, StatusKey};
//!
//! let cm = ConnectorModel::new(SynapseModel::DelayRate);
//! let mut connection = DelayRateConnection::default();
//!
//! let params = Dictionary::new().with(StatusKey::Weight, 2.5).with(StatusKey::Delay, 3_u64);
//! connection.set_status(&params, &cm).unwrap();
//!
//! assert_eq!(connection.weight(), 2.5);
//! assert_eq!(connection.delay_steps(), 3);
//! ```

use std::fmt;

use derivative::Derivative;
use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::dictionary::{Dictionary, StatusKey};
use super::error::SynapseError;
use super::event::{EventKind, SecondaryEvent};
use super::node::{Node, NodeId, NodeResolver, Port, ThreadId};
use super::{DEFAULT_DELAY_STEPS, MAX_DELAY_STEPS};

pub mod delay_rate;
pub mod diffusion;
pub mod rate_instantaneous;

/// The connection models, with the event kind they transmit and the parameters they expose.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum SynapseModel {
    /// Weighted rate connection with delay.
    DelayRate,
    /// Weighted rate connection without delay.
    RateInstantaneous,
    /// Drift and diffusion connection without delay, for mean-field units.
    Diffusion,
}

impl SynapseModel {
    pub const ALL: [SynapseModel; 3] = [
        SynapseModel::DelayRate,
        SynapseModel::RateInstantaneous,
        SynapseModel::Diffusion,
    ];

    /// Returns the name of the model.
    pub fn name(&self) -> &'static str {
        match self {
            SynapseModel::DelayRate => "delay_rate_connection",
            SynapseModel::RateInstantaneous => "rate_connection_instantaneous",
            SynapseModel::Diffusion => "diffusion_connection",
        }
    }

    /// Returns the model with the provided name.
    pub fn from_name(name: &str) -> Result<SynapseModel, SynapseError> {
        SynapseModel::ALL
            .into_iter()
            .find(|model| model.name() == name)
            .ok_or_else(|| SynapseError::UnknownSynapseModel(name.to_string()))
    }

    /// Returns the kind of event transmitted by the model.
    pub fn event_kind(&self) -> EventKind {
        match self {
            SynapseModel::DelayRate => EventKind::DelayedRate,
            SynapseModel::RateInstantaneous => EventKind::InstantaneousRate,
            SynapseModel::Diffusion => EventKind::Diffusion,
        }
    }

    /// Returns the keys a status dictionary may set on the model.
    pub fn settable_keys(&self) -> &'static [StatusKey] {
        match self {
            SynapseModel::DelayRate => &[StatusKey::Delay, StatusKey::Weight],
            SynapseModel::RateInstantaneous => &[StatusKey::Weight],
            SynapseModel::Diffusion => &[StatusKey::DiffusionFactor, StatusKey::DriftFactor],
        }
    }

    /// Returns the keys reported by the status of the model.
    /// The target is only reported once the handshake is done.
    pub fn reported_keys(&self) -> &'static [StatusKey] {
        match self {
            SynapseModel::DelayRate => &[
                StatusKey::Delay,
                StatusKey::Receptor,
                StatusKey::SizeOf,
                StatusKey::SynapseModel,
                StatusKey::Target,
                StatusKey::Weight,
            ],
            SynapseModel::RateInstantaneous => &[
                StatusKey::Receptor,
                StatusKey::SizeOf,
                StatusKey::SynapseModel,
                StatusKey::Target,
                StatusKey::Weight,
            ],
            SynapseModel::Diffusion => &[
                StatusKey::DiffusionFactor,
                StatusKey::DriftFactor,
                StatusKey::Receptor,
                StatusKey::SizeOf,
                StatusKey::SynapseModel,
                StatusKey::Target,
                StatusKey::Weight,
            ],
        }
    }

    /// Returns true if the model transmits a delay.
    pub fn has_delay(&self) -> bool {
        self.settable_keys().contains(&StatusKey::Delay)
    }

    /// Returns the error for a key that cannot be set on the model.
    pub fn invalid_property(&self, key: StatusKey) -> SynapseError {
        match (self, key) {
            (SynapseModel::Diffusion, StatusKey::Weight) => SynapseError::InvalidPropertyForVariant(
                "Please use the parameters \"drift_factor\" and \"diffusion_factor\" to specify the weights"
                    .to_string(),
            ),
            (_, StatusKey::Delay) => {
                SynapseError::InvalidPropertyForVariant(format!("{} has no delay.", self.name()))
            }
            _ => SynapseError::InvalidPropertyForVariant(format!(
                "{} cannot be set on {}, expected one of: {}",
                key,
                self.name(),
                self.settable_keys().iter().join(", ")
            )),
        }
    }

    /// Check the keys of a status dictionary before any of them is applied.
    /// Read-only keys are accepted and ignored, so that a status can be written back as is.
    /// Unknown names are ignored with a warning.
    /// Keys the model cannot set are reported in the order delay, weight, drift_factor, diffusion_factor.
    pub fn check_keys(&self, d: &Dictionary) -> Result<(), SynapseError> {
        let rejected = [
            StatusKey::Delay,
            StatusKey::Weight,
            StatusKey::DriftFactor,
            StatusKey::DiffusionFactor,
        ]
        .into_iter()
        .find(|key| d.contains(*key) && !self.settable_keys().contains(key));
        if let Some(key) = rejected {
            return Err(self.invalid_property(key));
        }

        let unknown = d
            .keys()
            .filter(|name| StatusKey::from_name(name).is_none())
            .collect::<Vec<_>>();
        if !unknown.is_empty() {
            warn!(
                "Ignoring unknown parameters for {}: {}",
                self.name(),
                unknown.iter().join(", ")
            );
        }
        Ok(())
    }
}

impl fmt::Display for SynapseModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Properties shared by all connections of a model.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct CommonProperties {}

/// Validates delays against the range allowed by the simulation resolution.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct DelayChecker {
    /// The minimum delay, in steps
    #[derivative(Default(value = "DEFAULT_DELAY_STEPS"))]
    min_delay_steps: u64,
    /// The maximum delay, in steps
    #[derivative(Default(value = "MAX_DELAY_STEPS"))]
    max_delay_steps: u64,
}

impl DelayChecker {
    /// Create a delay checker with the provided bounds (inclusive).
    /// The maximum delay must not exceed [`MAX_DELAY_STEPS`].
    pub fn build(min_delay_steps: u64, max_delay_steps: u64) -> Result<Self, SynapseError> {
        if min_delay_steps > max_delay_steps {
            return Err(SynapseError::InvalidParameter(format!(
                "The minimum delay ({}) must not exceed the maximum delay ({})",
                min_delay_steps, max_delay_steps
            )));
        }
        if max_delay_steps > MAX_DELAY_STEPS {
            return Err(SynapseError::InvalidParameter(format!(
                "The maximum delay ({}) must not exceed {} steps",
                max_delay_steps, MAX_DELAY_STEPS
            )));
        }
        Ok(DelayChecker {
            min_delay_steps,
            max_delay_steps,
        })
    }

    pub fn min_delay_steps(&self) -> u64 {
        self.min_delay_steps
    }

    pub fn max_delay_steps(&self) -> u64 {
        self.max_delay_steps
    }

    /// Returns an error if the delay is out of bounds.
    pub fn assert_valid_delay_steps(&self, delay_steps: u64) -> Result<(), SynapseError> {
        if delay_steps < self.min_delay_steps || delay_steps > self.max_delay_steps {
            return Err(SynapseError::InvalidDelay {
                delay: delay_steps,
                min: self.min_delay_steps,
                max: self.max_delay_steps,
            });
        }
        Ok(())
    }
}

/// The context in which connections of a model are created and updated.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ConnectorModel {
    model: SynapseModel,
    delay_checker: DelayChecker,
    common: CommonProperties,
    /// Parameters applied to every new connection of the model
    defaults: Dictionary,
}

impl ConnectorModel {
    /// Create a connector model with the default delay checker and no default parameters.
    pub fn new(model: SynapseModel) -> Self {
        ConnectorModel {
            model,
            delay_checker: DelayChecker::default(),
            common: CommonProperties::default(),
            defaults: Dictionary::new(),
        }
    }

    /// Returns the connector model with the provided delay checker.
    pub fn with_delay_checker(mut self, delay_checker: DelayChecker) -> Self {
        self.delay_checker = delay_checker;
        self
    }

    pub fn model(&self) -> SynapseModel {
        self.model
    }

    pub fn delay_checker(&self) -> &DelayChecker {
        &self.delay_checker
    }

    pub fn set_delay_checker(&mut self, delay_checker: DelayChecker) {
        self.delay_checker = delay_checker;
    }

    pub fn common(&self) -> &CommonProperties {
        &self.common
    }

    /// Returns the parameters applied to every new connection of the model.
    pub fn defaults(&self) -> &Dictionary {
        &self.defaults
    }

    /// Set the parameters applied to every new connection of the model.
    /// On error, the previous defaults are kept.
    pub fn set_defaults(&mut self, defaults: Dictionary) -> Result<(), SynapseError> {
        self.model.check_keys(&defaults)?;
        for key in self.model.settable_keys() {
            match key {
                StatusKey::Delay => {
                    if let Some(delay_steps) = defaults.extract::<u64>(StatusKey::Delay)? {
                        self.delay_checker.assert_valid_delay_steps(delay_steps)?;
                    }
                }
                _ => {
                    defaults.extract::<f64>(*key)?;
                }
            }
        }
        self.defaults = defaults;
        Ok(())
    }
}

/// State shared by all connection models.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Derivative)]
#[derivative(Default)]
pub struct ConnectionBase {
    /// ID of the target node, bound during the handshake
    target: Option<NodeId>,
    /// Port of the target node, resolved during the handshake
    rport: Port,
    /// Transmission delay, in steps
    #[derivative(Default(value = "DEFAULT_DELAY_STEPS"))]
    delay_steps: u64,
}

impl ConnectionBase {
    /// Create a base for models transmitting no delay.
    pub fn without_delay() -> Self {
        ConnectionBase {
            delay_steps: 0,
            ..ConnectionBase::default()
        }
    }

    pub fn delay_steps(&self) -> u64 {
        self.delay_steps
    }

    pub fn rport(&self) -> Port {
        self.rport
    }

    /// Returns the ID of the target node, as seen from the provided thread.
    pub fn target(&self, _thread: ThreadId) -> Result<NodeId, SynapseError> {
        self.target.ok_or(SynapseError::NotConnected)
    }

    /// Returns true once the handshake is done.
    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }

    /// Set the delay after validation.
    pub fn set_delay_steps(
        &mut self,
        delay_steps: u64,
        delay_checker: &DelayChecker,
    ) -> Result<(), SynapseError> {
        delay_checker.assert_valid_delay_steps(delay_steps)?;
        self.delay_steps = delay_steps;
        Ok(())
    }

    /// Write the receptor port and, once bound, the target.
    pub fn get_status(&self, d: &mut Dictionary) {
        d.define(StatusKey::Receptor, self.rport);
        if let Some(target) = self.target {
            d.define(StatusKey::Target, target);
        }
    }

    /// Read and validate the delay of a status dictionary, without applying it.
    fn staged_delay_steps(
        &self,
        d: &Dictionary,
        delay_checker: &DelayChecker,
    ) -> Result<u64, SynapseError> {
        match d.extract::<u64>(StatusKey::Delay)? {
            Some(delay_steps) => {
                delay_checker.assert_valid_delay_steps(delay_steps)?;
                Ok(delay_steps)
            }
            None => Ok(self.delay_steps),
        }
    }

    fn bind(&mut self, target: NodeId, rport: Port) {
        self.target = Some(target);
        self.rport = rport;
    }
}

/// Common interface of the connection models.
pub trait Connection: Default + Clone + fmt::Debug + PartialEq + Send + Sync {
    /// The event transmitted by the connection.
    type Event: SecondaryEvent;

    const MODEL: SynapseModel;

    fn base(&self) -> &ConnectionBase;

    fn base_mut(&mut self) -> &mut ConnectionBase;

    /// Returns the delay in steps.
    fn delay_steps(&self) -> u64 {
        self.base().delay_steps()
    }

    /// Returns the port of the target handling the connection.
    fn rport(&self) -> Port {
        self.base().rport()
    }

    /// Returns the ID of the target node.
    fn target(&self, thread: ThreadId) -> Result<NodeId, SynapseError> {
        self.base().target(thread)
    }

    /// Negotiate the connection between the source and the target, once.
    ///
    /// The source must send the event kind transmitted by the connection, and the target must handle it on the
    /// requested receptor. On success, the resolved port and the target are stored on the connection.
    fn check_connection(
        &mut self,
        source: &dyn Node,
        target: &dyn Node,
        receptor: usize,
        _cp: &CommonProperties,
    ) -> Result<(), SynapseError> {
        if self.base().is_connected() {
            return Err(SynapseError::AlreadyConnected);
        }

        let mut probe = Self::Event::default();
        source.sends_secondary_event(probe.as_received())?;
        probe.set_sender(source.id());
        let rport = target.handles_test_event(probe.as_received(), receptor)?;
        self.base_mut().bind(target.id(), rport);

        debug!(
            "{} connected {} {} -> {} {} on port {}",
            Self::MODEL,
            source.model(),
            source.id(),
            target.model(),
            target.id(),
            rport
        );
        Ok(())
    }

    /// Stamp the event with the connection parameters and deliver it to the target.
    fn send<R: NodeResolver + ?Sized>(
        &self,
        event: &mut Self::Event,
        thread: ThreadId,
        cp: &CommonProperties,
        nodes: &mut R,
    ) -> Result<(), SynapseError>;

    /// Write the connection parameters to the dictionary.
    fn get_status(&self, d: &mut Dictionary);

    /// Update the connection parameters from the dictionary.
    /// Either every value is applied, or none is.
    fn set_status(&mut self, d: &Dictionary, cm: &ConnectorModel) -> Result<(), SynapseError>;

    fn set_weight(&mut self, weight: f64) -> Result<(), SynapseError>;

    /// Set the delay in steps.
    fn set_delay(&mut self, delay_steps: u64, cm: &ConnectorModel) -> Result<(), SynapseError> {
        self.base_mut()
            .set_delay_steps(delay_steps, cm.delay_checker())
    }

    /// Returns the status of the connection as a new dictionary.
    fn status(&self) -> Dictionary {
        let mut d = Dictionary::new();
        self.get_status(&mut d);
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synapse_model_names() {
        for model in SynapseModel::ALL {
            assert_eq!(SynapseModel::from_name(model.name()), Ok(model));
        }
        assert_eq!(
            SynapseModel::from_name("static_synapse"),
            Err(SynapseError::UnknownSynapseModel(
                "static_synapse".to_string()
            ))
        );
        assert!(SynapseModel::DelayRate.has_delay());
        assert!(!SynapseModel::RateInstantaneous.has_delay());
        assert!(!SynapseModel::Diffusion.has_delay());
    }

    #[test]
    fn test_check_keys() {
        let status = Dictionary::new()
            .with(StatusKey::SizeOf, 24)
            .with(StatusKey::SynapseModel, "diffusion_connection")
            .with(StatusKey::DriftFactor, 0.5)
            .with(StatusKey::Receptor, 0);
        assert_eq!(SynapseModel::Diffusion.check_keys(&status), Ok(()));

        let mut unknown = Dictionary::new();
        unknown.insert("tau", 10.0);
        assert_eq!(SynapseModel::DelayRate.check_keys(&unknown), Ok(()));

        let weight = Dictionary::new().with(StatusKey::Weight, 1.0);
        assert_eq!(
            SynapseModel::Diffusion.check_keys(&weight),
            Err(SynapseError::InvalidPropertyForVariant(
                "Please use the parameters \"drift_factor\" and \"diffusion_factor\" to specify the weights"
                    .to_string()
            ))
        );

        let delay = Dictionary::new().with(StatusKey::Delay, 2);
        assert_eq!(
            SynapseModel::RateInstantaneous.check_keys(&delay),
            Err(SynapseError::InvalidPropertyForVariant(
                "rate_connection_instantaneous has no delay.".to_string()
            ))
        );

        let both = Dictionary::new()
            .with(StatusKey::Weight, 1.0)
            .with(StatusKey::Delay, 1);
        assert_eq!(
            SynapseModel::Diffusion.check_keys(&both),
            Err(SynapseError::InvalidPropertyForVariant(
                "diffusion_connection has no delay.".to_string()
            ))
        );

        let drift = Dictionary::new().with(StatusKey::DriftFactor, 1.0);
        assert_eq!(
            SynapseModel::DelayRate.check_keys(&drift),
            Err(SynapseError::InvalidPropertyForVariant(
                "drift_factor cannot be set on delay_rate_connection, expected one of: delay, weight"
                    .to_string()
            ))
        );
    }

    #[test]
    fn test_reported_keys_include_settable_keys() {
        for model in SynapseModel::ALL {
            assert!(model
                .settable_keys()
                .iter()
                .all(|key| model.reported_keys().contains(key)));
        }
    }

    #[test]
    fn test_delay_checker() {
        let checker = DelayChecker::build(2, 10).unwrap();
        assert_eq!(checker.assert_valid_delay_steps(2), Ok(()));
        assert_eq!(checker.assert_valid_delay_steps(10), Ok(()));
        assert_eq!(
            checker.assert_valid_delay_steps(1),
            Err(SynapseError::InvalidDelay {
                delay: 1,
                min: 2,
                max: 10
            })
        );
        assert!(DelayChecker::build(3, 2).is_err());
        assert!(DelayChecker::build(1, MAX_DELAY_STEPS).is_ok());
        assert!(DelayChecker::build(1, MAX_DELAY_STEPS + 1).is_err());

        let checker = DelayChecker::default();
        assert_eq!(checker.min_delay_steps(), DEFAULT_DELAY_STEPS);
        assert_eq!(checker.max_delay_steps(), MAX_DELAY_STEPS);
        assert_eq!(checker.assert_valid_delay_steps(MAX_DELAY_STEPS), Ok(()));
        assert_eq!(
            checker.assert_valid_delay_steps(u64::MAX),
            Err(SynapseError::InvalidDelay {
                delay: u64::MAX,
                min: DEFAULT_DELAY_STEPS,
                max: MAX_DELAY_STEPS
            })
        );
        assert!(checker.assert_valid_delay_steps(0).is_err());
    }

    #[test]
    fn test_connection_base() {
        let mut base = ConnectionBase::default();
        assert_eq!(base.delay_steps(), DEFAULT_DELAY_STEPS);
        assert_eq!(base.target(0), Err(SynapseError::NotConnected));

        base.bind(4, 2);
        assert!(base.is_connected());
        assert_eq!(base.target(0), Ok(4));
        assert_eq!(base.rport(), 2);

        let mut d = Dictionary::new();
        base.get_status(&mut d);
        assert_eq!(d.extract::<usize>(StatusKey::Target), Ok(Some(4)));
        assert_eq!(d.extract::<usize>(StatusKey::Receptor), Ok(Some(2)));

        assert_eq!(ConnectionBase::without_delay().delay_steps(), 0);
    }

    #[test]
    fn test_connector_model_defaults() {
        let mut cm = ConnectorModel::new(SynapseModel::Diffusion);
        assert!(cm
            .set_defaults(Dictionary::new().with(StatusKey::Weight, 2.0))
            .is_err());
        assert!(cm.defaults().is_empty());

        let defaults = Dictionary::new().with(StatusKey::DriftFactor, 0.5);
        cm.set_defaults(defaults.clone()).unwrap();
        assert_eq!(cm.defaults(), &defaults);

        assert!(matches!(
            cm.set_defaults(Dictionary::new().with(StatusKey::DriftFactor, "strong")),
            Err(SynapseError::InvalidParameter(_))
        ));
        assert_eq!(cm.defaults(), &defaults);
    }

    #[test]
    fn test_connector_model_defaults_check_delay() {
        let mut cm = ConnectorModel::new(SynapseModel::DelayRate)
            .with_delay_checker(DelayChecker::build(1, 5).unwrap());
        assert_eq!(
            cm.set_defaults(Dictionary::new().with(StatusKey::Delay, 0)),
            Err(SynapseError::InvalidDelay {
                delay: 0,
                min: 1,
                max: 5
            })
        );
        assert!(matches!(
            cm.set_defaults(Dictionary::new().with(StatusKey::Delay, 2.5)),
            Err(SynapseError::InvalidParameter(_))
        ));
        assert!(cm.defaults().is_empty());

        let defaults = Dictionary::new()
            .with(StatusKey::Delay, 5)
            .with(StatusKey::Weight, -1.0);
        cm.set_defaults(defaults.clone()).unwrap();
        assert_eq!(cm.defaults(), &defaults);
    }
}
