//! This crate provides rate-coupled synaptic connections for discrete-time neural network simulations in Rust.
//!
//! Three connection models are available:
//! - [`connection::delay_rate::DelayRateConnection`] transmits a weighted rate with a delay;
//! - [`connection::rate_instantaneous::RateConnectionInstantaneous`] transmits a weighted rate within the step;
//! - [`connection::diffusion::DiffusionConnection`] transmits a rate scaled by a drift and a diffusion factor,
//!   for mean-field units.
//!
//! # Connecting Nodes
//!
//! ```rust
//! use rusty_rate::dictionary::{Dictionary, StatusKey};
//! use rusty_rate::network::Network;
//! use rusty_rate::neuron::{RateNeuron, SiegertNeuron};
//!
//! let mut network = Network::new();
//! let n0 = network.add_node(RateNeuron::new);
//! let n1 = network.add_node(RateNeuron::new);
//! let s0 = network.add_node(SiegertNeuron::new);
//!
//! // Connect two rate neurons with a weight of 2.5 and a delay of 3 steps
//! let params = Dictionary::new().with(StatusKey::Weight, 2.5).with(StatusKey::Delay, 3);
//! let id = network.connect(n0, n1, "delay_rate_connection", 0, &params).unwrap();
//! assert_eq!(network.get_connection_status(id).unwrap().extract::<f64>(StatusKey::Weight), Ok(Some(2.5)));
//!
//! // A rate neuron does not send diffusion events
//! assert!(network.connect(n0, s0, "diffusion_connection", 0, &Dictionary::new()).is_err());
//! assert_eq!(network.num_connections(), 1);
//! ```
//!
//! # Propagating Rates
//!
//! ```rust
//! use rusty_rate::dictionary::{Dictionary, StatusKey};
//! use rusty_rate::network::Network;
//! use rusty_rate::neuron::SiegertNeuron;
//!
//! let mut network = Network::new();
//! let s0 = network.add_node(|id| {
//!     let mut neuron = SiegertNeuron::new(id);
//!     neuron.set_rate(5.0);
//!     neuron
//! });
//! let s1 = network.add_node(SiegertNeuron::new);
//!
//! let params = Dictionary::new().with(StatusKey::DriftFactor, 0.4).with(StatusKey::DiffusionFactor, 0.1);
//! network.connect(s0, s1, "diffusion_connection", 0, &params).unwrap();
//! network.propagate(s0, 0).unwrap();
//!
//! let status = network.get_node_status(s1).unwrap();
//! assert!((status.get("drift_input").unwrap().as_f64().unwrap() - 2.0).abs() < 1e-12);
//! ```

pub mod connection;
pub mod dictionary;
pub mod error;
pub mod event;
pub mod network;
pub mod neuron;
pub mod node;

/// The default delay of a connection, in steps. Also the default minimum delay.
pub const DEFAULT_DELAY_STEPS: u64 = 1;
/// The largest delay, in steps, a connection may carry. Also the default maximum delay.
pub const MAX_DELAY_STEPS: u64 = 1 << 16;
/// Minimum number of connections to consider parallel processing.
pub const MIN_PARALLEL_CONNECTIONS: usize = 1000;
