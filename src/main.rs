use rusty_rate::dictionary::{Dictionary, StatusKey};
use rusty_rate::error::SynapseError;
use rusty_rate::network::Network;
use rusty_rate::neuron::{RateNeuron, SiegertNeuron};

fn main() -> Result<(), SynapseError> {
    let mut network = Network::new();

    // Two rate neurons in a loop, one excitatory delayed connection and one inhibitory instantaneous one
    let n0 = network.add_node(|id| {
        let mut neuron = RateNeuron::new(id);
        neuron.set_rate(1.0);
        neuron
    });
    let n1 = network.add_node(RateNeuron::new);
    network.connect(
        n0,
        n1,
        "delay_rate_connection",
        0,
        &Dictionary::new()
            .with(StatusKey::Weight, 2.5)
            .with(StatusKey::Delay, 3),
    )?;
    network.connect(
        n1,
        n0,
        "rate_connection_instantaneous",
        0,
        &Dictionary::new().with(StatusKey::Weight, -0.5),
    )?;

    // Two mean-field units
    let s0 = network.add_node(|id| {
        let mut neuron = SiegertNeuron::new(id);
        neuron.set_rate(10.0);
        neuron
    });
    let s1 = network.add_node(SiegertNeuron::new);
    network.connect(
        s0,
        s1,
        "diffusion_connection",
        0,
        &Dictionary::new()
            .with(StatusKey::DriftFactor, 0.4)
            .with(StatusKey::DiffusionFactor, 0.1),
    )?;

    // Mixing models fails at wiring time
    if let Err(e) = network.connect(n0, s1, "diffusion_connection", 0, &Dictionary::new()) {
        println!("rejected: {}", e);
    }

    let num_events = network.propagate_all(0)?;
    println!("{} events delivered", num_events);

    for status in network.connection_statuses() {
        println!("{}", status.to_json());
    }
    for id in 0..network.num_nodes() {
        println!("{}", network.get_node_status(id)?.to_json());
    }
    Ok(())
}
