//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine with entry/exit hooks.
//!
//! Key concepts:
//! - Declaring states and transitions with the builder
//! - Hooks that receive the previous/next state and a context value
//! - Rejected transitions leave the light unchanged
//! - Structured logging via `tracing`
//!
//! Run with: cargo run --example traffic_light

use std::sync::atomic::{AtomicUsize, Ordering};
use waypoint::builder::MachineBuilder;
use waypoint::{MachineConfig, State, StateMachine, Trigger};

#[derive(Clone, Copy, PartialEq, Debug)]
enum TrafficLight {
    Red,
    Yellow,
    Green,
}

/// Counts completed Red -> Green -> Yellow -> Red cycles.
#[derive(Default)]
struct Junction {
    cycles: AtomicUsize,
}

impl Trigger for TrafficLight {
    type Context = Junction;

    fn on_entry(
        &self,
        _machine: &StateMachine<Self>,
        entered: &State<Self>,
        from: Option<&State<Self>>,
        junction: &Junction,
    ) {
        if *entered.identity() == TrafficLight::Red && from.is_some() {
            junction.cycles.fetch_add(1, Ordering::SeqCst);
        }
        println!("  -> {:?}", entered.identity());
    }

    fn on_exit(
        &self,
        _machine: &StateMachine<Self>,
        current: &State<Self>,
        to: &State<Self>,
        _junction: &Junction,
    ) {
        println!("  {:?} -> {:?}", current.identity(), to.identity());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light State Machine ===\n");

    let machine = MachineBuilder::new()
        .config(MachineConfig::default().with_label("traffic-light"))
        .states([
            State::new(TrafficLight::Red),
            State::new(TrafficLight::Yellow),
            State::new(TrafficLight::Green),
        ])
        .initial([TrafficLight::Red])
        .transition(TrafficLight::Red, [TrafficLight::Green])
        .transition(TrafficLight::Green, [TrafficLight::Yellow])
        .transition(TrafficLight::Yellow, [TrafficLight::Red])
        .build()
        .expect("traffic light tables are well formed");

    let junction = Junction::default();
    machine.start(&TrafficLight::Red, &junction);

    for _ in 0..2 {
        for next in [TrafficLight::Green, TrafficLight::Yellow, TrafficLight::Red] {
            machine.change_state(&next, &junction);
        }
    }

    println!("\nAttempting Red -> Yellow (not declared):");
    let accepted = machine.change_state(&TrafficLight::Yellow, &junction);
    println!("  accepted: {accepted}");

    println!(
        "\nCompleted cycles: {}",
        junction.cycles.load(Ordering::SeqCst)
    );
    println!("Transitions recorded: {}", machine.history().len());

    println!("\n=== Example Complete ===");
}
