//! Property-based tests for the transition engine.
//!
//! These tests use proptest to drive machines with random transition
//! graphs and operation sequences, comparing against a simple model.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use waypoint::builder::MachineBuilder;
use waypoint::{MachineConfig, State, StateMachine, Trigger, ValidationMode};

#[derive(Clone, Copy, PartialEq, Debug)]
enum Node {
    N0,
    N1,
    N2,
    N3,
}

const NODES: [Node; 4] = [Node::N0, Node::N1, Node::N2, Node::N3];

#[derive(Default)]
struct Counts {
    entries: AtomicUsize,
    exits: AtomicUsize,
}

impl Trigger for Node {
    type Context = Counts;

    fn on_entry(
        &self,
        _machine: &StateMachine<Self>,
        _entered: &State<Self>,
        _from: Option<&State<Self>>,
        context: &Counts,
    ) {
        context.entries.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exit(
        &self,
        _machine: &StateMachine<Self>,
        _current: &State<Self>,
        _to: &State<Self>,
        context: &Counts,
    ) {
        context.exits.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Debug)]
enum Op {
    Start(Node),
    Change(Node),
    Stop,
}

prop_compose! {
    fn arbitrary_node()(index in 0..4usize) -> Node {
        NODES[index]
    }
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => arbitrary_node().prop_map(Op::Start),
        6 => arbitrary_node().prop_map(Op::Change),
        1 => Just(Op::Stop),
    ]
}

#[derive(Clone, Debug)]
struct Graph {
    initial: Vec<Node>,
    edges: Vec<Vec<Node>>,
}

prop_compose! {
    fn arbitrary_graph()(
        initial in prop::collection::vec(arbitrary_node(), 0..3),
        edges in prop::collection::vec(prop::collection::vec(arbitrary_node(), 0..4), 4),
    ) -> Graph {
        Graph { initial, edges }
    }
}

fn position(node: Node) -> usize {
    NODES.iter().position(|n| *n == node).unwrap_or_default()
}

fn build(graph: &Graph) -> StateMachine<Node> {
    let mut builder = MachineBuilder::new()
        .config(MachineConfig::default().with_validation(ValidationMode::Off))
        .states(NODES.map(State::new))
        .initial(graph.initial.clone());
    for (node, targets) in NODES.iter().zip(&graph.edges) {
        builder = builder.transition(*node, targets.clone());
    }
    builder.build().unwrap()
}

/// Reference semantics: returns the expected result and whether hooks fire.
fn model_step(graph: &Graph, current: &mut Option<Node>, target: Node) -> (bool, bool) {
    let permitted = match current {
        None => &graph.initial,
        Some(node) => &graph.edges[position(*node)],
    };
    if !permitted.contains(&target) {
        return (false, false);
    }
    if *current == Some(target) {
        return (true, false);
    }
    *current = Some(target);
    (true, true)
}

proptest! {
    #[test]
    fn engine_matches_model(
        graph in arbitrary_graph(),
        ops in prop::collection::vec(arbitrary_op(), 0..40),
    ) {
        let machine = build(&graph);
        let counts = Counts::default();
        let mut model: Option<Node> = None;
        let mut expected_entries = 0;
        let mut expected_exits = 0;

        for op in ops {
            match op {
                Op::Stop => {
                    machine.stop();
                    model = None;
                }
                Op::Start(target) => {
                    model = None;
                    let (ok, fired) = model_step(&graph, &mut model, target);
                    if fired {
                        expected_entries += 1;
                    }
                    prop_assert_eq!(machine.start(&target, &counts), ok);
                }
                Op::Change(target) => {
                    let had_current = model.is_some();
                    let (ok, fired) = model_step(&graph, &mut model, target);
                    if fired {
                        expected_entries += 1;
                        if had_current {
                            expected_exits += 1;
                        }
                    }
                    prop_assert_eq!(machine.change_state(&target, &counts), ok);
                }
            }
            prop_assert_eq!(machine.current_identity(), model);
        }

        prop_assert_eq!(counts.entries.load(Ordering::SeqCst), expected_entries);
        prop_assert_eq!(counts.exits.load(Ordering::SeqCst), expected_exits);
    }

    #[test]
    fn empty_tables_never_move(ops in prop::collection::vec(arbitrary_op(), 0..20)) {
        let machine: StateMachine<Node> = StateMachine::new(Vec::new(), Vec::new());
        let counts = Counts::default();

        for op in ops {
            match op {
                Op::Start(target) => prop_assert!(!machine.start(&target, &counts)),
                Op::Change(target) => prop_assert!(!machine.change_state(&target, &counts)),
                Op::Stop => machine.stop(),
            }
            prop_assert!(machine.current_state().is_none());
        }
        prop_assert_eq!(counts.entries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stop_always_unstarts(
        graph in arbitrary_graph(),
        ops in prop::collection::vec(arbitrary_op(), 0..20),
    ) {
        let machine = build(&graph);
        let counts = Counts::default();

        for op in ops {
            match op {
                Op::Start(target) => { machine.start(&target, &counts); }
                Op::Change(target) => { machine.change_state(&target, &counts); }
                Op::Stop => {}
            }
        }

        machine.stop();
        prop_assert!(machine.current_state().is_none());
    }

    #[test]
    fn current_is_always_a_declared_handle(
        graph in arbitrary_graph(),
        ops in prop::collection::vec(arbitrary_op(), 0..30),
    ) {
        let machine = build(&graph);
        let counts = Counts::default();

        for op in ops {
            match op {
                Op::Start(target) => { machine.start(&target, &counts); }
                Op::Change(target) => { machine.change_state(&target, &counts); }
                Op::Stop => machine.stop(),
            }
            if let Some(current) = machine.current_state() {
                prop_assert!(machine.roots().iter().any(|r| std::sync::Arc::ptr_eq(r, &current)));
            }
        }
    }

    #[test]
    fn is_valid_transition_predicts_change_state(
        graph in arbitrary_graph(),
        start in arbitrary_node(),
        target in arbitrary_node(),
    ) {
        let machine = build(&graph);
        let counts = Counts::default();
        machine.start(&start, &counts);

        let predicted = machine.is_valid_transition(&target);
        prop_assert_eq!(machine.change_state(&target, &counts), predicted);
    }

    #[test]
    fn history_tracks_applied_transitions(
        graph in arbitrary_graph(),
        ops in prop::collection::vec(arbitrary_op(), 0..30),
    ) {
        let machine = build(&graph);
        let counts = Counts::default();

        for op in ops {
            match op {
                Op::Start(target) => { machine.start(&target, &counts); }
                Op::Change(target) => { machine.change_state(&target, &counts); }
                Op::Stop => machine.stop(),
            }
        }

        let history = machine.history();
        prop_assert_eq!(history.len(), counts.entries.load(Ordering::SeqCst));
        if let Some(last) = history.last() {
            let entered = machine.current_identity();
            // stop() is not recorded, so the last record only matches while started
            if entered.is_some() {
                prop_assert_eq!(Some(last.to), entered);
            }
        }
    }
}
