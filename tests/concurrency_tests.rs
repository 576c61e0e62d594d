//! Concurrent driving of a shared machine.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use waypoint::builder::MachineBuilder;
use waypoint::{State, StateMachine, Trigger};

#[derive(Clone, Copy, PartialEq, Debug)]
enum Ring {
    A,
    B,
    C,
}

impl Ring {
    fn next(self) -> Self {
        match self {
            Ring::A => Ring::B,
            Ring::B => Ring::C,
            Ring::C => Ring::A,
        }
    }
}

#[derive(Default)]
struct Observed {
    edges: Mutex<Vec<(Option<Ring>, Ring)>>,
    exits: AtomicUsize,
}

impl Trigger for Ring {
    type Context = Observed;

    fn on_entry(
        &self,
        _machine: &StateMachine<Self>,
        entered: &State<Self>,
        from: Option<&State<Self>>,
        context: &Observed,
    ) {
        context
            .edges
            .lock()
            .push((from.map(|s| *s.identity()), *entered.identity()));
    }

    fn on_exit(
        &self,
        _machine: &StateMachine<Self>,
        _current: &State<Self>,
        _to: &State<Self>,
        context: &Observed,
    ) {
        context.exits.fetch_add(1, Ordering::SeqCst);
    }
}

fn ring() -> Arc<StateMachine<Ring>> {
    let machine = MachineBuilder::new()
        .states([State::new(Ring::A), State::new(Ring::B), State::new(Ring::C)])
        .initial([Ring::A])
        .transition(Ring::A, [Ring::B])
        .transition(Ring::B, [Ring::C])
        .transition(Ring::C, [Ring::A])
        .build()
        .unwrap();
    Arc::new(machine)
}

fn is_declared_edge(edge: &(Option<Ring>, Ring)) -> bool {
    match edge {
        (None, to) => *to == Ring::A,
        (Some(from), to) => from.next() == *to,
    }
}

#[test]
fn racing_threads_only_follow_declared_edges() {
    let machine = ring();
    let observed = Arc::new(Observed::default());
    assert!(machine.start(&Ring::A, &*observed));

    let successes = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let machine = Arc::clone(&machine);
            let observed = Arc::clone(&observed);
            let successes = Arc::clone(&successes);
            thread::spawn(move || {
                for _ in 0..500 {
                    let Some(current) = machine.current_identity() else {
                        continue;
                    };
                    if machine.change_state(&current.next(), &*observed) {
                        successes.fetch_add(1, Ordering::SeqCst);
                    }
                    let now = machine.current_state().unwrap();
                    assert!(machine.roots().iter().any(|r| Arc::ptr_eq(r, &now)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let edges = observed.edges.lock();
    assert!(edges.iter().all(is_declared_edge));

    // Every applied transition after start fired exactly one exit
    let applied = edges.len() - 1;
    assert_eq!(observed.exits.load(Ordering::SeqCst), applied);
    assert_eq!(applied, successes.load(Ordering::SeqCst));

    // No lost updates: the chain of edges is contiguous
    for pair in edges.windows(2) {
        assert_eq!(pair[1].0, Some(pair[0].1));
    }
    assert_eq!(edges.last().map(|e| e.1), machine.current_identity());
}

#[test]
fn stop_and_start_race_leaves_declared_state_or_none() {
    let machine = ring();
    let observed = Arc::new(Observed::default());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let machine = Arc::clone(&machine);
            let observed = Arc::clone(&observed);
            thread::spawn(move || {
                for _ in 0..200 {
                    if worker % 2 == 0 {
                        machine.stop();
                        machine.start(&Ring::A, &*observed);
                    } else if let Some(current) = machine.current_identity() {
                        machine.change_state(&current.next(), &*observed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    if let Some(current) = machine.current_state() {
        assert!(machine.roots().iter().any(|r| Arc::ptr_eq(r, &current)));
    }
    assert!(observed.edges.lock().iter().all(is_declared_edge));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn machine_can_be_driven_from_async_tasks() {
    let machine = ring();
    let observed = Arc::new(Observed::default());
    assert!(machine.start(&Ring::A, &*observed));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let machine = Arc::clone(&machine);
            let observed = Arc::clone(&observed);
            tokio::task::spawn_blocking(move || {
                for _ in 0..50 {
                    if let Some(current) = machine.current_identity() {
                        machine.change_state(&current.next(), &*observed);
                    }
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    assert!(observed.edges.lock().iter().all(is_declared_edge));
    assert!(machine.current_identity().is_some());
}
