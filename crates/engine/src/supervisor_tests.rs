use super::*;
use crate::test_support::{generator_config, supervisor_config, unique_instance};
use crate::{Generator, GeneratorReport};
use std::thread::{self, JoinHandle};
use tri_channel::{ChannelProducer, ResourceNames};
use tri_core::{Edge, Graph};

const TRIANGLE: &[&str] = &["0-1", "1-2", "2-0"];
const K4: &[&str] = &["0-1", "0-2", "0-3", "1-2", "1-3", "2-3"];

fn spawn_generator(instance: &str, seed: u64, edges: &[&str]) -> JoinHandle<GeneratorReport> {
    let config = generator_config(instance, seed);
    let graph = Graph::parse(edges.iter().copied()).unwrap();
    let mut generator = Generator::attach(&config, graph).unwrap();
    thread::spawn(move || generator.run(&CancellationToken::new()).unwrap())
}

#[test]
fn triangle_is_colorable() {
    let instance = unique_instance("triangle");
    let mut supervisor = Supervisor::create(supervisor_config(&instance)).unwrap();
    let generator = spawn_generator(&instance, 11, TRIANGLE);

    let report = supervisor.run(&CancellationToken::new()).unwrap();
    assert_eq!(report.outcome, Outcome::Colorable);
    assert_eq!(report.stop, StopReason::Perfect);
    assert!(report.consumed >= 1);

    let shutdown = supervisor.shutdown().unwrap();
    assert_eq!(shutdown.still_attached, 0);
    assert!(generator.join().unwrap().published >= 1);
}

#[test]
fn complete_graph_on_four_nodes_hits_limit() {
    let instance = unique_instance("k4");
    let mut config = supervisor_config(&instance);
    config.limit = Some(5);
    let mut supervisor = Supervisor::create(config).unwrap();
    let generators: Vec<_> = (0..3)
        .map(|seed| spawn_generator(&instance, seed, K4))
        .collect();

    let report = supervisor.run(&CancellationToken::new()).unwrap();
    assert_eq!(report.stop, StopReason::LimitReached);
    assert_eq!(report.consumed, 6);
    match &report.outcome {
        Outcome::BestAttempt {
            removed_edges,
            edges,
        } => {
            // K4 needs at least one removal; every candidate fits a slot
            assert!(*removed_edges >= 1);
            assert_eq!(edges.len(), *removed_edges as usize);
            let k4: Vec<Edge> = K4.iter().map(|t| t.parse().unwrap()).collect();
            assert!(edges.iter().all(|e| k4.contains(e)));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let shutdown = supervisor.shutdown().unwrap();
    assert_eq!(shutdown.still_attached, 0);
    for generator in generators {
        generator.join().unwrap();
    }
}

#[test]
fn limit_zero_consumes_exactly_one() {
    let instance = unique_instance("limit0");
    let mut config = supervisor_config(&instance);
    config.capacity = 1;
    config.limit = Some(0);
    let mut supervisor = Supervisor::create(config).unwrap();
    let generator = spawn_generator(&instance, 2, K4);

    let report = supervisor.run(&CancellationToken::new()).unwrap();
    assert_eq!(report.consumed, 1);
    assert_ne!(report.outcome, Outcome::NoSolutions);

    supervisor.shutdown().unwrap();
    generator.join().unwrap();
}

#[test]
fn cancellation_before_any_candidate_reports_no_solutions() {
    let instance = unique_instance("nosol");
    let mut supervisor = Supervisor::create(supervisor_config(&instance)).unwrap();

    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token.cancel("SIGTERM");
        })
    };

    let report = supervisor.run(&token).unwrap();
    canceller.join().unwrap();
    assert_eq!(report.outcome, Outcome::NoSolutions);
    assert_eq!(
        report.stop,
        StopReason::Interrupted {
            reason: "SIGTERM".to_string()
        }
    );
    assert!(supervisor.channel().header().stop_requested());
    supervisor.shutdown().unwrap();
}

#[test]
fn cancellation_during_delay_skips_consuming() {
    let instance = unique_instance("delay");
    let mut config = supervisor_config(&instance);
    config.delay = Duration::from_secs(30);
    let mut supervisor = Supervisor::create(config).unwrap();

    let token = CancellationToken::new();
    token.cancel("SIGINT");
    let started = Instant::now();
    let report = supervisor.run(&token).unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(report.interrupted());
    assert_eq!(report.consumed, 0);
    supervisor.shutdown().unwrap();
}

#[test]
fn delay_is_honored_before_consuming() {
    let instance = unique_instance("wait");
    let mut config = supervisor_config(&instance);
    config.delay = Duration::from_millis(100);
    config.limit = Some(0);
    let mut supervisor = Supervisor::create(config).unwrap();
    let generator = spawn_generator(&instance, 4, TRIANGLE);

    let started = Instant::now();
    let report = supervisor.run(&CancellationToken::new()).unwrap();
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert_eq!(report.consumed, 1);

    supervisor.shutdown().unwrap();
    generator.join().unwrap();
}

#[test]
fn second_supervisor_collides_unless_reclaiming() {
    let instance = unique_instance("collide");
    let first = Supervisor::create(supervisor_config(&instance)).unwrap();

    let err = Supervisor::create(supervisor_config(&instance)).err().unwrap();
    assert!(matches!(err, EngineError::Channel(_)));

    // Simulate a crash: names stay behind
    std::mem::forget(first);
    let mut config = supervisor_config(&instance);
    config.reclaim_stale = true;
    let second = Supervisor::create(config).unwrap();
    second.shutdown().unwrap();
}

#[test]
fn shutdown_reports_generators_that_never_detach() {
    let instance = unique_instance("stuck");
    let mut config = supervisor_config(&instance);
    config.shutdown_grace = Duration::from_millis(30);
    let supervisor = Supervisor::create(config).unwrap();

    let stuck = ChannelProducer::attach(ResourceNames::for_instance(&instance).unwrap()).unwrap();
    let report = supervisor.shutdown().unwrap();
    assert_eq!(
        report,
        ShutdownReport {
            released: 1,
            still_attached: 1
        }
    );

    // Every name is gone even though a generator is still attached
    assert!(stuck.stop_requested());
    assert!(ChannelProducer::attach(ResourceNames::for_instance(&instance).unwrap())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn invalid_config_creates_nothing() {
    let instance = unique_instance("badcap");
    let mut config = supervisor_config(&instance);
    config.capacity = 0;
    assert!(matches!(
        Supervisor::create(config),
        Err(EngineError::Config(_))
    ));
    assert!(ChannelProducer::attach(ResourceNames::for_instance(&instance).unwrap())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn longest_accepted_delay_is_cancellable() {
    let instance = unique_instance("maxdelay");
    let mut config = supervisor_config(&instance);
    config.delay = crate::parse_duration("18446744073709551615").unwrap();
    let mut supervisor = Supervisor::create(config).unwrap();

    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token.cancel("SIGINT");
        })
    };

    let report = supervisor.run(&token).unwrap();
    canceller.join().unwrap();
    assert!(report.interrupted());
    assert_eq!(report.outcome, Outcome::NoSolutions);
    supervisor.shutdown().unwrap();
}
