//! Per-job response-time tracking at system exit.

use queue_sim::{Dist, Policy, QueueSystem, Server, SimOpts};

const NUM_EVENTS: u64 = 100_000;
const RTOL: f64 = 0.05;

const POLICIES: [Policy; 4] = [Policy::Fcfs, Policy::Ps, Policy::Fb, Policy::Srpt];

fn tracked_run(server: Server) -> (QueueSystem, f64) {
    let mut system = QueueSystem::new(vec![server], Dist::Exp(1.0)).unwrap();
    let (_n, t) = system.sim_with(&SimOpts {
        num_events: NUM_EVENTS,
        seed: 42,
        track_response_times: true,
        ..SimOpts::default()
    });
    (system, t)
}

#[test]
fn length_matches_num_events() {
    for policy in POLICIES {
        let (system, _t) = tracked_run(Server::new(policy, Dist::Exp(2.0)));
        assert_eq!(
            system.response_times().unwrap().len(),
            NUM_EVENTS as usize,
            "{policy:?}"
        );
    }
}

#[test]
fn all_response_times_positive() {
    for policy in POLICIES {
        let (system, _t) = tracked_run(Server::new(policy, Dist::Exp(2.0)));
        assert!(
            system.response_times().unwrap().iter().all(|&t| t > 0.0),
            "{policy:?}"
        );
    }
}

#[test]
fn mean_of_samples_matches_mean_t() {
    for policy in POLICIES {
        let (system, t) = tracked_run(Server::new(policy, Dist::Exp(2.0)));
        let times = system.response_times().unwrap();
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        assert!(
            (mean - t).abs() / t < RTOL,
            "{policy:?}: mean(samples) = {mean:.4}, E[T] = {t:.4}"
        );
    }
}

#[test]
fn station_mean_is_populated_for_reordering_policies() {
    // SRPT completes jobs out of arrival order; its incremental station
    // mean must still be fed per completion.
    let (system, _t) = tracked_run(Server::new(Policy::Srpt, Dist::Exp(2.0)));
    assert!(system.servers()[0].mean_response_time() > 0.0);
}

#[test]
fn no_tracking_by_default() {
    let mut system = QueueSystem::new(
        vec![Server::new(Policy::Fcfs, Dist::Exp(2.0))],
        Dist::Exp(1.0),
    )
    .unwrap();
    system.sim(1_000, 42);
    assert!(system.response_times().is_none());
}

#[test]
fn tracking_survives_a_finite_buffer() {
    let server = Server::new(Policy::Fcfs, Dist::Exp(2.0))
        .with_capacity(10)
        .unwrap();
    let (system, _t) = tracked_run(server);
    let times = system.response_times().unwrap();
    assert_eq!(times.len(), NUM_EVENTS as usize);
    assert!(times.iter().all(|&t| t > 0.0));
}

#[test]
fn tracking_works_with_multiple_channels() {
    for policy in [Policy::Fcfs, Policy::Ps] {
        let server = Server::new(policy, Dist::Exp(2.0)).with_servers(2).unwrap();
        let (system, t) = tracked_run(server);
        let times = system.response_times().unwrap();
        assert_eq!(times.len(), NUM_EVENTS as usize);
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        assert!((mean - t).abs() / t < RTOL, "{policy:?} k=2");
    }
}

#[test]
fn tracking_does_not_change_results() {
    let mut plain = QueueSystem::new(
        vec![Server::new(Policy::Fcfs, Dist::Exp(2.0))],
        Dist::Exp(1.0),
    )
    .unwrap();
    let (n1, t1) = plain.sim(NUM_EVENTS, 42);

    let mut tracked = QueueSystem::new(
        vec![Server::new(Policy::Fcfs, Dist::Exp(2.0))],
        Dist::Exp(1.0),
    )
    .unwrap();
    let (n2, t2) = tracked.sim_with(&SimOpts {
        num_events: NUM_EVENTS,
        seed: 42,
        track_response_times: true,
        ..SimOpts::default()
    });
    assert_eq!((n1, t1), (n2, t2));
}

#[test]
fn response_times_are_deterministic() {
    let (a, _) = tracked_run(Server::new(Policy::Fcfs, Dist::Exp(2.0)));
    let (b, _) = tracked_run(Server::new(Policy::Fcfs, Dist::Exp(2.0)));
    assert_eq!(a.response_times().unwrap(), b.response_times().unwrap());
}
