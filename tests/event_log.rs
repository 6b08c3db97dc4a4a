//! Event-trace tracking and per-server state reconstruction.

use queue_sim::{
    per_server_states, Dist, EventKind, EventLog, Policy, QueueSystem, Server, SimOpts, EXTERNAL,
    SYSTEM_EXIT,
};

const NUM_EVENTS: u64 = 10_000;

fn traced(servers: Vec<Server>, arrival: Dist, seed: u64) -> QueueSystem {
    let mut system = QueueSystem::new(servers, arrival).unwrap();
    system.sim_with(&SimOpts {
        num_events: NUM_EVENTS,
        seed,
        track_events: true,
        ..SimOpts::default()
    });
    system
}

fn mm1_traced(seed: u64) -> QueueSystem {
    traced(
        vec![Server::new(Policy::Fcfs, Dist::Exp(2.0))],
        Dist::Exp(1.0),
        seed,
    )
}

#[test]
fn events_are_logged_when_enabled() {
    let system = mm1_traced(42);
    assert!(system.event_log().unwrap().len() > 0);
}

#[test]
fn no_log_by_default() {
    let mut system = QueueSystem::new(
        vec![Server::new(Policy::Fcfs, Dist::Exp(2.0))],
        Dist::Exp(1.0),
    )
    .unwrap();
    system.sim(1_000, 42);
    assert!(system.event_log().is_none());
}

#[test]
fn warmup_log_covers_only_the_measurement_window() {
    let build = || {
        QueueSystem::new(
            vec![Server::new(Policy::Fcfs, Dist::Exp(2.0))],
            Dist::Exp(1.0),
        )
        .unwrap()
    };
    let mut plain = build();
    plain.sim_with(&SimOpts {
        num_events: 5_000,
        seed: 42,
        track_events: true,
        ..SimOpts::default()
    });

    let mut warmed = build();
    warmed.sim_with(&SimOpts {
        num_events: 5_000,
        seed: 42,
        warmup: 2_000,
        track_events: true,
        ..SimOpts::default()
    });
    let log = warmed.event_log().unwrap();

    // The trace starts at the measurement boundary, well past the first
    // event of the same seeded run without warmup.
    assert!(log.times[0] > plain.event_log().unwrap().times[0]);
    assert!(log.times.windows(2).all(|w| w[0] <= w[1]));

    // Exactly the measured departures appear in the log.
    let departures = log
        .kinds
        .iter()
        .filter(|&&k| k == EventKind::Departure)
        .count();
    assert_eq!(departures, 5_000);

    // Occupancy deltas stay consistent with the event kinds even though
    // the system was not empty when tracing began.
    for i in 1..log.len() {
        let delta = log.states[i] as i64 - log.states[i - 1] as i64;
        let expected = match log.kinds[i] {
            EventKind::Arrival => 1,
            EventKind::Departure => -1,
            EventKind::Route => 0,
            EventKind::Rejection if log.from_servers[i] >= 0 => -1,
            EventKind::Rejection => 0,
        };
        assert_eq!(delta, expected, "event {i}");
    }
}

#[test]
fn times_are_nondecreasing() {
    let system = mm1_traced(42);
    let times = &system.event_log().unwrap().times;
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn first_event_is_an_external_arrival() {
    let log_owner = mm1_traced(42);
    let log = log_owner.event_log().unwrap();
    assert_eq!(log.kinds[0], EventKind::Arrival);
    assert_eq!(log.from_servers[0], EXTERNAL);
    assert_eq!(log.to_servers[0], 0);
    assert_eq!(log.states[0], 1);
}

#[test]
fn occupancy_is_conserved() {
    // arrivals - departures - routed rejections == final occupancy; the
    // external rejections of a full buffer never change system state.
    let server = Server::new(Policy::Fcfs, Dist::Exp(1.0))
        .with_capacity(3)
        .unwrap();
    let system = traced(vec![server], Dist::Exp(2.0), 42);
    let log = system.event_log().unwrap();

    let mut balance: i64 = 0;
    for i in 0..log.len() {
        match log.kinds[i] {
            EventKind::Arrival => balance += 1,
            EventKind::Departure => balance -= 1,
            EventKind::Rejection if log.from_servers[i] >= 0 => balance -= 1,
            _ => {}
        }
    }
    assert_eq!(balance, *log.states.last().unwrap() as i64);
    assert_eq!(balance, system.servers()[0].state() as i64);
}

#[test]
fn overloaded_buffer_logs_rejections() {
    let server = Server::new(Policy::Fcfs, Dist::Exp(1.0))
        .with_capacity(2)
        .unwrap();
    let system = traced(vec![server], Dist::Exp(3.0), 42);
    let log = system.event_log().unwrap();
    let rejections = log
        .kinds
        .iter()
        .filter(|&&k| k == EventKind::Rejection)
        .count();
    assert!(rejections > 0);
    // All rejections here are external: the only station is station 0.
    for i in 0..log.len() {
        if log.kinds[i] == EventKind::Rejection {
            assert_eq!(log.from_servers[i], EXTERNAL);
            assert_eq!(log.to_servers[i], 0);
        }
    }
}

#[test]
fn tandem_logs_route_events() {
    let servers = vec![
        Server::new(Policy::Fcfs, Dist::Exp(4.0)),
        Server::new(Policy::Srpt, Dist::Exp(4.0)),
    ];
    let system = traced(servers, Dist::Exp(1.0), 7);
    let log = system.event_log().unwrap();

    let mut saw_route = false;
    for i in 0..log.len() {
        match log.kinds[i] {
            EventKind::Route => {
                saw_route = true;
                assert_eq!(log.from_servers[i], 0);
                assert_eq!(log.to_servers[i], 1);
            }
            EventKind::Departure => {
                assert_eq!(log.from_servers[i], 1);
                assert_eq!(log.to_servers[i], SYSTEM_EXIT);
            }
            _ => {}
        }
    }
    assert!(saw_route);
}

#[test]
fn log_is_deterministic_per_seed() {
    let a_owner = mm1_traced(42);
    let b_owner = mm1_traced(42);
    let (a, b) = (a_owner.event_log().unwrap(), b_owner.event_log().unwrap());
    assert_eq!(a.times, b.times);
    assert_eq!(a.kinds, b.kinds);
    assert_eq!(a.from_servers, b.from_servers);
    assert_eq!(a.to_servers, b.to_servers);
    assert_eq!(a.states, b.states);
}

#[test]
fn reconstruction_matches_final_station_state() {
    let servers = vec![
        Server::new(Policy::Fcfs, Dist::Exp(4.0)),
        Server::new(Policy::Fcfs, Dist::Exp(4.0)),
    ];
    let system = traced(servers, Dist::Exp(1.0), 11);
    let log = system.event_log().unwrap();

    let states = per_server_states(log, Some(2)).unwrap();
    assert_eq!(states.times.len(), log.len());
    for (s, trajectory) in states.server_states.iter().enumerate() {
        assert!(trajectory.iter().all(|&n| n >= 0), "station {s}");
        assert_eq!(
            *trajectory.last().unwrap(),
            system.servers()[s].state() as i64,
            "station {s}"
        );
    }
}

#[test]
fn reconstruction_infers_the_station_count() {
    let servers = vec![
        Server::new(Policy::Fcfs, Dist::Exp(4.0)),
        Server::new(Policy::Fcfs, Dist::Exp(4.0)),
    ];
    let system = traced(servers, Dist::Exp(1.0), 11);
    let states = per_server_states(system.event_log().unwrap(), None).unwrap();
    assert_eq!(states.server_states.len(), 2);
}

#[test]
fn empty_log_reconstruction_fails() {
    assert!(per_server_states(&EventLog::default(), None).is_err());
}
