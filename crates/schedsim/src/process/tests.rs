use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde_json::json;

use super::io::{IoConfig, IoEvent, IoSchedule};
use super::job::JobSpec;
use super::pcb::{Completion, Dispatch, Pcb};
use super::state::ProcessState;
use super::table::ProcessTable;
use crate::result::SimError;

#[test]
fn pcb_starts_new() {
    let pcb = Pcb::new(1, 3, 5);
    assert_eq!(pcb.state(), ProcessState::New);
    assert_eq!(pcb.remaining_time(), 5);
    assert_eq!(pcb.executed_time(), 0);
    assert_eq!(pcb.dispatch(), Dispatch::NotStarted);
    assert_eq!(pcb.completion(), Completion::Pending);
    assert_eq!(pcb.start_time(), None);
    assert_eq!(pcb.response_time(), None);
    assert_eq!(pcb.waiting_time(), None);
    assert!(pcb.io_schedule().is_empty());
}

#[test]
fn consume_floors_remaining_time() {
    let mut pcb = Pcb::new(1, 0, 2);
    pcb.consume(1);
    assert_eq!((pcb.remaining_time(), pcb.executed_time()), (1, 1));
    pcb.consume(5);
    assert_eq!((pcb.remaining_time(), pcb.executed_time()), (0, 6));
}

#[test]
fn first_dispatch_is_recorded_once() {
    let mut pcb = Pcb::new(4, 2, 3);
    assert!(pcb.mark_dispatched(5));
    assert!(!pcb.mark_dispatched(9));
    assert_eq!(pcb.start_time(), Some(5));
    assert_eq!(pcb.response_time(), Some(3));
}

#[test]
fn finalize_derives_timings() {
    let mut pcb = Pcb::new(1, 2, 3);
    pcb.set_state(ProcessState::Ready);
    pcb.set_state(ProcessState::Running);
    pcb.consume(3);
    pcb.finalize(9);

    assert_eq!(pcb.state(), ProcessState::Terminated);
    assert_eq!(
        pcb.completion(),
        Completion::Finished {
            finish_time: 9,
            turnaround_time: 7,
            waiting_time: 4,
        }
    );
}

#[test]
fn io_fires_one_event_per_check() {
    let mut pcb = Pcb::new(1, 0, 10);
    pcb.set_io_schedule(IoSchedule::new(vec![IoEvent::new(2, 3), IoEvent::new(2, 1)]));

    pcb.consume(1);
    assert_eq!(pcb.io_request_due(), None);
    pcb.consume(1);
    assert_eq!(pcb.io_request_due(), Some(3));
    assert_eq!(pcb.io_remaining_time(), Some(3));

    assert!(!pcb.tick_io());
    assert!(!pcb.tick_io());
    assert!(pcb.tick_io());
    assert_eq!(pcb.io_remaining_time(), None);

    // The second event shares the trigger point and fires on the next check.
    assert_eq!(pcb.io_request_due(), Some(1));
    assert_eq!(pcb.io_schedule().fired(), 2);
    assert_eq!(pcb.io_request_due(), None);
}

#[test]
fn io_never_fires_on_finished_work() {
    let mut pcb = Pcb::new(1, 0, 2);
    pcb.set_io_schedule(IoSchedule::new(vec![IoEvent::new(2, 4)]));
    pcb.consume(2);
    assert_eq!(pcb.io_request_due(), None);
    assert!(!pcb.tick_io());
}

#[test]
fn state_machine_rejects_skips() {
    use ProcessState::*;
    assert!(New.can_transition_to(Ready));
    assert!(Ready.can_transition_to(Running));
    assert!(Running.can_transition_to(Blocked));
    assert!(Blocked.can_transition_to(Ready));
    assert!(Running.can_transition_to(Terminated));

    assert!(!New.can_transition_to(Running));
    assert!(!Blocked.can_transition_to(Running));
    assert!(!Ready.can_transition_to(New));
    assert!(!Terminated.can_transition_to(Ready));
    assert!(Terminated.is_terminal());
    assert_eq!(Blocked.to_string(), "BLOCKED");
}

#[test]
fn generated_schedule_stays_below_burst() {
    let config = IoConfig::default();
    let mut rng = Pcg64::seed_from_u64(12345);

    for burst in [0, 1, 5, 20, 100] {
        let schedule = config.generate(burst, &mut rng);
        let mut previous = 0;
        for event in schedule.events() {
            assert!(event.trigger_at > previous);
            assert!(event.trigger_at < burst);
            assert!(event.duration >= 1);
            previous = event.trigger_at;
        }
    }
}

#[test]
fn generation_is_reproducible() {
    let config = IoConfig::default();
    let first = config.generate(200, &mut Pcg64::seed_from_u64(7));
    let second = config.generate(200, &mut Pcg64::seed_from_u64(7));
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn generation_respects_switches() {
    let mut rng = Pcg64::seed_from_u64(1);

    assert!(IoConfig::disabled().generate(100, &mut rng).is_empty());

    let zero_mean = IoConfig {
        interval_mean: 0.,
        ..IoConfig::default()
    };
    assert!(zero_mean.generate(100, &mut rng).is_empty());

    let capped = IoConfig {
        max_events: Some(2),
        ..IoConfig::default()
    };
    assert_eq!(capped.generate(1000, &mut rng).len(), 2);
}

#[test]
fn io_config_validation() {
    assert_eq!(IoConfig::default().validate(), Ok(()));

    let negative = IoConfig {
        duration_stddev: -1.,
        ..IoConfig::default()
    };
    assert!(matches!(negative.validate(), Err(SimError::InvalidIoConfig(_))));

    let nan = IoConfig {
        interval_mean: f64::NAN,
        ..IoConfig::default()
    };
    assert!(matches!(nan.validate(), Err(SimError::InvalidIoConfig(_))));
}

#[test]
fn job_metadata_controls_io() {
    let job = JobSpec::new(1, 0, 4);
    assert!(job.io_enabled());
    assert!(!job.clone().with_metadata("io_enabled", false).io_enabled());

    let parsed: JobSpec = serde_json::from_value(json!({
        "pid": 2,
        "burst": 3,
        "metadata": {"io_enabled": false, "source": "webview"},
        "io_schedule": [{"trigger_at": 1, "duration": 2}]
    }))
    .unwrap();
    assert_eq!(parsed.arrival, 0);
    assert!(!parsed.io_enabled());

    let pcb = Pcb::from_job(parsed.with_priority(3));
    assert_eq!(pcb.priority(), Some(3));
    assert_eq!(pcb.io_schedule().events(), &[IoEvent::new(1, 2)]);
    assert_eq!(pcb.metadata()["source"], json!("webview"));
}

#[test]
fn table_rejects_duplicates() {
    let mut table = ProcessTable::new();
    table.insert(Pcb::new(2, 0, 1)).unwrap();
    table.insert(Pcb::new(1, 0, 1)).unwrap();
    assert_eq!(table.insert(Pcb::new(2, 5, 5)), Err(SimError::DuplicatePid(2)));

    assert_eq!(table.len(), 2);
    assert_eq!(table.iter().map(|pcb| pcb.pid()).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(table.get(2).map(|pcb| pcb.burst_time()), Some(1));
    assert!(matches!(table.expect(9), Err(SimError::UnknownProcess(9))));
}

#[test]
fn huge_intervals_do_not_overflow() {
    let config = IoConfig {
        interval_mean: 1e19,
        interval_stddev: 1e19,
        ..IoConfig::default()
    };
    assert_eq!(config.validate(), Ok(()));

    let mut rng = Pcg64::seed_from_u64(12345);
    for _ in 0..200 {
        let schedule = config.generate(50, &mut rng);
        assert!(schedule.events().iter().all(|event| event.trigger_at < 50));
    }
}
