use super::{init::enable_tracing, log_entry::LogEntry};

#[test]
fn scheduling_events() {
    enable_tracing();

    LogEntry::JobsLoaded {
        time: 0,
        jobs: 2,
        algorithm: "rr".to_owned(),
    }
    .print();

    LogEntry::ProcessArrived { time: 0, pid: 1 }.print();

    LogEntry::ProcessDispatched {
        time: 0,
        pid: 1,
        first: true,
    }
    .print();

    LogEntry::ProcessPreempted {
        time: 2,
        pid: 1,
        by: 2,
        note: Some("quantum expired".to_owned()),
    }
    .print();

    LogEntry::ProcessDispatched {
        time: 2,
        pid: 2,
        first: true,
    }
    .print();
}

#[test]
fn io_events() {
    enable_tracing();

    LogEntry::IoRequested {
        time: 3,
        pid: 1,
        duration: 2,
    }
    .print();

    LogEntry::CpuIdle { time: 3, blocked: 1 }.print();

    LogEntry::IoCompleted { time: 5, pid: 1 }.print();

    LogEntry::ClockJumped { from: 6, to: 10 }.print();

    LogEntry::RunTruncated { time: 12, incomplete: 1 }.print();

    LogEntry::RunFinished {
        time: 12,
        completed: 1,
        context_switches: 3,
    }
    .print();
}
