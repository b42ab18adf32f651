use proptest::prelude::*;

use scheduler::{
    Pid, PolicyKind, Process, ProcessRecord, ProcessState, RunParams, Scheduler, SchedulerError,
    SchedulingDecision, StopReason, Time, Workload,
};

use super::*;

fn workload(triples: &[(Time, Time, i32)]) -> Workload {
    Workload::from_triples(triples.iter().copied()).unwrap()
}

/// Three processes: `burst:arrival:priority` = 5:0:1, 3:1:2, 8:2:1.
fn three_processes() -> Workload {
    workload(&[(5.0, 0.0, 1), (3.0, 1.0, 2), (8.0, 2.0, 1)])
}

fn waiting(report: &Report) -> Vec<Time> {
    report.waiting_times().into_iter().map(|(_, w)| w).collect()
}

fn order(report: &Report) -> Vec<usize> {
    report.completion_order().iter().map(Pid::get).collect()
}

#[test]
fn fcfs_three_processes() {
    let report = simulate(&three_processes(), PolicyKind::Fcfs, RunParams::default()).unwrap();

    assert_eq!(waiting(&report), vec![0.0, 4.0, 6.0]);
    assert!((report.average_waiting_time - 10.0 / 3.0).abs() < 1e-9);
    assert_eq!(order(&report), vec![1, 2, 3]);

    let p3 = report.entry(Pid::new(3).unwrap()).unwrap();
    assert_eq!(p3.completion_time, 16.0);
    assert_eq!(p3.turnaround_time, 14.0);
}

#[test]
fn sjf_non_preemptive_three_processes() {
    let report = simulate(
        &three_processes(),
        PolicyKind::ShortestJobFirst,
        RunParams::non_preemptive(),
    )
    .unwrap();

    assert_eq!(waiting(&report), vec![0.0, 4.0, 6.0]);
    assert_eq!(order(&report), vec![1, 2, 3]);
    assert_eq!(report.policy, "Shortest Job First (Non-Preemptive)");
}

#[test]
fn round_robin_three_processes() {
    let report = simulate(
        &three_processes(),
        PolicyKind::RoundRobin,
        RunParams::with_quantum(2.0),
    )
    .unwrap();

    assert_eq!(order(&report), vec![2, 1, 3]);
    assert_eq!(waiting(&report), vec![7.0, 5.0, 6.0]);
    assert_eq!(report.total_waiting_time(), 18.0);

    let turnaround: Time = report.entries.iter().map(|e| e.turnaround_time).sum();
    let burst: Time = report.entries.iter().map(|e| e.burst_time).sum();
    assert_eq!(report.total_waiting_time(), turnaround - burst);

    let slices: Vec<(usize, Time, Time)> = report
        .timeline
        .iter()
        .map(|s| (s.pid.get(), s.start, s.end))
        .collect();
    assert_eq!(
        slices,
        vec![
            (1, 0.0, 2.0),
            (2, 2.0, 4.0),
            (3, 4.0, 6.0),
            (1, 6.0, 8.0),
            (2, 8.0, 9.0),
            (3, 9.0, 11.0),
            (1, 11.0, 12.0),
            (3, 12.0, 16.0),
        ]
    );

    let responses: Vec<Time> = [1, 2, 3]
        .iter()
        .map(|pid| report.entry(Pid::new(*pid).unwrap()).unwrap().response_time)
        .collect();
    assert_eq!(responses, vec![0.0, 1.0, 2.0]);
}

#[test]
fn shortest_remaining_time_first_preempts_on_arrival() {
    let report = simulate(
        &three_processes(),
        PolicyKind::ShortestJobFirst,
        RunParams::preemptive(),
    )
    .unwrap();

    assert_eq!(order(&report), vec![2, 1, 3]);
    assert_eq!(waiting(&report), vec![3.0, 0.0, 6.0]);
    assert_eq!(report.average_waiting_time, 3.0);
}

#[test]
fn shortest_remaining_time_first_textbook() {
    let report = simulate(
        &workload(&[(8.0, 0.0, 0), (4.0, 1.0, 0), (9.0, 2.0, 0), (5.0, 3.0, 0)]),
        PolicyKind::ShortestJobFirst,
        RunParams::preemptive(),
    )
    .unwrap();

    assert_eq!(waiting(&report), vec![9.0, 0.0, 15.0, 2.0]);
    assert_eq!(report.average_waiting_time, 6.5);
}

#[test]
fn sjf_picks_shortest_burst_among_arrived() {
    let report = simulate(
        &workload(&[(6.0, 0.0, 1), (8.0, 0.0, 3), (7.0, 0.0, 2), (3.0, 0.0, 4)]),
        PolicyKind::ShortestJobFirst,
        RunParams::non_preemptive(),
    )
    .unwrap();

    assert_eq!(order(&report), vec![4, 1, 3, 2]);
    assert_eq!(waiting(&report), vec![3.0, 16.0, 9.0, 0.0]);
    assert_eq!(report.average_waiting_time, 7.0);
}

#[test]
fn priority_prefers_higher_values() {
    let report = simulate(
        &workload(&[(6.0, 0.0, 1), (8.0, 0.0, 3), (7.0, 0.0, 2), (3.0, 0.0, 4)]),
        PolicyKind::Priority,
        RunParams::non_preemptive(),
    )
    .unwrap();

    assert_eq!(order(&report), vec![4, 2, 3, 1]);
    assert_eq!(waiting(&report), vec![18.0, 3.0, 11.0, 0.0]);
    assert_eq!(report.average_waiting_time, 8.0);
}

#[test]
fn priority_non_preemptive_runs_first_arrival_to_completion() {
    let report = simulate(
        &three_processes(),
        PolicyKind::Priority,
        RunParams::non_preemptive(),
    )
    .unwrap();

    assert_eq!(waiting(&report), vec![0.0, 4.0, 6.0]);
}

#[test]
fn priority_preemptive_interrupts_for_higher_value() {
    let report = simulate(
        &three_processes(),
        PolicyKind::Priority,
        RunParams::preemptive(),
    )
    .unwrap();

    assert_eq!(order(&report), vec![2, 1, 3]);
    assert_eq!(waiting(&report), vec![3.0, 0.0, 6.0]);
    assert_eq!(report.policy, "Priority (Preemptive)");
}

#[test]
fn idle_gap_moves_the_clock_forward() {
    let gap = workload(&[(2.0, 0.0, 0), (3.0, 5.0, 0)]);
    for policy in PolicyKind::ALL {
        let report = simulate(&gap, policy, RunParams::with_quantum(1.0)).unwrap();
        assert_eq!(waiting(&report), vec![0.0, 0.0], "{policy}");
        assert_eq!(report.idle_time(), 3.0, "{policy}");
        assert_eq!(
            report.entry(Pid::new(2).unwrap()).unwrap().completion_time,
            8.0
        );
    }
}

#[test]
fn late_first_arrival_is_not_charged() {
    let report = simulate(
        &workload(&[(4.0, 10.0, 0), (2.0, 11.0, 0)]),
        PolicyKind::Fcfs,
        RunParams::default(),
    )
    .unwrap();

    assert_eq!(waiting(&report), vec![0.0, 3.0]);
    assert_eq!(report.timeline[0].start, 10.0);
}

#[test]
fn equal_processes_run_in_pid_order() {
    let same = workload(&[(2.0, 0.0, 1), (2.0, 0.0, 1), (2.0, 0.0, 1)]);
    for policy in PolicyKind::ALL {
        for preemptive in [false, true] {
            let params = RunParams {
                preemptive,
                quantum: Some(2.0),
            };
            let report = simulate(&same, policy, params).unwrap();
            assert_eq!(order(&report), vec![1, 2, 3], "{policy}");
        }
    }
}

#[test]
fn fractional_times_are_supported() {
    let report = simulate(
        &workload(&[(2.5, 0.0, 0), (1.0, 0.5, 0)]),
        PolicyKind::ShortestJobFirst,
        RunParams::preemptive(),
    )
    .unwrap();

    // P1 runs its first tick before P2 is looked at
    assert_eq!(order(&report), vec![2, 1]);
    assert_eq!(waiting(&report), vec![1.0, 0.5]);
    assert_eq!(report.entry(Pid::new(1).unwrap()).unwrap().completion_time, 3.5);
}

#[test]
fn event_stepping_waits_for_the_tick_after_a_fractional_arrival() {
    let fractional = workload(&[(2.5, 0.0, 0), (1.0, 0.5, 0)]);
    let unit = simulate_with(
        &fractional,
        PolicyKind::ShortestJobFirst,
        RunParams::preemptive(),
        Stepping::Unit,
    )
    .unwrap();
    let event = simulate_with(
        &fractional,
        PolicyKind::ShortestJobFirst,
        RunParams::preemptive(),
        Stepping::Event,
    )
    .unwrap();

    assert_eq!(waiting(&event), vec![1.0, 0.5]);
    assert_eq!(unit, event);
}

#[test]
fn preemptive_idle_resumes_on_a_tick() {
    let late = workload(&[(1.0, 0.5, 0)]);
    for stepping in [Stepping::Unit, Stepping::Event] {
        let report = simulate_with(
            &late,
            PolicyKind::ShortestJobFirst,
            RunParams::preemptive(),
            stepping,
        )
        .unwrap();
        let entry = report.entry(Pid::new(1).unwrap()).unwrap();
        assert_eq!(entry.completion_time, 2.0, "{stepping:?}");
        assert_eq!(entry.response_time, 0.5, "{stepping:?}");
        assert_eq!(report.timeline[0].start, 1.0, "{stepping:?}");
    }

    // non-preemptive policies start at the arrival itself
    let report = simulate(&late, PolicyKind::Fcfs, RunParams::default()).unwrap();
    assert_eq!(report.entries[0].completion_time, 1.5);
}

#[test]
fn empty_workload_yields_zero_report() {
    for policy in PolicyKind::ALL {
        let report = simulate(&[], policy, RunParams::with_quantum(2.0)).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.average_waiting_time, 0.0);
        assert!(!report.average_waiting_time.is_nan());
    }
}

#[test]
fn round_robin_without_quantum_fails() {
    let err = simulate(
        &three_processes(),
        PolicyKind::RoundRobin,
        RunParams::non_preemptive(),
    )
    .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidParameter(_)));

    let err = simulate(
        &three_processes(),
        PolicyKind::RoundRobin,
        RunParams::with_quantum(-2.0),
    )
    .unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidParameter(_)));
}

#[test]
fn zero_burst_is_refused() {
    let records = vec![
        ProcessRecord::new(Pid::new(1).unwrap(), 4.0, 0.0, 0),
        ProcessRecord::new(Pid::new(2).unwrap(), 0.0, 1.0, 0),
    ];
    let err = simulate(&records, PolicyKind::Fcfs, RunParams::default()).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidProcess { pid, .. } if pid == 2));
}

#[test]
fn workload_is_left_untouched() {
    let workload = three_processes();
    let before = workload.clone();

    let first = simulate(&workload, PolicyKind::Fcfs, RunParams::default()).unwrap();
    simulate(&workload, PolicyKind::ShortestJobFirst, RunParams::preemptive()).unwrap();
    simulate(&workload, PolicyKind::RoundRobin, RunParams::with_quantum(1.0)).unwrap();
    let again = simulate(&workload, PolicyKind::Fcfs, RunParams::default()).unwrap();

    assert_eq!(workload, before);
    assert_eq!(first, again);
}

#[test]
fn logs_record_every_decision() {
    let run = Processor::new(scheduler::fcfs())
        .with_logs()
        .run(&three_processes())
        .unwrap();

    assert_eq!(run.logs.len(), 3);
    let first = &run.logs[0];
    assert_eq!(first.time, 0.0);
    assert_eq!(
        first.decision,
        SchedulingDecision::Run {
            pid: Pid::new(1).unwrap(),
            timeslice: None
        }
    );
    assert_eq!(first.stop_reason, Some((5.0, StopReason::Completed)));
    assert_eq!(
        first.processes[&Pid::new(3).unwrap()].state,
        ProcessState::Unarrived
    );

    let text = format_logs(&run.logs);
    assert!(text.starts_with("===== Iteration: 1 =====\n[0.00] Run 1\n"));
}

#[test]
fn logs_are_off_by_default() {
    let run = Processor::new(scheduler::fcfs())
        .run(&three_processes())
        .unwrap();
    assert!(run.logs.is_empty());
}

struct Stuck;

impl Scheduler for Stuck {
    fn name(&self) -> String {
        String::from("Stuck")
    }

    fn preemptive(&self) -> bool {
        false
    }

    fn admit(&mut self, _process: &ProcessRecord) {}

    fn next(&mut self) -> SchedulingDecision {
        SchedulingDecision::Idle
    }

    fn stop(&mut self, _pid: Pid, _ran: Time, _reason: StopReason) {}

    fn list(&self) -> Vec<&dyn Process> {
        vec![]
    }
}

#[test]
fn scheduler_losing_a_process_stalls() {
    let err = Processor::new(Stuck).run(&three_processes()).unwrap_err();
    assert_eq!(
        err,
        SchedulerError::Stalled {
            time: 2.0,
            remaining: 3
        }
    );
}

#[test]
fn stepping_parses() {
    assert_eq!("event".parse::<Stepping>(), Ok(Stepping::Event));
    assert_eq!("Unit".parse::<Stepping>(), Ok(Stepping::Unit));
    assert!("tick".parse::<Stepping>().is_err());
}

fn workloads() -> impl Strategy<Value = Workload> {
    prop::collection::vec((1u32..10, 0u32..20, -3i32..5), 0..8).prop_map(|triples| {
        Workload::from_triples(
            triples
                .into_iter()
                .map(|(burst, arrival, priority)| (burst as Time, arrival as Time, priority)),
        )
        .unwrap()
    })
}

/// Times in quarters of a unit, exact in binary floating point.
fn fractional_workloads() -> impl Strategy<Value = Workload> {
    prop::collection::vec((1u32..24, 0u32..40, -3i32..5), 0..8).prop_map(|triples| {
        Workload::from_triples(triples.into_iter().map(|(burst, arrival, priority)| {
            (burst as Time / 4.0, arrival as Time / 4.0, priority)
        }))
        .unwrap()
    })
}

fn configurations(quantum: Time) -> Vec<(PolicyKind, RunParams)> {
    vec![
        (PolicyKind::Fcfs, RunParams::default()),
        (PolicyKind::ShortestJobFirst, RunParams::non_preemptive()),
        (PolicyKind::ShortestJobFirst, RunParams::preemptive()),
        (PolicyKind::Priority, RunParams::non_preemptive()),
        (PolicyKind::Priority, RunParams::preemptive()),
        (PolicyKind::RoundRobin, RunParams::with_quantum(quantum)),
    ]
}

proptest! {
    #[test]
    fn metrics_are_consistent(workload in workloads(), quantum in 1u32..5) {
        for (policy, params) in configurations(quantum as Time) {
            let report = simulate(&workload, policy, params).unwrap();
            prop_assert_eq!(report.entries.len(), workload.len());

            let n = report.entries.len().max(1) as Time;
            prop_assert!((report.total_waiting_time() / n - report.average_waiting_time).abs() < 1e-9);

            for entry in &report.entries {
                prop_assert!(entry.waiting_time >= 0.0);
                prop_assert!(entry.response_time >= 0.0);
                prop_assert!(entry.response_time <= entry.waiting_time + 1e-9);
                prop_assert!((entry.turnaround_time - (entry.waiting_time + entry.burst_time)).abs() < 1e-9);
                prop_assert!((entry.turnaround_time - (entry.completion_time - entry.arrival_time)).abs() < 1e-9);
            }

            let busy: Time = report.timeline.iter().map(Slice::duration).sum();
            prop_assert!((busy - workload.total_burst()).abs() < 1e-9);
        }
    }

    #[test]
    fn runs_are_deterministic(workload in workloads(), quantum in 1u32..5) {
        for (policy, params) in configurations(quantum as Time) {
            let first = simulate(&workload, policy, params).unwrap();
            let second = simulate(&workload, policy, params).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn unit_and_event_stepping_agree(workload in workloads()) {
        for policy in [PolicyKind::ShortestJobFirst, PolicyKind::Priority] {
            let unit = simulate_with(&workload, policy, RunParams::preemptive(), Stepping::Unit).unwrap();
            let event = simulate_with(&workload, policy, RunParams::preemptive(), Stepping::Event).unwrap();
            prop_assert_eq!(unit, event);
        }
    }

    #[test]
    fn unit_and_event_stepping_agree_on_fractional_times(workload in fractional_workloads()) {
        for policy in [PolicyKind::ShortestJobFirst, PolicyKind::Priority] {
            let unit = simulate_with(&workload, policy, RunParams::preemptive(), Stepping::Unit).unwrap();
            let event = simulate_with(&workload, policy, RunParams::preemptive(), Stepping::Event).unwrap();
            prop_assert_eq!(unit, event);
        }
    }

    #[test]
    fn long_quantum_round_robin_is_fcfs(workload in workloads()) {
        let fcfs = simulate(&workload, PolicyKind::Fcfs, RunParams::default()).unwrap();
        let rr = simulate(&workload, PolicyKind::RoundRobin, RunParams::with_quantum(10.0)).unwrap();
        prop_assert_eq!(fcfs.waiting_times(), rr.waiting_times());
        prop_assert_eq!(fcfs.completion_order(), rr.completion_order());
    }
}
