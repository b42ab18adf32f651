use std::env;
use std::fs;
use std::path::PathBuf;

use processor::{Report, Stepping};
use scheduler::{PolicyKind, RunParams, Time, Workload};

use crate::loader;


fn reference_path(folder: &str, name: &str) -> PathBuf {
    let (quantum, stepping) = arguments();
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("outputs")
        .join(folder)
        .join(format!("{name}___{quantum}_{stepping}.log"))
}

fn write_report(folder: &str, name: &str, report: &str) {
    let path = reference_path(folder, name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, report).unwrap();
}

fn read_report(folder: &str, name: &str) -> String {
    fs::read_to_string(reference_path(folder, name)).unwrap()
}

fn run(folder: &str, name: &str, report: &Report) {
    let output = report.to_string();

    if env::var("WRITE_OUTPUT").is_ok() {
        write_report(folder, name, &output);
    } else {
        let reference = read_report(folder, name);

        println!("\nleft = Correct Output\nright = Your Output\n");
        use pretty_assertions::assert_eq;
        assert_eq!(reference, output);
    }
}

fn arguments() -> (String, String) {
    let quantum = env::var("QUANTUM").unwrap_or("2".to_string());
    let stepping = env::var("STEPPING").unwrap_or("unit".to_string());
    (quantum, stepping)
}

fn params(preemptive: bool) -> RunParams {
    let (quantum, _) = arguments();
    RunParams {
        preemptive,
        quantum: Some(quantum.parse::<Time>().unwrap()),
    }
}

fn workload(content: &str) -> Workload {
    loader::parse(content).unwrap()
}

fn report(workload: &Workload, policy: PolicyKind, params: RunParams) -> Report {
    let (_, stepping) = arguments();
    let stepping = stepping.parse::<Stepping>().unwrap();
    processor::simulate_with(workload, policy, params, stepping).unwrap()
}

/// `burst:arrival:priority` = 5:0:1, 3:1:2, 8:2:1
const THREE_PROCESSES: &str = "5:0:1\n3:1:2\n8:2:1\n";
