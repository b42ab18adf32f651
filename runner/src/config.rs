//! Command line flags and environment fallbacks.

use std::env;
use std::path::PathBuf;

use processor::Stepping;
use scheduler::{PolicyKind, Time};

use crate::error::CliError;

pub const USAGE: &str = "usage: runner -f <input> -o <output> [--policy fcfs|sjf|priority|rr] \
[--preemptive] [--quantum <ms>] [--batch] [--stepping unit|event] [--json <path>] [--trace]";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub policy: Option<PolicyKind>,
    pub preemptive: bool,
    pub quantum: Option<Time>,
    pub batch: bool,
    /// Unit stepping unless set.
    pub stepping: Option<Stepping>,
    pub json: Option<PathBuf>,
    pub trace: bool,
}

impl Config {
    /// Reads the process arguments, then `QUANTUM` and `STEPPING`
    /// for whatever the flags left unset.
    pub fn from_env() -> Result<Config, CliError> {
        let mut config = Config::parse(env::args().skip(1))?;
        if config.quantum.is_none() {
            if let Ok(quantum) = env::var("QUANTUM") {
                config.quantum = Some(parse_quantum(&quantum)?);
            }
        }
        if config.stepping.is_none() {
            if let Ok(stepping) = env::var("STEPPING") {
                config.stepping = Some(stepping.parse()?);
            }
        }
        Ok(config)
    }

    pub fn parse<I>(args: I) -> Result<Config, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut input = None;
        let mut output = None;
        let mut config = Config {
            input: PathBuf::new(),
            output: PathBuf::new(),
            policy: None,
            preemptive: false,
            quantum: None,
            batch: false,
            stepping: None,
            json: None,
            trace: false,
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| CliError::Usage(format!("{flag} needs a value\n{USAGE}")))
            };
            match arg.as_str() {
                "-f" => input = Some(PathBuf::from(value("-f")?)),
                "-o" => output = Some(PathBuf::from(value("-o")?)),
                "--policy" => config.policy = Some(value("--policy")?.parse()?),
                "--quantum" => config.quantum = Some(parse_quantum(&value("--quantum")?)?),
                "--stepping" => config.stepping = Some(value("--stepping")?.parse()?),
                "--json" => config.json = Some(PathBuf::from(value("--json")?)),
                "--preemptive" => config.preemptive = true,
                "--batch" => config.batch = true,
                "--trace" => config.trace = true,
                other => {
                    return Err(CliError::Usage(format!("unknown argument {other:?}\n{USAGE}")))
                }
            }
        }

        match (input, output) {
            (Some(input), Some(output)) => {
                config.input = input;
                config.output = output;
            }
            _ => {
                return Err(CliError::Usage(format!(
                    "Please specify both -f and -o arguments.\n{USAGE}"
                )))
            }
        }
        Ok(config)
    }

    pub fn stepping(&self) -> Stepping {
        self.stepping.unwrap_or_default()
    }
}

fn parse_quantum(value: &str) -> Result<Time, CliError> {
    match value.trim().parse::<Time>() {
        Ok(quantum) if quantum.is_finite() && quantum > 0.0 => Ok(quantum),
        _ => Err(CliError::Usage(format!(
            "the time quantum must be a positive number, got {value:?}"
        ))),
    }
}
