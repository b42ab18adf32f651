use std::io::{self, Write};
use std::process;

use env_logger::Builder;
use log::info;
use scheduler::RunParams;

mod config;
mod error;
mod loader;
mod menu;
mod session;

use config::Config;
use error::CliError;
use session::Session;

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    if let Err(err) = run() {
        eprintln!(" ERROR: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let config = Config::from_env()?;
    let workload = loader::load(&config.input)?;

    let mut session = Session::new(
        workload,
        &config.output,
        io::stdout().lock(),
        config.stepping(),
        config.trace,
    )?;
    info!(
        "loaded {} processes from {}",
        session.workload().len(),
        config.input.display()
    );

    if config.batch {
        let quantum = config.quantum.ok_or_else(|| {
            CliError::Usage(String::from(
                "batch mode needs a time quantum, use --quantum or QUANTUM",
            ))
        })?;
        session.batch(quantum)?;
    } else if let Some(policy) = config.policy {
        let params = RunParams {
            preemptive: config.preemptive,
            quantum: config.quantum,
        };
        session.run(policy, params)?;
    } else {
        let selection = menu::Selection {
            policy: None,
            preemptive: config.preemptive,
            quantum: config.quantum,
        };
        menu::interactive(&mut session, io::stdin().lock(), selection)?;
    }

    if let Some(json) = &config.json {
        session.write_json(json)?;
    }
    info!(
        "{} reports written to {}",
        session.reports().len(),
        config.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests;
