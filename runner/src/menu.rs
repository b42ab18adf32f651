//! The interactive menu.

use std::io::{BufRead, Write};

use scheduler::{PolicyKind, RunParams, Time};

use crate::error::CliError;
use crate::session::Session;

const RULE: &str = " --------------------------------------------------------------------------";

/// What the user has picked so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Selection {
    pub policy: Option<PolicyKind>,
    pub preemptive: bool,
    pub quantum: Option<Time>,
}

impl Selection {
    fn params(&self) -> RunParams {
        RunParams {
            preemptive: self.preemptive,
            quantum: self.quantum,
        }
    }
}

/// Runs the menu until the user ends the program or the input is exhausted.
///
/// Ending the program runs every policy, like `--batch`.
pub fn interactive<R, W>(
    session: &mut Session<W>,
    mut input: R,
    mut selection: Selection,
) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
{
    loop {
        show_menu(session.console(), &selection)?;
        let Some(option) = prompt(&mut input, session.console(), " Option> ")? else {
            return Ok(());
        };

        match option.as_str() {
            "1" => {
                let Some(policy) = pick_policy(&mut input, session.console())? else {
                    return Ok(());
                };
                selection.policy = Some(policy);
                if policy == PolicyKind::RoundRobin {
                    let Some(quantum) = ask_quantum(&mut input, session.console())? else {
                        return Ok(());
                    };
                    selection.quantum = Some(quantum);
                }
            }
            "2" => match selection.policy {
                Some(policy) if !policy.supports_preemption() => {
                    writeln!(session.console(), " {policy} has no preemptive mode.")?
                }
                _ => selection.preemptive = !selection.preemptive,
            },
            "3" => match selection.policy {
                Some(policy) => {
                    if policy == PolicyKind::RoundRobin && selection.quantum.is_none() {
                        let Some(quantum) = ask_quantum(&mut input, session.console())? else {
                            return Ok(());
                        };
                        selection.quantum = Some(quantum);
                    }
                    session.run(policy, selection.params())?;
                }
                None => writeln!(session.console(), " Select a scheduling method first.")?,
            },
            "4" => {
                let quantum = match selection.quantum {
                    Some(quantum) => quantum,
                    None => match ask_quantum(&mut input, session.console())? {
                        Some(quantum) => quantum,
                        None => return Ok(()),
                    },
                };
                return session.batch(quantum);
            }
            other => writeln!(session.console(), " Unknown option {other:?}.")?,
        }
    }
}

fn show_menu<W: Write>(out: &mut W, selection: &Selection) -> Result<(), CliError> {
    let method = selection
        .policy
        .map_or_else(|| String::from("None"), |policy| policy.to_string());
    let quantum = selection
        .quantum
        .map_or_else(String::new, |quantum| format!(" | QT = {quantum:.2}"));

    writeln!(out, " --------------------------------- WELCOME --------------------------------")?;
    writeln!(out)?;
    writeln!(out, " [1]: Scheduling Method ({method}){quantum}")?;
    writeln!(
        out,
        " [2]: Preemptive Mode ({})",
        if selection.preemptive { "YES" } else { "NO" }
    )?;
    writeln!(out, " [3]: Show results")?;
    writeln!(
        out,
        " [4]: End Program (Run all methods then display and write to file)"
    )?;
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

fn pick_policy<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<PolicyKind>, CliError> {
    loop {
        writeln!(out, " ------------------------ Select a scheduling method -----------------------")?;
        writeln!(out)?;
        writeln!(out, " [1]: First Come, First Served")?;
        writeln!(out, " [2]: Shortest Job First")?;
        writeln!(out, " [3]: Priority")?;
        writeln!(out, " [4]: Round-Robin")?;
        writeln!(out)?;
        writeln!(out, "{RULE}")?;

        let Some(choice) = prompt(input, out, " Option> ")? else {
            return Ok(None);
        };
        let policy = match choice.as_str() {
            "1" => PolicyKind::Fcfs,
            "2" => PolicyKind::ShortestJobFirst,
            "3" => PolicyKind::Priority,
            "4" => PolicyKind::RoundRobin,
            _ => continue,
        };
        return Ok(Some(policy));
    }
}

fn ask_quantum<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<Time>, CliError> {
    loop {
        let Some(answer) = prompt(input, out, " Input quantum time value: ")? else {
            return Ok(None);
        };
        match answer.parse::<Time>() {
            Ok(quantum) if quantum.is_finite() && quantum > 0.0 => return Ok(Some(quantum)),
            _ => writeln!(out, " The time quantum must be a positive number.")?,
        }
    }
}

/// Returns `None` at the end of the input.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> Result<Option<String>, CliError> {
    write!(out, "{text}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
