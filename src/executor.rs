use crate::config::Config;
use crate::model::AppRecord;
use crate::sources::history::History;
use anyhow::Result;
use log::info;
use std::process::{Command, Stdio};

/// Spawns the record's command detached and records the launch at the front
/// of the history. Terminal apps are wrapped in the configured terminal
/// command when one is set.
pub fn launch(record: &AppRecord, config: &Config, history: &mut History) -> Result<()> {
    history.record_launch(record.key.clone(), config.general.history_size);

    let mut cmd_parts: Vec<&str> = Vec::new();
    if record.open_in_terminal {
        if let Some(term_cmd) = &config.general.terminal {
            cmd_parts.extend(term_cmd.split_whitespace());
        }
    }
    cmd_parts.extend(record.exec.split_whitespace());

    if cmd_parts.is_empty() {
        return Ok(());
    }

    info!("launching {} as {:?}", record.key, cmd_parts);
    let mut command = Command::new(cmd_parts[0]);
    command
        .args(&cmd_parts[1..])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command.spawn()?;

    Ok(())
}
