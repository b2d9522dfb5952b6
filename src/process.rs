//! Helper process control.
//!
//! The monitor never talks to instruments itself; it launches the logger
//! and setpoint binaries as child processes and watches their liveness.
//! Each command is registered once under a UI label, then toggled on and
//! off by button presses. A periodic [`ProcessController::reap_finished`]
//! pass notices children that exited on their own (finite logging runs,
//! crashes) so the UI can flip the button back without a press.
//!
//! Command lines are split on whitespace, so program and argument paths
//! must not contain spaces.

use std::io;
use std::process::{Child, Command};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("a command labeled {0:?} is already registered")]
    DuplicateLabel(String),
    #[error("no command labeled {0:?} is registered")]
    UnknownLabel(String),
    #[error("command for {0:?} is empty")]
    EmptyCommand(String),
    #[error("failed to start {label:?}: {source}")]
    Spawn {
        label: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to stop {label:?}: {source}")]
    Stop {
        label: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug)]
struct CommandSlot {
    label: String,
    tokens: Vec<String>,
    child: Option<Child>,
}

/// Registry of launchable helper commands, keyed by button label.
#[derive(Debug, Default)]
pub struct ProcessController {
    slots: Vec<CommandSlot>,
}

impl ProcessController {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.label == label)
    }

    /// Register a command line under a label. The line is tokenized here;
    /// an empty line is rejected up front rather than at first launch.
    pub fn register(&mut self, label: &str, command_line: &str) -> Result<(), ProcessError> {
        if self.index_of(label).is_some() {
            return Err(ProcessError::DuplicateLabel(label.to_string()));
        }
        let tokens: Vec<String> = command_line
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if tokens.is_empty() {
            return Err(ProcessError::EmptyCommand(label.to_string()));
        }
        self.slots.push(CommandSlot {
            label: label.to_string(),
            tokens,
            child: None,
        });
        Ok(())
    }

    /// Replace the final token of a registered command. Dropdowns use this
    /// to retarget the trailing parameter (log increment, setpoint) without
    /// re-registering the whole line.
    pub fn set_trailing_arg(&mut self, label: &str, value: &str) -> Result<(), ProcessError> {
        let index = self
            .index_of(label)
            .ok_or_else(|| ProcessError::UnknownLabel(label.to_string()))?;
        let slot = &mut self.slots[index];
        if let Some(last) = slot.tokens.last_mut() {
            *last = value.to_string();
        }
        Ok(())
    }

    pub fn command_line(&self, label: &str) -> Option<String> {
        self.index_of(label)
            .map(|index| self.slots[index].tokens.join(" "))
    }

    /// Spawn the command if it is not already running.
    pub fn start(&mut self, label: &str) -> Result<(), ProcessError> {
        let index = self
            .index_of(label)
            .ok_or_else(|| ProcessError::UnknownLabel(label.to_string()))?;
        if self.slot_running(index) {
            return Ok(());
        }
        let slot = &mut self.slots[index];
        let child = Command::new(&slot.tokens[0])
            .args(&slot.tokens[1..])
            .spawn()
            .map_err(|e| ProcessError::Spawn {
                label: label.to_string(),
                source: e,
            })?;
        tracing::info!("started {:?} (pid {}): {}", label, child.id(), slot.tokens.join(" "));
        slot.child = Some(child);
        Ok(())
    }

    /// Kill the command's child if one is running. Children that already
    /// exited are reaped here rather than treated as a stop failure.
    pub fn stop(&mut self, label: &str) -> Result<(), ProcessError> {
        let index = self
            .index_of(label)
            .ok_or_else(|| ProcessError::UnknownLabel(label.to_string()))?;
        let slot = &mut self.slots[index];
        let Some(mut child) = slot.child.take() else {
            return Ok(());
        };
        match child.try_wait() {
            Ok(Some(status)) => {
                tracing::info!("{:?} had already exited with {}", label, status);
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => {
                return Err(ProcessError::Stop {
                    label: label.to_string(),
                    source: e,
                });
            }
        }
        child.kill().map_err(|e| ProcessError::Stop {
            label: label.to_string(),
            source: e,
        })?;
        // Reap so the pid does not linger as a zombie.
        let _ = child.wait();
        tracing::info!("stopped {:?}", label);
        Ok(())
    }

    /// Toggle between start and stop, returning whether the command is
    /// running afterwards.
    pub fn toggle(&mut self, label: &str) -> Result<bool, ProcessError> {
        if self.is_running(label) {
            self.stop(label)?;
            Ok(false)
        } else {
            self.start(label)?;
            Ok(true)
        }
    }

    /// Liveness check that also reaps a child found exited.
    pub fn is_running(&mut self, label: &str) -> bool {
        match self.index_of(label) {
            Some(index) => {
                self.reap_slot(index);
                self.slot_running(index)
            }
            None => false,
        }
    }

    /// Sweep every slot for children that exited on their own, returning
    /// the labels that flipped from running to stopped. Called from the UI
    /// poll timer so buttons track short-lived runs.
    pub fn reap_finished(&mut self) -> Vec<String> {
        let mut finished = Vec::new();
        for index in 0..self.slots.len() {
            let was_running = self.slot_running(index);
            self.reap_slot(index);
            if was_running && !self.slot_running(index) {
                finished.push(self.slots[index].label.clone());
            }
        }
        finished
    }

    /// Kill every running child. Called once at application shutdown so no
    /// logger keeps appending after the monitor closes.
    pub fn shutdown(&mut self) {
        for index in 0..self.slots.len() {
            if self.slot_running(index) {
                let label = self.slots[index].label.clone();
                if let Err(e) = self.stop(&label) {
                    tracing::warn!("failed to stop {:?} at shutdown: {}", label, e);
                }
            }
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.label.as_str())
    }

    fn slot_running(&self, index: usize) -> bool {
        self.slots[index].child.is_some()
    }

    fn reap_slot(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if let Some(child) = slot.child.as_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    tracing::info!("{:?} exited with {}", slot.label, status);
                    slot.child = None;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("liveness check for {:?} failed: {}", slot.label, e);
                    slot.child = None;
                }
            }
        }
    }
}

impl Drop for ProcessController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
