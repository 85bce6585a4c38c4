//! Test doubles for the engine's collaborators.

use crate::{
    CommandExecutor, CoreError, CoreResult, Hypervisor, MenuDisplay, MenuModel, Sleeper,
    VmRecord,
};

use std::{
    collections::VecDeque,
    panic::Location,
    path::Path,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use error_location::ErrorLocation;

/// Build an `ExternalCommand` error as a failed process would.
pub(crate) fn command_failure(command: &str, exit_code: i32, stderr: &str) -> CoreError {
    CoreError::ExternalCommand {
        command: command.to_string(),
        exit_code: Some(exit_code),
        stderr: stderr.to_string(),
        source: None,
        location: ErrorLocation::from(Location::caller()),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted process outcome.
pub(crate) enum Reply {
    Stdout(String),
    Exit { code: i32, stderr: String },
}

/// Executor that replays scripted outcomes and records every command line.
#[derive(Default)]
pub(crate) struct ScriptedExecutor {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedExecutor {
    pub(crate) fn with_replies(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, program: &Path, args: &[&str]) -> CoreResult<String> {
        let mut call = vec![program.display().to_string()];
        call.extend(args.iter().map(|arg| (*arg).to_string()));
        let command = call.join(" ");
        lock(&self.calls).push(call);

        match lock(&self.replies).pop_front() {
            Some(Reply::Stdout(stdout)) => Ok(stdout),
            Some(Reply::Exit { code, stderr }) => Err(command_failure(&command, code, &stderr)),
            None => Err(command_failure(&command, 127, "no scripted reply")),
        }
    }
}

/// Hypervisor fake with scripted list and status results.
#[derive(Default)]
pub(crate) struct FakeHypervisor {
    lists: Mutex<VecDeque<Option<Vec<VmRecord>>>>,
    statuses: Mutex<VecDeque<Option<String>>>,
    fail_commands: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeHypervisor {
    /// Each `Some` list is returned in turn; `None` fails the list query.
    pub(crate) fn with_lists(lists: Vec<Option<Vec<VmRecord>>>) -> Self {
        Self {
            lists: Mutex::new(lists.into()),
            ..Self::default()
        }
    }

    /// Each `Some` output is returned in turn; `None` fails the status query.
    pub(crate) fn with_statuses(mut self, statuses: Vec<Option<&str>>) -> Self {
        self.statuses = Mutex::new(
            statuses
                .into_iter()
                .map(|status| status.map(str::to_string))
                .collect(),
        );
        self
    }

    /// Make start and stop commands fail.
    pub(crate) fn failing_commands(mut self) -> Self {
        self.fail_commands = true;
        self
    }

    /// Calls in order, e.g. `list`, `stop web1`, `status web1`.
    pub(crate) fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub(crate) fn status_calls(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.starts_with("status"))
            .count()
    }

    fn lifecycle(&self, verb: &str, name: &str) -> CoreResult<()> {
        let call = format!("{verb} {name}");
        lock(&self.calls).push(call.clone());
        if self.fail_commands {
            Err(command_failure(&call, 1, "command refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Hypervisor for FakeHypervisor {
    async fn list_all(&self) -> CoreResult<Vec<VmRecord>> {
        lock(&self.calls).push("list".to_string());
        match lock(&self.lists).pop_front() {
            Some(Some(vms)) => Ok(vms),
            _ => Err(command_failure("list", 1, "list failed")),
        }
    }

    async fn start_vm(&self, name: &str) -> CoreResult<()> {
        self.lifecycle("start", name)
    }

    async fn stop_vm(&self, name: &str) -> CoreResult<()> {
        self.lifecycle("stop", name)
    }

    async fn query_status(&self, name: &str) -> CoreResult<String> {
        let call = format!("status {name}");
        lock(&self.calls).push(call.clone());
        match lock(&self.statuses).pop_front() {
            Some(Some(output)) => Ok(output),
            Some(None) => Err(command_failure(&call, 255, "transient error")),
            // Past the script the VM never transitions.
            None => Ok(String::new()),
        }
    }
}

/// Display that records every model and icon it receives.
#[derive(Default)]
pub(crate) struct RecordingDisplay {
    shown: Mutex<Vec<MenuModel>>,
    icons: Mutex<Vec<String>>,
}

impl RecordingDisplay {
    pub(crate) fn shown(&self) -> Vec<MenuModel> {
        lock(&self.shown).clone()
    }

    pub(crate) fn icons(&self) -> Vec<String> {
        lock(&self.icons).clone()
    }
}

impl MenuDisplay for RecordingDisplay {
    fn show(&self, menu: MenuModel) -> CoreResult<()> {
        lock(&self.shown).push(menu);
        Ok(())
    }

    fn set_icon(&self, icon: &str) -> CoreResult<()> {
        lock(&self.icons).push(icon.to_string());
        Ok(())
    }
}

/// Sleeper that returns immediately and records requested pauses.
#[derive(Default)]
pub(crate) struct CountingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl CountingSleeper {
    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }
}

#[async_trait]
impl Sleeper for CountingSleeper {
    async fn sleep(&self, duration: Duration) {
        lock(&self.sleeps).push(duration);
    }
}
