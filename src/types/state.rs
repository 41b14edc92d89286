use crate::symbolic::{NameTable, SymbolicName};

use std::fmt;
use std::sync::LazyLock;

/// Lifecycle state of a task as last observed in its entry (`ds-task-state`).
///
/// Transitions are driven by the server; this type only classifies a snapshot. Every state is in
/// exactly one of pending, running, or completed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TaskState {
    Unscheduled,
    Disabled,
    WaitingOnDependency,
    WaitingOnStartTime,
    Running,
    CompletedSuccessfully,
    CompletedWithErrors,
    StoppedByAdministrator,
    StoppedByError,
    StoppedByShutdown,
    CanceledBeforeStarting,
}

impl TaskState {
    pub const ALL: [TaskState; 11] = [
        TaskState::Unscheduled,
        TaskState::Disabled,
        TaskState::WaitingOnDependency,
        TaskState::WaitingOnStartTime,
        TaskState::Running,
        TaskState::CompletedSuccessfully,
        TaskState::CompletedWithErrors,
        TaskState::StoppedByAdministrator,
        TaskState::StoppedByError,
        TaskState::StoppedByShutdown,
        TaskState::CanceledBeforeStarting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskState::Unscheduled => "unscheduled",
            TaskState::Disabled => "disabled",
            TaskState::WaitingOnDependency => "waiting_on_dependency",
            TaskState::WaitingOnStartTime => "waiting_on_start_time",
            TaskState::Running => "running",
            TaskState::CompletedSuccessfully => "completed_successfully",
            TaskState::CompletedWithErrors => "completed_with_errors",
            TaskState::StoppedByAdministrator => "stopped_by_administrator",
            TaskState::StoppedByError => "stopped_by_error",
            TaskState::StoppedByShutdown => "stopped_by_shutdown",
            TaskState::CanceledBeforeStarting => "canceled_before_starting",
        }
    }

    /// Not started yet (unscheduled, disabled, or waiting on a dependency or start time).
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            TaskState::Unscheduled
                | TaskState::Disabled
                | TaskState::WaitingOnDependency
                | TaskState::WaitingOnStartTime
        )
    }

    pub fn is_running(self) -> bool {
        self == TaskState::Running
    }

    /// Finished, whether successfully, with errors, stopped, or canceled before starting.
    pub fn is_completed(self) -> bool {
        matches!(
            self,
            TaskState::CanceledBeforeStarting
                | TaskState::CompletedSuccessfully
                | TaskState::CompletedWithErrors
                | TaskState::StoppedByAdministrator
                | TaskState::StoppedByError
                | TaskState::StoppedByShutdown
        )
    }
}

impl SymbolicName for TaskState {
    const ENUMERATION: &'static str = "TaskState";

    fn values() -> &'static [Self] {
        &Self::ALL
    }

    fn identifier(self) -> &'static str {
        self.as_str()
    }

    fn display_name(self) -> &'static str {
        match self {
            TaskState::Unscheduled => "Unscheduled",
            TaskState::Disabled => "Disabled",
            TaskState::WaitingOnDependency => "Waiting on Dependency",
            TaskState::WaitingOnStartTime => "Waiting on Start Time",
            TaskState::Running => "Running",
            TaskState::CompletedSuccessfully => "Completed Successfully",
            TaskState::CompletedWithErrors => "Completed with Errors",
            TaskState::StoppedByAdministrator => "Stopped by Administrator",
            TaskState::StoppedByError => "Stopped by Error",
            TaskState::StoppedByShutdown => "Stopped by Shutdown",
            TaskState::CanceledBeforeStarting => "Canceled before Starting",
        }
    }

    fn name_table() -> &'static NameTable<Self> {
        static TABLE: LazyLock<NameTable<TaskState>> =
            LazyLock::new(|| NameTable::build(&TaskState::ALL));
        &TABLE
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the server does with a task when one of its dependencies did not complete successfully
/// (`ds-task-failed-dependency-action`).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailedDependencyAction {
    /// Run the task anyway.
    Process,
    /// Cancel the task.
    Cancel,
    /// Disable the task so it can be re-enabled manually.
    Disable,
}

impl FailedDependencyAction {
    pub const ALL: [FailedDependencyAction; 3] = [
        FailedDependencyAction::Process,
        FailedDependencyAction::Cancel,
        FailedDependencyAction::Disable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FailedDependencyAction::Process => "process",
            FailedDependencyAction::Cancel => "cancel",
            FailedDependencyAction::Disable => "disable",
        }
    }
}

impl SymbolicName for FailedDependencyAction {
    const ENUMERATION: &'static str = "FailedDependencyAction";

    fn values() -> &'static [Self] {
        &Self::ALL
    }

    fn identifier(self) -> &'static str {
        self.as_str()
    }

    fn name_table() -> &'static NameTable<Self> {
        static TABLE: LazyLock<NameTable<FailedDependencyAction>> =
            LazyLock::new(|| NameTable::build(&FailedDependencyAction::ALL));
        &TABLE
    }
}

impl fmt::Display for FailedDependencyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn classification_partitions_all_states() {
        for state in TaskState::ALL {
            let classes = [state.is_pending(), state.is_running(), state.is_completed()];
            assert_eq!(
                classes.iter().filter(|c| **c).count(),
                1,
                "state={state}"
            );
            assert_eq!(state.is_running(), state == TaskState::Running);
        }
    }

    #[test]
    fn state_names_resolve_in_every_spelling() {
        for state in TaskState::ALL {
            let id = state.identifier();
            assert_eq!(TaskState::for_name(id), Some(state));
            assert_eq!(TaskState::for_name(&id.to_lowercase()), Some(state));
            assert_eq!(TaskState::for_name(&id.to_uppercase()), Some(state));
            assert_eq!(TaskState::for_name(&id.replace('_', "-")), Some(state));
            assert_eq!(TaskState::for_name(&id.replace('_', "")), Some(state));
            assert_eq!(TaskState::for_name(state.display_name()), Some(state));
            assert_eq!(TaskState::from_identifier(id).unwrap(), state);
        }
        assert_eq!(TaskState::for_name("undefined"), None);
    }

    #[test]
    fn failed_dependency_action_resolves() {
        for action in FailedDependencyAction::ALL {
            assert_eq!(
                FailedDependencyAction::for_name(&action.as_str().to_uppercase()),
                Some(action)
            );
        }
        assert_eq!(FailedDependencyAction::for_name("undefined"), None);
    }

    #[test]
    fn name_tables_have_no_collisions() {
        NameTable::try_new(&TaskState::ALL).expect("task state names are unique");
        NameTable::try_new(&FailedDependencyAction::ALL).expect("action names are unique");
    }
}
