use crate::codec::TaskCodec;
use crate::entry::Entry;
use crate::schema::{self, TaskProperty};
use crate::types::export::ExportTask;
use crate::types::file_retention::FileRetentionTask;
use crate::types::populate::PopulateComposedAttributeValuesTask;
use crate::types::server_profile::GenerateServerProfileTask;
use crate::types::state::{FailedDependencyAction, TaskState};
use crate::types::support_data::CollectSupportDataTask;
use crate::types::task_type::TaskType;
use crate::types::values::PropertyValueMap;
use crate::{Result, util};

use chrono::{DateTime, Utc};

/// Scheduling, dependency, notification and alert settings shared by every task type.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskOptions {
    /// When the task should start. `None` means as soon as possible.
    pub scheduled_start_time: Option<DateTime<Utc>>,
    /// Ids of tasks that must complete first (order preserved).
    pub dependency_ids: Vec<String>,
    pub failed_dependency_action: Option<FailedDependencyAction>,
    pub notify_on_start: Vec<String>,
    pub notify_on_completion: Vec<String>,
    pub notify_on_success: Vec<String>,
    pub notify_on_error: Vec<String>,
    pub alert_on_start: Option<bool>,
    pub alert_on_success: Option<bool>,
    pub alert_on_error: Option<bool>,
}

impl TaskOptions {
    fn write_values(&self, values: &mut PropertyValueMap) {
        values.put_timestamp(&schema::SCHEDULED_START_TIME, self.scheduled_start_time);
        values.put_strings(&schema::DEPENDENCY_ID, &self.dependency_ids);
        values.put_string(
            &schema::FAILED_DEPENDENCY_ACTION,
            self.failed_dependency_action.map(FailedDependencyAction::as_str),
        );
        values.put_strings(&schema::NOTIFY_ON_START, &self.notify_on_start);
        values.put_strings(&schema::NOTIFY_ON_COMPLETION, &self.notify_on_completion);
        values.put_strings(&schema::NOTIFY_ON_SUCCESS, &self.notify_on_success);
        values.put_strings(&schema::NOTIFY_ON_ERROR, &self.notify_on_error);
        values.put_bool(&schema::ALERT_ON_START, self.alert_on_start);
        values.put_bool(&schema::ALERT_ON_SUCCESS, self.alert_on_success);
        values.put_bool(&schema::ALERT_ON_ERROR, self.alert_on_error);
    }

    fn read_values(values: &PropertyValueMap) -> Result<Self> {
        Ok(Self {
            scheduled_start_time: values.timestamp(&schema::SCHEDULED_START_TIME),
            dependency_ids: values.strings(&schema::DEPENDENCY_ID),
            failed_dependency_action: values.enumeration(&schema::FAILED_DEPENDENCY_ACTION)?,
            notify_on_start: values.strings(&schema::NOTIFY_ON_START),
            notify_on_completion: values.strings(&schema::NOTIFY_ON_COMPLETION),
            notify_on_success: values.strings(&schema::NOTIFY_ON_SUCCESS),
            notify_on_error: values.strings(&schema::NOTIFY_ON_ERROR),
            alert_on_start: values.boolean(&schema::ALERT_ON_START),
            alert_on_success: values.boolean(&schema::ALERT_ON_SUCCESS),
            alert_on_error: values.boolean(&schema::ALERT_ON_ERROR),
        })
    }

    fn normalized(mut self) -> Self {
        self.scheduled_start_time = self.scheduled_start_time.map(util::normalize_timestamp);
        self
    }
}

/// Conversion between a task type's own fields and its [`PropertyValueMap`] entries.
///
/// `read_values` receives values that already passed schema validation.
pub(crate) trait TaskPropertyCodec: Sized {
    fn write_values(&self, values: &mut PropertyValueMap);
    fn read_values(values: &PropertyValueMap) -> Result<Self>;

    /// Map field values that cannot be encoded to their decoded equivalent (e.g. `Some("")`
    /// to `None`).
    fn normalized(self) -> Self {
        self
    }
}

/// Type-specific part of a task.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskDetails {
    Export(ExportTask),
    PopulateComposedAttributeValues(PopulateComposedAttributeValuesTask),
    ReloadHttpConnectionHandlerCertificates,
    FileRetention(FileRetentionTask),
    CollectSupportData(CollectSupportDataTask),
    GenerateServerProfile(GenerateServerProfileTask),
}

impl TaskDetails {
    pub fn task_type(&self) -> TaskType {
        match self {
            TaskDetails::Export(_) => TaskType::Export,
            TaskDetails::PopulateComposedAttributeValues(_) => {
                TaskType::PopulateComposedAttributeValues
            }
            TaskDetails::ReloadHttpConnectionHandlerCertificates => {
                TaskType::ReloadHttpConnectionHandlerCertificates
            }
            TaskDetails::FileRetention(_) => TaskType::FileRetention,
            TaskDetails::CollectSupportData(_) => TaskType::CollectSupportData,
            TaskDetails::GenerateServerProfile(_) => TaskType::GenerateServerProfile,
        }
    }

    fn write_values(&self, values: &mut PropertyValueMap) {
        match self {
            TaskDetails::Export(t) => t.write_values(values),
            TaskDetails::PopulateComposedAttributeValues(t) => t.write_values(values),
            TaskDetails::ReloadHttpConnectionHandlerCertificates => {}
            TaskDetails::FileRetention(t) => t.write_values(values),
            TaskDetails::CollectSupportData(t) => t.write_values(values),
            TaskDetails::GenerateServerProfile(t) => t.write_values(values),
        }
    }

    fn normalized(self) -> Self {
        match self {
            TaskDetails::Export(t) => TaskDetails::Export(t.normalized()),
            TaskDetails::PopulateComposedAttributeValues(t) => {
                TaskDetails::PopulateComposedAttributeValues(t.normalized())
            }
            TaskDetails::ReloadHttpConnectionHandlerCertificates => {
                TaskDetails::ReloadHttpConnectionHandlerCertificates
            }
            TaskDetails::FileRetention(t) => TaskDetails::FileRetention(t.normalized()),
            TaskDetails::CollectSupportData(t) => TaskDetails::CollectSupportData(t.normalized()),
            TaskDetails::GenerateServerProfile(t) => {
                TaskDetails::GenerateServerProfile(t.normalized())
            }
        }
    }

    fn read_values(task_type: TaskType, values: &PropertyValueMap) -> Result<Self> {
        Ok(match task_type {
            TaskType::Export => TaskDetails::Export(ExportTask::read_values(values)?),
            TaskType::PopulateComposedAttributeValues => {
                TaskDetails::PopulateComposedAttributeValues(
                    PopulateComposedAttributeValuesTask::read_values(values)?,
                )
            }
            TaskType::ReloadHttpConnectionHandlerCertificates => {
                TaskDetails::ReloadHttpConnectionHandlerCertificates
            }
            TaskType::FileRetention => {
                TaskDetails::FileRetention(FileRetentionTask::read_values(values)?)
            }
            TaskType::CollectSupportData => {
                TaskDetails::CollectSupportData(CollectSupportDataTask::read_values(values)?)
            }
            TaskType::GenerateServerProfile => {
                TaskDetails::GenerateServerProfile(GenerateServerProfileTask::read_values(values)?)
            }
        })
    }
}

impl From<ExportTask> for TaskDetails {
    fn from(task: ExportTask) -> Self {
        TaskDetails::Export(task)
    }
}

impl From<PopulateComposedAttributeValuesTask> for TaskDetails {
    fn from(task: PopulateComposedAttributeValuesTask) -> Self {
        TaskDetails::PopulateComposedAttributeValues(task)
    }
}

impl From<FileRetentionTask> for TaskDetails {
    fn from(task: FileRetentionTask) -> Self {
        TaskDetails::FileRetention(task)
    }
}

impl From<CollectSupportDataTask> for TaskDetails {
    fn from(task: CollectSupportDataTask) -> Self {
        TaskDetails::CollectSupportData(task)
    }
}

impl From<GenerateServerProfileTask> for TaskDetails {
    fn from(task: GenerateServerProfileTask) -> Self {
        TaskDetails::GenerateServerProfile(task)
    }
}

/// Details observed by the server for a task that has been scheduled.
///
/// Only populated when a task is decoded from an entry.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct TaskStatus {
    pub(crate) state: Option<TaskState>,
    pub(crate) actual_start_time: Option<DateTime<Utc>>,
    pub(crate) actual_stop_time: Option<DateTime<Utc>>,
    pub(crate) log_messages: Vec<String>,
}

/// An administrative task: identity, shared scheduling options, and type-specific details.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    task_id: String,
    details: TaskDetails,
    options: TaskOptions,
    status: TaskStatus,
}

impl Task {
    /// Create a task with a random id and default options.
    pub fn new(details: impl Into<TaskDetails>) -> Self {
        Self::with_options(None, details, TaskOptions::default())
    }

    /// Create a task from explicit fields. A missing or empty id is replaced by a random one.
    ///
    /// Empty optional strings become `None` and timestamps are normalized, matching what a
    /// decode of the encoded entry yields.
    pub fn with_options(
        task_id: Option<String>,
        details: impl Into<TaskDetails>,
        options: TaskOptions,
    ) -> Self {
        let task_id = task_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(util::generate_task_id);
        let details: TaskDetails = details.into();
        Self {
            task_id,
            details: details.normalized(),
            options: options.normalized(),
            status: TaskStatus::default(),
        }
    }

    /// Rebuild a task from property values, applying the same validation as decoding.
    pub fn from_property_values(task_type: TaskType, values: &PropertyValueMap) -> Result<Self> {
        let validated = schema::validate(&task_type.properties(), values)?;
        Self::from_validated(task_type, &validated)
    }

    /// Decode a task entry using default codec options.
    pub fn from_entry(entry: &Entry) -> Result<Self> {
        TaskCodec::default().decode(entry)
    }

    /// Encode this task as an entry using default codec options.
    pub fn to_entry(&self) -> Entry {
        TaskCodec::default().encode(self)
    }

    pub(crate) fn from_validated(task_type: TaskType, values: &PropertyValueMap) -> Result<Self> {
        let task_id = values.string(&schema::TASK_ID).map(str::to_string);
        let options = TaskOptions::read_values(values)?;
        let details = TaskDetails::read_values(task_type, values)?;
        Ok(Self::with_options(task_id, details, options))
    }

    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(crate) fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Every common and type-specific property value, keyed by property.
    pub fn property_values(&self) -> PropertyValueMap {
        let mut values = PropertyValueMap::new();
        values.put_string(&schema::TASK_ID, Some(self.task_id.as_str()));
        self.options.write_values(&mut values);
        self.details.write_values(&mut values);
        values
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn task_type(&self) -> TaskType {
        self.details.task_type()
    }

    pub fn task_class_name(&self) -> &'static str {
        self.task_type().class_name()
    }

    /// Schema of this task's type.
    pub fn properties(&self) -> Vec<&'static TaskProperty> {
        self.task_type().properties()
    }

    pub fn details(&self) -> &TaskDetails {
        &self.details
    }

    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    /// Last observed state. `None` for a task that was not decoded from an entry.
    pub fn state(&self) -> Option<TaskState> {
        self.status.state
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_some_and(TaskState::is_pending)
    }

    pub fn is_running(&self) -> bool {
        self.state().is_some_and(TaskState::is_running)
    }

    pub fn is_completed(&self) -> bool {
        self.state().is_some_and(TaskState::is_completed)
    }

    pub fn scheduled_start_time(&self) -> Option<DateTime<Utc>> {
        self.options.scheduled_start_time
    }

    pub fn actual_start_time(&self) -> Option<DateTime<Utc>> {
        self.status.actual_start_time
    }

    pub fn actual_stop_time(&self) -> Option<DateTime<Utc>> {
        self.status.actual_stop_time
    }

    pub fn dependency_ids(&self) -> &[String] {
        &self.options.dependency_ids
    }

    pub fn failed_dependency_action(&self) -> Option<FailedDependencyAction> {
        self.options.failed_dependency_action
    }

    pub fn notify_on_start(&self) -> &[String] {
        &self.options.notify_on_start
    }

    pub fn notify_on_completion(&self) -> &[String] {
        &self.options.notify_on_completion
    }

    pub fn notify_on_success(&self) -> &[String] {
        &self.options.notify_on_success
    }

    pub fn notify_on_error(&self) -> &[String] {
        &self.options.notify_on_error
    }

    pub fn alert_on_start(&self) -> Option<bool> {
        self.options.alert_on_start
    }

    pub fn alert_on_success(&self) -> Option<bool> {
        self.options.alert_on_success
    }

    pub fn alert_on_error(&self) -> Option<bool> {
        self.options.alert_on_error
    }

    pub fn log_messages(&self) -> &[String] {
        &self.status.log_messages
    }
}
