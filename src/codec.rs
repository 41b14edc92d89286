use crate::entry::{Entry, OBJECT_CLASS_ATTRIBUTE};
use crate::options::{TaskCodecOptions, UnknownAttributeMode};
use crate::schema::{self, TaskProperty};
use crate::symbolic::SymbolicName;
use crate::types::state::TaskState;
use crate::types::task::{Task, TaskStatus};
use crate::types::task_type::TaskType;
use crate::types::values::PropertyValueMap;
use crate::{Error, Result, util};

use chrono::{DateTime, Utc};

/// Non-fatal finding reported while decoding a task entry.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum DecodeWarning {
    /// The entry has an attribute that is neither structural nor a property of its task type.
    UnknownAttribute { name: String },
}

/// Converts tasks to and from directory entries.
///
/// Encoding and decoding are pure; a codec can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct TaskCodec {
    opts: TaskCodecOptions,
}

impl TaskCodec {
    pub fn new(opts: TaskCodecOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &TaskCodecOptions {
        &self.opts
    }

    /// DN of the entry for a task id.
    pub fn entry_dn(&self, task_id: &str) -> String {
        format!(
            "{}={},{}",
            schema::ATTR_TASK_ID,
            util::escape_rdn_value(task_id),
            self.opts.tasks_base_dn
        )
    }

    /// Encode a task. Unset optional properties are omitted; multi-valued order is preserved.
    pub fn encode(&self, task: &Task) -> Entry {
        let task_type = task.task_type();
        let mut entry = Entry::new(self.entry_dn(task.task_id()));
        entry.set_values(
            OBJECT_CLASS_ATTRIBUTE,
            ["top", schema::OC_TASK, task_type.object_class()],
        );
        entry.add_value(schema::ATTR_TASK_CLASS, task_type.class_name());
        schema::encode_values(&task_type.properties(), &task.property_values(), &mut entry);

        let status = task.status();
        if let Some(state) = status.state {
            entry.add_value(schema::ATTR_STATE, state.as_str());
        }
        if let Some(t) = &status.actual_start_time {
            entry.add_value(schema::ATTR_ACTUAL_START_TIME, util::encode_generalized_time(t));
        }
        if let Some(t) = &status.actual_stop_time {
            entry.add_value(schema::ATTR_COMPLETION_TIME, util::encode_generalized_time(t));
        }
        entry.set_values(schema::ATTR_LOG_MESSAGE, status.log_messages.iter().cloned());
        entry
    }

    /// Decode a task entry into its registered task type.
    pub fn decode(&self, entry: &Entry) -> Result<Task> {
        self.decode_with_warnings(entry).map(|(task, _)| task)
    }

    /// Decode a task entry, also returning non-fatal findings.
    ///
    /// Fails without producing a task if the entry is not a task entry, its type is not
    /// registered, a structural attribute is missing or unparsable, or a property violates
    /// the schema.
    pub fn decode_with_warnings(&self, entry: &Entry) -> Result<(Task, Vec<DecodeWarning>)> {
        let dn = entry.dn();
        if !entry.has_object_class(schema::OC_TASK) {
            return Err(Error::malformed(
                dn,
                format!("missing object class {}", schema::OC_TASK),
            ));
        }

        let task_type = resolve_task_type(entry)?;
        single_value(entry, schema::ATTR_TASK_ID)?;

        let properties = task_type.properties();
        let raw = schema::values_from_entry(&properties, entry)?;
        let values = schema::validate(&properties, &raw)?;
        let mut task = Task::from_validated(task_type, &values)?;
        task.set_status(decode_status(entry)?);

        let warnings = self.unknown_attributes(entry, &properties);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            task_id = %task.task_id(),
            task_type = %task_type,
            state = task.state().map(TaskState::as_str).unwrap_or(""),
            warnings = warnings.len(),
            "decoded task entry"
        );

        Ok((task, warnings))
    }

    /// Rebuild a task from property values (no entry involved).
    pub fn reconstruct(&self, task_type: TaskType, values: &PropertyValueMap) -> Result<Task> {
        Task::from_property_values(task_type, values)
    }

    fn unknown_attributes(
        &self,
        entry: &Entry,
        properties: &[&'static TaskProperty],
    ) -> Vec<DecodeWarning> {
        if self.opts.unknown_attributes == UnknownAttributeMode::Ignore {
            return Vec::new();
        }
        entry
            .attributes()
            .filter(|a| !schema::is_structural_attribute(&a.name))
            .filter(|a| {
                !properties
                    .iter()
                    .any(|p| p.attribute_name().eq_ignore_ascii_case(&a.name))
            })
            .map(|a| {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    dn = %entry.dn(),
                    attribute = %a.name,
                    "ignoring unknown task attribute"
                );
                DecodeWarning::UnknownAttribute {
                    name: a.name.clone(),
                }
            })
            .collect()
    }
}

/// Pick the registered type named by the class attribute, requiring its object class too.
fn resolve_task_type(entry: &Entry) -> Result<TaskType> {
    let class_name = single_value(entry, schema::ATTR_TASK_CLASS)?;
    match TaskType::from_class_name(class_name) {
        Some(t) if entry.has_object_class(t.object_class()) => Ok(t),
        _ => Err(Error::UnrecognizedTaskType {
            class_name: class_name.to_string(),
        }),
    }
}

fn single_value<'a>(entry: &'a Entry, attribute: &str) -> Result<&'a str> {
    match entry.values(attribute) {
        [] => Err(Error::malformed(entry.dn(), format!("missing {attribute}"))),
        [value] if value.trim().is_empty() => {
            Err(Error::malformed(entry.dn(), format!("empty {attribute}")))
        }
        [value] => Ok(value.as_str()),
        values => Err(Error::malformed(
            entry.dn(),
            format!("{attribute} has {} values", values.len()),
        )),
    }
}

fn decode_status(entry: &Entry) -> Result<TaskStatus> {
    let state = match entry.values(schema::ATTR_STATE) {
        [] => None,
        [value] => Some(
            TaskState::for_name(value.trim())
                .ok_or_else(|| Error::invalid_enumeration(schema::ATTR_STATE, value))?,
        ),
        values => {
            return Err(Error::malformed(
                entry.dn(),
                format!("{} has {} values", schema::ATTR_STATE, values.len()),
            ));
        }
    };
    Ok(TaskStatus {
        state,
        actual_start_time: decode_time(entry, schema::ATTR_ACTUAL_START_TIME)?,
        actual_stop_time: decode_time(entry, schema::ATTR_COMPLETION_TIME)?,
        log_messages: entry.values(schema::ATTR_LOG_MESSAGE).to_vec(),
    })
}

fn decode_time(entry: &Entry, attribute: &str) -> Result<Option<DateTime<Utc>>> {
    match entry.values(attribute) {
        [] => Ok(None),
        [value] => util::decode_generalized_time(value).map(Some).ok_or_else(|| {
            Error::malformed(entry.dn(), format!("unparsable {attribute}: {value:?}"))
        }),
        values => Err(Error::malformed(
            entry.dn(),
            format!("{attribute} has {} values", values.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::export::ExportTask;
    use crate::types::populate::PopulateComposedAttributeValuesTask;
    use crate::types::task::{TaskDetails, TaskOptions};

    fn export_task() -> Task {
        Task::with_options(
            Some("export-1".to_string()),
            ExportTask::new("userRoot", "userRoot.ldif"),
            TaskOptions::default(),
        )
    }

    #[test]
    fn encode_emits_discriminators_and_omits_unset_values() {
        let entry = export_task().to_entry();
        assert_eq!(entry.dn(), "ds-task-id=export-1,cn=Scheduled Tasks,cn=tasks");
        assert_eq!(entry.object_classes(), ["top", "ds-task", "ds-task-export"]);
        assert_eq!(
            entry.first_value("ds-task-class-name"),
            Some("com.unboundid.directory.server.tasks.ExportTask")
        );
        assert_eq!(entry.first_value("ds-task-id"), Some("export-1"));
        assert!(!entry.contains("ds-task-state"));
        assert!(!entry.contains("ds-task-dependency-id"));
        assert!(!entry.contains("ds-task-export-include-branch"));
        assert!(entry.attributes().all(|a| !a.values.is_empty()));
    }

    #[test]
    fn encode_is_deterministic() {
        let task = export_task();
        assert_eq!(task.to_entry(), task.to_entry());
    }

    #[test]
    fn decode_reads_server_maintained_status() {
        let mut entry = export_task().to_entry();
        entry.add_value("ds-task-state", "COMPLETED-SUCCESSFULLY");
        entry.add_value("ds-task-actual-start-time", "20261018010203Z");
        entry.add_value("ds-task-completion-time", "20261018010503.250Z");
        entry.add_value("ds-task-log-message", "[18/Oct/2026:01:02:03 +0000] started");
        entry.add_value("ds-task-log-message", "[18/Oct/2026:01:05:03 +0000] done");

        let task = Task::from_entry(&entry).expect("valid");
        assert_eq!(task.state(), Some(TaskState::CompletedSuccessfully));
        assert!(task.is_completed());
        assert_eq!(task.log_messages().len(), 2);
        assert!(task.actual_start_time() < task.actual_stop_time());

        let again = Task::from_entry(&task.to_entry()).expect("valid");
        assert_eq!(again, task);
    }

    #[test]
    fn decode_rejects_entries_without_generic_marker() {
        let mut entry = export_task().to_entry();
        entry.set_values(OBJECT_CLASS_ATTRIBUTE, ["top", "ds-task-export"]);
        let err = Task::from_entry(&entry).expect_err("must fail");
        let Error::MalformedTaskEntry { .. } = err else {
            panic!("unexpected error: {err:?}");
        };
    }

    #[test]
    fn decode_requires_type_marker_for_class() {
        let mut entry = export_task().to_entry();
        entry.set_values(
            OBJECT_CLASS_ATTRIBUTE,
            ["top", "ds-task", "ds-task-populate-composed-attribute-values"],
        );
        let err = Task::from_entry(&entry).expect_err("must fail");
        let Error::UnrecognizedTaskType { class_name } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(class_name, "com.unboundid.directory.server.tasks.ExportTask");
    }

    #[test]
    fn decode_rejects_unregistered_class() {
        let mut entry = export_task().to_entry();
        entry.set_values("ds-task-class-name", ["com.example.CustomTask"]);
        let err = Task::from_entry(&entry).expect_err("must fail");
        let Error::UnrecognizedTaskType { .. } = err else {
            panic!("unexpected error: {err:?}");
        };
    }

    #[test]
    fn decode_requires_task_id() {
        let mut entry = export_task().to_entry();
        entry.remove("ds-task-id");
        let err = Task::from_entry(&entry).expect_err("must fail");
        let Error::MalformedTaskEntry { context, .. } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert!(context.contains("ds-task-id"), "context={context}");
    }

    #[test]
    fn decode_fails_on_unparsable_structural_time() {
        let mut entry = export_task().to_entry();
        entry.add_value("ds-task-actual-start-time", "yesterday");
        let err = Task::from_entry(&entry).expect_err("must fail");
        let Error::MalformedTaskEntry { .. } = err else {
            panic!("unexpected error: {err:?}");
        };
    }

    #[test]
    fn decode_fails_on_unknown_state() {
        let mut entry = export_task().to_entry();
        entry.add_value("ds-task-state", "undefined");
        let err = Task::from_entry(&entry).expect_err("must fail");
        let Error::InvalidEnumerationValue { attribute, .. } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(attribute, "ds-task-state");
    }

    #[test]
    fn unknown_attributes_are_reported_not_fatal() {
        let mut entry = export_task().to_entry();
        entry.add_value("ds-task-future-setting", "x");

        let (task, warnings) = TaskCodec::default()
            .decode_with_warnings(&entry)
            .expect("valid");
        assert_eq!(task.task_id(), "export-1");
        assert_eq!(
            warnings,
            [DecodeWarning::UnknownAttribute {
                name: "ds-task-future-setting".to_string()
            }]
        );

        let mut opts = TaskCodecOptions::default();
        opts.unknown_attributes = UnknownAttributeMode::Ignore;
        let (_, warnings) = TaskCodec::new(opts)
            .decode_with_warnings(&entry)
            .expect("valid");
        assert!(warnings.is_empty());
    }

    #[test]
    fn custom_base_dn_and_escaped_id() {
        let mut opts = TaskCodecOptions::default();
        opts.tasks_base_dn = "cn=tasks,cn=config".to_string();
        let codec = TaskCodec::new(opts);
        let task = Task::with_options(
            Some("a,b".to_string()),
            PopulateComposedAttributeValuesTask::default(),
            TaskOptions::default(),
        );
        let entry = codec.encode(&task);
        assert_eq!(entry.dn(), "ds-task-id=a\\,b,cn=tasks,cn=config");
        assert_eq!(entry.first_value("ds-task-id"), Some("a,b"));

        let decoded = codec.decode(&entry).expect("valid");
        assert!(matches!(
            decoded.details(),
            TaskDetails::PopulateComposedAttributeValues(_)
        ));
    }
}
