//! Per-task-type property schema: typed, named, cardinality-constrained descriptors, and the
//! coercion/validation applied when an entry or a [`PropertyValueMap`] is turned into a task.

use crate::entry::Entry;
use crate::symbolic;
use crate::types::task_type::TaskType;
use crate::types::values::{PropertyValue, PropertyValueMap};
use crate::{Error, Result};

use std::fmt;

/// Value type of a task property.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DataType {
    String,
    Boolean,
    /// Generalized time, UTC.
    Timestamp,
    Integer,
    /// The id of another task.
    TaskReference,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Timestamp => "timestamp",
            DataType::Integer => "integer",
            DataType::TaskReference => "task reference",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable descriptor of one configuration property of a task type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TaskProperty {
    attribute_name: &'static str,
    display_name: &'static str,
    description: &'static str,
    data_type: DataType,
    required: bool,
    multi_valued: bool,
    advanced: bool,
    allowed_values: Option<&'static [&'static str]>,
}

impl TaskProperty {
    pub(crate) const fn new(
        attribute_name: &'static str,
        display_name: &'static str,
        description: &'static str,
        data_type: DataType,
    ) -> Self {
        Self {
            attribute_name,
            display_name,
            description,
            data_type,
            required: false,
            multi_valued: false,
            advanced: false,
            allowed_values: None,
        }
    }

    pub(crate) const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub(crate) const fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub(crate) const fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub(crate) const fn allowed_values(mut self, values: &'static [&'static str]) -> Self {
        self.allowed_values = Some(values);
        self
    }

    /// Attribute name used in task entries.
    pub fn attribute_name(&self) -> &'static str {
        self.attribute_name
    }

    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced
    }

    /// Closed set of allowed values, if any.
    pub fn allowed(&self) -> Option<&'static [&'static str]> {
        self.allowed_values
    }
}

pub(crate) const ATTR_TASK_ID: &str = "ds-task-id";
pub(crate) const ATTR_TASK_CLASS: &str = "ds-task-class-name";
pub(crate) const ATTR_STATE: &str = "ds-task-state";
pub(crate) const ATTR_ACTUAL_START_TIME: &str = "ds-task-actual-start-time";
pub(crate) const ATTR_COMPLETION_TIME: &str = "ds-task-completion-time";
pub(crate) const ATTR_LOG_MESSAGE: &str = "ds-task-log-message";

/// Generic object class carried by every task entry.
pub(crate) const OC_TASK: &str = "ds-task";

pub(crate) static TASK_ID: TaskProperty = TaskProperty::new(
    ATTR_TASK_ID,
    "Task ID",
    "The unique identifier for the task. A random one is generated when omitted.",
    DataType::String,
);

pub(crate) static SCHEDULED_START_TIME: TaskProperty = TaskProperty::new(
    "ds-task-scheduled-start-time",
    "Scheduled Start Time",
    "The time the task should start running. When omitted, it starts as soon as possible.",
    DataType::Timestamp,
);

pub(crate) static DEPENDENCY_ID: TaskProperty = TaskProperty::new(
    "ds-task-dependency-id",
    "Dependency ID",
    "The ids of tasks that must complete before this task may start.",
    DataType::TaskReference,
)
.multi_valued();

pub(crate) const FAILED_DEPENDENCY_ACTIONS: &[&str] = &["process", "cancel", "disable"];

pub(crate) static FAILED_DEPENDENCY_ACTION: TaskProperty = TaskProperty::new(
    "ds-task-failed-dependency-action",
    "Failed Dependency Action",
    "What to do if any dependency does not complete successfully.",
    DataType::String,
)
.allowed_values(FAILED_DEPENDENCY_ACTIONS);

pub(crate) static NOTIFY_ON_START: TaskProperty = TaskProperty::new(
    "ds-task-notify-on-start",
    "Start Notification Address",
    "Email addresses to notify when the task starts running.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static NOTIFY_ON_COMPLETION: TaskProperty = TaskProperty::new(
    "ds-task-notify-on-completion",
    "Completion Notification Address",
    "Email addresses to notify when the task completes, regardless of outcome.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static NOTIFY_ON_SUCCESS: TaskProperty = TaskProperty::new(
    "ds-task-notify-on-success",
    "Success Notification Address",
    "Email addresses to notify when the task completes successfully.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static NOTIFY_ON_ERROR: TaskProperty = TaskProperty::new(
    "ds-task-notify-on-error",
    "Error Notification Address",
    "Email addresses to notify when the task fails.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static ALERT_ON_START: TaskProperty = TaskProperty::new(
    "ds-task-alert-on-start",
    "Generate Alert on Start",
    "Whether the server generates an administrative alert when the task starts.",
    DataType::Boolean,
)
.advanced();

pub(crate) static ALERT_ON_SUCCESS: TaskProperty = TaskProperty::new(
    "ds-task-alert-on-success",
    "Generate Alert on Success",
    "Whether the server generates an administrative alert when the task succeeds.",
    DataType::Boolean,
)
.advanced();

pub(crate) static ALERT_ON_ERROR: TaskProperty = TaskProperty::new(
    "ds-task-alert-on-error",
    "Generate Alert on Error",
    "Whether the server generates an administrative alert when the task fails.",
    DataType::Boolean,
)
.advanced();

/// Properties shared by every task type, in display order.
pub(crate) static COMMON_PROPERTIES: [&TaskProperty; 11] = [
    &TASK_ID,
    &SCHEDULED_START_TIME,
    &DEPENDENCY_ID,
    &FAILED_DEPENDENCY_ACTION,
    &NOTIFY_ON_START,
    &NOTIFY_ON_COMPLETION,
    &NOTIFY_ON_SUCCESS,
    &NOTIFY_ON_ERROR,
    &ALERT_ON_START,
    &ALERT_ON_SUCCESS,
    &ALERT_ON_ERROR,
];

/// Common properties followed by the type-specific ones for a task class name.
///
/// Returns `None` when the class name is not registered.
pub fn properties_for(task_class_name: &str) -> Option<Vec<&'static TaskProperty>> {
    TaskType::from_class_name(task_class_name).map(TaskType::properties)
}

/// Returns true if the attribute is handled by the task codec itself rather than a property.
pub(crate) fn is_structural_attribute(name: &str) -> bool {
    [
        crate::entry::OBJECT_CLASS_ATTRIBUTE,
        ATTR_TASK_CLASS,
        ATTR_STATE,
        ATTR_ACTUAL_START_TIME,
        ATTR_COMPLETION_TIME,
        ATTR_LOG_MESSAGE,
    ]
    .iter()
    .any(|a| a.eq_ignore_ascii_case(name))
}

/// Coerce the raw string values of every schema property found in `entry`.
pub(crate) fn values_from_entry(
    properties: &[&'static TaskProperty],
    entry: &Entry,
) -> Result<PropertyValueMap> {
    let mut out = PropertyValueMap::new();
    for property in properties {
        let raw = entry.values(property.attribute_name);
        if raw.is_empty() {
            continue;
        }
        let values = raw
            .iter()
            .map(|v| PropertyValue::decode(property, v))
            .collect::<Result<Vec<_>>>()?;
        out.put(property, values);
    }
    Ok(out)
}

/// Check required presence, cardinality, value types, and allowed values.
///
/// Returns a copy restricted to the schema's properties, with closed-set values rewritten to
/// their canonical spelling.
pub(crate) fn validate(
    properties: &[&'static TaskProperty],
    values: &PropertyValueMap,
) -> Result<PropertyValueMap> {
    let mut out = PropertyValueMap::new();
    for property in properties {
        let current = values.get(property);
        if current.is_empty() {
            if property.required {
                return Err(Error::missing_required(property.attribute_name));
            }
            continue;
        }
        if !property.multi_valued && current.len() > 1 {
            return Err(Error::CardinalityViolation {
                attribute: property.attribute_name.to_string(),
                count: current.len(),
            });
        }

        let mut checked = Vec::with_capacity(current.len());
        for value in current {
            if !value.matches(property.data_type) {
                return Err(Error::coercion(property.attribute_name, value.encode()));
            }
            checked.push(canonicalize(property, value)?);
        }
        out.put(property, checked);
    }
    Ok(out)
}

/// Write every non-empty property value to `entry`, in schema order.
pub(crate) fn encode_values(
    properties: &[&'static TaskProperty],
    values: &PropertyValueMap,
    entry: &mut Entry,
) {
    for property in properties {
        let current = values.get(property);
        if current.is_empty() {
            continue;
        }
        entry.set_values(property.attribute_name, current.iter().map(PropertyValue::encode));
    }
}

fn canonicalize(property: &TaskProperty, value: &PropertyValue) -> Result<PropertyValue> {
    let Some(allowed) = property.allowed_values else {
        return Ok(value.clone());
    };
    let PropertyValue::String(raw) = value else {
        return Ok(value.clone());
    };
    allowed
        .iter()
        .find(|a| symbolic::names_match(raw, a))
        .map(|a| PropertyValue::String((*a).to_string()))
        .ok_or_else(|| Error::invalid_enumeration(property.attribute_name, raw))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::symbolic::SymbolicName;
    use crate::types::state::FailedDependencyAction;

    use std::collections::HashSet;

    #[test]
    fn attribute_names_are_unique_per_task_type() {
        for task_type in TaskType::ALL {
            let props = task_type.properties();
            let names: HashSet<String> = props
                .iter()
                .map(|p| p.attribute_name().to_ascii_lowercase())
                .collect();
            assert_eq!(names.len(), props.len(), "task_type={task_type:?}");
            for p in &props {
                assert!(!is_structural_attribute(p.attribute_name()));
            }
        }
    }

    #[test]
    fn properties_start_with_common_set_and_are_stable() {
        let class = TaskType::Export.class_name();
        let first = properties_for(class).expect("registered");
        let second = properties_for(class).expect("registered");
        assert_eq!(first, second);
        assert_eq!(first[0].attribute_name(), "ds-task-id");
        assert_eq!(first[..COMMON_PROPERTIES.len()], COMMON_PROPERTIES[..]);
        assert!(properties_for("com.example.NoSuchTask").is_none());
    }

    #[test]
    fn failed_dependency_allowed_values_match_enumeration() {
        let from_enum: Vec<&str> = FailedDependencyAction::ALL
            .iter()
            .map(|a| a.identifier())
            .collect();
        assert_eq!(from_enum, FAILED_DEPENDENCY_ACTIONS);
    }

    #[test]
    fn validate_rejects_missing_required_value() {
        let props = TaskType::Export.properties();
        let err = validate(&props, &PropertyValueMap::new()).expect_err("must fail");
        let Error::MissingRequiredProperty { attribute } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(attribute, "ds-task-export-backend-id");
    }

    #[test]
    fn validate_rejects_two_values_for_single_valued_property() {
        let epoch = chrono::DateTime::from_timestamp(0, 0).expect("epoch");
        let mut values = PropertyValueMap::new();
        values
            .set(
                &SCHEDULED_START_TIME,
                [PropertyValue::Timestamp(epoch), PropertyValue::Timestamp(epoch)],
            )
            .expect("types match");
        let err = validate(&COMMON_PROPERTIES, &values).expect_err("must fail");
        let Error::CardinalityViolation { attribute, count } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(attribute, "ds-task-scheduled-start-time");
        assert_eq!(count, 2);
    }

    #[test]
    fn validate_canonicalizes_and_rejects_closed_set_values() {
        let mut values = PropertyValueMap::new();
        values
            .set(&FAILED_DEPENDENCY_ACTION, [PropertyValue::from("CANCEL")])
            .expect("types match");
        let out = validate(&COMMON_PROPERTIES, &values).expect("valid");
        assert_eq!(out.string(&FAILED_DEPENDENCY_ACTION), Some("cancel"));

        values
            .set(&FAILED_DEPENDENCY_ACTION, [PropertyValue::from("retry")])
            .expect("types match");
        let err = validate(&COMMON_PROPERTIES, &values).expect_err("must fail");
        let Error::InvalidEnumerationValue { attribute, value } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(attribute, "ds-task-failed-dependency-action");
        assert_eq!(value, "retry");
    }

    #[test]
    fn entry_values_that_do_not_coerce_are_reported() {
        let mut entry = Entry::new("cn=x");
        entry.add_value("ds-task-alert-on-start", "maybe");
        let err = values_from_entry(&COMMON_PROPERTIES, &entry).expect_err("must fail");
        let Error::TypeCoercionFailure { attribute, value } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(attribute, "ds-task-alert-on-start");
        assert_eq!(value, "maybe");
    }
}
