use crate::schema::{DataType, TaskProperty};
use crate::types::export::collect_strings;
use crate::types::task::{Task, TaskDetails, TaskOptions, TaskPropertyCodec};
use crate::types::task_type::TaskType;
use crate::types::values::PropertyValueMap;
use crate::{Error, Result};

pub(crate) static PLUGIN_CONFIG: TaskProperty = TaskProperty::new(
    "ds-task-populate-composed-attribute-plugin-config",
    "Plugin Config Name",
    "Names of the composed attribute plugin configurations to populate. All enabled composed \
     attribute plugins are used when omitted.",
    DataType::String,
)
.multi_valued();

pub(crate) static BACKEND_ID: TaskProperty = TaskProperty::new(
    "ds-task-populate-composed-attribute-backend-id",
    "Backend ID",
    "Backend IDs of the backends to process. Every backend that may hold entries in scope of the \
     plugins is used when omitted.",
    DataType::String,
)
.multi_valued();

pub(crate) static MAX_RATE_PER_SECOND: TaskProperty = TaskProperty::new(
    "ds-task-populate-composed-attribute-max-rate-per-second",
    "Maximum Rate per Second",
    "The maximum number of entries to update per second.",
    DataType::Integer,
);

pub(crate) static PROPERTIES: [&TaskProperty; 3] =
    [&PLUGIN_CONFIG, &BACKEND_ID, &MAX_RATE_PER_SECOND];

/// Generate values of composed attributes for entries that already exist.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulateComposedAttributeValuesTask {
    pub plugin_config_names: Vec<String>,
    pub backend_ids: Vec<String>,
    /// `None` means unthrottled.
    pub max_rate_per_second: Option<i64>,
}

impl TaskPropertyCodec for PopulateComposedAttributeValuesTask {
    fn write_values(&self, values: &mut PropertyValueMap) {
        values.put_strings(&PLUGIN_CONFIG, &self.plugin_config_names);
        values.put_strings(&BACKEND_ID, &self.backend_ids);
        values.put_integer(&MAX_RATE_PER_SECOND, self.max_rate_per_second);
    }

    fn read_values(values: &PropertyValueMap) -> Result<Self> {
        Ok(Self {
            plugin_config_names: values.strings(&PLUGIN_CONFIG),
            backend_ids: values.strings(&BACKEND_ID),
            max_rate_per_second: values.integer(&MAX_RATE_PER_SECOND),
        })
    }
}

/// Mutable builder mirroring every field of a populate composed attribute values task.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PopulateComposedAttributeValuesTaskProperties {
    task_id: Option<String>,
    options: TaskOptions,
    populate: PopulateComposedAttributeValuesTask,
}

impl PopulateComposedAttributeValuesTaskProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and build the task.
    pub fn into_task(self) -> Result<Task> {
        let task = Task::with_options(self.task_id, self.populate, self.options);
        Task::from_property_values(
            TaskType::PopulateComposedAttributeValues,
            &task.property_values(),
        )
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn set_task_id(&mut self, task_id: Option<String>) {
        self.task_id = task_id;
    }

    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TaskOptions {
        &mut self.options
    }

    pub fn plugin_config_names(&self) -> &[String] {
        &self.populate.plugin_config_names
    }

    pub fn set_plugin_config_names<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.populate.plugin_config_names = collect_strings(names);
    }

    pub fn backend_ids(&self) -> &[String] {
        &self.populate.backend_ids
    }

    pub fn set_backend_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.populate.backend_ids = collect_strings(ids);
    }

    pub fn max_rate_per_second(&self) -> Option<i64> {
        self.populate.max_rate_per_second
    }

    pub fn set_max_rate_per_second(&mut self, rate: Option<i64>) {
        self.populate.max_rate_per_second = rate;
    }
}

impl TryFrom<&Task> for PopulateComposedAttributeValuesTaskProperties {
    type Error = Error;

    fn try_from(task: &Task) -> Result<Self> {
        let TaskDetails::PopulateComposedAttributeValues(populate) = task.details() else {
            return Err(Error::invalid_input(format!(
                "expected a populate composed attribute values task, got {}",
                task.task_type()
            )));
        };
        Ok(Self {
            task_id: Some(task.task_id().to_string()),
            options: task.options().clone(),
            populate: populate.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_are_empty() {
        let props = PopulateComposedAttributeValuesTaskProperties::new();
        assert_eq!(props.task_id(), None);
        assert!(props.plugin_config_names().is_empty());
        assert!(props.backend_ids().is_empty());
        assert_eq!(props.max_rate_per_second(), None);

        let task = props.into_task().expect("no required properties");
        assert!(task.property_values().get(&PLUGIN_CONFIG).is_empty());
    }

    #[test]
    fn extracted_holder_round_trips() {
        let mut props = PopulateComposedAttributeValuesTaskProperties::new();
        props.set_task_id(Some("Populate Task".to_string()));
        props.set_plugin_config_names(["Composed cn", "Composed description"]);
        props.set_backend_ids(["userRoot", "people"]);
        props.set_max_rate_per_second(Some(1234));
        let task = props.clone().into_task().expect("valid");

        let extracted =
            PopulateComposedAttributeValuesTaskProperties::try_from(&task).expect("same type");
        assert_eq!(extracted, props);
    }
}
