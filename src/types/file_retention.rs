use crate::schema::{DataType, TaskProperty};
use crate::symbolic::{NameTable, SymbolicName};
use crate::types::task::{Task, TaskDetails, TaskOptions, TaskPropertyCodec};
use crate::types::task_type::TaskType;
use crate::types::values::PropertyValueMap;
use crate::{Error, Result, util};

use chrono::{DateTime, Local, Utc};

use std::fmt;
use std::sync::LazyLock;

/// Timestamp embedded in the names of files managed by a file retention task.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum TimestampFormat {
    GeneralizedTimeUtcWithMilliseconds,
    GeneralizedTimeUtcWithSeconds,
    GeneralizedTimeUtcWithMinutes,
    LocalTimeWithMilliseconds,
    LocalTimeWithSeconds,
    LocalTimeWithMinutes,
}

impl TimestampFormat {
    pub const ALL: [TimestampFormat; 6] = [
        TimestampFormat::GeneralizedTimeUtcWithMilliseconds,
        TimestampFormat::GeneralizedTimeUtcWithSeconds,
        TimestampFormat::GeneralizedTimeUtcWithMinutes,
        TimestampFormat::LocalTimeWithMilliseconds,
        TimestampFormat::LocalTimeWithSeconds,
        TimestampFormat::LocalTimeWithMinutes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimestampFormat::GeneralizedTimeUtcWithMilliseconds => {
                "GENERALIZED_TIME_UTC_WITH_MILLISECONDS"
            }
            TimestampFormat::GeneralizedTimeUtcWithSeconds => "GENERALIZED_TIME_UTC_WITH_SECONDS",
            TimestampFormat::GeneralizedTimeUtcWithMinutes => "GENERALIZED_TIME_UTC_WITH_MINUTES",
            TimestampFormat::LocalTimeWithMilliseconds => "LOCAL_TIME_WITH_MILLISECONDS",
            TimestampFormat::LocalTimeWithSeconds => "LOCAL_TIME_WITH_SECONDS",
            TimestampFormat::LocalTimeWithMinutes => "LOCAL_TIME_WITH_MINUTES",
        }
    }

    /// Date pattern in the server's `SimpleDateFormat` notation.
    pub fn pattern(self) -> &'static str {
        match self {
            TimestampFormat::GeneralizedTimeUtcWithMilliseconds => "yyyyMMddHHmmss.SSS'Z'",
            TimestampFormat::GeneralizedTimeUtcWithSeconds => "yyyyMMddHHmmss'Z'",
            TimestampFormat::GeneralizedTimeUtcWithMinutes => "yyyyMMddHHmm'Z'",
            TimestampFormat::LocalTimeWithMilliseconds => "yyyyMMddHHmmss.SSS",
            TimestampFormat::LocalTimeWithSeconds => "yyyyMMddHHmmss",
            TimestampFormat::LocalTimeWithMinutes => "yyyyMMddHHmm",
        }
    }

    pub fn is_utc(self) -> bool {
        matches!(
            self,
            TimestampFormat::GeneralizedTimeUtcWithMilliseconds
                | TimestampFormat::GeneralizedTimeUtcWithSeconds
                | TimestampFormat::GeneralizedTimeUtcWithMinutes
        )
    }

    /// Render `t` the way it appears in file names.
    pub fn format(self, t: &DateTime<Utc>) -> String {
        let pattern = match self {
            TimestampFormat::GeneralizedTimeUtcWithMilliseconds => "%Y%m%d%H%M%S%.3fZ",
            TimestampFormat::GeneralizedTimeUtcWithSeconds => "%Y%m%d%H%M%SZ",
            TimestampFormat::GeneralizedTimeUtcWithMinutes => "%Y%m%d%H%MZ",
            TimestampFormat::LocalTimeWithMilliseconds => "%Y%m%d%H%M%S%.3f",
            TimestampFormat::LocalTimeWithSeconds => "%Y%m%d%H%M%S",
            TimestampFormat::LocalTimeWithMinutes => "%Y%m%d%H%M",
        };
        if self.is_utc() {
            t.format(pattern).to_string()
        } else {
            t.with_timezone(&Local).format(pattern).to_string()
        }
    }
}

impl SymbolicName for TimestampFormat {
    const ENUMERATION: &'static str = "TimestampFormat";

    fn values() -> &'static [Self] {
        &Self::ALL
    }

    fn identifier(self) -> &'static str {
        self.as_str()
    }

    fn display_name(self) -> &'static str {
        match self {
            TimestampFormat::GeneralizedTimeUtcWithMilliseconds => {
                "Generalized Time (UTC) with Milliseconds"
            }
            TimestampFormat::GeneralizedTimeUtcWithSeconds => "Generalized Time (UTC) with Seconds",
            TimestampFormat::GeneralizedTimeUtcWithMinutes => "Generalized Time (UTC) with Minutes",
            TimestampFormat::LocalTimeWithMilliseconds => "Local Time with Milliseconds",
            TimestampFormat::LocalTimeWithSeconds => "Local Time with Seconds",
            TimestampFormat::LocalTimeWithMinutes => "Local Time with Minutes",
        }
    }

    fn name_table() -> &'static NameTable<Self> {
        static TABLE: LazyLock<NameTable<TimestampFormat>> =
            LazyLock::new(|| NameTable::build(&TimestampFormat::ALL));
        &TABLE
    }
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const TIMESTAMP_FORMATS: &[&str] = &[
    "GENERALIZED_TIME_UTC_WITH_MILLISECONDS",
    "GENERALIZED_TIME_UTC_WITH_SECONDS",
    "GENERALIZED_TIME_UTC_WITH_MINUTES",
    "LOCAL_TIME_WITH_MILLISECONDS",
    "LOCAL_TIME_WITH_SECONDS",
    "LOCAL_TIME_WITH_MINUTES",
];

pub(crate) static TARGET_DIRECTORY: TaskProperty = TaskProperty::new(
    "ds-task-file-retention-target-directory",
    "Target Directory",
    "The directory containing the files to examine.",
    DataType::String,
)
.required();

pub(crate) static FILENAME_PATTERN: TaskProperty = TaskProperty::new(
    "ds-task-file-retention-filename-pattern",
    "Filename Pattern",
    "Pattern of the names of files to examine. `${timestamp}` marks the timestamp.",
    DataType::String,
)
.required();

pub(crate) static TIMESTAMP_FORMAT: TaskProperty = TaskProperty::new(
    "ds-task-file-retention-timestamp-format",
    "Timestamp Format",
    "Format of the timestamp embedded in matching file names.",
    DataType::String,
)
.required()
.allowed_values(TIMESTAMP_FORMATS);

pub(crate) static RETAIN_FILE_COUNT: TaskProperty = TaskProperty::new(
    "ds-task-file-retention-retain-file-count",
    "Retain File Count",
    "The minimum number of the newest matching files to keep.",
    DataType::Integer,
);

pub(crate) static RETAIN_FILE_AGE: TaskProperty = TaskProperty::new(
    "ds-task-file-retention-retain-file-age",
    "Retain File Age",
    "Files newer than this duration (e.g. `7 days`) are kept.",
    DataType::String,
);

pub(crate) static RETAIN_AGGREGATE_FILE_SIZE: TaskProperty = TaskProperty::new(
    "ds-task-file-retention-retain-aggregate-file-size-bytes",
    "Retain Aggregate File Size",
    "The newest files are kept while their combined size, in bytes, stays below this value.",
    DataType::Integer,
);

pub(crate) static PROPERTIES: [&TaskProperty; 6] = [
    &TARGET_DIRECTORY,
    &FILENAME_PATTERN,
    &TIMESTAMP_FORMAT,
    &RETAIN_FILE_COUNT,
    &RETAIN_FILE_AGE,
    &RETAIN_AGGREGATE_FILE_SIZE,
];

/// Delete files in a directory that fall outside a retention policy.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileRetentionTask {
    pub target_directory: String,
    pub filename_pattern: String,
    pub timestamp_format: TimestampFormat,
    pub retain_file_count: Option<i64>,
    pub retain_file_age: Option<String>,
    pub retain_aggregate_file_size_bytes: Option<i64>,
}

impl Default for FileRetentionTask {
    fn default() -> Self {
        Self {
            target_directory: String::new(),
            filename_pattern: String::new(),
            timestamp_format: TimestampFormat::GeneralizedTimeUtcWithMilliseconds,
            retain_file_count: None,
            retain_file_age: None,
            retain_aggregate_file_size_bytes: None,
        }
    }
}

impl TaskPropertyCodec for FileRetentionTask {
    fn write_values(&self, values: &mut PropertyValueMap) {
        values.put_string(&TARGET_DIRECTORY, Some(self.target_directory.as_str()));
        values.put_string(&FILENAME_PATTERN, Some(self.filename_pattern.as_str()));
        values.put_string(&TIMESTAMP_FORMAT, Some(self.timestamp_format.as_str()));
        values.put_integer(&RETAIN_FILE_COUNT, self.retain_file_count);
        values.put_string(&RETAIN_FILE_AGE, self.retain_file_age.as_deref());
        values.put_integer(&RETAIN_AGGREGATE_FILE_SIZE, self.retain_aggregate_file_size_bytes);
    }

    fn read_values(values: &PropertyValueMap) -> Result<Self> {
        let timestamp_format = values
            .enumeration(&TIMESTAMP_FORMAT)?
            .ok_or_else(|| Error::missing_required(TIMESTAMP_FORMAT.attribute_name()))?;
        Ok(Self {
            target_directory: values.required_string(&TARGET_DIRECTORY)?,
            filename_pattern: values.required_string(&FILENAME_PATTERN)?,
            timestamp_format,
            retain_file_count: values.integer(&RETAIN_FILE_COUNT),
            retain_file_age: values.string(&RETAIN_FILE_AGE).map(str::to_string),
            retain_aggregate_file_size_bytes: values.integer(&RETAIN_AGGREGATE_FILE_SIZE),
        })
    }

    fn normalized(mut self) -> Self {
        self.retain_file_age = util::non_empty(self.retain_file_age);
        self
    }
}

/// Mutable builder mirroring every field of a file retention task.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FileRetentionTaskProperties {
    task_id: Option<String>,
    options: TaskOptions,
    retention: FileRetentionTask,
}

impl FileRetentionTaskProperties {
    pub fn new(
        target_directory: impl Into<String>,
        filename_pattern: impl Into<String>,
        timestamp_format: TimestampFormat,
    ) -> Self {
        Self {
            retention: FileRetentionTask {
                target_directory: target_directory.into(),
                filename_pattern: filename_pattern.into(),
                timestamp_format,
                ..FileRetentionTask::default()
            },
            ..Self::default()
        }
    }

    /// Validate and build the task.
    pub fn into_task(self) -> Result<Task> {
        let task = Task::with_options(self.task_id, self.retention, self.options);
        Task::from_property_values(TaskType::FileRetention, &task.property_values())
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

    pub fn target_directory(&self) -> &str {
        &self.retention.target_directory
    }

    pub fn set_target_directory(&mut self, dir: impl Into<String>) {
        self.retention.target_directory = dir.into();
    }

    pub fn filename_pattern(&self) -> &str {
        &self.retention.filename_pattern
    }

    pub fn set_filename_pattern(&mut self, pattern: impl Into<String>) {
        self.retention.filename_pattern = pattern.into();
    }

    pub fn timestamp_format(&self) -> TimestampFormat {
        self.retention.timestamp_format
    }

    pub fn set_timestamp_format(&mut self, format: TimestampFormat) {
        self.retention.timestamp_format = format;
    }

    pub fn retain_file_count(&self) -> Option<i64> {
        self.retention.retain_file_count
    }

    pub fn set_retain_file_count(&mut self, count: Option<i64>) {
        self.retention.retain_file_count = count;
    }

    pub fn retain_file_age(&self) -> Option<&str> {
        self.retention.retain_file_age.as_deref()
    }

    pub fn set_retain_file_age(&mut self, age: Option<String>) {
        self.retention.retain_file_age = age;
    }

    pub fn retain_aggregate_file_size_bytes(&self) -> Option<i64> {
        self.retention.retain_aggregate_file_size_bytes
    }

    pub fn set_retain_aggregate_file_size_bytes(&mut self, bytes: Option<i64>) {
        self.retention.retain_aggregate_file_size_bytes = bytes;
    }
}

impl TryFrom<&Task> for FileRetentionTaskProperties {
    type Error = Error;

    fn try_from(task: &Task) -> Result<Self> {
        let TaskDetails::FileRetention(retention) = task.details() else {
            return Err(Error::invalid_input(format!(
                "expected a file retention task, got {}",
                task.task_type()
            )));
        };
        Ok(Self {
            task_id: Some(task.task_id().to_string()),
            options: task.options().clone(),
            retention: retention.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_format_names_resolve() {
        for format in TimestampFormat::ALL {
            let id = format.identifier();
            assert_eq!(TimestampFormat::for_name(id), Some(format));
            assert_eq!(TimestampFormat::for_name(&id.to_lowercase()), Some(format));
            assert_eq!(TimestampFormat::for_name(&id.replace('_', "-")), Some(format));
            assert_eq!(TimestampFormat::for_name(format.display_name()), Some(format));
        }
        assert_eq!(TimestampFormat::for_name("undefined"), None);
        NameTable::try_new(&TimestampFormat::ALL).expect("no collisions");
    }

    #[test]
    fn allowed_values_match_enumeration() {
        let ids: Vec<&str> = TimestampFormat::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(ids, TIMESTAMP_FORMATS);
    }

    #[test]
    fn utc_formats_render_generalized_time() {
        let t = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            TimestampFormat::GeneralizedTimeUtcWithMilliseconds.format(&t),
            "20260304050607.000Z"
        );
        assert_eq!(
            TimestampFormat::GeneralizedTimeUtcWithMinutes.format(&t),
            "202603040506Z"
        );
        assert_eq!(TimestampFormat::LocalTimeWithSeconds.format(&t).len(), 14);
    }

    #[test]
    fn lenient_timestamp_format_value_is_canonicalized() {
        let mut values = Task::new(FileRetentionTask {
            target_directory: "logs".to_string(),
            filename_pattern: "access.${timestamp}".to_string(),
            ..FileRetentionTask::default()
        })
        .property_values();
        values.put_string(&TIMESTAMP_FORMAT, Some("local-time-with-seconds"));

        let task = Task::from_property_values(TaskType::FileRetention, &values).expect("valid");
        let TaskDetails::FileRetention(retention) = task.details() else {
            panic!("unexpected details");
        };
        assert_eq!(retention.timestamp_format, TimestampFormat::LocalTimeWithSeconds);
    }

    #[test]
    fn holder_builds_task() {
        let mut props = FileRetentionTaskProperties::new(
            "logs",
            "access.${timestamp}",
            TimestampFormat::GeneralizedTimeUtcWithSeconds,
        );
        props.set_retain_file_count(Some(10));
        props.options_mut().notify_on_error = vec!["ops@example.com".to_string()];
        let task = props.into_task().expect("valid");
        assert_eq!(task.notify_on_error(), ["ops@example.com"]);
    }
}
