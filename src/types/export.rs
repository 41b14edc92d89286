use crate::schema::{DataType, TaskProperty};
use crate::types::task::{Task, TaskDetails, TaskOptions, TaskPropertyCodec};
use crate::types::task_type::TaskType;
use crate::types::values::PropertyValueMap;
use crate::{Error, Result, util};

pub(crate) static BACKEND_ID: TaskProperty = TaskProperty::new(
    "ds-task-export-backend-id",
    "Backend ID",
    "The backend ID of the backend to export.",
    DataType::String,
)
.required();

pub(crate) static LDIF_FILE: TaskProperty = TaskProperty::new(
    "ds-task-export-ldif-file",
    "LDIF File",
    "The path to the LDIF file to write.",
    DataType::String,
)
.required();

pub(crate) static APPEND_TO_LDIF: TaskProperty = TaskProperty::new(
    "ds-task-export-append-to-ldif",
    "Append to LDIF",
    "Whether to append to an existing LDIF file rather than overwrite it.",
    DataType::Boolean,
);

pub(crate) static INCLUDE_BRANCH: TaskProperty = TaskProperty::new(
    "ds-task-export-include-branch",
    "Include Branch",
    "Base DNs of branches to include in the export.",
    DataType::String,
)
.multi_valued();

pub(crate) static EXCLUDE_BRANCH: TaskProperty = TaskProperty::new(
    "ds-task-export-exclude-branch",
    "Exclude Branch",
    "Base DNs of branches to exclude from the export.",
    DataType::String,
)
.multi_valued();

pub(crate) static INCLUDE_FILTER: TaskProperty = TaskProperty::new(
    "ds-task-export-include-filter",
    "Include Filter",
    "Filters identifying entries to include in the export.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static EXCLUDE_FILTER: TaskProperty = TaskProperty::new(
    "ds-task-export-exclude-filter",
    "Exclude Filter",
    "Filters identifying entries to exclude from the export.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static INCLUDE_ATTRIBUTE: TaskProperty = TaskProperty::new(
    "ds-task-export-include-attribute",
    "Include Attribute",
    "Attributes to include in exported entries.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static EXCLUDE_ATTRIBUTE: TaskProperty = TaskProperty::new(
    "ds-task-export-exclude-attribute",
    "Exclude Attribute",
    "Attributes to exclude from exported entries.",
    DataType::String,
)
.multi_valued()
.advanced();

pub(crate) static WRAP_COLUMN: TaskProperty = TaskProperty::new(
    "ds-task-export-wrap-column",
    "Wrap Column",
    "The column at which long LDIF lines are wrapped.",
    DataType::Integer,
)
.advanced();

pub(crate) static COMPRESS_LDIF: TaskProperty = TaskProperty::new(
    "ds-task-export-compress-ldif",
    "Compress LDIF",
    "Whether to gzip-compress the LDIF file.",
    DataType::Boolean,
);

pub(crate) static ENCRYPT_LDIF: TaskProperty = TaskProperty::new(
    "ds-task-export-encrypt-ldif",
    "Encrypt LDIF",
    "Whether to encrypt the LDIF file.",
    DataType::Boolean,
);

pub(crate) static ENCRYPTION_PASSPHRASE_FILE: TaskProperty = TaskProperty::new(
    "ds-task-export-encryption-passphrase-file",
    "Encryption Passphrase File",
    "Path to a file containing the passphrase used to encrypt the LDIF file.",
    DataType::String,
)
.advanced();

pub(crate) static SIGN_HASH: TaskProperty = TaskProperty::new(
    "ds-task-export-sign-hash",
    "Sign Hash",
    "Whether to include a signed hash of the export contents.",
    DataType::Boolean,
)
.advanced();

pub(crate) static MAX_MEGABYTES_PER_SECOND: TaskProperty = TaskProperty::new(
    "ds-task-export-max-megabytes-per-second",
    "Maximum Megabytes per Second",
    "The maximum rate, in megabytes per second, at which LDIF data is written.",
    DataType::Integer,
)
.advanced();

pub(crate) static PROPERTIES: [&TaskProperty; 15] = [
    &BACKEND_ID,
    &LDIF_FILE,
    &APPEND_TO_LDIF,
    &INCLUDE_BRANCH,
    &EXCLUDE_BRANCH,
    &INCLUDE_FILTER,
    &EXCLUDE_FILTER,
    &INCLUDE_ATTRIBUTE,
    &EXCLUDE_ATTRIBUTE,
    &WRAP_COLUMN,
    &COMPRESS_LDIF,
    &ENCRYPT_LDIF,
    &ENCRYPTION_PASSPHRASE_FILE,
    &SIGN_HASH,
    &MAX_MEGABYTES_PER_SECOND,
];

/// Export the contents of a backend to an LDIF file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExportTask {
    pub backend_id: String,
    /// Path of the LDIF file, relative to the server root when not absolute.
    pub ldif_file: String,
    pub append_to_ldif: bool,
    pub include_branches: Vec<String>,
    pub exclude_branches: Vec<String>,
    pub include_filters: Vec<String>,
    pub exclude_filters: Vec<String>,
    pub include_attributes: Vec<String>,
    pub exclude_attributes: Vec<String>,
    /// `None` disables wrapping.
    pub wrap_column: Option<i64>,
    pub compress: bool,
    pub encrypt: bool,
    pub encryption_passphrase_file: Option<String>,
    pub sign: bool,
    pub max_megabytes_per_second: Option<i64>,
}

impl ExportTask {
    pub fn new(backend_id: impl Into<String>, ldif_file: impl Into<String>) -> Self {
        Self {
            backend_id: backend_id.into(),
            ldif_file: ldif_file.into(),
            ..Self::default()
        }
    }
}

impl TaskPropertyCodec for ExportTask {
    fn write_values(&self, values: &mut PropertyValueMap) {
        values.put_string(&BACKEND_ID, Some(self.backend_id.as_str()));
        values.put_string(&LDIF_FILE, Some(self.ldif_file.as_str()));
        values.put_bool(&APPEND_TO_LDIF, Some(self.append_to_ldif));
        values.put_strings(&INCLUDE_BRANCH, &self.include_branches);
        values.put_strings(&EXCLUDE_BRANCH, &self.exclude_branches);
        values.put_strings(&INCLUDE_FILTER, &self.include_filters);
        values.put_strings(&EXCLUDE_FILTER, &self.exclude_filters);
        values.put_strings(&INCLUDE_ATTRIBUTE, &self.include_attributes);
        values.put_strings(&EXCLUDE_ATTRIBUTE, &self.exclude_attributes);
        values.put_integer(&WRAP_COLUMN, self.wrap_column);
        values.put_bool(&COMPRESS_LDIF, Some(self.compress));
        values.put_bool(&ENCRYPT_LDIF, Some(self.encrypt));
        values.put_string(
            &ENCRYPTION_PASSPHRASE_FILE,
            self.encryption_passphrase_file.as_deref(),
        );
        values.put_bool(&SIGN_HASH, Some(self.sign));
        values.put_integer(&MAX_MEGABYTES_PER_SECOND, self.max_megabytes_per_second);
    }

    fn read_values(values: &PropertyValueMap) -> Result<Self> {
        Ok(Self {
            backend_id: values.required_string(&BACKEND_ID)?,
            ldif_file: values.required_string(&LDIF_FILE)?,
            append_to_ldif: values.boolean(&APPEND_TO_LDIF).unwrap_or(false),
            include_branches: values.strings(&INCLUDE_BRANCH),
            exclude_branches: values.strings(&EXCLUDE_BRANCH),
            include_filters: values.strings(&INCLUDE_FILTER),
            exclude_filters: values.strings(&EXCLUDE_FILTER),
            include_attributes: values.strings(&INCLUDE_ATTRIBUTE),
            exclude_attributes: values.strings(&EXCLUDE_ATTRIBUTE),
            wrap_column: values.integer(&WRAP_COLUMN),
            compress: values.boolean(&COMPRESS_LDIF).unwrap_or(false),
            encrypt: values.boolean(&ENCRYPT_LDIF).unwrap_or(false),
            encryption_passphrase_file: values
                .string(&ENCRYPTION_PASSPHRASE_FILE)
                .map(str::to_string),
            sign: values.boolean(&SIGN_HASH).unwrap_or(false),
            max_megabytes_per_second: values.integer(&MAX_MEGABYTES_PER_SECOND),
        })
    }

    fn normalized(mut self) -> Self {
        self.encryption_passphrase_file = util::non_empty(self.encryption_passphrase_file);
        self
    }
}

/// Mutable builder mirroring every field of an export task.
///
/// Not encoded directly; convert it with [`ExportTaskProperties::into_task`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExportTaskProperties {
    task_id: Option<String>,
    options: TaskOptions,
    export: ExportTask,
}

impl ExportTaskProperties {
    pub fn new(backend_id: impl Into<String>, ldif_file: impl Into<String>) -> Self {
        Self {
            export: ExportTask::new(backend_id, ldif_file),
            ..Self::default()
        }
    }

    /// Validate and build the task.
    pub fn into_task(self) -> Result<Task> {
        let task = Task::with_options(self.task_id, self.export, self.options);
        Task::from_property_values(TaskType::Export, &task.property_values())
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn set_task_id(&mut self, task_id: Option<String>) {
        self.task_id = task_id;
    }

    /// Scheduling, dependency, notification and alert settings.
    pub fn options(&self) -> &TaskOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TaskOptions {
        &mut self.options
    }

    pub fn backend_id(&self) -> &str {
        &self.export.backend_id
    }

    pub fn set_backend_id(&mut self, backend_id: impl Into<String>) {
        self.export.backend_id = backend_id.into();
    }

    pub fn ldif_file(&self) -> &str {
        &self.export.ldif_file
    }

    pub fn set_ldif_file(&mut self, ldif_file: impl Into<String>) {
        self.export.ldif_file = ldif_file.into();
    }

    pub fn append_to_ldif(&self) -> bool {
        self.export.append_to_ldif
    }

    pub fn set_append_to_ldif(&mut self, append: bool) {
        self.export.append_to_ldif = append;
    }

    pub fn include_branches(&self) -> &[String] {
        &self.export.include_branches
    }

    pub fn set_include_branches<I, S>(&mut self, branches: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export.include_branches = collect_strings(branches);
    }

    pub fn exclude_branches(&self) -> &[String] {
        &self.export.exclude_branches
    }

    pub fn set_exclude_branches<I, S>(&mut self, branches: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export.exclude_branches = collect_strings(branches);
    }

    pub fn include_filters(&self) -> &[String] {
        &self.export.include_filters
    }

    pub fn set_include_filters<I, S>(&mut self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export.include_filters = collect_strings(filters);
    }

    pub fn exclude_filters(&self) -> &[String] {
        &self.export.exclude_filters
    }

    pub fn set_exclude_filters<I, S>(&mut self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export.exclude_filters = collect_strings(filters);
    }

    pub fn include_attributes(&self) -> &[String] {
        &self.export.include_attributes
    }

    pub fn set_include_attributes<I, S>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export.include_attributes = collect_strings(attributes);
    }

    pub fn exclude_attributes(&self) -> &[String] {
        &self.export.exclude_attributes
    }

    pub fn set_exclude_attributes<I, S>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.export.exclude_attributes = collect_strings(attributes);
    }

    pub fn wrap_column(&self) -> Option<i64> {
        self.export.wrap_column
    }

    pub fn set_wrap_column(&mut self, wrap_column: Option<i64>) {
        self.export.wrap_column = wrap_column;
    }

    pub fn compress(&self) -> bool {
        self.export.compress
    }

    pub fn set_compress(&mut self, compress: bool) {
        self.export.compress = compress;
    }

    pub fn encrypt(&self) -> bool {
        self.export.encrypt
    }

    pub fn set_encrypt(&mut self, encrypt: bool) {
        self.export.encrypt = encrypt;
    }

    pub fn encryption_passphrase_file(&self) -> Option<&str> {
        self.export.encryption_passphrase_file.as_deref()
    }

    pub fn set_encryption_passphrase_file(&mut self, path: Option<String>) {
        self.export.encryption_passphrase_file = path;
    }

    pub fn sign(&self) -> bool {
        self.export.sign
    }

    pub fn set_sign(&mut self, sign: bool) {
        self.export.sign = sign;
    }

    pub fn max_megabytes_per_second(&self) -> Option<i64> {
        self.export.max_megabytes_per_second
    }

    pub fn set_max_megabytes_per_second(&mut self, rate: Option<i64>) {
        self.export.max_megabytes_per_second = rate;
    }
}

impl TryFrom<&Task> for ExportTaskProperties {
    type Error = Error;

    fn try_from(task: &Task) -> Result<Self> {
        let TaskDetails::Export(export) = task.details() else {
            return Err(Error::invalid_input(format!(
                "expected an export task, got {}",
                task.task_type()
            )));
        };
        Ok(Self {
            task_id: Some(task.task_id().to_string()),
            options: task.options().clone(),
            export: export.clone(),
        })
    }
}

pub(crate) fn collect_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
