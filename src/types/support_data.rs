use crate::schema::{DataType, TaskProperty};
use crate::symbolic::{NameTable, SymbolicName};
use crate::types::task::TaskPropertyCodec;
use crate::types::values::PropertyValueMap;
use crate::{Result, util};

use std::fmt;
use std::sync::LazyLock;

/// How much potentially sensitive information a support data archive may contain.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SecurityLevel {
    /// Include everything as-is.
    None,
    /// Obscure secrets (passwords, keys, PINs) but keep other content.
    #[default]
    ObscureSecrets,
    /// Also redact personal data such as entry DNs and attribute values.
    Maximum,
}

impl SecurityLevel {
    pub const ALL: [SecurityLevel; 3] = [
        SecurityLevel::None,
        SecurityLevel::ObscureSecrets,
        SecurityLevel::Maximum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SecurityLevel::None => "none",
            SecurityLevel::ObscureSecrets => "obscure-secrets",
            SecurityLevel::Maximum => "maximum",
        }
    }
}

impl SymbolicName for SecurityLevel {
    const ENUMERATION: &'static str = "SecurityLevel";

    fn values() -> &'static [Self] {
        &Self::ALL
    }

    fn identifier(self) -> &'static str {
        self.as_str()
    }

    fn display_name(self) -> &'static str {
        match self {
            SecurityLevel::None => "No Redaction",
            SecurityLevel::ObscureSecrets => "Obscure Secrets",
            SecurityLevel::Maximum => "Maximum Redaction",
        }
    }

    fn name_table() -> &'static NameTable<Self> {
        static TABLE: LazyLock<NameTable<SecurityLevel>> =
            LazyLock::new(|| NameTable::build(&SecurityLevel::ALL));
        &TABLE
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const SECURITY_LEVELS: &[&str] = &["none", "obscure-secrets", "maximum"];

pub(crate) static OUTPUT_PATH: TaskProperty = TaskProperty::new(
    "ds-task-collect-support-data-output-path",
    "Output Path",
    "Path of the archive to write, or of the directory to write it in.",
    DataType::String,
);

pub(crate) static SECURITY_LEVEL: TaskProperty = TaskProperty::new(
    "ds-task-collect-support-data-security-level",
    "Security Level",
    "How much potentially sensitive information the archive may contain.",
    DataType::String,
)
.allowed_values(SECURITY_LEVELS);

pub(crate) static INCLUDE_EXPENSIVE_DATA: TaskProperty = TaskProperty::new(
    "ds-task-collect-support-data-include-expensive-data",
    "Include Expensive Data",
    "Whether to collect data that may take a long time or affect server performance.",
    DataType::Boolean,
);

pub(crate) static INCLUDE_REPLICATION_STATE_DUMP: TaskProperty = TaskProperty::new(
    "ds-task-collect-support-data-include-replication-state-dump",
    "Include Replication State Dump",
    "Whether to include a dump of the replication state.",
    DataType::Boolean,
)
.advanced();

pub(crate) static INCLUDE_BINARY_FILES: TaskProperty = TaskProperty::new(
    "ds-task-collect-support-data-include-binary-files",
    "Include Binary Files",
    "Whether to include binary files from the server root.",
    DataType::Boolean,
)
.advanced();

pub(crate) static COMMENT: TaskProperty = TaskProperty::new(
    "ds-task-collect-support-data-comment",
    "Comment",
    "A comment to include in the archive.",
    DataType::String,
);

pub(crate) static PROPERTIES: [&TaskProperty; 6] = [
    &OUTPUT_PATH,
    &SECURITY_LEVEL,
    &INCLUDE_EXPENSIVE_DATA,
    &INCLUDE_REPLICATION_STATE_DUMP,
    &INCLUDE_BINARY_FILES,
    &COMMENT,
];

/// Collect a support data archive.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectSupportDataTask {
    pub output_path: Option<String>,
    pub security_level: Option<SecurityLevel>,
    pub include_expensive_data: Option<bool>,
    pub include_replication_state_dump: Option<bool>,
    pub include_binary_files: Option<bool>,
    pub comment: Option<String>,
}

impl TaskPropertyCodec for CollectSupportDataTask {
    fn write_values(&self, values: &mut PropertyValueMap) {
        values.put_string(&OUTPUT_PATH, self.output_path.as_deref());
        values.put_string(&SECURITY_LEVEL, self.security_level.map(SecurityLevel::as_str));
        values.put_bool(&INCLUDE_EXPENSIVE_DATA, self.include_expensive_data);
        values.put_bool(
            &INCLUDE_REPLICATION_STATE_DUMP,
            self.include_replication_state_dump,
        );
        values.put_bool(&INCLUDE_BINARY_FILES, self.include_binary_files);
        values.put_string(&COMMENT, self.comment.as_deref());
    }

    fn read_values(values: &PropertyValueMap) -> Result<Self> {
        Ok(Self {
            output_path: values.string(&OUTPUT_PATH).map(str::to_string),
            security_level: values.enumeration(&SECURITY_LEVEL)?,
            include_expensive_data: values.boolean(&INCLUDE_EXPENSIVE_DATA),
            include_replication_state_dump: values.boolean(&INCLUDE_REPLICATION_STATE_DUMP),
            include_binary_files: values.boolean(&INCLUDE_BINARY_FILES),
            comment: values.string(&COMMENT).map(str::to_string),
        })
    }

    fn normalized(mut self) -> Self {
        self.output_path = util::non_empty(self.output_path);
        self.comment = util::non_empty(self.comment);
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn security_level_names_resolve() {
        for level in SecurityLevel::ALL {
            let id = level.identifier();
            assert_eq!(SecurityLevel::for_name(id), Some(level));
            assert_eq!(SecurityLevel::for_name(&id.to_lowercase()), Some(level));
            assert_eq!(SecurityLevel::for_name(&id.to_uppercase()), Some(level));
            assert_eq!(SecurityLevel::for_name(&id.replace('-', "_")), Some(level));
            assert_eq!(SecurityLevel::for_name(level.display_name()), Some(level));
        }
        assert_eq!(
            SecurityLevel::for_name("OBSCURESECRETS"),
            Some(SecurityLevel::ObscureSecrets)
        );
        assert_eq!(SecurityLevel::for_name("undefined"), None);
        NameTable::try_new(&SecurityLevel::ALL).expect("no collisions");
    }

    #[test]
    fn allowed_values_match_enumeration() {
        let ids: Vec<&str> = SecurityLevel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(ids, SECURITY_LEVELS);
    }
}
