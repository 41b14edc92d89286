use crate::schema::{COMMON_PROPERTIES, TaskProperty};
use crate::types::{export, file_retention, populate, server_profile, support_data};

use std::fmt;

/// A registered kind of administrative task.
///
/// Each type is identified in entries by its class name (`ds-task-class-name`) and by a
/// type-specific object class carried alongside the generic `ds-task` object class.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskType {
    Export,
    PopulateComposedAttributeValues,
    ReloadHttpConnectionHandlerCertificates,
    FileRetention,
    CollectSupportData,
    GenerateServerProfile,
}

impl TaskType {
    pub const ALL: [TaskType; 6] = [
        TaskType::Export,
        TaskType::PopulateComposedAttributeValues,
        TaskType::ReloadHttpConnectionHandlerCertificates,
        TaskType::FileRetention,
        TaskType::CollectSupportData,
        TaskType::GenerateServerProfile,
    ];

    /// Fully-qualified class name stored in `ds-task-class-name`.
    pub fn class_name(self) -> &'static str {
        match self {
            TaskType::Export => "com.unboundid.directory.server.tasks.ExportTask",
            TaskType::PopulateComposedAttributeValues => {
                "com.unboundid.directory.server.tasks.PopulateComposedAttributeValuesTask"
            }
            TaskType::ReloadHttpConnectionHandlerCertificates => {
                "com.unboundid.directory.server.tasks.ReloadHTTPConnectionHandlerCertificatesTask"
            }
            TaskType::FileRetention => "com.unboundid.directory.server.tasks.FileRetentionTask",
            TaskType::CollectSupportData => {
                "com.unboundid.directory.server.tasks.CollectSupportDataTask"
            }
            TaskType::GenerateServerProfile => {
                "com.unboundid.directory.server.tasks.GenerateServerProfileTask"
            }
        }
    }

    /// Type-specific object class.
    pub fn object_class(self) -> &'static str {
        match self {
            TaskType::Export => "ds-task-export",
            TaskType::PopulateComposedAttributeValues => {
                "ds-task-populate-composed-attribute-values"
            }
            TaskType::ReloadHttpConnectionHandlerCertificates => {
                "ds-task-reload-http-connection-handler-certificates"
            }
            TaskType::FileRetention => "ds-task-file-retention",
            TaskType::CollectSupportData => "ds-task-collect-support-data",
            TaskType::GenerateServerProfile => "ds-task-generate-server-profile",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TaskType::Export => "Export",
            TaskType::PopulateComposedAttributeValues => "Populate Composed Attribute Values",
            TaskType::ReloadHttpConnectionHandlerCertificates => {
                "Reload HTTP Connection Handler Certificates"
            }
            TaskType::FileRetention => "File Retention",
            TaskType::CollectSupportData => "Collect Support Data",
            TaskType::GenerateServerProfile => "Generate Server Profile",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TaskType::Export => "Export the contents of a backend to LDIF.",
            TaskType::PopulateComposedAttributeValues => {
                "Generate values for composed attribute plugins in existing entries."
            }
            TaskType::ReloadHttpConnectionHandlerCertificates => {
                "Reload the certificates used by HTTP connection handlers."
            }
            TaskType::FileRetention => {
                "Remove files in a directory that fall outside a retention policy."
            }
            TaskType::CollectSupportData => {
                "Collect a support data archive with information about the server."
            }
            TaskType::GenerateServerProfile => {
                "Generate a server profile that can replicate the server's configuration."
            }
        }
    }

    /// Look up a registered type by class name (exact match).
    pub fn from_class_name(class_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.class_name() == class_name.trim())
    }

    /// Common properties followed by the type-specific ones, in display order.
    pub fn properties(self) -> Vec<&'static TaskProperty> {
        COMMON_PROPERTIES
            .iter()
            .chain(self.specific_properties())
            .copied()
            .collect()
    }

    /// Find a property of this type by attribute name (case-insensitive).
    pub fn property(self, attribute_name: &str) -> Option<&'static TaskProperty> {
        self.properties()
            .into_iter()
            .find(|p| p.attribute_name().eq_ignore_ascii_case(attribute_name))
    }

    pub(crate) fn specific_properties(self) -> &'static [&'static TaskProperty] {
        match self {
            TaskType::Export => &export::PROPERTIES,
            TaskType::PopulateComposedAttributeValues => &populate::PROPERTIES,
            TaskType::ReloadHttpConnectionHandlerCertificates => &[],
            TaskType::FileRetention => &file_retention::PROPERTIES,
            TaskType::CollectSupportData => &support_data::PROPERTIES,
            TaskType::GenerateServerProfile => &server_profile::PROPERTIES,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
