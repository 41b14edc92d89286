use crate::schema::{DataType, TaskProperty};
use crate::types::task::TaskPropertyCodec;
use crate::types::values::PropertyValueMap;
use crate::Result;

pub(crate) static PROFILE_ROOT: TaskProperty = TaskProperty::new(
    "ds-task-generate-server-profile-root",
    "Profile Root",
    "Path of the directory or zip file the profile is written to.",
    DataType::String,
)
.required();

pub(crate) static INCLUDE_PATH: TaskProperty = TaskProperty::new(
    "ds-task-generate-server-profile-include-path",
    "Include Path",
    "Additional paths, relative to the server root, to include in the profile.",
    DataType::String,
)
.multi_valued();

pub(crate) static OVERWRITE_EXISTING: TaskProperty = TaskProperty::new(
    "ds-task-generate-server-profile-overwrite-existing",
    "Overwrite Existing",
    "Whether an existing profile at the profile root may be replaced.",
    DataType::Boolean,
);

pub(crate) static PROPERTIES: [&TaskProperty; 3] =
    [&PROFILE_ROOT, &INCLUDE_PATH, &OVERWRITE_EXISTING];

/// Generate a server profile.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerateServerProfileTask {
    pub profile_root: String,
    pub include_paths: Vec<String>,
    pub overwrite_existing: Option<bool>,
}

impl GenerateServerProfileTask {
    pub fn new(profile_root: impl Into<String>) -> Self {
        Self {
            profile_root: profile_root.into(),
            ..Self::default()
        }
    }
}

impl TaskPropertyCodec for GenerateServerProfileTask {
    fn write_values(&self, values: &mut PropertyValueMap) {
        values.put_string(&PROFILE_ROOT, Some(self.profile_root.as_str()));
        values.put_strings(&INCLUDE_PATH, &self.include_paths);
        values.put_bool(&OVERWRITE_EXISTING, self.overwrite_existing);
    }

    fn read_values(values: &PropertyValueMap) -> Result<Self> {
        Ok(Self {
            profile_root: values.required_string(&PROFILE_ROOT)?,
            include_paths: values.strings(&INCLUDE_PATH),
            overwrite_existing: values.boolean(&OVERWRITE_EXISTING),
        })
    }
}
