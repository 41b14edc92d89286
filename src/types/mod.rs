pub(crate) mod export;
pub(crate) mod file_retention;
pub(crate) mod populate;
pub(crate) mod server_profile;
pub(crate) mod state;
pub(crate) mod support_data;
pub(crate) mod task;
pub(crate) mod task_type;
pub(crate) mod values;
