/// How attributes that belong to no known property are treated while decoding.
///
/// Unknown attributes are never fatal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum UnknownAttributeMode {
    /// Skip them silently.
    Ignore,
    /// Report them as [`DecodeWarning::UnknownAttribute`](crate::DecodeWarning) (and log them
    /// with feature=`tracing`).
    #[default]
    Warn,
}

/// Configuration options for `TaskCodec`.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct TaskCodecOptions {
    /// Parent DN of encoded task entries.
    ///
    /// Default: `cn=Scheduled Tasks,cn=tasks`.
    pub tasks_base_dn: String,

    /// Treatment of unknown attributes when decoding.
    pub unknown_attributes: UnknownAttributeMode,
}

impl Default for TaskCodecOptions {
    fn default() -> Self {
        Self {
            tasks_base_dn: "cn=Scheduled Tasks,cn=tasks".to_string(),
            unknown_attributes: UnknownAttributeMode::Warn,
        }
    }
}
