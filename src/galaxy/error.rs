use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalaxyError {
    /// A parameter is outside the domain the generator accepts.
    #[error("invalid galaxy parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

impl GalaxyError {
    pub(crate) fn invalid(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidParameter { name, reason }
    }
}
