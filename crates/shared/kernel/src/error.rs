use std::borrow::Cow;

/// Errors raised while loading or validating the device configuration.
///
/// All of them are fatal at startup.
#[gauge_derive::gauge_error]
pub enum ConfigError {
    /// A required key is absent from every source.
    #[error("Missing required field `{field}`{}", format_context(.context))]
    MissingField { field: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A key is present but fails type or format validation.
    #[error("Invalid value for `{field}`{}: {reason}", format_context(.context))]
    InvalidValue {
        field: Cow<'static, str>,
        reason: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// The source could not be found, read or parsed as a document.
    #[error("Config source error{}: {source}", format_context(.context))]
    Source { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("TOML rendering error{}: {source}", format_context(.context))]
    Render { source: toml::ser::Error, context: Option<Cow<'static, str>> },
}

impl ConfigError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::MissingField { field: Cow::Borrowed(field), context: None }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidValue { field: Cow::Borrowed(field), reason: reason.into(), context: None }
    }

    /// Name of the offending field for validation errors.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidValue { field, .. } => Some(&**field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_is_exposed_for_validation_errors() {
        assert_eq!(ConfigError::missing("user_id").field(), Some("user_id"));
        assert_eq!(ConfigError::invalid("mqtt_port", "too big").field(), Some("mqtt_port"));

        let io = ConfigError::from(std::io::Error::other("boom"));
        assert_eq!(io.field(), None);
    }

    #[test]
    fn messages_name_the_field() {
        let err: Result<(), _> = Err(ConfigError::invalid("mqtt_port", "out of range"));
        let err = err.context("device.toml").expect_err("error");
        assert_eq!(err.to_string(), "Invalid value for `mqtt_port` (device.toml): out of range");
        assert_eq!(
            ConfigError::missing("api_access_token").to_string(),
            "Missing required field `api_access_token`"
        );
    }
}
