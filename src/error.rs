//! Simulation error types.
//!
//! Nothing inside a tick can fail: exhausted pools, stale entity references and
//! missing effects degrade silently. Errors only surface at entry points that
//! take external input (upgrade selection, preset names, config files), where
//! the caller can report them and carry on.

use thiserror::Error;

/// Top-level error enum for the simulation core.
#[derive(Debug, Error)]
pub enum SimError {
    /// An upgrade or relic id that is not in the catalog.
    #[error("unknown upgrade `{0}`")]
    UnknownUpgrade(String),

    /// The id exists but was not among the choices currently on offer.
    #[error("upgrade `{0}` is not among the offered choices")]
    UpgradeNotOffered(String),

    /// A selection call arrived while no prompt was open.
    #[error("no upgrade or relic selection is pending")]
    NoPendingSelection,

    /// A stress preset name that does not match any preset.
    #[error("unknown stress preset `{0}`")]
    UnknownPreset(String),

    /// A tuning value is outside its valid range.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = SimError::UnknownUpgrade("laser_eyes".into());
        assert_eq!(err.to_string(), "unknown upgrade `laser_eyes`");

        let err = SimError::InvalidConfig {
            field: "weapons.blaster.interval_secs",
            reason: "must be positive",
        };
        assert!(err.to_string().contains("weapons.blaster.interval_secs"));
    }

    #[test]
    fn json_errors_convert() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: SimError = parse.unwrap_err().into();
        assert!(matches!(err, SimError::Parse(_)));
    }
}
