/// Timezone used by the rule compiler when neither the rule nor the settings name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Default safety ceiling on cursor steps for a single expansion.
pub const DEFAULT_MAX_ITERATIONS: u64 = 100_000;

/// Default `EnvFilter` directive for the binary.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Prefix for environment variable overrides, e.g. `CADENCE__LOGGING__LEVEL`.
pub const ENV_PREFIX: &str = "CADENCE";

/// Base name of the optional settings file (`cadence.toml`, `cadence.json`, ...).
pub const CONFIG_FILE_NAME: &str = "cadence";
