//! Default configuration values

/// Prefix shared by every file mbuild writes into a working directory
pub const ARTIFACT_PREFIX: &str = "mbuild_";

/// Prefix of the per-run build root inside a package workspace
pub const BUILD_ROOT_PREFIX: &str = "rpmbuild_";

/// Suffix identifying source packages during directory scans
pub const SOURCE_PACKAGE_SUFFIX: &str = ".src.rpm";

/// Suffix of configuration overlay files picked up from the current directory
pub const CONFIG_FILE_SUFFIX: &str = ".mbuild";

/// Run timestamp format, fixed once per invocation
pub const STAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Build profile used by isolated builds when none is configured
pub const DEFAULT_MOCK_PROFILE: &str = "rocky-8-x86_64";

/// Group robot endpoint the batch summary is posted to
pub const WEBHOOK_ENDPOINT: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send";

/// Environment variable carrying the webhook key
pub const WEBHOOK_KEY_ENV: &str = "MBUILD_WEBHOOK_KEY";
