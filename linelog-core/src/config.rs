use std::sync::LazyLock;

use derive_from_env::FromEnv;

/// Process configuration read from `LINELOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "LINELOG")]
#[allow(non_snake_case)]
pub struct LinelogConfig {
    /// Verbosity override, ignored when negative.
    #[from_env(default = "-1")]
    pub V: i64,
    /// Handler kind created by `initialize`.
    #[from_env(default = "threaded")]
    pub HANDLER: String,
}

impl Default for LinelogConfig {
    fn default() -> Self {
        Self {
            V: -1,
            HANDLER: "threaded".into(),
        }
    }
}

impl LinelogConfig {
    pub fn verbosity(&self) -> Option<u32> {
        verbosity_override(self.V)
    }
}

/// Read once; a malformed variable falls back to the defaults.
pub static LINELOG_CONFIG: LazyLock<LinelogConfig> =
    LazyLock::new(|| LinelogConfig::from_env().unwrap_or_default());

/// Only non-negative values override the configured verbosity.
pub fn verbosity_override(raw: i64) -> Option<u32> {
    u32::try_from(raw).ok()
}

#[test]
fn test_verbosity_override() {
    assert_eq!(verbosity_override(-1), None);
    assert_eq!(verbosity_override(0), Some(0));
    assert_eq!(verbosity_override(3), Some(3));
    assert_eq!(verbosity_override(i64::MAX), None);
    assert_eq!(LinelogConfig::default().verbosity(), None);
}
