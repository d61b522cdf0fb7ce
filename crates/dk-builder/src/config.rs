use dk_core::KitError;
use dk_core::KitResult;

pub const DEFAULT_SUFFIX_LEN: usize = 6;
pub const MAX_SUFFIX_LEN: usize = 32;
pub const DEFAULT_MAX_NAME_ATTEMPTS: u32 = 1024;

/// Tuning knobs for a [`crate::TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Random characters appended to `{kind}_` in generated class names.
    pub suffix_len: usize,
    /// Draws attempted before name generation gives up.
    pub max_name_attempts: u32,
    /// Fixed seed for reproducible names. `None` seeds from OS entropy.
    pub name_seed: Option<u64>,
}

impl BuilderConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            name_seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> KitResult<()> {
        if self.suffix_len == 0 || self.suffix_len > MAX_SUFFIX_LEN {
            return Err(KitError::configuration(
                "config.suffix_len_invalid",
                format!(
                    "suffix_len must be between 1 and {MAX_SUFFIX_LEN}, got {}",
                    self.suffix_len
                ),
            ));
        }

        if self.max_name_attempts == 0 {
            return Err(KitError::configuration(
                "config.max_name_attempts_invalid",
                "max_name_attempts must be greater than zero",
            ));
        }

        Ok(())
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            suffix_len: DEFAULT_SUFFIX_LEN,
            max_name_attempts: DEFAULT_MAX_NAME_ATTEMPTS,
            name_seed: None,
        }
    }
}
