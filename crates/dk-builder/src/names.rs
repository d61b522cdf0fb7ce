use crate::config::BuilderConfig;
use dk_core::KitError;
use dk_core::KitResult;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::fmt;

const NAME_ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Issues class names of the form `{kind}_{suffix}`, unique for the
/// registry's lifetime.
///
/// Issued names are never released, even after their component leaves the
/// document.
pub struct NameRegistry {
    issued: HashSet<String>,
    rng: StdRng,
    suffix_len: usize,
    max_attempts: u32,
}

impl NameRegistry {
    pub fn new(config: &BuilderConfig) -> KitResult<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    pub(crate) fn from_valid(config: &BuilderConfig) -> Self {
        let rng = match config.name_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            issued: HashSet::new(),
            rng,
            suffix_len: config.suffix_len,
            max_attempts: config.max_name_attempts,
        }
    }

    /// Draws candidates until one is unused, then records and returns it.
    pub fn generate(&mut self, kind: &str) -> KitResult<String> {
        for attempt in 1..=self.max_attempts {
            let candidate = format!("{kind}_{}", self.draw_suffix());
            if !self.issued.contains(&candidate) {
                self.issued.insert(candidate.clone());
                return Ok(candidate);
            }
            tracing::debug!(kind, attempt, candidate = %candidate, "class name collision, redrawing");
        }

        tracing::warn!(
            kind,
            attempts = self.max_attempts,
            issued = self.issued.len(),
            "class name generation exhausted"
        );
        Err(KitError::configuration(
            "names.retry_exhausted",
            format!(
                "no unused name for kind `{kind}` after {} attempts",
                self.max_attempts
            ),
        ))
    }

    /// Draws one name per entry of `kinds`, in order.
    ///
    /// Either every draw succeeds or none of them stays issued.
    pub fn generate_all(&mut self, kinds: &[&str]) -> KitResult<Vec<String>> {
        let mut drawn = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match self.generate(kind) {
                Ok(name) => drawn.push(name),
                Err(err) => {
                    for name in &drawn {
                        self.issued.remove(name);
                    }
                    tracing::debug!(released = drawn.len(), "rolled back partial name batch");
                    return Err(err);
                }
            }
        }
        Ok(drawn)
    }

    /// Marks `name` as issued. Returns false if it already was.
    pub fn reserve(&mut self, name: impl Into<String>) -> bool {
        self.issued.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.issued.contains(name)
    }

    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }

    fn draw_suffix(&mut self) -> String {
        (0..self.suffix_len)
            .map(|_| char::from(NAME_ALPHABET[self.rng.gen_range(0..NAME_ALPHABET.len())]))
            .collect()
    }
}

impl Default for NameRegistry {
    fn default() -> Self {
        Self::from_valid(&BuilderConfig::default())
    }
}

impl fmt::Debug for NameRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameRegistry")
            .field("issued", &self.issued.len())
            .field("suffix_len", &self.suffix_len)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
