use crate::config::GenerationConfig;
use crate::rng::RandomSource;

/// Hands out failure ids. Ids are dense and start at zero, so after a run
/// `count()` is also the number of failure markers emitted.
#[derive(Debug, Default, Clone)]
pub struct FailureRegistry {
    next: u32,
}

impl FailureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn count(&self) -> u32 {
        self.next
    }
}

/// The mutable state of one generation run. Passed by `&mut` into every
/// builder call; nothing here outlives the run.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub rng: RandomSource,
    pub failures: FailureRegistry,
}

impl GenerationContext {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: RandomSource::new(seed),
            failures: FailureRegistry::new(),
        }
    }

    pub fn from_config(cfg: &GenerationConfig) -> Self {
        Self::new(cfg.seed)
    }
}

/// two spaces per nesting level
pub fn indent(level: usize) -> String {
    "  ".repeat(level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_registry_dense() {
        let mut r = FailureRegistry::new();
        assert_eq!(r.count(), 0);
        for i in 0..100 {
            assert_eq!(r.next_id(), i);
        }
        assert_eq!(r.count(), 100);
    }

    #[rstest]
    #[case(0, "")]
    #[case(1, "  ")]
    #[case(3, "      ")]
    fn test_indent(#[case] level: usize, #[case] expect: &str) {
        assert_eq!(indent(level), expect);
    }
}
