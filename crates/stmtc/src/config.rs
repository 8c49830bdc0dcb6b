//! Builder configuration.

/// Default ceiling on cascade recursion.
pub const DEFAULT_MAX_CASCADE_DEPTH: usize = 64;

/// Statement builder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Follow cascade policies into related entities.
    pub follow_cascades: bool,

    /// Maximum cascade depth before a build is aborted.
    pub max_cascade_depth: usize,
}

impl BuilderConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self {
            follow_cascades: true,
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
        }
    }

    /// Set whether cascades are followed.
    pub fn with_follow_cascades(mut self, follow: bool) -> Self {
        self.follow_cascades = follow;
        self
    }

    /// Never follow cascades; only the entity itself and its join rows are built.
    pub fn without_cascades(self) -> Self {
        self.with_follow_cascades(false)
    }

    /// Set the maximum cascade depth.
    pub fn with_max_cascade_depth(mut self, depth: usize) -> Self {
        self.max_cascade_depth = depth;
        self
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::default();
        assert!(config.follow_cascades);
        assert_eq!(config.max_cascade_depth, DEFAULT_MAX_CASCADE_DEPTH);
    }

    #[test]
    fn test_builder_methods() {
        let config = BuilderConfig::new()
            .without_cascades()
            .with_max_cascade_depth(4);
        assert!(!config.follow_cascades);
        assert_eq!(config.max_cascade_depth, 4);
    }
}
