use std::env;

/// Knobs for the transcript. None of them change which sections run or in
/// which order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourConfig {
    /// Colored section headers.
    pub color: bool,
    /// Print the in-memory bytes of reinterpreted values.
    pub show_bytes: bool,
    /// Scratch allocations made between freeing and reading in the dangling
    /// address demo.
    pub churn_rounds: usize,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_bytes: true,
            churn_rounds: 8,
        }
    }
}

impl TourConfig {
    /// Defaults adjusted by the environment.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    pub fn with_env(mut self) -> Self {
        if env::var_os("NO_COLOR").is_some() {
            self.color = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TourConfig::default();
        assert!(config.color);
        assert!(config.show_bytes);
        assert_eq!(config.churn_rounds, 8);
    }

    #[test]
    fn test_with_env_keeps_other_fields() {
        let config = TourConfig {
            show_bytes: false,
            churn_rounds: 2,
            ..TourConfig::default()
        }
        .with_env();
        assert!(!config.show_bytes);
        assert_eq!(config.churn_rounds, 2);
    }

    #[test]
    fn test_no_color_environment() {
        env::set_var("NO_COLOR", "1");
        assert!(!TourConfig::from_env().color);
        env::remove_var("NO_COLOR");
        assert!(TourConfig::from_env().color);
    }
}
