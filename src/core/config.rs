//! Renderer configuration
//!
//! Options can be built from a named profile, tweaked field by field, or read
//! from JSON. [`RendererProfile::resolve`] is the single place where preset
//! values live.

use crate::core::constants::{DEFAULT_RENDERER_PADDING, HOVER_THROTTLE_MS};
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RendererProfile {
    Balanced,
    /// Less surface padding and slower hover hit-testing
    LowQuality,
    /// A larger off-screen margin, so fast pans show fewer unpainted edges
    HighQuality,
    Custom(RendererOptions),
}

impl RendererProfile {
    pub fn resolve(&self) -> RendererOptions {
        match self {
            Self::Balanced => RendererOptions {
                padding: DEFAULT_RENDERER_PADDING,
                tolerance: 0.0,
                hover_throttle_ms: HOVER_THROTTLE_MS,
                continuous: false,
            },
            Self::LowQuality => RendererOptions {
                padding: 0.0,
                tolerance: 0.0,
                hover_throttle_ms: 64,
                continuous: false,
            },
            Self::HighQuality => RendererOptions {
                padding: 0.5,
                tolerance: 0.0,
                hover_throttle_ms: 16,
                continuous: true,
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for RendererProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Options shared by every renderer backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    /// How much the surface extends beyond the view on each side, as a
    /// fraction of the view size
    pub padding: f64,
    /// Extra hit-test tolerance in pixels, added to half the stroke weight
    pub tolerance: f64,
    /// Minimum interval between two hover hit-tests
    pub hover_throttle_ms: u64,
    /// Refresh clip bounds on every `on_move`, not only when the view settles
    pub continuous: bool,
}

impl RendererOptions {
    /// Parses options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

impl Default for RendererOptions {
    fn default() -> Self {
        RendererProfile::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_balanced() {
        let options = RendererOptions::default();
        assert_eq!(options.padding, 0.1);
        assert_eq!(options.tolerance, 0.0);
        assert_eq!(options.hover_throttle_ms, 32);
        assert!(!options.continuous);
    }

    #[test]
    fn test_custom_profile_resolves_to_itself() {
        let options = RendererOptions::default().with_padding(0.25).with_tolerance(4.0);
        let resolved = RendererProfile::Custom(options.clone()).resolve();
        assert_eq!(resolved, options);
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let options = RendererOptions::from_json(r#"{"tolerance": 3.0}"#).unwrap();
        assert_eq!(options.tolerance, 3.0);
        assert_eq!(options.padding, 0.1);

        let back = RendererOptions::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            RendererOptions::from_json("not json"),
            Err(crate::MapError::Serialization(_))
        ));
    }
}
