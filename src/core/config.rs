use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::raycast::HitPolicy;

/// Per-panel settings, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// 0 uses the display's ratio; a positive value forces it on every device
    pub device_pixel_ratio_override: f32,
    /// Hardware MSAA; much better edges at a real cost per frame
    pub hardware_anti_aliasing: bool,
    /// Log the framework's render tree after every update
    pub show_root: bool,
    /// Take part in host raycasts through the shared registry
    pub raycastable: bool,
    pub hit_policy: HitPolicy,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            device_pixel_ratio_override: 0.0,
            hardware_anti_aliasing: false,
            show_root: false,
            raycastable: false,
            hit_policy: HitPolicy::AlwaysValid,
        }
    }
}

impl PanelConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse panel config")?;
        Ok(config.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read panel config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid panel config {}", path.display()))
    }

    /// Clamp values that would break panel invariants
    pub fn sanitized(mut self) -> Self {
        self.device_pixel_ratio_override = sanitize_ratio_override(self.device_pixel_ratio_override);
        self
    }
}

/// Negative and NaN overrides fall back to 0 (use the provider's value)
pub fn sanitize_ratio_override(value: f32) -> f32 {
    if value >= 0.0 && value.is_finite() {
        value
    } else {
        log::warn!("ignoring device pixel ratio override {}", value);
        0.0
    }
}
