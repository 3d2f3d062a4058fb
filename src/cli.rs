// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::core::config::sanitize_ratio_override;
use crate::core::{HitPolicy, PanelConfig};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "panel-host")]
#[command(about = "Hosts a retained-mode UI panel in a desktop window", long_about = None)]
pub struct Cli {
    /// JSON panel config; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Force a device pixel ratio (0 uses the display's)
    #[arg(long = "dpr-override")]
    pub dpr_override: Option<f32>,

    /// Report 4x anti-aliasing to the framework
    #[arg(long = "hardware-aa", default_value = "false")]
    pub hardware_aa: bool,

    /// Log the render tree after every update
    #[arg(long = "show-root", default_value = "false")]
    pub show_root: bool,

    /// Register the panel with the raycast registry
    #[arg(long, default_value = "false")]
    pub raycastable: bool,

    /// Answer hit tests from registered widget rects instead of accepting every point
    #[arg(long = "registry-hits", default_value = "false")]
    pub registry_hits: bool,
}

impl Cli {
    /// Config file (or defaults) with command-line flags applied on top
    pub fn panel_config(&self) -> Result<PanelConfig> {
        let mut config = match &self.config {
            Some(path) => PanelConfig::load(path)?,
            None => PanelConfig::default(),
        };

        if let Some(ratio) = self.dpr_override {
            config.device_pixel_ratio_override = sanitize_ratio_override(ratio);
        }
        config.hardware_anti_aliasing |= self.hardware_aa;
        config.show_root |= self.show_root;
        config.raycastable |= self.raycastable || self.registry_hits;
        if self.registry_hits {
            config.hit_policy = HitPolicy::Registry;
        }

        Ok(config)
    }
}
