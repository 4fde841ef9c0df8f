use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stackscroll::ContainerConfig;

/// Settings for the demo screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Container tunables.
    pub container: ContainerConfig,
    /// Viewport width.
    pub width: f32,
    /// Viewport height.
    pub height: f32,
    /// Rows each table starts with.
    pub initial_rows: usize,
    /// Delay between simulated page-load chunks, in milliseconds.
    pub chunk_delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            container: ContainerConfig::default(),
            width: 375.0,
            height: 667.0,
            initial_rows: 5,
            chunk_delay_ms: 40,
        }
    }
}

impl DemoConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parsing demo config")?;
        cfg.container.validate()?;
        Ok(cfg)
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() -> Result<()> {
        let cfg = DemoConfig::from_toml(
            r#"
            width = 320.0

            [container]
            settle_delay_ms = 50
            "#,
        )?;
        assert_eq!(cfg.width, 320.0);
        assert_eq!(cfg.height, 667.0);
        assert_eq!(cfg.container.settle_delay_ms, 50);
        assert_eq!(cfg.container.layout_margins, ContainerConfig::default().layout_margins);
        Ok(())
    }

    #[test]
    fn rejects_negative_margins() {
        let r = DemoConfig::from_toml(
            r#"
            [container.layout_margins]
            left = -4.0
            "#,
        );
        assert!(r.is_err());
    }
}
