//! Container configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    geom::Insets,
};

/// Default settle delay for content-size changes.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Default margin guide of the container's content view.
pub const DEFAULT_LAYOUT_MARGINS: Insets = Insets::uniform(8.0);

/// Tunables for a [`StackingContainer`](crate::StackingContainer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// How long content-size changes must settle before the container
    /// re-queries a wrapper's size, in milliseconds.
    pub settle_delay_ms: u64,
    /// Margin guide used by entries with `HorizontalInset::EdgeMargin`.
    pub layout_margins: Insets,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
            layout_margins: DEFAULT_LAYOUT_MARGINS,
        }
    }
}

impl ContainerConfig {
    /// The settle delay as a duration.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Builder: settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Builder: margin guide.
    pub fn with_layout_margins(mut self, margins: Insets) -> Self {
        self.layout_margins = margins;
        self
    }

    /// Reject margins that are negative or not finite.
    pub fn validate(&self) -> Result<()> {
        let m = self.layout_margins;
        Insets::try_new(m.top, m.left, m.bottom, m.right)
            .map_err(|e| Error::Config(format!("layout_margins: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ContainerConfig::default();
        assert_eq!(c.settle_delay(), Duration::from_millis(300));
        assert_eq!(c.layout_margins, Insets::uniform(8.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_negative_margins() {
        let c = ContainerConfig::default().with_layout_margins(Insets::new(0.0, -4.0, 0.0, 0.0));
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }
}
