//! Panel driver seam.
//!
//! Hardware drivers implement [`PanelDriver`]; the dispatcher only ever
//! walks the lifecycle `init -> clear -> display -> sleep` on it.

use anyhow::{bail, Context};
use std::fs;
use std::path::PathBuf;

use crate::models::config::{DisplayConfig, DriverKind};
use crate::models::CanvasSpec;

/// A 4-bit e-paper panel
pub trait PanelDriver: Send {
    /// Wake the controller and run its init sequence
    fn init(&mut self) -> anyhow::Result<()>;

    /// Fill the whole panel with one palette index
    fn clear(&mut self, color: u8) -> anyhow::Result<()>;

    /// Push a packed frame and refresh
    fn display(&mut self, frame: &[u8]) -> anyhow::Result<()>;

    /// Enter deep sleep
    fn sleep(&mut self) -> anyhow::Result<()>;
}

/// Build the configured driver, or `None` when no panel is attached
pub fn probe(config: &DisplayConfig, spec: CanvasSpec) -> Option<Box<dyn PanelDriver>> {
    match config.driver {
        DriverKind::None => {
            tracing::info!("No panel driver configured");
            None
        }
        DriverKind::Simulated => {
            tracing::info!(output = %config.simulated_output.display(), "Using simulated panel");
            Some(Box::new(SimulatedPanel::new(
                config.simulated_output.clone(),
                spec,
            )))
        }
    }
}

/// Stand-in panel that writes every displayed frame to a file
#[derive(Debug)]
pub struct SimulatedPanel {
    output: PathBuf,
    spec: CanvasSpec,
    awake: bool,
    last_clear: Option<u8>,
}

impl SimulatedPanel {
    pub fn new(output: PathBuf, spec: CanvasSpec) -> Self {
        Self {
            output,
            spec,
            awake: false,
            last_clear: None,
        }
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    pub fn last_clear(&self) -> Option<u8> {
        self.last_clear
    }
}

impl PanelDriver for SimulatedPanel {
    fn init(&mut self) -> anyhow::Result<()> {
        if let Some(parent) = self.output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        self.awake = true;
        Ok(())
    }

    fn clear(&mut self, color: u8) -> anyhow::Result<()> {
        if !self.awake {
            bail!("clear while asleep");
        }
        self.last_clear = Some(color & 0x0F);
        Ok(())
    }

    fn display(&mut self, frame: &[u8]) -> anyhow::Result<()> {
        if !self.awake {
            bail!("display while asleep");
        }
        if frame.len() != self.spec.buffer_len() {
            bail!(
                "frame is {} bytes, panel takes {}",
                frame.len(),
                self.spec.buffer_len()
            );
        }
        fs::write(&self.output, frame)
            .with_context(|| format!("writing {}", self.output.display()))?;
        tracing::debug!(output = %self.output.display(), "Simulated panel refreshed");
        Ok(())
    }

    fn sleep(&mut self) -> anyhow::Result<()> {
        self.awake = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TINY: CanvasSpec = CanvasSpec {
        width: 4,
        height: 2,
    };

    #[test]
    fn test_simulated_lifecycle_writes_frame() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("frame.bin");
        let mut panel = SimulatedPanel::new(out.clone(), TINY);

        panel.init().unwrap();
        panel.clear(1).unwrap();
        panel.display(&[0x11, 0x22, 0x33, 0x44]).unwrap();
        panel.sleep().unwrap();

        assert_eq!(fs::read(&out).unwrap(), vec![0x11, 0x22, 0x33, 0x44]);
        assert_eq!(panel.last_clear(), Some(1));
        assert!(!panel.is_awake());
    }

    #[test]
    fn test_simulated_rejects_display_before_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = SimulatedPanel::new(dir.path().join("f.bin"), TINY);
        assert!(panel.display(&[0; 4]).is_err());
    }

    #[test]
    fn test_simulated_rejects_wrong_frame_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = SimulatedPanel::new(dir.path().join("f.bin"), TINY);
        panel.init().unwrap();
        let err = panel.display(&[0; 3]).unwrap_err();
        assert!(err.to_string().contains("3 bytes"));
    }

    #[test]
    fn test_probe() {
        let mut config = DisplayConfig::default();
        assert!(probe(&config, TINY).is_none());
        config.driver = DriverKind::Simulated;
        assert!(probe(&config, TINY).is_some());
    }
}
