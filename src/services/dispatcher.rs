use std::sync::Mutex;
use std::time::Instant;

use crate::error::{DispatchError, PanelStage};
use crate::services::panel::PanelDriver;

/// Hands finished frames to the panel.
///
/// Runs `init -> clear -> display -> sleep` exactly once per call, holding
/// the driver lock for the whole lifecycle so two dispatches never
/// interleave. There are no retries.
pub struct DisplayDispatcher {
    driver: Option<Mutex<Box<dyn PanelDriver>>>,
    clear_color: u8,
}

impl DisplayDispatcher {
    pub fn new(driver: Option<Box<dyn PanelDriver>>, clear_color: u8) -> Self {
        Self {
            driver: driver.map(Mutex::new),
            clear_color,
        }
    }

    pub fn is_available(&self) -> bool {
        self.driver.is_some()
    }

    pub fn dispatch(&self, frame: &[u8]) -> Result<(), DispatchError> {
        let driver = self.driver.as_ref().ok_or(DispatchError::DriverUnavailable)?;
        self.run(driver, frame)
    }

    /// Like [`dispatch`](Self::dispatch), but the frame is only loaded once
    /// a driver is known to be present.
    pub fn dispatch_with<F, E>(&self, load: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
        E: From<DispatchError>,
    {
        let driver = self.driver.as_ref().ok_or(DispatchError::DriverUnavailable)?;
        let frame = load()?;
        Ok(self.run(driver, &frame)?)
    }

    fn run(&self, driver: &Mutex<Box<dyn PanelDriver>>, frame: &[u8]) -> Result<(), DispatchError> {
        if frame.is_empty() {
            return Err(DispatchError::EmptyBuffer);
        }

        let started = Instant::now();
        let mut panel = driver.lock().unwrap_or_else(|e| e.into_inner());

        let result = lifecycle(&mut **panel, self.clear_color, frame);

        match result {
            Ok(()) => {
                tracing::info!(
                    bytes = frame.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Frame displayed"
                );
                Ok(())
            }
            Err((stage, e)) => {
                let cause = format!("{e:#}");
                tracing::warn!(%stage, error = %cause, "Panel dispatch failed");
                if stage != PanelStage::Sleep {
                    if let Err(sleep_err) = panel.sleep() {
                        tracing::warn!(error = %sleep_err, "Panel did not enter sleep after failure");
                    }
                }
                Err(DispatchError::DispatchFailed { stage, cause })
            }
        }
    }
}

fn lifecycle(
    panel: &mut dyn PanelDriver,
    clear_color: u8,
    frame: &[u8],
) -> Result<(), (PanelStage, anyhow::Error)> {
    panel.init().map_err(|e| (PanelStage::Initialize, e))?;
    panel
        .clear(clear_color)
        .map_err(|e| (PanelStage::Clear, e))?;
    panel.display(frame).map_err(|e| (PanelStage::Display, e))?;
    panel.sleep().map_err(|e| (PanelStage::Sleep, e))
}
