use std::io;
use std::sync::Arc;

use crate::error::CoreError;
use crate::models::{AppConfig, CallerIdentity, CanvasSpec};
use crate::services::artifact_store::{ArtifactKind, ArtifactStore, SweepReport};
use crate::services::converter::{Converter, ConverterOptions};
use crate::services::dispatcher::DisplayDispatcher;
use crate::services::palette_store::PaletteRepository;
use crate::services::panel;
use crate::services::storage::FsStorage;

/// Result of a committed conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub identity: CallerIdentity,
    pub palette: String,
    pub buffer_bytes: usize,
    pub preview_bytes: usize,
    /// Artifact files removed by the retention sweep after the commit
    pub swept: usize,
}

/// Palette lookup, conversion, artifact storage and display, wired together
pub struct ConversionService {
    palettes: PaletteRepository,
    converter: Converter,
    artifacts: ArtifactStore,
    dispatcher: DisplayDispatcher,
    keep_last: usize,
}

impl ConversionService {
    pub fn new(
        palettes: PaletteRepository,
        converter: Converter,
        artifacts: ArtifactStore,
        dispatcher: DisplayDispatcher,
        keep_last: usize,
    ) -> Self {
        Self {
            palettes,
            converter,
            artifacts,
            dispatcher,
            keep_last,
        }
    }

    /// Open storage roots and probe the panel driver as configured
    pub fn from_config(config: &AppConfig) -> io::Result<Self> {
        let spec = CanvasSpec::SPECTRA_13IN3;
        let palettes = FsStorage::open(&config.storage.palettes_dir)?;
        let artifacts = FsStorage::open(&config.storage.artifacts_dir)?;

        Ok(Self::new(
            PaletteRepository::new(Arc::new(palettes)),
            Converter::new(spec, ConverterOptions::from_config(config)),
            ArtifactStore::new(Arc::new(artifacts)),
            DisplayDispatcher::new(
                panel::probe(&config.display, spec),
                config.display.clear_color,
            ),
            config.retention.keep_last,
        ))
    }

    pub fn palettes(&self) -> &PaletteRepository {
        &self.palettes
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn dispatcher(&self) -> &DisplayDispatcher {
        &self.dispatcher
    }

    pub fn spec(&self) -> CanvasSpec {
        self.converter.spec()
    }

    /// Convert `source` with the named palette and replace the identity's
    /// artifact set. Nothing is written unless every stage succeeds.
    pub fn convert_for(
        &self,
        identity: &CallerIdentity,
        source: &[u8],
        palette_name: &str,
    ) -> Result<ConversionSummary, CoreError> {
        let table = self.palettes.resolve(palette_name)?;
        let conversion = self.converter.convert(source, &table)?;
        let buffer = conversion.pack();

        self.artifacts.save(identity, &buffer, &conversion.preview)?;
        let swept = self.sweep()?;

        tracing::info!(
            identity = %identity,
            palette = %palette_name,
            buffer_bytes = buffer.len(),
            swept = swept.removed.len(),
            "Conversion committed"
        );

        Ok(ConversionSummary {
            identity: identity.clone(),
            palette: palette_name.to_string(),
            buffer_bytes: buffer.len(),
            preview_bytes: conversion.preview.len(),
            swept: swept.removed.len(),
        })
    }

    pub fn preview_for(&self, identity: &CallerIdentity) -> Result<Vec<u8>, CoreError> {
        Ok(self.artifacts.read(identity, ArtifactKind::Preview)?)
    }

    pub fn buffer_for(&self, identity: &CallerIdentity) -> Result<Vec<u8>, CoreError> {
        Ok(self.artifacts.read(identity, ArtifactKind::Buffer)?)
    }

    /// Show the identity's stored frame. The frame is not read when no
    /// driver is attached.
    pub fn display_for(&self, identity: &CallerIdentity) -> Result<(), CoreError> {
        let spec = self.spec();
        self.dispatcher.dispatch_with(|| {
            let buffer = self.artifacts.read(identity, ArtifactKind::Buffer)?;
            spec.validate_buffer(buffer.len())?;
            Ok::<_, CoreError>(buffer)
        })?;
        tracing::info!(identity = %identity, "Displayed stored frame");
        Ok(())
    }

    /// Show an already packed frame without storing it
    pub fn send_raw(&self, buffer: &[u8]) -> Result<(), CoreError> {
        self.spec().validate_buffer(buffer.len())?;
        self.dispatcher.dispatch(buffer)?;
        Ok(())
    }

    pub fn sweep(&self) -> Result<SweepReport, CoreError> {
        self.sweep_keeping(self.keep_last)
    }

    pub fn sweep_keeping(&self, keep: usize) -> Result<SweepReport, CoreError> {
        Ok(self.artifacts.sweep(keep)?)
    }
}
