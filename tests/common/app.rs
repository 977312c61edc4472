//! Test application factory for integration tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use inkpress::assets::AssetLoader;
use inkpress::models::{CanvasSpec, PaletteTable};
use inkpress::services::{
    ArtifactStore, ConversionService, Converter, ConverterOptions, DisplayDispatcher, FsStorage,
    PaletteRepository, PanelDriver, StagedFile, Storage, StoredFile,
};

/// Lifecycle call seen by [`RecordingPanel`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCall {
    Init,
    Clear(u8),
    Display(Vec<u8>),
    Sleep,
}

/// Panel driver that records every call
pub struct RecordingPanel {
    calls: Arc<Mutex<Vec<PanelCall>>>,
}

impl RecordingPanel {
    pub fn new() -> (Self, Arc<Mutex<Vec<PanelCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl PanelDriver for RecordingPanel {
    fn init(&mut self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(PanelCall::Init);
        Ok(())
    }

    fn clear(&mut self, color: u8) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(PanelCall::Clear(color));
        Ok(())
    }

    fn display(&mut self, frame: &[u8]) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(PanelCall::Display(frame.to_vec()));
        Ok(())
    }

    fn sleep(&mut self) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(PanelCall::Sleep);
        Ok(())
    }
}

/// Storage wrapper that counts reads
pub struct CountingStorage {
    inner: FsStorage,
    reads: Arc<AtomicUsize>,
}

impl CountingStorage {
    pub fn new(inner: FsStorage) -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                reads: reads.clone(),
            },
            reads,
        )
    }
}

impl Storage for CountingStorage {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(name)
    }

    fn exists(&self, name: &str) -> bool {
        self.inner.exists(name)
    }

    fn stage(&self, name: &str, bytes: &[u8]) -> io::Result<StagedFile> {
        self.inner.stage(name, bytes)
    }

    fn commit(&self, staged: StagedFile) -> io::Result<()> {
        self.inner.commit(staged)
    }

    fn discard(&self, staged: StagedFile) {
        self.inner.discard(staged)
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        self.inner.delete(name)
    }

    fn stat(&self, name: &str) -> io::Result<StoredFile> {
        self.inner.stat(name)
    }

    fn list(&self) -> io::Result<Vec<StoredFile>> {
        self.inner.list()
    }
}

/// Conversion service over temporary storage roots
pub struct TestApp {
    pub dir: TempDir,
    pub service: ConversionService,
    /// `None` when the app was built without a panel
    pub panel_calls: Option<Arc<Mutex<Vec<PanelCall>>>>,
    pub artifact_reads: Arc<AtomicUsize>,
}

/// Small canvas so conversions stay fast; 12x16 keeps the 3:4 portrait shape
pub const SMALL_CANVAS: CanvasSpec = CanvasSpec {
    width: 12,
    height: 16,
};

impl TestApp {
    /// Small canvas, recording panel, default retention
    pub fn new() -> Self {
        Self::build(SMALL_CANVAS, true, 20)
    }

    pub fn without_panel() -> Self {
        Self::build(SMALL_CANVAS, false, 20)
    }

    pub fn build(spec: CanvasSpec, with_panel: bool, keep_last: usize) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let palettes_dir = dir.path().join("palettes");

        // Seed the default palettes the same way the binary does
        AssetLoader::new(Some(palettes_dir.clone()), None)
            .seed_if_configured()
            .expect("Failed to seed palettes");

        let palettes = FsStorage::open(&palettes_dir).expect("Failed to open palettes");
        let artifacts = FsStorage::open(dir.path().join("uploads")).expect("Failed to open uploads");
        let (artifacts, artifact_reads) = CountingStorage::new(artifacts);

        let (driver, panel_calls) = if with_panel {
            let (panel, calls) = RecordingPanel::new();
            (Some(Box::new(panel) as Box<dyn PanelDriver>), Some(calls))
        } else {
            (None, None)
        };

        let service = ConversionService::new(
            PaletteRepository::new(Arc::new(palettes)),
            Converter::new(spec, ConverterOptions::default()),
            ArtifactStore::new(Arc::new(artifacts)),
            DisplayDispatcher::new(driver, 1),
            keep_last,
        );

        Self {
            dir,
            service,
            panel_calls,
            artifact_reads,
        }
    }

    pub fn uploads_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    /// Sorted names of the files in the artifacts directory
    pub fn artifact_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.uploads_dir())
            .expect("Failed to list uploads")
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    pub fn panel_calls(&self) -> Vec<PanelCall> {
        self.panel_calls
            .as_ref()
            .map(|c| c.lock().unwrap().clone())
            .unwrap_or_default()
    }

    pub fn load_palette(&self, name: &str) -> PaletteTable {
        PaletteRepository::load(&self.dir.path().join("palettes").join(name))
            .expect("Failed to load palette")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
