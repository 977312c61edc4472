pub mod artifact_store;
pub mod conversion_service;
pub mod converter;
pub mod dispatcher;
pub mod palette_store;
pub mod panel;
pub mod storage;

pub use artifact_store::{ArtifactEntry, ArtifactKind, ArtifactStore, SweepReport};
pub use conversion_service::{ConversionService, ConversionSummary};
pub use converter::{Conversion, Converter, ConverterOptions};
pub use dispatcher::DisplayDispatcher;
pub use palette_store::PaletteRepository;
pub use panel::{PanelDriver, SimulatedPanel};
pub use storage::{FsStorage, StagedFile, Storage, StoredFile};
