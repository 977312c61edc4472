pub mod canvas;
pub mod config;
pub mod identity;
pub mod palette_table;

pub use canvas::CanvasSpec;
pub use config::{AppConfig, DistanceSetting, DriverKind};
pub use identity::CallerIdentity;
pub use palette_table::{PaletteTable, PALETTE_TABLE_LEN};
