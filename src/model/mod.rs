pub mod category;
pub mod de;
pub mod records;
pub mod stats;

pub use category::{EntryType, InventoryCategory, RawMaterial};
pub use records::{
    InventoryEntry, MiscellaneousSpend, ProductionRecord, RawMaterialPurchase, SalesRecord, User,
};
pub use stats::{
    CategoryStats, InventoryOverview, MiscellaneousStats, ProductionStats, RawMaterialStats,
    SalesStats,
};
