//! Events raised by the table UI

use serde::{Deserialize, Serialize};

use crate::bulk::Strategy;
use crate::catalog::CatalogItem;

/// User actions on the artwork table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    /// The page control moved; `page_index` is zero-based
    PageChanged {
        page_index: u32,
    },
    
    /// A row checkbox changed state
    RowToggled {
        item: CatalogItem,
        checked: bool,
    },
    
    /// The bulk picker was confirmed
    BulkSelect {
        count: i64,
        strategy: Strategy,
        add_to_existing: bool,
    },
    
    /// One entry was removed from the selection panel
    SelectionRemoved {
        id: u64,
    },
    
    /// The whole selection was cleared
    SelectionCleared,
}
