pub mod condenser;
pub mod inventory;
pub mod receipt_matcher;
pub mod receipt_service;
pub mod similarity;

pub use condenser::GroceryListCondenser;
pub use inventory::{InventoryStore, MemoryInventory};
pub use receipt_matcher::{clean_line, MatchOutcome, MatcherConfig, ReceiptMatcher, Tally, Vocabulary};
pub use receipt_service::ReceiptService;
