pub mod fridge;
pub mod grocery;
pub mod receipt;

pub use fridge::FridgeItem;
pub use grocery::{CondensedRow, GroceryEntry, RowKind};
pub use receipt::{MatchedItem, ReceiptReport, UpsertAction};
