use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

fn one() -> BigDecimal {
    BigDecimal::from(1)
}

/// Raw grocery list row as stored by the list editor.
///
/// Names carry the editor's markup: `### Menu ###` headers, `**Recipe**`
/// sub-headers and `[green]• item` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryEntry {
    pub name: String,
    #[serde(default = "one")]
    pub quantity: BigDecimal,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub unit_price: Option<BigDecimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Header,
    SubHeader,
    Item,
}

impl RowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowKind::Header => "header",
            RowKind::SubHeader => "sub_header",
            RowKind::Item => "item",
        }
    }
}

/// Row of a condensed grocery list. For header rows `quantity` counts repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedRow {
    pub kind: RowKind,
    pub name: String,
    pub quantity: BigDecimal,
    pub unit: Option<String>,
    pub unit_price: Option<BigDecimal>,
    pub total: Option<BigDecimal>,
}
