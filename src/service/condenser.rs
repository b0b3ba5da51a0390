use crate::error::Result;
use crate::models::{CondensedRow, GroceryEntry, RowKind};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use std::io::Write;

const HEADER_MARKER: &str = "###";
const SUB_HEADER_MARKER: &str = "**";

/// Folds duplicate grocery rows together.
///
/// Items group by (display name, unit) case-insensitively and their quantities
/// add up. Repeated menu headers and recipe sub-headers collapse into a single
/// row whose quantity is the number of repetitions. Output keeps first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroceryListCondenser;

impl GroceryListCondenser {
    pub fn condense(&self, entries: &[GroceryEntry]) -> Vec<CondensedRow> {
        let mut rows: IndexMap<(RowKind, String, String), CondensedRow> = IndexMap::new();

        for entry in entries {
            let (kind, name) = classify(&entry.name);
            if name.is_empty() {
                continue;
            }

            let unit = entry
                .unit
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty());

            let key = match kind {
                RowKind::Item => (kind, name.to_lowercase(), unit.unwrap_or_default().to_lowercase()),
                _ => (kind, name.to_lowercase(), String::new()),
            };

            let row = rows.entry(key).or_insert_with(|| CondensedRow {
                kind,
                name: name.clone(),
                quantity: BigDecimal::zero(),
                unit: if kind == RowKind::Item { unit.map(str::to_string) } else { None },
                unit_price: None,
                total: None,
            });

            match kind {
                RowKind::Item => {
                    row.quantity += &entry.quantity;
                    if row.unit_price.is_none() {
                        row.unit_price = entry.unit_price.clone();
                    }
                }
                RowKind::Header | RowKind::SubHeader => {
                    row.quantity += BigDecimal::from(1);
                }
            }
        }

        let mut condensed: Vec<CondensedRow> = rows.into_values().collect();
        for row in condensed.iter_mut() {
            row.total = row.unit_price.as_ref().map(|price| &row.quantity * price);
        }

        tracing::debug!("Condensed {} grocery rows into {}", entries.len(), condensed.len());
        condensed
    }
}

/// Splits a raw row label into its kind and cleaned display text.
fn classify(raw: &str) -> (RowKind, String) {
    let trimmed = raw.trim();

    if let Some(rest) = trimmed.strip_prefix(HEADER_MARKER) {
        (RowKind::Header, collapse_whitespace(rest.trim_end_matches('#')))
    } else if let Some(rest) = trimmed.strip_prefix(SUB_HEADER_MARKER) {
        (RowKind::SubHeader, collapse_whitespace(rest.trim_end_matches('*')))
    } else {
        (RowKind::Item, clean_display_name(trimmed))
    }
}

/// Strips the editor's colour tag, bullets and markdown characters from an item label.
pub fn clean_display_name(label: &str) -> String {
    let mut text = label.trim();

    if text.starts_with('[') {
        if let Some(end) = text.find(']') {
            text = &text[end + 1..];
        }
    }

    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '•' | '*' | '_' | '<' | '>'))
        .collect();

    collapse_whitespace(&stripped)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn option_to_csv(val: &Option<BigDecimal>) -> String {
    val.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// Writes condensed rows as CSV with a header line.
pub fn write_csv<W: Write>(rows: &[CondensedRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(["kind", "name", "quantity", "unit", "unit_price", "total"])?;
    for row in rows {
        writer.write_record(&[
            row.kind.as_str().to_string(),
            row.name.clone(),
            row.quantity.to_string(),
            row.unit.clone().unwrap_or_default(),
            option_to_csv(&row.unit_price),
            option_to_csv(&row.total),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn entry(name: &str, quantity: &str, unit: Option<&str>, price: Option<&str>) -> GroceryEntry {
        GroceryEntry {
            name: name.to_string(),
            quantity: dec(quantity),
            unit: unit.map(str::to_string),
            unit_price: price.map(dec),
        }
    }

    #[test]
    fn test_clean_display_name() {
        assert_eq!(clean_display_name("[green]• Whole  Milk"), "Whole Milk");
        assert_eq!(clean_display_name("[black]• **eggs**"), "eggs");
        assert_eq!(clean_display_name("  _flour_ "), "flour");
        assert_eq!(clean_display_name("[red]•"), "");
    }

    #[test]
    fn test_items_merge_by_name_and_unit() {
        let rows = GroceryListCondenser.condense(&[
            entry("[green]• Milk", "1", Some("gal"), Some("3.50")),
            entry("[red]• milk", "2", Some("GAL "), None),
            entry("[black]• Milk", "500", Some("ml"), None),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, RowKind::Item);
        assert_eq!(rows[0].name, "Milk");
        assert_eq!(rows[0].quantity, dec("3"));
        assert_eq!(rows[0].unit.as_deref(), Some("gal"));
        assert_eq!(rows[0].total, Some(dec("10.50")));
        assert_eq!(rows[1].quantity, dec("500"));
        assert_eq!(rows[1].total, None);
    }

    #[test]
    fn test_headers_collapse_and_count() {
        let rows = GroceryListCondenser.condense(&[
            entry("### Week 1 ###", "1", None, None),
            entry("**Pancakes**", "1", None, None),
            entry("[black]• eggs", "2", None, Some("0.25")),
            entry("**Pancakes**", "1", None, None),
            entry("[black]• Eggs", "2", None, None),
            entry("### Week 1 ###", "1", None, None),
        ]);

        let summary: Vec<(RowKind, &str, BigDecimal)> = rows
            .iter()
            .map(|r| (r.kind, r.name.as_str(), r.quantity.clone()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (RowKind::Header, "Week 1", dec("2")),
                (RowKind::SubHeader, "Pancakes", dec("2")),
                (RowKind::Item, "eggs", dec("4")),
            ]
        );
        assert_eq!(rows[2].total, Some(dec("1.00")));
        assert_eq!(rows[0].total, None);
    }

    #[test]
    fn test_blank_rows_skipped() {
        let rows = GroceryListCondenser.condense(&[
            entry("[green]•", "1", None, None),
            entry("######", "1", None, None),
            entry("   ", "1", None, None),
        ]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_write_csv() {
        let rows = GroceryListCondenser.condense(&[
            entry("### Week 1 ###", "1", None, None),
            entry("[green]• Milk", "2", Some("gal"), Some("3.5")),
        ]);

        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "kind,name,quantity,unit,unit_price,total\nheader,Week 1,1,,,\nitem,Milk,2,gal,3.5,7.0\n"
        );
    }
}
