//! Shopping-list aggregation over the ingredients of carted recipes.

use std::collections::BTreeMap;

pub const REPORT_TITLE: &str = "Foodgram shopping list";
pub const REPORT_HEADER: &str = "ingredient | amount | unit";

/// One ingredient row of one recipe in a user's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredient {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// A summed shopping-list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub total: i64,
    pub measurement_unit: String,
}

/// Group rows by (name, unit) and sum amounts. Output is ordered by name,
/// then unit.
pub fn aggregate<I>(rows: I) -> Vec<ShoppingListLine>
where
    I: IntoIterator<Item = CartIngredient>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for row in rows {
        *totals.entry((row.name, row.measurement_unit)).or_insert(0) += i64::from(row.amount);
    }
    totals
        .into_iter()
        .map(|((name, measurement_unit), total)| ShoppingListLine {
            name,
            total,
            measurement_unit,
        })
        .collect()
}

/// Render the plain-text report: title, column header, then one
/// `name | total | unit` line per ingredient.
pub fn render(lines: &[ShoppingListLine]) -> String {
    let mut out = Vec::with_capacity(lines.len() + 2);
    out.push(REPORT_TITLE.to_owned());
    out.push(REPORT_HEADER.to_owned());
    out.extend(
        lines
            .iter()
            .map(|l| format!("{} | {} | {}", l.name, l.total, l.measurement_unit)),
    );
    out.join("\n")
}
