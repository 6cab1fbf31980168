use super::ui;
use crate::core::market::{SymbolMatch, SymbolSearchProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn render(matches: &[SymbolMatch]) -> String {
    if matches.is_empty() {
        return ui::style_text("No matching symbols found.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Description"),
        ui::header_cell("Type"),
    ]);
    for m in matches {
        table.add_row(vec![
            Cell::new(&m.symbol),
            Cell::new(&m.description),
            Cell::new(&m.kind),
        ]);
    }
    table.to_string()
}

pub async fn run(provider: &dyn SymbolSearchProvider, query: &str) -> Result<()> {
    let matches = provider
        .search(query)
        .await
        .with_context(|| format!("Failed to search symbols for '{query}'"))?;
    println!("{}", render(&matches));
    Ok(())
}
