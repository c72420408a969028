use crate::core::insight::Sentiment;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BUDGET_BAR_WIDTH: usize = 30;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn format_amount(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

/// Right-aligned cell for a money amount.
pub fn amount_cell(symbol: &str, amount: f64) -> Cell {
    Cell::new(format_amount(symbol, amount)).set_alignment(CellAlignment::Right)
}

/// Right-aligned bold cell for a total.
pub fn total_cell(symbol: &str, amount: f64) -> Cell {
    Cell::new(format_amount(symbol, amount))
        .add_attribute(Attribute::Bold)
        .fg(Color::Green)
        .set_alignment(CellAlignment::Right)
}

/// Renders a text progress bar for a ratio in `[0, 1]`, red when over budget.
pub fn budget_bar(ratio: f64, over_budget: bool) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * BUDGET_BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BUDGET_BAR_WIDTH - filled)
    );
    if over_budget {
        style(bar).red().to_string()
    } else {
        style(bar).green().to_string()
    }
}

/// Colour-coded label such as `FRUGAL MODE`.
pub fn sentiment_badge(sentiment: Sentiment) -> String {
    let label = format!(" {} MODE ", sentiment.as_str().to_uppercase());
    let styled = match sentiment {
        Sentiment::Frugal => style(label).black().on_green(),
        Sentiment::Balanced => style(label).white().on_blue(),
        Sentiment::Extravagant => style(label).black().on_yellow(),
    };
    styled.bold().to_string()
}

/// Creates a spinner shown while waiting on a slow request.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}")
    {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
