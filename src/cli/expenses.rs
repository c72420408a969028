use super::ui;
use crate::core::aggregate;
use crate::core::config::AppConfig;
use crate::core::expense::{Category, Expense, NewExpense, parse_amount};
use crate::store::{ExpenseStorage, ExpenseStore};
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use comfy_table::Cell;
use tracing::info;

/// Validates the raw input and stores a new expense.
pub fn add<S: ExpenseStorage>(
    store: &mut ExpenseStore<S>,
    amount: &str,
    category: Category,
    description: Option<String>,
    config: &AppConfig,
) -> Result<Expense> {
    let amount = parse_amount(amount)?;
    let expense = store.add(NewExpense::new(amount, category, description)?)?;
    info!(id = %expense.id, "Added expense");
    println!(
        "Added {} {} ({}) {}",
        expense.category.icon(),
        expense.description,
        expense.category,
        ui::style_text(
            &ui::format_amount(&config.currency_symbol, expense.amount),
            ui::StyleType::TotalValue
        )
    );
    Ok(expense)
}

pub fn list<S: ExpenseStorage>(store: &ExpenseStore<S>, config: &AppConfig) -> Result<()> {
    println!("{}", render_list(store.expenses(), &Local::now(), config));
    Ok(())
}

/// Renders all transactions, newest first, with a count of today's entries.
pub fn render_list<Tz>(expenses: &[Expense], now: &DateTime<Tz>, config: &AppConfig) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let today_count = aggregate::count_on_day(expenses, now);
    let mut output = format!(
        "{}  {}\n\n",
        ui::style_text("Recent Transactions", ui::StyleType::Title),
        ui::style_text(&format!("{today_count} today"), ui::StyleType::Subtle)
    );

    if expenses.is_empty() {
        output.push_str("No expenses recorded yet.");
        return output;
    }

    let tz = now.timezone();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell("Time"),
        ui::header_cell(&format!("Amount ({})", config.currency)),
    ]);

    for expense in aggregate::sorted_newest_first(expenses) {
        let time = expense
            .timestamp()
            .map(|ts| ts.with_timezone(&tz).format("%d %b %H:%M").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        table.add_row(vec![
            Cell::new(short_id(&expense.id)),
            Cell::new(&expense.description),
            Cell::new(format!("{} {}", expense.category.icon(), expense.category)),
            Cell::new(time),
            ui::amount_cell(&config.currency_symbol, expense.amount),
        ]);
    }

    output.push_str(&table.to_string());
    output
}

/// Leading part of a UUID, enough to pick a record from a short list.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

/// Deletes the record whose id equals or starts with `id`. A prefix must be
/// unambiguous and non-blank.
pub fn delete<S: ExpenseStorage>(store: &mut ExpenseStore<S>, id: &str) -> Result<()> {
    let id = id.trim();
    if id.is_empty() {
        anyhow::bail!("An expense id is required");
    }

    let matches: Vec<String> = store
        .expenses()
        .iter()
        .filter(|e| e.id == id || e.id.starts_with(id))
        .map(|e| e.id.clone())
        .collect();

    let target = match matches.as_slice() {
        [] => anyhow::bail!("No expense found with id {id}"),
        [only] => only.clone(),
        _ if matches.iter().any(|m| m == id) => id.to_string(),
        _ => anyhow::bail!("Id prefix {id} matches {} expenses", matches.len()),
    };

    store.delete(&target)?;
    println!("Deleted expense {}", short_id(&target));
    Ok(())
}

/// Removes every record. Asks for confirmation unless `assume_yes` is set.
pub fn clear<S: ExpenseStorage>(store: &mut ExpenseStore<S>, assume_yes: bool) -> Result<()> {
    if store.is_empty() {
        println!("No expenses to clear.");
        return Ok(());
    }

    if !assume_yes {
        let term = console::Term::stderr();
        term.write_str("Are you sure you want to clear all data? This cannot be undone. [y/N] ")?;
        let answer = term.read_line()?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Aborted.");
            return Ok(());
        }
    }

    let count = store.expenses().len();
    store.clear()?;
    println!("Cleared {count} expenses.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;
    use chrono::{Duration, Utc};

    fn config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_add_rejects_invalid_amount() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        assert!(add(&mut store, "abc", Category::Other, None, &config()).is_err());
        assert!(add(&mut store, "-3", Category::Other, None, &config()).is_err());
        assert!(store.is_empty());

        let expense = add(&mut store, "99.5", Category::Shopping, None, &config()).unwrap();
        assert_eq!(expense.amount, 99.5);
        assert_eq!(expense.description, "Shopping");
        assert_eq!(store.expenses().len(), 1);
    }

    #[test]
    fn test_render_list() {
        console::set_colors_enabled(false);
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let expenses = vec![
            Expense {
                id: "aaaa1111-0000".to_string(),
                amount: 300.0,
                category: Category::Transport,
                description: "Cab".to_string(),
                date: (now - Duration::days(1)).to_rfc3339(),
            },
            Expense {
                id: "bbbb2222-0000".to_string(),
                amount: 150.0,
                category: Category::FoodAndDrink,
                description: "Lunch".to_string(),
                date: now.to_rfc3339(),
            },
        ];

        let output = render_list(&expenses, &now, &config());
        assert!(output.contains("1 today"));
        assert!(output.contains("bbbb2222"));
        assert!(output.contains("₹150.00"));
        // Newest first
        assert!(output.find("Lunch").unwrap() < output.find("Cab").unwrap());

        let empty = render_list(&[], &now, &config());
        assert!(empty.contains("No expenses recorded yet."));
    }

    #[test]
    fn test_delete_by_prefix() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        let expense = store
            .add(NewExpense::new(5.0, Category::Health, None).unwrap())
            .unwrap();

        assert!(delete(&mut store, "no-such-id").is_err());
        assert!(delete(&mut store, "").is_err());
        assert!(delete(&mut store, "   ").is_err());
        assert_eq!(store.expenses().len(), 1);

        delete(&mut store, short_id(&expense.id)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_with_assume_yes() {
        let mut store = ExpenseStore::load(MemoryStorage::new());
        store
            .add(NewExpense::new(5.0, Category::Utilities, None).unwrap())
            .unwrap();
        clear(&mut store, true).unwrap();
        assert!(store.is_empty());
    }
}
