use super::ui;
use crate::core::aggregate;
use crate::core::config::AppConfig;
use crate::core::expense::{Category, Expense};
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use comfy_table::Cell;
use std::collections::BTreeMap;

/// Presentation-ready metrics for the dashboard view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub day_label: String,
    pub daily_total: f64,
    pub daily_goal: f64,
    pub budget_ratio: f64,
    pub over_budget: bool,
    pub category_totals: BTreeMap<Category, f64>,
}

impl DashboardSummary {
    pub fn compute<Tz>(expenses: &[Expense], now: &DateTime<Tz>, daily_goal: f64) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let daily_total = aggregate::daily_total(expenses, now);
        DashboardSummary {
            day_label: now.format("%A, %B %-d").to_string(),
            daily_total,
            daily_goal,
            budget_ratio: aggregate::budget_ratio(daily_total, daily_goal),
            over_budget: aggregate::is_over_budget(daily_total, daily_goal),
            category_totals: aggregate::category_totals(expenses),
        }
    }

    pub fn display_as_text(&self, config: &AppConfig) -> String {
        let symbol = &config.currency_symbol;

        let mut output = format!(
            "{}\n{}\n",
            ui::style_text("Today's Spending", ui::StyleType::Title),
            ui::style_text(&self.day_label, ui::StyleType::Subtle)
        );
        output.push_str(&format!(
            "\nTotal ({}): {}\n",
            ui::style_text(&config.currency, ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_amount(symbol, self.daily_total),
                ui::StyleType::TotalValue
            )
        ));

        output.push_str(&format!(
            "\n{}\n{} {:.0}%\n{}\n",
            ui::style_text("Daily Goal Status", ui::StyleType::TotalLabel),
            ui::budget_bar(self.budget_ratio, self.over_budget),
            self.budget_ratio * 100.0,
            ui::style_text(
                &format!(
                    "Budget goal: {} / day",
                    ui::format_amount(symbol, self.daily_goal)
                ),
                ui::StyleType::Subtle
            )
        ));

        output.push_str(&format!(
            "\n{}\n\n",
            ui::style_text("Spending by Category", ui::StyleType::Title)
        ));
        if self.category_totals.is_empty() {
            output.push_str("Add expenses to see the breakdown.");
            return output;
        }

        let grand_total: f64 = self.category_totals.values().sum();
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell(&format!("Total ({})", config.currency)),
            ui::header_cell("Share (%)"),
        ]);
        for (category, total) in &self.category_totals {
            let share = if grand_total > 0.0 {
                total / grand_total * 100.0
            } else {
                0.0
            };
            table.add_row(vec![
                Cell::new(format!("{} {}", category.icon(), category)),
                ui::amount_cell(symbol, *total),
                Cell::new(format!("{share:.1}%")),
            ]);
        }
        table.add_row(vec![
            Cell::new(ui::style_text("Total", ui::StyleType::TotalLabel)),
            ui::total_cell(symbol, grand_total),
            Cell::new(""),
        ]);

        output.push_str(&table.to_string());
        output
    }
}

pub fn run(expenses: &[Expense], config: &AppConfig) -> Result<()> {
    let summary = DashboardSummary::compute(expenses, &Local::now(), config.daily_goal);
    println!("{}", summary.display_as_text(config));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn expense(amount: f64, category: Category, date: DateTime<Utc>) -> Expense {
        Expense {
            id: format!("{category:?}-{amount}"),
            amount,
            category,
            description: category.label().to_string(),
            date: date.to_rfc3339(),
        }
    }

    #[test]
    fn test_compute_summary() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let expenses = vec![
            expense(150.0, Category::FoodAndDrink, now),
            expense(300.0, Category::Transport, now - Duration::days(1)),
        ];

        let summary = DashboardSummary::compute(&expenses, &now, 1000.0);
        assert_eq!(summary.daily_total, 150.0);
        assert_eq!(summary.budget_ratio, 0.15);
        assert!(!summary.over_budget);
        assert_eq!(summary.category_totals.len(), 2);
        assert_eq!(summary.day_label, "Sunday, June 15");
    }

    #[test]
    fn test_compute_over_budget_and_zero_goal() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let expenses = vec![expense(1500.0, Category::Shopping, now)];

        let summary = DashboardSummary::compute(&expenses, &now, 1000.0);
        assert_eq!(summary.budget_ratio, 1.0);
        assert!(summary.over_budget);

        let summary = DashboardSummary::compute(&[], &now, 0.0);
        assert_eq!(summary.daily_total, 0.0);
        assert_eq!(summary.budget_ratio, 1.0);
        assert!(summary.category_totals.is_empty());
    }

    #[test]
    fn test_display_as_text() {
        console::set_colors_enabled(false);
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let expenses = vec![
            expense(150.0, Category::FoodAndDrink, now),
            expense(50.0, Category::Health, now),
        ];
        let config = AppConfig::default();

        let text = DashboardSummary::compute(&expenses, &now, 1000.0).display_as_text(&config);
        assert!(text.contains("₹200.00"));
        assert!(text.contains("Food & Drink"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("Budget goal: ₹1000.00 / day"));

        let empty = DashboardSummary::compute(&[], &now, 1000.0).display_as_text(&config);
        assert!(empty.contains("Add expenses to see the breakdown."));
    }
}
