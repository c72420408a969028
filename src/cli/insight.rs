use super::ui;
use crate::core::config::AppConfig;
use crate::core::expense::Expense;
use crate::core::insight::{Insight, InsightProvider, request_insight};
use anyhow::Result;

/// Renders an insight for the terminal.
pub fn render(insight: &Insight) -> String {
    let mut output = format!(
        "{}  {}\n\n",
        ui::style_text("AI Spending Assistant", ui::StyleType::Title),
        ui::sentiment_badge(insight.sentiment)
    );
    output.push_str(&format!("\"{}\"\n\n", insight.summary));
    output.push_str(&ui::style_text(
        "SMART SAVING TIPS:",
        ui::StyleType::TotalLabel,
    ));
    for tip in &insight.tips {
        output.push_str(&format!("\n  💡 {tip}"));
    }
    output
}

/// Requests and prints an insight. Does nothing when there are no expenses.
/// Returns the insight that was shown, if any.
pub async fn run(
    provider: &dyn InsightProvider,
    expenses: &[Expense],
    config: &AppConfig,
) -> Result<Option<Insight>> {
    if expenses.is_empty() {
        println!("No expenses recorded yet. Add some before asking for an analysis.");
        return Ok(None);
    }

    let spinner = ui::new_spinner("Analyzing your spending habits...");
    let insight = request_insight(provider, expenses, &config.prompt_context()).await;
    spinner.finish_and_clear();

    println!("{}", render(&insight));
    Ok(Some(insight))
}
