//! Expense records and the categories they are filed under.

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    Transport,
    Shopping,
    Utilities,
    Entertainment,
    Health,
    Other,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 7] = [
        Category::FoodAndDrink,
        Category::Transport,
        Category::Shopping,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "Food & Drink",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }

    /// Returns the emoji shown next to the category in listings
    pub fn icon(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "🍽",
            Category::Transport => "🚗",
            Category::Shopping => "🛍",
            Category::Utilities => "⚡",
            Category::Entertainment => "🎬",
            Category::Health => "💊",
            Category::Other => "🏷",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "food&drink" | "food" | "food-drink" | "fooddrink" => Ok(Category::FoodAndDrink),
            "transport" => Ok(Category::Transport),
            "shopping" => Ok(Category::Shopping),
            "utilities" => Ok(Category::Utilities),
            "entertainment" => Ok(Category::Entertainment),
            "health" => Ok(Category::Health),
            "other" => Ok(Category::Other),
            _ => Err(anyhow!(
                "Invalid category: {}. Expected one of: {}",
                s,
                Category::ALL.map(|c| c.label()).join(", ")
            )),
        }
    }
}

/// A single logged outlay. Records are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    /// RFC 3339 creation timestamp.
    pub date: String,
}

impl Expense {
    /// Builds a record from user input, stamping it with a fresh id and `now`.
    pub fn create(input: NewExpense, now: DateTime<Utc>) -> Self {
        let description = match input.description {
            Some(d) if !d.trim().is_empty() => d.trim().to_string(),
            _ => input.category.label().to_string(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            amount: input.amount,
            category: input.category,
            description,
            date: now.to_rfc3339(),
        }
    }

    /// Parsed creation time, or `None` if the stored date is malformed.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.date).ok()
    }
}

/// User input for a record that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: f64,
    pub category: Category,
    pub description: Option<String>,
}

impl NewExpense {
    pub fn new(amount: f64, category: Category, description: Option<String>) -> Result<Self> {
        validate_amount(amount)?;
        Ok(Self {
            amount,
            category,
            description,
        })
    }
}

/// Parses a user-supplied amount, rejecting anything that is not a finite,
/// non-negative number.
pub fn parse_amount(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!("Amount is required");
    }
    let amount: f64 = trimmed
        .parse()
        .map_err(|_| anyhow!("Invalid amount: {trimmed}"))?;
    validate_amount(amount)?;
    Ok(amount)
}

/// Checks that `amount` is a finite, non-negative number.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        bail!("Amount must be a finite number");
    }
    if amount < 0.0 {
        bail!("Amount must not be negative: {amount}");
    }
    Ok(())
}
