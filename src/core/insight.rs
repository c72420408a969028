//! AI spending assessment: prompt construction, response validation and the
//! fallback used whenever a live assessment cannot be produced.
//!
//! Callers only ever see an [`Insight`]. Transport failures, missing API keys
//! and schema violations are all logged and collapsed into
//! [`Insight::fallback`].

use crate::core::expense::Expense;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Frugal,
    Balanced,
    Extravagant,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [
        Sentiment::Frugal,
        Sentiment::Balanced,
        Sentiment::Extravagant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Frugal => "frugal",
            Sentiment::Balanced => "balanced",
            Sentiment::Extravagant => "extravagant",
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frugal" => Ok(Sentiment::Frugal),
            "balanced" => Ok(Sentiment::Balanced),
            "extravagant" => Ok(Sentiment::Extravagant),
            other => Err(InsightError::InvalidSentiment(other.to_string())),
        }
    }
}

/// A validated assessment of a set of expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub summary: String,
    pub tips: Vec<String>,
    pub sentiment: Sentiment,
}

impl Insight {
    /// The fixed insight shown when no live assessment is available.
    pub fn fallback() -> Self {
        Insight {
            summary: "I couldn't analyze your spending right now, but keeping track of every \
                      expense is the first step to success!"
                .to_string(),
            tips: vec![
                "Try setting a daily spending limit.".to_string(),
                "Always review your non-essential purchases.".to_string(),
            ],
            sentiment: Sentiment::Balanced,
        }
    }
}

/// Reasons a live insight could not be produced. Only ever logged.
#[derive(Debug, Error, PartialEq)]
pub enum InsightError {
    #[error("No expenses to analyze")]
    NoExpenses,

    #[error("AI request failed: {0}")]
    Request(String),

    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Response is not a JSON object")]
    NotAnObject,

    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Response field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Response sentiment is not a known label: {0}")]
    InvalidSentiment(String),
}

/// Currency and locale the assessment should be phrased for.
#[derive(Debug, Clone)]
pub struct PromptContext {
    pub currency: String,
    pub locale: String,
}

impl Default for PromptContext {
    fn default() -> Self {
        PromptContext {
            currency: "INR".to_string(),
            locale: "Indian".to_string(),
        }
    }
}

/// Everything a provider needs to send: the instruction text and the output
/// schema the service must follow.
#[derive(Debug, Clone)]
pub struct InsightRequest {
    pub prompt: String,
    pub schema: Value,
}

/// An external text-generation service that honours a JSON output schema.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Sends the request and returns the raw text produced by the model.
    async fn generate(&self, request: &InsightRequest) -> anyhow::Result<String>;
}

/// Builds the prompt for `records`. Only amount, category and description are
/// shared with the service.
pub fn build_request(records: &[Expense], context: &PromptContext) -> InsightRequest {
    let expense_data = Value::Array(
        records
            .iter()
            .map(|e| {
                json!({
                    "amount": e.amount,
                    "category": e.category.label(),
                    "description": e.description,
                })
            })
            .collect(),
    );

    let prompt = format!(
        "Analyze these daily expenses (amounts in {currency}) and provide a JSON response: \
         {expense_data}.\n\
         Evaluate the spending habits in the context of a {locale} user and summarize today's \
         spending in 1-2 sentences. Suggest exactly 2 actionable saving tips relevant to the \
         {locale} lifestyle, with amounts in {currency}.\n\
         Assign a sentiment of 'frugal' (spent very little or only on essentials), 'balanced' \
         (normal spending), or 'extravagant' (many luxury or non-essential items).",
        currency = context.currency,
        locale = context.locale,
    );

    InsightRequest {
        prompt,
        schema: response_schema(),
    }
}

/// Output schema declared to the service.
pub fn response_schema() -> Value {
    let labels: Vec<&str> = Sentiment::ALL.iter().map(|s| s.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A short summary of today's spending."
            },
            "tips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 2,
                "maxItems": 2,
                "description": "List of 2 saving tips."
            },
            "sentiment": {
                "type": "STRING",
                "enum": labels
            }
        },
        "required": ["summary", "tips", "sentiment"]
    })
}

/// Validates raw model output. The declared schema is not trusted: field
/// presence, types and the sentiment label are all checked here.
pub fn parse_insight(raw: &str) -> Result<Insight, InsightError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| InsightError::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(InsightError::NotAnObject)?;

    let summary = field(object, "summary")?
        .as_str()
        .ok_or_else(|| invalid("summary", "expected text"))?;
    if summary.trim().is_empty() {
        return Err(invalid("summary", "empty text"));
    }

    let tips = field(object, "tips")?
        .as_array()
        .ok_or_else(|| invalid("tips", "expected an array"))?;
    if tips.is_empty() {
        return Err(invalid("tips", "empty array"));
    }
    let tips = tips
        .iter()
        .map(|tip| {
            tip.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid("tips", "expected an array of text"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let sentiment = match field(object, "sentiment")? {
        Value::String(label) => label.parse::<Sentiment>()?,
        other => return Err(InsightError::InvalidSentiment(other.to_string())),
    };

    Ok(Insight {
        summary: summary.to_string(),
        tips,
        sentiment,
    })
}

fn field<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, InsightError> {
    object.get(name).ok_or(InsightError::MissingField(name))
}

fn invalid(field: &'static str, reason: &str) -> InsightError {
    InsightError::InvalidField {
        field,
        reason: reason.to_string(),
    }
}

/// Performs one request against `provider` without retrying, surfacing the
/// failure reason.
pub async fn try_request_insight(
    provider: &dyn InsightProvider,
    records: &[Expense],
    context: &PromptContext,
) -> Result<Insight, InsightError> {
    if records.is_empty() {
        return Err(InsightError::NoExpenses);
    }

    let request = build_request(records, context);
    debug!(expenses = records.len(), "Requesting spending insight");

    let raw = provider
        .generate(&request)
        .await
        .map_err(|e| InsightError::Request(format!("{e:#}")))?;
    debug!(response = %raw, "Received insight response");

    parse_insight(&raw)
}

/// Produces an insight for `records`. Never fails: any error is logged and
/// replaced by [`Insight::fallback`].
pub async fn request_insight(
    provider: &dyn InsightProvider,
    records: &[Expense],
    context: &PromptContext,
) -> Insight {
    match try_request_insight(provider, records, context).await {
        Ok(insight) => insight,
        Err(e) => {
            warn!(error = %e, "AI analysis failed, using fallback insight");
            Insight::fallback()
        }
    }
}
