use serde_json::json;
use spendwise::AppCommand;
use spendwise::core::config::AppConfig;
use spendwise::core::insight::Insight;
use spendwise::providers::GeminiProvider;
use spendwise::core::expense::{Category, Expense};
use spendwise::store::{DiskStorage, ExpenseStorage, STORAGE_KEY};
use std::path::Path;
use tracing::info;

mod test_utils {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const MODEL: &str = "gemini-it";

    pub async fn create_gemini_mock_server(
        api_key: &str,
        model_text: &str,
        expected_calls: u64,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v1beta/models/{MODEL}:generateContent");
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": model_text }] } }]
        });

        Mock::given(method("POST"))
            .and(path(url_path))
            .and(header("x-goog-api-key", api_key))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(
        dir: &std::path::Path,
        data_dir: &std::path::Path,
        base_url: &str,
        api_key_env: &str,
    ) -> std::path::PathBuf {
        let config_path = dir.join("config.yaml");
        let content = format!(
            r#"
currency: "INR"
currency_symbol: "₹"
locale: "Indian"
daily_goal: 1000
data_path: "{}"
providers:
  gemini:
    base_url: "{}"
    model: "{}"
    api_key_env: "{}"
"#,
            data_dir.display(),
            base_url,
            MODEL,
            api_key_env
        );
        std::fs::write(&config_path, content).expect("Failed to write config file");
        config_path
    }
}

fn saved_expenses(data_dir: &Path) -> Vec<Expense> {
    let storage = DiskStorage::open(data_dir).expect("Failed to open data store");
    storage
        .read(STORAGE_KEY)
        .expect("Failed to read data store")
        .map(|bytes| serde_json::from_slice(&bytes).expect("Saved data is not valid JSON"))
        .unwrap_or_default()
}

async fn run(command: AppCommand, config_path: &Path) {
    let result = spendwise::run_command(command, Some(config_path.to_str().unwrap())).await;
    assert!(
        result.is_ok(),
        "Command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let api_key_env = "SPENDWISE_IT_FULL_FLOW_KEY";
    // SAFETY: the variable name is unique to this test
    unsafe { std::env::set_var(api_key_env, "it-key") };

    let insight_text = json!({
        "summary": "You had a modest lunch and a commute today.",
        "tips": ["Pack lunch twice a week.", "Use a monthly metro pass."],
        "sentiment": "frugal"
    })
    .to_string();
    let mock_server = test_utils::create_gemini_mock_server("it-key", &insight_text, 1).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    let config_path =
        test_utils::write_config(temp_dir.path(), &data_dir, &mock_server.uri(), api_key_env);

    run(
        AppCommand::Add {
            amount: "150".to_string(),
            category: Category::FoodAndDrink,
            description: Some("Thali".to_string()),
        },
        &config_path,
    )
    .await;
    run(
        AppCommand::Add {
            amount: "300".to_string(),
            category: Category::Transport,
            description: None,
        },
        &config_path,
    )
    .await;

    let saved = saved_expenses(&data_dir);
    info!(?saved, "Saved expenses after adding");
    assert_eq!(saved.len(), 2);
    // Newest first
    assert_eq!(saved[0].category, Category::Transport);
    assert_eq!(saved[0].description, "Transport");
    assert_eq!(saved[1].description, "Thali");

    run(AppCommand::List, &config_path).await;
    run(AppCommand::Dashboard, &config_path).await;
    run(AppCommand::Insight, &config_path).await;

    run(
        AppCommand::Delete {
            id: saved[0].id.clone(),
        },
        &config_path,
    )
    .await;
    let remaining = saved_expenses(&data_dir);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, saved[1].id);

    run(AppCommand::Clear { yes: true }, &config_path).await;
    assert!(saved_expenses(&data_dir).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_is_rejected() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    let config_path = test_utils::write_config(
        temp_dir.path(),
        &data_dir,
        "http://127.0.0.1:9",
        "SPENDWISE_IT_UNUSED_KEY",
    );

    let result = spendwise::run_command(
        AppCommand::Add {
            amount: "twelve".to_string(),
            category: Category::Other,
            description: None,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    assert!(result.is_err());
    assert!(saved_expenses(&data_dir).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_insight_without_api_key_falls_back() {
    // Never set, so the provider fails before sending anything
    let api_key_env = "SPENDWISE_IT_MISSING_KEY";
    let mock_server = test_utils::create_gemini_mock_server("anything", "{}", 0).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    let config_path =
        test_utils::write_config(temp_dir.path(), &data_dir, &mock_server.uri(), api_key_env);

    run(
        AppCommand::Add {
            amount: "42".to_string(),
            category: Category::Shopping,
            description: None,
        },
        &config_path,
    )
    .await;
    run(AppCommand::Insight, &config_path).await;

    let config = AppConfig::load_from_path(&config_path).expect("Failed to load config");
    let provider = GeminiProvider::new(&config.providers.gemini);
    let expenses = saved_expenses(&data_dir);
    let shown = spendwise::cli::insight::run(&provider, &expenses, &config)
        .await
        .expect("Insight command failed");
    assert_eq!(shown, Some(Insight::fallback()));
}

#[test_log::test(tokio::test)]
async fn test_insight_with_no_expenses_skips_request() {
    let mock_server = test_utils::create_gemini_mock_server("k", "{}", 0).await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    let config_path = test_utils::write_config(
        temp_dir.path(),
        &data_dir,
        &mock_server.uri(),
        "SPENDWISE_IT_EMPTY_KEY",
    );

    run(AppCommand::Insight, &config_path).await;
    run(AppCommand::Dashboard, &config_path).await;
}

#[test_log::test(tokio::test)]
async fn test_corrupt_data_starts_empty() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = temp_dir.path().join("data");
    {
        let storage = DiskStorage::open(&data_dir).expect("Failed to open data store");
        storage
            .write(STORAGE_KEY, b"{definitely not a list")
            .expect("Failed to seed data store");
    }
    let config_path = test_utils::write_config(
        temp_dir.path(),
        &data_dir,
        "http://127.0.0.1:9",
        "SPENDWISE_IT_CORRUPT_KEY",
    );

    run(AppCommand::Dashboard, &config_path).await;
    run(
        AppCommand::Add {
            amount: "5".to_string(),
            category: Category::Health,
            description: Some("Bandages".to_string()),
        },
        &config_path,
    )
    .await;

    let saved = saved_expenses(&data_dir);
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].description, "Bandages");
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("nope.yaml");

    let result = spendwise::run_command(AppCommand::List, Some(missing.to_str().unwrap())).await;

    let err = result.expect_err("Missing config should fail");
    assert!(format!("{err:#}").contains("Failed to read config file"));
}
