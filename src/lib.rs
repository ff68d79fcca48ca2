/// dualchain - A console demo that chains two chat-model calls.
///
/// Each line typed at the prompt goes through two stages:
/// 1. Stage A rewrites it in cockney, using a rolling conversation summary as context
/// 2. Stage B translates Stage A's output back into plain English
///
/// After both stages succeed, the exchange is appended to a JSON Lines message
/// log and the summary is regenerated from it.
///
/// # Architecture
///
/// The system uses:
/// - reqwest for the `OpenAI`-compatible chat-completion endpoint
/// - serde/serde_json for the wire format and the message log
/// - crossterm for the colored message pretty-printer
/// - Tokio (current-thread) for the async runtime
///
/// # Example
///
/// ```no_run
/// use dualchain::ai::LlmClient;
/// use dualchain::core::config::AppConfig;
/// use dualchain::pipeline::Pipeline;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     dualchain::setup_logging();
///
///     let config = AppConfig::from_lookup(|key| match key {
///         "OPENAI_API_KEY" => Some("dummy_openai_key".to_string()),
///         "DUALCHAIN_HISTORY_PATH" => Some("/tmp/messages.jsonl".to_string()),
///         _ => None,
///     })?;
///
///     let client = LlmClient::new(&config)?;
///     let mut pipeline = Pipeline::open(client, &config).await?;
///
///     let run = pipeline.run("Where is the nearest pub?").await?;
///     println!("Cockney: {}", run.stage_a_output);
///     println!("Translated: {}", run.stage_b_output);
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod console;
pub mod core;
pub mod errors;
pub mod memory;
pub mod pipeline;

pub use errors::ChainError;

/// Configure logging for the console binary.
///
/// Logs go to stderr so they never interleave with the conversation on
/// stdout. The level comes from `RUST_LOG` and defaults to `warn`. Calling
/// this more than once is harmless.
///
/// # Example
///
/// ```
/// dualchain::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
