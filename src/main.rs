use anyhow::Result;
use dualchain::ai::LlmClient;
use dualchain::console::{ConsoleLoop, EchoingModel};
use dualchain::core::config::AppConfig;
use dualchain::pipeline::Pipeline;
use std::io;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    dualchain::setup_logging();

    let config = AppConfig::from_env().inspect_err(|e| error!("Config error: {}", e))?;
    info!(
        "Using model {} with history at {}",
        config.openai_model,
        config.history_path.display()
    );

    let client = EchoingModel::stdout(LlmClient::new(&config)?, config.verbose);
    let mut pipeline = Pipeline::open(client, &config)
        .await
        .inspect_err(|e| error!("Failed to load conversation: {}", e))?;

    let mut console = ConsoleLoop::new(io::stdin().lock(), io::stdout());
    console
        .run(&mut pipeline)
        .await
        .inspect_err(|e| error!("Conversation aborted: {}", e))?;

    Ok(())
}
