use tracing::info;

use super::stages::{back_translate, stylize};
use crate::ai::client::LanguageModel;
use crate::core::config::AppConfig;
use crate::core::models::{PipelineRun, Turn};
use crate::errors::ChainError;
use crate::memory::{MessageLog, SummaryMemory, update_summary};

/// Runs Stage A then Stage B and commits each completed exchange to the
/// summary and the log.
pub struct Pipeline<M> {
    model: M,
    memory: SummaryMemory,
    log: MessageLog,
    summarize_translation: bool,
}

impl<M: LanguageModel> Pipeline<M> {
    pub fn new(
        model: M,
        memory: SummaryMemory,
        log: MessageLog,
        summarize_translation: bool,
    ) -> Self {
        Self {
            model,
            memory,
            log,
            summarize_translation,
        }
    }

    /// Open the configured log and rebuild the summary from it.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Persistence`] if the log cannot be read, or the
    /// model's error if the replay summary fails.
    pub async fn open(model: M, config: &AppConfig) -> Result<Self, ChainError> {
        let log = MessageLog::open(&config.history_path)?;
        let memory = SummaryMemory::rebuild(&model, log.all()).await?;

        info!(
            "Resuming conversation with {} stored exchanges",
            log.exchange_count()
        );

        Ok(Self::new(model, memory, log, config.summarize_translation))
    }

    /// One full turn: style, back-translate, then commit.
    ///
    /// Nothing is committed unless both stages and the summary call succeed.
    /// The new summary is stored only after the log append lands.
    ///
    /// # Errors
    ///
    /// Propagates the first failing model call or log write unchanged.
    pub async fn run(&mut self, input: &str) -> Result<PipelineRun, ChainError> {
        let stage_a_output = stylize(&self.model, input, self.memory.read()).await?;
        let stage_b_output = back_translate(&self.model, &stage_a_output).await?;

        let exchange = self.exchange_turns(input, &stage_a_output, &stage_b_output);
        let next_summary = update_summary(&self.model, self.memory.read(), &exchange).await?;

        self.log.append_all(exchange)?;
        self.memory.commit(next_summary);

        info!("Turn {} committed", self.log.exchange_count());

        Ok(PipelineRun {
            input: input.to_string(),
            stage_a_output,
            stage_b_output,
        })
    }

    fn exchange_turns(&self, input: &str, stage_a_output: &str, stage_b_output: &str) -> Vec<Turn> {
        let mut turns = vec![Turn::human(input), Turn::ai(stage_a_output)];
        if self.summarize_translation {
            turns.push(Turn::ai(stage_b_output));
        }
        turns
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        self.memory.read()
    }

    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }
}
