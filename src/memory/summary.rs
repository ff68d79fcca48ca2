use tracing::{debug, info};

use crate::ai::client::LanguageModel;
use crate::ai::prompt_builder::build_summary_prompt;
use crate::core::models::Turn;
use crate::errors::ChainError;

/// Regenerate the running summary from the previous one plus `new_turns`.
///
/// The model rewrites the whole summary on every call rather than appending
/// to it. With no new turns the current summary is returned without a call.
///
/// # Errors
///
/// Propagates the model's [`ChainError::Capability`] unchanged.
pub async fn update_summary<M>(
    model: &M,
    current_summary: &str,
    new_turns: &[Turn],
) -> Result<String, ChainError>
where
    M: LanguageModel + ?Sized,
{
    if new_turns.is_empty() {
        return Ok(current_summary.to_string());
    }

    debug!(
        "Summarizing {} new turns onto a {}-char summary",
        new_turns.len(),
        current_summary.len()
    );

    let summary = model
        .invoke(&build_summary_prompt(current_summary, new_turns))
        .await?;
    Ok(summary.trim().to_string())
}

/// Single rolling summary of the conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryMemory {
    summary: String,
}

impl SummaryMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_summary(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }

    /// Rebuild the summary by replaying a stored history in one call.
    ///
    /// # Errors
    ///
    /// Propagates the model's [`ChainError::Capability`] unchanged.
    pub async fn rebuild<M>(model: &M, history: &[Turn]) -> Result<Self, ChainError>
    where
        M: LanguageModel + ?Sized,
    {
        if history.is_empty() {
            return Ok(Self::new());
        }

        info!("Rebuilding summary from {} stored turns", history.len());
        let summary = update_summary(model, "", history).await?;
        Ok(Self::with_summary(summary))
    }

    #[must_use]
    pub fn read(&self) -> &str {
        &self.summary
    }

    /// Summarize `new_turns` and store the result in one step.
    ///
    /// Callers that must land another write between computing and storing
    /// the summary, as [`crate::pipeline::Pipeline::run`] does with the log
    /// append, call [`update_summary`] and then [`SummaryMemory::commit`].
    ///
    /// # Errors
    ///
    /// Propagates the model's [`ChainError::Capability`]; the stored summary
    /// is left as it was.
    pub async fn update<M>(&mut self, model: &M, new_turns: &[Turn]) -> Result<(), ChainError>
    where
        M: LanguageModel + ?Sized,
    {
        let next = update_summary(model, &self.summary, new_turns).await?;
        self.commit(next);
        Ok(())
    }

    /// Replace the stored summary. The only place it changes.
    pub fn commit(&mut self, summary: String) {
        self.summary = summary;
    }
}
