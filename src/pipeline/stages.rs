use tracing::info;

use crate::ai::client::LanguageModel;
use crate::ai::prompt_builder::{build_style_prompt, build_translation_prompt};
use crate::errors::ChainError;

/// Stage A: rewrite `input` in cockney, with the running summary as context.
///
/// # Errors
///
/// Propagates the model's [`ChainError::Capability`] unchanged.
pub async fn stylize<M>(model: &M, input: &str, summary: &str) -> Result<String, ChainError>
where
    M: LanguageModel + ?Sized,
{
    info!("Stage A: styling {} chars of input", input.len());
    model.invoke(&build_style_prompt(input, summary)).await
}

/// Stage B: translate Stage A's output back into plain English.
///
/// # Errors
///
/// Propagates the model's [`ChainError::Capability`] unchanged.
pub async fn back_translate<M>(model: &M, stylized: &str) -> Result<String, ChainError>
where
    M: LanguageModel + ?Sized,
{
    info!("Stage B: translating {} chars back", stylized.len());
    model.invoke(&build_translation_prompt(stylized)).await
}
