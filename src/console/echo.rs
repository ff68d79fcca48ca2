//! Verbose mode: show each outgoing conversation before the model sees it.

use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;

use super::printer::render_messages;
use crate::ai::client::LanguageModel;
use crate::core::models::Turn;
use crate::errors::ChainError;

/// Wraps a model and renders every conversation to `sink` before
/// delegating. With no sink it is a plain pass-through.
pub struct EchoingModel<M> {
    inner: M,
    sink: Option<Mutex<Box<dyn Write + Send>>>,
}

impl<M> EchoingModel<M> {
    pub fn new(inner: M, sink: Box<dyn Write + Send>) -> Self {
        Self {
            inner,
            sink: Some(Mutex::new(sink)),
        }
    }

    pub fn silent(inner: M) -> Self {
        Self { inner, sink: None }
    }

    /// Echo to stdout when `verbose` is set.
    pub fn stdout(inner: M, verbose: bool) -> Self {
        if verbose {
            Self::new(inner, Box::new(io::stdout()))
        } else {
            Self::silent(inner)
        }
    }

    #[must_use]
    pub fn inner(&self) -> &M {
        &self.inner
    }

    fn echo(&self, conversation: &[Turn]) -> Result<(), ChainError> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };

        let mut out = sink
            .lock()
            .map_err(|_| ChainError::Console("echo sink lock poisoned".to_string()))?;
        out.write_all(render_messages(conversation).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| ChainError::Console(e.to_string()))
    }
}

#[async_trait]
impl<M: LanguageModel> LanguageModel for EchoingModel<M> {
    async fn invoke(&self, conversation: &[Turn]) -> Result<String, ChainError> {
        self.echo(conversation)?;
        self.inner.invoke(conversation).await
    }
}
