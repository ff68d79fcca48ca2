#![allow(dead_code)]

use async_trait::async_trait;
use dualchain::ai::LanguageModel;
use dualchain::core::models::Turn;
use dualchain::errors::ChainError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<String, String>>,
    calls: Vec<Vec<Turn>>,
}

/// In-process model that answers from a fixed script and records every
/// conversation it was sent.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    script: Arc<Mutex<Script>>,
}

impl ScriptedModel {
    pub fn replying(replies: &[&str]) -> Self {
        let model = Self::default();
        for reply in replies {
            model.push_ok(reply);
        }
        model
    }

    pub fn push_ok(&self, reply: &str) {
        self.script
            .lock()
            .unwrap()
            .replies
            .push_back(Ok(reply.to_string()));
    }

    pub fn push_err(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .replies
            .push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn invoke(&self, conversation: &[Turn]) -> Result<String, ChainError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(conversation.to_vec());
        match script.replies.pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ChainError::Capability(message)),
            None => Err(ChainError::Capability("script exhausted".to_string())),
        }
    }
}

pub fn last_content(conversation: &[Turn]) -> &str {
    conversation
        .last()
        .map(|turn| turn.content.as_str())
        .unwrap_or_default()
}
