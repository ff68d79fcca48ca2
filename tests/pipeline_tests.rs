mod common;

use common::{ScriptedModel, last_content};
use dualchain::ai::prompt_builder::{STYLE_SYSTEM_PROMPT, TRANSLATE_SYSTEM_PROMPT};
use dualchain::core::config::AppConfig;
use dualchain::core::models::{Role, Turn};
use dualchain::errors::ChainError;
use dualchain::memory::{MessageLog, SummaryMemory};
use dualchain::pipeline::Pipeline;
use std::path::Path;
use tempfile::tempdir;

fn pipeline_at(
    path: &Path,
    model: ScriptedModel,
    summarize_translation: bool,
) -> Pipeline<ScriptedModel> {
    let log = MessageLog::open(path).unwrap();
    Pipeline::new(model, SummaryMemory::new(), log, summarize_translation)
}

#[tokio::test]
async fn test_run_sequences_stage_a_then_stage_b() {
    let dir = tempdir().unwrap();
    let model = ScriptedModel::replying(&[
        "Where's the nearest boozer, guv?",
        "Where is the nearest pub, sir?",
        "The human asked where the nearest pub is.",
    ]);
    let mut pipeline = pipeline_at(&dir.path().join("messages.jsonl"), model.clone(), false);

    let run = pipeline.run("Where is the nearest pub?").await.unwrap();

    assert_eq!(run.input, "Where is the nearest pub?");
    assert_eq!(run.stage_a_output, "Where's the nearest boozer, guv?");
    assert_eq!(run.stage_b_output, "Where is the nearest pub, sir?");

    let calls = model.calls();
    assert_eq!(calls.len(), 3);

    // Stage A: style prompt with the raw input and no summary yet.
    assert_eq!(calls[0][0], Turn::system(STYLE_SYSTEM_PROMPT));
    assert_eq!(last_content(&calls[0]), "Where is the nearest pub?");
    assert_eq!(calls[0].len(), 2);

    // Stage B sees Stage A's output verbatim and nothing else.
    assert_eq!(
        calls[1],
        vec![
            Turn::system(TRANSLATE_SYSTEM_PROMPT),
            Turn::human("Where's the nearest boozer, guv?"),
        ]
    );

    assert_eq!(pipeline.summary(), "The human asked where the nearest pub is.");
}

#[tokio::test]
async fn test_stage_a_failure_skips_stage_b_and_commits_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("messages.jsonl");
    let model = ScriptedModel::default();
    model.push_err("quota exceeded");
    let mut pipeline = pipeline_at(&path, model.clone(), false);

    let err = pipeline.run("hello").await.unwrap_err();

    assert!(matches!(err, ChainError::Capability(ref msg) if msg == "quota exceeded"));
    assert_eq!(model.call_count(), 1);
    assert_eq!(pipeline.summary(), "");
    assert!(pipeline.log().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_stage_b_failure_commits_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("messages.jsonl");
    let model = ScriptedModel::replying(&["Awright?"]);
    model.push_err("connection reset");
    let mut pipeline = pipeline_at(&path, model.clone(), false);

    assert!(pipeline.run("hello").await.is_err());

    assert_eq!(model.call_count(), 2);
    assert_eq!(pipeline.summary(), "");
    assert!(pipeline.log().is_empty());
}

#[tokio::test]
async fn test_summary_failure_commits_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("messages.jsonl");
    let model = ScriptedModel::replying(&[
        "first a",
        "first b",
        "summary one",
        "second a",
        "second b",
    ]);
    model.push_err("model overloaded");
    let mut pipeline = pipeline_at(&path, model.clone(), false);

    pipeline.run("first").await.unwrap();
    assert!(pipeline.run("second").await.is_err());

    assert_eq!(pipeline.summary(), "summary one");
    assert_eq!(pipeline.log().exchange_count(), 1);
    assert_eq!(MessageLog::open(&path).unwrap().exchange_count(), 1);
}

#[tokio::test]
async fn test_n_turns_make_n_exchanges_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("messages.jsonl");
    let model = ScriptedModel::default();
    let mut pipeline = pipeline_at(&path, model.clone(), false);

    for i in 1..=3 {
        model.push_ok(&format!("cockney {i}"));
        model.push_ok(&format!("plain {i}"));
        model.push_ok(&format!("summary {i}"));
        pipeline.run(&format!("input {i}")).await.unwrap();
    }

    let expected = vec![
        Turn::human("input 1"),
        Turn::ai("cockney 1"),
        Turn::human("input 2"),
        Turn::ai("cockney 2"),
        Turn::human("input 3"),
        Turn::ai("cockney 3"),
    ];
    assert_eq!(pipeline.log().exchange_count(), 3);
    assert_eq!(pipeline.log().all(), expected.as_slice());
    assert_eq!(MessageLog::open(&path).unwrap().all(), expected.as_slice());
}

#[tokio::test]
async fn test_summary_threads_from_previous_turn() {
    let dir = tempdir().unwrap();
    let model = ScriptedModel::replying(&[
        "a1", "b1", "summary after one",
        "a2", "b2", "summary after two",
    ]);
    let mut pipeline = pipeline_at(&dir.path().join("messages.jsonl"), model.clone(), false);

    pipeline.run("one").await.unwrap();
    pipeline.run("two").await.unwrap();

    let calls = model.calls();

    // Turn two's Stage A reads the summary written by turn one.
    assert_eq!(calls[3][1], Turn::system("summary after one"));
    assert_eq!(last_content(&calls[3]), "two");

    // Turn two's summary call starts from turn one's summary and only adds
    // turn two's exchange.
    let summary_prompt = last_content(&calls[5]);
    assert!(summary_prompt.contains("Current summary:\nsummary after one\n"));
    assert!(summary_prompt.contains("New lines of conversation:\nHuman: two\nAI: a2\n"));
    assert!(!summary_prompt.contains("Human: one"));

    assert_eq!(pipeline.summary(), "summary after two");
}

#[tokio::test]
async fn test_summarize_translation_flag_adds_stage_b_turn() {
    let dir = tempdir().unwrap();
    let model = ScriptedModel::replying(&["Awright, guv?", "Hello, sir?", "Greetings exchanged."]);
    let mut pipeline = pipeline_at(&dir.path().join("messages.jsonl"), model.clone(), true);

    pipeline.run("hello").await.unwrap();

    let summary_prompt = last_content(&model.calls()[2]).to_string();
    assert!(summary_prompt.contains("Human: hello\nAI: Awright, guv?\nAI: Hello, sir?"));
    assert_eq!(
        pipeline.log().all(),
        &[Turn::human("hello"), Turn::ai("Awright, guv?"), Turn::ai("Hello, sir?")]
    );
    assert_eq!(pipeline.log().exchange_count(), 1);
}

#[tokio::test]
async fn test_open_rebuilds_summary_from_stored_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("messages.jsonl");
    {
        let mut log = MessageLog::open(&path).unwrap();
        log.append_all(vec![Turn::human("earlier"), Turn::ai("earlier, innit")])
            .unwrap();
    }

    let config = AppConfig::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "DUALCHAIN_HISTORY_PATH" => Some(path.display().to_string()),
        _ => None,
    })
    .unwrap();

    let model = ScriptedModel::replying(&["Replayed summary."]);
    let pipeline = Pipeline::open(model.clone(), &config).await.unwrap();

    assert_eq!(pipeline.summary(), "Replayed summary.");
    assert_eq!(pipeline.log().exchange_count(), 1);
    assert_eq!(model.call_count(), 1);
    assert_eq!(model.calls()[0][0].role, Role::Human);
}
