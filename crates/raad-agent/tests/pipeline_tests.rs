// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the chat pipeline over fixture datasets.

use raad_agent::{CHART_CONTENT, DisplayAction, SessionSettings};
use raad_core::{DatasetName, ErrorKind, QueryResult, RaadError, ResponseType, Role};
use raad_test_utils::TestHarness;
use serde_json::json;

#[tokio::test]
async fn scalar_answer_adds_two_turns() {
    let mut harness = TestHarness::builder()
        .with_answers(vec![json!(1234567890)])
        .build()
        .unwrap();

    let reply = harness.ask("What is the total revenue?").await.unwrap();
    assert_eq!(reply.display, DisplayAction::Text("1234567890".into()));

    let history = harness.session.history().all();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role(), Role::User);
    assert_eq!(history[0].content(), "What is the total revenue?");
    assert_eq!(history[1].role(), Role::Assistant);
    assert_eq!(history[1].content(), "1234567890");
    assert_eq!(history[1].response_type(), Some(ResponseType::Text));
}

#[tokio::test]
async fn engine_error_becomes_text_and_handoff_is_removed() {
    let mut harness = TestHarness::builder().with_error("timeout").build().unwrap();

    let reply = harness.ask("Slow question").await.unwrap();
    assert_eq!(reply.display, DisplayAction::Text("Error: timeout".into()));
    assert_eq!(reply.error_type, Some(ErrorKind::Timeout));
    assert_eq!(harness.session.history().len(), 2);
    let last = harness.session.history().last().unwrap();
    assert_eq!(last.error_kind(), Some(ErrorKind::Timeout));

    let calls = harness.engine.calls().await;
    assert_eq!(calls.len(), 1);
    assert!(calls[0].data_existed);
    assert!(!calls[0].data_path.exists());
}

#[tokio::test]
async fn handoff_is_removed_after_success() {
    let mut harness = TestHarness::builder()
        .with_answers(vec![json!("fine")])
        .build()
        .unwrap();
    harness.ask("Which sector is largest?").await.unwrap();
    let calls = harness.engine.calls().await;
    assert!(calls[0].data_existed);
    assert!(!calls[0].data_path.exists());
}

#[tokio::test]
async fn unknown_dataset_never_reaches_the_engine() {
    let harness = TestHarness::builder().build().unwrap();
    let err = harness.dispatcher.dispatch("q", "unknown").await.unwrap_err();
    assert!(matches!(err, RaadError::UnknownDataset(name) if name == "unknown"));
    assert_eq!(harness.engine.call_count().await, 0);
}

#[tokio::test]
async fn selected_dataset_is_handed_to_the_engine() {
    let mut harness = TestHarness::builder().build().unwrap();
    harness.session.select_dataset("ratios").unwrap();
    harness.ask("Average ROE?").await.unwrap();

    let calls = harness.engine.calls().await;
    assert_eq!(calls[0].dataset, DatasetName::Ratios);
    assert_eq!(calls[0].question, "Average ROE?");
    assert_eq!(calls[0].header.as_deref(), Some("company_name,fiscal_year,ratio,value"));
}

#[tokio::test]
async fn table_answers_record_row_counts() {
    let mut harness = TestHarness::builder()
        .with_answers(vec![json!({
            "value": {"columns": ["company_name", "revenue"], "rows": [["A", 1], ["B", 2]]},
            "type": "dataframe",
            "last_code_executed": "result = df[['company_name', 'revenue']]"
        })])
        .build()
        .unwrap();

    let reply = harness.ask("Revenue by company").await.unwrap();
    let DisplayAction::Table(table) = &reply.display else {
        panic!("expected a table, got {:?}", reply.display);
    };
    assert_eq!(table.row_count(), 2);
    assert_eq!(reply.code.as_deref(), Some("result = df[['company_name', 'revenue']]"));

    let last = harness.session.history().last().unwrap();
    assert_eq!(last.content(), "2 rows");
    assert_eq!(last.response_type(), Some(ResponseType::Dataframe));
    assert!(last.has_code());
}

#[tokio::test]
async fn existing_png_is_a_chart_and_missing_png_is_text() {
    let mut harness = TestHarness::builder().build().unwrap();
    let chart = harness.data_dir().join("top5.png");
    std::fs::write(&chart, b"\x89PNG").unwrap();
    let missing = harness.data_dir().join("gone.png");

    harness.engine.push_answer(json!(chart.to_string_lossy())).await;
    harness.engine.push_answer(json!(missing.to_string_lossy())).await;

    let reply = harness.ask("Bar chart of top 5").await.unwrap();
    assert_eq!(reply.display, DisplayAction::Chart(chart.clone()));
    let last = harness.session.history().last().unwrap();
    assert_eq!(last.content(), CHART_CONTENT);
    assert_eq!(last.artifact(), Some(chart.as_path()));

    let reply = harness.ask("Another chart").await.unwrap();
    assert_eq!(
        reply.display,
        DisplayAction::Text(missing.to_string_lossy().into_owned())
    );
    assert_eq!(harness.session.history().len(), 4);
}

#[tokio::test]
async fn other_strings_are_text() {
    let harness = TestHarness::builder()
        .with_answers(vec![json!("Energy has 1 company")])
        .build()
        .unwrap();
    let outcome = harness.dispatcher.dispatch("q", "filings").await.unwrap();
    assert_eq!(outcome.result, QueryResult::Text("Energy has 1 company".into()));
}

#[tokio::test]
async fn invalid_questions_record_nothing() {
    let settings = SessionSettings {
        max_question_len: 10,
        ..SessionSettings::default()
    };
    let mut harness = TestHarness::builder().with_settings(settings).build().unwrap();

    for question in ["", "   ", "ab", " a\u{0}b ", "this question is far too long"] {
        let err = harness.ask(question).await.unwrap_err();
        assert!(matches!(err, RaadError::InvalidQuestion(_)));
    }
    assert!(harness.session.history().is_empty());
    assert_eq!(harness.engine.call_count().await, 0);
}

#[tokio::test]
async fn missing_dataset_file_is_fatal() {
    let mut harness = TestHarness::builder()
        .without_dataset(DatasetName::Facts)
        .build()
        .unwrap();

    let err = harness.ask("Revenue by year").await.unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, RaadError::DataUnavailable { ref dataset, .. } if dataset == "facts"));
    assert_eq!(harness.engine.call_count().await, 0);
    assert_eq!(harness.session.history().len(), 1);
}

#[tokio::test]
async fn recent_queries_are_newest_first_and_deduplicated() {
    let settings = SessionSettings {
        max_recent_queries: 2,
        ..SessionSettings::default()
    };
    let mut harness = TestHarness::builder().with_settings(settings).build().unwrap();
    harness.ask("alpha").await.unwrap();
    harness.ask("beta").await.unwrap();
    harness.session.select_dataset("ratios").unwrap();
    harness.ask("alpha").await.unwrap();
    harness.ask("gamma").await.unwrap();

    let recent = harness.session.recent_queries();
    let queries: Vec<&str> = recent.iter().map(|r| r.query.as_str()).collect();
    assert_eq!(queries, vec!["gamma", "alpha"]);
    assert_eq!(recent[1].dataset, DatasetName::Ratios);
    assert!(recent[0].at >= recent[1].at);
    assert_eq!(harness.engine.call_count().await, 4);
}

#[tokio::test]
async fn questions_are_normalized_before_recording_and_dispatch() {
    let mut harness = TestHarness::builder()
        .with_answers(vec![json!("ok")])
        .build()
        .unwrap();
    harness.ask("  top\u{0}  10\u{7}   by revenue ").await.unwrap();

    let calls = harness.engine.calls().await;
    assert_eq!(calls[0].question, "top 10 by revenue");
    assert_eq!(harness.session.history().all()[0].content(), "top 10 by revenue");
    assert_eq!(harness.session.recent_queries()[0].query, "top 10 by revenue");
}

#[tokio::test]
async fn short_question_is_rejected_before_dispatch() {
    let mut harness = TestHarness::builder().build().unwrap();
    let err = harness.ask("ab").await.unwrap_err();
    assert!(matches!(err, RaadError::InvalidQuestion(m) if m.contains("minimum")));
    assert!(harness.session.history().is_empty());
    assert!(harness.session.recent_queries().is_empty());
    assert_eq!(harness.engine.call_count().await, 0);
}

#[tokio::test]
async fn favorites_are_deduplicated_and_capped() {
    let settings = SessionSettings {
        max_favorites: 3,
        ..SessionSettings::default()
    };
    let mut harness = TestHarness::builder().with_settings(settings).build().unwrap();
    let session = &mut harness.session;

    assert!(session.add_favorite("Top 10 by revenue").unwrap());
    assert!(!session.add_favorite("  Top 10   by revenue ").unwrap());
    for q in ["ROE by sector", "Net profit 2024", "Debt ratios"] {
        assert!(session.add_favorite(q).unwrap());
    }
    assert_eq!(
        session.favorites(),
        &["ROE by sector", "Net profit 2024", "Debt ratios"].map(String::from)
    );
    assert!(matches!(session.add_favorite("x"), Err(RaadError::InvalidQuestion(_))));

    assert!(session.remove_favorite(" ROE  by sector"));
    assert!(!session.remove_favorite("ROE by sector"));
    assert_eq!(session.favorites().len(), 2);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn default_favorite_cap_is_twenty() {
    let mut harness = TestHarness::builder().build().unwrap();
    for i in 0..25 {
        harness.session.add_favorite(&format!("favorite question {i}")).unwrap();
    }
    let favorites = harness.session.favorites();
    assert_eq!(favorites.len(), 20);
    assert_eq!(favorites[0], "favorite question 5");
    assert_eq!(favorites[19], "favorite question 24");
}

#[tokio::test]
async fn clear_history_then_export() {
    let mut harness = TestHarness::builder()
        .with_answers(vec![json!("42")])
        .build()
        .unwrap();
    harness.ask("Sector breakdown").await.unwrap();
    let md = harness.session.history().to_markdown();
    assert!(md.contains("> Sector breakdown"));
    assert!(md.contains("*Response type: text*"));

    harness.session.clear_history();
    assert!(harness.session.history().is_empty());
}
