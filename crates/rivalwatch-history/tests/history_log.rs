use std::sync::Arc;

use rivalwatch_core::AnalysisKind;
use rivalwatch_history::HistoryLog;
use serde_json::json;

async fn open(dir: &tempfile::TempDir, capacity: usize) -> HistoryLog {
    HistoryLog::open(dir.path().join("history.json"), capacity).await.unwrap()
}

#[tokio::test]
async fn test_capacity_keeps_most_recent_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let log = open(&dir, 3).await;

    for i in 0..7 {
        log.append(AnalysisKind::Text, &format!("request {}", i), "ok", None)
            .await
            .unwrap();
    }

    let entries = log.list().await.unwrap();
    let summaries: Vec<&str> = entries.iter().map(|e| e.request_summary.as_str()).collect();

    assert_eq!(summaries, vec!["request 6", "request 5", "request 4"]);
    assert!(entries[0].timestamp >= entries[1].timestamp);
}

#[tokio::test]
async fn test_clear_then_append() {
    let dir = tempfile::tempdir().unwrap();
    let log = open(&dir, 10).await;

    log.append(AnalysisKind::Text, "before", "ok", None).await.unwrap();
    log.clear().await.unwrap();

    assert!(log.list().await.unwrap().is_empty());
    assert!(log.path().exists());

    log.append(AnalysisKind::ParsedPage, "URL: https://a.example", "A", None)
        .await
        .unwrap();
    let entries = log.list().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, AnalysisKind::ParsedPage);
}

#[tokio::test]
async fn test_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let first = {
        let log = open(&dir, 10).await;
        log.append(
            AnalysisKind::Image,
            "Image: banner.png",
            "Dark banner",
            Some(json!({ "analysis": { "visual_style_score": 6 } })),
        )
        .await
        .unwrap()
    };

    let log = open(&dir, 10).await;
    let entries = log.list().await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], first);
    assert_eq!(entries[0].details.as_ref().unwrap()["analysis"]["visual_style_score"], 6);
    assert!(!dir.path().join("history.tmp").exists());
}

#[tokio::test]
async fn test_ids_are_unique() {
    let dir = tempfile::tempdir().unwrap();
    let log = open(&dir, 10).await;

    let a = log.append(AnalysisKind::Text, "a", "a", None).await.unwrap();
    let b = log.append(AnalysisKind::Text, "b", "b", None).await.unwrap();

    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_concurrent_appends_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(open(&dir, 100).await);

    let mut handles = Vec::new();
    for i in 0..20 {
        let log = Arc::clone(&log);
        handles.push(tokio::spawn(async move {
            log.append(AnalysisKind::Text, &format!("req {}", i), "ok", None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(log.list().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_legacy_entries_are_read_and_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(
        &path,
        r#"[
          {
            "id": "5d0f",
            "timestamp": "2025-01-15T10:30:00.123456",
            "request_type": "parse",
            "request_summary": "URL: https://news.example",
            "response_summary": "News",
            "details": null
          },
          {
            "id": "4c1e",
            "timestamp": "2025-01-14T09:00:00",
            "request_type": "text",
            "request_summary": "Older request",
            "response_summary": "Older answer",
            "details": {"analysis": {"summary": "Older answer"}}
          }
        ]"#,
    )
    .unwrap();

    let log = HistoryLog::open(&path, 10).await.unwrap();
    let entries = log.list().await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "5d0f");
    assert_eq!(entries[0].kind, AnalysisKind::ParsedPage);
    assert!(entries[0].details.is_none());
    assert!(entries[0].timestamp > entries[1].timestamp);

    log.append(AnalysisKind::Image, "Image: new.png", "New", None).await.unwrap();

    let ids: Vec<String> = log.list().await.unwrap().into_iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(&ids[1..], ["5d0f", "4c1e"]);

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("\"5d0f\""));
    assert!(on_disk.contains("\"4c1e\""));
}
