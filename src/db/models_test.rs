//! Tests for domain model validation and pagination math.

use crate::db::{
    DbError, MAX_TITLE_LEN, MessageRole, Task, TaskPage, normalize_description, validate_title,
};

use chrono::Utc;
use uuid::Uuid;

fn sample_task() -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4(),
        owner_id: Uuid::new_v4(),
        title: "Sample".to_string(),
        description: None,
        is_completed: false,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn validate_title_trims_whitespace() {
    assert_eq!(validate_title("  buy milk  ").unwrap(), "buy milk");
}

#[test]
fn validate_title_rejects_empty() {
    assert!(matches!(
        validate_title(""),
        Err(DbError::Validation { .. })
    ));
    assert!(matches!(
        validate_title("   \t  "),
        Err(DbError::Validation { .. })
    ));
}

#[test]
fn validate_title_boundary() {
    let max = "x".repeat(MAX_TITLE_LEN);
    assert_eq!(validate_title(&max).unwrap().chars().count(), MAX_TITLE_LEN);

    let too_long = "x".repeat(MAX_TITLE_LEN + 1);
    assert!(matches!(
        validate_title(&too_long),
        Err(DbError::Validation { .. })
    ));
}

#[test]
fn validate_title_counts_characters_not_bytes() {
    // 255 multi-byte characters are within the limit.
    let title = "ü".repeat(MAX_TITLE_LEN);
    assert!(validate_title(&title).is_ok());
}

#[test]
fn normalize_description_drops_empty() {
    assert_eq!(normalize_description(None), None);
    assert_eq!(normalize_description(Some(String::new())), None);
    assert_eq!(
        normalize_description(Some("notes".to_string())),
        Some("notes".to_string())
    );
}

#[test]
fn task_page_math() {
    let page = TaskPage::new(vec![], 0, 1, 20);
    assert_eq!(page.total_pages, 0);

    let page = TaskPage::new(vec![], 45, 2, 20);
    assert_eq!(page.total_pages, 3);

    let page = TaskPage::new(vec![], 40, 1, 20);
    assert_eq!(page.total_pages, 2);

    let page = TaskPage::new(vec![sample_task()], 1, 1, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn message_role_round_trip() {
    assert_eq!("user".parse::<MessageRole>().unwrap(), MessageRole::User);
    assert_eq!(
        "assistant".parse::<MessageRole>().unwrap(),
        MessageRole::Assistant
    );
    assert_eq!(MessageRole::User.to_string(), "user");
    assert!("system".parse::<MessageRole>().is_err());
}

#[test]
fn message_role_serde_lowercase() {
    assert_eq!(
        serde_json::to_string(&MessageRole::Assistant).unwrap(),
        "\"assistant\""
    );
    let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
    assert_eq!(role, MessageRole::User);
}
