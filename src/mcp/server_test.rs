//! Tests for the MCP tool surface.

use std::sync::Arc;

use rmcp::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::RawContent;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::TokenValidator;
use crate::db::SqliteDatabase;
use crate::mcp::McpServer;
use crate::tools::{
    AddTaskParams, CompleteTaskParams, DeleteTaskParams, ListTasksParams, ToolRegistry,
    UpdateTaskParams,
};

const SECRET: &str = "test-secret";

async fn test_server() -> (McpServer, String) {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let validator = TokenValidator::new(SECRET);
    let credential = validator.issue(Uuid::new_v4(), 3600).unwrap();

    let registry = Arc::new(ToolRegistry::new(Arc::new(db), validator));
    (McpServer::new(registry), credential)
}

fn content_json(result: &rmcp::model::CallToolResult) -> Value {
    let text = match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        other => panic!("expected text content, got {:?}", other),
    };
    serde_json::from_str(text).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn server_info_advertises_tools() {
    let (server, _) = test_server().await;
    let info = server.get_info();
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.unwrap().contains("add_task"));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_task_returns_task_json() {
    let (server, credential) = test_server().await;

    let result = server
        .add_task(Parameters(AddTaskParams {
            credential,
            title: "Buy milk".to_string(),
            description: None,
        }))
        .await
        .unwrap();

    let task = content_json(&result);
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["is_completed"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn full_task_lifecycle() {
    let (server, credential) = test_server().await;

    let created = content_json(
        &server
            .add_task(Parameters(AddTaskParams {
                credential: credential.clone(),
                title: "draft".to_string(),
                description: Some("rough notes".to_string()),
            }))
            .await
            .unwrap(),
    );
    let task_id = created["id"].as_str().unwrap().to_string();

    let updated = content_json(
        &server
            .update_task(Parameters(UpdateTaskParams {
                credential: credential.clone(),
                task_id: task_id.clone(),
                title: Some("final".to_string()),
                description: None,
                is_completed: None,
            }))
            .await
            .unwrap(),
    );
    assert_eq!(updated["title"], "final");
    assert_eq!(updated["description"], "rough notes");

    let completed = content_json(
        &server
            .complete_task(Parameters(CompleteTaskParams {
                credential: credential.clone(),
                task_id: task_id.clone(),
            }))
            .await
            .unwrap(),
    );
    assert_eq!(completed["is_completed"], true);

    let page = content_json(
        &server
            .list_tasks(Parameters(ListTasksParams {
                credential: credential.clone(),
                completed: Some(true),
                page: None,
                page_size: None,
            }))
            .await
            .unwrap(),
    );
    assert_eq!(page["total"], 1);

    let deleted = content_json(
        &server
            .delete_task(Parameters(DeleteTaskParams {
                credential,
                task_id: task_id.clone(),
            }))
            .await
            .unwrap(),
    );
    assert_eq!(deleted["deleted"], true);
    assert_eq!(deleted["task_id"].as_str().unwrap(), task_id);
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_credential_maps_to_authentication_error() {
    let (server, _) = test_server().await;

    let err = server
        .add_task(Parameters(AddTaskParams {
            credential: "bogus".to_string(),
            title: "never".to_string(),
            description: None,
        }))
        .await
        .unwrap_err();

    assert_eq!(err.message, "authentication_error");
    let data = err.data.unwrap();
    assert!(data["message"].is_string());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_task_maps_to_not_found() {
    let (server, credential) = test_server().await;

    let err = server
        .delete_task(Parameters(DeleteTaskParams {
            credential,
            task_id: Uuid::new_v4().to_string(),
        }))
        .await
        .unwrap_err();

    assert_eq!(err.message, "not_found");
    assert_eq!(err.data.unwrap()["details"]["resource"], "Task");
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_title_maps_to_validation_error() {
    let (server, credential) = test_server().await;

    let err = server
        .add_task(Parameters(AddTaskParams {
            credential,
            title: "   ".to_string(),
            description: None,
        }))
        .await
        .unwrap_err();

    assert_eq!(err.message, "validation_error");
}
