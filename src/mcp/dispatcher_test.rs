use serde_json::{Map, Value, json};

use super::dispatcher::{Dispatcher, PROJECT_DELETED, TASK_COMPLETED, TASK_DELETED};
use crate::error::TickTickError;
use crate::testing::{FakeApi, task_json};

fn args(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        other => panic!("arguments must be an object, got {other}"),
    }
}

async fn setup() -> (FakeApi, Dispatcher) {
    let api = FakeApi::start().await;
    let dispatcher = Dispatcher::new(api.client());
    (api, dispatcher)
}

#[tokio::test]
async fn test_unknown_tool_makes_no_request() {
    let (api, dispatcher) = setup().await;

    let err = dispatcher
        .dispatch("drop_all_tables", args(json!({})))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Unknown tool name: drop_all_tables");
    match err {
        TickTickError::UnknownTool { name } => assert_eq!(name, "drop_all_tables"),
        other => panic!("expected UnknownTool, got {other:?}"),
    }
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_missing_arguments_rejected() {
    let (api, dispatcher) = setup().await;

    let err = dispatcher.dispatch("get_project_by_id", None).await.unwrap_err();

    assert!(matches!(
        err,
        TickTickError::MissingArguments { ref tool } if tool == "get_project_by_id"
    ));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_argument_free_tools_accept_no_arguments() {
    let (api, dispatcher) = setup().await;
    api.respond("GET", "/project", 200, json!([{ "id": "p1", "name": "Work" }]));
    api.respond("GET", "/user", 200, json!({ "id": "u1" }));

    let projects = dispatcher.dispatch("get_user_projects", None).await.unwrap();
    let user = dispatcher.dispatch("get_current_user", None).await.unwrap();

    let projects: Value = serde_json::from_str(&projects).unwrap();
    assert_eq!(projects[0]["id"], "p1");
    let user: Value = serde_json::from_str(&user).unwrap();
    assert_eq!(user["id"], "u1");
}

#[tokio::test]
async fn test_invalid_arguments_list_every_issue() {
    let (api, dispatcher) = setup().await;

    let err = dispatcher
        .dispatch("create_task", args(json!({ "priority": "high" })))
        .await
        .unwrap_err();

    match err {
        TickTickError::Validation(e) => {
            let paths: Vec<&str> = e.issues.iter().map(|i| i.path.as_str()).collect();
            assert_eq!(paths, vec!["title", "projectId", "priority"]);
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_result_is_indented_json() {
    let (api, dispatcher) = setup().await;
    api.respond("GET", "/project/p1/task/t1", 200, task_json("t1", "p1", 0));

    let text = dispatcher
        .dispatch("get_task_by_ids", args(json!({ "taskId": "t1", "projectId": "p1" })))
        .await
        .unwrap();

    assert!(text.contains('\n'), "expected pretty JSON: {text}");
    let task: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(task, task_json("t1", "p1", 0));
}

#[tokio::test]
async fn test_void_operations_return_confirmations() {
    let (api, dispatcher) = setup().await;
    api.respond_empty("DELETE", "/project/p1", 200);
    api.respond_empty("POST", "/project/p1/task/t1/complete", 200);
    api.respond_empty("DELETE", "/project/p1/task/t1", 200);

    let task = json!({ "taskId": "t1", "projectId": "p1" });

    assert_eq!(
        dispatcher
            .dispatch("delete_project", args(json!({ "projectId": "p1" })))
            .await
            .unwrap(),
        PROJECT_DELETED
    );
    assert_eq!(
        dispatcher
            .dispatch("complete_task", args(task.clone()))
            .await
            .unwrap(),
        TASK_COMPLETED
    );
    assert_eq!(
        dispatcher.dispatch("delete_task", args(task)).await.unwrap(),
        TASK_DELETED
    );
}

#[tokio::test]
async fn test_update_task_routes_by_path_id() {
    let (api, dispatcher) = setup().await;
    api.respond("POST", "/task/T1", 200, task_json("T1", "P", 0));

    dispatcher
        .dispatch(
            "update_task",
            args(json!({ "taskId": "T1", "id": "T2", "projectId": "P", "title": "X" })),
        )
        .await
        .unwrap();

    let request = api.single_request();
    assert_eq!(request.path, "/open/v1/task/T1");
    assert_eq!(request.body.unwrap()["id"], "T1");
}

#[tokio::test]
async fn test_batch_with_all_lists_empty_fails_validation() {
    let (api, dispatcher) = setup().await;

    let err = dispatcher
        .dispatch(
            "batch_update_tasks",
            args(json!({ "add": [], "update": [], "delete": [] })),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, TickTickError::Validation(_)));
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_remote_error_propagates_once() {
    let (api, dispatcher) = setup().await;
    api.respond(
        "GET",
        "/project/gone",
        404,
        json!({ "errorMessage": "Project not found" }),
    );

    let err = dispatcher
        .dispatch("get_project_by_id", args(json!({ "projectId": "gone" })))
        .await
        .unwrap_err();

    assert!(matches!(err, TickTickError::Api { status: 404, .. }));
    assert_eq!(
        err.describe(),
        "TickTick API error (404): Project not found"
    );
    api.single_request();
}

#[tokio::test]
async fn test_inbox_requires_arguments_object() {
    let (api, dispatcher) = setup().await;

    let err = dispatcher.dispatch("get_inbox_tasks", None).await.unwrap_err();
    assert!(matches!(err, TickTickError::MissingArguments { .. }));

    api.respond("GET", "/user", 200, json!({ "id": "u1" }));
    api.respond(
        "GET",
        "/project/inboxu1/data",
        200,
        json!({ "tasks": [task_json("a", "inboxu1", 0), task_json("b", "inboxu1", 2)] }),
    );

    let text = dispatcher
        .dispatch("get_inbox_tasks", args(json!({})))
        .await
        .unwrap();
    let data: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(data["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(data["tasks"][0]["id"], "a");
}
