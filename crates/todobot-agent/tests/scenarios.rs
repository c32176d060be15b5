//! End-to-end conversations: a scripted model behind a mock HTTP server,
//! the real providers and an in-memory SQLite store.

use std::sync::Arc;

use serde_json::{json, Value};
use todobot_agent::{AgentError, AgentLoop, ToolRegistry};
use todobot_core::config::{AgentSettings, ProviderConfig};
use todobot_core::TurnMessage;
use todobot_providers::{create_provider, LlmRequestConfig, ModelClient};
use todobot_store::{SqliteTaskStore, TaskStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(turn: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-scenario",
        "choices": [{
            "message": { "role": "assistant", "content": turn.to_string() },
            "finish_reason": "stop"
        }]
    }))
}

/// Mount replies that are served once each, in order.
async fn script(server: &MockServer, replies: Vec<ResponseTemplate>) {
    for reply in replies {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(reply)
            .up_to_n_times(1)
            .mount(server)
            .await;
    }
}

fn client(backend: &str, server: &MockServer) -> Arc<dyn ModelClient> {
    let config = ProviderConfig {
        api_key: "test-key".into(),
        api_base: Some(server.uri()),
    };
    create_provider(backend, &config, None, LlmRequestConfig::default()).unwrap()
}

async fn agent(backend: &str, server: &MockServer) -> (AgentLoop, Arc<SqliteTaskStore>) {
    let store = Arc::new(SqliteTaskStore::connect("sqlite::memory:").await.unwrap());
    let tools = ToolRegistry::new(store.clone());
    let agent = AgentLoop::new(client(backend, server), tools, &AgentSettings::default());
    (agent, store)
}

fn sent_bodies(requests: &[wiremock::Request]) -> Vec<Value> {
    requests.iter().map(|r| r.body_json().unwrap()).collect()
}

#[tokio::test]
async fn add_a_task() {
    let server = MockServer::start().await;
    script(
        &server,
        vec![
            completion(json!({"type": "plan", "plan": "I will use createTodo"})),
            completion(json!({"type": "action", "function": "createTodo", "input": "Buy milk"})),
            completion(json!({"type": "output", "output": "Your todo has been added successfully"})),
        ],
    )
    .await;
    let (mut agent, store) = agent("openai", &server).await;

    let reply = agent.process_input("Add a task for buying milk").await.unwrap();
    assert_eq!(reply, "Your todo has been added successfully");

    let tasks = store.list_all().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].todo, "Buy milk");

    // The third request carried the observation holding the new id.
    let bodies = sent_bodies(&server.received_requests().await.unwrap());
    assert_eq!(bodies.len(), 3);
    let last_sent = bodies[2]["messages"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last_sent["role"], "developer");
    assert_eq!(
        TurnMessage::parse(last_sent["content"].as_str().unwrap()).unwrap(),
        TurnMessage::observation(tasks[0].id.to_string())
    );
    assert!(bodies
        .iter()
        .all(|b| b["response_format"]["type"] == "json_object"));
}

#[tokio::test]
async fn search_for_tasks() {
    let server = MockServer::start().await;
    script(
        &server,
        vec![
            completion(json!({"type": "action", "function": "searchTodo", "input": "milk"})),
            completion(json!({"type": "output", "output": "You have 2 todos about milk."})),
        ],
    )
    .await;
    let (mut agent, store) = agent("deepseek", &server).await;
    store.create("Buy milk").await.unwrap();
    store.create("Pay rent").await.unwrap();
    store.create("Oat MILK for coffee").await.unwrap();

    let reply = agent.process_input("What todos do I have about milk").await.unwrap();
    assert_eq!(reply, "You have 2 todos about milk.");

    let observation = agent
        .conversation()
        .messages()
        .iter()
        .rev()
        .find(|m| m.role() == "developer")
        .map(|m| TurnMessage::parse(m.content()).unwrap())
        .unwrap();
    let TurnMessage::Observation { observation } = observation else {
        panic!("expected observation");
    };
    let found: Vec<Value> = serde_json::from_str(&observation).unwrap();
    let texts: Vec<&str> = found.iter().map(|t| t["todo"].as_str().unwrap()).collect();
    assert_eq!(texts, ["Buy milk", "Oat MILK for coffee"]);

    // The raw backend sends observations as system messages.
    let bodies = sent_bodies(&server.received_requests().await.unwrap());
    let last_sent = bodies[1]["messages"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last_sent["role"], "system");
    assert!(bodies[1].get("response_format").is_none());
}

#[tokio::test]
async fn malformed_reply_then_next_input() {
    let server = MockServer::start().await;
    script(
        &server,
        vec![
            ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "Sure! I'll add that for you." } }]
            })),
            completion(json!({"type": "output", "output": "Hi again"})),
        ],
    )
    .await;
    let (mut agent, store) = agent("openai", &server).await;

    let err = agent.process_input("Add eggs").await.unwrap_err();
    assert!(matches!(err, AgentError::Parse(_)));
    assert!(store.list_all().await.unwrap().is_empty());

    let reply = agent.process_input("hello?").await.unwrap();
    assert_eq!(reply, "Hi again");
    assert!(agent.conversation().validate().is_ok());
}

#[tokio::test]
async fn delete_after_listing() {
    let server = MockServer::start().await;
    let (mut agent, store) = agent("openai", &server).await;
    let keep = store.create("Walk the dog").await.unwrap();
    let stale = store.create("Buy milk").await.unwrap();

    script(
        &server,
        vec![
            completion(json!({"type": "action", "function": "getAllTodos", "input": ""})),
            completion(json!({"type": "action", "function": "deleteTodoById", "input": stale.to_string()})),
            completion(json!({"type": "output", "output": "Deleted 'Buy milk'."})),
        ],
    )
    .await;

    let reply = agent.process_input("Remove the milk task").await.unwrap();
    assert_eq!(reply, "Deleted 'Buy milk'.");

    let tasks = store.list_all().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, keep);
}

#[tokio::test]
async fn server_error_is_reported_and_session_continues() {
    let server = MockServer::start().await;
    script(
        &server,
        vec![
            ResponseTemplate::new(500).set_body_string("upstream exploded"),
            completion(json!({"type": "output", "output": "Recovered"})),
        ],
    )
    .await;
    let (mut agent, _store) = agent("openai", &server).await;

    let err = agent.process_input("first").await.unwrap_err();
    assert!(err.to_string().contains("upstream exploded"));

    assert_eq!(agent.process_input("second").await.unwrap(), "Recovered");
    assert!(agent.conversation().validate().is_ok());
}
