use homestead::board::TaskBoard;
use homestead::config::StoreConfig;
use homestead::models::TaskDraft;
use homestead::repository::TaskRepository;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn failing_writes_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Dig trench", "is_completed": false, "created_at": "2024-05-02T08:00:00Z"},
            {"id": 2, "title": "Lay pipe", "is_completed": true, "created_at": "2024-05-01T08:00:00Z"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500).set_body_string("write failed"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_string("write failed"))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn failed_toggle_is_rolled_back() {
    let server = failing_writes_server().await;
    let dir = TempDir::new().unwrap();
    let repo = TaskRepository::new(&StoreConfig::new(Some(&server.uri()), Some("k"), dir.path()));

    let mut board = TaskBoard::load(&repo).await;
    assert_eq!(board.tasks().len(), 2);

    assert!(board.toggle(&repo, "1").await.is_err());
    assert!(!board.get("1").unwrap().is_completed);

    assert!(board.set_completion(&repo, "2", false).await.is_err());
    assert!(board.get("2").unwrap().is_completed);
}

#[tokio::test]
async fn failed_remove_restores_position() {
    let server = failing_writes_server().await;
    let dir = TempDir::new().unwrap();
    let repo = TaskRepository::new(&StoreConfig::new(Some(&server.uri()), Some("k"), dir.path()));

    let mut board = TaskBoard::load(&repo).await;
    assert!(board.remove(&repo, "1").await.is_err());

    let ids: Vec<&str> = board.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn successful_changes_stay_applied() {
    let dir = TempDir::new().unwrap();
    let repo = TaskRepository::new(&StoreConfig::local_only(dir.path()));
    let mut board = TaskBoard::load(&repo).await;

    let id = board.add(&repo, TaskDraft::new("Paint barn")).await.unwrap().id.clone();
    board.add(&repo, TaskDraft::new("Oil hinges")).await.unwrap();
    assert_eq!(board.tasks()[0].title, "Oil hinges");

    assert_eq!(board.toggle(&repo, &id).await.unwrap(), Some(true));
    assert_eq!(board.toggle(&repo, "missing").await.unwrap(), None);
    assert!(board.remove(&repo, &id).await.unwrap());
    assert!(!board.remove(&repo, &id).await.unwrap());

    let mut fresh = TaskBoard::default();
    fresh.refresh(&repo).await;
    assert_eq!(fresh.tasks(), board.tasks());
}
