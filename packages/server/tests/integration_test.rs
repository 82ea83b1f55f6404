//! Integration tests: a real server on an ephemeral port, driven over WebSocket and HTTP.

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tsunagari_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository},
    ui::{CommandDispatcher, Server, ServerConfig},
    usecase::{ConnectClientUseCase, GetSessionDetailUseCase, GetSessionsUseCase},
};
use tsunagari_shared::time::SystemClock;

const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Helper struct to manage an in-process server lifecycle
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    static_dir: PathBuf,
}

impl TestServer {
    async fn start() -> Self {
        let static_dir = std::env::temp_dir().join(format!("tsunagari-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<h1>tsunagari</h1>").unwrap();

        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            static_dir: static_dir.clone(),
            ..ServerConfig::default()
        };

        let repository = Arc::new(InMemorySessionRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let dispatcher = CommandDispatcher::new(
            repository.clone(),
            message_pusher.clone(),
            Arc::new(SystemClock),
            config.session_ttl,
        );
        let server = Server::new(
            config,
            dispatcher,
            Arc::new(ConnectClientUseCase::new(message_pusher)),
            Arc::new(GetSessionsUseCase::new(repository.clone())),
            Arc::new(GetSessionDetailUseCase::new(repository)),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = signal.await;
                })
                .await
                .unwrap();
        });

        TestServer {
            addr,
            shutdown: Some(shutdown),
            handle: Some(handle),
            static_dir,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}

/// Helper struct wrapping one WebSocket client
struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    id: String,
}

impl TestClient {
    /// Connect and consume the `connected` greeting
    async fn connect(server: &TestServer) -> Self {
        let (ws, _) = connect_async(server.ws_url()).await.unwrap();
        let mut client = TestClient {
            ws,
            id: String::new(),
        };
        let greeting = client.recv().await;
        assert_eq!(greeting["type"], "connected");
        client.id = greeting["clientId"].as_str().unwrap().to_string();
        client
    }

    async fn send(&mut self, value: Value) {
        self.ws
            .send(Message::Text(value.to_string().into()))
            .await
            .unwrap();
    }

    async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("stream closed")
                .unwrap();
            if let Message::Text(text) = msg {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    /// Receive frames until one of the given type arrives
    async fn recv_type(&mut self, ty: &str) -> Value {
        loop {
            let value = self.recv().await;
            if value["type"] == ty {
                return value;
            }
        }
    }

    async fn join(&mut self, session_id: &str) {
        self.send(json!({"type": "joinSession", "sessionId": session_id}))
            .await;
        self.recv_type("firstUserStatus").await;
    }

    async fn register(&mut self, session_id: &str, name: &str) -> Vec<Value> {
        self.send(json!({
            "type": "registerParticipant",
            "sessionId": session_id,
            "name": name,
            "isAdminOnly": false
        }))
        .await;
        let mut frames = Vec::new();
        loop {
            let value = self.recv().await;
            let done = value["type"] == "registrationSuccess";
            frames.push(value);
            if done {
                return frames;
            }
        }
    }
}

fn types(frames: &[Value]) -> Vec<&str> {
    frames.iter().map(|f| f["type"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_full_session_flow_with_admin_handover() {
    // テスト項目: セッション作成から管理者の切断・引き継ぎまでの一連の流れ
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;

    alice.send(json!({"type": "createSession"})).await;
    let created = alice.recv_type("sessionCreated").await;
    let code = created["sessionId"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);

    // 小文字で参加してもコードは正規化される
    alice.join(&code.to_lowercase()).await;
    bob.join(&code).await;

    // when (操作): Alice, Bob の順に登録
    let alice_frames = alice.register(&code, "Alice").await;
    // Bob は参加済みなので Alice の登録も appState として届く
    let seen_by_bob = bob.recv_type("appState").await;
    assert_eq!(seen_by_bob["participants"].as_array().unwrap().len(), 1);
    let bob_frames = bob.register(&code, "Bob").await;

    // then (期待する結果): Alice が管理者になる
    assert_eq!(
        types(&alice_frames),
        vec!["appState", "adminStatus", "registrationSuccess"]
    );
    assert_eq!(types(&bob_frames), vec!["appState", "registrationSuccess"]);
    let state = &bob_frames[0];
    assert_eq!(state["adminId"], alice.id.as_str());
    assert_eq!(state["participants"][0]["name"], "Alice");
    assert_eq!(state["participants"][0]["isAdmin"], true);
    assert_eq!(state["participants"][1]["isAdmin"], false);

    // when (操作): Alice が Bob とつながる
    alice
        .send(json!({
            "type": "toggleConnection",
            "sessionId": code,
            "targetParticipantId": bob.id
        }))
        .await;

    // then (期待する結果): 双方向の接続が配信される
    let update = bob.recv_type("connectionsUpdate").await;
    assert_eq!(update["connections"][&alice.id], json!([bob.id.clone()]));
    assert_eq!(update["connections"][&bob.id], json!([alice.id.clone()]));

    // when (操作): Alice が切断
    alice.ws.close(None).await.unwrap();

    // then (期待する結果): Bob が管理者になり、接続は空になる
    let admin = bob.recv_type("adminStatus").await;
    assert_eq!(admin["isAdmin"], true);
    let state = bob.recv_type("appState").await;
    assert_eq!(state["adminId"], bob.id.as_str());
    assert_eq!(state["connections"], json!({ (bob.id.clone()): [] }));
    assert_eq!(state["participants"].as_array().unwrap().len(), 1);

    server.stop().await;
}

#[tokio::test]
async fn test_duplicate_name_and_missing_session_id() {
    // テスト項目: 名前の重複と sessionId の欠落が本人にだけ通知される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice.join("DUPE42").await;
    bob.join("DUPE42").await;
    alice.register("DUPE42", "Alice").await;
    bob.recv_type("appState").await;

    // when (操作):
    bob.send(json!({
        "type": "registerParticipant",
        "sessionId": "DUPE42",
        "name": "ALICE",
        "isAdminOnly": false
    }))
    .await;
    let duplicate = bob.recv().await;
    bob.send(json!({"type": "joinSession"})).await;
    let missing = bob.recv().await;

    // then (期待する結果):
    assert_eq!(duplicate["type"], "registrationError");
    assert_eq!(
        duplicate["message"],
        "This name is already being used. Please choose another one."
    );
    assert_eq!(missing["type"], "sessionError");
    assert_eq!(missing["message"], "Session ID is required.");

    server.stop().await;
}

#[tokio::test]
async fn test_http_endpoints() {
    // テスト項目: ヘルスチェック・セッション詳細・統計・静的ファイルの HTTP API
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice.join("STAT42").await;
    bob.join("STAT42").await;
    alice.register("STAT42", "Alice").await;
    bob.register("STAT42", "Bob").await;
    alice
        .send(json!({
            "type": "toggleConnection",
            "sessionId": "STAT42",
            "targetParticipantId": bob.id
        }))
        .await;
    alice.recv_type("connectionsUpdate").await;
    let http = reqwest::Client::new();

    // when (操作):
    let health: Value = http
        .get(server.http_url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let sessions: Value = http
        .get(server.http_url("/api/sessions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let detail: Value = http
        .get(server.http_url("/api/sessions/stat42"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let stats: Value = http
        .get(server.http_url("/api/sessions/STAT42/statistics"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let missing = http
        .get(server.http_url("/api/sessions/NOPE00"))
        .send()
        .await
        .unwrap();
    let index = http
        .get(server.http_url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health, json!({"status": "ok"}));
    assert_eq!(sessions[0]["id"], "STAT42");
    assert_eq!(sessions[0]["participantCount"], 2);
    assert_eq!(detail["id"], "STAT42");
    assert_eq!(detail["currentPage"], "registration");
    assert_eq!(stats["participantCount"], 2);
    assert_eq!(stats["possibleConnections"], 1);
    assert_eq!(stats["actualConnections"], 1);
    assert_eq!(stats["teamIntegrationRate"], 100.0);
    assert_eq!(stats["teamLevel"], "veryHigh");
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    assert!(index.contains("tsunagari"));

    server.stop().await;
}
