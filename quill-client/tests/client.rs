use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quill_client::{
    Client, Config, ConfigError, FileConfig, InvocationError, NoRetries, SendFuture, Sender, SessionArgs,
    SessionParams,
};
use quill_tl_types::{Blob, Deserializable, Identifiable, LAYER, Serializable, enums, functions, types};

type Init = functions::InvokeWithLayer<functions::InitConnection<functions::help::GetConfig>>;

/// An in-memory account: remembers what each session announced and answers
/// the session-surface calls from that.
#[derive(Default)]
struct Server {
    inits:     Mutex<Vec<Init>>,
    requests:  Mutex<Vec<u32>>,
    scripted:  Mutex<VecDeque<Vec<u8>>>,
    gzip:      bool,
}

const OTHER_HASH: i64 = 0x5eed;

impl Server {
    fn gzipped() -> Arc<Self> {
        Arc::new(Self { gzip: true, ..Default::default() })
    }

    fn script(&self, answer: Vec<u8>) {
        self.scripted.lock().unwrap().push_back(answer);
    }

    fn init_count(&self) -> usize {
        self.inits.lock().unwrap().len()
    }

    fn last_init(&self) -> functions::InitConnection<functions::help::GetConfig> {
        self.inits.lock().unwrap().last().unwrap().query.clone()
    }

    fn answer(&self, body: &[u8]) -> Vec<u8> {
        let id = u32::from_le_bytes(body[..4].try_into().unwrap());
        self.requests.lock().unwrap().push(id);
        if let Some(scripted) = self.scripted.lock().unwrap().pop_front() {
            return scripted;
        }

        if id == Init::CONSTRUCTOR_ID {
            let init = Init::from_bytes(body).unwrap();
            self.inits.lock().unwrap().push(init);
            return Blob(0x232566acu32.to_le_bytes().to_vec()).to_bytes();
        }
        if id == functions::account::GetAuthorizations::CONSTRUCTOR_ID {
            return self.authorizations().to_bytes();
        }
        if id == functions::account::ResetAuthorization::CONSTRUCTOR_ID {
            let req = functions::account::ResetAuthorization::from_bytes(body).unwrap();
            return (req.hash == OTHER_HASH).to_bytes();
        }
        if id == functions::auth::ResetAuthorizations::CONSTRUCTOR_ID {
            return true.to_bytes();
        }
        if id == functions::Ping::CONSTRUCTOR_ID {
            let req = functions::Ping::from_bytes(body).unwrap();
            return enums::Pong::from(types::Pong { msg_id: 1, ping_id: req.ping_id }).to_bytes();
        }
        rpc_error(400, "METHOD_INVALID")
    }

    fn authorizations(&self) -> enums::account::Authorizations {
        let mut list: Vec<enums::Authorization> = vec![
            types::Authorization {
                hash: OTHER_HASH,
                official_app: true,
                device_model: "iPhone 15".into(),
                platform: "iOS".into(),
                system_version: "iOS 17.4".into(),
                app_name: "Telegram iOS".into(),
                app_version: "10.9".into(),
                ..Default::default()
            }
            .into(),
        ];
        if let Some(init) = self.inits.lock().unwrap().last() {
            let q = &init.query;
            list.insert(
                0,
                types::Authorization {
                    current: true,
                    device_model: q.device_model.clone(),
                    system_version: q.system_version.clone(),
                    app_version: q.app_version.clone(),
                    api_id: q.api_id,
                    app_name: "quill".into(),
                    date_created: 1_700_000_000,
                    date_active: 1_700_000_060,
                    ..Default::default()
                }
                .into(),
            );
        }
        types::account::Authorizations { authorization_ttl_days: 180, authorizations: list }.into()
    }
}

/// Local handle so the test crate may implement the foreign `Sender` trait.
struct Shared(Arc<Server>);

impl Sender for Shared {
    fn send<'a>(&'a self, body: Vec<u8>) -> SendFuture<'a> {
        Box::pin(async move {
            let answer = self.0.answer(&body);
            Ok(if self.0.gzip { gzip_packed(&answer) } else { answer })
        })
    }
}

fn rpc_error(code: i32, message: &str) -> Vec<u8> {
    enums::RpcError::from(types::RpcError { error_code: code, error_message: message.into() }).to_bytes()
}

fn gzip_packed(answer: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(answer).unwrap();
    let packed_data = enc.finish().unwrap();
    let mut out = types::GzipPacked::CONSTRUCTOR_ID.to_bytes();
    types::GzipPacked { packed_data }.serialize(&mut out);
    out
}

fn client_with(config: Config) -> (Client, Arc<Server>) {
    let server = Arc::new(Server::default());
    (Client::new(config, Shared(server.clone())), server)
}

// ── Session parameters end to end ─────────────────────────────────────────────

#[tokio::test]
async fn announced_values_come_back_verbatim() {
    let (client, server) = client_with(
        Config::builder()
            .api_id(611335)
            .app_version("1.2.3-β")
            .device_model("PC 64bit")
            .system_version("Linux 6.8 🐧")
            .lang_code("it")
            .build(),
    );

    let sessions = client.get_authorizations().await.unwrap();
    let current = sessions.iter().find(|s| s.current).unwrap();
    assert_eq!(current.app_version, "1.2.3-β");
    assert_eq!(current.device_model, "PC 64bit");
    assert_eq!(current.system_version, "Linux 6.8 🐧");
    assert_eq!(current.api_id, 611335);

    let init = server.last_init();
    assert_eq!(init.lang_code, "it");
    assert_eq!(init.system_lang_code, "it");
    assert_eq!(init.lang_pack, "");
    assert_eq!(client.session_params().lang_code, "it");
}

#[tokio::test]
async fn defaults_are_announced_when_nothing_is_set() {
    let (client, server) = client_with(Config::default());
    client.init_connection().await.unwrap();

    let init = server.last_init();
    let defaults = SessionParams::default();
    assert_eq!(init.lang_code, "en");
    assert_eq!(init.app_version, defaults.app_version);
    assert_eq!(init.device_model, defaults.device_model);
    assert_eq!(init.system_version, defaults.system_version);
    assert_eq!(server.inits.lock().unwrap()[0].layer, LAYER);
}

#[tokio::test]
async fn file_values_reach_the_server() {
    let file = FileConfig::from_toml(
        r#"
        [client]
        api_id = 42
        api_hash = "0123456789abcdef"
        device_model = "Workstation"
        lang_code = "de"
        "#,
    )
    .unwrap();
    let (client, server) = client_with(Config::builder().file(file).app_version("cli").build());

    client.init_connection().await.unwrap();
    let init = server.last_init();
    assert_eq!(init.api_id, 42);
    assert_eq!(init.device_model, "Workstation");
    assert_eq!(init.lang_code, "de");
    assert_eq!(init.app_version, "cli");
    assert_eq!(client.api_id(), 42);
    assert_eq!(client.api_hash(), "0123456789abcdef");
}

// ── initConnection ────────────────────────────────────────────────────────────

#[tokio::test]
async fn init_connection_is_sent_once() {
    let (client, server) = client_with(Config::default());
    client.init_connection().await.unwrap();
    client.get_authorizations().await.unwrap();
    client.reset_authorizations().await.unwrap();
    client.clone().init_connection().await.unwrap();

    assert_eq!(server.init_count(), 1);
    assert_eq!(server.requests.lock().unwrap()[0], Init::CONSTRUCTOR_ID);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_calls_share_one_init() {
    let (client, server) = client_with(Config::default());
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get_authorizations().await.map(|s| s.len()) })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap(), 2);
    }
    assert_eq!(server.init_count(), 1);
}

#[tokio::test]
async fn failed_init_is_retried_on_next_call() {
    let server = Arc::new(Server::default());
    server.script(rpc_error(500, "INTERNAL"));
    let client = Client::new(Config::builder().retry_policy(NoRetries).build(), Shared(server.clone()));

    let err = client.get_authorizations().await.unwrap_err();
    assert!(err.is("INTERNAL"), "{err}");
    assert_eq!(server.init_count(), 0);

    client.get_authorizations().await.unwrap();
    assert_eq!(server.init_count(), 1);
}

// ── Answers ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rpc_error_is_returned() {
    let (client, server) = client_with(Config::builder().retry_policy(NoRetries).build());
    client.init_connection().await.unwrap();
    server.script(rpc_error(401, "AUTH_KEY_UNREGISTERED"));

    match client.get_authorizations().await {
        Err(InvocationError::Rpc(e)) => {
            assert_eq!(e.code, 401);
            assert!(e.is("AUTH_KEY_*"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn short_flood_wait_is_slept_through() {
    let (client, server) = client_with(Config::default());
    client.init_connection().await.unwrap();
    server.script(rpc_error(420, "FLOOD_WAIT_5"));

    let start = tokio::time::Instant::now();
    let sessions = client.get_authorizations().await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(start.elapsed() >= Duration::from_secs(5));
}

#[tokio::test]
async fn flood_wait_without_retries_fails() {
    let (client, server) = client_with(Config::builder().retry_policy(NoRetries).build());
    client.init_connection().await.unwrap();
    server.script(rpc_error(420, "FLOOD_WAIT_5"));

    let err = client.reset_authorizations().await.unwrap_err();
    assert_eq!(err.flood_wait_seconds(), Some(5));
}

#[tokio::test]
async fn gzip_packed_answers_are_inflated() {
    let server = Server::gzipped();
    let client = Client::new(Config::builder().device_model("Gz").build(), Shared(server.clone()));

    let sessions = client.get_authorizations().await.unwrap();
    assert_eq!(sessions[0].device_model, "Gz");
    assert!(client.ping().await.is_ok());
}

#[tokio::test]
async fn truncated_answer_is_a_deserialize_error() {
    let (client, server) = client_with(Config::builder().retry_policy(NoRetries).build());
    client.init_connection().await.unwrap();
    server.script(vec![0x15, 0xc4]);

    assert!(matches!(client.reset_authorizations().await, Err(InvocationError::Deserialize(_))));
}

// ── Session management ────────────────────────────────────────────────────────

#[tokio::test]
async fn session_listing_and_reset() {
    let (client, _server) = client_with(Config::default());

    let sessions = client.get_authorizations().await.unwrap();
    let other = sessions.iter().find(|s| !s.current).unwrap();
    assert_eq!(other.platform, "iOS");
    assert!(other.official_app);
    assert_eq!(sessions[0].date_created.timestamp(), 1_700_000_000);

    assert!(client.reset_authorization(other.hash).await.unwrap());
    assert!(!client.reset_authorization(1).await.unwrap());
    assert!(client.reset_authorizations().await.unwrap());
}

#[tokio::test]
async fn ping_checks_the_echo() {
    let (client, server) = client_with(Config::builder().retry_policy(NoRetries).build());
    client.ping().await.unwrap();

    server.script(enums::Pong::from(types::Pong { msg_id: 1, ping_id: 0 }).to_bytes());
    assert!(matches!(client.ping().await, Err(InvocationError::Deserialize(_))));
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[test]
fn argument_beats_file_and_empty_falls_back() {
    let file = FileConfig {
        app_version: Some("from-file".into()),
        device_model: Some("file-device".into()),
        system_version: Some(String::new()),
        ..Default::default()
    };
    let args = SessionArgs {
        app_version: Some("from-args".into()),
        device_model: Some(String::new()),
        ..Default::default()
    };

    let params = SessionParams::resolve(&args, Some(&file));
    assert_eq!(params.app_version, "from-args");
    assert_eq!(params.device_model, "file-device");
    assert_eq!(params.system_version, SessionParams::default().system_version);
    assert_eq!(params.lang_code, "en");
}

#[test]
fn file_is_loaded_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quill.toml");
    std::fs::write(
        &path,
        "[client]\napi_id = 7\napi_hash = \"abc\"\nsystem_version = \"Arch\"\n\n[other]\nignored = true\n",
    )
    .unwrap();

    let config = Config::builder().config_file(&path).unwrap().build();
    assert_eq!(config.api_id, 7);
    assert_eq!(config.api_hash, "abc");
    assert_eq!(config.params.system_version, "Arch");
    assert!(!format!("{config:?}").contains("abc"));
}

#[test]
fn file_without_client_section_is_empty() {
    assert_eq!(FileConfig::from_toml("[server]\nport = 1\n").unwrap(), FileConfig::default());
}

#[test]
fn config_errors_are_distinguished() {
    assert!(matches!(FileConfig::from_toml("[client]\napi_id = \"x\""), Err(ConfigError::Toml(_))));
    assert!(matches!(FileConfig::from_toml("[client"), Err(ConfigError::Toml(_))));
    assert!(matches!(FileConfig::load("/nonexistent/quill.toml"), Err(ConfigError::Io(_))));
}

#[test]
fn argument_api_values_beat_file() {
    let file = FileConfig { api_id: Some(1), api_hash: Some("file".into()), ..Default::default() };
    let config = Config::builder().file(file.clone()).api_id(2).api_hash("").build();
    assert_eq!(config.api_id, 2);
    assert_eq!(config.api_hash, "file");

    let config = Config::builder().file(file).build();
    assert_eq!(config.api_id, 1);
}
