//! OBS WebSocket (protocol v5) scene transport
//!
//! Only the handful of opcodes needed to switch scenes are implemented:
//!
//! ```text
//! server → Hello (0)  {rpcVersion, authentication?: {challenge, salt}}
//! client → Identify (1)  {rpcVersion: 1, authentication?, eventSubscriptions: 0}
//! server → Identified (2)
//! client → Request (6)  SetCurrentProgramScene {sceneName}
//! server → RequestResponse (7)  {requestId, requestStatus: {result, code, comment?}}
//! ```
//!
//! The connection is made once at startup. A dropped connection is not
//! re-established; later switches fail with `Disconnected` and are logged
//! by the dispatcher.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::backoff::ExponentialBackoff;
use super::switcher::{SceneError, SceneSwitcher};
use crate::config::ObsConfig;
use crate::scheduler::Scheduler;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RPC_VERSION: u32 = 1;

mod op {
    pub const HELLO: u8 = 0;
    pub const IDENTIFY: u8 = 1;
    pub const IDENTIFIED: u8 = 2;
    pub const REQUEST: u8 = 6;
    pub const REQUEST_RESPONSE: u8 = 7;
}

#[derive(Debug, Deserialize)]
struct ObsMessage {
    op: u8,
    #[serde(default)]
    d: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HelloData {
    rpc_version: u32,
    authentication: Option<AuthChallenge>,
}

#[derive(Debug, Deserialize)]
struct AuthChallenge {
    challenge: String,
    salt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestResponseData {
    request_id: String,
    request_status: RequestStatus,
}

#[derive(Debug, Deserialize)]
struct RequestStatus {
    result: bool,
    code: i64,
    comment: Option<String>,
}

pub struct ObsClient {
    socket: Mutex<WsStream>,
    request_timeout: Duration,
    next_request_id: AtomicU64,
}

impl ObsClient {
    /// Connect and complete the Hello/Identify handshake
    pub async fn connect(
        url: &str,
        password: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, SceneError> {
        let (mut socket, _response) = connect_async(url).await?;

        let hello = next_message(&mut socket).await?;
        if hello.op != op::HELLO {
            return Err(SceneError::Handshake(format!("expected Hello, got op {}", hello.op)));
        }
        let hello: HelloData = serde_json::from_value(hello.d)?;
        if hello.rpc_version < RPC_VERSION {
            return Err(SceneError::Handshake(format!(
                "server speaks rpc version {}",
                hello.rpc_version
            )));
        }

        let mut identify = json!({
            "rpcVersion": RPC_VERSION,
            "eventSubscriptions": 0,
        });
        if let Some(auth) = hello.authentication {
            let password = password.ok_or_else(|| {
                SceneError::Handshake("server requires a password but none is configured".to_string())
            })?;
            identify["authentication"] =
                Value::String(authentication_string(password, &auth.salt, &auth.challenge));
        }
        send_message(&mut socket, op::IDENTIFY, identify).await?;

        let identified = match next_message(&mut socket).await {
            Ok(message) => message,
            Err(SceneError::Disconnected) => {
                return Err(SceneError::Handshake(
                    "connection closed during identify (wrong password?)".to_string(),
                ))
            }
            Err(e) => return Err(e),
        };
        if identified.op != op::IDENTIFIED {
            return Err(SceneError::Handshake(format!(
                "expected Identified, got op {}",
                identified.op
            )));
        }

        Ok(Self {
            socket: Mutex::new(socket),
            request_timeout,
            next_request_id: AtomicU64::new(1),
        })
    }

    /// Startup connection with exponential backoff between attempts
    pub async fn connect_with_retry(
        config: &ObsConfig,
        scheduler: &dyn Scheduler,
    ) -> Result<Self, SceneError> {
        let url = config.url();
        let mut backoff = ExponentialBackoff::new(
            Duration::from_secs(1),
            Duration::from_secs(8),
            config.connect_retries,
        );

        loop {
            log::info!("🔌 Connecting to OBS WebSocket: {}", url);
            match Self::connect(&url, config.password.as_deref(), config.request_timeout).await {
                Ok(client) => {
                    log::info!("✅ Connected to OBS WebSocket");
                    return Ok(client);
                }
                Err(e) => {
                    log::warn!("Failed to connect to OBS: {}", e);
                    if backoff.sleep(scheduler).await.is_err() {
                        return Err(e);
                    }
                }
            }
        }
    }

    async fn request(&self, request_type: &str, request_data: Value) -> Result<(), SceneError> {
        let request_id = format!(
            "rinkflow-{}",
            self.next_request_id.fetch_add(1, Ordering::Relaxed)
        );
        let mut socket = self.socket.lock().await;

        send_message(
            &mut socket,
            op::REQUEST,
            json!({
                "requestType": request_type,
                "requestId": request_id,
                "requestData": request_data,
            }),
        )
        .await?;

        let status = tokio::time::timeout(self.request_timeout, async {
            loop {
                let message = next_message(&mut socket).await?;
                if message.op != op::REQUEST_RESPONSE {
                    continue;
                }
                let response: RequestResponseData = serde_json::from_value(message.d)?;
                if response.request_id == request_id {
                    return Ok::<_, SceneError>(response.request_status);
                }
            }
        })
        .await
        .map_err(|_| SceneError::Timeout)??;

        if status.result {
            Ok(())
        } else {
            Err(SceneError::Rejected {
                code: status.code,
                comment: status.comment,
            })
        }
    }
}

#[async_trait]
impl SceneSwitcher for ObsClient {
    async fn switch_scene(&self, scene: &str) -> Result<(), SceneError> {
        self.request("SetCurrentProgramScene", json!({ "sceneName": scene }))
            .await
    }

    fn backend_type(&self) -> &'static str {
        "OBS"
    }
}

/// `base64(sha256(base64(sha256(password + salt)) + challenge))`
pub fn authentication_string(password: &str, salt: &str, challenge: &str) -> String {
    let secret = BASE64.encode(Sha256::digest(format!("{}{}", password, salt).as_bytes()));
    BASE64.encode(Sha256::digest(format!("{}{}", secret, challenge).as_bytes()))
}

async fn send_message(socket: &mut WsStream, op: u8, d: Value) -> Result<(), SceneError> {
    let payload = json!({ "op": op, "d": d }).to_string();
    socket
        .send(Message::Text(payload.into()))
        .await
        .map_err(|_| SceneError::Disconnected)
}

async fn next_message(socket: &mut WsStream) -> Result<ObsMessage, SceneError> {
    while let Some(frame) = socket.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let message: ObsMessage = serde_json::from_str(&text)?;
                return Ok(message);
            }
            Ok(Message::Close(_)) => return Err(SceneError::Disconnected),
            Ok(_) => continue,
            Err(e) => return Err(SceneError::Connect(e.to_string())),
        }
    }
    Err(SceneError::Disconnected)
}
