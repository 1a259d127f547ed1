//! Content store over an IPFS-compatible HTTP API (`/api/v0/...`).

use crate::error::StoreError;
use crate::store::{ContentStore, DagLink, ObjectKind, Stat};
use crate::types::{path_join, Hash, PinType};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PinLsResponse {
    #[serde(rename = "Keys", default)]
    keys: HashMap<String, PinLsEntry>,
}

#[derive(Debug, Deserialize)]
struct PinLsEntry {
    #[serde(rename = "Type")]
    pin_type: PinType,
}

#[derive(Debug, Deserialize)]
struct FilesStatResponse {
    #[serde(rename = "CumulativeSize")]
    cumulative_size: u64,
    #[serde(rename = "Type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct DagGetResponse {
    #[serde(rename = "Links", default)]
    links: Vec<DagGetLink>,
}

#[derive(Debug, Deserialize)]
struct DagGetLink {
    #[serde(rename = "Hash")]
    hash: CidLink,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Tsize", default)]
    tsize: u64,
}

#[derive(Debug, Deserialize)]
struct CidLink {
    #[serde(rename = "/")]
    target: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "Message")]
    message: String,
}

/// `ContentStore` talking to a node's RPC API, e.g. `http://127.0.0.1:5001`
pub struct IpfsHttpStore {
    api_url: String,
    client: reqwest::Client,
}

impl IpfsHttpStore {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        command: &str,
        query: &[(&str, &str)],
    ) -> Result<T, StoreError> {
        let url = path_join(&self.api_url, &["api/v0", command]);
        debug!(url = %url, ?query, "Content store request");

        let response = self
            .client
            .post(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", url, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", url, e)))?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &body));
        }

        serde_json::from_slice(&body)
            .map_err(|e| StoreError::Malformed(format!("{} reply: {}", command, e)))
    }
}

/// Map a non-2xx reply to a store error kind.
fn classify_failure(status: u16, body: &[u8]) -> StoreError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
    let lowered = message.to_lowercase();
    if status == 404 || lowered.contains("not found") || lowered.contains("no link named") {
        StoreError::NotFound(message)
    } else {
        StoreError::Unavailable(format!("HTTP {}: {}", status, message))
    }
}

fn parse_kind(kind: &str) -> Result<ObjectKind, StoreError> {
    match kind {
        "directory" => Ok(ObjectKind::Directory),
        "file" => Ok(ObjectKind::File),
        other => Err(StoreError::Malformed(format!("unknown object type: {}", other))),
    }
}

#[async_trait]
impl ContentStore for IpfsHttpStore {
    async fn list_pins(&self) -> Result<BTreeMap<Hash, PinType>, StoreError> {
        // Every pin type, not only recursive roots
        let response: PinLsResponse = self.call("pin/ls", &[("type", "all")]).await?;
        Ok(response
            .keys
            .into_iter()
            .map(|(hash, entry)| (hash, entry.pin_type))
            .collect())
    }

    async fn stat(&self, hash: &str) -> Result<Stat, StoreError> {
        let path = path_join("/ipfs/", &[hash]);
        let response: FilesStatResponse = self.call("files/stat", &[("arg", path.as_str())]).await?;
        Ok(Stat {
            cumulative_size: response.cumulative_size,
            kind: parse_kind(&response.kind)?,
        })
    }

    async fn dag_links(&self, hash: &str) -> Result<Vec<DagLink>, StoreError> {
        let response: DagGetResponse = self.call("dag/get", &[("arg", hash)]).await?;
        Ok(response
            .links
            .into_iter()
            .map(|link| DagLink {
                hash: link.hash.target,
                name: link.name,
                size: link.tsize,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one JSON reply and hand back the raw request head.
    async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let reply = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            request
        });
        (url, server)
    }

    #[tokio::test]
    async fn test_list_pins_requests_every_pin_type() {
        let (url, server) = serve_once(
            r#"{"Keys":{"QmA":{"Type":"recursive"},"QmB":{"Type":"direct"},"QmC":{"Type":"indirect"}}}"#,
        )
        .await;
        let store = IpfsHttpStore::new(&url, Duration::from_secs(5)).unwrap();
        let pins = store.list_pins().await.unwrap();
        let request = server.await.unwrap();

        assert!(
            request.starts_with("POST /api/v0/pin/ls?type=all "),
            "unexpected request: {request}"
        );
        assert_eq!(pins.len(), 3);
        assert_eq!(pins["QmB"], PinType::Direct);
        assert_eq!(pins["QmC"], PinType::Indirect);
    }

    #[test]
    fn test_parse_pin_ls_reply() {
        let body = r#"{"Keys":{"QmA":{"Type":"recursive"},"QmB":{"Type":"direct"}}}"#;
        let parsed: PinLsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.keys.len(), 2);
        assert_eq!(parsed.keys["QmA"].pin_type, PinType::Recursive);
        assert_eq!(parsed.keys["QmB"].pin_type, PinType::Direct);
    }

    #[test]
    fn test_parse_files_stat_reply() {
        let body = r#"{"Hash":"QmA","Size":0,"CumulativeSize":1234,"Blocks":3,"Type":"directory"}"#;
        let parsed: FilesStatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.cumulative_size, 1234);
        assert_eq!(parse_kind(&parsed.kind).unwrap(), ObjectKind::Directory);
        assert!(parse_kind("symlink").is_err());
    }

    #[test]
    fn test_parse_dag_get_reply() {
        let body = r#"{
            "Data": {"/": {"bytes": "CAE"}},
            "Links": [
                {"Hash": {"/": "QmChild"}, "Name": "a.txt", "Tsize": 17},
                {"Hash": {"/": "QmDir"}, "Name": "docs", "Tsize": 900}
            ]
        }"#;
        let parsed: DagGetResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.links.len(), 2);
        assert_eq!(parsed.links[0].hash.target, "QmChild");
        assert_eq!(parsed.links[1].name, "docs");
        assert_eq!(parsed.links[1].tsize, 900);

        let leaf: DagGetResponse = serde_json::from_str(r#"{"Data": "raw"}"#).unwrap();
        assert!(leaf.links.is_empty());
    }

    #[test]
    fn test_classify_failure() {
        let body = br#"{"Message":"file does not exist: not found","Code":0,"Type":"error"}"#;
        assert!(matches!(
            classify_failure(500, body),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            classify_failure(503, b"busy"),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_api_url_is_normalized() {
        let store = IpfsHttpStore::new("http://127.0.0.1:5001/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.api_url(), "http://127.0.0.1:5001");
    }
}
