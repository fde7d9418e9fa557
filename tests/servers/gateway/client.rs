use std::net::SocketAddr;

use reqwest::{Client as ReqwestClient, Response};

/// Gateway Client
pub struct Client {
    server_addr: SocketAddr,
    reqwest_client: ReqwestClient,
}

/// URL components in this context:
///
/// ```text
/// http://127.0.0.1:62304/stream?magnet=magnet%3A%3Fxt%3Durn%3Abtih%3A08ad...&path=Sintel%2FSintel.mp4
/// \_____________________/\_____/ \_________________________________________________________________/
///            |              |                                    |
///         base url        path                                 query
/// ```
impl Client {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self {
            server_addr,
            reqwest_client: reqwest::Client::builder().build().unwrap(),
        }
    }

    pub async fn health_check(&self) -> Response {
        self.get("health_check", &[]).await
    }

    pub async fn info(&self, magnet: &str) -> Response {
        self.get("info", &[("magnet", magnet)]).await
    }

    pub async fn metrics(&self) -> Response {
        self.get("metrics", &[]).await
    }

    pub async fn stream(&self, magnet: &str, path: &str) -> Response {
        self.get("stream", &[("magnet", magnet), ("path", path)]).await
    }

    pub async fn stream_with_header(&self, magnet: &str, path: &str, key: &str, value: &str) -> Response {
        self.reqwest_client
            .get(self.build_url("stream"))
            .query(&[("magnet", magnet), ("path", path)])
            .header(key, value)
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Response {
        self.reqwest_client
            .get(self.build_url(path))
            .query(query)
            .send()
            .await
            .unwrap()
    }

    fn build_url(&self, path: &str) -> String {
        format!("http://{}/{path}", self.server_addr)
    }
}
