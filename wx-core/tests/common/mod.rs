use serde_json::Value;
use std::path::Path;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};
use wx_core::{FileConfig, Overrides, Settings, Zone};

/// A one-request HTTP server on localhost.
///
/// Returns the base URL and a handle resolving to the request path it saw.
pub async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        let request = String::from_utf8_lossy(&request).into_owned();
        request.split_whitespace().nth(1).unwrap_or_default().to_string()
    });

    (base, handle)
}

#[allow(dead_code)]
pub fn settings(api_base: &str, output_dir: &Path, zone: &str) -> Settings {
    let file = FileConfig {
        api_base: Some(api_base.to_string()),
        timezone: Some(zone.to_string()),
        request_timeout_secs: Some(10),
        ..Default::default()
    };
    let overrides = Overrides {
        latitude: Some(37.8321),
        longitude: Some(-122.2626),
        output_dir: Some(output_dir.to_path_buf()),
    };

    let settings = Settings::resolve(Some("SECRET".into()), file, overrides).unwrap();
    assert_ne!(settings.zone, Zone::Local);
    settings
}

#[allow(dead_code)]
pub fn reference_body() -> String {
    let body: Value = serde_json::json!({
        "latitude": 37.8321,
        "longitude": -122.2626,
        "currently": {"time": 1525595104, "summary": "Clear", "temperature": 60.1}
    });
    body.to_string()
}
