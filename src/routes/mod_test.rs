use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use super::*;
use crate::config::BoardConfig;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

async fn serve(state: AppState) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });
    addr
}

async fn send(addr: std::net::SocketAddr, head: &str, body: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(head.as_bytes()).await.unwrap();
    stream.write_all(body).await.unwrap();
    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

async fn upload_png(addr: std::net::SocketAddr, body: &[u8]) -> String {
    let head = format!(
        "POST /api/board/images HTTP/1.1\r\nHost: localhost\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    send(addr, &head, body).await
}

fn png_of_len(len: usize) -> Vec<u8> {
    let mut body = PNG_MAGIC.to_vec();
    body.resize(len, 0);
    body
}

#[tokio::test]
async fn healthz_answers_ok() {
    let addr = serve(AppState::new(BoardConfig::default())).await;
    let response = send(addr, "GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", &[]).await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
}

#[tokio::test]
async fn image_upload_above_axum_default_is_accepted() {
    let state = AppState::new(BoardConfig::default());
    let addr = serve(state.clone()).await;

    let response = upload_png(addr, &png_of_len(3 * 1024 * 1024)).await;
    assert!(response.starts_with("HTTP/1.1 201"), "{}", &response[..response.len().min(200)]);
    assert_eq!(state.engine.read().await.doc.len(), 1);
}

#[tokio::test]
async fn image_upload_over_configured_limit_is_rejected() {
    let state = AppState::new(BoardConfig { max_image_bytes: 1024, ..BoardConfig::default() });
    let addr = serve(state.clone()).await;

    let response = upload_png(addr, &png_of_len(2048)).await;
    assert!(response.starts_with("HTTP/1.1 413"), "{response}");
    assert!(state.engine.read().await.doc.is_empty());
}
