//! Integration tests for the command server.
//!
//! These tests start an actual server and talk plain HTTP/1.1 to it over TCP
//! to verify the wire contract end to end.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use mosfet_core::{join_network, JoinPolicy, Level, MockOutput, NetworkConfig};
use mosfet_server::host::HostLink;
use mosfet_server::{ServerConfig, SharedServer, SwitchServer};

/// Start a test server on an ephemeral port.
async fn start_test_server(
    output: MockOutput,
) -> (
    SocketAddr,
    SharedServer<MockOutput>,
    tokio::task::JoinHandle<()>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = SwitchServer::new(ServerConfig { bind_addr: addr }, output);
    let state = server.state();

    let handle = tokio::spawn(async move {
        let _ = server.run_on(listener).await;
    });

    (addr, state, handle)
}

/// Send one request and return (status code, raw headers, body).
async fn request(addr: SocketAddr, method: &str, path: &str) -> (u16, String, String) {
    let mut stream = TcpStream::connect(addr).await.expect("Failed to connect");
    let req = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\nContent-Length: 0\r\n\r\n",
        method, path, addr
    );
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut raw))
        .await
        .expect("Timeout")
        .unwrap();
    let text = String::from_utf8(raw).expect("UTF-8 response");

    let (head, body) = text.split_once("\r\n\r\n").expect("Malformed response");
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("Missing status code");
    (status, head.to_ascii_lowercase(), body.to_string())
}

#[tokio::test]
async fn test_on_over_tcp() {
    let probe = MockOutput::new();
    let (addr, state, handle) = start_test_server(probe.clone()).await;

    let (status, head, body) = request(addr, "GET", "/on").await;

    assert_eq!(status, 200);
    assert!(head.contains("content-type: text/plain"));
    assert_eq!(body, "MOSFET ON");
    assert_eq!(state.lock().await.switch().level(), Level::Asserted);
    assert_eq!(probe.last(), Some(Level::Asserted));

    handle.abort();
}

#[tokio::test]
async fn test_off_after_on_over_tcp() {
    let probe = MockOutput::new();
    let (addr, state, handle) = start_test_server(probe.clone()).await;

    request(addr, "GET", "/on").await;
    let (status, _, body) = request(addr, "GET", "/off").await;

    assert_eq!(status, 200);
    assert_eq!(body, "MOSFET OFF");
    assert_eq!(state.lock().await.switch().level(), Level::Deasserted);
    assert_eq!(
        probe.writes(),
        vec![Level::Deasserted, Level::Asserted, Level::Deasserted]
    );

    handle.abort();
}

#[tokio::test]
async fn test_repeated_on_returns_identical_reply() {
    let (addr, state, handle) = start_test_server(MockOutput::new()).await;

    let first = request(addr, "GET", "/on").await;
    let second = request(addr, "GET", "/on").await;

    assert_eq!((first.0, first.2.as_str()), (200, "MOSFET ON"));
    assert_eq!((second.0, second.2.as_str()), (200, "MOSFET ON"));
    assert_eq!(state.lock().await.switch().level(), Level::Asserted);
    assert_eq!(state.lock().await.handled(), 2);

    handle.abort();
}

#[tokio::test]
async fn test_initial_state_before_any_request() {
    let probe = MockOutput::new();
    let (_addr, state, handle) = start_test_server(probe.clone()).await;

    assert_eq!(state.lock().await.switch().level(), Level::Deasserted);
    assert_eq!(probe.writes(), vec![Level::Deasserted]);

    handle.abort();
}

#[tokio::test]
async fn test_unrouted_path_is_404() {
    let probe = MockOutput::new();
    let (addr, _state, handle) = start_test_server(probe.clone()).await;

    let (status, _, _) = request(addr, "GET", "/toggle").await;

    assert_eq!(status, 404);
    assert_eq!(probe.writes(), vec![Level::Deasserted]);

    handle.abort();
}

#[tokio::test]
async fn test_concurrent_requests_leave_consistent_level() {
    let probe = MockOutput::new();
    let (addr, state, handle) = start_test_server(probe.clone()).await;

    let mut clients = Vec::new();
    for i in 0..8 {
        let path = if i % 2 == 0 { "/on" } else { "/off" };
        clients.push(tokio::spawn(async move { request(addr, "GET", path).await }));
    }
    for client in clients {
        let (status, _, _) = client.await.unwrap();
        assert_eq!(status, 200);
    }

    // Whatever the order, the switch mirrors the last write to the pin.
    let server = state.lock().await;
    assert_eq!(server.handled(), 8);
    assert_eq!(Some(server.switch().level()), probe.last());

    handle.abort();
}

#[tokio::test]
async fn test_join_then_serve_scenario() {
    let mut link = HostLink::new();
    let network = NetworkConfig {
        network_name: "workshop".to_string(),
        passphrase: "hunter22".to_string(),
    };

    let joined = join_network(&mut link, &network, &JoinPolicy::default(), |_| {}).unwrap();
    assert!(joined.address.is_some());

    let probe = MockOutput::new();
    let (addr, _state, handle) = start_test_server(probe.clone()).await;

    let (status, _, body) = request(addr, "GET", "/on").await;

    assert_eq!(status, 200);
    assert_eq!(body, "MOSFET ON");
    assert_eq!(probe.last(), Some(Level::Asserted));

    handle.abort();
}
