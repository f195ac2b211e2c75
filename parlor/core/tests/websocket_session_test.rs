//! Integration Tests for the WebSocket Transport Session
//!
//! A real WebSocket peer runs on its own thread and tokio runtime; the session
//! under test is driven from plain synchronous test code, the same way the
//! console drives it.

use std::future::Future;
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use parlor_core::{
    InboundFrame, InterruptSignal, PromptTransport, TransportConfig, TransportError,
    WebSocketSession,
};

// ============================================================================
// Scripted peer
// ============================================================================

/// Start a one-connection WebSocket peer running `script`
///
/// Returns the endpoint URL and a handle that yields once the script is done.
fn spawn_peer<F, Fut>(script: F) -> (String, thread::JoinHandle<()>)
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()>,
{
    let (addr_tx, addr_rx) = std_mpsc::channel();

    let handle = thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async move {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            addr_tx.send(listener.local_addr().unwrap()).unwrap();

            let (stream, _) = listener.accept().await.unwrap();
            let ws = accept_async(stream).await.unwrap();
            script(ws).await;
        });
    });

    let addr = addr_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    (format!("ws://{addr}/ws"), handle)
}

async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> Option<String> {
    while let Some(msg) = ws.next().await {
        match msg.ok()? {
            Message::Text(text) => return Some(text),
            Message::Close(_) => return None,
            _ => {}
        }
    }
    None
}

fn connect(endpoint: String) -> WebSocketSession {
    WebSocketSession::connect(&TransportConfig::with_endpoint(endpoint)).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_prompt_and_multi_frame_reply() {
    let (endpoint, peer) = spawn_peer(|mut ws| async move {
        let prompt = next_text(&mut ws).await.unwrap();
        assert_eq!(prompt, "USER: ");

        ws.send(Message::Text("line one".into())).await.unwrap();
        ws.send(Message::Text("line two".into())).await.unwrap();
        ws.send(Message::Text("\u{4}".into())).await.unwrap();

        // Wait for the client to close
        assert!(next_text(&mut ws).await.is_none());
    });

    let mut session = connect(endpoint);
    assert!(session.is_connected());

    let interrupt = InterruptSignal::new();
    session.send_text("USER: ").unwrap();

    assert_eq!(
        session.recv(&interrupt).unwrap(),
        InboundFrame::Text("line one".to_string())
    );
    assert_eq!(
        session.recv(&interrupt).unwrap(),
        InboundFrame::Text("line two".to_string())
    );
    assert_eq!(
        session.recv(&interrupt).unwrap(),
        InboundFrame::Text("\u{4}".to_string())
    );

    session.close().unwrap();
    assert!(!session.is_connected());
    peer.join().unwrap();
}

#[test]
fn test_peer_close_is_reported() {
    let (endpoint, peer) = spawn_peer(|mut ws| async move {
        let _ = next_text(&mut ws).await;
        ws.close(None).await.unwrap();
    });

    let mut session = connect(endpoint);
    session.send_text("ASSISTANT: ").unwrap();

    let frame = session.recv(&InterruptSignal::new()).unwrap();
    assert_eq!(frame, InboundFrame::Closed);

    peer.join().unwrap();

    // The worker is gone; sending now fails instead of hanging
    let mut tries = 0;
    while session.is_connected() && tries < 50 {
        thread::sleep(Duration::from_millis(10));
        tries += 1;
    }
    assert!(matches!(
        session.send_text("again"),
        Err(TransportError::ConnectionClosed)
    ));
}

#[test]
fn test_binary_frame_decoded_as_text() {
    let (endpoint, peer) = spawn_peer(|mut ws| async move {
        ws.send(Message::Binary(b"bytes as text".to_vec()))
            .await
            .unwrap();
        let _ = next_text(&mut ws).await;
    });

    let mut session = connect(endpoint);
    let frame = session.recv(&InterruptSignal::new()).unwrap();
    assert_eq!(frame, InboundFrame::Text("bytes as text".to_string()));

    session.close().unwrap();
    peer.join().unwrap();
}

#[test]
fn test_interrupt_while_waiting() {
    let (endpoint, peer) = spawn_peer(|mut ws| async move {
        // Never reply; just wait for the client to go away
        let _ = next_text(&mut ws).await;
    });

    let mut session = connect(endpoint);
    let interrupt = InterruptSignal::new();

    let trigger = interrupt.clone();
    let waker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        trigger.trigger();
    });

    let result = session.recv(&interrupt);
    assert!(matches!(result, Err(TransportError::Interrupted)));

    waker.join().unwrap();
    session.close().unwrap();
    peer.join().unwrap();
}

#[test]
fn test_drop_closes_session() {
    let (endpoint, peer) = spawn_peer(|mut ws| async move {
        // Returns once the client's close frame arrives
        assert!(next_text(&mut ws).await.is_none());
    });

    let session = connect(endpoint);
    drop(session);

    peer.join().unwrap();
}
