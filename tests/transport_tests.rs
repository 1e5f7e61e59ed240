// SPDX-License-Identifier: GPL-3.0-only

//! Bus client tests against an in-memory peer

use serde_json::{Value, json};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf};
use vision_calib::errors::TransportError;
use vision_calib::messages::ImageRequest;
use vision_calib::transport::BusClient;

const WAIT: Duration = Duration::from_secs(2);

/// Bus side of the connection
struct Peer {
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    writer: WriteHalf<DuplexStream>,
}

impl Peer {
    async fn next(&mut self) -> Value {
        let line = tokio::time::timeout(WAIT, self.lines.next_line())
            .await
            .expect("peer timed out")
            .expect("peer read failed")
            .expect("client closed the stream");
        serde_json::from_str(&line).expect("client sent invalid json")
    }

    async fn send(&mut self, value: Value) {
        let mut line = value.to_string();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.flush().await.unwrap();
    }
}

fn pair() -> (BusClient, Peer) {
    let (client_side, bus_side) = tokio::io::duplex(64 * 1024);
    let client = BusClient::from_stream(client_side, "calib_test".to_string());
    let (reader, writer) = tokio::io::split(bus_side);
    let peer = Peer {
        lines: BufReader::new(reader).lines(),
        writer,
    };
    (client, peer)
}

#[tokio::test]
async fn test_hello_comes_first() {
    let (client, mut peer) = pair();
    assert_eq!(client.node_name(), "calib_test");
    assert_eq!(peer.next().await, json!({"op": "hello", "node": "calib_test"}));
}

#[tokio::test]
async fn test_publish_advertises_once() {
    let (client, mut peer) = pair();
    peer.next().await;

    let request = ImageRequest {
        is_multiple: true,
        frequency: 5,
        kind: 1,
    };
    client.publish("/imgRequest", &request).unwrap();
    client.publish("/imgRequest", &request).unwrap();
    client.flush().await.unwrap();

    assert_eq!(
        peer.next().await,
        json!({"op": "advertise", "topic": "/imgRequest"})
    );
    for _ in 0..2 {
        let line = peer.next().await;
        assert_eq!(line["op"], "publish");
        assert_eq!(line["topic"], "/imgRequest");
        assert_eq!(line["payload"]["is_multiple"], true);
        assert_eq!(line["payload"]["frequency"], 5);
    }
}

#[tokio::test]
async fn test_subscriber_receives_publish() {
    let (client, mut peer) = pair();
    peer.next().await;

    let mut subscriber = client.subscribe::<ImageRequest>("/imgRequest", 1).unwrap();
    assert_eq!(subscriber.topic(), "/imgRequest");
    assert_eq!(
        peer.next().await,
        json!({"op": "subscribe", "topic": "/imgRequest"})
    );

    peer.send(json!({
        "op": "publish",
        "topic": "/imgRequest",
        "payload": {"is_multiple": false, "frequency": 3, "type": 2}
    }))
    .await;

    let received = tokio::time::timeout(WAIT, subscriber.recv())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(received.frequency, 3);
    assert_eq!(received.kind, 2);
}

#[tokio::test]
async fn test_undecodable_message_is_reported() {
    let (client, mut peer) = pair();
    peer.next().await;

    let mut subscriber = client.subscribe::<ImageRequest>("/imgRequest", 1).unwrap();
    peer.next().await;
    peer.send(json!({"op": "publish", "topic": "/imgRequest", "payload": "garbage"}))
        .await;

    let received = tokio::time::timeout(WAIT, subscriber.recv()).await.unwrap();
    assert!(matches!(received, Some(Err(TransportError::Codec(_)))));
}

#[tokio::test]
async fn test_call_reply() {
    let (client, mut peer) = pair();
    peer.next().await;

    let call = tokio::spawn({
        let client = client.clone();
        async move {
            client
                .call::<_, Value>("/omniVisionConf", &json!({"request_node_name": "calib_test"}), WAIT)
                .await
        }
    });

    let request = peer.next().await;
    assert_eq!(request["op"], "call");
    assert_eq!(request["service"], "/omniVisionConf");
    assert_eq!(request["payload"]["request_node_name"], "calib_test");

    peer.send(json!({"op": "reply", "id": request["id"], "payload": {"ok": 1}}))
        .await;
    assert_eq!(call.await.unwrap(), Ok(json!({"ok": 1})));
}

#[tokio::test]
async fn test_call_remote_error() {
    let (client, mut peer) = pair();
    peer.next().await;

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.call::<_, Value>("/omniVisionConf", &json!({}), WAIT).await }
    });

    let request = peer.next().await;
    peer.send(json!({"op": "reply", "id": request["id"], "error": "no provider"}))
        .await;
    assert_eq!(
        call.await.unwrap(),
        Err(TransportError::Remote("no provider".to_string()))
    );
}

#[tokio::test]
async fn test_call_times_out() {
    let (client, mut peer) = pair();
    peer.next().await;

    let result = client
        .call::<_, Value>("/omniVisionConf", &json!({}), Duration::from_millis(50))
        .await;
    assert_eq!(result, Err(TransportError::Timeout));

    // A late reply for the expired call is dropped quietly
    let request = peer.next().await;
    peer.send(json!({"op": "reply", "id": request["id"], "payload": {}}))
        .await;
    assert!(client.is_connected());
}

#[tokio::test]
async fn test_disconnect_ends_everything() {
    let (client, mut peer) = pair();
    peer.next().await;

    let mut subscriber = client.subscribe::<Value>("/camera", 1).unwrap();
    peer.next().await;

    let call = tokio::spawn({
        let client = client.clone();
        async move { client.call::<_, Value>("/omniVisionConf", &json!({}), WAIT).await }
    });
    peer.next().await;
    drop(peer);

    assert_eq!(call.await.unwrap(), Err(TransportError::Disconnected));
    let next = tokio::time::timeout(WAIT, subscriber.recv()).await.unwrap();
    assert!(next.is_none());
    assert!(!client.is_connected());
    assert_eq!(
        client.publish("/imgRequest", &json!({})),
        Err(TransportError::Disconnected)
    );
}
