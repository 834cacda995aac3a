//! `MqttPublisher` against a minimal in-process MQTT 3.1.1 broker.
//!
//! The broker accepts a single connection, answers CONNECT with the given
//! return code and acknowledges one QoS 1 PUBLISH.

use roomsight_bridge_framework::{
    Credentials, MqttConfig, MqttPublisher, PublishError, Publisher, QoS,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const CONNECT: u8 = 0x10;
const PUBLISH: u8 = 0x30;
const DISCONNECT: u8 = 0xE0;

#[derive(Debug, Default)]
struct Session {
    client_id: String,
    username: Option<String>,
    password: Option<String>,
    topic: Option<String>,
    qos: Option<u8>,
    payload: Vec<u8>,
    disconnected: bool,
}

async fn read_packet(stream: &mut TcpStream) -> std::io::Result<(u8, Vec<u8>)> {
    let header = stream.read_u8().await?;

    let mut len = 0usize;
    let mut shift = 0;
    loop {
        let byte = stream.read_u8().await?;
        len |= ((byte & 0x7F) as usize) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }

    let mut body = vec![0u8; len];
    stream.read_exact(&mut body).await?;
    Ok((header, body))
}

fn read_u16(buf: &[u8], pos: &mut usize) -> u16 {
    let value = u16::from_be_bytes([buf[*pos], buf[*pos + 1]]);
    *pos += 2;
    value
}

fn read_string(buf: &[u8], pos: &mut usize) -> String {
    let len = read_u16(buf, pos) as usize;
    let value = String::from_utf8(buf[*pos..*pos + len].to_vec()).unwrap();
    *pos += len;
    value
}

fn parse_connect(body: &[u8], session: &mut Session) {
    let mut pos = 0;
    assert_eq!(read_string(body, &mut pos), "MQTT");
    let _level = body[pos];
    let flags = body[pos + 1];
    pos += 2;
    let _keep_alive = read_u16(body, &mut pos);

    session.client_id = read_string(body, &mut pos);
    if flags & 0x80 != 0 {
        session.username = Some(read_string(body, &mut pos));
    }
    if flags & 0x40 != 0 {
        session.password = Some(read_string(body, &mut pos));
    }
}

/// Spawn a broker answering CONNECT with `return_code`.
async fn spawn_broker(return_code: u8) -> (u16, JoinHandle<Session>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut session = Session::default();

        while let Ok((header, body)) = read_packet(&mut stream).await {
            match header & 0xF0 {
                CONNECT => {
                    parse_connect(&body, &mut session);
                    stream.write_all(&[0x20, 0x02, 0x00, return_code]).await.unwrap();
                    if return_code != 0 {
                        break;
                    }
                }
                PUBLISH => {
                    let qos = (header >> 1) & 0x03;
                    let mut pos = 0;
                    session.topic = Some(read_string(&body, &mut pos));
                    session.qos = Some(qos);
                    if qos > 0 {
                        let pkid = read_u16(&body, &mut pos).to_be_bytes();
                        stream
                            .write_all(&[0x40, 0x02, pkid[0], pkid[1]])
                            .await
                            .unwrap();
                    }
                    session.payload = body[pos..].to_vec();
                }
                DISCONNECT => {
                    session.disconnected = true;
                    break;
                }
                _ => {}
            }
        }

        session
    });

    (port, handle)
}

fn publisher(port: u16) -> MqttPublisher {
    let config = MqttConfig {
        hostname: "127.0.0.1".to_string(),
        port,
        client_id: "bme280-livingroom".to_string(),
        keep_alive_secs: 30,
        publish_timeout_secs: 5,
    };
    MqttPublisher::new(config, Credentials::new("user", "pass"))
}

#[tokio::test]
async fn test_publish_is_acknowledged() {
    let (port, broker) = spawn_broker(0x00).await;
    let payload = br#"{"ts":1000000.0,"temperature":22.5,"humidity":45.0}"#.to_vec();

    let mut publisher = publisher(port);
    publisher
        .send("sensors/indoor", payload.clone(), QoS::AtLeastOnce)
        .await
        .expect("publish should be acknowledged");

    let session = broker.await.unwrap();
    assert_eq!(session.client_id, "bme280-livingroom");
    assert_eq!(session.username.as_deref(), Some("user"));
    assert_eq!(session.password.as_deref(), Some("pass"));
    assert_eq!(session.topic.as_deref(), Some("sensors/indoor"));
    assert_eq!(session.qos, Some(1));
    assert_eq!(session.payload, payload);
    assert!(session.disconnected, "client should disconnect after delivery");
}

#[tokio::test]
async fn test_rejected_credentials() {
    // 0x05: not authorized
    let (port, broker) = spawn_broker(0x05).await;

    let mut publisher = publisher(port);
    let result = publisher
        .send("sensors/indoor", b"{}".to_vec(), QoS::AtLeastOnce)
        .await;

    assert!(
        matches!(result, Err(PublishError::Refused(_))),
        "got {result:?}"
    );

    let session = broker.await.unwrap();
    assert!(session.topic.is_none(), "nothing is published when refused");
}
