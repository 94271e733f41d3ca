use std::io::Read;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use sdnatui::serval::{MessageKind, ServalApi, ServalRestClient};
use tiny_http::{Header, Response, Server};

const MY_SID: &str = "1111111111111111111111111111111111111111111111111111111111111111";
const THEIR_SID: &str = "ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789";

/// `pum:pum123`
const AUTH: &str = "Basic cHVtOnB1bTEyMw==";

#[derive(Debug)]
struct Recorded {
    method: String,
    url: String,
    content_type: Option<String>,
    body: String,
}

fn json(body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap())
}

fn route(url: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    let conversation = format!("/restful/meshms/{}/{}", MY_SID, THEIR_SID);
    match url {
        "/restful/keyring/identities.json" => json(&format!(
            r#"{{"header":["sid","did","name"],"rows":[["{}","5550123","alice"]]}}"#,
            MY_SID
        )),
        "/restful/rhizome/bundlelist.json" => json(
            r#"{"header":[".token","_id","service","id","version","date",".inserttime",".author",".fromhere","filesize","filehash","sender","recipient","name"],
                "rows":[[null,1,"file","AB12",1,0,0,null,1,2048,"h",null,null,"a.txt"]]}"#,
        ),
        "/restful/rhizome/AB12/raw.bin" => Response::from_data(vec![0u8, 1, 2, 255]),
        u if u == format!("/restful/meshms/{}/conversationlist.json", MY_SID) => json(&format!(
            r#"{{"header":["_id","my_sid","their_sid","read","last_message","read_offset"],"rows":[[0,"{}","{}",false,10,0]]}}"#,
            MY_SID, THEIR_SID
        )),
        u if u == format!("{}/messagelist.json", conversation) => json(
            r#"{"header":["type","my_sid","their_sid","offset","token","text","delivered","read","timestamp","ack_offset"],
                "rows":[["<","a","b",1,"t","hi",true,true,1500000000,null],[">","a","b",0,"t","hello",true,false,null,null]]}"#,
        ),
        u if u == format!("{}/sendmessage", conversation) || u == format!("{}/readall", conversation) => {
            json(r#"{"http_status_code":201}"#).with_status_code(201)
        }
        _ => Response::from_string("not found").with_status_code(404),
    }
}

/// Serve `requests` requests like the daemon's REST API, recording each one
fn spawn_daemon(requests: usize) -> (String, Receiver<Recorded>) {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let port = server.server_addr().to_ip().expect("ip listener").port();
    let (tx, rx) = channel();

    thread::spawn(move || {
        for _ in 0..requests {
            let Ok(mut request) = server.recv() else {
                return;
            };
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(name))
                    .map(|h| h.value.as_str().to_string())
            };
            let auth = header("Authorization");
            let content_type = header("Content-Type");
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let url = request.url().to_string();
            let response = if auth.as_deref() == Some(AUTH) {
                route(&url)
            } else {
                Response::from_string("unauthorized").with_status_code(401)
            };
            let _ = tx.send(Recorded {
                method: request.method().to_string(),
                url,
                content_type,
                body,
            });
            let _ = request.respond(response);
        }
    });

    (format!("http://127.0.0.1:{}", port), rx)
}

#[test]
fn test_identities_with_basic_auth() {
    let (url, rx) = spawn_daemon(1);
    let client = ServalRestClient::new(&url, "pum", "pum123");

    let identities = client.identities().expect("identities");
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].sid, MY_SID);
    assert_eq!(identities[0].did.as_deref(), Some("5550123"));
    assert_eq!(identities[0].name.as_deref(), Some("alice"));

    let seen = rx.recv().unwrap();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.url, "/restful/keyring/identities.json");
}

#[test]
fn test_wrong_password_is_error() {
    let (url, _rx) = spawn_daemon(1);
    let client = ServalRestClient::new(&url, "pum", "wrong");
    let err = client.identities().unwrap_err();
    assert!(format!("{:#}", err).contains("HTTP 401"));
}

#[test]
fn test_rhizome_list_and_payload() {
    let (url, _rx) = spawn_daemon(3);
    let client = ServalRestClient::new(&url, "pum", "pum123");

    let bundles = client.rhizome_list().expect("bundle list");
    assert_eq!(bundles.len(), 1);
    assert_eq!(bundles[0].id, "AB12");
    assert_eq!(bundles[0].filesize, 2048);
    assert_eq!(bundles[0].name.as_deref(), Some("a.txt"));

    assert_eq!(client.rhizome_raw("AB12").unwrap(), vec![0u8, 1, 2, 255]);

    let err = client.rhizome_raw("CDEF").unwrap_err();
    assert!(format!("{:#}", err).contains("HTTP 404"));
}

#[test]
fn test_conversations_and_messages() {
    let (url, _rx) = spawn_daemon(2);
    let client = ServalRestClient::new(&url, "pum", "pum123");

    let conversations = client.conversations(MY_SID).expect("conversations");
    assert_eq!(conversations[0].their_sid, THEIR_SID);
    assert!(!conversations[0].read);

    let messages = client.messages(MY_SID, THEIR_SID).expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].kind, MessageKind::Received);
    assert_eq!(messages[0].timestamp, Some(1_500_000_000));
    assert_eq!(messages[1].text.as_deref(), Some("hello"));
}

#[test]
fn test_send_message_multipart() {
    let (url, rx) = spawn_daemon(2);
    let client = ServalRestClient::new(&url, "pum", "pum123");

    client
        .send_message(MY_SID, THEIR_SID, "meet at the bridge")
        .expect("send");
    let seen = rx.recv().unwrap();
    assert_eq!(seen.method, "POST");
    assert!(seen.url.ends_with("/sendmessage"));
    assert!(seen
        .content_type
        .as_deref()
        .unwrap_or("")
        .starts_with("multipart/form-data; boundary="));
    assert!(seen.body.contains("name=\"message\""));
    assert!(seen.body.contains("meet at the bridge"));

    client.mark_all_read(MY_SID, THEIR_SID).expect("readall");
    let seen = rx.recv().unwrap();
    assert_eq!(seen.method, "POST");
    assert!(seen.url.ends_with("/readall"));
}

#[test]
fn test_invalid_sid_never_reaches_daemon() {
    let client = ServalRestClient::new("http://127.0.0.1:1", "pum", "pum123");
    let err = client.conversations("../../keyring").unwrap_err();
    assert!(err.to_string().contains("Invalid SID"));
}
