//! Client for the daemon's REST API
//!
//! Wraps the `/restful/...` endpoints used by the UI. All requests carry
//! HTTP basic auth for the REST user configured in the daemon.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::Read;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::serval::table::{Bundle, Conversation, FromRow, Identity, Message, RestTable};
use crate::settings::Settings;

/// Request timeout for REST calls
pub const REST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the UI needs from the daemon's REST API
pub trait ServalApi {
    /// Identities unlocked in the keyring
    fn identities(&self) -> Result<Vec<Identity>>;
    /// All rhizome bundles known to the daemon
    fn rhizome_list(&self) -> Result<Vec<Bundle>>;
    /// Raw payload of one bundle
    fn rhizome_raw(&self, bid: &str) -> Result<Vec<u8>>;
    fn conversations(&self, my_sid: &str) -> Result<Vec<Conversation>>;
    /// Messages of one conversation, newest first
    fn messages(&self, my_sid: &str, their_sid: &str) -> Result<Vec<Message>>;
    fn send_message(&self, my_sid: &str, their_sid: &str, text: &str) -> Result<()>;
    fn mark_all_read(&self, my_sid: &str, their_sid: &str) -> Result<()>;
}

/// Blocking REST client
pub struct ServalRestClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl ServalRestClient {
    pub fn new(base_url: &str, user: &str, pass: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REST_TIMEOUT).build();
        let credentials = STANDARD.encode(format!("{}:{}", user, pass));
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", credentials),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.rest_url, &settings.rest_user, &settings.rest_pass)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/restful/{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> Result<ureq::Response> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let request = self
            .agent
            .get(&url)
            .set("Authorization", &self.authorization);
        check(request.call(), &url)
    }

    fn get_table<T: FromRow>(&self, path: &str) -> Result<Vec<T>> {
        let response = self.get(path)?;
        let table: RestTable = serde_json::from_reader(response.into_reader())
            .with_context(|| format!("Failed to parse JSON from {}", path))?;
        table.decode()
    }
}

impl ServalApi for ServalRestClient {
    fn identities(&self) -> Result<Vec<Identity>> {
        self.get_table("keyring/identities.json")
    }

    fn rhizome_list(&self) -> Result<Vec<Bundle>> {
        self.get_table("rhizome/bundlelist.json")
    }

    fn rhizome_raw(&self, bid: &str) -> Result<Vec<u8>> {
        check_hex_id(bid, "bundle id")?;
        let response = self.get(&format!("rhizome/{}/raw.bin", bid))?;
        let mut payload = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut payload)
            .context("Failed to read bundle payload")?;
        Ok(payload)
    }

    fn conversations(&self, my_sid: &str) -> Result<Vec<Conversation>> {
        check_hex_id(my_sid, "SID")?;
        self.get_table(&format!("meshms/{}/conversationlist.json", my_sid))
    }

    fn messages(&self, my_sid: &str, their_sid: &str) -> Result<Vec<Message>> {
        check_hex_id(my_sid, "SID")?;
        check_hex_id(their_sid, "SID")?;
        self.get_table(&format!("meshms/{}/{}/messagelist.json", my_sid, their_sid))
    }

    fn send_message(&self, my_sid: &str, their_sid: &str, text: &str) -> Result<()> {
        check_hex_id(my_sid, "SID")?;
        check_hex_id(their_sid, "SID")?;

        let url = self.url(&format!("meshms/{}/{}/sendmessage", my_sid, their_sid));
        let (content_type, body) = multipart_message(text);
        tracing::info!("Sending MeshMS message to {}", their_sid);
        let request = self
            .agent
            .post(&url)
            .set("Authorization", &self.authorization)
            .set("Content-Type", &content_type);
        check(request.send_bytes(&body), &url)?;
        Ok(())
    }

    fn mark_all_read(&self, my_sid: &str, their_sid: &str) -> Result<()> {
        check_hex_id(my_sid, "SID")?;
        check_hex_id(their_sid, "SID")?;

        let url = self.url(&format!("meshms/{}/{}/readall", my_sid, their_sid));
        let request = self
            .agent
            .post(&url)
            .set("Authorization", &self.authorization);
        check(request.call(), &url)?;
        Ok(())
    }
}

fn check(
    response: std::result::Result<ureq::Response, ureq::Error>,
    url: &str,
) -> Result<ureq::Response> {
    match response {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(code, resp)) => {
            let text = resp.into_string().unwrap_or_default();
            bail!("HTTP {} from {}: {}", code, url, text.trim());
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!("Request to {} failed", url))),
    }
}

/// SIDs and bundle ids are hex strings and end up in URL paths
fn check_hex_id(id: &str, what: &str) -> Result<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Invalid {}: {:?}", what, id);
    }
    Ok(())
}

/// Build a `multipart/form-data` body with a single `message` part
fn multipart_message(text: &str) -> (String, Vec<u8>) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let mut boundary = format!("sdnatui-{:x}", nanos);
    while text.contains(&boundary) {
        boundary.push('x');
    }

    let mut body = String::new();
    body.push_str(&format!("--{}\r\n", boundary));
    body.push_str("Content-Disposition: form-data; name=\"message\"\r\n");
    body.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
    body.push_str(text);
    body.push_str(&format!("\r\n--{}--\r\n", boundary));

    (
        format!("multipart/form-data; boundary={}", boundary),
        body.into_bytes(),
    )
}
