use crate::config::Credentials;
use crate::database::{Database, DbPath};
use crate::error::{FetchError, FetchResult};
use anyhow::{anyhow, bail, Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Url,
};
use serde::Deserialize;
use serde_json::Value;

/// OAuth2 scopes granting admin read access to the realtime database
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/firebase.database",
    "https://www.googleapis.com/auth/userinfo.email",
];

/// Token the database emulator accepts as an admin credential
const EMULATOR_TOKEN: &str = "owner";

/// REST client for a Firebase Realtime Database
pub struct FirebaseClient {
    base_url: Url,
    namespace: Option<String>,
    client: Client,
}

impl FirebaseClient {
    /// Authenticate with the service account and build a database client
    ///
    /// Against an emulator the credential file is not read; the emulator's
    /// admin token is used instead.
    pub async fn connect(creds: &Credentials) -> FetchResult<Self> {
        let token = match &creds.emulator_host {
            Some(_) => EMULATOR_TOKEN.to_string(),
            None => access_token(&creds.account_file)
                .await
                .map_err(|e| FetchError::init("initializing app", e))?,
        };
        Self::with_token(creds, &token)
            .map_err(|e| FetchError::init("initializing database client", e))
    }

    fn with_token(creds: &Credentials, token: &str) -> Result<Self> {
        let db_url = Url::parse(&creds.database_url)
            .with_context(|| format!("invalid database URL {:?}", creds.database_url))?;

        let (base_url, namespace) = match &creds.emulator_host {
            Some(host) => {
                if host.contains("://") {
                    bail!("emulator host must not contain scheme: {host:?}");
                }
                let ns = db_url
                    .host_str()
                    .and_then(|h| h.split('.').next())
                    .filter(|ns| !ns.is_empty())
                    .ok_or_else(|| anyhow!("database URL {db_url} has no host"))?
                    .to_string();
                let emulator = Url::parse(&format!("http://{host}"))
                    .with_context(|| format!("invalid emulator host {host:?}"))?;
                (emulator, Some(ns))
            }
            None => {
                if db_url.scheme() != "https" {
                    bail!("invalid database URL {db_url}: scheme must be https");
                }
                (db_url, None)
            }
        };

        let mut headers = HeaderMap::new();
        let hv = HeaderValue::from_str(&format!("Bearer {token}"))?;
        headers.insert(AUTHORIZATION, hv);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("firefetch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(base_url = %base_url, namespace = ?namespace, "database client ready");
        Ok(FirebaseClient {
            base_url,
            namespace,
            client,
        })
    }

    /// Build the REST URL `<base>/<path>.json`
    pub fn url_for(&self, path: &DbPath, shallow: bool) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segs = url
                .path_segments_mut()
                .map_err(|_| anyhow!("database URL {} cannot be a base", self.base_url))?;
            segs.pop_if_empty();
            let last = path.segments().len().saturating_sub(1);
            for (i, seg) in path.segments().iter().enumerate() {
                if i == last {
                    segs.push(&format!("{seg}.json"));
                } else {
                    segs.push(seg);
                }
            }
            if path.is_root() {
                segs.push(".json");
            }
        }
        {
            let mut query = url.query_pairs_mut();
            if let Some(ns) = &self.namespace {
                query.append_pair("ns", ns);
            }
            if shallow {
                query.append_pair("shallow", "true");
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn read(&self, path: &DbPath, shallow: bool) -> Result<Value> {
        let url = self.url_for(path, shallow)?;
        tracing::info!(%path, shallow, "reading");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "http error status: {}; reason: {}",
                status.as_u16(),
                error_reason(&body)
            );
        }

        let value: Value = resp
            .json()
            .await
            .with_context(|| format!("decoding response for {path}"))?;
        Ok(value)
    }
}

impl Database for FirebaseClient {
    async fn get_shallow(&self, path: &DbPath) -> Result<Value> {
        self.read(path, true).await
    }

    async fn get(&self, path: &DbPath) -> Result<Value> {
        self.read(path, false).await
    }
}

/// Exchange the service-account key for an OAuth2 access token
async fn access_token(account_file: &str) -> Result<String> {
    let key = yup_oauth2::read_service_account_key(account_file)
        .await
        .with_context(|| format!("reading service account key {account_file}"))?;
    let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .context("building service account authenticator")?;
    let token = auth
        .token(SCOPES)
        .await
        .context("requesting access token")?;
    token
        .token()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("token endpoint returned no access token"))
}

/// Pull the human-readable reason out of an error response body
///
/// The database answers failures with `{"error": "..."}`; anything else is
/// reported verbatim.
fn error_reason(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "(empty response body)".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
