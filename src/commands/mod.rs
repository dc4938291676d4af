use crate::{
    client::FirebaseClient,
    config::{Credentials, Invocation},
    error::FetchResult,
    fetch::fetch,
    Cli,
};

pub mod completions;

/// Resolve arguments and environment, connect, fetch, and return the text
/// to print.
pub async fn run(cli: &Cli) -> FetchResult<String> {
    let inv = Invocation::from_cli(cli)?;
    let creds = Credentials::from_env()?;
    tracing::debug!(?inv, database_url = %creds.database_url, "resolved invocation");

    let client = FirebaseClient::connect(&creds).await?;
    fetch(&client, &inv).await
}
