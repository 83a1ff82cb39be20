use crate::sql::base::error::ConnectorError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::{fmt::Display, future::Future};
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::{debug, error, warn};

/// Connects following the URL's `sslmode`: `disable` goes plain, `prefer`
/// tries TLS then falls back, everything else requires TLS.
pub(crate) async fn connect_client(url: &str) -> Result<Client, ConnectorError> {
    let config: Config = url
        .parse()
        .map_err(|e: tokio_postgres::Error| ConnectorError::InvalidUrl(e.to_string()))?;

    match config.get_ssl_mode() {
        SslMode::Disable => connect_plain(&config).await,
        SslMode::Prefer => match connect_tls(&config).await {
            Ok(client) => Ok(client),
            Err(err) => {
                warn!(%err, "TLS connection failed, retrying without TLS");
                connect_plain(&config).await
            }
        },
        _ => connect_tls(&config).await,
    }
}

async fn connect_tls(config: &Config) -> Result<Client, ConnectorError> {
    let tls = MakeTlsConnector::new(TlsConnector::new()?);
    let (client, connection) = config.connect(tls).await?;
    spawn_connection(connection);
    debug!("Connected with TLS");
    Ok(client)
}

async fn connect_plain(config: &Config) -> Result<Client, ConnectorError> {
    let (client, connection) = config.connect(NoTls).await?;
    spawn_connection(connection);
    debug!("Connected without TLS");
    Ok(client)
}

/// The connection object does the socket I/O and must be polled on its own
/// task for the client to make progress.
fn spawn_connection<C, E>(connection: C)
where
    C: Future<Output = Result<(), E>> + Send + 'static,
    E: Display,
{
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection closed with an error");
        }
    });
}
