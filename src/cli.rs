//! Command-line entry points.

use std::{net::IpAddr, sync::Arc};

use crate::{
    config::{Config, RefreshPolicy},
    error, info,
    server::start_api_server,
    session::Session,
    spotify::SpotifyClient,
    warning,
};

#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub refresh_policy: Option<RefreshPolicy>,
    pub open: bool,
}

/// Runs the proxy until the listener fails. Configuration errors and bind
/// failures are fatal.
pub async fn serve(opts: ServeOptions) {
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };
    apply_overrides(&mut config, &opts);

    let session = Arc::new(Session::new(SpotifyClient::new(&config), config.refresh_policy));

    let login_url = local_login_url(&config);
    info!("Log in with Spotify at {}", login_url);
    if opts.open {
        tokio::spawn(async move {
            // give the listener a moment to come up
            tokio::time::sleep(std::time::Duration::from_millis(300)).await;
            if webbrowser::open(&login_url).is_err() {
                warning!(
                    "Failed to open browser. Please navigate to the following URL manually:\n{}",
                    login_url
                );
            }
        });
    }

    if let Err(e) = start_api_server(session, config.server_addr()).await {
        error!("Server stopped. Err: {}", e);
    }
}

pub fn apply_overrides(config: &mut Config, opts: &ServeOptions) {
    if let Some(host) = opts.host {
        config.host = host;
    }
    if let Some(port) = opts.port {
        config.port = port;
    }
    if let Some(policy) = opts.refresh_policy {
        config.refresh_policy = policy;
    }
}

/// Address a local browser can use to reach `/spotify/auth`. A wildcard bind
/// address is replaced by loopback.
pub fn local_login_url(config: &Config) -> String {
    let host = if config.host.is_unspecified() {
        "127.0.0.1".to_string()
    } else {
        match config.host {
            IpAddr::V4(v4) => v4.to_string(),
            IpAddr::V6(v6) => format!("[{v6}]"),
        }
    };
    format!("http://{}:{}/spotify/auth", host, config.port)
}
