//! SSH access control
//!
//! Switches the ssh unit through `systemctl` and maintains an authorized-keys
//! file filled with the public keys a GitHub user publishes at
//! `<keys_url>/<user>.keys`.

use crate::{command, config::SshConfig, http_client};
use anyhow::{Context, Result, ensure};
use log::info;
#[cfg(feature = "mock")]
use mockall::automock;
use reqwest::Client;
use std::{io::ErrorKind, path::PathBuf};
use touch_settings_core::SshStatus;
use trait_variant::make;

/// First line of a managed authorized-keys file, followed by the username
const OWNER_MARKER: &str = "# keys of ";

#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait SshManager {
    async fn set_enabled(&self, enabled: bool) -> Result<()>;
    /// Replace the authorized keys with those of `username`, `None` removes them
    async fn set_keys_username(&self, username: Option<String>) -> Result<()>;
    async fn status(&self) -> Result<SshStatus>;
}

/// GitHub usernames are ASCII letters, digits and hyphens
fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Service for SSH access operations
#[derive(Clone, Debug)]
pub struct SshService {
    service: String,
    authorized_keys: PathBuf,
    keys_url: String,
    client: Client,
}

impl SshService {
    const SYSTEMCTL: &str = "systemctl";

    pub fn new(config: &SshConfig) -> Result<Self> {
        Ok(SshService {
            service: config.service.clone(),
            authorized_keys: config.authorized_keys.clone(),
            keys_url: config.keys_url.clone(),
            client: http_client::https_client()?,
        })
    }

    async fn fetch_keys(&self, username: &str) -> Result<String> {
        ensure!(
            is_valid_username(username),
            "invalid username: {username:?}"
        );

        let url = format!("{}/{username}.keys", self.keys_url);
        info!("GET {url}");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .context(format!("failed to send GET request to {url}"))?;

        let body = http_client::handle_http_response(res, &format!("GET {url}")).await?;
        let keys = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();

        ensure!(!keys.is_empty(), "no public keys found for {username}");

        Ok(format!("{OWNER_MARKER}{username}\n{}\n", keys.join("\n")))
    }

    async fn keys_username(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.authorized_keys).await {
            Ok(content) => Ok(content
                .lines()
                .next()
                .and_then(|line| line.strip_prefix(OWNER_MARKER))
                .map(str::to_string)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("failed to read authorized keys"),
        }
    }

    async fn remove_keys(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.authorized_keys).await {
            Ok(()) => {
                info!("removed authorized keys");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("failed to remove authorized keys"),
        }
    }
}

impl SshManager for SshService {
    async fn set_enabled(&self, enabled: bool) -> Result<()> {
        info!("setting ssh enabled: {enabled}");
        let action = if enabled { "enable" } else { "disable" };
        command::run_checked(Self::SYSTEMCTL, &[action, "--now", &self.service])
            .await
            .with_context(|| format!("failed to {action} {}", self.service))?;
        Ok(())
    }

    async fn set_keys_username(&self, username: Option<String>) -> Result<()> {
        let Some(username) = username else {
            return self.remove_keys().await;
        };

        let content = self.fetch_keys(&username).await?;

        if let Some(parent) = self.authorized_keys.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("failed to create authorized keys directory")?;
        }
        tokio::fs::write(&self.authorized_keys, content)
            .await
            .context("failed to write authorized keys")?;

        info!("authorized keys of {username}");
        Ok(())
    }

    async fn status(&self) -> Result<SshStatus> {
        let active = command::run(Self::SYSTEMCTL, &["is-active", "--quiet", &self.service])
            .await?
            .success;

        Ok(SshStatus {
            enabled: active,
            keys_username: self.keys_username().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn service_for(dir: &TempDir, keys_url: String) -> SshService {
        SshService::new(&SshConfig {
            service: "ssh".to_string(),
            authorized_keys: dir.path().join("ssh").join("authorized_keys"),
            keys_url,
        })
        .expect("should create service")
    }

    /// Serve a single HTTP response and return the base url
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind listener");
        let addr = listener.local_addr().expect("should have address");

        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = stream.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{addr}")
    }

    mod keys {
        use super::*;

        #[tokio::test]
        async fn fetched_keys_are_written_with_owner() {
            let dir = TempDir::new().expect("should create temp dir");
            let url = serve_once("200 OK", "ssh-ed25519 AAAA first\n\nssh-rsa BBBB second\n").await;
            let service = service_for(&dir, url);

            service
                .set_keys_username(Some("octocat".to_string()))
                .await
                .expect("should write keys");

            let content = std::fs::read_to_string(&service.authorized_keys).unwrap();
            assert_eq!(
                content,
                "# keys of octocat\nssh-ed25519 AAAA first\nssh-rsa BBBB second\n"
            );
            assert_eq!(
                service.keys_username().await.unwrap().as_deref(),
                Some("octocat")
            );
        }

        #[tokio::test]
        async fn user_without_keys_is_rejected() {
            let dir = TempDir::new().expect("should create temp dir");
            let url = serve_once("200 OK", "\n").await;
            let service = service_for(&dir, url);

            let err = service
                .set_keys_username(Some("nobody".to_string()))
                .await
                .unwrap_err();

            assert!(err.to_string().contains("no public keys found for nobody"));
            assert!(!service.authorized_keys.exists());
        }

        #[tokio::test]
        async fn unknown_user_reports_status() {
            let dir = TempDir::new().expect("should create temp dir");
            let url = serve_once("404 Not Found", "Not Found").await;
            let service = service_for(&dir, url);

            let err = service
                .set_keys_username(Some("ghost".to_string()))
                .await
                .unwrap_err();

            assert!(err.to_string().contains("404"));
        }

        #[test]
        fn username_charset() {
            assert!(is_valid_username("octo-cat42"));
            assert!(!is_valid_username(""));
            assert!(!is_valid_username("../x"));
            assert!(!is_valid_username("a?b"));
            assert!(!is_valid_username("a/b"));
            assert!(!is_valid_username("ünïcode"));
        }

        #[tokio::test]
        async fn path_like_username_is_rejected_before_request() {
            let dir = TempDir::new().expect("should create temp dir");
            // nothing listens here; a request would fail with a connection error
            let service = service_for(&dir, "http://127.0.0.1:9".to_string());

            for username in ["../x", "a?b"] {
                let err = service
                    .set_keys_username(Some(username.to_string()))
                    .await
                    .unwrap_err();

                assert!(err.to_string().contains("invalid username"), "{err:#}");
            }
            assert!(!service.authorized_keys.exists());
        }

        #[tokio::test]
        async fn clearing_username_removes_file() {
            let dir = TempDir::new().expect("should create temp dir");
            let service = service_for(&dir, "http://127.0.0.1:9".to_string());
            std::fs::create_dir_all(service.authorized_keys.parent().unwrap()).unwrap();
            std::fs::write(&service.authorized_keys, "# keys of octocat\nssh-ed25519 AAAA\n")
                .unwrap();

            service.set_keys_username(None).await.expect("should remove");

            assert!(!service.authorized_keys.exists());
            assert_eq!(service.keys_username().await.unwrap(), None);

            // already removed
            service.set_keys_username(None).await.expect("should be a no-op");
        }

        #[tokio::test]
        async fn foreign_file_has_no_owner() {
            let dir = TempDir::new().expect("should create temp dir");
            let service = service_for(&dir, "http://127.0.0.1:9".to_string());
            std::fs::create_dir_all(service.authorized_keys.parent().unwrap()).unwrap();
            std::fs::write(&service.authorized_keys, "ssh-ed25519 AAAA manual\n").unwrap();

            assert_eq!(service.keys_username().await.unwrap(), None);
        }
    }
}
