//! 密钥解析抽象 Trait
//!
//! 实现:
//! - `FileSecretResolver`: 挂载目录 `<root>/<namespace>/<name>/<key>`
//! - `InMemorySecretResolver`: 测试与嵌入场景

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::CredentialError;

/// Capability to read one key of a namespaced secret.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Returns the raw bytes stored under `key` in secret `namespace/name`.
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Vec<u8>, CredentialError>;
}

/// Secrets held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemorySecretResolver {
    secrets: HashMap<(String, String), HashMap<String, Vec<u8>>>,
}

impl InMemorySecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) one key of a secret.
    #[must_use]
    pub fn with_secret(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        self.secrets
            .entry((namespace.into(), name.into()))
            .or_default()
            .insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretResolver for InMemorySecretResolver {
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Vec<u8>, CredentialError> {
        let secret = self
            .secrets
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| CredentialError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })?;

        secret
            .get(key)
            .cloned()
            .ok_or_else(|| CredentialError::KeyNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
                key: key.to_string(),
            })
    }
}

/// Secrets mounted as files, one directory per secret and one file per key.
#[derive(Debug, Clone)]
pub struct FileSecretResolver {
    root: PathBuf,
}

impl FileSecretResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// A path segment must be a single normal component (no `..`, `/`, or empty).
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

#[async_trait]
impl SecretResolver for FileSecretResolver {
    async fn resolve(
        &self,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Result<Vec<u8>, CredentialError> {
        let access = |detail: String| CredentialError::Access {
            namespace: namespace.to_string(),
            name: name.to_string(),
            detail,
        };

        for segment in [namespace, name, key] {
            if !is_plain_segment(segment) {
                return Err(access(format!("invalid path segment {segment:?}")));
            }
        }

        let secret_dir = self.root.join(namespace).join(name);
        match tokio::fs::metadata(&secret_dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(access(format!("{} is not a directory", secret_dir.display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CredentialError::SecretNotFound {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(access(e.to_string())),
        }

        match tokio::fs::read(secret_dir.join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CredentialError::KeyNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(access(e.to_string())),
        }
    }
}
