//! # ncp-dns-solver
//!
//! ACME DNS-01 challenge solver for NCP Global DNS.
//!
//! [`NcpDnsSolver::present`] creates the `_acme-challenge` TXT record for a
//! challenge and publishes it; [`NcpDnsSolver::clean_up`] finds and removes it
//! again. Credentials come from a [`SecretResolver`], provider calls go
//! through `ncp-dns-provider`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ncp_dns_solver::{ChallengeRequest, FileSecretResolver, NcpDnsSolver};
//!
//! # async fn example(ch: ChallengeRequest) -> ncp_dns_solver::SolverResult<()> {
//! let solver = NcpDnsSolver::builder(
//!     "acme.example.com",
//!     Arc::new(FileSecretResolver::new("/var/run/secrets/ncp-dns")),
//! )
//! .build()?;
//!
//! solver.present(&ch).await?;
//! solver.clean_up(&ch).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod secrets;
mod solver;
mod types;

pub use config::{DEFAULT_LOG_FILTER, DEFAULT_SECRETS_DIR, SolverSettings};
pub use error::{CredentialError, ProviderError, SolverError, SolverResult};
pub use secrets::{FileSecretResolver, InMemorySecretResolver, SecretResolver};
pub use solver::{NcpDnsSolver, NcpDnsSolverBuilder, SOLVER_NAME};
pub use types::{ChallengeAction, ChallengeInput, ChallengeRequest, SecretKeySelector, SolverConfig};
