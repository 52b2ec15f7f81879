//! Taxonomia de erros fatais de uma execução de atualização.
//!
//! Nenhum erro é recuperado internamente: toda falha aborta a execução e o
//! operador simplesmente roda a ferramenta de novo.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    /// Compartilhamento de rede (VPN) inacessível. Nada foi lido nem escrito.
    #[error("cannot reach {path}: please connect to Global Protect VPN and try again")]
    Connectivity {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Falha ao ler o catálogo ou o banco de incidentes.
    #[error("failed to read {what}: {reason}")]
    DataSource { what: &'static str, reason: String },

    /// Falha ao gravar o relatório ou o backup.
    #[error(
        "error writing {path}: {reason}; please make sure you are connected to VPN and try again"
    )]
    Write { path: PathBuf, reason: String },

    /// Configuração ausente ou inválida.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl UpdateError {
    pub fn data_source(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::DataSource {
            what,
            reason: err.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for UpdateError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
