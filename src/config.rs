use config as config_crate;
use config_crate::{ConfigBuilder, Environment, File, builder::DefaultState};
use ini::{Ini, ParseOption};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::UpdateError;

/// Arquivo chave=valor com os parâmetros de conexão do banco.
pub const DB_CONFIG_FILE: &str = "db.config";
/// Arquivo opcional com os caminhos do relatório (extensão define o formato).
pub const SETTINGS_FILE: &str = "service_avail";

const DEFAULT_SHARE_DIR: &str = "N:/DoIT/US/Metrics/Core Monthly Report/ServiceAvail";
const REQUIRED_DB_KEYS: [&str; 4] = ["SERVER_URL", "DB_NAME", "UNAME", "PWD"];

/// Caminhos do compartilhamento. Não depende de credenciais, então pode ser
/// carregado antes da verificação de VPN.
#[derive(Debug, Clone, Deserialize)]
pub struct Locations {
    /// Diretório compartilhado onde ficam catálogo, relatório e backups.
    pub share_dir: PathBuf,
    pub catalog_file: PathBuf,
    pub report_file: PathBuf,
    pub backup_dir: PathBuf,
    /// Abre o diretório do relatório ao final da execução.
    pub open_folder: bool,
}

impl Locations {
    /// `service_avail.*` do diretório corrente, com sobrescrita por `SERVICE_AVAIL_*`.
    pub fn load() -> Result<Self, UpdateError> {
        Self::load_from(Path::new(SETTINGS_FILE))
    }

    pub fn load_from(settings: &Path) -> Result<Self, UpdateError> {
        let locations = config_crate::Config::builder()
            .set_default("share_dir", DEFAULT_SHARE_DIR)?
            .set_default("catalog_file", "service_config.csv")?
            .set_default("report_file", "outages.csv")?
            .set_default("backup_dir", "backups")?
            .set_default("open_folder", true)?
            .add_source(File::from(settings).required(false))
            .add_source(Environment::with_prefix("SERVICE_AVAIL"))
            .build()?
            .try_deserialize()?;
        Ok(locations)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.share_dir.join(&self.catalog_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.share_dir.join(&self.report_file)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.share_dir.join(&self.backup_dir)
    }
}

/// Parâmetros de conexão com o banco de incidentes.
#[derive(Clone, Deserialize)]
pub struct DbSettings {
    pub server_url: String,
    pub db_name: String,
    pub uname: String,
    pub pwd: String,
    pub db_port: u16,
    pub db_max_connections: usize,
}

impl DbSettings {
    pub fn load() -> Result<Self, UpdateError> {
        Self::load_from(Path::new(DB_CONFIG_FILE))
    }

    /// Lê `db.config` linha a linha, sem aspas nem escapes: o valor é tudo
    /// que vem depois do `=`, como está no arquivo.
    pub fn load_from(db_config: &Path) -> Result<Self, UpdateError> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
        };
        let raw = Ini::load_from_file_opt(db_config, opt).map_err(|e| {
            UpdateError::Config(format!("cannot read {}: {}", db_config.display(), e))
        })?;

        let mut builder: ConfigBuilder<DefaultState> = config_crate::Config::builder()
            .set_default("db_port", 5432)?
            .set_default("db_max_connections", 2)?
            .add_source(Environment::with_prefix("SERVICE_AVAIL"));
        for (key, value) in raw.general_section().iter() {
            builder = builder.set_override(key.to_lowercase(), value)?;
        }
        for key in REQUIRED_DB_KEYS {
            if raw.general_section().get(key).is_none() {
                return Err(UpdateError::Config(format!(
                    "{key} missing from {}",
                    db_config.display()
                )));
            }
        }

        let settings: DbSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Os quatro parâmetros de conexão são obrigatórios e não podem ser vazios.
    pub fn validate(&self) -> Result<(), UpdateError> {
        let values = [&self.server_url, &self.db_name, &self.uname, &self.pwd];
        for (key, value) in REQUIRED_DB_KEYS.iter().zip(values) {
            if value.trim().is_empty() {
                return Err(UpdateError::Config(format!("{key} must not be empty")));
            }
        }
        if self.db_max_connections == 0 {
            return Err(UpdateError::Config(
                "db_max_connections must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// Senha nunca vai para o log.
impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("server_url", &self.server_url)
            .field("db_name", &self.db_name)
            .field("uname", &self.uname)
            .field("pwd", &"***")
            .field("db_port", &self.db_port)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}
