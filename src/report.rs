//! Gravação do relatório de disponibilidade e do backup com timestamp.

use chrono::NaiveDateTime;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::UpdateError;
use crate::types::AvailabilityRecord;

const BACKUP_PREFIX: &str = "outages_";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Caminhos efetivamente gravados numa execução.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenReport {
    pub report: PathBuf,
    pub backup: PathBuf,
}

pub struct ReportWriter {
    report_path: PathBuf,
    backup_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(report_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_path(&self, run_at: NaiveDateTime) -> PathBuf {
        self.backup_dir
            .join(format!("{BACKUP_PREFIX}{}.csv", run_at.format(TIMESTAMP_FORMAT)))
    }

    /// Grava o backup (nunca sobrescreve) e depois o relatório canônico.
    ///
    /// O canônico é escrito num arquivo temporário e renomeado, então uma
    /// falha no meio não deixa o relatório anterior truncado.
    pub fn write(
        &self,
        records: &[AvailabilityRecord],
        run_at: NaiveDateTime,
    ) -> Result<WrittenReport, UpdateError> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| UpdateError::write(&self.backup_dir, e))?;

        let backup = self.backup_path(run_at);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&backup)
            .map_err(|e| UpdateError::write(&backup, e))?;
        write_csv(file, records).map_err(|e| UpdateError::write(&backup, e))?;
        info!("Backup gravado em {}", backup.display());

        let staging = self.report_path.with_extension("csv.tmp");
        let result = File::create(&staging)
            .map_err(csv::Error::from)
            .and_then(|file| write_csv(file, records))
            .and_then(|()| fs::rename(&staging, &self.report_path).map_err(csv::Error::from));
        if let Err(e) = result {
            let _ = fs::remove_file(&staging);
            return Err(UpdateError::write(&self.report_path, e));
        }
        info!(
            "{} registros gravados em {}",
            records.len(),
            self.report_path.display()
        );

        Ok(WrittenReport {
            report: self.report_path.clone(),
            backup,
        })
    }
}

fn write_csv<W: Write>(sink: W, records: &[AvailabilityRecord]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(sink);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Abre o diretório no gerenciador de arquivos da plataforma. Falha só gera aviso.
pub fn open_report_folder(dir: &Path) {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    match Command::new(opener).arg(dir).spawn() {
        Ok(_) => info!("Abrindo {}", dir.display()),
        Err(e) => warn!("Não foi possível abrir {}: {}", dir.display(), e),
    }
}
