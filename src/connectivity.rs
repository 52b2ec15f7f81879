use std::fs::File;
use std::path::Path;

use tracing::{info, warn};

use crate::error::UpdateError;

/// Verifica se o compartilhamento de rede responde, abrindo o catálogo.
///
/// Sem VPN o drive mapeado não existe e a abertura falha de imediato.
pub fn check_share_reachable(catalog_path: &Path) -> Result<(), UpdateError> {
    match File::open(catalog_path) {
        Ok(_) => {
            info!("Compartilhamento acessível: {}", catalog_path.display());
            Ok(())
        }
        Err(source) => {
            warn!(
                "Falha ao acessar {}: {}",
                catalog_path.display(),
                source
            );
            Err(UpdateError::Connectivity {
                path: catalog_path.to_path_buf(),
                source,
            })
        }
    }
}
