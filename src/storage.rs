use deadpool_postgres::{ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use tracing::{debug, info};

use crate::config::DbSettings;
use crate::error::UpdateError;
use crate::types::OutageRecord;

/// Outages não planejados ligados a problema (não cancelado) ou mudança,
/// com o serviço técnico resolvido pelo problema ou pelo item de configuração.
const OUTAGE_QUERY: &str = r#"
    SELECT COALESCE(p."TechnicalService", ci."FriendlyName") AS tech_service,
           o."OutageStart" AS outage_start,
           o."OutageEnd" AS outage_end,
           o."OutageType" AS outage_type,
           p."Status" AS problem_status
      FROM "Outage" o
      JOIN "TrebuchetLink" tl ON o."RecID" = tl."JoinChildBusObId"
      LEFT JOIN "Problem" p ON p."RecID" = tl."JoinParentBusObId"
      LEFT JOIN "Change" c ON c."RecID" = tl."JoinParentBusObId"
      LEFT JOIN "ChangeRequestLinksCI" cr ON cr."ParentChangeID" = c."RecID"
      LEFT JOIN "ConfigurationItem" ci
             ON (ci."RecID" = cr."ChildID" OR ci."RecID" = p."TechnicalServiceID")
            AND ci."ConfigurationItemTypeName" = 'Config - Technical Service'
     WHERE (p."Status" IS NULL OR p."Status" <> 'Cancelled')
       AND COALESCE(p."TechnicalService", ci."FriendlyName") IS NOT NULL
       AND o."OutageType" = 'Unplanned'
       AND o."OutageStart" IS NOT NULL
       AND o."OutageEnd" IS NOT NULL
"#;

/// Acesso somente leitura ao banco de incidentes.
pub struct OutageStore {
    pool: Pool,
}

impl OutageStore {
    /// Cria o pool e confirma que uma conexão pode ser aberta.
    pub async fn connect(config: &DbSettings) -> Result<Self, UpdateError> {
        let mut cfg = deadpool_postgres::Config::new();
        cfg.host = Some(config.server_url.clone());
        cfg.port = Some(config.db_port);
        cfg.dbname = Some(config.db_name.clone());
        cfg.user = Some(config.uname.clone());
        cfg.password = Some(config.pwd.clone());
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        cfg.pool = Some(PoolConfig::new(config.db_max_connections));

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| UpdateError::data_source("incident database", e))?;
        pool.get()
            .await
            .map_err(|e| UpdateError::data_source("incident database", e))?;
        info!(
            "Conectado ao banco {} em {}",
            config.db_name, config.server_url
        );
        Ok(Self { pool })
    }

    /// Busca todos os outages elegíveis, de todo o histórico.
    pub async fn fetch_outages(&self) -> Result<Vec<OutageRecord>, UpdateError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| UpdateError::data_source("incident database", e))?;
        let rows = client
            .query(OUTAGE_QUERY, &[])
            .await
            .map_err(|e| UpdateError::data_source("outage records", e))?;
        debug!("{} linhas de outage retornadas", rows.len());
        rows.into_iter().map(OutageRecord::try_from).collect()
    }
}
