use mongodb::{Client, bson::doc};

use crate::common::{DatabaseError, DatabaseResult};

/// Send `{ping: 1}` to the admin database.
pub async fn check_health(client: &Client) -> DatabaseResult<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::warn!(error = %e, "MongoDB health check failed");
            DatabaseError::HealthCheckFailed(e.to_string())
        })
}
