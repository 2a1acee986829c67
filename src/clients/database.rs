use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row, types::FromSql};
use tracing::{debug, error, info};

use crate::{
    clients::{ReferenceStore, ResellerSettings},
    models::entity::{Contractor, ContractorType, Employee, Seller},
};

pub struct DatabaseClient {
    client: Client,
    email_from: String,
}

impl DatabaseClient {
    pub async fn connect(database_url: &str, email_from: String) -> Result<Self, Error> {
        info!("Connecting to PostgreSQL database");

        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection closed with error");
            }
        });

        info!("PostgreSQL connection established");

        Ok(Self { client, email_from })
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;

        Ok(())
    }

    async fn query_opt(
        &self,
        statement: &str,
        id: i64,
        entity: &str,
    ) -> Result<Option<Row>, Error> {
        let row = self
            .client
            .query_opt(statement, &[&id])
            .await
            .map_err(|e| {
                error!(error = %e, entity, id, "Entity lookup failed");
                anyhow!("Failed to load {} {}: {}", entity, id, e)
            })?;

        debug!(entity, id, found = row.is_some(), "Entity lookup completed");

        Ok(row)
    }
}

/// Reads a column without panicking on NULLs or unexpected SQL types.
fn column<'a, T>(row: &'a Row, name: &str, entity: &str) -> Result<T, Error>
where
    T: FromSql<'a>,
{
    row.try_get(name).map_err(|e| {
        error!(error = %e, entity, column = name, "Unexpected column value");
        anyhow!("Invalid {} column {}: {}", entity, name, e)
    })
}

#[async_trait]
impl ReferenceStore for DatabaseClient {
    async fn seller_by_id(&self, id: i64) -> Result<Option<Seller>, Error> {
        let row = self
            .query_opt(
                r#"
                SELECT id::INT8 AS id, COALESCE(name, '') AS name
                FROM sellers
                WHERE id = $1::INT8
                "#,
                id,
                "seller",
            )
            .await?;

        row.map(|row| {
            Ok(Seller {
                id: column(&row, "id", "seller")?,
                name: column(&row, "name", "seller")?,
            })
        })
        .transpose()
    }

    async fn contractor_by_id(&self, id: i64) -> Result<Option<Contractor>, Error> {
        let row = self
            .query_opt(
                r#"
                SELECT id::INT8 AS id,
                       COALESCE(type, 0)::INT4 AS type,
                       COALESCE(seller_id, 0)::INT8 AS seller_id,
                       COALESCE(name, '') AS name,
                       COALESCE(full_name, '') AS full_name,
                       COALESCE(email, '') AS email,
                       COALESCE(mobile, '') AS mobile
                FROM contractors
                WHERE id = $1::INT8
                "#,
                id,
                "contractor",
            )
            .await?;

        row.map(|row| {
            Ok(Contractor {
                id: column(&row, "id", "contractor")?,
                contractor_type: ContractorType::from_code(column(&row, "type", "contractor")?),
                seller_id: column(&row, "seller_id", "contractor")?,
                name: column(&row, "name", "contractor")?,
                full_name: column(&row, "full_name", "contractor")?,
                email: column(&row, "email", "contractor")?,
                mobile: column(&row, "mobile", "contractor")?,
            })
        })
        .transpose()
    }

    async fn employee_by_id(&self, id: i64) -> Result<Option<Employee>, Error> {
        let row = self
            .query_opt(
                r#"
                SELECT id::INT8 AS id, COALESCE(full_name, '') AS full_name
                FROM employees
                WHERE id = $1::INT8
                "#,
                id,
                "employee",
            )
            .await?;

        row.map(|row| {
            Ok(Employee {
                id: column(&row, "id", "employee")?,
                full_name: column(&row, "full_name", "employee")?,
            })
        })
        .transpose()
    }

    async fn status_name(&self, code: i64) -> Result<String, Error> {
        let row = self
            .query_opt(
                "SELECT COALESCE(name, '') AS name FROM return_statuses WHERE code = $1::INT8",
                code,
                "status",
            )
            .await?;

        match row {
            Some(row) => column(&row, "name", "status"),
            None => Ok(String::new()),
        }
    }
}

#[async_trait]
impl ResellerSettings for DatabaseClient {
    async fn default_from_address(&self) -> Result<String, Error> {
        Ok(self.email_from.clone())
    }

    async fn permitted_recipient_emails(
        &self,
        reseller_id: i64,
        permission: &str,
    ) -> Result<Vec<String>, Error> {
        let rows = self
            .client
            .query(
                r#"
                SELECT e.email
                FROM employee_permissions p
                JOIN employees e ON e.id = p.employee_id
                WHERE p.seller_id = $1::INT8
                  AND p.permission = $2::TEXT
                  AND COALESCE(e.email, '') <> ''
                ORDER BY e.id
                "#,
                &[&reseller_id, &permission],
            )
            .await
            .map_err(|e| {
                error!(error = %e, reseller_id, permission, "Recipient lookup failed");
                anyhow!("Failed to load recipients for reseller {}: {}", reseller_id, e)
            })?;

        let emails = rows
            .iter()
            .map(|row| column(row, "email", "employee"))
            .collect::<Result<Vec<String>, Error>>()?;

        debug!(
            reseller_id,
            permission,
            recipients = emails.len(),
            "Recipients resolved"
        );

        Ok(emails)
    }
}
