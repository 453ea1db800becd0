// src/db/catalog_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::catalog::{Company, Customer, Distribution, Formula},
};

// Dados mestres: só criação, listagem e busca. Os saldos pertencem ao
// razão de transações (ledger_repo), nunca são escritos daqui.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Companies ---

    pub async fn create_company(
        &self,
        name: &str,
        address: Option<&str>,
        contact_number: Option<&str>,
    ) -> Result<Company, AppError> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, address, contact_number)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(contact_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(company)
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let companies =
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(companies)
    }

    // --- Formulas ---

    pub async fn create_formula(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Formula, AppError> {
        let formula = sqlx::query_as::<_, Formula>(
            r#"
            INSERT INTO formulas (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(formula)
    }

    pub async fn list_formulas(&self) -> Result<Vec<Formula>, AppError> {
        let formulas = sqlx::query_as::<_, Formula>("SELECT * FROM formulas ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(formulas)
    }

    // --- Distributions ---

    pub async fn create_distribution(
        &self,
        name: &str,
        address: Option<&str>,
        contact_number: Option<&str>,
    ) -> Result<Distribution, AppError> {
        let distribution = sqlx::query_as::<_, Distribution>(
            r#"
            INSERT INTO distributions (name, address, contact_number)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(contact_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(distribution)
    }

    pub async fn list_distributions(&self) -> Result<Vec<Distribution>, AppError> {
        let distributions =
            sqlx::query_as::<_, Distribution>("SELECT * FROM distributions ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(distributions)
    }

    // --- Customers ---

    pub async fn create_customer(
        &self,
        name: &str,
        address: Option<&str>,
        contact_number: Option<&str>,
    ) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, address, contact_number)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(address)
        .bind(contact_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(customer)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(customers)
    }

}
