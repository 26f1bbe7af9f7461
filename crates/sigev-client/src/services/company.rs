//! Company CRUD.
//!
//! There is no "my company" endpoint; the user's `companyId` is the
//! only link, so [`CompanyService::my_company`] resolves it through
//! `GET /api/Company/{id}`.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use sigev_core::types::{Company, CompanyCreate, User};
use sigev_core::validation;

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;

pub struct CompanyService {
    client: Arc<ApiClient>,
}

impl CompanyService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        CompanyService { client }
    }

    /// All companies visible to this account.
    pub async fn list(&self, cancel: &CancellationToken) -> ApiResult<Vec<Company>> {
        self.client.get(endpoints::COMPANY, cancel).await
    }

    /// One company by id.
    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> ApiResult<Company> {
        self.client.get(&endpoints::company(id), cancel).await
    }

    /// Registers the manager's company.
    ///
    /// Validates nombre, RUC (11 digits), correo and the employee count
    /// locally before submitting. After the server confirms, the caller
    /// should refresh the current user so the new `companyId` shows up.
    pub async fn register(
        &self,
        payload: &CompanyCreate,
        cancel: &CancellationToken,
    ) -> ApiResult<Company> {
        validate_company(payload)?;

        let company: Company = self.client.post(endpoints::COMPANY, payload, cancel).await?;
        info!(nombre = %company.nombre, "Company registered");
        Ok(company)
    }

    /// Replaces a company's data. Same validation as registration.
    pub async fn update(
        &self,
        id: &str,
        payload: &CompanyCreate,
        cancel: &CancellationToken,
    ) -> ApiResult<Company> {
        validate_company(payload)?;
        self.client
            .put(&endpoints::company(id), payload, cancel)
            .await
    }

    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> ApiResult<()> {
        self.client.delete(&endpoints::company(id), cancel).await?;
        info!(%id, "Company deleted");
        Ok(())
    }

    /// The company linked to this user, if any.
    ///
    /// `None` when the user has no `companyId` yet, or when the linked
    /// id no longer resolves (the company was deleted elsewhere).
    pub async fn my_company(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> ApiResult<Option<Company>> {
        let Some(id) = user.company_id.as_deref() else {
            return Ok(None);
        };
        match self.get(id, cancel).await {
            Ok(company) => Ok(Some(company)),
            Err(ApiError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn validate_company(payload: &CompanyCreate) -> ApiResult<()> {
    validation::require("nombre", &payload.nombre)?;
    validation::validate_ruc(&payload.ruc)?;
    if !payload.correo.trim().is_empty() {
        validation::validate_email(&payload.correo)?;
    }
    validation::validate_employee_count(payload.numero_empleados)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::token::MemoryTokenStore;

    fn payload() -> CompanyCreate {
        CompanyCreate {
            nombre: "Bodega Sol S.A.C.".into(),
            correo: "ventas@bodegasol.pe".into(),
            telefono: "987654321".into(),
            direccion: "Av. Los Olivos 123".into(),
            pais: "Perú".into(),
            numero_empleados: 4,
            ruc: "20123456789".into(),
        }
    }

    fn unlinked_user() -> User {
        User {
            id: "u1".into(),
            user_name: "maria".into(),
            email: "maria@tienda.pe".into(),
            telefono: None,
            direccion: None,
            role: 0,
            estado: 1,
            fecha_registro: "2024-01-15T10:30:00".into(),
            company_id: None,
            company_nombre: None,
        }
    }

    #[test]
    fn test_validate_company_accepts_complete_payload() {
        assert!(validate_company(&payload()).is_ok());
    }

    #[test]
    fn test_validate_company_rejects_bad_ruc() {
        let mut p = payload();
        p.ruc = "123".into();
        assert!(matches!(validate_company(&p), Err(ApiError::Invalid(_))));
    }

    #[test]
    fn test_validate_company_rejects_zero_employees() {
        let mut p = payload();
        p.numero_empleados = 0;
        assert!(validate_company(&p).is_err());
    }

    #[test]
    fn test_validate_company_allows_empty_email() {
        let mut p = payload();
        p.correo = String::new();
        assert!(validate_company(&p).is_ok());
    }

    #[tokio::test]
    async fn test_my_company_without_link_skips_network() {
        // The client points at an unroutable port; an unlinked user
        // must resolve to None without any request going out
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:1".to_string();
        let client =
            ApiClient::new(&config, std::sync::Arc::new(MemoryTokenStore::new())).unwrap();
        let service = CompanyService::new(Arc::new(client));

        let cancel = CancellationToken::new();
        let company = service
            .my_company(&unlinked_user(), &cancel)
            .await
            .unwrap();
        assert!(company.is_none());
    }
}
