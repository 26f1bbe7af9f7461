//! Sale submission, history, and the monthly revenue report.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use sigev_core::reports::{monthly_earnings, MonthBucket};
use sigev_core::types::{Sale, SaleCreate};

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;

pub struct SaleService {
    client: Arc<ApiClient>,
}

impl SaleService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        SaleService { client }
    }

    /// Submits a sale built by [`sigev_core::draft::SaleDraft::payload`].
    ///
    /// The draft already validated the customer fields; this re-checks
    /// only the structural minimum (at least one item) so a hand-built
    /// payload cannot slip through empty.
    pub async fn create(
        &self,
        payload: &SaleCreate,
        cancel: &CancellationToken,
    ) -> ApiResult<Sale> {
        if payload.items.is_empty() {
            return Err(ApiError::Api {
                status: 400,
                message: "La venta no tiene productos.".into(),
            });
        }

        let sale: Sale = self.client.post(endpoints::SALE, payload, cancel).await?;
        info!(id = %sale.id, total = %sale.total, "Sale recorded");
        Ok(sale)
    }

    /// The company's sale history.
    pub async fn list_mine(&self, cancel: &CancellationToken) -> ApiResult<Vec<Sale>> {
        self.client.get(endpoints::SALE_MINE, cancel).await
    }

    /// Full detail for one sale.
    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> ApiResult<Sale> {
        self.client.get(&endpoints::sale(id), cancel).await
    }

    /// Replaces a recorded sale (payment-state corrections and the
    /// like). Same structural check as create.
    pub async fn update(
        &self,
        id: &str,
        payload: &SaleCreate,
        cancel: &CancellationToken,
    ) -> ApiResult<Sale> {
        if payload.items.is_empty() {
            return Err(ApiError::Api {
                status: 400,
                message: "La venta no tiene productos.".into(),
            });
        }
        self.client.put(&endpoints::sale(id), payload, cancel).await
    }

    /// Removes a recorded sale.
    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> ApiResult<()> {
        self.client.delete(&endpoints::sale(id), cancel).await?;
        info!(%id, "Sale deleted");
        Ok(())
    }

    /// Fetches the history and buckets it into the trailing six
    /// calendar months ending today.
    pub async fn monthly_report(
        &self,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<MonthBucket>> {
        let sales = self.list_mine(cancel).await?;
        let today = chrono::Local::now().date_naive();
        Ok(monthly_earnings(&sales, today))
    }
}
