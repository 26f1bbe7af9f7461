//! Inventory CRUD and stock-alert evaluation.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use sigev_core::stock::{alerts_for, StockAlert};
use sigev_core::types::{Product, ProductCreate};
use sigev_core::validation;

use crate::endpoints;
use crate::error::ApiResult;
use crate::http::ApiClient;
use crate::notify::StockNotifier;

pub struct ProductService {
    client: Arc<ApiClient>,
}

impl ProductService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        ProductService { client }
    }

    /// The company's full inventory (the product collection doubles as
    /// the inventory endpoint).
    pub async fn list(&self, cancel: &CancellationToken) -> ApiResult<Vec<Product>> {
        self.client.get(endpoints::PRODUCT, cancel).await
    }

    /// One product by id.
    pub async fn get(&self, id: &str, cancel: &CancellationToken) -> ApiResult<Product> {
        self.client.get(&endpoints::product(id), cancel).await
    }

    pub async fn create(
        &self,
        payload: &ProductCreate,
        cancel: &CancellationToken,
    ) -> ApiResult<Product> {
        validate_product(payload)?;
        let product: Product = self.client.post(endpoints::PRODUCT, payload, cancel).await?;
        info!(name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn update(
        &self,
        id: &str,
        payload: &ProductCreate,
        cancel: &CancellationToken,
    ) -> ApiResult<Product> {
        validate_product(payload)?;
        self.client
            .put(&endpoints::product(id), payload, cancel)
            .await
    }

    pub async fn delete(&self, id: &str, cancel: &CancellationToken) -> ApiResult<()> {
        self.client.delete(&endpoints::product(id), cancel).await?;
        info!(%id, "Product deleted");
        Ok(())
    }

    /// Records a purchase: adds the received quantity to the product's
    /// stock. A purchase is a plain product update with the incremented
    /// stock; the rest of the record is carried over unchanged.
    pub async fn restock(
        &self,
        id: &str,
        quantity: i64,
        cancel: &CancellationToken,
    ) -> ApiResult<Product> {
        validation::validate_quantity(quantity)?;

        let current = self.get(id, cancel).await?;
        let payload = ProductCreate {
            name: current.name,
            description: current.description,
            stock: current.stock + quantity,
            price: current.price,
            min_stock_alert: current.min_stock_alert,
        };
        let product = self.update(id, &payload, cancel).await?;
        info!(name = %product.name, stock = product.stock, "Stock received");
        Ok(product)
    }

    /// Fetches the inventory and returns the products in an alert
    /// state, inventory order preserved.
    pub async fn stock_alerts(&self, cancel: &CancellationToken) -> ApiResult<Vec<StockAlert>> {
        let products = self.list(cancel).await?;
        Ok(alerts_for(&products))
    }

    /// Fetches the inventory and pushes each alert through the
    /// notifier. Returns the number delivered; a notifier without
    /// permission delivers zero and skips the fetch.
    pub async fn notify_stock_alerts(
        &self,
        notifier: &dyn StockNotifier,
        cancel: &CancellationToken,
    ) -> ApiResult<usize> {
        if !notifier.permission_granted() {
            return Ok(0);
        }
        let alerts = self.stock_alerts(cancel).await?;
        for alert in &alerts {
            notifier.notify(alert);
        }
        Ok(alerts.len())
    }
}

fn validate_product(payload: &ProductCreate) -> ApiResult<()> {
    validation::validate_product_name(&payload.name)?;
    validation::validate_price(payload.price)?;
    validation::validate_stock(payload.stock)?;
    validation::validate_stock(payload.min_stock_alert)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigev_core::money::Money;

    fn payload() -> ProductCreate {
        ProductCreate {
            name: "Azúcar 1kg".into(),
            description: "Bolsa de azúcar rubia".into(),
            stock: 10,
            price: Money::from_soles(5, 50),
            min_stock_alert: 3,
        }
    }

    #[test]
    fn test_validate_product_accepts_good_payload() {
        assert!(validate_product(&payload()).is_ok());
    }

    #[test]
    fn test_validate_product_rejects_free_products() {
        let mut p = payload();
        p.price = Money::zero();
        assert!(validate_product(&p).is_err());
    }

    #[test]
    fn test_validate_product_rejects_negative_stock() {
        let mut p = payload();
        p.stock = -1;
        assert!(validate_product(&p).is_err());
    }

    #[test]
    fn test_validate_product_allows_zero_stock() {
        // A depleted product is a valid product
        let mut p = payload();
        p.stock = 0;
        assert!(validate_product(&p).is_ok());
    }

    #[tokio::test]
    async fn test_restock_rejects_non_positive_quantity() {
        use crate::config::ClientConfig;
        use crate::token::MemoryTokenStore;

        // Unroutable base URL: the validation must fail before any
        // request is attempted
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:1".to_string();
        let client =
            crate::http::ApiClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();
        let service = ProductService::new(Arc::new(client));

        let cancel = CancellationToken::new();
        assert!(matches!(
            service.restock("p1", 0, &cancel).await,
            Err(crate::error::ApiError::Invalid(_))
        ));
        assert!(service.restock("p1", -3, &cancel).await.is_err());
    }

    #[tokio::test]
    async fn test_notify_without_permission_skips_fetch() {
        use crate::config::ClientConfig;
        use crate::notify::NullNotifier;
        use crate::token::MemoryTokenStore;

        // Unroutable base URL: the permission check must short-circuit
        // before the inventory fetch
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:1".to_string();
        let client =
            crate::http::ApiClient::new(&config, Arc::new(MemoryTokenStore::new())).unwrap();
        let service = ProductService::new(Arc::new(client));

        let cancel = CancellationToken::new();
        let delivered = service
            .notify_stock_alerts(&NullNotifier, &cancel)
            .await
            .unwrap();
        assert_eq!(delivered, 0);
    }
}
