//! # Sale Draft (Invoice-Type Enforcer)
//!
//! Manages the in-progress sale: line items, running total, and the
//! boleta/factura document rule.
//!
//! ## Document Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Boleta / Factura Enforcement                         │
//! │                                                                         │
//! │  Total ≤ S/ 700                     Total > S/ 700                      │
//! │  ────────────────                   ────────────────                    │
//! │  • Boleta or Factura selectable     • Forced to Factura                 │
//! │  • Boleta: DNI only                 • Boleta option locked              │
//! │  • Factura: RUC + razón social      • Stays locked while over           │
//! │                                                                         │
//! │  EVERY kind change - user-initiated or threshold-forced - clears        │
//! │  the customer fields. Receipt-shaped identities (a DNI standing in      │
//! │  for a name) and invoice-shaped ones (RUC + razón social) must          │
//! │  never mix.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Draft Operations Flow
//! ```text
//! Select Product ──► add_item()        ──► merge qty, enforce threshold
//! Change Quantity ─► update_quantity() ──► qty 0 removes, enforce
//! Remove Line ─────► remove_item()     ──► enforce (may unlock boleta)
//! Pick Kind ───────► set_document_kind() ─► rejected while locked
//! Submit ──────────► validate() + payload()
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{compute_total, PaymentMethod, Product, SaleCreate, SaleItem};
use crate::validation;
use crate::INVOICE_THRESHOLD;

// =============================================================================
// Document Kind
// =============================================================================

/// The document types a sale can be issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Simple receipt; the customer is identified by a personal DNI.
    Boleta,
    /// Tax invoice; requires a RUC and a legal/trade name.
    Factura,
}

impl Default for DocumentKind {
    fn default() -> Self {
        DocumentKind::Boleta
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Customer identification fields entered on the sale form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Name or razón social. For a boleta this stays empty and is
    /// auto-filled from the documento at submission time.
    pub nombre: String,

    /// DNI (boleta) or RUC (factura).
    pub documento: String,

    pub email: String,

    pub telefono: String,
}

impl Customer {
    /// True when every field is empty (the post-switch state).
    pub fn is_empty(&self) -> bool {
        self.nombre.is_empty()
            && self.documento.is_empty()
            && self.email.is_empty()
            && self.telefono.is_empty()
    }
}

// =============================================================================
// Draft Item
// =============================================================================

/// A line in the in-progress sale.
///
/// ## Price Freezing
/// The unit price is captured when the product is added. If the product
/// price changes afterwards, this line keeps the original price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftItem {
    pub producto_id: String,

    /// Product name at time of adding (for display only).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub precio_unitario: Money,

    pub cantidad: i64,
}

impl DraftItem {
    /// Line total = cantidad × precioUnitario.
    pub fn line_total(&self) -> Money {
        self.precio_unitario.multiply_quantity(self.cantidad)
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// The in-progress sale.
///
/// ## Invariants
/// - Items are unique by `producto_id` (re-adding merges quantity)
/// - Quantities are > 0 (updating to 0 removes the line)
/// - `total() > INVOICE_THRESHOLD` implies `kind == Factura`
/// - Immediately after any kind change the customer fields are empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    kind: DocumentKind,

    pub customer: Customer,

    items: Vec<DraftItem>,

    pub metodo_pago: PaymentMethod,

    pub observaciones: String,
}

impl SaleDraft {
    /// Creates an empty draft (boleta, no items, no customer).
    pub fn new() -> Self {
        SaleDraft::default()
    }

    /// The current document kind.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// The current line items.
    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    /// Running total across all lines.
    pub fn total(&self) -> Money {
        self.items.iter().map(DraftItem::line_total).sum()
    }

    /// True when the total mandates a factura.
    pub fn requires_factura(&self) -> bool {
        self.total() > INVOICE_THRESHOLD
    }

    /// True when the boleta option must be shown disabled.
    ///
    /// Same condition as [`SaleDraft::requires_factura`], named for the
    /// selection control it drives.
    pub fn receipt_locked(&self) -> bool {
        self.requires_factura()
    }

    /// Adds a product to the sale or merges into an existing line.
    ///
    /// The unit price is snapshotted from the product. Requires the
    /// product to have enough stock for the combined quantity.
    pub fn add_item(&mut self, product: &Product, cantidad: i64) -> CoreResult<()> {
        validation::validate_quantity(cantidad)?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.producto_id == product.id)
        {
            let new_qty = item.cantidad + cantidad;
            if !product.can_sell(new_qty) {
                return Err(CoreError::InsufficientStock {
                    name: product.name.clone(),
                    available: product.stock,
                    requested: new_qty,
                });
            }
            item.cantidad = new_qty;
        } else {
            if !product.can_sell(cantidad) {
                return Err(CoreError::InsufficientStock {
                    name: product.name.clone(),
                    available: product.stock,
                    requested: cantidad,
                });
            }
            self.items.push(DraftItem {
                producto_id: product.id.clone(),
                name: product.name.clone(),
                precio_unitario: product.price,
                cantidad,
            });
        }

        self.enforce_threshold();
        Ok(())
    }

    /// Sets the quantity of an existing line; 0 removes the line.
    pub fn update_quantity(&mut self, producto_id: &str, cantidad: i64) -> CoreResult<()> {
        if cantidad <= 0 {
            return self.remove_item(producto_id);
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.producto_id == producto_id)
            .ok_or_else(|| CoreError::ProductNotInSale(producto_id.to_string()))?;
        item.cantidad = cantidad;

        self.enforce_threshold();
        Ok(())
    }

    /// Removes a line by product id.
    ///
    /// Lowering the total below the threshold unlocks the boleta option
    /// but does NOT switch back automatically; the user re-selects.
    pub fn remove_item(&mut self, producto_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.producto_id != producto_id);

        if self.items.len() == initial_len {
            return Err(CoreError::ProductNotInSale(producto_id.to_string()));
        }
        Ok(())
    }

    /// User-initiated document kind selection.
    ///
    /// Selecting boleta while the total is over the threshold is
    /// rejected; the caller should have disabled the option via
    /// [`SaleDraft::receipt_locked`]. Any accepted change clears the
    /// customer fields.
    pub fn set_document_kind(&mut self, kind: DocumentKind) -> CoreResult<()> {
        if kind == DocumentKind::Boleta && self.requires_factura() {
            return Err(CoreError::ReceiptNotAllowed {
                total: self.total(),
            });
        }
        if kind != self.kind {
            self.kind = kind;
            self.customer = Customer::default();
        }
        Ok(())
    }

    /// Forces the factura kind when the total crosses the threshold.
    ///
    /// Runs after every item mutation. The switch clears the customer
    /// fields exactly like a user-initiated change.
    fn enforce_threshold(&mut self) {
        if self.requires_factura() && self.kind == DocumentKind::Boleta {
            self.kind = DocumentKind::Factura;
            self.customer = Customer::default();
        }
    }

    /// Validates the draft for submission.
    ///
    /// ## Policy per kind
    /// - Boleta: documento (DNI) required; no name requirement
    /// - Factura: documento (RUC) AND nombre/razón social required
    /// - Email, if non-empty, must match the address pattern in both
    /// - Phone is always optional
    pub fn validate(&self) -> CoreResult<()> {
        if self.items.is_empty() {
            return Err(CoreError::EmptySale);
        }

        if self.customer.documento.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "clienteDocumento".to_string(),
            }
            .into());
        }

        match self.kind {
            DocumentKind::Boleta => {
                validation::validate_dni(self.customer.documento.trim())?;
            }
            DocumentKind::Factura => {
                validation::validate_ruc(self.customer.documento.trim())?;
                if self.customer.nombre.trim().is_empty() {
                    return Err(ValidationError::Required {
                        field: "clienteNombre".to_string(),
                    }
                    .into());
                }
            }
        }

        validation::validate_email(&self.customer.email)?;
        Ok(())
    }

    /// Builds the submission payload.
    ///
    /// For a boleta the nombre is auto-filled from the documento (the
    /// DNI doubles as the customer's name on the receipt). Validates
    /// first; an invalid draft never produces a payload.
    pub fn payload(&self) -> CoreResult<SaleCreate> {
        self.validate()?;

        let cliente_nombre = match self.kind {
            DocumentKind::Boleta => self.customer.documento.trim().to_string(),
            DocumentKind::Factura => self.customer.nombre.trim().to_string(),
        };

        Ok(SaleCreate {
            cliente_nombre,
            cliente_documento: self.customer.documento.trim().to_string(),
            cliente_email: self.customer.email.trim().to_string(),
            cliente_telefono: self.customer.telefono.trim().to_string(),
            items: self
                .items
                .iter()
                .map(|i| SaleItem {
                    producto_id: i.producto_id.clone(),
                    cantidad: i.cantidad,
                    precio_unitario: i.precio_unitario,
                })
                .collect(),
            metodo_pago: self.metodo_pago,
            observaciones: self.observaciones.clone(),
        })
    }
}

/// Redundant render-side check of the total invariant.
///
/// A payload's wire total must equal the sum of its line totals; the
/// caller uses this before showing a confirmation figure.
pub fn payload_total(payload: &SaleCreate) -> Money {
    compute_total(&payload.items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Producto {}", id),
            description: String::new(),
            stock,
            price: Money::from_cents(price_cents),
            company_id: "c1".to_string(),
            min_stock_alert: 5,
            created_at: "2024-01-15T10:30:00".to_string(),
            updated_at: "2024-01-15T10:30:00".to_string(),
        }
    }

    #[test]
    fn test_add_item_merges_quantity() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 999, 50);

        draft.add_item(&product, 2).unwrap();
        draft.add_item(&product, 3).unwrap();

        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.items()[0].cantidad, 5);
        assert_eq!(draft.total().cents(), 4995);
    }

    #[test]
    fn test_add_item_checks_stock() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 999, 3);

        draft.add_item(&product, 2).unwrap();
        let err = draft.add_item(&product, 2).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { requested: 4, .. }));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 999, 50);

        draft.add_item(&product, 2).unwrap();
        draft.update_quantity("p1", 0).unwrap();
        assert!(draft.items().is_empty());

        assert!(matches!(
            draft.update_quantity("p1", 1),
            Err(CoreError::ProductNotInSale(_))
        ));
    }

    #[test]
    fn test_threshold_forces_factura_and_clears_customer() {
        let mut draft = SaleDraft::new();
        draft.customer.documento = "12345678".to_string();
        assert_eq!(draft.kind(), DocumentKind::Boleta);

        // S/ 350 × 2 = S/ 700: exactly at the threshold, boleta survives
        let product = test_product("p1", 35_000, 100);
        draft.add_item(&product, 2).unwrap();
        assert_eq!(draft.kind(), DocumentKind::Boleta);
        assert!(!draft.receipt_locked());
        assert_eq!(draft.customer.documento, "12345678");

        // One more unit crosses it: forced switch, fields cleared
        draft.add_item(&product, 1).unwrap();
        assert_eq!(draft.kind(), DocumentKind::Factura);
        assert!(draft.receipt_locked());
        assert!(draft.customer.is_empty());
    }

    #[test]
    fn test_boleta_rejected_while_locked() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 80_000, 10);
        draft.add_item(&product, 1).unwrap();

        assert!(draft.receipt_locked());
        let err = draft.set_document_kind(DocumentKind::Boleta).unwrap_err();
        assert!(matches!(err, CoreError::ReceiptNotAllowed { .. }));
        assert_eq!(draft.kind(), DocumentKind::Factura);
    }

    #[test]
    fn test_dropping_below_threshold_unlocks_but_does_not_switch() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 80_000, 10);
        draft.add_item(&product, 1).unwrap();
        assert_eq!(draft.kind(), DocumentKind::Factura);

        draft.remove_item("p1").unwrap();
        assert!(!draft.receipt_locked());
        // Still factura until the user re-selects
        assert_eq!(draft.kind(), DocumentKind::Factura);

        draft.set_document_kind(DocumentKind::Boleta).unwrap();
        assert_eq!(draft.kind(), DocumentKind::Boleta);
    }

    #[test]
    fn test_user_switch_clears_customer() {
        let mut draft = SaleDraft::new();
        draft.customer.documento = "12345678".to_string();
        draft.customer.email = "cliente@x.pe".to_string();

        draft.set_document_kind(DocumentKind::Factura).unwrap();
        assert!(draft.customer.is_empty());

        // Re-selecting the current kind is a no-op, nothing cleared
        draft.customer.documento = "20123456789".to_string();
        draft.set_document_kind(DocumentKind::Factura).unwrap();
        assert_eq!(draft.customer.documento, "20123456789");
    }

    #[test]
    fn test_validate_boleta() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 1000, 10);
        draft.add_item(&product, 1).unwrap();

        // documento required
        assert!(matches!(
            draft.validate(),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        draft.customer.documento = "12345678".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_factura_requires_name() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 1000, 10);
        draft.add_item(&product, 1).unwrap();
        draft.set_document_kind(DocumentKind::Factura).unwrap();
        draft.customer.documento = "20123456789".to_string();

        assert!(draft.validate().is_err());

        draft.customer.nombre = "Bodega Sol S.A.C.".to_string();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 1000, 10);
        draft.add_item(&product, 1).unwrap();
        draft.customer.documento = "12345678".to_string();
        draft.customer.email = "no-es-correo".to_string();

        assert!(draft.validate().is_err());

        draft.customer.email = String::new();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_sale() {
        let draft = SaleDraft::new();
        assert!(matches!(draft.validate(), Err(CoreError::EmptySale)));
    }

    #[test]
    fn test_boleta_payload_autofills_name_from_dni() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 1000, 10);
        draft.add_item(&product, 2).unwrap();
        draft.customer.documento = "12345678".to_string();

        let payload = draft.payload().unwrap();
        assert_eq!(payload.cliente_nombre, "12345678");
        assert_eq!(payload.cliente_documento, "12345678");
        assert_eq!(payload_total(&payload).cents(), 2000);
    }

    #[test]
    fn test_factura_payload_keeps_name() {
        let mut draft = SaleDraft::new();
        let product = test_product("p1", 80_000, 10);
        draft.add_item(&product, 1).unwrap();
        draft.customer.documento = "20123456789".to_string();
        draft.customer.nombre = "Bodega Sol S.A.C.".to_string();

        let payload = draft.payload().unwrap();
        assert_eq!(payload.cliente_nombre, "Bodega Sol S.A.C.");
        assert_eq!(payload.cliente_documento, "20123456789");
    }
}
