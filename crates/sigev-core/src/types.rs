//! # Domain Types
//!
//! Core domain types used throughout SIGEV-PYME.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Company      │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  role (0/1/..)  │   │  ruc (11 dig.)  │   │  stock          │       │
//! │  │  estado         │   │  gerenteId      │   │  price (Money)  │       │
//! │  │  companyId?     │   │  numeroEmpleados│   │  minStockAlert  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    SaleItem     │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  fecha          │   │  productoId     │   │  Efectivo       │       │
//! │  │  total (Money)  │   │  cantidad       │   │  Tarjeta        │       │
//! │  │  clienteNombre  │   │  precioUnitario │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Fidelity
//! Field names serialize exactly as the remote API expects them
//! (camelCase, Spanish business vocabulary: `clienteNombre`, `metodoPago`,
//! `numeroEmpleados`). Timestamps stay `String` on the wire because the
//! server is not consistent about formats; [`crate::reports`] parses them
//! leniently where calendar math is needed.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// User Role
// =============================================================================

/// The numeric role codes the API assigns to users.
///
/// ## Why Numeric Codes?
/// The server stores roles as integers; `User::role` keeps the raw code
/// for wire fidelity and this enum gives it a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Company manager (code 0) - may register and own a company.
    Manager,
    /// Employee (code 1).
    Employee,
    /// Local administrator (code 99).
    LocalAdmin,
    /// Super administrator (code 100).
    SuperAdmin,
}

impl UserRole {
    /// Maps a wire code to a role. Unknown codes return `None`.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(UserRole::Manager),
            1 => Some(UserRole::Employee),
            99 => Some(UserRole::LocalAdmin),
            100 => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    /// The wire code for this role.
    pub const fn code(&self) -> i32 {
        match self {
            UserRole::Manager => 0,
            UserRole::Employee => 1,
            UserRole::LocalAdmin => 99,
            UserRole::SuperAdmin => 100,
        }
    }
}

/// Wire code for an active user (`estado` field).
pub const USER_STATUS_ACTIVE: i32 = 1;

// =============================================================================
// User
// =============================================================================

/// The authenticated user's profile, as returned by `/api/Auth/user/me`.
///
/// Owned by the current-user cache: replaced wholesale on refresh,
/// set to absent on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Display name.
    pub user_name: String,

    pub email: String,

    pub telefono: Option<String>,

    pub direccion: Option<String>,

    /// Numeric role code (0=manager, 1=employee, 99=local-admin,
    /// 100=super-admin). See [`UserRole`].
    pub role: i32,

    /// Numeric status (1=active, anything else inactive).
    pub estado: i32,

    /// Registration timestamp (wire string, format not guaranteed).
    pub fecha_registro: String,

    /// Linked company, if any. The relation is maintained by the remote
    /// API; the client only reads/writes the foreign key.
    pub company_id: Option<String>,

    pub company_nombre: Option<String>,
}

impl User {
    /// Returns the named role, if the code is known.
    #[inline]
    pub fn user_role(&self) -> Option<UserRole> {
        UserRole::from_code(self.role)
    }

    /// Checks whether the account is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.estado == USER_STATUS_ACTIVE
    }

    /// Checks whether the user is a company manager.
    #[inline]
    pub fn is_manager(&self) -> bool {
        self.role == UserRole::Manager.code()
    }

    /// A manager without a linked company may register one.
    pub fn can_create_company(&self) -> bool {
        self.is_manager() && self.company_id.is_none()
    }
}

// =============================================================================
// Company
// =============================================================================

/// A registered company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,

    pub nombre: String,

    /// Contact email.
    pub correo: String,

    pub telefono: String,

    pub direccion: String,

    pub pais: String,

    pub numero_empleados: i64,

    /// Tax identifier (RUC, 11 digits).
    pub ruc: String,

    /// Owning manager's user id.
    pub gerente_id: String,

    pub created_at: String,

    pub updated_at: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the company inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    pub name: String,

    pub description: String,

    /// Current stock quantity (non-negative).
    pub stock: i64,

    /// Unit price (wire: decimal soles; must be > 0).
    #[serde(with = "crate::money::as_soles")]
    pub price: Money,

    /// Owning company.
    pub company_id: String,

    /// Stock level at or below which the product is flagged Low.
    pub min_stock_alert: i64,

    pub created_at: String,

    pub updated_at: String,
}

impl Product {
    /// Whether the requested quantity can currently be sold.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash payment.
    Efectivo,
    /// Card payment.
    Tarjeta,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Efectivo
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses the snapshot pattern: the unit price is captured at sale time and
/// is never re-derived from the current product price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub producto_id: String,

    /// Quantity sold (positive).
    pub cantidad: i64,

    /// Unit price at time of sale (frozen).
    #[serde(with = "crate::money::as_soles")]
    pub precio_unitario: Money,
}

impl SaleItem {
    /// Line total = cantidad × precioUnitario.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.precio_unitario.multiply_quantity(self.cantidad)
    }
}

/// Computes a sale total from its line items.
///
/// Invariant: a sale's total must equal this sum. The client computes it
/// before submission and recomputes it on render rather than trusting a
/// stored figure.
pub fn compute_total(items: &[SaleItem]) -> Money {
    items.iter().map(SaleItem::line_total).sum()
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale, as returned by `/api/Sale/mine`.
///
/// Several fields are optional because the list endpoint returns a
/// trimmed projection while `/api/Sale/{id}` returns the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,

    /// Sale timestamp (wire string; may be absent or unparseable on
    /// historical records - see [`crate::reports`]).
    pub fecha: String,

    pub cliente_nombre: String,

    #[serde(with = "crate::money::as_soles")]
    pub total: Money,

    pub metodo_pago: PaymentMethod,

    pub estado_pago: String,

    pub company_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_documento: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_telefono: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SaleItem>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Sale {
    /// The timestamp used for calendar bucketing: `fecha`, falling back
    /// to `createdAt` when `fecha` is empty.
    pub fn effective_timestamp(&self) -> &str {
        if !self.fecha.is_empty() {
            &self.fecha
        } else {
            self.created_at.as_deref().unwrap_or("")
        }
    }
}

// =============================================================================
// Creation Payloads
// =============================================================================

/// Body for `POST /api/Sale` (built by [`crate::draft::SaleDraft::payload`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleCreate {
    pub cliente_nombre: String,

    pub cliente_documento: String,

    pub cliente_email: String,

    pub cliente_telefono: String,

    pub items: Vec<SaleItem>,

    pub metodo_pago: PaymentMethod,

    pub observaciones: String,
}

impl SaleCreate {
    /// Wire total, recomputed from the line items.
    pub fn total(&self) -> Money {
        compute_total(&self.items)
    }
}

/// Body for `POST /api/Product` and `PUT /api/Product/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,

    pub description: String,

    pub stock: i64,

    #[serde(with = "crate::money::as_soles")]
    pub price: Money,

    pub min_stock_alert: i64,
}

/// Body for `POST /api/Company`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCreate {
    pub nombre: String,

    pub correo: String,

    pub telefono: String,

    pub direccion: String,

    pub pais: String,

    pub numero_empleados: i64,

    pub ruc: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        assert_eq!(UserRole::from_code(0), Some(UserRole::Manager));
        assert_eq!(UserRole::from_code(1), Some(UserRole::Employee));
        assert_eq!(UserRole::from_code(99), Some(UserRole::LocalAdmin));
        assert_eq!(UserRole::from_code(100), Some(UserRole::SuperAdmin));
        assert_eq!(UserRole::from_code(7), None);
        assert_eq!(UserRole::Manager.code(), 0);
    }

    #[test]
    fn test_can_create_company() {
        let mut user = User {
            id: "u1".into(),
            user_name: "maria".into(),
            email: "maria@example.com".into(),
            telefono: None,
            direccion: None,
            role: 0,
            estado: 1,
            fecha_registro: "2024-01-15T10:30:00".into(),
            company_id: None,
            company_nombre: None,
        };
        assert!(user.can_create_company());

        user.company_id = Some("c1".into());
        assert!(!user.can_create_company());

        user.company_id = None;
        user.role = 1;
        assert!(!user.can_create_company());
    }

    #[test]
    fn test_sale_item_line_total() {
        let item = SaleItem {
            producto_id: "p1".into(),
            cantidad: 3,
            precio_unitario: Money::from_cents(1050),
        };
        assert_eq!(item.line_total().cents(), 3150);
    }

    #[test]
    fn test_compute_total() {
        // 2 × S/ 10.00 + 1 × S/ 5.00 = S/ 25.00
        let items = vec![
            SaleItem {
                producto_id: "p1".into(),
                cantidad: 2,
                precio_unitario: Money::from_soles(10, 0),
            },
            SaleItem {
                producto_id: "p2".into(),
                cantidad: 1,
                precio_unitario: Money::from_soles(5, 0),
            },
        ];
        assert_eq!(compute_total(&items), Money::from_soles(25, 0));
    }

    #[test]
    fn test_user_wire_format() {
        let json = r#"{
            "id": "u1",
            "userName": "maria",
            "email": "maria@example.com",
            "telefono": null,
            "direccion": null,
            "role": 0,
            "estado": 1,
            "fechaRegistro": "2024-01-15T10:30:00",
            "companyId": null,
            "companyNombre": null
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_name, "maria");
        assert!(user.is_active());
        assert!(user.is_manager());
    }

    #[test]
    fn test_product_wire_format() {
        let json = r#"{
            "id": "p1",
            "name": "Azúcar 1kg",
            "description": "Bolsa de azúcar rubia",
            "stock": 10,
            "price": 5.0,
            "companyId": "c1",
            "minStockAlert": 3,
            "createdAt": "2024-01-15T10:30:00",
            "updatedAt": "2024-01-15T10:30:00"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Money::from_soles(5, 0));
        assert!(product.can_sell(10));
        assert!(!product.can_sell(11));
        assert!(!product.can_sell(0));
    }

    #[test]
    fn test_sale_effective_timestamp_falls_back() {
        let sale = Sale {
            id: "s1".into(),
            fecha: String::new(),
            cliente_nombre: "12345678".into(),
            total: Money::from_soles(20, 0),
            metodo_pago: PaymentMethod::Efectivo,
            estado_pago: "pagado".into(),
            company_id: None,
            cliente_documento: None,
            cliente_email: None,
            cliente_telefono: None,
            items: None,
            observaciones: None,
            created_at: Some("2024-03-01T12:00:00".into()),
            updated_at: None,
        };
        assert_eq!(sale.effective_timestamp(), "2024-03-01T12:00:00");
    }

    #[test]
    fn test_payment_method_wire() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Efectivo).unwrap(),
            r#""efectivo""#
        );
        let m: PaymentMethod = serde_json::from_str(r#""tarjeta""#).unwrap();
        assert_eq!(m, PaymentMethod::Tarjeta);
    }
}
