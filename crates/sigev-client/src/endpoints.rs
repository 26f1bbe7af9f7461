//! # API Endpoints
//!
//! Path builders for every remote endpoint, plus the auth/business
//! classification the 401 handler relies on.
//!
//! ## Endpoint Map
//! ```text
//! Auth      POST /api/Auth/user/login     login
//!           POST /api/Auth/user/register  register
//!           POST /api/Auth/user/logout    logout (best-effort)
//!           GET  /api/Auth/user/me        current user
//!           PUT  /api/Auth/user/update    update profile (full payload)
//! Company   GET  /api/Company             list companies
//!           POST /api/Company             register company
//!           GET/PUT/DELETE /api/Company/{id}
//! Product   GET  /api/Product             inventory (doubles as the
//!           POST /api/Product              inventory endpoint)
//!           GET/PUT/DELETE /api/Product/{id}
//! Sale      POST /api/Sale                create
//!           GET  /api/Sale/mine           my sales
//!           GET/PUT/DELETE /api/Sale/{id}
//! ```

// ===== Auth =====

pub const AUTH_LOGIN: &str = "/api/Auth/user/login";
pub const AUTH_REGISTER: &str = "/api/Auth/user/register";
pub const AUTH_LOGOUT: &str = "/api/Auth/user/logout";
pub const AUTH_ME: &str = "/api/Auth/user/me";
pub const AUTH_UPDATE: &str = "/api/Auth/user/update";

// ===== Company =====

pub const COMPANY: &str = "/api/Company";

/// Path for a single company. There is no "my company" endpoint; the
/// caller resolves one from the user's `companyId`.
pub fn company(id: &str) -> String {
    format!("{}/{}", COMPANY, id)
}

// ===== Product =====

pub const PRODUCT: &str = "/api/Product";

/// Path for a single product.
pub fn product(id: &str) -> String {
    format!("{}/{}", PRODUCT, id)
}

// ===== Sale =====

pub const SALE: &str = "/api/Sale";
pub const SALE_MINE: &str = "/api/Sale/mine";

/// Path for a single sale.
pub fn sale(id: &str) -> String {
    format!("{}/{}", SALE, id)
}

// ===== Classification =====

/// Whether a 401 on this path means "bad/stale auth attempt" rather
/// than "the session died".
///
/// Login, register and the current-user probe are the places a 401 is
/// part of the normal protocol; anywhere else it triggers the forced
/// logout.
pub fn is_auth_endpoint(path: &str) -> bool {
    path.contains("/login") || path.contains("/register") || path.contains("/me")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_paths_match_server() {
        assert_eq!(AUTH_LOGIN, "/api/Auth/user/login");
        assert_eq!(AUTH_REGISTER, "/api/Auth/user/register");
        assert_eq!(AUTH_LOGOUT, "/api/Auth/user/logout");
        assert_eq!(AUTH_ME, "/api/Auth/user/me");
        assert_eq!(AUTH_UPDATE, "/api/Auth/user/update");
    }

    #[test]
    fn test_resource_paths_match_server() {
        assert_eq!(COMPANY, "/api/Company");
        assert_eq!(company("c1"), "/api/Company/c1");
        assert_eq!(PRODUCT, "/api/Product");
        assert_eq!(product("p1"), "/api/Product/p1");
        assert_eq!(SALE, "/api/Sale");
        assert_eq!(SALE_MINE, "/api/Sale/mine");
        assert_eq!(sale("s-42"), "/api/Sale/s-42");
    }

    #[test]
    fn test_auth_classification() {
        assert!(is_auth_endpoint(AUTH_LOGIN));
        assert!(is_auth_endpoint(AUTH_REGISTER));
        assert!(is_auth_endpoint(AUTH_ME));

        assert!(!is_auth_endpoint(PRODUCT));
        assert!(!is_auth_endpoint(COMPANY));
        assert!(!is_auth_endpoint(SALE_MINE));
        assert!(!is_auth_endpoint(&sale("abc")));
        // The logout POST carries the token but a 401 there must not
        // recurse into another forced logout
        assert!(!is_auth_endpoint(AUTH_LOGOUT));
    }
}
