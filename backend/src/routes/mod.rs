//! API route definitions
//!
//! Public routes cover health, OTP auth and read-only catalog browsing.
//! Everything retailer- or admin-facing sits behind the JWT middleware;
//! admin handlers additionally require the admin claim via the AdminUser
//! extractor.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::middleware::auth_middleware;
use crate::AppState;

/// Build the /api/v1 router
pub fn api_routes(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/auth/send-otp", post(handlers::auth::send_otp))
        .route("/auth/verify-otp", post(handlers::auth::verify_otp))
        .route("/zones", get(handlers::zone::list_zones))
        .route("/suppliers", get(handlers::supplier::list_suppliers))
        .route("/suppliers/:id", get(handlers::supplier::get_supplier))
        .route("/products", get(handlers::product::list_products))
        .route("/products/categories", get(handlers::product::list_categories))
        .route("/products/brands", get(handlers::product::list_brands))
        .route("/products/:id", get(handlers::product::get_product));

    let retailer = Router::new()
        .route("/retailers/register", post(handlers::retailer::register))
        .route(
            "/retailers/me",
            get(handlers::retailer::get_profile).put(handlers::retailer::update_profile),
        )
        .route("/zones/my", get(handlers::zone::my_zones))
        .route("/offers", get(handlers::offer::list_offers))
        .route("/offers/:id", get(handlers::offer::get_offer))
        .route(
            "/orders",
            post(handlers::order::place_order).get(handlers::order::my_orders),
        )
        .route("/orders/:id", get(handlers::order::get_order))
        .route(
            "/payments",
            post(handlers::payment::create_payment).get(handlers::payment::my_payments),
        )
        .route("/payments/:id/dispute", post(handlers::payment::dispute_payment));

    let admin = Router::new()
        .route("/admin/retailers", get(handlers::admin::list_retailers))
        .route("/admin/zones", post(handlers::admin::create_zone))
        .route("/admin/suppliers", post(handlers::admin::create_supplier))
        .route("/admin/products", post(handlers::admin::create_product))
        .route(
            "/admin/products/:id",
            put(handlers::admin::update_product).delete(handlers::admin::delete_product),
        )
        .route(
            "/admin/offers",
            post(handlers::admin::create_offer).get(handlers::admin::list_offers),
        )
        .route("/admin/offers/:id", put(handlers::admin::update_offer))
        .route("/admin/offers/:id/advance", post(handlers::admin::advance_offer))
        .route("/admin/offers/:id/orders", get(handlers::admin::list_offer_orders))
        .route(
            "/admin/offers/:id/orders/export",
            get(handlers::admin::export_offer_orders),
        )
        .route("/admin/orders/:id/advance", post(handlers::admin::advance_order))
        .route("/admin/payments", get(handlers::admin::list_payments))
        .route(
            "/admin/payments/:id/release",
            post(handlers::admin::release_payment),
        )
        .route(
            "/admin/payments/:id/refund",
            post(handlers::admin::refund_payment),
        )
        .route("/admin/seed", post(handlers::admin::seed));

    let protected = retailer
        .merge(admin)
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
}
