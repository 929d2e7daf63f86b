//! API routes for klinik-server

pub mod auth;
pub mod health;
pub mod laporan;
pub mod layanan;
pub mod pengguna;
pub mod transaksi;

use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::auth::policy::{require_bendahara, require_kasir};
use crate::auth::staff_auth::staff_auth_middleware;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Listings open to any authenticated staff member
    let staff = Router::new()
        .route("/api/layanan", get(layanan::list_layanan))
        .route("/api/transaksi", get(transaksi::list_transaksi));

    // Front-desk catalog / ledger / account management (kasir)
    let kasir = Router::new()
        .route("/api/layanan", post(layanan::create_layanan))
        .route(
            "/api/layanan/{id}",
            get(layanan::get_layanan)
                .put(layanan::update_layanan)
                .delete(layanan::delete_layanan),
        )
        .route("/api/search-layanan", get(layanan::search_layanan))
        .route("/api/transaksi", post(transaksi::create_transaksi))
        .route("/api/transaksi/{id}", delete(transaksi::delete_transaksi))
        .route(
            "/api/pengguna",
            get(pengguna::list_pengguna).post(pengguna::create_pengguna),
        )
        .route(
            "/api/pengguna/{id}",
            get(pengguna::get_pengguna)
                .put(pengguna::update_pengguna)
                .delete(pengguna::delete_pengguna),
        )
        .layer(middleware::from_fn(require_kasir));

    // Revenue reports (bendahara)
    let bendahara = Router::new()
        .route("/api/laporan/harian", get(laporan::harian))
        .route("/api/laporan/mingguan", get(laporan::mingguan))
        .route("/api/laporan/bulanan", get(laporan::bulanan))
        .layer(middleware::from_fn(require_bendahara));

    let protected = staff.merge(kasir).merge(bendahara).layer(
        middleware::from_fn_with_state(state.clone(), staff_auth_middleware),
    );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
