//! Data models
//!
//! Shared between klinik-server and frontend (via API).
//! Database row mapping lives in the server's db layer; these types are the
//! JSON surface. All IDs are `i64` (Postgres BIGSERIAL).

pub mod laporan;
pub mod layanan;
pub mod transaksi;
pub mod user;

// Re-exports
pub use laporan::*;
pub use layanan::*;
pub use transaksi::*;
pub use user::*;
