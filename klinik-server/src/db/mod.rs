//! Database operations (raw sqlx over PostgreSQL)
//!
//! Row structs live here; the shared models are the JSON surface. Multi-row
//! mutations run inside `pool.begin()` / `tx.commit()` and roll back on drop.

pub mod laporan;
pub mod layanan;
pub mod pengguna;
pub mod transaksi;
