//! Laporan (revenue report) database operations

use chrono::NaiveDate;
use shared::models::LayananStat;
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct StatRow {
    id_layanan: i64,
    nama_layanan: String,
    jumlah_transaksi: i64,
    harga: i64,
    total: i64,
}

/// Per-layanan line counts over `[start, end]` by calendar date, against the
/// full catalog. Services with no lines in range come back with zero counts,
/// so an empty range still yields the complete catalog listing.
///
/// `harga` is the service's current price and `total` re-prices the counted
/// lines at it.
pub async fn layanan_stats(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<LayananStat>, sqlx::Error> {
    let rows: Vec<StatRow> = sqlx::query_as(
        r#"
        SELECT l.id_layanan, l.nama_layanan,
               COUNT(t.id_transaksi) AS jumlah_transaksi,
               l.total_harga AS harga,
               COUNT(t.id_transaksi) * l.total_harga AS total
        FROM layanan l
        LEFT JOIN transaksi_detail td ON td.id_layanan = l.id_layanan
        LEFT JOIN transaksi t ON t.id_transaksi = td.id_transaksi
            AND t.created_at::date BETWEEN $1 AND $2
        GROUP BY l.id_layanan, l.nama_layanan, l.total_harga
        ORDER BY l.id_layanan
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| LayananStat {
            id_layanan: r.id_layanan,
            nama_layanan: r.nama_layanan,
            jumlah_transaksi: r.jumlah_transaksi,
            harga: r.harga,
            total: r.total,
        })
        .collect())
}

/// Number of distinct transactions in range (not line count)
pub async fn transaksi_count(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM transaksi WHERE created_at::date BETWEEN $1 AND $2")
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
}
