//! Transaksi (transaction ledger) database operations

use chrono::{DateTime, Utc};
use shared::models::{Transaksi, TransaksiDetail};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct TransaksiLineRow {
    id_transaksi: i64,
    id_admin: i64,
    nama_pasien: String,
    total_harga: i64,
    total_bayar: i64,
    created_at: DateTime<Utc>,
    // Left-joined line columns; NULL for a transaction with no lines
    id_transaksi_detail: Option<i64>,
    id_layanan: Option<i64>,
    nama_layanan: Option<String>,
    harga: Option<i64>,
}

/// All transactions newest-first, each with its lines resolved against the
/// current catalog in a single joined query (no per-row re-fetching).
pub async fn list(pool: &PgPool) -> Result<Vec<Transaksi>, sqlx::Error> {
    let rows: Vec<TransaksiLineRow> = sqlx::query_as(
        r#"
        SELECT t.id_transaksi, t.id_admin, t.nama_pasien, t.total_harga,
               t.total_bayar, t.created_at,
               td.id_transaksi_detail, td.id_layanan,
               l.nama_layanan, l.total_harga AS harga
        FROM transaksi t
        LEFT JOIN transaksi_detail td ON td.id_transaksi = t.id_transaksi
        LEFT JOIN layanan l ON l.id_layanan = td.id_layanan
        ORDER BY t.id_transaksi DESC, td.id_transaksi_detail ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut transactions: Vec<Transaksi> = Vec::new();
    for row in rows {
        let is_new = transactions
            .last()
            .is_none_or(|t| t.id_transaksi != row.id_transaksi);
        if is_new {
            transactions.push(Transaksi {
                id_transaksi: row.id_transaksi,
                id_admin: row.id_admin,
                nama_pasien: row.nama_pasien,
                total_harga: row.total_harga,
                total_bayar: row.total_bayar,
                created_at: row.created_at,
                details: Vec::new(),
            });
        }
        if let (Some(id_detail), Some(id_layanan)) = (row.id_transaksi_detail, row.id_layanan) {
            if let Some(current) = transactions.last_mut() {
                current.details.push(TransaksiDetail {
                    id_transaksi_detail: id_detail,
                    id_layanan,
                    nama_layanan: row.nama_layanan,
                    harga: row.harga,
                });
            }
        }
    }
    Ok(transactions)
}

/// Insert the transaction row plus one line per submitted service id
/// (duplicates and submission order preserved) in one unit of work.
pub async fn create(
    pool: &PgPool,
    id_admin: i64,
    nama_pasien: &str,
    layanan_ids: &[i64],
    total_harga: i64,
    total_bayar: i64,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (id_transaksi,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO transaksi (id_admin, nama_pasien, total_harga, total_bayar)
        VALUES ($1, $2, $3, $4)
        RETURNING id_transaksi
        "#,
    )
    .bind(id_admin)
    .bind(nama_pasien)
    .bind(total_harga)
    .bind(total_bayar)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO transaksi_detail (id_transaksi, id_layanan)
        SELECT $1, x.id_layanan
        FROM UNNEST($2::bigint[]) WITH ORDINALITY AS x(id_layanan, ord)
        ORDER BY x.ord
        "#,
    )
    .bind(id_transaksi)
    .bind(layanan_ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id_transaksi)
}

/// Delete lines then parent in one unit of work; false when the row was absent
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM transaksi_detail WHERE id_transaksi = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM transaksi WHERE id_transaksi = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
