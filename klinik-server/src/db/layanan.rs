//! Layanan (service catalog) database operations

use shared::models::{Layanan, LayananSearchResult};
use sqlx::PgPool;

/// Validated catalog fields ready for storage
#[derive(Debug, Clone)]
pub struct NewLayanan {
    pub nama_layanan: String,
    pub trf_kunjungan: i64,
    pub layanan_dokter: i64,
    pub layanan_tindakan: i64,
}

impl NewLayanan {
    /// Catalog price: sum of the three fee components
    pub fn total_harga(&self) -> i64 {
        self.trf_kunjungan + self.layanan_dokter + self.layanan_tindakan
    }
}

#[derive(sqlx::FromRow)]
struct LayananRow {
    id_layanan: i64,
    nama_layanan: String,
    trf_kunjungan: i64,
    layanan_dokter: i64,
    layanan_tindakan: i64,
    total_harga: i64,
}

impl From<LayananRow> for Layanan {
    fn from(row: LayananRow) -> Self {
        Layanan {
            id_layanan: row.id_layanan,
            nama_layanan: row.nama_layanan,
            trf_kunjungan: row.trf_kunjungan,
            layanan_dokter: row.layanan_dokter,
            layanan_tindakan: row.layanan_tindakan,
            total_harga: row.total_harga,
        }
    }
}

const LAYANAN_COLUMNS: &str = "id_layanan, nama_layanan, trf_kunjungan, layanan_dokter, layanan_tindakan, total_harga";

pub async fn list(pool: &PgPool) -> Result<Vec<Layanan>, sqlx::Error> {
    let rows: Vec<LayananRow> = sqlx::query_as(&format!(
        "SELECT {LAYANAN_COLUMNS} FROM layanan ORDER BY id_layanan"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Layanan>, sqlx::Error> {
    let row: Option<LayananRow> = sqlx::query_as(&format!(
        "SELECT {LAYANAN_COLUMNS} FROM layanan WHERE id_layanan = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

pub async fn create(pool: &PgPool, data: &NewLayanan) -> Result<Layanan, sqlx::Error> {
    let row: LayananRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO layanan (nama_layanan, trf_kunjungan, layanan_dokter, layanan_tindakan, total_harga)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {LAYANAN_COLUMNS}
        "#
    ))
    .bind(&data.nama_layanan)
    .bind(data.trf_kunjungan)
    .bind(data.layanan_dokter)
    .bind(data.layanan_tindakan)
    .bind(data.total_harga())
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &NewLayanan,
) -> Result<Option<Layanan>, sqlx::Error> {
    let row: Option<LayananRow> = sqlx::query_as(&format!(
        r#"
        UPDATE layanan
        SET nama_layanan = $2, trf_kunjungan = $3, layanan_dokter = $4,
            layanan_tindakan = $5, total_harga = $6, updated_at = now()
        WHERE id_layanan = $1
        RETURNING {LAYANAN_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&data.nama_layanan)
    .bind(data.trf_kunjungan)
    .bind(data.layanan_dokter)
    .bind(data.layanan_tindakan)
    .bind(data.total_harga())
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

/// Number of transaction lines referencing this service
pub async fn reference_count(pool: &PgPool, id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM transaksi_detail WHERE id_layanan = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Returns false when the row did not exist
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM layanan WHERE id_layanan = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Make LIKE metacharacters in a user-supplied term match literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Name substring (case-insensitive) or id digit-substring search
pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<LayananSearchResult>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(term));
    let rows: Vec<(i64, String, i64)> = sqlx::query_as(
        r#"
        SELECT id_layanan, nama_layanan, total_harga
        FROM layanan
        WHERE nama_layanan ILIKE $1 OR id_layanan::text LIKE $1
        ORDER BY id_layanan
        "#,
    )
    .bind(&pattern)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(id_layanan, nama_layanan, total_harga)| LayananSearchResult {
            id_layanan,
            nama_layanan,
            total_harga,
        })
        .collect())
}

/// Current catalog prices for a set of services, keyed by id
pub async fn prices_for(pool: &PgPool, ids: &[i64]) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    sqlx::query_as("SELECT id_layanan, total_harga FROM layanan WHERE id_layanan = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Race-safe guard: the pre-delete reference check can lose to a concurrent
/// line insert, in which case the foreign key reports the conflict.
pub fn is_reference_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.constraint() == Some("transaksi_detail_id_layanan_fkey")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(pool: &PgPool, nama: &str, harga: i64) -> i64 {
        create(
            pool,
            &NewLayanan {
                nama_layanan: nama.to_string(),
                trf_kunjungan: harga,
                layanan_dokter: 0,
                layanan_tindakan: 0,
            },
        )
        .await
        .unwrap()
        .id_layanan
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like(r"c\d"), r"c\\d");
        assert_eq!(escape_like("umum"), "umum");
    }

    #[sqlx::test]
    async fn search_treats_wildcards_literally(pool: PgPool) {
        seed(&pool, "Paket 100% Sehat", 120000).await;
        seed(&pool, "Poli Umum", 50000).await;

        let hits = search(&pool, "100%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].nama_layanan, "Paket 100% Sehat");

        // A bare underscore used to match any single character
        assert!(search(&pool, "_").await.unwrap().is_empty());

        // Name matching stays case-insensitive
        let umum = search(&pool, "umum").await.unwrap();
        assert_eq!(umum.len(), 1);
        assert_eq!(umum[0].nama_layanan, "Poli Umum");
    }

    #[sqlx::test]
    async fn delete_referenced_layanan_reports_violation(pool: PgPool) {
        let id = seed(&pool, "Poli Umum", 50000).await;
        crate::db::transaksi::create(&pool, 1, "Budi", &[id], 50000, 50000)
            .await
            .unwrap();

        let err = delete(&pool, id).await.unwrap_err();
        assert!(is_reference_violation(&err));

        // Row and its referencing line are still there
        assert!(get(&pool, id).await.unwrap().is_some());
        assert_eq!(reference_count(&pool, id).await.unwrap(), 1);
    }
}
