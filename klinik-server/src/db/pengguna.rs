//! Pengguna (staff account + admin profile) database operations

use shared::models::{Pengguna, Role};
use sqlx::PgPool;
use std::str::FromStr;

/// Validated account fields ready for storage
#[derive(Debug, Clone)]
pub struct NewPengguna {
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
    pub nama: String,
    pub jenis_kelamin: String,
    pub alamat: String,
    pub nomor_telpon: String,
}

/// Validated update; `password_hash` is `None` when the password is unchanged
#[derive(Debug, Clone)]
pub struct PenggunaChanges {
    pub email: String,
    pub password_hash: Option<String>,
    pub role: Role,
    pub nama: String,
    pub jenis_kelamin: String,
    pub alamat: String,
    pub nomor_telpon: String,
}

#[derive(sqlx::FromRow)]
struct PenggunaRow {
    id_user: i64,
    email: String,
    role: String,
    nama: String,
    jenis_kelamin: String,
    alamat: String,
    nomor_telpon: String,
    id_admin: Option<i64>,
}

impl PenggunaRow {
    fn into_model(self) -> Result<Pengguna, sqlx::Error> {
        let role = Role::from_str(&self.role).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(Pengguna {
            id_user: self.id_user,
            email: self.email,
            role,
            nama: self.nama,
            jenis_kelamin: self.jenis_kelamin,
            alamat: self.alamat,
            nomor_telpon: self.nomor_telpon,
            id_admin: self.id_admin,
        })
    }
}

// Joined view: profile fields default to empty strings and the display name
// falls back to the email when the admin row is missing.
const PENGGUNA_SELECT: &str = r#"
    SELECT u.id_user, u.email, u.role,
           COALESCE(a.nama, u.email) AS nama,
           COALESCE(a.jenis_kelamin::text, '') AS jenis_kelamin,
           COALESCE(a.alamat, '') AS alamat,
           COALESCE(a.nomor_telpon, '') AS nomor_telpon,
           a.id_admin
    FROM users u
    LEFT JOIN admin a ON a.id_user = u.id_user
"#;

pub async fn list(pool: &PgPool) -> Result<Vec<Pengguna>, sqlx::Error> {
    let rows: Vec<PenggunaRow> =
        sqlx::query_as(&format!("{PENGGUNA_SELECT} ORDER BY u.id_user"))
            .fetch_all(pool)
            .await?;
    rows.into_iter().map(PenggunaRow::into_model).collect()
}

pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Pengguna>, sqlx::Error> {
    let row: Option<PenggunaRow> =
        sqlx::query_as(&format!("{PENGGUNA_SELECT} WHERE u.id_user = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    row.map(PenggunaRow::into_model).transpose()
}

/// Email uniqueness check; `exclude` skips the account being edited
pub async fn email_taken(
    pool: &PgPool,
    email: &str,
    exclude: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE email = $1 AND ($2::bigint IS NULL OR id_user <> $2)",
    )
    .bind(email)
    .bind(exclude)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Credentials lookup for login: (id_user, password hash, role)
pub async fn find_credentials(
    pool: &PgPool,
    email: &str,
) -> Result<Option<(i64, String, String)>, sqlx::Error> {
    sqlx::query_as("SELECT id_user, password, role FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Insert account then profile in one unit of work; returns the new id_user
pub async fn create(pool: &PgPool, data: &NewPengguna) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (id_user,): (i64,) = sqlx::query_as(
        "INSERT INTO users (email, password, role) VALUES ($1, $2, $3) RETURNING id_user",
    )
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(data.role.as_str())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO admin (id_user, nama, jenis_kelamin, alamat, nomor_telpon)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id_user)
    .bind(&data.nama)
    .bind(&data.jenis_kelamin)
    .bind(&data.alamat)
    .bind(&data.nomor_telpon)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id_user)
}

/// Update account and upsert profile in one unit of work;
/// false when the account did not exist.
pub async fn update(
    pool: &PgPool,
    id: i64,
    changes: &PenggunaChanges,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = match &changes.password_hash {
        Some(hash) => {
            sqlx::query("UPDATE users SET email = $2, role = $3, password = $4 WHERE id_user = $1")
                .bind(id)
                .bind(&changes.email)
                .bind(changes.role.as_str())
                .bind(hash)
                .execute(&mut *tx)
                .await?
        }
        None => {
            sqlx::query("UPDATE users SET email = $2, role = $3 WHERE id_user = $1")
                .bind(id)
                .bind(&changes.email)
                .bind(changes.role.as_str())
                .execute(&mut *tx)
                .await?
        }
    };

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO admin (id_user, nama, jenis_kelamin, alamat, nomor_telpon)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id_user) DO UPDATE SET
            nama = EXCLUDED.nama, jenis_kelamin = EXCLUDED.jenis_kelamin,
            alamat = EXCLUDED.alamat, nomor_telpon = EXCLUDED.nomor_telpon
        "#,
    )
    .bind(id)
    .bind(&changes.nama)
    .bind(&changes.jenis_kelamin)
    .bind(&changes.alamat)
    .bind(&changes.nomor_telpon)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// Delete the account; the profile row goes via ON DELETE CASCADE
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id_user = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Race-safe guard: the pre-insert uniqueness check can lose to a concurrent
/// writer, in which case the unique index reports the conflict.
pub fn is_email_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.constraint() == Some("users_email_key")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn siti() -> NewPengguna {
        NewPengguna {
            email: "siti@klinik.id".to_string(),
            password_hash: "argon2-hash".to_string(),
            role: Role::Kasir,
            nama: "Siti Rahma".to_string(),
            jenis_kelamin: "P".to_string(),
            alamat: "Jl. Melati 12".to_string(),
            nomor_telpon: "081234567890".to_string(),
        }
    }

    async fn table_count(pool: &PgPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn insert_bare_user(pool: &PgPool, email: &str) -> i64 {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO users (email, password, role) VALUES ($1, 'hash', 'bendahara') RETURNING id_user",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap();
        id
    }

    #[sqlx::test]
    async fn duplicate_email_persists_no_rows(pool: PgPool) {
        create(&pool, &siti()).await.unwrap();

        let mut dup = siti();
        dup.nama = "Siti Kedua".to_string();
        let err = create(&pool, &dup).await.unwrap_err();
        assert!(is_email_unique_violation(&err));

        // Only the first account and its profile survived
        assert_eq!(table_count(&pool, "users").await, 1);
        assert_eq!(table_count(&pool, "admin").await, 1);
    }

    #[sqlx::test]
    async fn joined_view_falls_back_without_profile(pool: PgPool) {
        let id = insert_bare_user(&pool, "tanpa-profil@klinik.id").await;

        let found = get(&pool, id).await.unwrap().unwrap();
        assert_eq!(found.nama, "tanpa-profil@klinik.id");
        assert_eq!(found.role, Role::Bendahara);
        assert_eq!(found.jenis_kelamin, "");
        assert_eq!(found.alamat, "");
        assert!(found.id_admin.is_none());
    }

    #[sqlx::test]
    async fn update_upserts_missing_profile(pool: PgPool) {
        let id = insert_bare_user(&pool, "tanpa-profil@klinik.id").await;

        let changes = PenggunaChanges {
            email: "siti@klinik.id".to_string(),
            password_hash: None,
            role: Role::Kasir,
            nama: "Siti Rahma".to_string(),
            jenis_kelamin: "P".to_string(),
            alamat: "Jl. Melati 12".to_string(),
            nomor_telpon: "081234567890".to_string(),
        };
        assert!(update(&pool, id, &changes).await.unwrap());

        let found = get(&pool, id).await.unwrap().unwrap();
        assert_eq!(found.email, "siti@klinik.id");
        assert_eq!(found.nama, "Siti Rahma");
        assert!(found.id_admin.is_some());

        // Missing account reports false
        assert!(!update(&pool, id + 1000, &changes).await.unwrap());
    }

    #[sqlx::test]
    async fn delete_cascades_profile(pool: PgPool) {
        let id = create(&pool, &siti()).await.unwrap();

        assert!(delete(&pool, id).await.unwrap());
        assert_eq!(table_count(&pool, "users").await, 0);
        assert_eq!(table_count(&pool, "admin").await, 0);
        assert!(get(&pool, id).await.unwrap().is_none());

        assert!(!delete(&pool, id).await.unwrap());
    }
}
