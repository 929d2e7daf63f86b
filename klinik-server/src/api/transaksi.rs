//! Transaction ledger endpoints

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{DeleteOutcome, Transaksi, TransaksiCreate, TransaksiReceipt};

use crate::auth::staff_auth::Identity;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Validated create payload
#[derive(Debug)]
struct ValidatedCreate {
    nama_pasien: String,
    layanan_ids: Vec<i64>,
    total_bayar: i64,
}

fn validate(input: &TransaksiCreate) -> Result<ValidatedCreate, AppError> {
    let mut errors: Vec<(&str, String)> = Vec::new();

    let nama = input.nama_pasien.as_deref().map(str::trim).unwrap_or_default();
    if nama.is_empty() {
        errors.push(("nama_pasien", "Nama pasien harus diisi".into()));
    } else if nama.chars().count() > 50 {
        errors.push(("nama_pasien", "Nama pasien maksimal 50 karakter".into()));
    }

    let layanan_ids = input.layanan_ids.clone().unwrap_or_default();
    if layanan_ids.is_empty() {
        errors.push(("layanan_ids", "Pilih minimal satu layanan".into()));
    }

    let total_bayar = match input.total_bayar {
        None => {
            errors.push(("total_bayar", "Nominal bayar harus diisi".into()));
            0
        }
        Some(v) if v < 0 => {
            errors.push(("total_bayar", "Nominal bayar tidak boleh negatif".into()));
            0
        }
        Some(v) => v,
    };

    if !errors.is_empty() {
        let mut err = AppError::validation("Validasi gagal");
        for (field, message) in errors {
            err = err.with_detail(field, message);
        }
        return Err(err);
    }

    Ok(ValidatedCreate {
        nama_pasien: nama.to_string(),
        layanan_ids,
        total_bayar,
    })
}

/// Price the submitted lines at current catalog prices; duplicates count
/// independently and an unknown id rejects the whole request.
fn total_for(ids: &[i64], prices: &HashMap<i64, i64>) -> Result<i64, AppError> {
    let mut total = 0i64;
    for id in ids {
        let harga = prices.get(id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::LayananNotFound,
                format!("Layanan {id} tidak ditemukan"),
            )
        })?;
        total += harga;
    }
    Ok(total)
}

pub async fn list_transaksi(State(state): State<AppState>) -> ApiResult<Vec<Transaksi>> {
    Ok(Json(db::transaksi::list(&state.pool).await?))
}

/// `POST /api/transaksi`
///
/// The recorded `id_admin` is always the authenticated caller; totals are
/// recomputed server-side and `total_bayar` must cover them before any row
/// is written.
pub async fn create_transaksi(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<TransaksiCreate>,
) -> ApiResult<ApiResponse<TransaksiReceipt>> {
    let data = validate(&input)?;

    let prices: HashMap<i64, i64> = db::layanan::prices_for(&state.pool, &data.layanan_ids)
        .await?
        .into_iter()
        .collect();
    let total_harga = total_for(&data.layanan_ids, &prices)?;

    if data.total_bayar < total_harga {
        return Err(AppError::with_message(
            ErrorCode::PaymentInsufficientAmount,
            "Nominal bayar kurang dari total harga",
        )
        .with_detail("total_harga", total_harga)
        .with_detail("total_bayar", data.total_bayar)
        .into());
    }

    let id_transaksi = db::transaksi::create(
        &state.pool,
        identity.user_id,
        &data.nama_pasien,
        &data.layanan_ids,
        total_harga,
        data.total_bayar,
    )
    .await?;

    let receipt = TransaksiReceipt {
        id_transaksi,
        nama_pasien: data.nama_pasien,
        total_harga,
        total_bayar: data.total_bayar,
        kembalian: data.total_bayar - total_harga,
    };

    Ok(Json(ApiResponse::success_with_message(
        "Transaksi berhasil disimpan",
        receipt,
    )))
}

/// `DELETE /api/transaksi/{id}`
///
/// Flat `{ success, message }` body on every outcome, matching the client's
/// asynchronous delete flow.
pub async fn delete_transaksi(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<DeleteOutcome>) {
    match db::transaksi::delete(&state.pool, id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(DeleteOutcome {
                success: true,
                message: "Transaksi berhasil dihapus".to_string(),
            }),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(DeleteOutcome {
                success: false,
                message: "Transaksi tidak ditemukan".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, id_transaksi = id, "Failed to delete transaction");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeleteOutcome {
                    success: false,
                    message: "Gagal menghapus transaksi".to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> TransaksiCreate {
        TransaksiCreate {
            nama_pasien: Some("Budi".to_string()),
            layanan_ids: Some(vec![1, 1, 2]),
            total_bayar: Some(200000),
        }
    }

    fn prices() -> HashMap<i64, i64> {
        HashMap::from([(1, 50000), (2, 75000)])
    }

    #[test]
    fn test_validate_ok() {
        let data = validate(&full_input()).unwrap();
        assert_eq!(data.nama_pasien, "Budi");
        assert_eq!(data.layanan_ids, vec![1, 1, 2]);
        assert_eq!(data.total_bayar, 200000);
    }

    #[test]
    fn test_validate_missing_patient_and_payment() {
        let err = validate(&TransaksiCreate {
            nama_pasien: None,
            total_bayar: None,
            ..full_input()
        })
        .unwrap_err();
        let details = err.details.unwrap();
        assert_eq!(details.get("nama_pasien").unwrap(), "Nama pasien harus diisi");
        assert_eq!(details.get("total_bayar").unwrap(), "Nominal bayar harus diisi");
    }

    #[test]
    fn test_validate_empty_lines() {
        let err = validate(&TransaksiCreate {
            layanan_ids: Some(vec![]),
            ..full_input()
        })
        .unwrap_err();
        assert_eq!(
            err.details.unwrap().get("layanan_ids").unwrap(),
            "Pilih minimal satu layanan"
        );
    }

    #[test]
    fn test_validate_negative_payment() {
        let err = validate(&TransaksiCreate {
            total_bayar: Some(-5),
            ..full_input()
        })
        .unwrap_err();
        assert_eq!(
            err.details.unwrap().get("total_bayar").unwrap(),
            "Nominal bayar tidak boleh negatif"
        );
    }

    #[test]
    fn test_total_counts_duplicates_independently() {
        let total = total_for(&[1, 1, 2], &prices()).unwrap();
        assert_eq!(total, 175000);
    }

    #[test]
    fn test_total_rejects_unknown_layanan() {
        let err = total_for(&[1, 99], &prices()).unwrap_err();
        assert_eq!(err.code, ErrorCode::LayananNotFound);
    }

    #[test]
    fn test_kembalian_is_difference() {
        let total_harga = total_for(&[1, 2], &prices()).unwrap();
        let total_bayar = 150000;
        assert_eq!(total_bayar - total_harga, 25000);
    }
}
