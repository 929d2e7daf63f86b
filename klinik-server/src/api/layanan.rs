//! Service catalog endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Layanan, LayananInput, LayananSearchResult};

use crate::db::layanan::{self, NewLayanan};
use crate::error::ServiceError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Validate a create/update payload, collecting per-field messages
fn validate(input: &LayananInput) -> Result<NewLayanan, AppError> {
    let mut errors: Vec<(&str, String)> = Vec::new();

    let nama = input.nama_layanan.as_deref().map(str::trim).unwrap_or_default();
    if nama.is_empty() {
        errors.push(("nama_layanan", "Nama layanan harus diisi".into()));
    } else if nama.chars().count() > 50 {
        errors.push(("nama_layanan", "Nama layanan maksimal 50 karakter".into()));
    }

    let mut fee = |value: Option<i64>, field: &'static str, label: &str| -> i64 {
        match value {
            None => {
                errors.push((field, format!("{label} harus diisi")));
                0
            }
            Some(v) if v < 0 => {
                errors.push((field, format!("{label} tidak boleh negatif")));
                0
            }
            Some(v) => v,
        }
    };

    let trf_kunjungan = fee(input.trf_kunjungan, "trf_kunjungan", "Tarif kunjungan");
    let layanan_dokter = fee(input.layanan_dokter, "layanan_dokter", "Layanan dokter");
    let layanan_tindakan = fee(input.layanan_tindakan, "layanan_tindakan", "Layanan tindakan");

    if !errors.is_empty() {
        let mut err = AppError::validation("Validasi gagal");
        for (field, message) in errors {
            err = err.with_detail(field, message);
        }
        return Err(err);
    }

    Ok(NewLayanan {
        nama_layanan: nama.to_string(),
        trf_kunjungan,
        layanan_dokter,
        layanan_tindakan,
    })
}

pub async fn list_layanan(State(state): State<AppState>) -> ApiResult<Vec<Layanan>> {
    Ok(Json(layanan::list(&state.pool).await?))
}

pub async fn get_layanan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Layanan> {
    let found = layanan::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LayananNotFound))?;
    Ok(Json(found))
}

pub async fn create_layanan(
    State(state): State<AppState>,
    Json(input): Json<LayananInput>,
) -> ApiResult<ApiResponse<Layanan>> {
    let data = validate(&input)?;
    let created = layanan::create(&state.pool, &data).await?;
    Ok(Json(ApiResponse::success_with_message(
        "Layanan berhasil ditambahkan",
        created,
    )))
}

pub async fn update_layanan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<LayananInput>,
) -> ApiResult<ApiResponse<Layanan>> {
    let data = validate(&input)?;
    let updated = layanan::update(&state.pool, id, &data)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LayananNotFound))?;
    Ok(Json(ApiResponse::success_with_message(
        "Layanan berhasil diperbarui",
        updated,
    )))
}

fn layanan_in_use() -> AppError {
    AppError::with_message(
        ErrorCode::LayananInUse,
        "Layanan tidak dapat dihapus karena sudah digunakan pada transaksi",
    )
}

pub async fn delete_layanan(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    if layanan::get(&state.pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::LayananNotFound).into());
    }

    let references = layanan::reference_count(&state.pool, id).await?;
    if references > 0 {
        return Err(layanan_in_use()
            .with_detail("jumlah_transaksi", references)
            .into());
    }

    // The reference check can lose to a concurrent line insert; the foreign
    // key reports the conflict in that case.
    match layanan::delete(&state.pool, id).await {
        Ok(_) => Ok(Json(ApiResponse::ok_with_message("Layanan berhasil dihapus"))),
        Err(e) if layanan::is_reference_violation(&e) => Err(layanan_in_use().into()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

pub async fn search_layanan(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Vec<LayananSearchResult>> {
    let term = params.search.as_deref().map(str::trim).unwrap_or_default();
    Ok(Json(layanan::search(&state.pool, term).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> LayananInput {
        LayananInput {
            nama_layanan: Some("Poli Gigi".to_string()),
            trf_kunjungan: Some(15000),
            layanan_dokter: Some(35000),
            layanan_tindakan: Some(20000),
        }
    }

    #[test]
    fn test_validate_ok() {
        let data = validate(&full_input()).unwrap();
        assert_eq!(data.nama_layanan, "Poli Gigi");
        assert_eq!(data.total_harga(), 70000);
    }

    #[test]
    fn test_validate_missing_name() {
        let err = validate(&LayananInput {
            nama_layanan: None,
            ..full_input()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(
            details.get("nama_layanan").unwrap(),
            "Nama layanan harus diisi"
        );
    }

    #[test]
    fn test_validate_blank_name_is_missing() {
        let err = validate(&LayananInput {
            nama_layanan: Some("   ".to_string()),
            ..full_input()
        })
        .unwrap_err();
        assert!(err.details.unwrap().contains_key("nama_layanan"));
    }

    #[test]
    fn test_validate_name_too_long() {
        let err = validate(&LayananInput {
            nama_layanan: Some("x".repeat(51)),
            ..full_input()
        })
        .unwrap_err();
        assert_eq!(
            err.details.unwrap().get("nama_layanan").unwrap(),
            "Nama layanan maksimal 50 karakter"
        );
    }

    #[test]
    fn test_validate_missing_and_negative_fees() {
        let err = validate(&LayananInput {
            trf_kunjungan: None,
            layanan_dokter: Some(-1),
            ..full_input()
        })
        .unwrap_err();
        let details = err.details.unwrap();
        assert_eq!(
            details.get("trf_kunjungan").unwrap(),
            "Tarif kunjungan harus diisi"
        );
        assert_eq!(
            details.get("layanan_dokter").unwrap(),
            "Layanan dokter tidak boleh negatif"
        );
        assert!(!details.contains_key("layanan_tindakan"));
    }

    #[test]
    fn test_validate_zero_fee_allowed() {
        let data = validate(&LayananInput {
            layanan_tindakan: Some(0),
            ..full_input()
        })
        .unwrap();
        assert_eq!(data.layanan_tindakan, 0);
        assert_eq!(data.total_harga(), 50000);
    }

    #[test]
    fn test_validate_trims_name() {
        let data = validate(&LayananInput {
            nama_layanan: Some("  Poli Umum  ".to_string()),
            ..full_input()
        })
        .unwrap();
        assert_eq!(data.nama_layanan, "Poli Umum");
    }
}
