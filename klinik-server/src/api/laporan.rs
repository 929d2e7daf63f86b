//! Revenue report endpoints
//!
//! All three reports reduce to one `[start, end]` range over the calendar
//! date of `transaksi.created_at`.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::{LaporanBulanan, LaporanHarian, LaporanMingguan, LayananStat};

use crate::db;
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ServiceError>;

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Indonesian month name for 1..=12
fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, AppError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::validation("Validasi gagal")
            .with_detail(field, "Tanggal harus diisi"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::validation("Validasi gagal")
            .with_detail(field, "Format tanggal tidak valid (YYYY-MM-DD)")
    })
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::validation("Validasi gagal").with_detail(
            "endDate",
            "Tanggal akhir harus setelah atau sama dengan tanggal awal",
        ));
    }
    Ok(())
}

/// First and last day of the month, validated against the report bounds
fn month_range(
    month: Option<u32>,
    year: Option<i32>,
) -> Result<(u32, i32, NaiveDate, NaiveDate), AppError> {
    let month = match month {
        Some(m) if (1..=12).contains(&m) => m,
        Some(_) => {
            return Err(AppError::validation("Validasi gagal")
                .with_detail("month", "Bulan harus antara 1 dan 12"));
        }
        None => {
            return Err(
                AppError::validation("Validasi gagal").with_detail("month", "Bulan harus diisi")
            );
        }
    };
    let year = match year {
        Some(y) if (2000..=2100).contains(&y) => y,
        Some(_) => {
            return Err(AppError::validation("Validasi gagal")
                .with_detail("year", "Tahun harus antara 2000 dan 2100"));
        }
        None => {
            return Err(
                AppError::validation("Validasi gagal").with_detail("year", "Tahun harus diisi")
            );
        }
    };

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::invalid_request("Invalid month range"))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| AppError::invalid_request("Invalid month range"))?;
    let last = next_first
        .pred_opt()
        .ok_or_else(|| AppError::invalid_request("Invalid month range"))?;

    Ok((month, year, first, last))
}

async fn range_stats(
    state: &AppState,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<(Vec<LayananStat>, i64, i64)> {
    let stats = db::laporan::layanan_stats(&state.pool, start, end).await?;
    let total_transactions = db::laporan::transaksi_count(&state.pool, start, end).await?;
    let total_amount = stats.iter().map(|s| s.total).sum();
    Ok((stats, total_transactions, total_amount))
}

#[derive(Debug, Deserialize)]
pub struct HarianParams {
    pub date: Option<String>,
}

pub async fn harian(
    State(state): State<AppState>,
    Query(params): Query<HarianParams>,
) -> ApiResult<LaporanHarian> {
    let date = parse_date(params.date.as_deref(), "date")?;
    let (layanan_stats, total_transactions, total_amount) =
        range_stats(&state, date, date).await?;
    Ok(Json(LaporanHarian {
        tanggal: date.to_string(),
        layanan_stats,
        total_transactions,
        total_amount,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MingguanParams {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

pub async fn mingguan(
    State(state): State<AppState>,
    Query(params): Query<MingguanParams>,
) -> ApiResult<LaporanMingguan> {
    let start = parse_date(params.start_date.as_deref(), "startDate")?;
    let end = parse_date(params.end_date.as_deref(), "endDate")?;
    validate_range(start, end)?;

    let (layanan_stats, total_transactions, total_amount) =
        range_stats(&state, start, end).await?;
    Ok(Json(LaporanMingguan {
        start_date: start.to_string(),
        end_date: end.to_string(),
        layanan_stats,
        total_transactions,
        total_amount,
    }))
}

#[derive(Debug, Deserialize)]
pub struct BulananParams {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

pub async fn bulanan(
    State(state): State<AppState>,
    Query(params): Query<BulananParams>,
) -> ApiResult<LaporanBulanan> {
    let (month, year, first, last) = month_range(params.month, params.year)?;
    // month_range only yields months inside the name table
    let month_name = month_name(month)
        .ok_or_else(|| AppError::invalid_request("Invalid month"))?
        .to_string();

    let (layanan_stats, total_transactions, total_amount) =
        range_stats(&state, first, last).await?;
    Ok(Json(LaporanBulanan {
        month,
        year,
        month_name,
        layanan_stats,
        total_transactions,
        total_amount,
    }))
}
