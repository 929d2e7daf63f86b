//! Staff account endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Pengguna, PenggunaInput, Role};

use crate::db::pengguna::{self, NewPengguna, PenggunaChanges};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::hash_password;

type ApiResult<T> = Result<Json<T>, ServiceError>;

/// Validated account payload; `password` is `None` only on update
#[derive(Debug)]
struct Validated {
    email: String,
    password: Option<String>,
    role: Role,
    nama: String,
    jenis_kelamin: String,
    alamat: String,
    nomor_telpon: String,
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

fn validate(input: &PenggunaInput, require_password: bool) -> Result<Validated, AppError> {
    let mut errors: Vec<(&str, String)> = Vec::new();

    let email = input.email.as_deref().map(str::trim).unwrap_or_default();
    if email.is_empty() {
        errors.push(("email", "Email harus diisi".into()));
    } else if !is_valid_email(email) {
        errors.push(("email", "Format email tidak valid".into()));
    } else if email.chars().count() > 255 {
        errors.push(("email", "Email maksimal 255 karakter".into()));
    }

    // Blank password on update means "keep the stored hash"
    let password = input.password.as_deref().filter(|p| !p.is_empty());
    match password {
        None if require_password => errors.push(("password", "Password harus diisi".into())),
        Some(p) if p.chars().count() < 8 => {
            errors.push(("password", "Password minimal 8 karakter".into()));
        }
        _ => {}
    }

    let role = match input.role.as_deref().map(str::trim).unwrap_or_default() {
        "" => {
            errors.push(("role", "Role harus dipilih".into()));
            None
        }
        raw => match raw.parse::<Role>() {
            Ok(r) => Some(r),
            Err(_) => {
                errors.push(("role", "Role tidak valid".into()));
                None
            }
        },
    };

    let nama = input.nama.as_deref().map(str::trim).unwrap_or_default();
    if nama.is_empty() {
        errors.push(("nama", "Nama harus diisi".into()));
    } else if nama.chars().count() > 50 {
        errors.push(("nama", "Nama maksimal 50 karakter".into()));
    }

    let jenis_kelamin = input
        .jenis_kelamin
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    match jenis_kelamin {
        "" => errors.push(("jenis_kelamin", "Jenis kelamin harus dipilih".into())),
        "L" | "P" => {}
        _ => errors.push(("jenis_kelamin", "Jenis kelamin tidak valid".into())),
    }

    let alamat = input.alamat.as_deref().map(str::trim).unwrap_or_default();
    if alamat.is_empty() {
        errors.push(("alamat", "Alamat harus diisi".into()));
    } else if alamat.chars().count() > 50 {
        errors.push(("alamat", "Alamat maksimal 50 karakter".into()));
    }

    let nomor_telpon = input
        .nomor_telpon
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    if nomor_telpon.is_empty() {
        errors.push(("nomor_telpon", "Nomor telepon harus diisi".into()));
    } else if nomor_telpon.chars().count() > 13 {
        errors.push(("nomor_telpon", "Nomor telepon maksimal 13 karakter".into()));
    }

    if !errors.is_empty() {
        let mut err = AppError::validation("Validasi gagal");
        for (field, message) in errors {
            err = err.with_detail(field, message);
        }
        return Err(err);
    }

    let Some(role) = role else {
        return Err(AppError::validation("Validasi gagal").with_detail("role", "Role tidak valid"));
    };

    Ok(Validated {
        email: email.to_string(),
        password: password.map(str::to_string),
        role,
        nama: nama.to_string(),
        jenis_kelamin: jenis_kelamin.to_string(),
        alamat: alamat.to_string(),
        nomor_telpon: nomor_telpon.to_string(),
    })
}

fn email_taken_error() -> AppError {
    AppError::with_message(ErrorCode::EmailTaken, "Email sudah digunakan")
        .with_detail("email", "Email sudah digunakan")
}

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| AppError::internal(format!("Password hash error: {e}")))
}

pub async fn list_pengguna(State(state): State<AppState>) -> ApiResult<Vec<Pengguna>> {
    Ok(Json(pengguna::list(&state.pool).await?))
}

pub async fn get_pengguna(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Pengguna> {
    let found = pengguna::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PenggunaNotFound))?;
    Ok(Json(found))
}

pub async fn create_pengguna(
    State(state): State<AppState>,
    Json(input): Json<PenggunaInput>,
) -> ApiResult<ApiResponse<Pengguna>> {
    let data = validate(&input, true)?;

    if pengguna::email_taken(&state.pool, &data.email, None).await? {
        return Err(email_taken_error().into());
    }

    let password = data
        .password
        .as_deref()
        .ok_or_else(|| AppError::internal("Password missing after validation"))?;

    let new = NewPengguna {
        email: data.email,
        password_hash: hash(password)?,
        role: data.role,
        nama: data.nama,
        jenis_kelamin: data.jenis_kelamin,
        alamat: data.alamat,
        nomor_telpon: data.nomor_telpon,
    };

    let id_user = match pengguna::create(&state.pool, &new).await {
        Ok(id) => id,
        Err(e) if pengguna::is_email_unique_violation(&e) => {
            return Err(email_taken_error().into());
        }
        Err(e) => return Err(e.into()),
    };

    let created = pengguna::get(&state.pool, id_user)
        .await?
        .ok_or_else(|| AppError::internal("Created account not readable"))?;

    Ok(Json(ApiResponse::success_with_message(
        "Pengguna berhasil ditambahkan",
        created,
    )))
}

pub async fn update_pengguna(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PenggunaInput>,
) -> ApiResult<ApiResponse<Pengguna>> {
    let data = validate(&input, false)?;

    if pengguna::email_taken(&state.pool, &data.email, Some(id)).await? {
        return Err(email_taken_error().into());
    }

    let password_hash = match data.password.as_deref() {
        Some(p) => Some(hash(p)?),
        None => None,
    };

    let changes = PenggunaChanges {
        email: data.email,
        password_hash,
        role: data.role,
        nama: data.nama,
        jenis_kelamin: data.jenis_kelamin,
        alamat: data.alamat,
        nomor_telpon: data.nomor_telpon,
    };

    let updated = match pengguna::update(&state.pool, id, &changes).await {
        Ok(found) => found,
        Err(e) if pengguna::is_email_unique_violation(&e) => {
            return Err(email_taken_error().into());
        }
        Err(e) => return Err(e.into()),
    };
    if !updated {
        return Err(AppError::new(ErrorCode::PenggunaNotFound).into());
    }

    let record = pengguna::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::internal("Updated account not readable"))?;

    Ok(Json(ApiResponse::success_with_message(
        "Pengguna berhasil diperbarui",
        record,
    )))
}

pub async fn delete_pengguna(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    if !pengguna::delete(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::PenggunaNotFound).into());
    }
    Ok(Json(ApiResponse::ok_with_message("Pengguna berhasil dihapus")))
}
