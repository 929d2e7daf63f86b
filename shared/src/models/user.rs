//! Pengguna (staff account) model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff role
///
/// `kasir` runs the front desk (catalog, transactions, accounts);
/// `bendahara` reads the revenue reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Kasir,
    Bendahara,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kasir => "kasir",
            Self::Bendahara => "bendahara",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized role strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRole(pub String);

impl fmt::Display for InvalidRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for InvalidRole {}

impl FromStr for Role {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kasir" => Ok(Self::Kasir),
            "bendahara" => Ok(Self::Bendahara),
            other => Err(InvalidRole(other.to_string())),
        }
    }
}

/// Joined account + admin profile view
///
/// `nama` falls back to the email when the profile row is missing;
/// profile fields default to empty strings in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pengguna {
    pub id_user: i64,
    pub email: String,
    pub role: Role,
    pub nama: String,
    pub jenis_kelamin: String,
    pub alamat: String,
    pub nomor_telpon: String,
    pub id_admin: Option<i64>,
}

/// Create/update pengguna payload
///
/// On update a blank or missing `password` leaves the stored hash unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PenggunaInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub nama: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub alamat: Option<String>,
    pub nomor_telpon: Option<String>,
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub id_user: i64,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Kasir).unwrap(), "\"kasir\"");
        assert_eq!(
            serde_json::to_string(&Role::Bendahara).unwrap(),
            "\"bendahara\""
        );

        let role: Role = serde_json::from_str("\"bendahara\"").unwrap();
        assert_eq!(role, Role::Bendahara);

        let bad: Result<Role, _> = serde_json::from_str("\"dokter\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("kasir".parse::<Role>(), Ok(Role::Kasir));
        assert_eq!("bendahara".parse::<Role>(), Ok(Role::Bendahara));
        assert_eq!(
            "admin".parse::<Role>(),
            Err(InvalidRole("admin".to_string()))
        );
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Kasir.to_string(), "kasir");
        assert_eq!(Role::Bendahara.to_string(), "bendahara");
    }

    #[test]
    fn test_pengguna_input_partial() {
        let input: PenggunaInput =
            serde_json::from_str(r#"{"email":"siti@klinik.id","role":"kasir"}"#).unwrap();
        assert_eq!(input.email.as_deref(), Some("siti@klinik.id"));
        assert_eq!(input.role.as_deref(), Some("kasir"));
        assert!(input.password.is_none());
    }
}
