//! Layanan (service catalog) model

use serde::{Deserialize, Serialize};

/// Service catalog entry
///
/// `total_harga` is always the sum of the three fee components, computed
/// server-side. All amounts are integer rupiah.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layanan {
    pub id_layanan: i64,
    pub nama_layanan: String,
    /// Visit tariff
    pub trf_kunjungan: i64,
    /// Doctor fee
    pub layanan_dokter: i64,
    /// Treatment fee
    pub layanan_tindakan: i64,
    pub total_harga: i64,
}

/// Create/update layanan payload
///
/// Fields are optional so missing keys reach the validator instead of failing
/// at deserialization; validation reports per-field Indonesian messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayananInput {
    pub nama_layanan: Option<String>,
    pub trf_kunjungan: Option<i64>,
    pub layanan_dokter: Option<i64>,
    pub layanan_tindakan: Option<i64>,
}

/// Slim row returned by the catalog search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayananSearchResult {
    pub id_layanan: i64,
    pub nama_layanan: String,
    pub total_harga: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layanan_input_missing_fields_deserialize() {
        let input: LayananInput = serde_json::from_str(r#"{"nama_layanan":"Umum"}"#).unwrap();
        assert_eq!(input.nama_layanan.as_deref(), Some("Umum"));
        assert!(input.trf_kunjungan.is_none());
        assert!(input.layanan_dokter.is_none());
        assert!(input.layanan_tindakan.is_none());
    }

    #[test]
    fn test_layanan_serialize_field_names() {
        let layanan = Layanan {
            id_layanan: 1,
            nama_layanan: "Poli Umum".to_string(),
            trf_kunjungan: 15000,
            layanan_dokter: 35000,
            layanan_tindakan: 0,
            total_harga: 50000,
        };
        let json = serde_json::to_value(&layanan).unwrap();
        assert_eq!(json["id_layanan"], 1);
        assert_eq!(json["nama_layanan"], "Poli Umum");
        assert_eq!(json["total_harga"], 50000);
    }
}
