//! Transaksi (transaction ledger) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One service line of a transaction
///
/// `nama_layanan` / `harga` resolve against the current catalog; a line whose
/// service was deleted in old data carries `None` and is tolerated by readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransaksiDetail {
    pub id_transaksi_detail: i64,
    pub id_layanan: i64,
    pub nama_layanan: Option<String>,
    pub harga: Option<i64>,
}

/// Transaction with its service lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaksi {
    pub id_transaksi: i64,
    pub id_admin: i64,
    pub nama_pasien: String,
    pub total_harga: i64,
    pub total_bayar: i64,
    pub created_at: DateTime<Utc>,
    pub details: Vec<TransaksiDetail>,
}

/// Create transaction payload
///
/// `total_harga` is never accepted from the client; the server recomputes it
/// from the selected services' current prices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransaksiCreate {
    pub nama_pasien: Option<String>,
    pub layanan_ids: Option<Vec<i64>>,
    pub total_bayar: Option<i64>,
}

/// Receipt data returned after a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransaksiReceipt {
    pub id_transaksi: i64,
    pub nama_pasien: String,
    pub total_harga: i64,
    pub total_bayar: i64,
    /// Change handed back: `total_bayar - total_harga`
    pub kembalian: i64,
}

/// Delete outcome body (kept flat for the client's async delete flow)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaksi_create_deserialize() {
        let body: TransaksiCreate =
            serde_json::from_str(r#"{"nama_pasien":"Budi","layanan_ids":[1,1,3],"total_bayar":100000}"#)
                .unwrap();
        assert_eq!(body.nama_pasien.as_deref(), Some("Budi"));
        assert_eq!(body.layanan_ids, Some(vec![1, 1, 3]));
        assert_eq!(body.total_bayar, Some(100000));
    }

    #[test]
    fn test_detail_with_deleted_layanan() {
        let detail = TransaksiDetail {
            id_transaksi_detail: 7,
            id_layanan: 99,
            nama_layanan: None,
            harga: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["nama_layanan"], serde_json::Value::Null);
        assert_eq!(json["harga"], serde_json::Value::Null);
    }

    #[test]
    fn test_delete_outcome_serialize() {
        let outcome = DeleteOutcome {
            success: true,
            message: "Transaksi berhasil dihapus".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("Transaksi berhasil dihapus"));
    }
}
