//! Laporan (revenue report) model
//!
//! Field names on the wire match the report client: the stats array and the
//! grand totals are camelCase, per-layanan rows keep their column names.

use serde::{Deserialize, Serialize};

/// Per-layanan aggregate row
///
/// `harga` is the service's current catalog price and `total` is
/// `jumlah_transaksi * harga` (current-price re-pricing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayananStat {
    pub id_layanan: i64,
    pub nama_layanan: String,
    pub jumlah_transaksi: i64,
    pub harga: i64,
    pub total: i64,
}

/// Daily report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaporanHarian {
    pub tanggal: String,
    pub layanan_stats: Vec<LayananStat>,
    pub total_transactions: i64,
    pub total_amount: i64,
}

/// Weekly (arbitrary date range) report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaporanMingguan {
    pub start_date: String,
    pub end_date: String,
    pub layanan_stats: Vec<LayananStat>,
    pub total_transactions: i64,
    pub total_amount: i64,
}

/// Monthly report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaporanBulanan {
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    pub layanan_stats: Vec<LayananStat>,
    pub total_transactions: i64,
    pub total_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harian_wire_names() {
        let report = LaporanHarian {
            tanggal: "2024-03-01".to_string(),
            layanan_stats: vec![LayananStat {
                id_layanan: 1,
                nama_layanan: "Poli Umum".to_string(),
                jumlah_transaksi: 2,
                harga: 50000,
                total: 100000,
            }],
            total_transactions: 2,
            total_amount: 100000,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tanggal"], "2024-03-01");
        assert!(json["layananStats"].is_array());
        assert_eq!(json["layananStats"][0]["jumlah_transaksi"], 2);
        assert_eq!(json["totalTransactions"], 2);
        assert_eq!(json["totalAmount"], 100000);
    }

    #[test]
    fn test_mingguan_wire_names() {
        let report = LaporanMingguan {
            start_date: "2024-03-01".to_string(),
            end_date: "2024-03-07".to_string(),
            layanan_stats: vec![],
            total_transactions: 0,
            total_amount: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["startDate"], "2024-03-01");
        assert_eq!(json["endDate"], "2024-03-07");
    }

    #[test]
    fn test_bulanan_wire_names() {
        let report = LaporanBulanan {
            month: 3,
            year: 2024,
            month_name: "Maret".to_string(),
            layanan_stats: vec![],
            total_transactions: 0,
            total_amount: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["month"], 3);
        assert_eq!(json["year"], 2024);
        assert_eq!(json["monthName"], "Maret");
    }
}
