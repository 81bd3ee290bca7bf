//! Singleton configuration record shown to buyers during purchase.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::models::null_as_empty;

static EVM_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address pattern")
});

/// Bank transfer details, admin wallet and USDT/VND rate.
///
/// Saved with full-overwrite semantics: fields the console does not model
/// are kept in `extra` and sent back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bank_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub account_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub account_holder: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub qr_image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub admin_wallet_address: String,
    /// Missing or `null` on the wire reads as 1.
    #[serde(
        default = "unit_rate",
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "rate_or_unit"
    )]
    pub usdt_rate: Decimal,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

const fn unit_rate() -> Decimal {
    Decimal::ONE
}

fn rate_or_unit<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(rust_decimal::serde::float_option::deserialize(deserializer)?.unwrap_or_else(unit_rate))
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            bank_name: String::new(),
            account_number: String::new(),
            account_holder: String::new(),
            qr_image_url: String::new(),
            note: String::new(),
            admin_wallet_address: String::new(),
            usdt_rate: unit_rate(),
            extra: serde_json::Map::new(),
        }
    }
}

impl SystemConfig {
    /// Check the record before it is sent to `PUT /admin/config`.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("bankName", &self.bank_name),
            ("accountNumber", &self.account_number),
            ("accountHolder", &self.account_holder),
            ("adminWalletAddress", &self.admin_wallet_address),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!("{name} is required")));
            }
        }
        if !EVM_ADDRESS.is_match(self.admin_wallet_address.trim()) {
            return Err(Error::Validation(
                "adminWalletAddress must be a 0x-prefixed 40 digit hex address".into(),
            ));
        }
        if self.usdt_rate <= Decimal::ZERO {
            return Err(Error::Validation("usdtRate must be positive".into()));
        }
        let url = self.qr_image_url.trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Validation(
                "qrImageUrl must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> SystemConfig {
        SystemConfig {
            bank_name: "Vietcombank".into(),
            account_number: "0123456789".into(),
            account_holder: "NGUYEN VAN A".into(),
            qr_image_url: "https://cdn.example.com/qr.png".into(),
            note: "Ghi ma don hang".into(),
            admin_wallet_address: "0xAbCdEf0123456789abcdef0123456789ABCDEF01".into(),
            usdt_rate: Decimal::new(25_400, 0),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn parses_wire_format_with_nulls_and_extras() {
        let cfg: SystemConfig = serde_json::from_value(json!({
            "id": "cfg-1",
            "bankName": "ACB",
            "accountNumber": "999",
            "accountHolder": "TRAN B",
            "qrImageUrl": null,
            "note": null,
            "adminWalletAddress": "0x0000000000000000000000000000000000000001",
            "usdtRate": 25350.5,
            "updatedAt": "2024-05-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(cfg.qr_image_url, "");
        assert_eq!(cfg.usdt_rate, Decimal::new(253_505, 1));
        assert_eq!(cfg.extra.get("id"), Some(&json!("cfg-1")));
    }

    #[test]
    fn absent_or_null_rate_reads_as_one() {
        let missing: SystemConfig = serde_json::from_value(json!({"bankName": "ACB"})).unwrap();
        assert_eq!(missing.usdt_rate, Decimal::ONE);
        assert_eq!(missing.bank_name, "ACB");

        let null: SystemConfig =
            serde_json::from_value(json!({"bankName": "ACB", "usdtRate": null})).unwrap();
        assert_eq!(null.usdt_rate, Decimal::ONE);
        assert!(null.extra.is_empty());
    }

    #[test]
    fn serializes_rate_as_number_and_keeps_extras() {
        let mut cfg = valid();
        cfg.extra.insert("id".into(), json!("cfg-1"));
        let value = serde_json::to_value(&cfg).unwrap();
        assert!(value["usdtRate"].is_number());
        assert_eq!(value["adminWalletAddress"], json!(cfg.admin_wallet_address));
        assert_eq!(value["id"], json!("cfg-1"));
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn empty_qr_url_is_allowed() {
        let mut cfg = valid();
        cfg.qr_image_url.clear();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn non_positive_rate_rejected() {
        let mut cfg = valid();
        cfg.usdt_rate = Decimal::ZERO;
        assert!(matches!(cfg.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn malformed_wallet_rejected() {
        let mut cfg = valid();
        cfg.admin_wallet_address = "0x1234".into();
        assert!(matches!(cfg.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn missing_required_field_named_in_error() {
        let mut cfg = valid();
        cfg.account_holder = "  ".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("accountHolder"));
    }

    #[test]
    fn qr_url_must_be_http() {
        let mut cfg = valid();
        cfg.qr_image_url = "ftp://example.com/qr.png".into();
        assert!(matches!(cfg.validate(), Err(Error::Validation(_))));
    }
}
