//! System configuration form.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{error, info};
use walletdesk_core::Result;
use walletdesk_core::models::SystemConfig;

use super::{Notice, Request};

/// Editable fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    BankName,
    AccountNumber,
    AccountHolder,
    QrImageUrl,
    Note,
    AdminWalletAddress,
    UsdtRate,
}

impl SettingsField {
    pub const ALL: [Self; 7] = [
        Self::BankName,
        Self::AccountNumber,
        Self::AccountHolder,
        Self::QrImageUrl,
        Self::Note,
        Self::AdminWalletAddress,
        Self::UsdtRate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::BankName => "Bank name",
            Self::AccountNumber => "Account number",
            Self::AccountHolder => "Account holder",
            Self::QrImageUrl => "QR image URL",
            Self::Note => "Note",
            Self::AdminWalletAddress => "Admin wallet",
            Self::UsdtRate => "USDT rate (VND)",
        }
    }

    pub const fn is_required(self) -> bool {
        !matches!(self, Self::QrImageUrl | Self::Note)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// State of the QR code preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrPreview {
    /// No URL configured.
    Empty,
    /// URL changed since the last probe.
    Unchecked(String),
    Available(String),
    /// The URL did not serve an image; the preview is hidden.
    Broken(String),
}

impl QrPreview {
    fn for_url(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() {
            Self::Empty
        } else {
            Self::Unchecked(url.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsPage {
    /// Working copy; saved as a whole.
    pub config: SystemConfig,
    /// Rate as typed; parsed on save.
    pub rate_input: String,
    pub focus: SettingsField,
    pub loading: bool,
    pub saving: bool,
    pub notice: Option<Notice>,
    pub qr: QrPreview,
}

impl Default for SettingsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsPage {
    pub fn new() -> Self {
        let config = SystemConfig::default();
        Self {
            rate_input: config.usdt_rate.to_string(),
            config,
            focus: SettingsField::BankName,
            loading: true,
            saving: false,
            notice: None,
            qr: QrPreview::Empty,
        }
    }

    fn replace_config(&mut self, config: SystemConfig) {
        self.rate_input = config.usdt_rate.normalize().to_string();
        self.qr = QrPreview::for_url(&config.qr_image_url);
        self.config = config;
    }

    /// Request the configuration.
    pub const fn start_load(&mut self) -> Request {
        self.loading = true;
        Request::LoadSettings
    }

    /// Fill the form. A failure is logged and the form keeps its values.
    /// Returns the QR probe for the loaded URL, if any.
    pub fn finish_load(&mut self, result: Result<SystemConfig>) -> Option<Request> {
        match result {
            Ok(config) => self.replace_config(config),
            Err(e) => error!(error = %e, "Failed to load system config"),
        }
        self.loading = false;
        self.start_probe()
    }

    pub fn value(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::BankName => &self.config.bank_name,
            SettingsField::AccountNumber => &self.config.account_number,
            SettingsField::AccountHolder => &self.config.account_holder,
            SettingsField::QrImageUrl => &self.config.qr_image_url,
            SettingsField::Note => &self.config.note,
            SettingsField::AdminWalletAddress => &self.config.admin_wallet_address,
            SettingsField::UsdtRate => &self.rate_input,
        }
    }

    fn value_mut(&mut self, field: SettingsField) -> &mut String {
        match field {
            SettingsField::BankName => &mut self.config.bank_name,
            SettingsField::AccountNumber => &mut self.config.account_number,
            SettingsField::AccountHolder => &mut self.config.account_holder,
            SettingsField::QrImageUrl => &mut self.config.qr_image_url,
            SettingsField::Note => &mut self.config.note,
            SettingsField::AdminWalletAddress => &mut self.config.admin_wallet_address,
            SettingsField::UsdtRate => &mut self.rate_input,
        }
    }

    /// Replace a field's text.
    pub fn set_value(&mut self, field: SettingsField, value: &str) {
        value.clone_into(self.value_mut(field));
        self.field_changed(field);
    }

    pub fn insert_char(&mut self, c: char) {
        let field = self.focus;
        if field == SettingsField::UsdtRate && !(c.is_ascii_digit() || c == '.') {
            return;
        }
        self.value_mut(field).push(c);
        self.field_changed(field);
    }

    pub fn backspace(&mut self) {
        let field = self.focus;
        if self.value_mut(field).pop().is_some() {
            self.field_changed(field);
        }
    }

    fn field_changed(&mut self, field: SettingsField) {
        if field == SettingsField::QrImageUrl {
            self.qr = QrPreview::for_url(&self.config.qr_image_url);
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Probe the QR URL if it changed since the last probe.
    pub fn start_probe(&self) -> Option<Request> {
        match &self.qr {
            QrPreview::Unchecked(url) => Some(Request::ProbeQr(url.clone())),
            _ => None,
        }
    }

    /// Apply a probe result unless the URL was edited meanwhile.
    pub fn finish_probe(&mut self, url: String, available: bool) {
        if self.qr != QrPreview::Unchecked(url.clone()) {
            return;
        }
        self.qr = if available {
            QrPreview::Available(url)
        } else {
            QrPreview::Broken(url)
        };
    }

    /// Parse the rate and request a save of the whole record.
    pub fn start_save(&mut self) -> Option<Request> {
        if self.saving {
            return None;
        }
        let rate = match Decimal::from_str(self.rate_input.trim()) {
            Ok(rate) if rate >= Decimal::ZERO => rate,
            _ => {
                self.notice = Some(Notice::Error(format!(
                    "Save failed: invalid USDT rate {:?}",
                    self.rate_input
                )));
                return None;
            }
        };
        self.config.usdt_rate = rate;
        self.saving = true;
        Some(Request::SaveSettings(Box::new(self.config.clone())))
    }

    /// Report the save. Returns the QR probe for the saved URL, if any.
    pub fn finish_save(&mut self, result: Result<SystemConfig>) -> Option<Request> {
        self.saving = false;
        match result {
            Ok(saved) => {
                info!("System config updated");
                self.replace_config(saved);
                self.notice = Some(Notice::Success("Settings saved".into()));
                self.start_probe()
            }
            Err(e) => {
                error!(error = %e, "Failed to update system config");
                self.notice = Some(Notice::Error(format!("Save failed: {}", e.user_message())));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut field = SettingsField::BankName;
        for _ in 0..SettingsField::ALL.len() {
            field = field.next();
        }
        assert_eq!(field, SettingsField::BankName);
        assert_eq!(SettingsField::BankName.prev(), SettingsField::UsdtRate);
    }

    #[test]
    fn editing_url_marks_preview_unchecked() {
        let mut page = SettingsPage::new();
        page.focus = SettingsField::QrImageUrl;
        for c in "https://x/qr.png".chars() {
            page.insert_char(c);
        }
        assert_eq!(page.qr, QrPreview::Unchecked("https://x/qr.png".into()));
        page.set_value(SettingsField::QrImageUrl, "  ");
        assert_eq!(page.qr, QrPreview::Empty);
    }

    #[test]
    fn rate_field_accepts_only_numeric_input() {
        let mut page = SettingsPage::new();
        page.focus = SettingsField::UsdtRate;
        page.set_value(SettingsField::UsdtRate, "");
        for c in "25a400.5".chars() {
            page.insert_char(c);
        }
        assert_eq!(page.value(SettingsField::UsdtRate), "25400.5");
        page.backspace();
        assert_eq!(page.value(SettingsField::UsdtRate), "25400.");
    }

    #[test]
    fn probe_result_for_an_edited_url_is_ignored() {
        let mut page = SettingsPage::new();
        page.set_value(SettingsField::QrImageUrl, "https://x/a.png");
        assert_eq!(page.start_probe(), Some(Request::ProbeQr("https://x/a.png".into())));
        page.set_value(SettingsField::QrImageUrl, "https://x/b.png");
        page.finish_probe("https://x/a.png".into(), true);
        assert_eq!(page.qr, QrPreview::Unchecked("https://x/b.png".into()));
        page.finish_probe("https://x/b.png".into(), false);
        assert_eq!(page.qr, QrPreview::Broken("https://x/b.png".into()));
        assert!(page.start_probe().is_none());
    }

    #[test]
    fn invalid_rate_is_not_sent() {
        let mut page = SettingsPage::new();
        page.rate_input = "abc".into();
        assert!(page.start_save().is_none());
        assert!(page.notice.as_ref().is_some_and(Notice::is_error));
        assert!(!page.saving);

        page.rate_input = "25400".into();
        assert!(page.start_save().is_some());
        assert!(page.start_save().is_none());
    }

    #[test]
    fn required_fields() {
        assert!(SettingsField::BankName.is_required());
        assert!(SettingsField::UsdtRate.is_required());
        assert!(!SettingsField::QrImageUrl.is_required());
        assert!(!SettingsField::Note.is_required());
    }
}
