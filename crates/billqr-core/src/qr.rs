//! VietQR image URL construction.
//!
//! The URL is a pure function of its inputs, so identical requests hit the
//! same cached image downstream.

pub const DEFAULT_QR_BASE_URL: &str = "https://img.vietqr.io/image";
pub const DEFAULT_QR_TEMPLATE: &str = "compact2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRequest {
    pub bin: String,
    pub account: String,
    pub amount: u64,
    /// Normalized transfer content. `None` or empty omits `addInfo`.
    pub add_info: Option<String>,
}

impl QrRequest {
    pub fn new(bin: &str, account: &str, amount: u64, add_info: Option<&str>) -> Self {
        Self {
            bin: bin.to_string(),
            account: account.to_string(),
            amount,
            add_info: add_info.filter(|s| !s.is_empty()).map(str::to_string),
        }
    }

    /// Render against an image service base URL and template name.
    pub fn to_url(&self, base_url: &str, template: &str) -> String {
        let mut url = format!(
            "{}/{}-{}-{}.png?amount={}",
            base_url.trim_end_matches('/'),
            self.bin,
            self.account,
            template,
            self.amount
        );
        if let Some(info) = self.add_info.as_deref().filter(|s| !s.is_empty()) {
            url.push_str("&addInfo=");
            url.push_str(&urlencoding::encode(info));
        }
        url
    }
}

/// Build a QR URL against the public VietQR service.
pub fn build_qr_url(bin: &str, account: &str, amount: u64, add_info: Option<&str>) -> String {
    QrRequest::new(bin, account, amount, add_info).to_url(DEFAULT_QR_BASE_URL, DEFAULT_QR_TEMPLATE)
}
