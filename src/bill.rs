//! `/c` orchestration: parse arguments, resolve the bank, compute the split,
//! reply with a QR image and clean up the command message.

use std::path::{Path, PathBuf};

use billqr_core::amount::{parse_amount, split_evenly};
use billqr_core::bank_directory::{BankDirectory, BankEntry};
use billqr_core::command::{parse_command, ParseDefaults, ParsedCommand};
use billqr_core::content::normalize_qr_content;
use billqr_core::markup::escape_markdown;
use billqr_core::qr::QrRequest;
use billqr_core::BillError;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::delivery::{
    cleanup_command_message, deliver, BillReply, DeliveryError, DeliveryStrategy, Markup,
    ReplySink, DELIVERY_STRATEGIES,
};

pub const HELP_TEXT: &str = "/c chia bill\n\
============\n\
Dung day du: \n\
/c [ma_ngan_hang] [stk] [so_tien] [so_nguoi] [noi_dung](khong bat buoc)\n\
Hoac: \n\
/c [ma_ngan_hang] [stk] [so_tien] [noi_dung](khong bat buoc) (mac dinh so nguoi = 1)\n\
============\n\
Mac dinh chuyen khoan cho tai khoan cau hinh san:\n\
/c [so_tien] [so_nguoi] [noi_dung](khong bat buoc)\n\
============\n\
Luu y: \n\
- Khong can nhap so nguoi neu so nguoi = 1\n\
- So tien co the viet 150000, 150,000 hoac 150k\n\
Neu muon QR co noi dung mac dinh cua ngan hang:\n\
vi du: Nguyen Van A chuyen tien\n\
thi khong can nhap noi dung chuyen khoan\n";

const USAGE_TEXT: &str = "Dung lenh day du: \n\
/c [ma_ngan_hang] stk [so_tien] [so_nguoi] [noi_dung]\n\
Hoac chuyen cho tai khoan mac dinh: \n\
/c [so_tien] [so_nguoi] [noi_dung]\n\
Mac dinh: \n\
- khong can nhap so_nguoi neu so nguoi = 1\n\
Neu muon QR co noi dung mac dinh cua ngan hang:\n\
vi du: Nguyen Van A chuyen tien\n\
thi khong can nhap noi dung chuyen khoan\n";

const BANK_FORM_USAGE_TEXT: &str = "Dung: /c ma_ngan_hang stk so_tien [so_nguoi] [noi_dung]";
const INVALID_AMOUNT_TEXT: &str = "So tien va so nguoi phai la so nguyen duong.";
const NO_CONTENT_DISPLAY: &str = "(khong co)";

/// Everything `/c` needs from configuration.
#[derive(Debug, Clone)]
pub struct BillSettings {
    pub defaults: ParseDefaults,
    pub bank_data_file: PathBuf,
    pub qr_base_url: String,
    pub qr_template: String,
    pub content_limit: usize,
}

impl From<&Config> for BillSettings {
    fn from(config: &Config) -> Self {
        Self {
            defaults: config.parse_defaults(),
            bank_data_file: config.bank_data_path(),
            qr_base_url: config.qr_base_url.clone(),
            qr_template: config.qr_template.clone(),
            content_limit: config.content_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillStage {
    AwaitingArgs,
    Parsing,
    Resolving,
    Computing,
    Responding,
    Done,
    Failed(BillError),
}

struct BillRun {
    stage: BillStage,
}

impl BillRun {
    fn new() -> Self {
        Self {
            stage: BillStage::AwaitingArgs,
        }
    }

    fn enter(&mut self, next: BillStage) {
        debug!("Bill stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// Figures shown in the confirmation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillSummary {
    pub bank_display: String,
    pub account: String,
    pub total: u64,
    pub people: u64,
    /// `total / people`, rounded down.
    pub per_person: u64,
    /// Content as typed, before QR folding.
    pub content: String,
}

impl BillSummary {
    /// Legacy Markdown caption.
    pub fn caption(&self) -> String {
        let content = if self.content.is_empty() {
            NO_CONTENT_DISPLAY
        } else {
            &self.content
        };
        format!(
            "Thong tin chia bill:\n\
             Bank: {}\n\
             STK: `{}`\n\
             So tien: {}\n\
             So nguoi: {}\n\
             Moi nguoi: `{}`\n\
             Noi dung: {}",
            escape_markdown(&self.bank_display),
            escape_markdown(&self.account),
            self.total,
            self.people,
            self.per_person,
            escape_markdown(content)
        )
    }
}

/// User-facing text for a rejected command.
pub fn rejection_text(err: &BillError, settings: &BillSettings) -> String {
    match err {
        BillError::NoArguments => USAGE_TEXT.to_string(),
        BillError::IncompleteBankForm => BANK_FORM_USAGE_TEXT.to_string(),
        BillError::InvalidAmount => INVALID_AMOUNT_TEXT.to_string(),
        BillError::UnknownBank(key) => {
            let key = if key.is_empty() { "(chua cau hinh)" } else { key };
            format!(
                "Khong tim thay ngan hang: {}. Kiem tra {}.",
                key,
                settings.bank_data_file.display()
            )
        }
    }
}

/// Build the summary and QR reply for a parsed command and its bank.
pub fn compose_reply(
    parsed: &ParsedCommand,
    total: u64,
    bank: &BankEntry,
    settings: &BillSettings,
) -> (BillSummary, BillReply) {
    let per_person = split_evenly(total, parsed.people_count);
    let add_info = normalize_qr_content(&parsed.content, settings.content_limit);
    let qr_url = QrRequest::new(&bank.bin, &parsed.account, per_person, Some(add_info.as_str()))
        .to_url(&settings.qr_base_url, &settings.qr_template);
    let summary = BillSummary {
        bank_display: bank.display_code.clone(),
        account: parsed.account.clone(),
        total,
        people: parsed.people_count,
        per_person,
        content: parsed.content.clone(),
    };
    let reply = BillReply {
        qr_url,
        caption: summary.caption(),
    };
    (summary, reply)
}

/// Read the bank registry on the blocking pool. Read failures leave the
/// directory empty.
async fn load_directory(path: &Path) -> BankDirectory {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || BankDirectory::load(&owned)).await {
        Ok(Ok(directory)) => directory,
        Ok(Err(e)) => {
            warn!("Failed to read bank directory {}: {}", path.display(), e);
            BankDirectory::default()
        }
        Err(e) => {
            warn!("Bank directory load task failed: {}", e);
            BankDirectory::default()
        }
    }
}

async fn prepare(
    run: &mut BillRun,
    args: &[String],
    settings: &BillSettings,
) -> Result<BillReply, BillError> {
    run.enter(BillStage::Parsing);
    let parsed = parse_command(args, &settings.defaults)?;
    let total = parse_amount(&parsed.amount_expression).ok_or(BillError::InvalidAmount)?;

    run.enter(BillStage::Resolving);
    let directory = load_directory(&settings.bank_data_file).await;
    let bank = directory
        .get(&parsed.bank_key)
        .ok_or_else(|| BillError::UnknownBank(parsed.bank_key.clone()))?;

    run.enter(BillStage::Computing);
    let (summary, reply) = compose_reply(&parsed, total, bank, settings);
    info!(
        "Bill split: bank={} total={} people={} per_person={}",
        parsed.bank_key, summary.total, summary.people, summary.per_person
    );
    Ok(reply)
}

/// Result of one `/c` invocation that reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillOutcome {
    /// `Done` or `Failed`.
    pub stage: BillStage,
    /// Strategy that delivered the QR reply, if one was built.
    pub delivered_via: Option<DeliveryStrategy>,
}

/// Run `/c` end to end against `sink`.
///
/// Rejections are answered with guidance and reported as `Failed` in the
/// outcome. An `Err` means the chat transport could not deliver any reply.
/// The command message is deleted afterwards in every case, best effort.
pub async fn handle_split_command(
    sink: &dyn ReplySink,
    args: &[String],
    settings: &BillSettings,
) -> Result<BillOutcome, DeliveryError> {
    let mut run = BillRun::new();
    let result = match prepare(&mut run, args, settings).await {
        Ok(reply) => {
            run.enter(BillStage::Responding);
            deliver(sink, &reply, &DELIVERY_STRATEGIES)
                .await
                .map(|strategy| {
                    run.enter(BillStage::Done);
                    Some(strategy)
                })
        }
        Err(err) => {
            info!("Bill command rejected: {}", err);
            let sent = sink
                .send_text(&rejection_text(&err, settings), Markup::Plain)
                .await;
            run.enter(BillStage::Failed(err));
            sent.map(|()| None)
        }
    };

    cleanup_command_message(sink).await;

    result.map(|delivered_via| BillOutcome {
        stage: run.stage,
        delivered_via,
    })
}
