use billqr::config::Config;
use billqr::error::BillQrError;
use billqr::{channels::telegram, logging};
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!(
        r#"billqr v{VERSION} - Telegram bill splitter with VietQR payment codes

USAGE:
    billqr <COMMAND>

COMMANDS:
    start       Start the bot (long polling)
    version     Show version information
    help        Show this help message

CHAT COMMANDS:
    /c [bank] [account] <amount> [people] [content]
                Split a bill and reply with a QR code
    /help       Show usage in chat

CONFIG:
    Environment (or a .env file in the working directory):
      TELEGRAM_BOT_TOKEN    Bot token from @BotFather (required)
      DEFAULT_STK           Account used by `/c <amount> ...`
      DEFAULT_BANK          Bank key used by `/c <amount> ...`
      BILLQR_BANK_FILE      Bank registry path (default: data.txt)

    Optional billqr.config.yaml (override path with BILLQR_CONFIG):
      telegram_bot_token, default_account, default_bank, bank_data_file,
      qr_base_url, qr_template, content_limit
    Environment values take precedence over the YAML file.

BANK REGISTRY (data.txt):
    One bank per line: key,bin[,display_code]
    Lines without commas are split like a shell command line."#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str());

    match command {
        Some("start") => {}
        Some("version" | "--version" | "-V") => {
            println!("billqr {VERSION}");
            return Ok(());
        }
        Some("help" | "--help" | "-h") | None => {
            print_help();
            return Ok(());
        }
        Some(unknown) => {
            eprintln!("Unknown command: {unknown}\n");
            print_help();
            std::process::exit(1);
        }
    }

    logging::init_console_logging();

    let config = match Config::load() {
        Ok(c) => c,
        Err(BillQrError::Config(e)) => {
            eprintln!("Config missing/invalid: {e}");
            eprintln!("Set TELEGRAM_BOT_TOKEN or create billqr.config.yaml");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Starting billqr (bank registry: {}, default bank: {})",
        config.bank_data_file,
        config.default_bank.as_deref().unwrap_or("none")
    );

    telegram::run_bot(config).await?;

    Ok(())
}
