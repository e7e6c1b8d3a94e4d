use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};

use recordatorio::core::dates;
use recordatorio::core::Config;
use recordatorio::features::messaging::TwilioClient;
use recordatorio::features::pipeline::ReminderEngine;
use recordatorio::features::sheets::{GoogleSheetsClient, SpreadsheetStore};

/// Invocation modes. The external scheduler always runs the default full
/// pipeline; the other modes exist for operators.
enum Mode {
    Full,
    NotificationsOnly,
    RemindersOnly,
    ConnectivityTest,
    Diagnostic,
}

fn parse_mode() -> Mode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--test") {
        Mode::ConnectivityTest
    } else if args.iter().any(|a| a == "--notifications") {
        Mode::NotificationsOnly
    } else if args.iter().any(|a| a == "--reminders") {
        Mode::RemindersOnly
    } else if args.iter().any(|a| a == "--diagnostic") {
        Mode::Diagnostic
    } else {
        Mode::Full
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("recordatorio - speaker reminder system");
    info!(
        "today: {} | twilio mode: {} | window: {} days | cooldown: {} days",
        dates::to_storage_format(dates::today()),
        if config.twilio.use_templates {
            "templates (sandbox)"
        } else {
            "free text (production)"
        },
        config.business.reminder_days_limit,
        config.business.cooldown_days
    );

    let sheets = GoogleSheetsClient::new(config.sheets.clone());
    let twilio = TwilioClient::new(config.twilio.clone());

    match parse_mode() {
        Mode::Full => {
            let engine = ReminderEngine::new(sheets, twilio, config);
            let stats = engine.execute_full_run().await?;
            info!(
                "finished: {} messages sent to {} users",
                stats.total_messages, stats.unique_users
            );
        }
        Mode::NotificationsOnly => {
            info!("running initial notifications only");
            let engine = ReminderEngine::new(sheets, twilio, config);
            let stats = engine.execute_notifications_only().await?;
            info!("finished: {} notifications sent", stats.notifications);
        }
        Mode::RemindersOnly => {
            info!("running reminders only");
            let engine = ReminderEngine::new(sheets, twilio, config);
            let stats = engine.execute_reminders_only().await?;
            info!(
                "finished: {} reminders sent",
                stats.reminders + stats.today_reminders
            );
        }
        Mode::ConnectivityTest => {
            run_connectivity_test(&sheets, &twilio).await;
        }
        Mode::Diagnostic => {
            run_diagnostic(&sheets, &twilio, &config).await?;
        }
    }

    Ok(())
}

/// Probe both collaborators and report per-service results.
async fn run_connectivity_test(sheets: &GoogleSheetsClient, twilio: &TwilioClient) {
    info!("testing service connectivity...");

    println!("\nCONNECTIVITY RESULTS");
    println!("====================");

    match sheets.read_rows().await {
        Ok(rows) => println!("Google Sheets: OK ({} records)", rows.len()),
        Err(e) => {
            error!("Google Sheets connection failed: {e}");
            println!("Google Sheets: FAILED - {e}");
        }
    }

    let probe = twilio.test_connection().await;
    if probe.success {
        println!(
            "Twilio: OK ({})",
            probe.account_name.as_deref().unwrap_or("unnamed account")
        );
    } else {
        let reason = probe.error.as_deref().unwrap_or("unknown error");
        error!("Twilio connection failed: {reason}");
        println!("Twilio: FAILED - {reason}");
    }
}

/// Dump a pretty JSON diagnostic document for all services.
async fn run_diagnostic(
    sheets: &GoogleSheetsClient,
    twilio: &TwilioClient,
    config: &Config,
) -> Result<()> {
    info!("collecting diagnostic information...");

    let info = serde_json::json!({
        "config": {
            "business": config.business,
            "environment": std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        },
        "google_sheets": sheets.diagnostic_info().await,
        "messaging": twilio.diagnostic_info(),
        "current_date": dates::to_storage_format(dates::today()),
    });

    println!("\nDIAGNOSTIC INFORMATION");
    println!("======================");
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
