mod cli;

use crate::cli::{Cli, Command};
use clap::Parser;
use linklet_core::{LinkRecord, ShortenerError, SystemClock};
use linklet_generator::RandomGenerator;
use linklet_shortener::stats::{clicks_by_source, validity_label};
use linklet_shortener::{CreateLink, LinkService, RedirectOutcome, ShortenerSettings};
use linklet_storage::FileBackend;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

type Service = LinkService<FileBackend, RandomGenerator, SystemClock>;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Cli::parse();

    linklet_telemetry::init(config.log_format.into())?;

    info!(
        data_dir = %config.data_dir.display(),
        storage_key = %config.storage_key,
        base_url = %config.base_url,
        "starting linklet"
    );

    let settings = ShortenerSettings::builder()
        .storage_key(config.storage_key)
        .base_url(config.base_url)
        .build();
    let service = LinkService::new(
        FileBackend::new(config.data_dir),
        RandomGenerator::new(),
        SystemClock,
        settings,
    );

    match run(&service, config.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            report(&service, &err);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(service: &Service, command: Command) -> Result<(), ShortenerError> {
    match command {
        Command::Shorten {
            url,
            code,
            validity,
        } => {
            let mut request = CreateLink::new(url).with_validity_minutes(validity);
            if let Some(code) = code {
                request = request.with_custom_code(code);
            }
            let record = service.shorten(request).await?;
            println!("{}", service.short_url(&record));
            println!("  id:      {}", record.id);
            println!("  expires: {}", record.expires_at);
        }
        Command::List => {
            let records = service.list().await?;
            if records.is_empty() {
                println!("no links");
            }
            for record in &records {
                print_record(service, record);
            }
        }
        Command::Stats => {
            let stats = service.stats().await?;
            println!("total links:   {}", stats.total_links);
            println!("active links:  {}", stats.active_links);
            println!("expired links: {}", stats.expired_links);
            println!("total clicks:  {}", stats.total_clicks);
            for record in service.list().await? {
                println!();
                print_record(service, &record);
                for (source, clicks) in clicks_by_source(&record) {
                    println!("    {source}: {clicks}");
                }
            }
        }
        Command::Open {
            code,
            source,
            delay_ms,
        } => {
            let pending = service.schedule_redirect_after(
                &code,
                source.as_deref(),
                Duration::from_millis(delay_ms),
            );
            eprintln!("redirecting in {delay_ms}ms, press ctrl-c to cancel");
            tokio::select! {
                outcome = pending.wait() => match outcome? {
                    RedirectOutcome::Resolved(record) => println!("{}", record.original_url),
                    RedirectOutcome::Cancelled => eprintln!("redirect cancelled"),
                },
                _ = tokio::signal::ctrl_c() => {
                    // Dropping the pending redirect cancels it.
                    warn!(code = %code, "redirect cancelled by user");
                    eprintln!("redirect cancelled");
                }
            }
        }
        Command::Delete { id } => match service.delete(&id).await? {
            Some(record) => println!("deleted {}", record.short_code),
            None => println!("no link with id {id}"),
        },
        Command::Reset => {
            service.reset().await?;
            println!("all links removed");
        }
    }
    Ok(())
}

fn print_record(service: &Service, record: &LinkRecord) {
    let status = if service.is_expired(record) {
        "expired"
    } else {
        "active"
    };
    println!("{} -> {}", service.short_url(record), record.original_url);
    println!(
        "  id: {}  status: {status}  clicks: {}  valid for: {}  expires: {}",
        record.id,
        record.click_count,
        validity_label(record.created_at, record.expires_at),
        record.expires_at
    );
}

fn report(service: &Service, err: &ShortenerError) {
    match err {
        ShortenerError::Validation(errors) => {
            for error in errors.iter() {
                eprintln!("{}: {}", error.field, error.message);
            }
        }
        ShortenerError::Expired(record) => {
            eprintln!("This URL has expired");
            eprintln!("  original: {}", record.original_url);
            eprintln!("  created:  {}", record.created_at);
            eprintln!("  expired:  {}", record.expires_at);
            eprintln!("  clicks:   {}", record.click_count);
            eprintln!("  short:    {}", service.short_url(record));
        }
        ShortenerError::NotFound(code) => eprintln!("URL not found: {code}"),
        ShortenerError::Storage(err) => eprintln!("storage error: {err}"),
    }
}
