use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ramadan_times::{
    AladhanClient, Clock, Location, MealCountdown, StatusSummary, SystemClock,
    build_ramadan_calendar, calendar_subtitle,
    config::AppConfig,
    format::{HourCycle, TimeFormat, detect_system_24_hour, format_time},
    hijri::RAMADAN_MONTH,
    ramadan_hijri_year, status_message,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "ramadan-times")]
#[command(about = "Suhoor and Iftar times, fasting status and the Ramadan calendar")]
struct Args {
    /// Hijri date offset in days (overrides configuration)
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i32>,

    /// Time display format: system, 12hr or 24hr (overrides configuration)
    #[arg(long)]
    time_format: Option<TimeFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Today's Suhoor time and countdown
    Suhoor,
    /// Today's Iftar time and countdown
    Iftar,
    /// The full Ramadan calendar
    Calendar,
    /// Fasting status and Hijri date at a glance
    Status,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .parse_lossy(std::env::var("RUST_LOG").unwrap_or_else(|_| "ramadan_times=info".into()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let offset = args.offset.unwrap_or(config.hijri.date_offset);
    let cycle = args
        .time_format
        .unwrap_or(config.display.time_format)
        .hour_cycle(detect_system_24_hour());

    let location = Location::new(&config.location.city, &config.location.country)?;
    let client = AladhanClient::new(
        config.api.base_url.clone(),
        location,
        config.location.method,
        &config.network,
    )?;
    tracing::debug!(
        "Using {}, {} (method {}, offset {})",
        client.location().city,
        client.location().country,
        client.method(),
        offset
    );

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let clock = SystemClock;

    rt.block_on(async {
        match args.command {
            Command::Suhoor => run_meal(&client, &clock, cycle, Meal::Suhoor).await,
            Command::Iftar => run_meal(&client, &clock, cycle, Meal::Iftar).await,
            Command::Calendar => run_calendar(&client, &clock, cycle, offset).await,
            Command::Status => run_status(&client, &clock, cycle, offset).await,
        }
    })
}

#[derive(Debug, Clone, Copy)]
enum Meal {
    Suhoor,
    Iftar,
}

/// Print one meal time with its countdown.
async fn run_meal(
    client: &AladhanClient,
    clock: &impl Clock,
    cycle: HourCycle,
    meal: Meal,
) -> Result<()> {
    let day = client
        .timings_by_date(clock.today())
        .await
        .context("Failed to load today's prayer times")?;

    let (label, time) = match meal {
        Meal::Suhoor => ("Suhoor", day.timings.suhoor()?),
        Meal::Iftar => ("Iftar", day.timings.iftar()?),
    };
    let meal = MealCountdown::new(clock.now(), time);

    let shown = if meal.is_tomorrow {
        format!("{} (tomorrow)", format_time(meal.time, cycle))
    } else {
        format_time(meal.time, cycle)
    };
    println!("{:<10} {}", label, shown);
    println!("{:<10} in {}", "Countdown", meal.countdown);
    Ok(())
}

/// Print the Ramadan calendar for the current or next Ramadan.
async fn run_calendar(
    client: &AladhanClient,
    clock: &impl Clock,
    cycle: HourCycle,
    offset: i32,
) -> Result<()> {
    let today = clock.today();
    let current = client
        .gregorian_to_hijri(today)
        .await
        .context("Failed to determine today's Hijri date")?
        .adjusted(offset);
    let year = ramadan_hijri_year(&current);
    tracing::info!("Loading Ramadan {} calendar", year);

    let entries = client
        .hijri_calendar(RAMADAN_MONTH, year)
        .await
        .context("Failed to load Ramadan calendar")?;
    let days = build_ramadan_calendar(client, &entries, year, offset, today).await?;

    println!("Ramadan {} Calendar ({})", year, calendar_subtitle(&days, year));
    for day in &days {
        println!(
            "{} {:>2} Ramadan  {}  Suhoor {:>8}  Iftar {:>8}",
            if day.is_today { "*" } else { " " },
            day.day_number,
            day.gregorian_label(),
            format_time(day.suhoor, cycle),
            format_time(day.iftar, cycle),
        );
    }
    Ok(())
}

/// Print the at-a-glance fasting status.
async fn run_status(
    client: &AladhanClient,
    clock: &impl Clock,
    cycle: HourCycle,
    offset: i32,
) -> Result<()> {
    let now = clock.now();
    let day = client
        .timings_by_date(now.date())
        .await
        .context("Failed to load today's prayer times")?;
    let summary = StatusSummary::from_day(&day, offset)?;

    let title = summary.title(now);
    if !title.is_empty() {
        println!("{} {}", summary.progress(now).glyph(), title);
    }

    if let Some(headline) = summary.headline(now) {
        println!("{}", headline);
        println!("  {}", status_message(now, summary.suhoor, summary.iftar));
        println!("  Suhoor  {}", format_time(summary.suhoor, cycle));
        println!("  Iftar   {}", format_time(summary.iftar, cycle));
    } else if let Some(days) = summary.days_until_ramadan {
        println!("{} days until Ramadan (estimate)", days);
    }

    println!("{} ({})", summary.hijri_label(), summary.gregorian_readable);
    Ok(())
}
