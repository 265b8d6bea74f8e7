use clap::Subcommand;
use tomatick_core::clock::week_window;
use tomatick_core::storage::Database;
use tomatick_core::{Config, DailySummary, WeeklyReport};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's completed sessions
    Today {
        /// Print the raw aggregate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Completed sessions over the last 7 days
    Week {
        /// Print the raw aggregate as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let clock = config.wall_clock()?;

    match action {
        StatsAction::Today { json } => {
            let today = clock.today();
            let summary = DailySummary::from_rows(today, &db.daily_stats(today)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if summary.is_empty() {
                println!("no completed sessions today");
            } else {
                println!("{}", summary.date);
                println!(
                    "  work:   {} sessions, {} of focus",
                    summary.work.count,
                    summary.work.duration_display()
                );
                println!(
                    "  breaks: {} sessions, {} of rest",
                    summary.breaks.count,
                    summary.breaks.duration_display()
                );
            }
        }
        StatsAction::Week { json } => {
            let (start, end) = week_window(clock.today());
            let report = WeeklyReport::from_rows(start, end, &db.weekly_stats(start, end)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.is_empty() {
                println!("no completed sessions between {start} and {end}");
            } else {
                println!("{start} .. {end}");
                for day in &report.days {
                    println!(
                        "  {}  work {:>3}  breaks {:>3}",
                        day.date, day.work, day.breaks
                    );
                }
                println!("  total work sessions: {}", report.total_work());
            }
        }
    }
    Ok(())
}
