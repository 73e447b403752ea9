use chrono::Local;
use clap::Subcommand;
use serde::Serialize;
use studyroom_core::{
    format_minutes, Config, CountersFile, Event, FocusController, TimerEngine, TokioTicker,
};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run one focus session in the foreground (Ctrl-C resets and exits)
    Run {
        /// Session length in minutes [default: pomodoro.focus_duration]
        #[arg(long, conflicts_with = "seconds")]
        minutes: Option<u32>,
        /// Session length in seconds, for short trial runs
        #[arg(long)]
        seconds: Option<u32>,
    },
    /// Print today's focus counters as JSON
    Status,
}

#[derive(Serialize)]
struct CountersStatus {
    completed_sessions: u32,
    focused_minutes_today: u32,
    focused_today: String,
    daily_session_goal: u32,
    daily_goal_progress: u8,
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let counters_file = CountersFile::open()?;

    match action {
        TimerAction::Run { minutes, seconds } => {
            let secs = match (seconds, minutes) {
                (Some(secs), _) => secs,
                (None, Some(min)) => min.saturating_mul(60),
                (None, None) => config.focus_duration_secs(),
            };
            let engine = TimerEngine::new(secs)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_session(engine, &counters_file))?;
        }
        TimerAction::Status => {
            let counters = counters_file.load(Local::now().date_naive());
            let goal = config.pomodoro.daily_session_goal;
            let status = CountersStatus {
                completed_sessions: counters.completed_sessions(),
                focused_minutes_today: counters.focused_minutes_today(),
                focused_today: format_minutes(counters.focused_minutes_today()),
                daily_session_goal: goal,
                daily_goal_progress: counters
                    .daily_goal_progress(goal, config.pomodoro.focus_duration),
            };
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

async fn run_session(
    engine: TimerEngine,
    counters_file: &CountersFile,
) -> Result<(), Box<dyn std::error::Error>> {
    let counters = counters_file.load(Local::now().date_naive());
    let (ticker, mut ticks) = TokioTicker::per_second();
    let mut controller = FocusController::new(engine, counters, ticker);

    let started = controller.start().ok_or("timer is already running")?;
    print_event(&started)?;

    loop {
        tokio::select! {
            token = ticks.recv() => {
                let Some(token) = token else { break };
                if let Some(event) = controller.on_tick(token) {
                    print_event(&event)?;
                    break;
                }
                if controller.engine().remaining_secs() % 60 == 0 {
                    print_event(&controller.engine().snapshot())?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                if let Some(event) = controller.reset() {
                    print_event(&event)?;
                }
                break;
            }
        }
    }

    counters_file.save(&controller.into_counters())?;
    Ok(())
}
