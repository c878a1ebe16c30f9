use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use workout_core::store::records_for_user;
use workout_core::*;

#[derive(Parser)]
#[command(name = "repday")]
#[command(about = "Workout program scheduler and streak tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the user whose program and history are used
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's workout and the current streak (default)
    Today {
        /// Date to resolve instead of today (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print the current completion streak
    Streak {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show the workouts for the seven days starting at a date
    Plan {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Edit the workout program
    Program {
        #[command(subcommand)]
        action: ProgramAction,
    },

    /// Perform a workout and log it when finished
    Start {
        /// Day to perform (defaults to the day scheduled for the date)
        day_id: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        /// Auto-complete (for testing) - complete every set and skip rests
        #[arg(long)]
        auto_complete: bool,
    },

    /// Log a rest day
    Rest {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Export completion history to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ProgramAction {
    /// List all days and their exercises
    Show,

    /// Add a workout day
    AddDay {
        #[arg(long)]
        name: String,

        /// Weekday for a weekly day (0 = Sunday .. 6 = Saturday)
        #[arg(long, conflicts_with = "rotation", required_unless_present = "rotation")]
        weekday: Option<u8>,

        /// Append the day to the rotation instead
        #[arg(long)]
        rotation: bool,
    },

    /// Remove a workout day
    RemoveDay { day_id: String },

    /// Add an exercise to a day
    AddExercise {
        #[arg(long)]
        day: String,

        #[arg(long)]
        name: String,

        /// push, pull, legs or other
        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        sets: Option<u32>,

        #[arg(long)]
        reps: Option<String>,

        #[arg(long)]
        weight: Option<f64>,

        /// Reference to a demo video
        #[arg(long)]
        video: Option<String>,
    },

    /// Remove an exercise from a day
    RemoveExercise {
        #[arg(long)]
        day: String,

        exercise_id: String,
    },

    /// Report data-integrity problems in the program
    Check,
}

/// Paths and identity shared by all commands
struct Context {
    config: Config,
    user_id: String,
}

impl Context {
    fn programs(&self) -> JsonProgramStore {
        JsonProgramStore::new(self.config.programs_dir())
    }

    fn records(&self) -> Result<Vec<WorkoutCompletionRecord>> {
        records_for_user(&self.config.records_path(), &self.user_id)
    }

    fn record_log(&self) -> JsonlRecordLog {
        JsonlRecordLog::new(self.config.records_path())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    workout_core::logging::init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    let user_id = cli.user.unwrap_or_else(|| config.user.id.clone());
    tracing::debug!(
        "Using data dir {:?} for user {}",
        config.data.data_dir,
        user_id
    );
    let ctx = Context { config, user_id };

    match cli.command {
        Some(Commands::Today { date }) => cmd_today(&ctx, date.unwrap_or_else(local_today)),
        Some(Commands::Streak { date }) => cmd_streak(&ctx, date.unwrap_or_else(local_today)),
        Some(Commands::Plan { date }) => cmd_plan(&ctx, date.unwrap_or_else(local_today)),
        Some(Commands::Program { action }) => cmd_program(&ctx, action),
        Some(Commands::Start {
            day_id,
            date,
            auto_complete,
        }) => cmd_start(&ctx, day_id, date.unwrap_or_else(local_today), auto_complete),
        Some(Commands::Rest { date }) => cmd_rest(&ctx, date.unwrap_or_else(local_today)),
        Some(Commands::Export { out }) => cmd_export(&ctx, &out),
        None => {
            // Default to "today" command
            cmd_today(&ctx, local_today())
        }
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn cmd_today(ctx: &Context, date: NaiveDate) -> Result<()> {
    let program = ctx.programs().load_program(&ctx.user_id)?;
    let streak = compute_streak(&ctx.records()?, date);

    println!();
    println!("  {}", date.format("%A, %B %-d"));
    println!("  🔥 {} Day Streak!", streak);
    println!();

    match program.as_ref().and_then(|p| resolve_todays_workout(p, date)) {
        Some(day) => {
            println!("  Today's Workout: {}", day.name);
            for exercise in &day.exercises {
                println!("    • {}", exercise.name);
            }
            println!();
            println!("  Start with: repday start {}", day.id);
        }
        None => {
            println!("  Rest Day");
            println!("  Take it easy and recover!");
        }
    }

    println!();
    Ok(())
}

fn cmd_streak(ctx: &Context, date: NaiveDate) -> Result<()> {
    let streak = compute_streak(&ctx.records()?, date);
    println!("{} day streak", streak);
    Ok(())
}

fn cmd_plan(ctx: &Context, date: NaiveDate) -> Result<()> {
    let program = ctx
        .programs()
        .load_program(&ctx.user_id)?
        .unwrap_or_else(|| WorkoutProgram::new(ctx.user_id.as_str()));

    for (day_date, day) in week_plan(&program, date) {
        let label = day.map_or("Rest", |d| d.name.as_str());
        println!("{}  {:<9}  {}", day_date, day_date.format("%A"), label);
    }
    Ok(())
}

fn schedule_label(day: &WorkoutDay) -> String {
    match day.schedule() {
        Some(Schedule::Weekly(week_day)) => {
            format!("Every {}", weekday_name(week_day).unwrap_or("?"))
        }
        Some(Schedule::Rotation(order)) => format!("Rotation #{}", u64::from(order) + 1),
        None => "Unscheduled (inconsistent fields)".into(),
    }
}

fn cmd_program(ctx: &Context, action: ProgramAction) -> Result<()> {
    let mut store = ctx.programs();
    let mut program = store.load_or_create(&ctx.user_id)?;

    match action {
        ProgramAction::Show => {
            if program.days.is_empty() {
                println!("No workout days yet. Add one with: repday program add-day");
            }
            for day in &program.days {
                println!("{}  [{}]  {}", day.name, schedule_label(day), day.id);
                for exercise in &day.exercises {
                    println!(
                        "    • {} ({}): {} x {} @ {}  {}",
                        exercise.name,
                        exercise.kind.as_str(),
                        exercise.sets,
                        exercise.reps,
                        exercise.weight,
                        exercise.id
                    );
                }
            }
            return Ok(());
        }

        ProgramAction::Check => {
            let errors = program.validate();
            if errors.is_empty() {
                println!("✓ Program is consistent");
                return Ok(());
            }
            eprintln!("Program validation errors:");
            for error in &errors {
                eprintln!("  - {}", error);
            }
            return Err(Error::Other(format!("{} problem(s) found", errors.len())));
        }

        ProgramAction::AddDay {
            name,
            weekday,
            rotation,
        } => {
            let id = match weekday {
                Some(week_day) if !rotation => program.add_weekly_day(&name, week_day)?,
                _ => program.add_rotation_day(&name),
            };
            println!("✓ Added day {} ({})", name, id);
        }

        ProgramAction::RemoveDay { day_id } => {
            let removed = program.remove_day(&day_id)?;
            println!("✓ Removed day {}", removed.name);
        }

        ProgramAction::AddExercise {
            day,
            name,
            kind,
            sets,
            reps,
            weight,
            video,
        } => {
            let new = NewExercise {
                name: name.clone(),
                kind: kind.as_deref().map(ExerciseKind::parse),
                sets,
                reps,
                weight,
                video_uri: video,
            };
            let id = program.add_exercise(&day, new)?;
            println!("✓ Added exercise {} ({})", name, id);
        }

        ProgramAction::RemoveExercise { day, exercise_id } => {
            let removed = program.remove_exercise(&day, &exercise_id)?;
            println!("✓ Removed exercise {}", removed.name);
        }
    }

    // Every edit rewrites the whole document
    store.save_program(&program)?;
    Ok(())
}

fn cmd_start(
    ctx: &Context,
    day_id: Option<String>,
    date: NaiveDate,
    auto_complete: bool,
) -> Result<()> {
    let program = ctx
        .programs()
        .load_program(&ctx.user_id)?
        .ok_or_else(|| Error::NotFound(format!("program for {}", ctx.user_id)))?;

    let day = match day_id {
        Some(ref id) => program
            .day(id)
            .ok_or_else(|| Error::NotFound(format!("workout day {}", id)))?,
        None => match resolve_todays_workout(&program, date) {
            Some(day) => day,
            None => {
                println!("Rest day - nothing scheduled for {}", date);
                return Ok(());
            }
        },
    };

    let mut session = WorkoutSession::start(day, ctx.config.session.rest_duration())?;
    println!("\n{}\n", session.day_name());

    while !session.is_finished() {
        match session.phase().clone() {
            SessionPhase::Active { set, .. } => {
                if let Some(exercise) = session.current_exercise() {
                    println!(
                        "  {}: set {}/{}, {} reps @ {}",
                        exercise.name,
                        set + 1,
                        exercise.sets,
                        exercise.reps,
                        exercise.weight
                    );
                }

                let action = if auto_complete {
                    SetAction::Done
                } else {
                    prompt_set_action()?
                };

                match action {
                    SetAction::Done => session.complete_set()?,
                    SetAction::Stop => break,
                }
            }

            SessionPhase::Resting { timer, .. } => {
                if auto_complete {
                    session.skip_rest()?;
                } else if !rest_interactively(&mut session, timer.remaining())? {
                    break;
                }
            }

            SessionPhase::Finished | SessionPhase::Stopped => break,
        }
    }

    if !session.is_finished() {
        session.stop();
        println!("\nWorkout stopped - nothing logged.");
        return Ok(());
    }

    let record = session.completion_record(&ctx.user_id, date)?;
    ctx.record_log().append(&record)?;

    let streak = compute_streak(&ctx.records()?, date);
    println!("\n✓ Workout logged! {} day streak", streak);
    Ok(())
}

fn cmd_rest(ctx: &Context, date: NaiveDate) -> Result<()> {
    let record = WorkoutCompletionRecord::rest_day(ctx.user_id.as_str(), date);
    ctx.record_log().append(&record)?;

    let streak = compute_streak(&ctx.records()?, date);
    println!("✓ Rest day logged for {}. {} day streak", date, streak);
    Ok(())
}

fn cmd_export(ctx: &Context, out: &std::path::Path) -> Result<()> {
    let records = ctx.records()?;
    let count = export_records(&records, out)?;
    println!("✓ Exported {} records", count);
    println!("  CSV: {}", out.display());
    Ok(())
}

enum SetAction {
    Done,
    Stop,
}

enum RestAction {
    Skip,
    Wait,
    Stop,
}

/// Read one line of input; None once stdin is closed
fn read_input() -> Result<Option<String>> {
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_lowercase()))
}

fn prompt_set_action() -> Result<SetAction> {
    print!("  Enter when the set is done, 'q' + Enter to stop > ");

    let action = match read_input()?.as_deref() {
        None | Some("q") => SetAction::Stop,
        Some(_) => SetAction::Done,
    };

    Ok(action)
}

fn prompt_rest_action(remaining: Duration) -> Result<RestAction> {
    print!(
        "  Rest {}s - 's' or Enter to skip, 'w' to wait it out, 'q' to stop > ",
        remaining.as_secs()
    );

    let action = match read_input()?.as_deref() {
        None | Some("q") => RestAction::Stop,
        Some("w") => RestAction::Wait,
        Some(_) => RestAction::Skip,
    };

    Ok(action)
}

/// Run one rest period; returns false when the user stops the workout
fn rest_interactively(session: &mut WorkoutSession, remaining: Duration) -> Result<bool> {
    match prompt_rest_action(remaining)? {
        RestAction::Stop => return Ok(false),
        RestAction::Skip => session.skip_rest()?,
        RestAction::Wait => {
            let step = Duration::from_secs(1);
            while matches!(session.phase(), SessionPhase::Resting { .. }) {
                std::thread::sleep(step);
                if let SessionPhase::Resting { timer, .. } = session.tick(step) {
                    print!("\r  Rest {:>3}s ", timer.remaining().as_secs());
                    io::stdout().flush()?;
                }
            }
            println!();
        }
    }

    Ok(true)
}
