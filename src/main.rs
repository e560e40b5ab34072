//! Archive Forge - password recovery for encrypted archives
//!
//! Brute-force or dictionary attack against a password-protected ZIP archive,
//! with parallel workers, Ctrl-C handling and resumable checkpoints.

mod cli;

use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use archive_forge::attack::{LogProgress, ProgressSink};
use archive_forge::sink::ResultSink;
use archive_forge::{
    internal_error, sink, AttackResult, AttackState, ParallelAttack, Result, StopSignal, ZipOracle,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Args;

const EXIT_FOUND: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = archive_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(EXIT_ERROR);
    }

    let args = Args::parse();

    match run(args).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(EXIT_ERROR);
        }
    }
}

/// Main attack workflow, returns the process exit code
async fn run(args: Args) -> Result<i32> {
    let mode = args.mode()?;
    let config = args.attack_config();
    let state_path = args
        .state
        .clone()
        .unwrap_or_else(|| AttackState::default_path(&args.archive));

    println!("🔐 Archive Forge - password recovery");
    println!("═══════════════════════════════════════");

    let mut state = if args.resume {
        let mut state = AttackState::load(&state_path)?;
        state.ensure_matches(&args.archive, &mode)?;

        if state.completed {
            println!("✅ Attack {} already completed", state.attack_id);
            return match state.password.clone() {
                Some(password) => {
                    deliver(&args, AttackResult::Found(password))?;
                    Ok(EXIT_FOUND)
                }
                None => {
                    println!("❌ Password was not in the searched candidates");
                    Ok(EXIT_NOT_FOUND)
                }
            };
        }

        state.mark_resumed();
        println!(
            "🔄 Resuming {} at candidate {} ({} tried so far)",
            state.attack_id, state.position, state.attempts
        );
        state
    } else {
        AttackState::new(&args.archive, mode.clone())
    };

    let oracle = ZipOracle::open(&args.archive)?;
    let source = state.resume_source()?;
    let attack = ParallelAttack::from_config(&config);

    println!("📦 Archive: {} (entry '{}')", args.archive.display(), oracle.entry_name());
    println!("🎯 Mode: {}", mode);
    println!("🧵 Workers: {}", attack.workers());
    if let Some(timeout) = config.timeout {
        println!("⏱️  Time limit: {}s", timeout.as_secs());
    }
    println!();

    let stop = StopSignal::from_config(&config);
    let interrupt = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping workers");
            interrupt.cancel();
        }
    });

    let bar = if args.quiet {
        None
    } else {
        Some(spinner(state.attempts)?)
    };
    let progress: Arc<dyn ProgressSink> = match &bar {
        Some(bar) => Arc::new(bar.clone()),
        None => Arc::new(LogProgress),
    };

    let outcome = attack.run(source, oracle, progress, &stop).await;
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }
    let report = outcome?;

    state.record(&report);
    state.save(&state_path)?;
    tracing::debug!(path = %state_path.display(), position = state.position, "Checkpoint saved");

    let rate = report.attempts_per_second();
    match &report.result {
        AttackResult::Found(_) => {
            println!(
                "✅ Password found after {} attempts in {:.1?} ({:.0}/s)",
                state.attempts, report.elapsed, rate
            );
            deliver(&args, report.result.clone())?;
            Ok(EXIT_FOUND)
        }
        AttackResult::NotFound => match report.stopped() {
            Some(reason) => {
                println!(
                    "⏸️  Attack {} after {} attempts ({:.0}/s)",
                    reason, state.attempts, rate
                );
                print_resume_hint(&state_path);
                Ok(EXIT_NOT_FOUND)
            }
            None => {
                println!(
                    "❌ Password not found, {} candidates tried in {:.1?}",
                    state.attempts, report.elapsed
                );
                Ok(EXIT_NOT_FOUND)
            }
        },
    }
}

/// Hand a found password to the configured sink
fn deliver(args: &Args, result: AttackResult) -> Result<()> {
    let file = args.password_file.as_deref().filter(|p| !p.is_dir());
    let mut sink = sink::sink_for(args.password_file.as_deref());

    if file.is_none() {
        println!("🔑 Password:");
    }
    sink.deliver(&result)?;
    if let Some(path) = file {
        println!("💾 Password written to {}", path.display());
    }
    Ok(())
}

fn spinner(already_tried: u64) -> Result<ProgressBar> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} tried ({per_sec}) last: {msg}")
            .map_err(|e| internal_error!("Invalid progress template: {}", e))?,
    );
    bar.set_position(already_tried);
    bar.enable_steady_tick(Duration::from_millis(120));
    Ok(bar)
}

fn print_resume_hint(state_path: &Path) {
    println!("💡 Progress saved to {}", state_path.display());
    println!("💡 Continue with the same options plus --resume");
}
