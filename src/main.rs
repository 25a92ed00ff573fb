//! OmniGuard CLI - demo driver around the surveillance core
//!
//! Usage:
//!   omniguard                          # Interactive face-mode session
//!   omniguard --mode motion            # Interactive motion-mode session
//!   omniguard --script samples.txt     # Replay a sample script at tick cadence
//!   omniguard --json                   # JSON output per tick
//!
//! Interactive commands:
//!   faces N [seed]     one face-mode tick (seed adds a demo embedding)
//!   motion X           one motion-mode tick
//!   pin DIGITS         submit a PIN (demo PIN: 1234)
//!   lock               emergency lock
//!   sensitivity N      adjust sensitivity (1-10)
//!   autolock on|off    toggle auto-lock
//!   enroll NAME SEED   enroll a demo identity
//!   delete NAME        remove an identity
//!   users              list enrolled identities
//!   status             show session status
//!   quit               exit

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tokio::sync::{Mutex, RwLock};

use omniguard::core::{
    load_or_empty, run_session, DriverConfig, EventSink, GalleryStore, JsonGalleryStore,
    MemorySink, ScriptedSource, SurveillanceSession, TerminalSink, TickOutcome,
};
use omniguard::types::{
    AccessError, CredentialOutcome, DetectionMode, Embedding, GateState, Sample, SecuritySettings,
};
use omniguard::{EMBEDDING_DIM, PIN_MAX_LEN, PIN_MIN_LEN, VERSION};

/// Demo PIN for the interactive keypad
const DEMO_PIN: &str = "1234";

#[derive(Parser, Debug)]
#[command(
    name = "omniguard",
    version = VERSION,
    about = "OmniGuard - surveillance-gated PIN access demo",
    long_about = "Feeds face-count or motion samples into the OmniGuard core and\n\
                  shows the debounced verdict and gate state per tick.\n\n\
                  The gate starts LOCKED and opens only after a safe category\n\
                  persists for its full stability window. PIN submission is\n\
                  blocked while the gate is locked."
)]
struct Args {
    /// Detection mode: face or motion
    #[arg(short, long, default_value = "face")]
    mode: Mode,

    /// Detection sensitivity, 1-10
    #[arg(short, long, default_value_t = 5)]
    sensitivity: u8,

    /// Disable automatic locking on unsafe verdicts
    #[arg(long)]
    no_auto_lock: bool,

    /// Replay a sample script (one `faces N` / `motion X` line per tick)
    /// through the async driver at the mode's tick cadence
    #[arg(long)]
    script: Option<String>,

    /// Gallery file for enrollments (default: ./omniguard_gallery.json)
    #[arg(long, default_value = "./omniguard_gallery.json")]
    gallery: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Mode {
    Face,
    Motion,
}

impl From<Mode> for DetectionMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Face => DetectionMode::Face,
            Mode::Motion => DetectionMode::Motion,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Some(ref script) = args.script {
        run_script(script, &args).await;
    } else {
        run_interactive(&args);
    }
}

fn build_session(args: &Args, sink: Arc<dyn EventSink>) -> SurveillanceSession {
    let settings = SecuritySettings::new(args.sensitivity, !args.no_auto_lock);
    let store = JsonGalleryStore::new(&args.gallery);
    let gallery = load_or_empty(&store, sink.as_ref());
    SurveillanceSession::new(args.mode.into(), settings, sink).with_gallery(gallery)
}

/// Interactive mode: each sample command is one tick
fn run_interactive(args: &Args) {
    let sink: Arc<dyn EventSink> = Arc::new(TerminalSink::new(args.no_color));
    let mut session = build_session(args, sink);
    let store = JsonGalleryStore::new(&args.gallery);

    print_header(args);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(&session, args.no_color));
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            println!(
                "\nSession ended. Ticks: {} | Events: {} | Threats: {}",
                session.tracker().tick_count(),
                session.event_count(),
                session.threat_count()
            );
            break;
        }
        if line.is_empty() {
            continue;
        }
        handle_command(line, &mut session, &store, args);
    }
}

fn handle_command(
    line: &str,
    session: &mut SurveillanceSession,
    store: &JsonGalleryStore,
    args: &Args,
) {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let rest: Vec<&str> = parts.collect();

    match command.as_str() {
        "faces" | "motion" => match parse_sample(&command, &rest) {
            Ok(sample) => {
                if sample.mode() != session.mode() {
                    warn(args, &format!("session is in {} mode", session.mode()));
                    return;
                }
                let outcome = session.tick(&sample);
                session.annotate_now(&sample, &outcome);
                print_tick(session, &outcome, args);
            }
            Err(msg) => warn(args, &msg),
        },
        "pin" => submit_pin(rest.first().copied().unwrap_or_default(), session, args),
        "lock" => {
            session.lock_manually();
        }
        "sensitivity" => match rest.first().and_then(|v| v.parse::<u8>().ok()) {
            Some(s) => {
                let mut settings = *session.settings();
                settings.set_sensitivity(s);
                session.apply_settings(settings);
                println!("sensitivity={}", settings.sensitivity);
            }
            None => warn(args, "usage: sensitivity N"),
        },
        "autolock" => match rest.first().copied() {
            Some("on") | Some("off") => {
                let mut settings = *session.settings();
                settings.auto_lock = rest[0] == "on";
                session.apply_settings(settings);
                println!("auto_lock={}", settings.auto_lock);
            }
            _ => warn(args, "usage: autolock on|off"),
        },
        "enroll" => match (rest.first(), rest.get(1).and_then(|s| s.parse::<u64>().ok())) {
            (Some(name), Some(seed)) => {
                if let Err(e) = session.enroll(name, demo_embedding(seed)) {
                    warn(args, &e.to_string());
                } else if let Err(e) = store.save(session.gallery()) {
                    warn(args, &format!("gallery save failed: {}", e));
                }
            }
            _ => warn(args, "usage: enroll NAME SEED"),
        },
        "delete" => match rest.first() {
            Some(name) => {
                if session.remove_user(name) {
                    if let Err(e) = store.save(session.gallery()) {
                        warn(args, &format!("gallery save failed: {}", e));
                    }
                } else {
                    warn(args, &format!("no such user: {}", name));
                }
            }
            None => warn(args, "usage: delete NAME"),
        },
        "users" => {
            for identity in session.gallery().identities() {
                println!(
                    "{} ({} embedding(s))",
                    identity.label,
                    identity.embeddings.len()
                );
            }
            println!("{} enrolled user(s)", session.gallery().len());
        }
        "status" => print_status(session, args),
        _ => warn(args, "commands: faces, motion, pin, lock, sensitivity, autolock, enroll, delete, users, status, quit"),
    }
}

fn parse_sample(command: &str, rest: &[&str]) -> Result<Sample, String> {
    match command {
        "faces" => {
            let count: usize = rest
                .first()
                .and_then(|v| v.parse().ok())
                .ok_or("usage: faces N [seed]")?;
            let embedding = rest.get(1).and_then(|s| s.parse::<u64>().ok()).map(demo_embedding);
            Ok(Sample::Face { count, embedding })
        }
        "motion" => {
            let intensity: f64 = rest
                .first()
                .and_then(|v| v.parse().ok())
                .ok_or("usage: motion X")?;
            if intensity < 0.0 {
                return Err("motion intensity must be >= 0".into());
            }
            Ok(Sample::motion(intensity))
        }
        other => Err(format!("unknown sample command: {}", other)),
    }
}

fn submit_pin(pin: &str, session: &mut SurveillanceSession, args: &Args) {
    if session.gate_state() == GateState::Unlocked && pin.len() < PIN_MIN_LEN {
        warn(args, &format!("PIN too short (min {} digits)", PIN_MIN_LEN));
        return;
    }
    if pin.len() > PIN_MAX_LEN {
        warn(args, &format!("PIN too long (max {} digits)", PIN_MAX_LEN));
        return;
    }
    let outcome = if pin == DEMO_PIN {
        CredentialOutcome::Accepted
    } else {
        CredentialOutcome::Rejected
    };
    match session.attempt_unlock(outcome) {
        Ok(()) => println!("{}", paint("Access granted", "green", args.no_color)),
        Err(AccessError::BlockedSubmission) => {
            println!("{}", paint("PIN blocked - unsafe to enter", "red", args.no_color))
        }
        Err(AccessError::CredentialRejected) => {
            println!("{}", paint("Incorrect PIN", "red", args.no_color))
        }
    }
}

/// Replay mode: feed a script through the real async driver
async fn run_script(path: &str, args: &Args) {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("cannot read script {}: {}", path, e);
            std::process::exit(1);
        }
    };
    let mut samples = Vec::new();
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')) {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default().to_ascii_lowercase();
        let rest: Vec<&str> = parts.collect();
        match parse_sample(&command, &rest) {
            Ok(sample) => samples.push(sample),
            Err(msg) => {
                eprintln!("bad script line {:?}: {}", line, msg);
                std::process::exit(1);
            }
        }
    }

    let sink: Arc<MemorySink> = Arc::new(MemorySink::new());
    let session = build_session(args, sink.clone());
    let mode = session.mode();
    let session = Arc::new(Mutex::new(session));
    let settings = Arc::new(RwLock::new(*session.lock().await.settings()));

    println!("Replaying {} sample(s) at {} cadence...", samples.len(), mode);
    run_session(
        session.clone(),
        ScriptedSource::new(samples),
        settings,
        DriverConfig::for_mode(mode),
    )
    .await;

    let guard = session.lock().await;
    for event in sink.events() {
        if args.no_color {
            println!("{}", event.to_parseable_string());
        } else {
            println!("{}", event.to_terminal_string());
        }
    }
    println!(
        "Final: state={} | reason={} | ticks={} | threats={}",
        guard.gate_state(),
        guard.gate_reason(),
        guard.tick_seq(),
        guard.threat_count()
    );
}

// =============================================================================
// Output helpers
// =============================================================================

fn print_header(args: &Args) {
    println!("OmniGuard v{} - {} mode", VERSION, DetectionMode::from(args.mode));
    println!("Gate starts LOCKED; a safe window of consecutive ticks opens it.");
    println!("Type a command ('status' for state, 'quit' to exit).");
    println!();
}

fn format_prompt(session: &SurveillanceSession, no_color: bool) -> String {
    let state = session.gate_state();
    if no_color {
        return format!("[{}] > ", state);
    }
    let tag = format!("[{}]", state);
    let tag = match state {
        GateState::Unlocked => tag.as_str().green(),
        GateState::Locked => tag.as_str().red(),
    };
    format!("{} > ", tag)
}

fn print_tick(session: &SurveillanceSession, outcome: &TickOutcome, args: &Args) {
    if args.json {
        #[derive(serde::Serialize)]
        struct TickLine<'a> {
            report: &'a omniguard::core::TickReport,
            state: GateState,
            reason: String,
        }
        let line = TickLine {
            report: &outcome.report,
            state: session.gate_state(),
            reason: session.gate_reason().to_string(),
        };
        println!("{}", serde_json::to_string(&line).unwrap_or_default());
        return;
    }
    let category = outcome
        .report
        .category
        .map(|c| c.to_string())
        .unwrap_or_else(|| "NEUTRAL".to_string());
    println!(
        "verdict={} | category={} | run={}/{} | state={}",
        outcome.report.verdict,
        category,
        outcome.report.run,
        outcome.report.threshold,
        session.gate_state()
    );
}

fn print_status(session: &SurveillanceSession, args: &Args) {
    if args.json {
        #[derive(serde::Serialize)]
        struct Status {
            mode: DetectionMode,
            state: GateState,
            reason: String,
            sensitivity: u8,
            auto_lock: bool,
            ticks: u64,
            events: u64,
            threats: u64,
            enrolled: usize,
        }
        let status = Status {
            mode: session.mode(),
            state: session.gate_state(),
            reason: session.gate_reason().to_string(),
            sensitivity: session.settings().sensitivity,
            auto_lock: session.settings().auto_lock,
            ticks: session.tracker().tick_count(),
            events: session.event_count(),
            threats: session.threat_count(),
            enrolled: session.gallery().len(),
        };
        println!("{}", serde_json::to_string_pretty(&status).unwrap_or_default());
        return;
    }
    println!(
        "mode={} | state={} | reason={}",
        session.mode(),
        session.gate_state(),
        session.gate_reason()
    );
    println!(
        "sensitivity={} | auto_lock={} | ticks={} | events={} | threats={} | enrolled={}",
        session.settings().sensitivity,
        session.settings().auto_lock,
        session.tracker().tick_count(),
        session.event_count(),
        session.threat_count(),
        session.gallery().len()
    );
}

fn warn(args: &Args, message: &str) {
    println!("{}", paint(message, "yellow", args.no_color));
}

fn paint(message: &str, color: &str, no_color: bool) -> String {
    if no_color {
        return message.to_string();
    }
    match color {
        "green" => message.green().to_string(),
        "red" => message.red().to_string(),
        _ => message.yellow().to_string(),
    }
}

/// Deterministic pseudo-embedding for demo enrollment; the same seed
/// always produces the same vector, so `faces 1 SEED` matches an identity
/// enrolled with that seed.
fn demo_embedding(seed: u64) -> Embedding {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let values: Vec<f32> = (0..EMBEDDING_DIM)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) as f32) / (u32::MAX as f32)
        })
        .collect();
    Embedding::new(values).expect("demo embedding has fixed dimension")
}
