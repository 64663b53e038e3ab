use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prep_coach::{
    create_router, AgentMode, AppState, Config, ExperienceLevel, InterviewCoach, MockScript,
    ReportStatus, ScoringRequester, SessionConfig,
};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prep-coach", version, about = "Voice mock-interview coach")]
struct Cli {
    /// Config file (without extension)
    #[arg(long, default_value = "config/prep-coach")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve,
    /// Run a scripted mock interview in the terminal and print the report
    Rehearse {
        #[arg(long)]
        role: String,
        #[arg(long, default_value = "Rust")]
        tech_stack: String,
        #[arg(long, default_value = "junior")]
        level: ExperienceLevel,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Prep Coach v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {} (mock={})", cfg.service.name, cfg.interview.mock);

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Rehearse {
            role,
            tech_stack,
            level,
        } => {
            rehearse(
                cfg,
                SessionConfig {
                    role,
                    tech_stack,
                    experience_level: level,
                },
            )
            .await
        }
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let state = AppState::new(InterviewCoach::from_config(&cfg)?)
        .with_retention(Duration::from_secs(cfg.interview.retention_secs));
    let app = create_router(state.clone());

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
        .context("HTTP server failed")?;

    // Tear down anything still running
    let interviews: Vec<_> = state.interviews.read().await.values().cloned().collect();
    for interview in interviews {
        interview.session().stop().await;
    }

    info!("HTTP server stopped");
    Ok(())
}

async fn rehearse(cfg: Config, config: SessionConfig) -> Result<()> {
    let mut settings = cfg.session_settings();
    settings.mock = true;

    let coach = InterviewCoach::new(
        settings,
        AgentMode::Mock(MockScript::default()),
        ScoringRequester::new(cfg.scoring_service()?),
    );

    let interview = coach.begin(config);
    info!("Rehearsal {} started (Ctrl-C to end early)", interview.id());

    let status = tokio::select! {
        status = interview.session().finished() => status,
        _ = tokio::signal::ctrl_c() => {
            interview.session().stop().await;
            interview.session().status()
        }
    };

    println!("\n=== Transcript ===");
    for message in status.transcript.messages() {
        println!("{:>9}: {}", message.role, message.text);
    }

    if let Some(failure) = &status.failure {
        println!("\nInterview ended with an error: {}", failure);
        return Ok(());
    }

    println!("\nGenerating report...");
    match interview.settled_report().await {
        ReportStatus::Ready(analysis) => {
            println!("\n=== Report ===");
            println!("Overall score: {:.1}/10", analysis.overall_score);
            println!("{}", analysis.summary);
            for strength in &analysis.strengths {
                println!("  + {}", strength);
            }
            for improvement in &analysis.improvements {
                println!("  - {}", improvement);
            }
            for tech in &analysis.tech_scores {
                println!("  {}: {:.1}", tech.skill, tech.score);
            }
        }
        other => println!("No report available ({:?})", other),
    }

    Ok(())
}
