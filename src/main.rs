//! Terminal demo of the thinking process
//!
//! Usage: `gluco-thinking [--json] [prompt words...]`
//!
//! Without a prompt the first quick prompt is used. Timing comes from
//! `GLUCO_TICK_INTERVAL_MS` and `GLUCO_SETTLING_DELAY_MS`.

use gluco_thinking::{ChatSession, EngineConfig, EngineNotification, ThinkingEngine, QUICK_PROMPTS};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut json = false;
    let mut words = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            words.push(arg);
        }
    }
    let prompt = if words.is_empty() {
        QUICK_PROMPTS[0].prompt.to_string()
    } else {
        words.join(" ")
    };

    let config = EngineConfig::from_env();
    let mut session = ChatSession::new(ThinkingEngine::spawn(config));

    let renderer = if json {
        tokio::spawn(render_json(session.engine().watch()))
    } else {
        tokio::spawn(render_text(session.engine().subscribe()))
    };

    println!("> {prompt}");
    tokio::select! {
        result = session.send_message(&prompt) => {
            let answer = result?;
            if !json {
                println!("\n{answer}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, cancelling thinking");
        }
    }

    // Closing drops every sender, which ends the renderer after it drains
    session.close().await;
    if let Err(e) = renderer.await {
        tracing::warn!(error = %e, "Renderer task failed");
    }
    Ok(())
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gluco_thinking=info".into());

    let pretty = std::env::var("GLUCO_LOG_FORMAT").is_ok_and(|v| v == "pretty");
    if pretty {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn render_text(mut rx: tokio::sync::broadcast::Receiver<EngineNotification>) {
    loop {
        match rx.recv().await {
            Ok(EngineNotification::Started {
                category,
                total_steps,
                ..
            }) => {
                println!("Thinking ({category}, {total_steps} steps)...");
            }
            Ok(EngineNotification::StepCompleted { index, step, .. }) => {
                println!("  [{}] {}", index + 1, step.content);
                if let Some(found) = step.revealed_response() {
                    println!("      {found}");
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Renderer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn render_json(
    mut rx: tokio::sync::watch::Receiver<gluco_thinking::ThinkingSnapshot>,
) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        match serde_json::to_string(&snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "Failed to encode snapshot"),
        }
    }
}
