// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use companion_chat_node::{
    api::{start_server, AppState},
    cache::ResponseCache,
    config::AppConfig,
    conversation::ConversationManager,
    generation::SidecarGenerator,
    sentiment::{SentimentAnalyzer, SidecarSentiment},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    println!("🚀 Starting Companion Chat Node...\n");

    // Text-generation sidecar adapter
    println!("🧠 Connecting to generation sidecar...");
    let generator = SidecarGenerator::new(&config.generator_endpoint)
        .map_err(|e| anyhow::anyhow!("failed to build generator client: {}", e))?;
    if generator.health_check().await {
        println!("✅ Generation sidecar reachable at {}", config.generator_endpoint);
    } else {
        println!("⚠️  Generation sidecar not reachable at {}", config.generator_endpoint);
        println!("   Chat replies will fall back to canned follow-ups until it is up.");
    }

    // Sentiment sidecar adapter
    println!("🧭 Connecting to sentiment sidecar...");
    let sentiment_backend = SidecarSentiment::new(&config.sentiment_endpoint)
        .map_err(|e| anyhow::anyhow!("failed to build sentiment client: {}", e))?;
    if sentiment_backend.health_check().await {
        println!("✅ Sentiment sidecar reachable at {}", config.sentiment_endpoint);
    } else {
        println!("⚠️  Sentiment sidecar not reachable at {}", config.sentiment_endpoint);
        println!("   Sentiment will degrade to neutral until it is up.");
    }

    let manager = Arc::new(ConversationManager::new(Arc::new(generator), &config));
    let sentiment = Arc::new(SentimentAnalyzer::new(
        Arc::new(sentiment_backend),
        config.neutral_band,
    ));
    let sentiment_cache = Arc::new(ResponseCache::new(
        config.cache_max_entries,
        config.cache_ttl,
    ));

    let state = AppState {
        manager,
        sentiment,
        sentiment_cache,
    };

    let listen_addr = config.listen_addr.clone();
    let port = listen_addr.rsplit(':').next().unwrap_or("5000").to_string();

    // Print node information
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("🎉 Companion Chat Node is running!");
    println!("{}", separator);
    println!("Listen address: {}", listen_addr);
    println!("History window: {} turns", config.max_history_turns);
    println!("Prompt budget:  {} chars", config.max_prompt_chars);
    println!("Reply cap:      {} chars", config.max_response_chars);
    println!("\nAPI Endpoints:");
    println!("  Health:       http://localhost:{}/health", port);
    println!("  Chat:         POST http://localhost:{}/api/chat", port);
    println!("  Sentiment:    POST http://localhost:{}/api/sentiment", port);
    println!("  Topics:       http://localhost:{}/api/topics", port);
    println!("\nTest with curl:");
    println!("  curl -X POST http://localhost:{}/api/chat \\", port);
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"message\": \"How are you today?\"}}'");
    println!("\nPress Ctrl+C to shutdown...");
    println!("{}\n", separator);

    let server = tokio::spawn(async move {
        if let Err(e) = start_server(state, &listen_addr).await {
            eprintln!("❌ API server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    println!("\n⏹️  Shutting down...");
    server.abort();

    println!("👋 Goodbye!");
    Ok(())
}
