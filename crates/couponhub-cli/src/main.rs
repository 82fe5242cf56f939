//! CouponHub operator CLI.
//!
//! `claim-storm` fires concurrent claim requests at a running server and
//! tallies the outcomes — handy for demonstrating that a coupon with N
//! stock yields exactly N successful claims under load.

use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::future::join_all;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "couponhub", about = "CouponHub operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fire concurrent claim requests at a server.
    ClaimStorm {
        /// Base URL of the server.
        #[arg(long, default_value = "http://localhost:9000")]
        url: String,
        /// Coupon name to claim.
        #[arg(long, default_value = "COUPON_TEST")]
        coupon: String,
        /// Number of claim requests, one distinct user each.
        #[arg(long, default_value_t = 50)]
        requests: usize,
        /// Prefix for the generated usernames.
        #[arg(long, default_value = "user")]
        user_prefix: String,
        /// Register the users before claiming.
        #[arg(long, default_value_t = true)]
        register: bool,
    },
}

#[derive(Serialize)]
struct ClaimRequest {
    username: String,
    coupon_name: String,
}

#[derive(Serialize)]
struct RegisterRequest {
    username: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::ClaimStorm {
            url,
            coupon,
            requests,
            user_prefix,
            register,
        } => claim_storm(&url, &coupon, requests, &user_prefix, register).await,
    }
}

async fn claim_storm(
    url: &str,
    coupon: &str,
    requests: usize,
    user_prefix: &str,
    register: bool,
) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("building HTTP client")?;

    if register {
        for i in 0..requests {
            let username = format!("{user_prefix}_{i}");
            let response = client
                .post(format!("{url}/api/users"))
                .json(&RegisterRequest { username })
                .send()
                .await
                .context("registering user")?;
            // 409 just means the user survives from a previous run.
            if !response.status().is_success() && response.status().as_u16() != 409 {
                anyhow::bail!("user registration failed with {}", response.status());
            }
        }
    }

    let started = Instant::now();

    let attempts = (0..requests).map(|i| {
        let client = client.clone();
        let body = ClaimRequest {
            username: format!("{user_prefix}_{i}"),
            coupon_name: coupon.to_string(),
        };
        let endpoint = format!("{url}/api/coupons/claim");
        async move {
            let request_started = Instant::now();
            let result = client.post(&endpoint).json(&body).send().await;
            let elapsed = request_started.elapsed();
            match result {
                Ok(response) => (response.status().is_success(), elapsed),
                Err(_) => (false, elapsed),
            }
        }
    });

    let outcomes = join_all(attempts).await;
    let total_elapsed = started.elapsed();

    let successes = outcomes.iter().filter(|(ok, _)| *ok).count();
    let failures = outcomes.len() - successes;
    let avg_ms = if outcomes.is_empty() {
        0.0
    } else {
        outcomes
            .iter()
            .map(|(_, elapsed)| elapsed.as_secs_f64() * 1000.0)
            .sum::<f64>()
            / outcomes.len() as f64
    };

    println!("claim storm against {url} for coupon {coupon}");
    println!("  requests:   {requests}");
    println!("  successes:  {successes}");
    println!("  failures:   {failures}");
    println!("  avg latency: {avg_ms:.1} ms");
    println!("  wall clock:  {:.1} ms", total_elapsed.as_secs_f64() * 1000.0);

    Ok(())
}
