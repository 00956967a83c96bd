// src/bin/claim_check.rs
// Operator tool: score claim fixtures against a running service and show the review queue
//
// Usage: claim_check [--pending] [--base-url URL] <fixture.json>...
// Each fixture is a POST /claims/match body: {"claim": {...}, "locations": [...]}

use anyhow::{bail, Context, Result};
use clap::Parser;
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "claim_check")]
#[command(about = "Score claim fixtures against a running claims service")]
struct Args {
    /// Claim fixtures to post to /claims/match
    #[arg(required_unless_present = "pending")]
    fixtures: Vec<PathBuf>,

    /// Also print the manual review queue
    #[arg(long)]
    pending: bool,

    /// Base URL of the claims service
    #[arg(long, env = "CLAIMS_API_URL", default_value = "http://localhost:8003")]
    base_url: String,

    /// Admin token for the review queue
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,
}

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MatchResponse {
    verified: bool,
    confidence: u8,
    requires_manual_review: bool,
    match_details: MatchDetails,
    failure_reason: Option<String>,
    #[serde(default)]
    all_locations: Vec<Value>,
}

#[derive(Deserialize, Debug)]
struct MatchDetails {
    name_match: u8,
    address_match: u8,
    phone_match: bool,
}

#[derive(Deserialize, Debug)]
struct PendingResponse {
    total_count: i64,
    data: Vec<PendingClaim>,
}

#[derive(Deserialize, Debug)]
struct PendingClaim {
    id: String,
    business_name: String,
    confidence: i32,
    created_at: String,
}

struct ClaimChecker {
    base_url: String,
    client: Client,
}

impl ClaimChecker {
    fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn match_fixture(&self, path: &Path) -> Result<MatchResponse> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let body: Value =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

        let response = self
            .client
            .post(format!("{}/claims/match", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            bail!("HTTP {} - {}", status, text);
        }

        Ok(response.json().await?)
    }

    async fn pending(&self, admin_token: &str) -> Result<PendingResponse> {
        let response = self
            .client
            .get(format!("{}/admin/claims/pending?limit=50", self.base_url))
            .header("X-Admin-Token", admin_token)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("HTTP {}", response.status());
        }

        Ok(response.json().await?)
    }
}

fn print_result(path: &Path, result: &MatchResponse) {
    let (color, label) = if result.verified {
        (GREEN, "VERIFIED")
    } else if result.requires_manual_review {
        (YELLOW, "REVIEW")
    } else {
        (RED, "REJECTED")
    };

    println!(
        "{:<40} {}{:<10}{} {:>5}%  name {:>3}  address {:>3}  phone {:<5}  ({} candidates)",
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        color,
        label,
        RESET,
        result.confidence,
        result.match_details.name_match,
        result.match_details.address_match,
        result.match_details.phone_match,
        result.all_locations.len()
    );

    if let Some(ref reason) = result.failure_reason {
        println!("    {}{}{}", RED, reason, RESET);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let checker = ClaimChecker::new(args.base_url)?;

    println!("{}Checking service status...{}", CYAN, RESET);
    if !checker.check_service_health().await {
        println!("{}Service unavailable at {}{}", RED, checker.base_url, RESET);
        process::exit(1);
    }

    let mut failures = 0;
    if !args.fixtures.is_empty() {
        println!("\n{}Claim fixtures{}", BOLD, RESET);
        for path in &args.fixtures {
            match checker.match_fixture(path).await {
                Ok(result) => print_result(path, &result),
                Err(e) => {
                    failures += 1;
                    println!("{}{}: {:#}{}", RED, path.display(), e, RESET);
                }
            }
        }
    }

    if args.pending {
        let admin_token = args
            .admin_token
            .as_deref()
            .context("ADMIN_TOKEN or --admin-token is required for --pending")?;
        let queue = checker.pending(admin_token).await?;

        println!("\n{}Manual review queue: {} claims{}", BOLD, queue.total_count, RESET);
        for claim in queue.data {
            println!(
                "  {}  {:<40} {:>3}%  {}",
                claim.id, claim.business_name, claim.confidence, claim.created_at
            );
        }
    }

    if failures > 0 {
        process::exit(1);
    }
    Ok(())
}
