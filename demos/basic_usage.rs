// demos/basic_usage.rs
use mochidrop_client::{format, ClientConfig, Credentials, MochiClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration from the environment (MOCHIDROP_API_URL, SOLANA_RPC_URL)
    let config = ClientConfig::from_env();
    let client = MochiClient::new(config)?;

    println!("🏥 Checking backend and RPC reachability...");
    match client.health_check().await {
        Ok(()) => println!("✅ Backend and RPC reachable"),
        Err(e) => println!("⚠️  Health check failed: {}", e),
    }

    // Resume a previous session if a token was persisted
    if let Some(user) = client.start().await? {
        println!("👤 Welcome back, {}", user.username);
    } else {
        println!("🔑 Logging in...");
        let user = client
            .login(Credentials {
                email: std::env::var("MOCHIDROP_EMAIL")
                    .unwrap_or_else(|_| "demo@mochidrop.com".to_string()),
                password: std::env::var("MOCHIDROP_PASSWORD")
                    .unwrap_or_else(|_| "demo-password".to_string()),
            })
            .await?;
        println!("👤 Logged in as {}", user.username);
    }

    // Wallet overview
    let snapshot = client.wallet().snapshot().await;
    match &snapshot.address {
        Some(address) => {
            println!(
                "💳 Wallet {} — {} SOL",
                format::truncate_address(address),
                format::format_sol(snapshot.lamports)
            );
            for (symbol, amount) in client.wallet().labelled_balances().await {
                println!("   {} {}", format::format_amount(amount, 2), symbol);
            }
        }
        None => println!("💳 No wallet connected"),
    }

    // Browse active airdrops and claim whatever is open
    let airdrops = client.airdrops().airdrops().await;
    println!("🎁 {} active airdrops", airdrops.len());
    for airdrop in &airdrops {
        let eligibility = client.airdrops().claim_eligibility(airdrop).await;
        println!(
            "   #{} {} — {} {} per claim ({})",
            airdrop.id,
            airdrop.name,
            format::format_token_amount(airdrop.amount_per_claim, airdrop.token_decimals),
            airdrop.token_symbol,
            eligibility
        );

        if eligibility.is_claimable() {
            match client.airdrops().claim(airdrop.id).await {
                Ok(claim) => println!("      ✅ Claimed! Status: {:?}", claim.status),
                Err(e) => println!("      ❌ Claim rejected: {}", e),
            }
        }
    }

    let stats = client.airdrops().stats().await;
    println!(
        "📊 Platform totals: {} airdrops, {} claims",
        stats.total_airdrops, stats.total_claims
    );

    Ok(())
}
