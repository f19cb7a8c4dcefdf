//! Basic example demonstrating the FortiOS API client.
//!
//! Run with:
//! ```
//! FORTIOS_API_TOKEN=your-token FORTIOS_API_URL=https://fw.example.com \
//!     cargo run --example basic
//! ```

use fortiapi::{
    join_names, FortiClient, List, OrderedCollection, Policy, Reorder, SortKey, SortSpec,
};

#[tokio::main]
async fn main() -> fortiapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating FortiOS client...");
    let client = FortiClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // List policies in evaluation order
    println!("\n--- Firewall Policies ---");
    let policies = Policy::list(&client).await?;
    println!("Found {} policies", policies.len());

    for policy in policies.iter().take(10) {
        println!(
            "  #{:<5} {:<24} {} -> {}",
            policy.policyid,
            policy.name,
            join_names(&policy.srcaddr),
            join_names(&policy.dstaddr)
        );
    }

    // Report the order of every ordered table without changing anything
    println!("\n--- Order Check (by id, ascending) ---");
    let spec = SortSpec::ascending(SortKey::Id);
    for collection in OrderedCollection::ALL {
        let sorted = collection.is_sorted(&client, spec).await?;
        println!(
            "  {:<16} {}",
            collection.entity(),
            if sorted { "sorted" } else { "out of order" }
        );
    }

    // Sorting mutates the appliance, so only do it when asked to
    if std::env::var("FORTIOS_DEMO_SORT").is_ok() {
        println!("\n--- Sorting Policies ---");
        let outcome = Policy::sort(&client, spec).await?;
        println!(
            "  {} entries, {} moves",
            outcome.entries, outcome.moves
        );
    }

    println!("\nDone!");
    Ok(())
}
