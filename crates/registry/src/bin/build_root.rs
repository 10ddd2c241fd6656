//! Build an allowlist root from an address file and export the proofs.
//!
//! Reads one address per line (blank lines and `#` comments ignored), prints
//! the root commitment, and writes a JSON file mapping each address to its
//! hex-encoded inclusion proof for distribution to holders.

use std::path::Path;

use allowlist_merkle::{Address, AllowlistTree};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let input = args.get(1).map_or("allowlist.txt", String::as_str);
    let output = args.get(2).map_or("proofs.json", String::as_str);

    println!("Reading addresses from {input}...");
    let contents = std::fs::read_to_string(input).expect("Failed to read address file");

    let addresses: Vec<Address> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.parse()
                .unwrap_or_else(|e| panic!("Bad address {line:?}: {e}"))
        })
        .collect();

    println!("Building tree over {} addresses...", addresses.len());
    let tree = AllowlistTree::build(&addresses).expect("Failed to build tree");

    println!("RootHash: 0x{}", hex::encode(tree.root()));
    println!("Leaves:   {} (after dedup)", tree.len());

    let mut proofs = serde_json::Map::new();
    for address in &addresses {
        let proof = tree.proof(address).expect("address was just committed");
        let siblings: Vec<String> = proof
            .siblings()
            .iter()
            .map(|h| format!("0x{}", hex::encode(h)))
            .collect();
        proofs.insert(address.to_string(), serde_json::json!(siblings));
    }

    let export = serde_json::json!({
        "root": format!("0x{}", hex::encode(tree.root())),
        "proofs": proofs,
    });

    std::fs::write(
        Path::new(output),
        serde_json::to_string_pretty(&export).expect("Failed to serialize proofs"),
    )
    .expect("Failed to write proofs file");
    println!("Proofs exported to {output}");
}
