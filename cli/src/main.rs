use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use k256::ecdsa::SigningKey;
use merkle_distributor::signature::{claimer_address, sign_claim};
use merkle_distributor::ClaimDomain;
use merkle_tree::{hex_encode, parse_address, verify_proof, AirdropMerkleTree};
use primitive_types::U256;
use zeroize::Zeroize;

#[derive(Parser)]
#[command(name = "distributor-cli")]
#[command(about = "Merkle airdrop distributor tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the distribution tree from a whitelist CSV
    Generate(GenerateArgs),
    /// Produce a claim authorization signature
    Sign(SignArgs),
    /// Check a claimant's stored proof against a tree artifact
    Verify(VerifyArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Whitelist CSV (columns: address, amount)
    #[arg(short, long)]
    csv: PathBuf,

    /// Output path for the proof-distribution JSON artifact
    #[arg(short, long)]
    out: PathBuf,
}

#[derive(Args)]
struct DomainArgs {
    /// Signing domain name
    #[arg(long, default_value = "MerkleDistributor")]
    domain_name: String,

    /// Signing domain version
    #[arg(long, default_value = "1")]
    domain_version: String,

    /// Chain identifier
    #[arg(long, default_value_t = 1)]
    chain_id: u64,

    /// Verifying contract address (hex)
    #[arg(long)]
    contract: String,
}

#[derive(Args)]
struct SignArgs {
    /// Private key (hex format, with or without 0x prefix)
    /// Alternatively, use "-" to read from stdin (more secure)
    #[arg(short, long)]
    key: String,

    /// Claimant address (hex); defaults to the address derived from the key
    #[arg(long)]
    claimant: Option<String>,

    /// Claim amount (decimal)
    #[arg(short, long)]
    amount: String,

    #[command(flatten)]
    domain: DomainArgs,
}

#[derive(Args)]
struct VerifyArgs {
    /// Tree artifact written by `generate`
    #[arg(short, long)]
    tree: PathBuf,

    /// Claimant address (hex)
    #[arg(long)]
    claimant: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args)?,
        Commands::Sign(args) => sign(args)?,
        Commands::Verify(args) => verify(args)?,
    }

    Ok(())
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let tree = AirdropMerkleTree::new_from_csv(&args.csv)
        .with_context(|| format!("failed to build tree from {:?}", args.csv))?;
    tree.verify_proof().context("tree self-verification failed")?;
    tree.write_to_file(&args.out)
        .with_context(|| format!("failed to write artifact to {:?}", args.out))?;

    println!("merkle root: {}", hex_encode(tree.merkle_root));
    println!("nodes: {}", tree.max_num_nodes);
    println!("max total claim: {}", tree.max_total_claim);
    println!("artifact: {}", args.out.display());
    Ok(())
}

fn sign(args: SignArgs) -> anyhow::Result<()> {
    let signing_key = read_signing_key(&args.key)?;
    let derived = claimer_address(signing_key.verifying_key());

    let claimant = match &args.claimant {
        Some(addr) => {
            let claimant = parse_address(addr).context("invalid claimant address")?;
            if claimant != derived {
                tracing::warn!(
                    claimant = %hex_encode(claimant),
                    derived = %hex_encode(derived),
                    "claimant does not match the signing key; the distributor will reject this signature"
                );
            }
            claimant
        }
        None => derived,
    };
    let amount = U256::from_dec_str(&args.amount).context("invalid amount")?;

    let domain = ClaimDomain::new(
        args.domain.domain_name,
        args.domain.domain_version,
        args.domain.chain_id,
        parse_address(&args.domain.contract).context("invalid contract address")?,
    );

    let signature = sign_claim(&signing_key, &domain, &claimant, amount)
        .map_err(|e| anyhow::anyhow!("signing failed: {e}"))?;

    println!("claimant: {}", hex_encode(claimant));
    println!("amount: {amount}");
    println!("signature: {}", hex_encode(signature));
    Ok(())
}

fn verify(args: VerifyArgs) -> anyhow::Result<()> {
    let claimant = parse_address(&args.claimant).context("invalid claimant address")?;
    let tree = AirdropMerkleTree::new_from_file(&args.tree)
        .with_context(|| format!("failed to load tree artifact {:?}", args.tree))?;

    let node = tree
        .get_node(&claimant)
        .context("claimant not found in tree")?;
    anyhow::ensure!(
        verify_proof(node.hash(), &node.proof, tree.merkle_root),
        "stored proof does not verify against the artifact root"
    );

    println!("proof valid");
    println!("merkle root: {}", hex_encode(tree.merkle_root));
    println!("claimant: {}", hex_encode(node.claimant));
    println!("amount: {}", node.amount);
    println!("leaf index: {}", node.index);
    Ok(())
}

fn read_signing_key(key_arg: &str) -> anyhow::Result<SigningKey> {
    let key_str = if key_arg == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_line(&mut buffer)
            .context("failed to read private key from stdin")?;
        let trimmed = buffer.trim().to_string();
        buffer.zeroize();
        trimmed
    } else {
        key_arg.to_string()
    };
    let key_str = key_str.strip_prefix("0x").unwrap_or(&key_str);
    if key_str.is_empty() {
        anyhow::bail!("private key is empty");
    }
    let mut key_bytes = hex::decode(key_str).context("invalid private key format")?;
    if key_bytes.len() != 32 {
        let len = key_bytes.len();
        key_bytes.zeroize();
        anyhow::bail!("invalid private key length: expected 32 bytes, got {len}");
    }
    let signing_key = SigningKey::from_slice(&key_bytes).context("invalid private key")?;
    key_bytes.zeroize();
    Ok(signing_key)
}
