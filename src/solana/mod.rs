// src/solana/mod.rs
pub mod rpc;

pub use rpc::{ChainClient, SolanaRpc};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// SPL token program; owner filter for token-account enumeration.
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// System program; a guaranteed-existing account for reachability probes.
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

// Base58-encoded 32-byte public keys land in this range
const MIN_ADDRESS_LEN: usize = 32;
const MAX_ADDRESS_LEN: usize = 44;

/// Validate a Solana wallet address: base58 string decoding to exactly
/// 32 bytes. Purely local; a well-formed address for a nonexistent account
/// still passes and only fails at the balance query.
pub fn is_valid_address(address: &str) -> bool {
    if address.len() < MIN_ADDRESS_LEN || address.len() > MAX_ADDRESS_LEN {
        return false;
    }
    match bs58::decode(address).into_vec() {
        Ok(bytes) => bytes.len() == 32,
        Err(_) => false,
    }
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Well-known SPL mints, for labelling balances without a metadata lookup.
#[derive(Debug, Clone, Copy)]
pub struct KnownToken {
    pub symbol: &'static str,
    pub mint: &'static str,
    pub decimals: u8,
}

pub const KNOWN_TOKENS: &[KnownToken] = &[
    KnownToken {
        symbol: "USDC",
        mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        decimals: 6,
    },
    KnownToken {
        symbol: "USDT",
        mint: "9n4nbM75f5Ui33ZbPYXn59EwSgE8CGsHtAeTH5YFeJ9E",
        decimals: 6,
    },
    KnownToken {
        symbol: "SOL",
        mint: "So11111111111111111111111111111111111111112",
        decimals: 9,
    },
];

pub fn symbol_for_mint(mint: &str) -> Option<&'static str> {
    KNOWN_TOKENS
        .iter()
        .find(|token| token.mint == mint)
        .map(|token| token.symbol)
}
