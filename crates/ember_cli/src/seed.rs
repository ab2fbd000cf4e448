//! Turning user input into a world seed.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Seed for a free-text phrase.
///
/// Plain integers are used as-is so `--seed-phrase 42` and `--seed 42` agree;
/// anything else is hashed with FNV-1a, which is stable across platforms and
/// compiler versions.
pub fn seed_from_phrase(phrase: &str) -> u64 {
    let phrase = phrase.trim();
    if let Ok(seed) = phrase.parse::<u64>() {
        return seed;
    }

    phrase.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Ask for a seed phrase on stderr and read one line from `input`.
///
/// An empty line keeps `fallback`.
pub fn prompt_seed(mut input: impl BufRead, fallback: u64) -> Result<u64> {
    eprint!("World seed: ");
    io::stderr().flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read seed from stdin")?;

    if line.trim().is_empty() {
        Ok(fallback)
    } else {
        Ok(seed_from_phrase(&line))
    }
}
