use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use common::{constant::DEFAULT_SYMBOLS, normalize_symbol, Symbol};

/// Reads one pair per line; blank lines are ignored.
pub fn load_pairs_file(path: &Path) -> Result<Vec<Symbol>> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read pairs file {}", path.display()))?;
    Ok(body
        .lines()
        .map(normalize_symbol)
        .filter(|symbol| !symbol.is_empty())
        .collect())
}

/// Normalises, sorts and de-duplicates the user pairs, then puts the default
/// reference pairs first when requested and not already present.
pub fn build_pair_list<I, S>(raw: I, include_defaults: bool) -> Vec<Symbol>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pairs: Vec<Symbol> = raw
        .into_iter()
        .map(|pair| normalize_symbol(pair.as_ref()))
        .filter(|pair| !pair.is_empty())
        .collect();
    pairs.sort();
    pairs.dedup();
    if include_defaults {
        for default in DEFAULT_SYMBOLS.iter().rev() {
            if !pairs.iter().any(|pair| pair == default) {
                pairs.insert(0, default.to_string());
            }
        }
    }
    pairs
}
