// src/normalization/legal_suffix.rs

// Legal abbreviations that never carry meaning in a business name. Removed
// wherever they appear as a standalone token.
pub const LEGAL_ABBREVIATIONS: [&str; 10] = [
    "inc", "corp", "llc", "ltd", "plc", "llp", "lllp", "pllc", "gmbh", "sarl",
];

// Legal forms that are only removed at the end of a name. Longer phrases are
// listed before the shorter phrases they end with.
const LEGAL_SUFFIX_PHRASES: [&[&str]; 26] = [
    &["limited", "liability", "company"],
    &["limited", "liability", "partnership"],
    &["public", "limited", "company"],
    &["limited", "partnership"],
    &["incorporated"],
    &["corporation"],
    &["company"],
    &["co"],
    &["limited"],
    &["ltda"],
    &["lp"],
    &["pc"],
    &["sa"],
    &["sas"],
    &["srl"],
    &["spa"],
    &["bv"],
    &["nv"],
    &["ag"],
    &["kg"],
    &["kk"],
    &["ab"],
    &["oy"],
    &["pty"],
    &["pte"],
    &["bhd"],
];

// Legal forms written in front of the name
const LEGAL_PREFIX_PHRASES: [&[&str]; 5] = [&["pt"], &["ooo"], &["oao"], &["zao"], &["pao"]];

/// Strips legal-entity suffixes and prefixes from a company name.
///
/// Expects lowercase input (the general normalization rules run first).
/// Standalone abbreviations such as `inc` or `llc` are dropped anywhere in the
/// name; legal forms such as `limited liability company` are stripped from
/// the ends repeatedly, so `acme co inc` and `acme incorporated` both become
/// `acme`. Whitespace runs collapse to single spaces. A name consisting only
/// of legal terms cleans to an empty string.
pub fn clean_name(name: &str) -> String {
    let mut tokens: Vec<&str> = name
        .split_whitespace()
        .filter(|token| !LEGAL_ABBREVIATIONS.contains(token))
        .collect();

    loop {
        let before = tokens.len();
        strip_suffix_phrase(&mut tokens);
        strip_prefix_phrase(&mut tokens);
        if tokens.len() == before {
            break;
        }
    }

    tokens.join(" ")
}

fn strip_suffix_phrase(tokens: &mut Vec<&str>) {
    for phrase in LEGAL_SUFFIX_PHRASES {
        if tokens.ends_with(phrase) {
            tokens.truncate(tokens.len() - phrase.len());
            return;
        }
    }
}

fn strip_prefix_phrase(tokens: &mut Vec<&str>) {
    for phrase in LEGAL_PREFIX_PHRASES {
        if tokens.starts_with(phrase) {
            tokens.drain(..phrase.len());
            return;
        }
    }
}
