//! Converts the catalog's JSON metadata blob into the on-chain auxiliary
//! data structure embedded under label `721` (spec §4.F, §6).

use pallas::ledger::primitives::conway::Metadatum;

pub fn json_to_metadatum(value: &serde_json::Value) -> Metadatum {
    match value {
        serde_json::Value::Null => Metadatum::Text(String::new()),
        serde_json::Value::Bool(b) => Metadatum::Text(b.to_string()),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Metadatum::Int(i.into())
            } else {
                Metadatum::Text(n.to_string())
            }
        }
        serde_json::Value::String(s) => Metadatum::Text(truncate_metadatum_string(s)),
        serde_json::Value::Array(items) => {
            Metadatum::Array(items.iter().map(json_to_metadatum).collect())
        }
        serde_json::Value::Object(map) => Metadatum::Map(
            map.iter()
                .map(|(key, value)| (Metadatum::Text(key.clone()), json_to_metadatum(value)))
                .collect(),
        ),
    }
}

/// CIP-25 metadata strings are limited to 64 UTF-8 bytes per chunk; longer
/// values are expected to be pre-chunked by the catalog author, but we
/// defensively truncate rather than let the assembler reject the whole
/// transaction over one oversized field.
fn truncate_metadatum_string(s: &str) -> String {
    const MAX_BYTES: usize = 64;
    if s.len() <= MAX_BYTES {
        return s.to_string();
    }
    let mut end = MAX_BYTES;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s[..end].to_string()
}

/// Wraps one asset's metadata under its display name, as stored in the
/// catalog file (spec §6: `metadata_dir/<asset_name>.json`'s single
/// top-level key), nested under the mint policy id per the label-721
/// convention (`{721: {<policy_id>: {<asset_name>: {...}}}}`).
pub fn label_721_map(policy_id_hex: &str, assets: &[(&str, &serde_json::Value)]) -> Metadatum {
    let policy_entries: Vec<(Metadatum, Metadatum)> = assets
        .iter()
        .map(|(name, metadata)| (Metadatum::Text((*name).to_string()), json_to_metadatum(metadata)))
        .collect();
    Metadatum::Map(vec![(
        Metadatum::Text(policy_id_hex.to_string()),
        Metadatum::Map(policy_entries),
    )])
}
