// Typed views of the upstream documents. Only the fields the crawl follows are modelled.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CrawlError, CrawlResult};

/// One node of the administrative tree (`info.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescriptor {
    /// Administrative level, e.g. `Region` or `Barangay`.
    #[serde(rename = "can")]
    pub classification: String,
    /// Children keyed by upstream identifier; sorted so runs are reproducible.
    #[serde(rename = "srs", default)]
    pub children: BTreeMap<String, ChildRef>,
    #[serde(rename = "pps", default)]
    pub terminals: Vec<TerminalRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChildRef {
    #[serde(rename = "rn")]
    pub name: String,
    #[serde(rename = "url")]
    pub locator: String,
}

/// An election return (leaf) or certificate of canvass (aggregate) attached to a node.
#[derive(Debug, Clone, Deserialize)]
pub struct TerminalRef {
    #[serde(rename = "ppcc")]
    pub id: String,
    #[serde(rename = "vbs", default)]
    pub voting_boards: Vec<VotingBoardRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VotingBoardRef {
    #[serde(rename = "url")]
    pub locator: String,
}

impl TerminalRef {
    /// The payload locator. Exactly one voting board is expected; anything else
    /// means the upstream schema changed under us.
    pub fn locator(&self, node: &str) -> CrawlResult<&str> {
        match self.voting_boards.as_slice() {
            [board] => Ok(board.locator.as_str()),
            boards => Err(CrawlError::Integrity {
                node: node.to_string(),
                detail: format!(
                    "terminal {} has {} voting boards, expected exactly 1",
                    self.id,
                    boards.len()
                ),
            }),
        }
    }
}

/// Result payload of a single precinct.
#[derive(Debug, Clone, Deserialize)]
pub struct ElectionReturn {
    #[serde(rename = "rs", default)]
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultRow {
    /// Contest identifier; the upstream emits it as a number or a string.
    #[serde(rename = "cc")]
    pub contest: Value,
}

impl ElectionReturn {
    /// Distinct contest identifiers referenced by the rows, in sorted order.
    /// A row whose `cc` is neither a string nor a number fails the whole return.
    pub fn contest_ids(&self, source: &str) -> CrawlResult<BTreeSet<String>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| match &row.contest {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(CrawlError::Integrity {
                    node: source.to_string(),
                    detail: format!("result row {} has contest id {}", i, other),
                }),
            })
            .collect()
    }
}

/// Deserialize a cached or fetched document into one of the views above.
pub fn decode<T: DeserializeOwned>(what: &str, doc: Value) -> CrawlResult<T> {
    serde_json::from_value(doc).map_err(|source| CrawlError::Schema {
        what: what.to_string(),
        source,
    })
}
