// Where each document lives on disk and upstream.

use std::fmt;
use std::path::PathBuf;

/// Make a node name or identifier usable as a single path component.
/// Only `/` and `*` are replaced; every other character is kept as published.
pub fn sanitize_segment(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '*' => '_',
            c => c,
        })
        .collect()
}

/// Position of a node in the tree as the chain of sanitized child names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePath {
    segments: Vec<String>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(sanitize_segment(name));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn push_onto(&self, mut base: PathBuf) -> PathBuf {
        for s in &self.segments {
            base.push(s);
        }
        base
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.segments.join("/"))
        }
    }
}

/// On-disk layout of the mirror under one root directory.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn node_dir(&self, node: &NodePath) -> PathBuf {
        node.push_onto(self.root.join("results"))
    }

    /// `results/<node>/info.json`
    pub fn descriptor(&self, node: &NodePath) -> PathBuf {
        self.node_dir(node).join("info.json")
    }

    /// `results/<node>/<id>.json`
    pub fn election_return(&self, node: &NodePath, terminal_id: &str) -> PathBuf {
        self.node_dir(node)
            .join(format!("{}.json", sanitize_segment(terminal_id)))
    }

    /// `results/<node>/coc.json`
    pub fn certificate(&self, node: &NodePath) -> PathBuf {
        self.node_dir(node).join("coc.json")
    }

    /// `contests/<id>.json`, shared by every election return that names the contest.
    pub fn contest(&self, contest_id: &str) -> PathBuf {
        self.root
            .join("contests")
            .join(format!("{}.json", sanitize_segment(contest_id)))
    }
}

/// Upstream URLs, all relative to one data root.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Node descriptor; `locator` already carries its `.json` suffix.
    pub fn region(&self, locator: &str) -> String {
        format!("{}/regions/{}", self.base, locator)
    }

    /// Election return or certificate payload.
    pub fn result(&self, locator: &str) -> String {
        format!("{}/results/{}.json", self.base, locator)
    }

    pub fn contest(&self, contest_id: &str) -> String {
        format!("{}/contests/{}.json", self.base, contest_id)
    }
}

/// Locator of a child descriptor as referenced from its parent.
pub fn child_locator(locator: &str) -> String {
    format!("{}.json", locator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_paths() {
        let layout = StorageLayout::new("data");
        let root = NodePath::root();
        assert_eq!(layout.descriptor(&root), PathBuf::from("data/results/info.json"));
        assert_eq!(layout.certificate(&root), PathBuf::from("data/results/coc.json"));
        assert_eq!(layout.contest("199"), PathBuf::from("data/contests/199.json"));
    }

    #[test]
    fn test_slash_in_name_stays_one_level() {
        let layout = StorageLayout::new("data");
        let node = NodePath::root().child("NCR").child("CITY OF MANILA/TONDO");
        assert_eq!(node.depth(), 2);
        assert_eq!(
            layout.descriptor(&node),
            PathBuf::from("data/results/NCR/CITY OF MANILA_TONDO/info.json")
        );
    }

    #[test]
    fn test_star_in_terminal_id() {
        let layout = StorageLayout::new("data");
        let node = NodePath::root().child("A");
        assert_eq!(
            layout.election_return(&node, "0101*02"),
            PathBuf::from("data/results/A/0101_02.json")
        );
    }

    #[test]
    fn test_endpoints() {
        let ep = Endpoints::new("https://host/data/");
        assert_eq!(ep.region("root.json"), "https://host/data/regions/root.json");
        assert_eq!(ep.region(&child_locator("r/1")), "https://host/data/regions/r/1.json");
        assert_eq!(ep.result("1/2/3"), "https://host/data/results/1/2/3.json");
        assert_eq!(ep.contest("C1"), "https://host/data/contests/C1.json");
    }

    #[test]
    fn test_star_in_node_name() {
        let layout = StorageLayout::new("data");
        let node = NodePath::root().child("STA. CRUZ*");
        assert_eq!(layout.descriptor(&node), PathBuf::from("data/results/STA. CRUZ_/info.json"));
    }

    #[test]
    fn test_backslash_is_kept() {
        assert_eq!(sanitize_segment(r"PUROK 1\2"), r"PUROK 1\2");
        assert_eq!(sanitize_segment("A/B*C"), "A_B_C");
    }

    #[test]
    fn test_display() {
        assert_eq!(NodePath::root().to_string(), "<root>");
        assert_eq!(NodePath::root().child("A").child("B").to_string(), "A/B");
    }
}
