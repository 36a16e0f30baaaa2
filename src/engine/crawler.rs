// Depth-first walk of the results tree, materializing every document it discovers.

use tracing::{debug, info};

use super::cache::JsonCache;
use super::layout::{child_locator, Endpoints, NodePath, StorageLayout};
use super::retry::RetryPolicy;
use super::stats::StatsCollector;
use crate::config::{LEAF_CLASSIFICATION, TOP_CLASSIFICATION};
use crate::error::{CrawlError, CrawlResult};
use crate::model::{decode, ElectionReturn, NodeDescriptor};

/// Pending work. A node's `Terminals` task sits below its children on the
/// stack, so it only runs once the whole subtree is done.
enum Task {
    Visit { node: NodePath, locator: String },
    Terminals { node: NodePath, descriptor: NodeDescriptor },
}

pub struct Crawler {
    cache: JsonCache,
    retry: RetryPolicy,
    layout: StorageLayout,
    endpoints: Endpoints,
}

impl Crawler {
    pub fn new(
        cache: JsonCache,
        retry: RetryPolicy,
        layout: StorageLayout,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            cache,
            retry,
            layout,
            endpoints,
        }
    }

    pub fn stats(&self) -> &StatsCollector {
        self.cache.stats()
    }

    /// Mirror the whole tree starting at the root descriptor.
    pub async fn crawl(&self, root_locator: &str) -> CrawlResult<()> {
        self.visit(NodePath::root(), root_locator).await
    }

    /// Mirror the subtree rooted at `node`, whose descriptor lives at `<base>/regions/<locator>`.
    pub async fn visit(&self, node: NodePath, locator: &str) -> CrawlResult<()> {
        let mut stack = vec![Task::Visit {
            node,
            locator: locator.to_string(),
        }];

        while let Some(task) = stack.pop() {
            match task {
                Task::Visit { node, locator } => {
                    info!("visiting {} ({})", node, locator);
                    let descriptor = self.resolve_descriptor(&node, &locator).await?;
                    self.stats().record_node();

                    let children: Vec<Task> = descriptor
                        .children
                        .values()
                        .map(|child| Task::Visit {
                            node: node.child(&child.name),
                            locator: child_locator(&child.locator),
                        })
                        .collect();

                    stack.push(Task::Terminals { node, descriptor });
                    // Reversed so the first child is popped first.
                    stack.extend(children.into_iter().rev());
                }
                Task::Terminals { node, descriptor } => {
                    if descriptor.classification == LEAF_CLASSIFICATION {
                        self.fetch_election_returns(&node, &descriptor).await?;
                    } else {
                        self.fetch_certificates(&node, &descriptor).await?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn resolve_descriptor(&self, node: &NodePath, locator: &str) -> CrawlResult<NodeDescriptor> {
        let path = self.layout.descriptor(node);
        let url = self.endpoints.region(locator);
        let label = format!("descriptor of {}", node);

        let doc = self
            .retry
            .run(&label, self.stats(), || self.cache.resolve(&path, &url))
            .await?;
        decode(&path.display().to_string(), doc)
    }

    /// Leaf node: one attempt per election return, then every contest it names.
    async fn fetch_election_returns(
        &self,
        node: &NodePath,
        descriptor: &NodeDescriptor,
    ) -> CrawlResult<()> {
        let node_label = node.to_string();
        for terminal in &descriptor.terminals {
            let locator = terminal.locator(&node_label)?;
            let path = self.layout.election_return(node, &terminal.id);
            let url = self.endpoints.result(locator);

            let doc = match self.cache.resolve(&path, &url).await {
                Ok(doc) => doc,
                Err(e) if e.is_recoverable() => {
                    info!("no election return yet for {} at {}, skipping", terminal.id, node);
                    self.stats().record_skipped();
                    continue;
                }
                Err(e) => return Err(e),
            };

            let what = path.display().to_string();
            let er: ElectionReturn = decode(&what, doc)?;
            let contests = er.contest_ids(&what)?;
            debug!("{} references {} contests", terminal.id, contests.len());
            for contest in &contests {
                self.resolve_contest(contest).await?;
            }
        }
        Ok(())
    }

    /// Aggregate node: at most one certificate of canvass, except at the top.
    async fn fetch_certificates(&self, node: &NodePath, descriptor: &NodeDescriptor) -> CrawlResult<()> {
        if descriptor.classification != TOP_CLASSIFICATION && descriptor.terminals.len() > 1 {
            return Err(CrawlError::Integrity {
                node: node.to_string(),
                detail: format!(
                    "{} node has {} certificates, expected at most 1",
                    descriptor.classification,
                    descriptor.terminals.len()
                ),
            });
        }

        let node_label = node.to_string();
        for terminal in &descriptor.terminals {
            let locator = terminal.locator(&node_label)?;
            let path = self.layout.certificate(node);
            let url = self.endpoints.result(locator);

            match self.cache.resolve(&path, &url).await {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => {
                    info!("no certificate of canvass yet for {}, skipping", node);
                    self.stats().record_skipped();
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn resolve_contest(&self, contest: &str) -> CrawlResult<()> {
        let path = self.layout.contest(contest);
        let url = self.endpoints.contest(contest);
        let label = format!("contest {}", contest);

        self.retry
            .run(&label, self.stats(), || self.cache.resolve(&path, &url))
            .await?;
        Ok(())
    }
}
