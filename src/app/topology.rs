//! Cluster overview printed when the console starts

use super::pager::{page, PagerPolicy};
use crate::broker::{Broker, BrokerResult, ClusterTopology};
use crate::core::styles::StyleRole;
use crate::jobs::JobOutput;

/// `title(count)` followed by the sorted items, one per line
pub fn render_listing(title: &str, items: &[String], use_color: bool) -> String {
    let mut sorted = items.to_vec();
    sorted.sort();

    let mut rendered = format!("{}({})", StyleRole::Title.paint(title, use_color), sorted.len());
    for item in sorted {
        rendered.push('\n');
        rendered.push_str(&item);
    }
    rendered
}

/// Consumer groups, brokers and topics, closed by a separator line
pub fn render_prelude(topology: &ClusterTopology, use_color: bool) -> Vec<String> {
    let groups: Vec<String> = topology
        .consumer_groups
        .iter()
        .map(|(group, protocol)| format!("{} ({})", group, protocol))
        .collect();

    vec![
        render_listing("consumer groups", &groups, use_color),
        render_listing("brokers", &topology.brokers, use_color),
        render_listing("topic", &topology.topics, use_color),
        StyleRole::Separator.paint("---", use_color),
    ]
}

/// Print the overview and return the known topics for completion
///
/// A listing taller than the terminal goes through the pager instead.
pub async fn print_prelude(
    broker: &dyn Broker,
    output: &dyn JobOutput,
    use_color: bool,
    pager: &PagerPolicy,
) -> BrokerResult<Vec<String>> {
    let topology = broker.topology().await?;
    for block in render_prelude(&topology, use_color) {
        if !pager.should_page(&block) {
            output.emit(&block);
            continue;
        }
        if let Err(e) = page(pager.command(), &block).await {
            log::warn!("Cannot run pager '{}': {}", pager.command(), e);
            output.emit(&block);
        }
    }
    Ok(topology.topics)
}
