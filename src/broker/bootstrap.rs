//! Turning a bootstrap server list into a broker handle

use super::{Broker, BrokerError, BrokerResult, MemoryBroker};
use std::sync::Arc;

/// Split a comma-separated `host:port` list
///
/// Entries are trimmed, empty entries skipped and duplicates dropped while
/// keeping first-seen order.
pub fn parse_bootstrap_servers(bootstrap: &str) -> BrokerResult<Vec<String>> {
    let mut servers: Vec<String> = Vec::new();
    for entry in bootstrap.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (host, port) = entry.rsplit_once(':').ok_or_else(|| BrokerError::Bootstrap {
            message: format!("'{}' is not in host:port form", entry),
        })?;
        if host.is_empty() {
            return Err(BrokerError::Bootstrap {
                message: format!("'{}' has an empty host", entry),
            });
        }
        port.parse::<u16>().map_err(|_| BrokerError::Bootstrap {
            message: format!("'{}' has an invalid port", entry),
        })?;
        if !servers.iter().any(|s| s == entry) {
            servers.push(entry.to_string());
        }
    }

    if servers.is_empty() {
        return Err(BrokerError::Bootstrap {
            message: "no brokers given".to_string(),
        });
    }
    Ok(servers)
}

/// Connect to the cluster named by `bootstrap`, creating `seed_topics` up front
pub fn connect(bootstrap: &str, seed_topics: &[String]) -> BrokerResult<Arc<dyn Broker>> {
    let servers = parse_bootstrap_servers(bootstrap)?;
    log::info!("connecting to {}", servers.join(","));

    let broker = MemoryBroker::new(servers);
    for topic in seed_topics {
        broker.create_topic(topic)?;
    }
    Ok(Arc::new(broker))
}
