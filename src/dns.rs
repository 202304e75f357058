use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;

/// Check whether a hostname resolves to at least one address. Used purely as
/// a binary signal; resolver setup errors and timeouts count as "does not
/// resolve".
pub async fn resolves(host: &str, timeout: Duration) -> bool {
    let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(e) => {
            log::debug!("failed to build DNS resolver: {e}");
            return false;
        }
    };

    match tokio::time::timeout(timeout, resolver.lookup_ip(host)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            log::debug!("DNS lookup failed for {host}: {e}");
            false
        }
        Err(_) => {
            log::debug!("DNS lookup timed out for {host}");
            false
        }
    }
}
