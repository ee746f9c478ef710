//! Default-route lookup through the OS routing table

use async_trait::async_trait;
use netpick_core::{DeviceList, Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Upper bound on how long the route query may run
const ROUTE_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// Position of the interface address in a `route print` IPv4 row:
/// destination, netmask, gateway, interface, metric
const INTERFACE_COLUMN: usize = 3;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Source of raw routing table text
#[async_trait]
pub trait RoutingTableProvider: Send + Sync {
    /// Return the raw default-route table output
    async fn route_table(&self) -> Result<String>;
}

/// Runs `route print 0.0.0.0` and returns its stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutePrintProvider;

impl RoutePrintProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoutingTableProvider for RoutePrintProvider {
    async fn route_table(&self) -> Result<String> {
        let mut cmd = Command::new("route");
        cmd.args(["print", "0.0.0.0"]).kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let output = tokio::time::timeout(ROUTE_COMMAND_TIMEOUT, cmd.output())
            .await
            .map_err(|_| Error::RouteCommand("route print timed out".to_string()))??;

        if !output.status.success() {
            return Err(Error::RouteCommand(format!(
                "route print exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extract the interface address of the first IPv4 default route
///
/// Rows count when they start with `0.0.0.0` and contain neither `On-Link`
/// nor `::`. The address is read from a fixed column.
pub fn parse_default_route(output: &str) -> Result<String> {
    let row = output
        .lines()
        .find(|line| {
            line.trim().starts_with("0.0.0.0") && !line.contains("On-Link") && !line.contains("::")
        })
        .ok_or_else(|| Error::route_parse("No default routes found in route table"))?;

    row.split_whitespace()
        .nth(INTERFACE_COLUMN)
        .map(str::to_string)
        .ok_or_else(|| Error::route_parse(format!("Default route row too short: {:?}", row.trim())))
}

/// Maps the OS default route onto a device in the snapshot
#[derive(Clone)]
pub struct RouteResolver {
    provider: Arc<dyn RoutingTableProvider>,
}

impl RouteResolver {
    pub fn new(provider: Arc<dyn RoutingTableProvider>) -> Self {
        Self { provider }
    }

    /// Index of the device carrying the default route, if any
    ///
    /// Every failure is logged and reported as `None`.
    pub async fn find_by_route(&self, devices: &DeviceList) -> Option<usize> {
        match self.resolve(devices).await {
            Ok(index) => Some(index),
            Err(e) => {
                warn!("Failed to find device by route: {}", e);
                None
            }
        }
    }

    async fn resolve(&self, devices: &DeviceList) -> Result<usize> {
        let output = self.provider.route_table().await?;
        let address = parse_default_route(&output)?;
        info!("Found default interface from route table: {}", address);

        let iface = devices
            .iter()
            .find(|iface| iface.has_address(&address))
            .ok_or_else(|| {
                Error::route_parse(format!("Could not find device for interface {}", address))
            })?;

        debug!("Matched device: {}", iface);
        Ok(iface.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netpick_core::NetworkInterface;

    const ROUTE_PRINT_ETHERNET: &str = "\
===========================================================================
Interface List
 12...00 15 5d 01 02 03 ......Intel(R) Ethernet Connection I219-V
  1...........................Software Loopback Interface 1
===========================================================================

IPv4 Route Table
===========================================================================
Active Routes:
Network Destination        Netmask          Gateway       Interface  Metric
          0.0.0.0          0.0.0.0      192.168.1.1    192.168.1.42     25
===========================================================================
Persistent Routes:
  None

IPv6 Route Table
===========================================================================
Active Routes:
 If Metric Network Destination      Gateway
  1    331 ::1/128                  On-link
===========================================================================
Persistent Routes:
  None
";

    const ROUTE_PRINT_ON_LINK_FIRST: &str = "\
Active Routes:
Network Destination        Netmask          Gateway       Interface  Metric
          0.0.0.0        128.0.0.0         On-Link        10.8.0.2     35
          0.0.0.0          0.0.0.0      192.168.1.1    192.168.1.42     25
";

    const ROUTE_PRINT_NO_DEFAULT: &str = "\
IPv4 Route Table
===========================================================================
Active Routes:
Network Destination        Netmask          Gateway       Interface  Metric
        127.0.0.0        255.0.0.0         On-link         127.0.0.1    331
===========================================================================
";

    struct CannedRoutes(Result<String>);

    #[async_trait]
    impl RoutingTableProvider for CannedRoutes {
        async fn route_table(&self) -> Result<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(Error::RouteCommand(e.to_string())),
            }
        }
    }

    fn resolver(output: Result<String>) -> RouteResolver {
        RouteResolver::new(Arc::new(CannedRoutes(output)))
    }

    fn devices() -> DeviceList {
        vec![
            NetworkInterface::new(0, "\\Device\\NPF_Loopback").with_address("127.0.0.1"),
            NetworkInterface::new(3, "\\Device\\NPF_{A1B2}")
                .with_description("Intel(R) Ethernet Connection I219-V")
                .with_address("fe80::5c1a:2b3c:4d5e:6f70")
                .with_address("192.168.1.42"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_ethernet_sample() {
        assert_eq!(
            parse_default_route(ROUTE_PRINT_ETHERNET).unwrap(),
            "192.168.1.42"
        );
    }

    #[test]
    fn test_parse_skips_on_link_rows() {
        assert_eq!(
            parse_default_route(ROUTE_PRINT_ON_LINK_FIRST).unwrap(),
            "192.168.1.42"
        );
    }

    #[test]
    fn test_parse_skips_ipv6_rows() {
        let output = "  0.0.0.0 ::/0 fe80::1 fe80::2 5\n  0.0.0.0 0.0.0.0 10.0.0.1 10.0.0.5 10\n";
        assert_eq!(parse_default_route(output).unwrap(), "10.0.0.5");
    }

    #[test]
    fn test_parse_without_default_route() {
        match parse_default_route(ROUTE_PRINT_NO_DEFAULT) {
            Err(Error::RouteParse(_)) => {}
            other => panic!("Expected RouteParse error, got {:?}", other),
        }
        assert!(parse_default_route("").is_err());
    }

    #[test]
    fn test_parse_short_row() {
        assert!(matches!(
            parse_default_route("0.0.0.0 0.0.0.0 192.168.1.1"),
            Err(Error::RouteParse(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_route_matches_address() {
        let resolver = resolver(Ok(ROUTE_PRINT_ETHERNET.to_string()));
        assert_eq!(resolver.find_by_route(&devices()).await, Some(3));
    }

    #[tokio::test]
    async fn test_find_by_route_unknown_address() {
        let output = "0.0.0.0 0.0.0.0 10.0.0.1 10.0.0.99 10".to_string();
        let resolver = resolver(Ok(output));
        assert_eq!(resolver.find_by_route(&devices()).await, None);
    }

    #[tokio::test]
    async fn test_find_by_route_command_failure() {
        let resolver = resolver(Err(Error::RouteCommand("not found".to_string())));
        assert_eq!(resolver.find_by_route(&devices()).await, None);
    }

    #[tokio::test]
    async fn test_route_print_provider_never_panics() {
        // Only meaningful on Windows; elsewhere the command is missing or differs
        let result = RoutePrintProvider::new().route_table().await;
        if let Err(e) = result {
            println!("route print unavailable: {}", e);
        }
    }
}
