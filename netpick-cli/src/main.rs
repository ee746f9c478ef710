//! netpick - find the network interface carrying live traffic.
//!
//! Usage:
//!   netpick [select]          pick the default capture device
//!   netpick devices           list devices and their classification
//!   netpick candidates        show suitable devices ranked by score
//!   netpick route             show the device carrying the default route
//!   netpick probe <INDEX>     count packets on one device

use netpick_capture::list_devices;
use netpick_cli::{Cli, Commands};
use netpick_core::DeviceList;
use netpick_select::{is_suitable_for_capture, Selector};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    let devices = list_devices()?;
    let selector = Selector::with_system(cli.selector_config());

    let code = match cli.command() {
        Commands::Devices => {
            print_devices(&selector, &devices);
            ExitCode::SUCCESS
        }
        Commands::Candidates => {
            let candidates = selector.find_suitable_devices(&devices);
            println!("Found {} suitable devices:", candidates.len());
            for candidate in &candidates {
                println!("  {}", candidate);
            }
            ExitCode::SUCCESS
        }
        Commands::Route => match selector.find_by_route(&devices).await {
            Some(index) => {
                print_selected("Default route device", index, &selector, &devices);
                ExitCode::SUCCESS
            }
            None => {
                println!("No default route device found");
                ExitCode::FAILURE
            }
        },
        Commands::Probe { index } => {
            let result = selector.probe().probe(index, &devices).await;
            println!("{}", result.format());
            ExitCode::SUCCESS
        }
        Commands::Select => match selector.find_default_network_device(&devices).await {
            Some(index) => {
                print_selected("Selected device", index, &selector, &devices);
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("No suitable network device found.");
                eprintln!("Packet capture usually needs administrator/root privileges.");
                ExitCode::FAILURE
            }
        },
    };

    Ok(code)
}

fn print_devices(selector: &Selector, devices: &DeviceList) {
    println!("Found {} network devices:\n", devices.len());

    for iface in devices {
        let name = iface.display_name();
        let flags = selector.classifier().classify(name);

        println!("Device {}: {}", iface.index, name);
        println!("  Name: {}", iface.name);
        if !iface.addresses.is_empty() {
            let addresses: Vec<&str> = iface.addresses.iter().map(|a| a.addr.as_str()).collect();
            println!("  Addresses: {}", addresses.join(", "));
        }
        println!(
            "  Virtual: {}  VPN: {}  Excluded: {}  Suitable: {}",
            flags.is_virtual,
            flags.is_vpn,
            flags.is_excluded,
            is_suitable_for_capture(selector.classifier(), name, iface)
        );
        println!();
    }
}

fn print_selected(label: &str, index: usize, selector: &Selector, devices: &DeviceList) {
    let Some(iface) = devices.get(index) else {
        println!("{}: {}", label, index);
        return;
    };

    println!("{}: {}", label, iface);
    if selector.classifier().is_vpn_adapter(iface.display_name()) {
        println!("  VPN interface detected");
    } else {
        println!("  Standard network interface");
    }
    if !iface.addresses.is_empty() {
        let addresses: Vec<&str> = iface.addresses.iter().map(|a| a.addr.as_str()).collect();
        println!("  Addresses: {}", addresses.join(", "));
    }
}
