//! Default network interface selection
//!
//! Picks, among every interface a capture library can see, the one most
//! likely to carry live traffic. VPN adapters are preferred, virtual and
//! system adapters are filtered out, and the final choice is confirmed by
//! briefly counting packets on the device.
//!
//! ## Example
//!
//! ```no_run
//! use netpick_capture::list_devices;
//! use netpick_select::{Selector, SelectorConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let devices = list_devices()?;
//! let selector = Selector::with_system(SelectorConfig::default());
//!
//! match selector.find_default_network_device(&devices).await {
//!     Some(index) => println!("Capture on device {}", index),
//!     None => println!("No usable interface found"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod route;
pub mod scoring;
pub mod selector;
pub mod suitability;

pub use classifier::{Classification, Classifier, KeywordTables};
pub use route::{parse_default_route, RoutePrintProvider, RouteResolver, RoutingTableProvider};
pub use scoring::{Candidate, ScoringEngine};
pub use selector::{rank_probed, ProbedCandidate, Selector, SelectorConfig};
pub use suitability::is_suitable_for_capture;
