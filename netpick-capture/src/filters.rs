//! BPF (Berkeley Packet Filter) filter builders used by traffic probes

/// IPv4 filter
pub fn ipv4_filter() -> String {
    "ip".to_string()
}

/// TCP filter
pub fn tcp_filter() -> String {
    "tcp".to_string()
}

/// IPv4 + TCP filter, the default for liveness probes
pub fn ip_tcp_filter() -> String {
    format!("{} and {}", ipv4_filter(), tcp_filter())
}
