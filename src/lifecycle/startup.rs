//! Startup banner.
//!
//! Printed to stdout once the listener is bound, so the port shown is the
//! one actually in use.

use std::net::SocketAddr;

use crate::config::DevServerConfig;

/// Render the banner for a bound listener.
pub fn banner(config: &DevServerConfig, local_addr: SocketAddr) -> String {
    let rule = "═".repeat(46);
    format!(
        "╔{rule}╗\n║  Static files  →  http://localhost:{port}  ({root})\n║  API relay     →  {prefix}  →  {upstream}\n╚{rule}╝",
        port = local_addr.port(),
        root = config.static_files.root.display(),
        prefix = config.upstream.prefix,
        upstream = config.upstream.base_url,
    )
}

/// Print the banner to stdout.
pub fn print_banner(config: &DevServerConfig, local_addr: SocketAddr) {
    println!("{}", banner(config, local_addr));
}
