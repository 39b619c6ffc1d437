pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    DEBUG_SITES, VerifyOptions, VerifyProgressCallback, execute_verification,
    generate_verify_report, load_sites_from_file, load_sites_from_source, packaged_sites,
    parse_site_line, render_json_report,
};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
     _ _            _               _
 ___(_) |_ ___  ___| |__   ___  ___| | __
/ __| | __/ _ \/ __| '_ \ / _ \/ __| |/ /
\__ \ | ||  __/ (__| | | |  __/ (__|   <
|___/_|\__\___|\___|_| |_|\___|\___|_|\_\
"#;
    println!("{}", banner.bright_cyan());
    println!(
        "{}",
        format!("  site reachability verification v{}", env!("CARGO_PKG_VERSION")).bright_blue()
    );
    println!();
}
