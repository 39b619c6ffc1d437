use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use futures::{StreamExt, stream};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use sitecheck_probe::{
    RetryPolicy, SiteVisitor, StatsSnapshot, VisitReport, retrieve_with_retry,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

const PACKAGED_SITES: &str = include_str!("../sites/selected_sites.txt");

/// Short list of historically troublesome sites, for investigating probe
/// behavior without running the whole packaged list.
pub const DEBUG_SITES: &[&str] = &[
    "http://vip.qzone.com/",
    "http://www.bj.cyberpolice.cn/index.htm",
    "https://r.mradx.net",
    "http://yelp.com",
    "http://veoh.tv/ccjjew",
    "https://www.theweathercompany.com/newsroom",
    "https://mbp.yimg.com/sy/os/mit/media/p/common/images/favicon_new-7483e38.svg",
    "http://wza.chinanews.com/",
    "http://careers.citygrid.com/",
    "http://www.letv.com/",
];

// Helper functions for the verify handler

/// The site list embedded in the binary.
pub fn packaged_sites() -> Vec<String> {
    parse_site_lines(PACKAGED_SITES)
}

/// Pick the site source: single URL, sites file, debug list, or the packaged
/// list when nothing else was asked for.
pub fn load_sites_from_source(
    url: Option<&Url>,
    sites_file: Option<&PathBuf>,
    debug_list: bool,
) -> Result<Vec<String>> {
    if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else if let Some(path) = sites_file {
        load_sites_from_file(path)
    } else if debug_list {
        Ok(DEBUG_SITES.iter().map(|s| s.to_string()).collect())
    } else {
        Ok(packaged_sites())
    }
}

/// Load and parse sites from a newline-delimited file.
pub fn load_sites_from_file(path: &PathBuf) -> Result<Vec<String>> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let content = fs::read_to_string(&expanded)
        .with_context(|| format!("Failed to read sites file {}", expanded))?;

    let sites = parse_site_lines(&content);
    if sites.is_empty() {
        bail!("No valid sites found in {}", expanded);
    }

    Ok(sites)
}

fn parse_site_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_site_line)
        .collect()
}

/// Parse a single line as a site URL, trying to add http:// if needed
pub fn parse_site_line(line: &str) -> Option<String> {
    // Try to parse as-is
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("⚠️  Skipping invalid site '{}'", line);
    None
}

/// Options for configuring a verification run
pub struct VerifyOptions {
    pub sites: Vec<String>,
    pub threads: usize,
    pub policy: RetryPolicy,
    pub follow_links: bool,
    pub show_progress: bool,
}

/// Callback for reporting per-site outcomes as they complete
pub type VerifyProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Verify every site in `options.sites`, several at a time.
///
/// Returns one report per site, in completion order, together with the run's
/// cumulative request counters. Individual site failures land in their report;
/// only setup problems fail the whole run.
pub async fn execute_verification(
    options: VerifyOptions,
    progress_callback: Option<VerifyProgressCallback>,
) -> Result<(Vec<VisitReport>, StatsSnapshot)> {
    let VerifyOptions {
        sites,
        threads,
        policy,
        follow_links,
        show_progress,
    } = options;

    let total = sites.len();
    let visitor = Arc::new(SiteVisitor::new()?);

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Starting verification...");
        Some(pb)
    } else {
        None
    };

    let mut visits = stream::iter(sites)
        .map(|site| {
            let visitor = visitor.clone();
            let policy = policy;
            async move {
                let started = Instant::now();
                let outcome = retrieve_with_retry(&visitor, &site, follow_links, &policy).await;
                (site, started.elapsed(), outcome)
            }
        })
        .buffer_unordered(threads.max(1));

    let mut reports = Vec::with_capacity(total);
    while let Some((site, elapsed, outcome)) = visits.next().await {
        let mut report = match outcome {
            Ok(links) => {
                let mut ok = VisitReport::new(site);
                ok.links_followed = links.into_iter().collect();
                ok
            }
            Err(e) => VisitReport::with_error(site, e.to_string()),
        };
        report.elapsed = elapsed;

        if let Some(ref pb) = progress_bar {
            pb.set_message(format!("Verifying... {}/{} sites done", reports.len() + 1, total));
            pb.tick();
        }
        if let Some(ref callback) = progress_callback {
            let marker = if report.is_success() { "✓" } else { "✗" };
            callback(format!(
                "{} {} ({:.1}s)",
                marker,
                report.site,
                report.elapsed.as_secs_f64()
            ));
        }

        reports.push(report);
    }

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("Verification complete! {} sites checked", total));
    }

    Ok((reports, visitor.stats()))
}

/// Generate a verification report from results
pub fn generate_verify_report(
    reports: &[VisitReport],
    stats: &StatsSnapshot,
    elapsed: Duration,
) -> String {
    let succeeded: Vec<&VisitReport> = reports.iter().filter(|r| r.is_success()).collect();
    let failed: Vec<&VisitReport> = reports.iter().filter(|r| !r.is_success()).collect();
    let total_links: usize = reports.iter().map(|r| r.links_followed.len()).sum();

    let mut report = String::new();
    report.push_str(&format!("{}\n\n", "━".repeat(52).bright_blue()));
    report.push_str(&format!(
        "# Summary ({}):\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    report.push_str(&format!("  Sites checked: {}\n", reports.len()));
    report.push_str(&format!(
        "  Reachable: {}\n",
        succeeded.len().to_string().green()
    ));
    let failed_count = if failed.is_empty() {
        failed.len().to_string().normal()
    } else {
        failed.len().to_string().red().bold()
    };
    report.push_str(&format!("  Failed: {}\n", failed_count));
    report.push_str(&format!("  Links followed: {}\n", total_links));
    report.push_str(&format!(
        "  Requests: {} total, {} acceptable\n",
        stats.attempts, stats.success_visits
    ));
    report.push_str(&format!("  Elapsed: {:.1}s\n", elapsed.as_secs_f64()));
    report.push_str(&format!("\n{}\n\n", "━".repeat(52).bright_blue()));

    for r in &succeeded {
        report.push_str(&format!(
            "  {} {}  {} links  {:.1}s\n",
            "✓".green().bold(),
            r.site,
            r.links_followed.len(),
            r.elapsed.as_secs_f64()
        ));
    }

    if !failed.is_empty() {
        report.push_str(&format!("\n{}\n", "Failures:".red().bold()));
        for r in &failed {
            report.push_str(&format!(
                "  {} {}\n      {}\n",
                "✗".red().bold(),
                r.site,
                r.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    report
}

#[derive(Serialize)]
struct VerifyRun<'a> {
    generated_at: String,
    results: &'a [VisitReport],
    stats: &'a StatsSnapshot,
}

/// Serialize a verification run for `--json` output.
pub fn render_json_report(reports: &[VisitReport], stats: &StatsSnapshot) -> Result<String> {
    let run = VerifyRun {
        generated_at: chrono::Utc::now().to_rfc3339(),
        results: reports,
        stats,
    };
    serde_json::to_string_pretty(&run).context("Failed to serialize verification report")
}

pub async fn handle_verify(sub_matches: &ArgMatches) -> Result<()> {
    let url = sub_matches.get_one::<Url>("url");
    let sites_file = sub_matches.get_one::<PathBuf>("sites-file");
    let debug_list = sub_matches.get_flag("debug");
    let threads = *sub_matches.get_one::<usize>("threads").unwrap_or(&8);
    let attempts = *sub_matches.get_one::<u32>("attempts").unwrap_or(&2);
    let backoff_ms = *sub_matches.get_one::<u64>("backoff-ms").unwrap_or(&1500);
    let no_links = sub_matches.get_flag("no-links");
    let json = sub_matches.get_flag("json");

    // Initialize tracing for logging; JSON mode keeps stdout clean for the
    // document itself.
    if json {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let sites = load_sites_from_source(url, sites_file, debug_list)?;

    if !json {
        println!("\n🔎 Verifying {} site(s)", sites.len());
        println!("Workers: {}", threads);
        println!("Attempts: {} (backoff {}ms)", attempts, backoff_ms);
        println!(
            "Links: {}\n",
            if no_links { "skipped" } else { "one layer deep" }
        );
    }

    let options = VerifyOptions {
        sites,
        threads,
        policy: RetryPolicy {
            max_attempts: attempts,
            backoff: Duration::from_millis(backoff_ms),
        },
        follow_links: !no_links,
        show_progress: !json,
    };

    let progress_callback: Option<VerifyProgressCallback> = if json {
        None
    } else {
        Some(Arc::new(|msg: String| {
            println!("{}", msg);
        }))
    };

    let started = Instant::now();
    let (reports, stats) = execute_verification(options, progress_callback).await?;

    if json {
        println!("{}", render_json_report(&reports, &stats)?);
    } else {
        println!("\n✓ Verification pass complete\n");
        print!("{}", generate_verify_report(&reports, &stats, started.elapsed()));
    }

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        bail!("{} of {} sites failed verification", failed, reports.len());
    }

    Ok(())
}

pub fn handle_sites() {
    for site in packaged_sites() {
        println!("{}", site);
    }
}
