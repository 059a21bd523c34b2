//! Headless page driver.
//!
//! Mounts a page, runs the loading sequence, scrolls to the bottom and logs
//! every reveal event. Time is simulated, so a run finishes instantly.
//!
//! ```text
//! unveil [slug] [--json] [--submit]
//! ```
//!
//! `--submit` posts a sample contact form to the configured endpoint.

use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use unveil_config::UnveilConfig;
use unveil_core::{Clock, ManualClock, RevealEvent};
use unveil_site::{Catalog, Field, FormController, HttpTransport, Router, SubmitOutcome, HOME};

const FRAME_MS: f64 = 16.0;
const SCROLL_STEP: f64 = 120.0;
const MAX_FRAMES: usize = 10_000;

struct Options {
    slug: String,
    json: bool,
    submit: bool,
}

fn parse_args() -> Options {
    let mut options = Options {
        slug: HOME.to_string(),
        json: false,
        submit: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => options.json = true,
            "--submit" => options.submit = true,
            other if other.starts_with("--") => warn!("ignoring unknown flag {other}"),
            slug => options.slug = slug.to_string(),
        }
    }
    options
}

fn report(events: &[RevealEvent], json: bool) -> Result<()> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            match event {
                RevealEvent::Started { controller, at_ms } => {
                    info!("reveal {} started at {at_ms:.0}ms", controller.0)
                }
                RevealEvent::Completed { controller, at_ms } => {
                    info!("reveal {} completed at {at_ms:.0}ms", controller.0)
                }
                RevealEvent::FailedOpen { controller, reason } => {
                    warn!("reveal {} shown without animation: {reason}", controller.0)
                }
                other => log::debug!("{other:?}"),
            }
        }
    }
    Ok(())
}

fn submit_sample(config: &UnveilConfig) -> Result<()> {
    let transport = HttpTransport::new(
        &config.form.endpoint,
        Duration::from_millis(config.form.timeout_ms),
    )
    .context("building form transport")?;

    let mut form = FormController::new(&config.form);
    form.set(Field::Name, "Sample Visitor");
    form.set(Field::Email, "visitor@example.com");
    form.set(Field::CompanyName, "Example Ltd");
    form.set(Field::CompanySize, "11-50");
    form.set(Field::Country, "Germany");
    form.set(Field::Message, "Sent by the headless driver.");

    match form.submit(&transport, 0.0) {
        SubmitOutcome::Confirmed => info!("form accepted by {}", transport.endpoint()),
        outcome => {
            warn!("form submission {outcome:?}");
            for (field, message) in form.errors() {
                warn!("  {}: {message}", field.key());
            }
            if let Some(alert) = form.alert() {
                warn!("  {alert}");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = parse_args();
    let config = UnveilConfig::load();
    let catalog = Catalog::embedded().context("loading embedded catalog")?;

    let clock = ManualClock::new();
    let mut router = Router::new(catalog, Rc::new(clock.clone()), &config);
    router.runtime().start(config.gate.delay_ms);

    let page_height = router
        .navigate(&options.slug)
        .with_context(|| format!("opening page `{}`", options.slug))?
        .height;
    info!(
        "page `{}` mounted, {}px tall, gate opens at {}ms",
        options.slug, page_height, config.gate.delay_ms
    );

    let bottom = (page_height - config.viewport.height).max(0.0);
    let mut frames = 0;
    while frames < MAX_FRAMES {
        clock.advance(FRAME_MS);
        let frame = router.frame();
        report(&frame.events, options.json)?;
        frames += 1;

        if !router.runtime().is_ready() {
            continue;
        }
        let scroll_y = router.runtime().viewport().scroll_y;
        if scroll_y < bottom {
            router.scroll_to((scroll_y + SCROLL_STEP).min(bottom));
        } else if router.runtime().is_settled() {
            break;
        }
    }

    let played = router
        .runtime()
        .controllers()
        .filter(|controller| controller.has_played())
        .count();
    info!(
        "{played}/{} reveals played after {:.0}ms ({frames} frames)",
        router.runtime().len(),
        clock.now_ms()
    );

    if options.submit {
        submit_sample(&config)?;
    }
    Ok(())
}
