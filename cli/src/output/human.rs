//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::Application;
use crate::domain::config::LiftoffConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the summary shown once every instance is running.
    pub fn render_started(&self, app: &Application) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header("App started");
        println!();
        self.ctx.kv("state:", "started");
        self.ctx.kv("instances:", &format!("{0}/{0}", app.instance_count));
        self.ctx.kv("urls:", &display_urls(app));
        println!();
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &LiftoffConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let target = &config.target;
        for (key, value) in [
            ("target.api:", target.api.clone()),
            ("target.logs:", target.logs.clone()),
            ("target.token:", target.token.as_deref().map(mask_token)),
            ("target.org:", target.org.clone()),
            ("target.space:", target.space.clone()),
            ("target.space_guid:", target.space_guid.clone()),
            ("target.user:", target.user.clone()),
        ] {
            println!(
                "  {key:<32} {}",
                value.unwrap_or_else(|| "(not set)".to_string())
            );
        }
        let timeouts = &config.timeouts;
        println!("  {:<32} {}", "timeouts.staging_minutes:", timeouts.staging_minutes);
        println!("  {:<32} {}", "timeouts.startup_minutes:", timeouts.startup_minutes);
        println!(
            "  {:<32} {}",
            "timeouts.ping_throttle_seconds:", timeouts.ping_throttle_seconds
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in [
            "LIFTOFF_CONFIG",
            "LIFTOFF_STAGING_TIMEOUT",
            "LIFTOFF_STARTUP_TIMEOUT",
            "LIFTOFF_PING_THROTTLE",
            "NO_COLOR",
        ] {
            println!(
                "    {:<30} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

fn display_urls(app: &Application) -> String {
    if app.routes.is_empty() {
        "(none)".to_string()
    } else {
        app.urls()
    }
}

/// Show only the last four characters of a token.
#[must_use]
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
