//! Mints a bearer token for a user id.
//!
//! Reads the same session settings as the server, so the printed token is
//! accepted by any server sharing `SESSION_SECRET_KEY`.
//!
//! # Usage
//!
//! ```bash
//! SESSION_SECRET_KEY=change-me cargo run --bin attendance-plan-token -- user-42
//! curl -H "Authorization: Bearer $TOKEN" http://localhost:8080/v1/users/user-42/schedules
//! ```

use anyhow::{bail, Context, Result};

use attendance_plan::config::ServerConfig;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let user_id = match args.get(1).map(|s| s.trim()) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => bail!("usage: attendance-plan-token <user-id>"),
    };

    let config = ServerConfig::from_env().context("Invalid session configuration")?;
    let sessions = config.session_tokens()?;
    let token = sessions
        .issue(&user_id)
        .with_context(|| format!("Failed to issue token for {}", user_id))?;

    eprintln!(
        "Token for {} valid for {} day(s)",
        user_id,
        sessions.lifetime().num_days()
    );
    println!("{}", token);
    Ok(())
}
