// SPDX-License-Identifier: GPL-3.0-only

//! Lifecycle glue: webhook registration and keep-awake
//!
//! Both tasks are fire-and-forget. They run on detached threads spawned
//! once at startup, never report back to request handling, and their
//! failures are observed only in the log.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use serde::Serialize;
use std::process::Command;
use tracing::{debug, info, warn};
use ureq::Agent;

/// Control message sent to the external webhook endpoint
#[derive(Serialize)]
struct WebhookControl<'a> {
    mode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
}

/// Send the one-shot `set_webhook` control message.
///
/// A missing webhook URL disables registration; transport failures are
/// surfaced to the caller, which is expected to log and move on.
pub fn register_webhook(config: &Config) -> AppResult<()> {
    let Some(url) = &config.webhook_url else {
        debug!("No webhook URL configured, skipping registration");
        return Ok(());
    };
    post_control(
        url,
        &WebhookControl {
            mode: "set_webhook",
            port: Some(config.port),
            path: Some(&config.webhook_path),
        },
    )?;
    info!(url, "Webhook registered");
    Ok(())
}

/// Send the one-shot `unset_webhook` control message.
pub fn unregister_webhook(config: &Config) -> AppResult<()> {
    let Some(url) = &config.webhook_url else {
        return Ok(());
    };
    post_control(
        url,
        &WebhookControl {
            mode: "unset_webhook",
            port: None,
            path: None,
        },
    )?;
    info!(url, "Webhook unregistered");
    Ok(())
}

fn post_control(url: &str, payload: &WebhookControl<'_>) -> AppResult<()> {
    let body = serde_json::to_string(payload)
        .map_err(|e| AppError::Other(format!("control message encoding failed: {}", e)))?;
    let response = Agent::new_with_defaults()
        .post(url)
        .header("Content-Type", "application/json")
        .send(&body)
        .map_err(|e| AppError::Other(format!("webhook control call failed: {}", e)))?;
    if !(200..300).contains(&response.status().as_u16()) {
        return Err(AppError::Other(format!(
            "webhook control rejected with status {}",
            response.status()
        )));
    }
    Ok(())
}

/// Register the webhook on a detached thread; never blocks server startup.
pub fn spawn_webhook_registration(config: Config) {
    std::thread::spawn(move || {
        if let Err(e) = register_webhook(&config) {
            warn!(error = %e, "Webhook registration failed");
        }
    });
}

/// Keep the host awake for the process lifetime on a detached thread.
///
/// Runs a blocking inhibitor subprocess; if the platform has none or the
/// subprocess fails, the server keeps running regardless.
pub fn spawn_keep_awake() {
    std::thread::spawn(|| {
        let Some((program, args)) = keep_awake_command() else {
            warn!("No keep-awake inhibitor available on this platform");
            return;
        };
        info!(program, "Starting keep-awake inhibitor");
        match Command::new(program).args(args).status() {
            Ok(status) if status.success() => {
                debug!("Keep-awake inhibitor exited cleanly");
            }
            Ok(status) => {
                warn!(%status, "Keep-awake inhibitor exited abnormally");
            }
            Err(e) => {
                warn!(error = %e, "Failed to start keep-awake inhibitor");
            }
        }
    });
}

#[cfg(target_os = "macos")]
fn keep_awake_command() -> Option<(&'static str, Vec<&'static str>)> {
    Some(("caffeinate", vec!["-i"]))
}

#[cfg(target_os = "linux")]
fn keep_awake_command() -> Option<(&'static str, Vec<&'static str>)> {
    Some((
        "systemd-inhibit",
        vec![
            "--what=idle:sleep",
            "--who=camshot",
            "--why=camera capture service running",
            "sleep",
            "infinity",
        ],
    ))
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn keep_awake_command() -> Option<(&'static str, Vec<&'static str>)> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_webhook_message_shape() {
        let message = WebhookControl {
            mode: "set_webhook",
            port: Some(8089),
            path: Some("/"),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&message).unwrap()).unwrap();
        assert_eq!(json["mode"], "set_webhook");
        assert_eq!(json["port"], 8089);
        assert_eq!(json["path"], "/");
    }

    #[test]
    fn test_unset_webhook_message_omits_target() {
        let message = WebhookControl {
            mode: "unset_webhook",
            port: None,
            path: None,
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&message).unwrap()).unwrap();
        assert_eq!(json["mode"], "unset_webhook");
        assert!(json.get("port").is_none());
        assert!(json.get("path").is_none());
    }

    #[test]
    fn test_register_without_url_is_noop() {
        let config = Config::default();
        assert!(config.webhook_url.is_none());
        assert!(register_webhook(&config).is_ok());
        assert!(unregister_webhook(&config).is_ok());
    }
}
