//! MDM device console: inventory, commands, kiosk mode, alerts, profiles.

use std::sync::Arc;

use tabled::Tabled;

use innkeep_core::listing::{DeviceFilter, Filter};
use innkeep_core::model::{
    CommandPriority, CommandRequest, ConfigurationProfile, KioskPreset, MdmCommand, MetricSample,
    ReturnTimeout, Telemetry,
};
use innkeep_core::presets;
use innkeep_core::{Console, Device, KioskConfigBuilder, MdmAlert};

use crate::cli::{
    AlertsArgs, AlertsCommand, DevicesArgs, DevicesCommand, GlobalOpts, KioskArgs, KioskCommand,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Formatting ──────────────────────────────────────────────────────

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.0}%"))
}

#[allow(clippy::cast_precision_loss)]
fn bytes(value: Option<u64>) -> String {
    value.map_or_else(
        || "-".into(),
        |b| format!("{:.1} GB", b as f64 / 1_000_000_000.0),
    )
}

fn telemetry_fields(t: &Telemetry) -> Vec<(&'static str, String)> {
    vec![
        ("Battery", percent(t.battery_level)),
        ("CPU", percent(t.cpu_usage)),
        (
            "Temperature",
            t.temperature.map_or_else(|| "-".into(), |c| format!("{c:.1} °C")),
        ),
        (
            "Storage",
            format!(
                "{} of {} ({})",
                bytes(t.storage_used),
                bytes(t.storage_total),
                percent(t.storage_percent())
            ),
        ),
        (
            "Wi-Fi",
            t.wifi_signal.map_or_else(|| "-".into(), |s| format!("{s} dBm")),
        ),
    ]
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Enrollment")]
    enrollment: String,
    #[tabled(rename = "Kiosk")]
    kiosk: &'static str,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

impl From<&Arc<Device>> for DeviceRow {
    fn from(d: &Arc<Device>) -> Self {
        Self {
            id: d.id.to_string(),
            name: d.display_name(),
            device_type: d.device_type.clone().unwrap_or_default(),
            status: d.device_status.to_string(),
            enrollment: d.enrollment_status.to_string(),
            kiosk: output::yes_no(d.kiosk_mode_enabled),
            battery: percent(d.telemetry.battery_level),
            last_seen: d.last_seen.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "At")]
    at: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Storage")]
    storage: String,
}

impl From<&MetricSample> for MetricRow {
    fn from(m: &MetricSample) -> Self {
        Self {
            at: m.at.clone(),
            battery: percent(m.telemetry.battery_level),
            cpu: percent(m.telemetry.cpu_usage),
            storage: percent(m.telemetry.storage_percent()),
        }
    }
}

#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Command")]
    command_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

impl From<&MdmCommand> for CommandRow {
    fn from(c: &MdmCommand) -> Self {
        Self {
            id: c.id.to_string(),
            command_type: c.command_type.clone(),
            status: c.status.to_string(),
            created_at: c.created_at.clone().unwrap_or_default(),
            duration: c
                .duration_ms
                .map(|ms| format!("{ms} ms"))
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Apps")]
    apps: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&KioskPreset> for PresetRow {
    fn from(p: &KioskPreset) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            apps: p.allowed_apps.join(", "),
            description: p.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Resolved")]
    resolved: &'static str,
}

impl From<&Arc<MdmAlert>> for AlertRow {
    fn from(a: &Arc<MdmAlert>) -> Self {
        Self {
            id: a.id.to_string(),
            device: a
                .device_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            severity: a.severity.clone().unwrap_or_default(),
            title: a.title.clone().or_else(|| a.message.clone()).unwrap_or_default(),
            created_at: a.created_at.clone().unwrap_or_default(),
            resolved: output::yes_no(a.resolved),
        }
    }
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    profile_type: String,
    #[tabled(rename = "Default")]
    is_default: &'static str,
    #[tabled(rename = "Active")]
    is_active: &'static str,
}

impl From<&ConfigurationProfile> for ProfileRow {
    fn from(p: &ConfigurationProfile) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            profile_type: p.profile_type.clone().unwrap_or_default(),
            is_default: output::yes_no(p.is_default),
            is_active: output::yes_no(p.is_active),
        }
    }
}

fn device_detail(d: &Arc<Device>) -> String {
    let kiosk = match (&d.kiosk_mode_config, d.kiosk_mode_enabled) {
        (Some(cfg), true) => format!(
            "{} ({} app(s), return {})",
            cfg.mode.as_deref().unwrap_or("custom"),
            cfg.allowed_apps.len(),
            cfg.return_timeout
        ),
        (None, true) => "on".into(),
        (_, false) => "off".into(),
    };
    let mut fields = vec![
        ("ID", d.id.to_string()),
        ("Name", d.display_name()),
        ("Type", output::or_dash(d.device_type.as_deref())),
        ("Serial", output::or_dash(d.serial_number.as_deref())),
        ("Status", d.device_status.to_string()),
        ("Enrollment", d.enrollment_status.to_string()),
        ("Supervised", output::yes_no(d.supervised).into()),
        (
            "Provisional",
            d.provisional_days_left
                .map_or_else(|| "-".into(), |n| format!("{n} day(s) left")),
        ),
        ("Kiosk", kiosk),
        ("Last seen", output::or_dash(d.last_seen.as_deref())),
    ];
    fields.extend(telemetry_fields(&d.telemetry));
    output::detail_block(&fields)
}

// ── Kiosk helpers ───────────────────────────────────────────────────

/// Accept a preset id or its name.
async fn find_preset(console: &Console, wanted: &str) -> Result<KioskPreset, CliError> {
    let wanted = wanted.trim();
    console
        .kiosk_presets()
        .await?
        .into_iter()
        .find(|p| p.id.to_string() == wanted || p.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CliError::NotFound {
            resource_type: "Kiosk preset".into(),
            identifier: wanted.to_owned(),
            list_command: "kiosk presets".into(),
        })
}

/// Streaming preset names resolve to bundle ids; anything else is kept.
fn custom_kiosk(
    apps: &[String],
    mode: Option<String>,
    return_after: &str,
) -> Result<KioskConfigBuilder, CliError> {
    let timeout: ReturnTimeout =
        util::parse_enum("return-after", return_after, "never, 5m, 15m, 30m, 1h")?;
    let mut builder = KioskConfigBuilder::new()
        .apps(apps.iter().map(|a| presets::bundle_id_for(a)))
        .return_timeout(timeout);
    if let Some(mode) = mode {
        builder = builder.mode(mode);
    }
    Ok(builder)
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List {
            status,
            enrollment,
            kiosk,
            search,
        } => {
            let filter = DeviceFilter {
                status: util::parse_opt_enum("status", status.as_deref(), "online, offline")?,
                enrollment: util::parse_opt_enum(
                    "enrollment",
                    enrollment.as_deref(),
                    "not_enrolled, pending, enrolled",
                )?,
                kiosk: kiosk.then_some(true),
                search,
            };
            let devices = console.list_devices(console.property()).await?;
            let shown = filter.apply(&devices);
            let out = output::render_list(
                global.output,
                &shown,
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }

        DevicesCommand::Get { device } => {
            let device = console.get_device(&util::entity_id(&device)).await?;
            let out =
                output::render_single(global.output, &device, device_detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
        }

        DevicesCommand::Metrics { device } => {
            let samples = console.device_metrics(&util::entity_id(&device)).await?;
            let out = output::render_list(
                global.output,
                &samples,
                |m| MetricRow::from(m),
                |m| m.at.clone(),
            );
            output::print_output(&out, global.quiet);
        }

        DevicesCommand::History { device } => {
            let commands = console.command_history(&util::entity_id(&device)).await?;
            let out = output::render_list(
                global.output,
                &commands,
                |c| CommandRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }

        DevicesCommand::Enroll { device } => {
            console.enroll_device(&util::entity_id(&device)).await?;
        }

        DevicesCommand::Restart { device } => {
            if !util::confirm(&format!("Restart device {device}?"), global)? {
                return Ok(());
            }
            console.restart_device(&util::entity_id(&device)).await?;
        }

        DevicesCommand::Notify {
            device,
            title,
            message,
        } => {
            console
                .send_test_notification(&util::entity_id(&device), &title, &message)
                .await?;
        }

        DevicesCommand::ApplyProfile { device, profile } => {
            console
                .apply_profile(&util::entity_id(&device), &util::entity_id(&profile))
                .await?;
        }

        DevicesCommand::Command {
            device,
            command_type,
            payload,
            priority,
        } => {
            let payload = serde_json::from_str(&payload).map_err(|e| {
                CliError::validation("payload", format!("not valid JSON: {e}"))
            })?;
            let priority: CommandPriority =
                util::parse_enum("priority", &priority, "low, normal, high")?;
            let request = CommandRequest {
                command_type,
                payload,
                priority,
            };
            if let Some(queued) = console
                .send_command(&util::entity_id(&device), &request)
                .await?
            {
                let out = output::render_list(
                    global.output,
                    std::slice::from_ref(&queued),
                    |c| CommandRow::from(c),
                    |c| c.id.to_string(),
                );
                output::print_output(&out, global.quiet);
            }
        }
    }
    Ok(())
}

pub async fn handle_kiosk(
    console: &Console,
    args: KioskArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        KioskCommand::Presets => {
            let presets = console.kiosk_presets().await?;
            let out = output::render_list(
                global.output,
                &presets,
                |p| PresetRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }

        KioskCommand::Enable {
            device,
            apps,
            mode,
            return_after,
        } => {
            let builder = custom_kiosk(&apps, mode, &return_after)?;
            console
                .apply_kiosk(&util::entity_id(&device), builder)
                .await?;
        }

        KioskCommand::Preset { device, preset } => {
            let preset = find_preset(console, &preset).await?;
            console
                .apply_kiosk(
                    &util::entity_id(&device),
                    KioskConfigBuilder::new().preset(preset.id),
                )
                .await?;
        }

        KioskCommand::Disable { device } => {
            console.disable_kiosk(&util::entity_id(&device)).await?;
        }
    }
    Ok(())
}

pub async fn handle_alerts(
    console: &Console,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List { all } => {
            let alerts = console.list_alerts().await?;
            let shown: Vec<_> = alerts.into_iter().filter(|a| all || !a.resolved).collect();
            let out = output::render_list(
                global.output,
                &shown,
                |a| AlertRow::from(a),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
        }

        AlertsCommand::Resolve { id } => {
            // Loaded first so the resolved flag flips on the cached row.
            console.list_alerts().await?;
            console.resolve_alert(&util::entity_id(&id)).await?;
        }
    }
    Ok(())
}

pub async fn profiles(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let profiles = console.profiles().await?;
    let out = output::render_list(
        global.output,
        &profiles,
        |p| ProfileRow::from(p),
        |p| p.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use innkeep_core::KioskSubmission;

    #[test]
    fn custom_kiosk_maps_preset_names_to_bundle_ids() {
        let apps = vec!["Netflix".to_owned(), "com.example.guide".to_owned()];
        let submission = custom_kiosk(&apps, None, "15m").unwrap().build().unwrap();
        let KioskSubmission::Custom(request) = submission else {
            panic!("expected a custom submission");
        };
        assert_eq!(
            request.allowed_apps,
            vec!["com.netflix.Netflix", "com.example.guide"]
        );
        assert_eq!(request.return_timeout, ReturnTimeout::Minutes15);
    }

    #[test]
    fn bad_return_timeout_is_a_usage_error() {
        let apps = vec!["Netflix".to_owned()];
        assert!(matches!(
            custom_kiosk(&apps, None, "2h"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn percentages_round() {
        assert_eq!(percent(Some(87.6)), "88%");
        assert_eq!(percent(None), "-");
    }
}
