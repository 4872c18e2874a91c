//! Dashboard and fleet counters.

use innkeep_core::Console;
use innkeep_core::model::{DashboardStats, MdmStats};

use crate::cli::{GlobalOpts, StatsArgs, StatsCommand};
use crate::error::CliError;
use crate::output;

fn dashboard_detail(s: &DashboardStats) -> String {
    output::detail_block(&[
        ("Properties", s.total_properties.to_string()),
        ("Guests", s.total_guests.to_string()),
        ("Checked in", s.checked_in.to_string()),
        ("Arrivals today", s.arrivals_today.to_string()),
        ("Departures today", s.departures_today.to_string()),
        ("Active activities", s.active_activities.to_string()),
        ("Devices online", s.devices_online.to_string()),
    ])
}

fn mdm_detail(s: &MdmStats) -> String {
    output::detail_block(&[
        ("Devices", s.total_devices.to_string()),
        ("Online", s.online_devices.to_string()),
        ("Offline", s.offline_devices.to_string()),
        ("Enrolled", s.enrolled_devices.to_string()),
        ("In kiosk mode", s.kiosk_devices.to_string()),
        ("Pending commands", s.pending_commands.to_string()),
        ("Open alerts", s.unresolved_alerts.to_string()),
    ])
}

pub async fn handle(console: &Console, args: StatsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        StatsCommand::Dashboard => {
            let stats = console.dashboard_stats().await?;
            output::render_single(global.output, &stats, dashboard_detail, |s| {
                s.total_guests.to_string()
            })
        }
        StatsCommand::Mdm => {
            let stats = console.mdm_stats().await?;
            output::render_single(global.output, &stats, mdm_detail, |s| {
                s.total_devices.to_string()
            })
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
