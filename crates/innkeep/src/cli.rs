//! Clap derive structures for the `innkeep` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Compiled into `build.rs` for man pages, so it may only use clap.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// innkeep -- kubectl-style console for hospitality operators
#[derive(Debug, Parser)]
#[command(
    name = "innkeep",
    version,
    about = "Run properties, guests and guest-room kiosks from the command line",
    long_about = "An operator console for the innkeep backend.\n\n\
        Manages properties, guests, activities, dining, streaming services,\n\
        property information and background images, and drives the MDM\n\
        console for in-room kiosk devices. `innkeep watch` follows the\n\
        realtime relay for live guest and device events.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Clone, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "INNKEEP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// REST API base URL (overrides profile)
    #[arg(long, env = "INNKEEP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Realtime relay URL (defaults to the API host)
    #[arg(long, env = "INNKEEP_WS_URL", global = true)]
    pub ws_url: Option<String>,

    /// Bearer token for this invocation only (skips the keyring)
    #[arg(long, env = "INNKEEP_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Property to scope lists and new records to
    #[arg(long, short = 'P', env = "INNKEEP_PROPERTY", global = true)]
    pub property: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "INNKEEP_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "INNKEEP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "INNKEEP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session in the system keyring
    Login(LoginArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in operator
    Whoami,

    /// Manage properties
    #[command(alias = "prop")]
    Properties(PropertiesArgs),

    /// Manage guests and their stays
    #[command(alias = "g")]
    Guests(GuestsArgs),

    /// Manage local activities shown on the kiosk
    #[command(alias = "act")]
    Activities(ActivitiesArgs),

    /// Manage dining recommendations
    Dining(DiningArgs),

    /// Manage streaming services offered on the kiosk
    #[command(alias = "tv")]
    Streaming(StreamingArgs),

    /// Manage background images
    #[command(alias = "bg")]
    Backgrounds(BackgroundsArgs),

    /// Manage property information (amenities, guides, services)
    Info(InfoArgs),

    /// View and edit console settings
    Settings(SettingsArgs),

    /// Manage kiosk devices (MDM)
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Configure kiosk lockdown on a device
    Kiosk(KioskArgs),

    /// List and resolve MDM alerts
    Alerts(AlertsArgs),

    /// List MDM configuration profiles
    Profiles,

    /// Dashboard and MDM statistics
    Stats(StatsArgs),

    /// Check, search, import and upload images
    Images(ImagesArgs),

    /// Follow live relay events as notifications
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared argument types ────────────────────────────────────────────

/// Position argument for `move`: `up`, `down`, or a zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Up,
    Down,
    Index(usize),
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => other
                .parse()
                .map(Self::Index)
                .map_err(|_| format!("expected 'up', 'down' or an index, got '{s}'")),
        }
    }
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Record ID
    pub id: String,

    /// `up`, `down`, or the zero-based target position
    #[arg(value_parser = Position::from_str)]
    pub position: Position,
}

/// Exactly one image source per submission.
#[derive(Debug, Clone, Default, Args)]
#[group(id = "image", multiple = false)]
pub struct ImageArgs {
    /// Upload a local image file
    #[arg(long, value_name = "PATH")]
    pub image_file: Option<PathBuf>,

    /// Use an external image URL
    #[arg(long, value_name = "URL")]
    pub image_url: Option<String>,

    /// Search the image library and use the first hit
    #[arg(long, value_name = "QUERY")]
    pub image_search: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ActiveFilterArgs {
    /// Only active records
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,

    /// Only inactive records
    #[arg(long)]
    pub inactive: bool,
}

impl ActiveFilterArgs {
    pub fn state(self) -> Option<bool> {
        match (self.active, self.inactive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROPERTIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PropertiesArgs {
    #[command(subcommand)]
    pub command: PropertiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum PropertiesCommand {
    /// List properties
    #[command(alias = "ls")]
    List,

    /// Show one property
    Get { id: String },

    /// Create a property
    Create(PropertyFields),

    /// Update a property
    Update {
        id: String,
        #[command(flatten)]
        fields: PropertyFields,
    },

    /// Delete a property
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct PropertyFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub wifi_ssid: Option<String>,
    #[arg(long)]
    pub wifi_password: Option<String>,
    /// Check-in time, e.g. 15:00
    #[arg(long)]
    pub check_in_time: Option<String>,
    /// Check-out time, e.g. 11:00
    #[arg(long)]
    pub check_out_time: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GUESTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GuestsArgs {
    #[command(subcommand)]
    pub command: GuestsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GuestsCommand {
    /// List guests of the selected property
    #[command(alias = "ls")]
    List(GuestListArgs),

    /// Show one guest
    Get { id: String },

    /// Register a guest
    Create(GuestFields),

    /// Update a guest
    Update {
        id: String,
        #[command(flatten)]
        fields: GuestFields,
    },

    /// Set a guest's status explicitly
    Status {
        id: String,
        /// reserved, checked_in, checkout_due, checked_out, cancelled
        status: String,
    },

    /// Mark a guest checked in
    CheckIn { id: String },

    /// Mark a guest checked out
    CheckOut { id: String },

    /// Delete a guest
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct GuestListArgs {
    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by guest type (family, couple, solo, business, group)
    #[arg(long = "type")]
    pub guest_type: Option<String>,

    /// Filter by label
    #[arg(long)]
    pub label: Option<String>,

    /// Search name, email, phone and room
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Sort key: check-in, check-out, name, status
    #[arg(long, default_value = "check-in")]
    pub sort: String,

    /// Reverse the sort order
    #[arg(long)]
    pub desc: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GuestFields {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub check_in: Option<String>,
    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub check_out: Option<String>,
    #[arg(long)]
    pub room: Option<String>,
    #[arg(long)]
    pub party_size: Option<u32>,
    #[arg(long)]
    pub adults: Option<u32>,
    #[arg(long)]
    pub children: Option<u32>,
    /// family, couple, solo, business, group
    #[arg(long = "type")]
    pub guest_type: Option<String>,
    /// Comma-separated labels
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,
    /// Preferred language code
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub special_requests: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACTIVITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ActivitiesArgs {
    #[command(subcommand)]
    pub command: ActivitiesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ActivitiesCommand {
    /// List activities in display order
    #[command(alias = "ls")]
    List {
        /// Filter by activity type
        #[arg(long = "type")]
        activity_type: Option<String>,
        #[command(flatten)]
        state: ActiveFilterArgs,
        /// Filter by label
        #[arg(long)]
        label: Option<String>,
        /// Search title and description
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Create an activity
    Create {
        #[command(flatten)]
        fields: ActivityFields,
        #[command(flatten)]
        image: ImageArgs,
    },

    /// Update an activity
    Update {
        id: String,
        #[command(flatten)]
        fields: ActivityFields,
        #[command(flatten)]
        image: ImageArgs,
    },

    /// Flip an activity between active and inactive
    Toggle { id: String },

    /// Move an activity in the display order
    Move(MoveArgs),

    /// Delete an activity
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ActivityFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub title_de: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub description_de: Option<String>,
    /// outdoor, indoor, sightseeing, sport, wellness, culture, family, ...
    #[arg(long = "type")]
    pub activity_type: Option<String>,
    /// Comma-separated labels
    #[arg(long, value_delimiter = ',')]
    pub labels: Option<Vec<String>>,
    /// Comma-separated weather conditions (sunny, rainy, ...)
    #[arg(long, value_delimiter = ',')]
    pub weather: Option<Vec<String>>,
    /// Season start (MM-DD)
    #[arg(long)]
    pub season_start: Option<String>,
    /// Season end (MM-DD)
    #[arg(long)]
    pub season_end: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DINING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DiningArgs {
    #[command(subcommand)]
    pub command: DiningCommand,
}

#[derive(Debug, Subcommand)]
pub enum DiningCommand {
    /// List dining places
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        cuisine: Option<String>,
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Create a dining place
    Create {
        #[command(flatten)]
        fields: DiningFields,
        #[command(flatten)]
        image: ImageArgs,
    },

    /// Update a dining place
    Update {
        id: String,
        #[command(flatten)]
        fields: DiningFields,
        #[command(flatten)]
        image: ImageArgs,
    },

    /// Flip a dining place between active and inactive
    Toggle { id: String },

    /// Delete a dining place
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct DiningFields {
    /// English name
    #[arg(long)]
    pub name: Option<String>,
    /// German name
    #[arg(long)]
    pub name_de: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub cuisine: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
    #[arg(long)]
    pub capacity: Option<u32>,
    /// e.g. $, $$, $$$
    #[arg(long)]
    pub price_range: Option<String>,
    /// Comma-separated features: parking, vegetarian, vegan,
    /// outdoor_seating, wheelchair_accessible, reservations_required
    #[arg(long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STREAMING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StreamingArgs {
    #[command(subcommand)]
    pub command: StreamingCommand,
}

#[derive(Debug, Subcommand)]
pub enum StreamingCommand {
    /// List streaming services in display order
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        state: ActiveFilterArgs,
    },

    /// Show the built-in service presets
    Presets,

    /// Add a streaming service, by hand or from a preset
    #[command(alias = "add")]
    Create {
        /// Preset key or name (see `streaming presets`)
        #[arg(long, conflicts_with = "name")]
        preset: Option<String>,
        #[command(flatten)]
        fields: StreamingFields,
    },

    /// Update a streaming service
    Update {
        id: String,
        #[command(flatten)]
        fields: StreamingFields,
    },

    /// Flip a streaming service between active and inactive
    Toggle { id: String },

    /// Move a streaming service in the display order
    Move(MoveArgs),

    /// Delete a streaming service
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct StreamingFields {
    #[arg(long)]
    pub name: Option<String>,
    /// video, music, broadcaster, sports, ...
    #[arg(long = "type")]
    pub service_type: Option<String>,
    /// App URL scheme, e.g. nflx://
    #[arg(long)]
    pub scheme: Option<String>,
    #[arg(long)]
    pub logo_url: Option<String>,
    #[arg(long)]
    pub requires_login: Option<bool>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BACKGROUNDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BackgroundsArgs {
    #[command(subcommand)]
    pub command: BackgroundsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackgroundsCommand {
    /// List background images
    #[command(alias = "ls")]
    List,

    /// Upload a background image for the selected property
    Upload {
        /// JPEG, PNG, GIF or WebP, at most 10 MB
        path: PathBuf,
        /// Season tag (spring, summer, autumn, winter)
        #[arg(long)]
        season: Option<String>,
    },

    /// Delete a background image
    #[command(alias = "rm")]
    Delete { id: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PROPERTY INFO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InfoArgs {
    #[command(subcommand)]
    pub command: InfoCommand,
}

#[derive(Debug, Subcommand)]
pub enum InfoCommand {
    /// List property information in display order
    #[command(alias = "ls")]
    List {
        /// amenity, guide, service
        #[arg(long)]
        category: Option<String>,
        #[command(flatten)]
        state: ActiveFilterArgs,
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Add an information item
    Create(InfoFields),

    /// Update an information item
    Update {
        id: String,
        #[command(flatten)]
        fields: InfoFields,
    },

    /// Flip an item between active and inactive
    Toggle { id: String },

    /// Move an item in the display order
    Move(MoveArgs),

    /// Delete an information item
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct InfoFields {
    #[arg(long)]
    pub title: Option<String>,
    /// amenity, guide, service
    #[arg(long)]
    pub category: Option<String>,
    /// Free-form subtype, e.g. wifi, parking
    #[arg(long = "type")]
    pub info_type: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub instructions: Option<String>,
    #[arg(long)]
    pub icon: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SETTINGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show all settings
    Show,

    /// Set one setting; the value is parsed as JSON, else kept as text
    Set { key: String, value: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List kiosk devices
    #[command(alias = "ls")]
    List {
        /// online, offline
        #[arg(long)]
        status: Option<String>,
        /// not_enrolled, pending, enrolled
        #[arg(long)]
        enrollment: Option<String>,
        /// Only devices in kiosk mode
        #[arg(long)]
        kiosk: bool,
        /// Search name, type and serial number
        #[arg(long, short = 's')]
        search: Option<String>,
    },

    /// Show one device with its telemetry
    Get { device: String },

    /// Telemetry samples for a device
    Metrics { device: String },

    /// Command history for a device
    History { device: String },

    /// Start MDM enrollment
    Enroll { device: String },

    /// Restart a device
    Restart { device: String },

    /// Push a test notification
    Notify {
        device: String,
        #[arg(long, default_value = "Test")]
        title: String,
        #[arg(long, default_value = "Test notification from innkeep")]
        message: String,
    },

    /// Apply a configuration profile
    ApplyProfile {
        device: String,
        /// Profile ID (see `innkeep profiles`)
        profile: String,
    },

    /// Queue a raw MDM command
    Command {
        device: String,
        /// Command type, e.g. lock, clear_cache
        command_type: String,
        /// JSON payload
        #[arg(long, default_value = "{}")]
        payload: String,
        /// low, normal, high
        #[arg(long, default_value = "normal")]
        priority: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  KIOSK
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct KioskArgs {
    #[command(subcommand)]
    pub command: KioskCommand,
}

#[derive(Debug, Subcommand)]
pub enum KioskCommand {
    /// List kiosk presets
    Presets,

    /// Lock a device to a custom set of apps
    Enable {
        device: String,
        /// Comma-separated bundle ids or streaming preset names
        #[arg(long, value_delimiter = ',', required = true)]
        apps: Vec<String>,
        /// Kiosk mode name
        #[arg(long)]
        mode: Option<String>,
        /// Return to home after: never, 5m, 15m, 30m, 1h
        #[arg(long, default_value = "never")]
        return_after: String,
    },

    /// Apply a kiosk preset to a device
    Preset { device: String, preset: String },

    /// Leave kiosk mode
    Disable { device: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALERTS / STATS / IMAGES / WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlertsArgs {
    #[command(subcommand)]
    pub command: AlertsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AlertsCommand {
    /// List alerts
    #[command(alias = "ls")]
    List {
        /// Include resolved alerts
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Mark an alert resolved
    Resolve { id: String },
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Dashboard counters
    Dashboard,

    /// MDM fleet counters
    Mdm,
}

#[derive(Debug, Args)]
pub struct ImagesArgs {
    #[command(subcommand)]
    pub command: ImagesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImagesCommand {
    /// Check an external image URL
    Check { url: String },

    /// Search the image library
    Search { query: String },

    /// Copy an external image into first-party storage
    Import { url: String },

    /// Upload a local image and print its URL
    Upload { path: PathBuf },

    /// Download an external image through the backend proxy
    Fetch {
        url: String,

        /// Where to write the image
        #[arg(long, short = 'O', value_name = "PATH")]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Print notifications as JSON lines
    #[arg(long)]
    pub json: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG / COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Store a bearer token for the active profile in the keyring
    SetToken,

    /// Set the default profile
    Use { name: String },

    /// List configured profiles
    Profiles,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn position_parses_words_and_indexes() {
        assert_eq!("up".parse::<Position>(), Ok(Position::Up));
        assert_eq!(" Down ".parse::<Position>(), Ok(Position::Down));
        assert_eq!("3".parse::<Position>(), Ok(Position::Index(3)));
        assert!("sideways".parse::<Position>().is_err());
    }

    #[test]
    fn active_flags_map_to_tri_state() {
        let none = ActiveFilterArgs::default();
        assert_eq!(none.state(), None);
        let on = ActiveFilterArgs {
            active: true,
            inactive: false,
        };
        assert_eq!(on.state(), Some(true));
        let off = ActiveFilterArgs {
            active: false,
            inactive: true,
        };
        assert_eq!(off.state(), Some(false));
    }
}
