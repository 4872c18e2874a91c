// ── Kiosk configuration builder ──
//
// Local selection state for kiosk mode: either a named preset or a custom
// allow-list, never both. Picking one side clears the other.

use innkeep_api::models::{EntityId, KioskEnableRequest, ReturnTimeout};

use crate::error::CoreError;

const DEFAULT_MODE: &str = "custom";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Selection {
    #[default]
    Nothing,
    Preset(EntityId),
    Custom(Vec<String>),
}

/// What to send once the operator applies the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum KioskSubmission {
    /// `POST /kiosk/preset { presetId }`
    Preset { preset_id: EntityId },
    /// `POST /kiosk/enable { mode, allowedApps, returnTimeout }`
    Custom(KioskEnableRequest),
}

#[derive(Debug, Clone, Default)]
pub struct KioskConfigBuilder {
    selection: Selection,
    mode: Option<String>,
    return_timeout: ReturnTimeout,
}

impl KioskConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a preset. Discards any custom app list.
    pub fn preset(mut self, preset_id: impl Into<EntityId>) -> Self {
        self.selection = Selection::Preset(preset_id.into());
        self
    }

    /// Add one app to the custom list. Discards any preset selection.
    pub fn app(mut self, bundle_id: impl Into<String>) -> Self {
        let bundle_id = bundle_id.into();
        let bundle_id = bundle_id.trim();
        let mut apps = match self.selection {
            Selection::Custom(apps) => apps,
            Selection::Nothing | Selection::Preset(_) => Vec::new(),
        };
        if !bundle_id.is_empty() && !apps.iter().any(|a| a == bundle_id) {
            apps.push(bundle_id.to_owned());
        }
        self.selection = Selection::Custom(apps);
        self
    }

    pub fn apps<I, S>(self, bundle_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let start = match self.selection {
            Selection::Custom(_) => self,
            _ => Self {
                selection: Selection::Custom(Vec::new()),
                ..self
            },
        };
        bundle_ids.into_iter().fold(start, Self::app)
    }

    /// Drop one app from the custom list. No effect on a preset selection.
    pub fn without_app(mut self, bundle_id: &str) -> Self {
        if let Selection::Custom(apps) = &mut self.selection {
            apps.retain(|a| a != bundle_id);
        }
        self
    }

    pub fn mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn return_timeout(mut self, timeout: ReturnTimeout) -> Self {
        self.return_timeout = timeout;
        self
    }

    pub fn selected_apps(&self) -> &[String] {
        match &self.selection {
            Selection::Custom(apps) => apps,
            _ => &[],
        }
    }

    pub fn selected_preset(&self) -> Option<&EntityId> {
        match &self.selection {
            Selection::Preset(id) => Some(id),
            _ => None,
        }
    }

    /// Validate and produce the submission. A custom list needs at least
    /// one app; nothing else is checked client-side.
    pub fn build(self) -> Result<KioskSubmission, CoreError> {
        match self.selection {
            Selection::Preset(preset_id) => Ok(KioskSubmission::Preset { preset_id }),
            Selection::Custom(apps) if apps.is_empty() => Err(CoreError::ValidationFailed {
                message: "select at least one app for a custom kiosk".into(),
            }),
            Selection::Custom(allowed_apps) => Ok(KioskSubmission::Custom(KioskEnableRequest {
                mode: self.mode.unwrap_or_else(|| DEFAULT_MODE.into()),
                allowed_apps,
                return_timeout: self.return_timeout,
            })),
            Selection::Nothing => Err(CoreError::ValidationFailed {
                message: "choose a kiosk preset or a custom app list".into(),
            }),
        }
    }
}
