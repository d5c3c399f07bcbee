// CloudPrint API response types
//
// The backend mixes camelCase and snake_case field names, so renames are
// explicit wherever they differ. Fields use `#[serde(default)]` liberally
// because the API is inconsistent about field presence, and `Option` where
// it is known to send nulls.

use serde::{Deserialize, Serialize};

// ── User ─────────────────────────────────────────────────────────────

/// The authenticated account's profile.
///
/// Populated by applying a [`UserPatch`] from `GET /user`: only fields
/// present in the response are overwritten, so a partial response never
/// resets previously-loaded fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_id: Option<i64>,
    pub industry: Option<String>,
    pub is_admin: Option<bool>,
    pub is_curator: Option<bool>,
    pub is_moderator: Option<bool>,
    /// Whether the account can sign in via SSO.
    pub has_active_sso: Option<bool>,
    /// Whether the account has a password set.
    pub has_basic_auth: Option<bool>,
    pub country: Option<String>,
    pub forced_pass_reset: Option<bool>,
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    /// Profile image URL.
    pub thumbnail: Option<String>,
    #[serde(default, rename = "notificationSetting")]
    pub notification_setting: NotificationSetting,
    /// Team membership record, when the account belongs to a team.
    #[serde(rename = "teamsUser")]
    pub teams_user: Option<TeamUser>,
}

impl User {
    /// Apply a profile response onto this record.
    ///
    /// Only keys present in the response are copied; everything else keeps
    /// its prior value. A present `teamsUser` replaces the nested record
    /// wholesale rather than merging into it.
    pub fn apply(&mut self, patch: UserPatch) {
        let UserPatch {
            id,
            username,
            first_name,
            last_name,
            image_id,
            industry,
            is_admin,
            is_curator,
            is_moderator,
            has_active_sso,
            has_basic_auth,
            country,
            forced_pass_reset,
            full_name,
            name,
            email,
            thumbnail,
            notification_setting,
            teams_user,
        } = patch;

        self.id = id.or(self.id);
        self.username = username.or(self.username.take());
        self.first_name = first_name.or(self.first_name.take());
        self.last_name = last_name.or(self.last_name.take());
        self.image_id = image_id.or(self.image_id);
        self.industry = industry.or(self.industry.take());
        self.is_admin = is_admin.or(self.is_admin);
        self.is_curator = is_curator.or(self.is_curator);
        self.is_moderator = is_moderator.or(self.is_moderator);
        self.has_active_sso = has_active_sso.or(self.has_active_sso);
        self.has_basic_auth = has_basic_auth.or(self.has_basic_auth);
        self.country = country.or(self.country.take());
        self.forced_pass_reset = forced_pass_reset.or(self.forced_pass_reset);
        self.full_name = full_name.or(self.full_name.take());
        self.name = name.or(self.name.take());
        self.email = email.or(self.email.take());
        self.thumbnail = thumbnail.or(self.thumbnail.take());
        if let Some(ns) = notification_setting {
            self.notification_setting = ns;
        }
        if let Some(team) = teams_user {
            self.teams_user = Some(team);
        }
    }
}

/// Wire-level mirror of [`User`] with every field optional.
///
/// Absent keys deserialize to `None` and leave the record untouched when
/// applied; unknown keys are silently dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_id: Option<i64>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub is_curator: Option<bool>,
    #[serde(default)]
    pub is_moderator: Option<bool>,
    #[serde(default)]
    pub has_active_sso: Option<bool>,
    #[serde(default)]
    pub has_basic_auth: Option<bool>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub forced_pass_reset: Option<bool>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, rename = "notificationSetting")]
    pub notification_setting: Option<NotificationSetting>,
    #[serde(default, rename = "teamsUser")]
    pub teams_user: Option<TeamUser>,
}

/// Print-job notification preferences. Both flags default on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSetting {
    #[serde(default = "default_true", rename = "isNotificationEnabled")]
    pub notifications_enabled: bool,
    #[serde(default = "default_true", rename = "isOnlyOwnPrintJobs")]
    pub only_own_print_jobs: bool,
}

impl Default for NotificationSetting {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            only_own_print_jobs: true,
        }
    }
}

// ── TeamUser ─────────────────────────────────────────────────────────

/// The account's membership record within a team.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamUser {
    #[serde(default)]
    pub id: Option<i64>,
    /// The member's username (`name` on the wire).
    #[serde(default, rename = "name")]
    pub username: Option<String>,
    #[serde(default, rename = "onionId")]
    pub onion_id: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub invited: Option<bool>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_admin: bool,
    /// Role within the team; absent or null reads as an empty role.
    #[serde(default)]
    pub role: Option<TeamRole>,
}

/// A team role. The backend omits it for plain members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRole {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

// ── Printer ──────────────────────────────────────────────────────────

/// A networked printer as reported by the printers-info endpoints.
///
/// Identity is `id`; the registry in `cloudprint-core` keys on it and a
/// refresh replaces the whole record rather than merging fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Printer {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub printer_type: Option<String>,
    /// Latest camera frame, when the printer has one.
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(default, rename = "ownedBy")]
    pub owned_by: Option<String>,
    #[serde(default)]
    pub status: PrinterStatus,
}

impl Printer {
    /// The printer's owner; the backend omits the field for user-owned
    /// machines.
    pub fn owner(&self) -> &str {
        self.owned_by.as_deref().unwrap_or("user")
    }
}

/// Live status block nested in every printer record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterStatus {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub auto_unload: Option<String>,
    #[serde(default)]
    pub bot_type: Option<String>,
    #[serde(default)]
    pub current_process: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub machine_type: Option<String>,
    #[serde(default)]
    pub sound: Option<bool>,
    #[serde(default)]
    pub firmware_version: FirmwareVersion,
}

impl PrinterStatus {
    /// Material auto-unload mode, `"off"` when unreported.
    pub fn auto_unload_mode(&self) -> &str {
        self.auto_unload.as_deref().unwrap_or("off")
    }

    /// Whether the printer's sounds are on. Defaults to enabled -- the
    /// backend only reports an explicit `false`.
    pub fn sound_enabled(&self) -> bool {
        self.sound != Some(false)
    }
}

/// Four-component firmware version; unreported components read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareVersion {
    #[serde(default)]
    pub major: Option<u32>,
    #[serde(default)]
    pub minor: Option<u32>,
    #[serde(default)]
    pub build: Option<u32>,
    #[serde(default)]
    pub bugfix: Option<u32>,
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.build.unwrap_or(0),
            self.bugfix.unwrap_or(0),
        )
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn patch_applies_only_present_fields() {
        let mut user = User {
            email: Some("old@example.com".into()),
            country: Some("US".into()),
            ..User::default()
        };

        let patch: UserPatch =
            serde_json::from_str(r#"{"full_name": "A B", "unknownField": 1}"#).unwrap();
        user.apply(patch);

        assert_eq!(user.full_name.as_deref(), Some("A B"));
        // Fields absent from the response keep their prior value.
        assert_eq!(user.email.as_deref(), Some("old@example.com"));
        assert_eq!(user.country.as_deref(), Some("US"));
    }

    #[test]
    fn repeated_partial_patches_accumulate() {
        let mut user = User::default();

        let first: UserPatch = serde_json::from_str(r#"{"username": "maker"}"#).unwrap();
        user.apply(first);
        let second: UserPatch = serde_json::from_str(r#"{"email": "m@b.com"}"#).unwrap();
        user.apply(second);

        assert_eq!(user.username.as_deref(), Some("maker"));
        assert_eq!(user.email.as_deref(), Some("m@b.com"));
    }

    #[test]
    fn teams_user_is_constructed_fresh() {
        let mut user = User::default();
        let patch: UserPatch = serde_json::from_str(
            r#"{"teamsUser": {"id": 7, "name": "maker", "onionId": "on-1", "is_admin": true}}"#,
        )
        .unwrap();
        user.apply(patch);

        let team = user.teams_user.unwrap();
        assert_eq!(team.id, Some(7));
        assert_eq!(team.username.as_deref(), Some("maker"));
        assert_eq!(team.onion_id.as_deref(), Some("on-1"));
        assert!(team.is_admin);
        // Unreported membership flags fall back to their defaults.
        assert!(!team.deleted);
        assert_eq!(team.role, None);
    }

    #[test]
    fn notification_setting_defaults_on() {
        let ns = NotificationSetting::default();
        assert!(ns.notifications_enabled);
        assert!(ns.only_own_print_jobs);

        let parsed: NotificationSetting =
            serde_json::from_str(r#"{"isNotificationEnabled": false}"#).unwrap();
        assert!(!parsed.notifications_enabled);
        assert!(parsed.only_own_print_jobs);
    }

    #[test]
    fn printer_defaults() {
        let printer: Printer = serde_json::from_str(
            r#"{"id": "p1", "name": "Replicator", "status": {"machine_name": "rep1"}}"#,
        )
        .unwrap();

        assert_eq!(printer.owner(), "user");
        assert_eq!(printer.status.auto_unload_mode(), "off");
        assert!(printer.status.sound_enabled());
        assert_eq!(printer.status.firmware_version.to_string(), "0.0.0.0");
    }

    #[test]
    fn printer_explicit_fields_win_over_defaults() {
        let printer: Printer = serde_json::from_str(
            r#"{
                "id": "p2",
                "ownedBy": "team",
                "status": {
                    "sound": false,
                    "firmware_version": {"major": 2, "minor": 14, "build": 3, "bugfix": 77}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(printer.owner(), "team");
        assert!(!printer.status.sound_enabled());
        assert_eq!(printer.status.firmware_version.to_string(), "2.14.3.77");
    }
}
