// Role customization flow: what was asked for, and the confirm/cancel/switch
// preview loop that guards a color change.

use super::role_color::{ColorError, RoleColor};
use std::time::Duration;

/// How long the preview buttons stay live after the preview is posted.
pub const PREVIEW_WINDOW: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomizationPlan {
    /// Name change only, applied right away.
    Rename(String),
    /// Color change (optionally with a new name), applied after confirmation.
    Recolor {
        color: RoleColor,
        name: Option<String>,
    },
}

/// Turn the raw `color` / `name` options into a plan.
///
/// Empty strings count as "not given". An invalid color is an error even
/// when a valid name was also supplied. `Ok(None)` means nothing was asked for.
pub fn plan_customization(
    color: Option<&str>,
    name: Option<&str>,
) -> Result<Option<CustomizationPlan>, ColorError> {
    let color = color
        .filter(|c| !c.is_empty())
        .map(RoleColor::parse)
        .transpose()?;
    let name = name.filter(|n| !n.is_empty()).map(str::to_string);

    Ok(match (color, name) {
        (Some(color), name) => Some(CustomizationPlan::Recolor { color, name }),
        (None, Some(name)) => Some(CustomizationPlan::Rename(name)),
        (None, None) => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewTheme {
    #[default]
    Dark,
    Light,
}

impl PreviewTheme {
    pub fn background(&self) -> [u8; 3] {
        match self {
            PreviewTheme::Dark => [0x36, 0x39, 0x3f],
            PreviewTheme::Light => [0xff, 0xff, 0xff],
        }
    }

    /// Color of the caption under the member's name.
    pub fn caption_color(&self) -> [u8; 3] {
        match self {
            PreviewTheme::Dark => [0xff, 0xff, 0xff],
            PreviewTheme::Light => [0x00, 0x00, 0x00],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PreviewTheme::Dark => "Dark mode",
            PreviewTheme::Light => "Light mode",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            PreviewTheme::Dark => "rolecolor-dark-preview.png",
            PreviewTheme::Light => "rolecolor-light-preview.png",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            PreviewTheme::Dark => PreviewTheme::Light,
            PreviewTheme::Light => PreviewTheme::Dark,
        }
    }

    pub fn caption(&self) -> String {
        format!("Preview of the new color ({}):", self.label())
    }
}

/// Buttons under a color preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    Confirm,
    Cancel,
    Switch,
}

impl PreviewAction {
    pub const ALL: [PreviewAction; 3] = [
        PreviewAction::Confirm,
        PreviewAction::Cancel,
        PreviewAction::Switch,
    ];

    pub fn custom_id(&self) -> &'static str {
        match self {
            PreviewAction::Confirm => "confirm",
            PreviewAction::Cancel => "cancel",
            PreviewAction::Switch => "switch",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PreviewAction::Confirm => "Confirm",
            PreviewAction::Cancel => "Cancel",
            PreviewAction::Switch => "Switch Theme",
        }
    }

    pub fn from_custom_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.custom_id() == id)
    }
}

/// What the command should do after a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStep {
    Commit,
    Abort,
    Show(PreviewTheme),
}

/// Tracks which preview is on screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewState {
    theme: PreviewTheme,
}

impl PreviewState {
    pub fn theme(&self) -> PreviewTheme {
        self.theme
    }

    pub fn apply(&mut self, action: PreviewAction) -> PreviewStep {
        match action {
            PreviewAction::Confirm => PreviewStep::Commit,
            PreviewAction::Cancel => PreviewStep::Abort,
            PreviewAction::Switch => {
                self.theme = self.theme.toggled();
                PreviewStep::Show(self.theme)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only_is_a_rename() {
        assert_eq!(
            plan_customization(None, Some("Blue Team")).unwrap(),
            Some(CustomizationPlan::Rename("Blue Team".into()))
        );
    }

    #[test]
    fn test_color_takes_the_name_along() {
        let plan = plan_customization(Some("00f"), Some("Blue Team")).unwrap();
        assert_eq!(
            plan,
            Some(CustomizationPlan::Recolor {
                color: RoleColor::parse("#0000ff").unwrap(),
                name: Some("Blue Team".into()),
            })
        );
    }

    #[test]
    fn test_invalid_color_wins_over_valid_name() {
        assert!(plan_customization(Some("12345"), Some("Blue Team")).is_err());
    }

    #[test]
    fn test_nothing_requested() {
        assert_eq!(plan_customization(None, None).unwrap(), None);
        assert_eq!(plan_customization(Some(""), Some("")).unwrap(), None);
    }

    #[test]
    fn test_switch_toggles_without_resolving() {
        let mut state = PreviewState::default();
        assert_eq!(state.theme(), PreviewTheme::Dark);

        assert_eq!(
            state.apply(PreviewAction::Switch),
            PreviewStep::Show(PreviewTheme::Light)
        );
        assert_eq!(
            state.apply(PreviewAction::Switch),
            PreviewStep::Show(PreviewTheme::Dark)
        );
        assert_eq!(state.apply(PreviewAction::Confirm), PreviewStep::Commit);
        assert_eq!(state.apply(PreviewAction::Cancel), PreviewStep::Abort);
    }

    #[test]
    fn test_custom_ids_round_trip() {
        for action in PreviewAction::ALL {
            assert_eq!(PreviewAction::from_custom_id(action.custom_id()), Some(action));
        }
        assert_eq!(PreviewAction::from_custom_id("other"), None);
    }
}
