pub mod customization_models;
pub mod role_color;

pub use customization_models::{
    plan_customization, CustomizationPlan, PreviewAction, PreviewState, PreviewStep, PreviewTheme,
    PREVIEW_WINDOW,
};
pub use role_color::RoleColor;
