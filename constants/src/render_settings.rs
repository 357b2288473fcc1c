use bevy::color::Color;

pub const CLEAR_COLOUR: Color = Color::srgb(0.008, 0.024, 0.09);

pub const SCAFFOLD_COLOUR: Color = Color::srgb(0.39, 0.4, 0.95);

pub const AXIS_LABEL_COLOUR: Color = Color::srgb(0.65, 0.7, 1.0);

pub const HUD_TEXT_COLOUR: Color = Color::srgb(0.85, 0.88, 0.95);

pub const LIMIT_TEXT_COLOUR: Color = Color::srgb(1.0, 0.45, 0.35);

pub const VALUE_LABEL_FONT_SIZE: f32 = 12.0;

pub const HOVER_LABEL_FONT_SIZE: f32 = 18.0;

pub const AXIS_LABEL_FONT_SIZE: f32 = 14.0;

/// World-space lift of a value label above its point.
pub const VALUE_LABEL_LIFT: f32 = 0.6;

/// World-space lift of the hover label above the hovered point.
pub const HOVER_LABEL_LIFT: f32 = 1.0;

/// Initial orbit camera eye position, looking at the origin.
pub const CAMERA_START_POSITION: [f32; 3] = [25.0, 20.0, 25.0];
